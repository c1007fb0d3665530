//! Requested outcomes and acceptance tests.
//!
//! A [`Target`] is either a literal model output or a [`Predicate`] over
//! outputs. [`Acceptance`] fixes, once per search, which test decides whether
//! a candidate is accepted:
//!
//! 1. an explicit `done` predicate, when supplied;
//! 2. otherwise the target itself, when it is a predicate;
//! 3. otherwise exact equality with the literal target.
use std::fmt;
use std::sync::Arc;

/// Boolean test over model outputs.
///
/// The optional anchor is a representative accepted output. Losses that need
/// a concrete value to steer toward (e.g. a regression loss) use it when the
/// target is a predicate.
pub struct Predicate<Y> {
    accept: Arc<dyn Fn(&Y) -> bool>,
    anchor: Option<Y>,
}

impl<Y> Predicate<Y> {
    pub fn new<F>(accept: F) -> Self
    where
        F: Fn(&Y) -> bool + 'static,
    {
        Self { accept: Arc::new(accept), anchor: None }
    }

    pub fn with_anchor(mut self, anchor: Y) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn accepts(&self, y: &Y) -> bool {
        (self.accept)(y)
    }

    pub fn anchor(&self) -> Option<&Y> {
        self.anchor.as_ref()
    }
}

impl<Y: Clone> Clone for Predicate<Y> {
    fn clone(&self) -> Self {
        Self { accept: Arc::clone(&self.accept), anchor: self.anchor.clone() }
    }
}

impl<Y: fmt::Debug> fmt::Debug for Predicate<Y> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Predicate").field("anchor", &self.anchor).finish_non_exhaustive()
    }
}

/// Desired model output.
#[derive(Debug, Clone)]
pub enum Target<Y> {
    Value(Y),
    Predicate(Predicate<Y>),
}

impl<Y> Target<Y> {
    pub fn predicate<F>(accept: F) -> Self
    where
        F: Fn(&Y) -> bool + 'static,
    {
        Target::Predicate(Predicate::new(accept))
    }

    /// The literal target, if any.
    pub fn value(&self) -> Option<&Y> {
        match self {
            Target::Value(y) => Some(y),
            Target::Predicate(_) => None,
        }
    }

    /// A concrete output to steer toward: the literal target or the
    /// predicate's anchor.
    pub fn steer_value(&self) -> Option<&Y> {
        match self {
            Target::Value(y) => Some(y),
            Target::Predicate(p) => p.anchor(),
        }
    }
}

impl<Y: PartialEq> Target<Y> {
    /// Whether `y` satisfies this target on its own (equality or predicate).
    pub fn accepts(&self, y: &Y) -> bool {
        match self {
            Target::Value(target) => y == target,
            Target::Predicate(p) => p.accepts(y),
        }
    }
}

impl<Y> From<Predicate<Y>> for Target<Y> {
    fn from(p: Predicate<Y>) -> Self {
        Target::Predicate(p)
    }
}

/// The acceptance test chosen for one search.
#[derive(Debug)]
pub enum Acceptance<'a, Y> {
    Done(&'a Predicate<Y>),
    TargetPredicate(&'a Predicate<Y>),
    Equals(&'a Y),
}

impl<'a, Y: PartialEq> Acceptance<'a, Y> {
    pub fn resolve(done: Option<&'a Predicate<Y>>, target: &'a Target<Y>) -> Self {
        match (done, target) {
            (Some(done), _) => Acceptance::Done(done),
            (None, Target::Predicate(p)) => Acceptance::TargetPredicate(p),
            (None, Target::Value(y)) => Acceptance::Equals(y),
        }
    }

    pub fn accepts(&self, y: &Y) -> bool {
        match self {
            Acceptance::Done(p) | Acceptance::TargetPredicate(p) => p.accepts(y),
            Acceptance::Equals(target) => y == *target,
        }
    }
}

impl<Y: Clone> Acceptance<'_, Y> {
    /// Target handed to the model loss.
    ///
    /// With an explicit `done`, the loss steers toward outputs `done` accepts;
    /// `done`'s anchor, or else the target's steer value, is kept as anchor.
    /// Otherwise the requested target is used unchanged.
    pub fn loss_target(&self, target: &Target<Y>) -> Target<Y> {
        match self {
            Acceptance::Done(done) => {
                let mut steer = (*done).clone();
                if steer.anchor.is_none() {
                    steer.anchor = target.steer_value().cloned();
                }
                Target::Predicate(steer)
            }
            Acceptance::TargetPredicate(_) | Acceptance::Equals(_) => target.clone(),
        }
    }
}
