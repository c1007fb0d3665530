//! Axis-aligned decision trees (classifier and regressor).
//!
//! A tree is a flat list of [`Node`]s with the root at index 0. A split sends
//! `x` left when `x[feature] <= threshold`. Each leaf therefore owns a box
//! `lower < x <= upper`, computed once at construction.
//!
//! Trees are piecewise constant, so the loss handed to the search is a
//! black-box surrogate: the weighted L1 distance from a candidate to the
//! nearest leaf box whose output is accepted, with each box shrunk by a small
//! margin so that reaching it lands strictly inside. Gradient-based solvers
//! are refused for it unless the caller wraps it in
//! [`FiniteDiffObjective`](crate::optimization::cost_optimizer::FiniteDiffObjective).
use crate::counterfactual::{
    errors::{CfError, CfResult},
    model::ModelWithLoss,
    target::Target,
};
use crate::models::validation::check_input;
use crate::optimization::{
    cost_optimizer::{Cost, Objective, Theta, validation::validate_param_dim},
    errors::OptResult,
};
use ndarray::Array1;
use std::fmt::Debug;

/// Distance a candidate keeps from the edges of a leaf box.
pub const LEAF_MARGIN: f64 = 1e-3;

/// Weight of the leaf distance relative to the regularization penalty.
pub const LEAF_DISTANCE_WEIGHT: f64 = 100.0;

#[derive(Debug, Clone, PartialEq)]
pub enum Node<Y> {
    Split { feature: usize, threshold: f64, left: usize, right: usize },
    Leaf { value: Y },
}

#[derive(Debug, Clone, PartialEq)]
struct LeafBox {
    node: usize,
    lower: Array1<f64>,
    upper: Array1<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionTree<Y> {
    nodes: Vec<Node<Y>>,
    n_features: usize,
    leaves: Vec<LeafBox>,
}

pub type DecisionTreeClassifier = DecisionTree<usize>;
pub type DecisionTreeRegressor = DecisionTree<f64>;

impl<Y: Clone + PartialEq + Debug> DecisionTree<Y> {
    /// Build a tree over `n_features` inputs.
    ///
    /// # Errors
    /// [`CfError::InvalidModel`] when the node list is empty, a split refers
    /// to an unknown feature or has a non-finite threshold, or the nodes do
    /// not form a single tree rooted at index 0 (children must come after
    /// their parent and every non-root node needs exactly one parent).
    pub fn new(nodes: Vec<Node<Y>>, n_features: usize) -> CfResult<Self> {
        if nodes.is_empty() || n_features == 0 {
            return Err(CfError::InvalidModel {
                reason: "a tree needs at least one node and one feature".to_string(),
            });
        }
        let mut parents = vec![0usize; nodes.len()];
        for (i, node) in nodes.iter().enumerate() {
            if let Node::Split { feature, threshold, left, right } = *node {
                if feature >= n_features {
                    return Err(CfError::InvalidModel {
                        reason: format!("node {i} splits on feature {feature} of {n_features}"),
                    });
                }
                if !threshold.is_finite() {
                    return Err(CfError::InvalidModel {
                        reason: format!("node {i} has a non-finite threshold: {threshold}"),
                    });
                }
                for child in [left, right] {
                    if child <= i || child >= nodes.len() {
                        return Err(CfError::InvalidModel {
                            reason: format!("node {i} has invalid child {child}"),
                        });
                    }
                    parents[child] += 1;
                }
            }
        }
        if let Some(i) = (1..nodes.len()).find(|&i| parents[i] != 1) {
            return Err(CfError::InvalidModel {
                reason: format!("node {i} has {} parents, expected 1", parents[i]),
            });
        }
        let leaves = leaf_boxes(&nodes, n_features);
        Ok(Self { nodes, n_features, leaves })
    }

    pub fn nodes(&self) -> &[Node<Y>] {
        &self.nodes
    }

    pub fn n_leaves(&self) -> usize {
        self.leaves.len()
    }

    fn leaf_value(&self, node: usize) -> Option<&Y> {
        match &self.nodes[node] {
            Node::Leaf { value } => Some(value),
            Node::Split { .. } => None,
        }
    }

    fn traverse(&self, x: &Array1<f64>) -> &Y {
        let mut i = 0;
        loop {
            match &self.nodes[i] {
                Node::Split { feature, threshold, left, right } => {
                    i = if x[*feature] <= *threshold { *left } else { *right };
                }
                Node::Leaf { value } => return value,
            }
        }
    }
}

/// Boxes of every leaf, by depth-first walk from the root.
fn leaf_boxes<Y>(nodes: &[Node<Y>], n_features: usize) -> Vec<LeafBox> {
    let mut out = Vec::new();
    let mut stack = vec![(
        0usize,
        Array1::from_elem(n_features, f64::NEG_INFINITY),
        Array1::from_elem(n_features, f64::INFINITY),
    )];
    while let Some((i, lower, upper)) = stack.pop() {
        match nodes[i] {
            Node::Split { feature, threshold, left, right } => {
                let mut left_upper = upper.clone();
                left_upper[feature] = left_upper[feature].min(threshold);
                let mut right_lower = lower.clone();
                right_lower[feature] = right_lower[feature].max(threshold);
                stack.push((right, right_lower, upper));
                stack.push((left, lower, left_upper));
            }
            Node::Leaf { .. } => out.push(LeafBox { node: i, lower, upper }),
        }
    }
    out
}

impl<Y: Clone + PartialEq + Debug> ModelWithLoss for DecisionTree<Y> {
    type Output = Y;

    fn dim(&self) -> usize {
        self.n_features
    }

    fn predict(&self, x: &Array1<f64>) -> CfResult<Y> {
        check_input(x, self.n_features)?;
        Ok(self.traverse(x).clone())
    }

    /// Distance to the nearest accepted leaf box.
    ///
    /// # Errors
    /// [`CfError::UnsupportedTarget`] when no leaf produces an accepted output.
    fn get_loss(
        &self, target: &Target<Y>, _prediction: Option<&Y>,
    ) -> CfResult<Box<dyn Objective + '_>> {
        let boxes: Vec<(Array1<f64>, Array1<f64>)> = self
            .leaves
            .iter()
            .filter(|leaf| self.leaf_value(leaf.node).is_some_and(|y| target.accepts(y)))
            .map(|leaf| shrink(&leaf.lower, &leaf.upper, LEAF_MARGIN))
            .collect();
        if boxes.is_empty() {
            return Err(CfError::UnsupportedTarget {
                reason: "no leaf of the tree produces an accepted output".to_string(),
            });
        }
        Ok(Box::new(LeafDistance { n_features: self.n_features, boxes }))
    }
}

/// Pull finite bounds inward by `margin`; boxes narrower than `2 · margin`
/// collapse to their midpoint.
fn shrink(lower: &Array1<f64>, upper: &Array1<f64>, margin: f64) -> (Array1<f64>, Array1<f64>) {
    let mut lo = lower + margin;
    let mut hi = upper - margin;
    for j in 0..lo.len() {
        if lo[j] > hi[j] {
            let mid = 0.5 * (lower[j] + upper[j]);
            lo[j] = mid;
            hi[j] = mid;
        }
    }
    (lo, hi)
}

struct LeafDistance {
    n_features: usize,
    boxes: Vec<(Array1<f64>, Array1<f64>)>,
}

impl Objective for LeafDistance {
    fn value(&self, x: &Theta) -> OptResult<Cost> {
        validate_param_dim(x, self.n_features)?;
        let nearest = self
            .boxes
            .iter()
            .map(|(lo, hi)| {
                x.iter()
                    .zip(lo.iter().zip(hi.iter()))
                    .map(|(&v, (&l, &h))| (l - v).max(0.0) + (v - h).max(0.0))
                    .sum::<f64>()
            })
            .fold(f64::INFINITY, f64::min);
        Ok(LEAF_DISTANCE_WEIGHT * nearest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counterfactual::target::Predicate;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    /// x0 <= 0.5 ? (x2 <= 1 ? class 0 : class 1) : class 2
    fn classifier() -> DecisionTreeClassifier {
        DecisionTree::new(
            vec![
                Node::Split { feature: 0, threshold: 0.5, left: 1, right: 2 },
                Node::Split { feature: 2, threshold: 1.0, left: 3, right: 4 },
                Node::Leaf { value: 2 },
                Node::Leaf { value: 0 },
                Node::Leaf { value: 1 },
            ],
            3,
        )
        .unwrap()
    }

    #[test]
    fn predicts_by_traversal() {
        let tree = classifier();
        assert_eq!(tree.n_leaves(), 3);
        assert_eq!(tree.predict(&array![1.0, 5.0, 2.0]).unwrap(), 2);
        assert_eq!(tree.predict(&array![0.5, 5.0, 1.0]).unwrap(), 0);
        assert_eq!(tree.predict(&array![0.0, 5.0, 1.5]).unwrap(), 1);
    }

    #[test]
    // Purpose
    // -------
    // The surrogate loss is zero inside an accepted (shrunk) leaf box and
    // grows with the L1 distance to the nearest one.
    //
    // Given
    // -----
    // - Target class 0, box x0 <= 0.5, x2 <= 1.
    //
    // Expect
    // ------
    // - Inside: 0.
    // - At (1, ·, 2): weight · ((1 − 0.499) + (2 − 0.999)).
    // - Black-box.
    fn surrogate_measures_distance_to_accepted_leaves() {
        // Arrange
        let tree = classifier();
        let loss = tree.get_loss(&Target::Value(0), Some(&2)).unwrap();

        // Act
        let inside = loss.value(&array![0.0, 9.0, 0.0]).unwrap();
        let outside = loss.value(&array![1.0, 9.0, 2.0]).unwrap();

        // Assert
        assert_abs_diff_eq!(inside, 0.0);
        assert_abs_diff_eq!(
            outside,
            LEAF_DISTANCE_WEIGHT * ((1.0 - 0.5 + LEAF_MARGIN) + (2.0 - 1.0 + LEAF_MARGIN)),
            epsilon = 1e-9
        );
        assert!(!loss.is_differentiable());
    }

    #[test]
    fn predicate_targets_select_matching_leaves() {
        let regressor: DecisionTreeRegressor = DecisionTree::new(
            vec![
                Node::Split { feature: 0, threshold: 0.0, left: 1, right: 2 },
                Node::Leaf { value: 20.0 },
                Node::Leaf { value: 25.2 },
            ],
            1,
        )
        .unwrap();
        let near_25: Target<f64> = Predicate::new(|y: &f64| (y - 25.0).abs() < 1.0).into();
        let loss = regressor.get_loss(&near_25, None).unwrap();

        assert_abs_diff_eq!(loss.value(&array![1.0]).unwrap(), 0.0);
        assert!(loss.value(&array![-1.0]).unwrap() > 100.0);
        let impossible: Target<f64> = Target::predicate(|y: &f64| *y > 100.0);
        assert!(matches!(
            regressor.get_loss(&impossible, None),
            Err(CfError::UnsupportedTarget { .. })
        ));
    }

    #[test]
    fn rejects_malformed_trees() {
        let cyclic: CfResult<DecisionTreeClassifier> = DecisionTree::new(
            vec![Node::Split { feature: 0, threshold: 0.0, left: 0, right: 1 }, Node::Leaf {
                value: 0,
            }],
            1,
        );
        assert!(matches!(cyclic, Err(CfError::InvalidModel { .. })));

        let orphan: CfResult<DecisionTreeClassifier> =
            DecisionTree::new(vec![Node::Leaf { value: 0 }, Node::Leaf { value: 1 }], 1);
        assert!(matches!(orphan, Err(CfError::InvalidModel { .. })));

        let bad_feature: CfResult<DecisionTreeClassifier> = DecisionTree::new(
            vec![
                Node::Split { feature: 3, threshold: 0.0, left: 1, right: 2 },
                Node::Leaf { value: 0 },
                Node::Leaf { value: 1 },
            ],
            2,
        );
        assert!(matches!(bad_feature, Err(CfError::InvalidModel { .. })));
    }

    #[test]
    fn narrow_boxes_collapse_to_midpoint() {
        let (lo, hi) = shrink(&array![0.0, f64::NEG_INFINITY], &array![1e-4, 3.0], LEAF_MARGIN);
        assert_abs_diff_eq!(lo[0], 5e-5);
        assert_abs_diff_eq!(hi[0], 5e-5);
        assert_eq!(lo[1], f64::NEG_INFINITY);
        assert_abs_diff_eq!(hi[1], 3.0 - LEAF_MARGIN);
    }
}
