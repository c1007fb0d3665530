//! cost_optimizer::builders: solver construction helpers.
//!
//! Purpose
//! -------
//! Provide small builders for the built-in solvers. They hide Argmin's
//! generic wiring and apply crate-level [`OptimizerArgs`] (tolerances,
//! memory, simplex tolerance, step sizes) so the dispatcher can request a
//! configured solver without touching Argmin-specific types.
//!
//! Conventions
//! -----------
//! - Builders never set the initial parameter vector or `max_iters`; those
//!   are runtime concerns applied by the runners in [`run`](super::run).
//! - The Nelder–Mead builder is the exception that needs `x0`: the initial
//!   simplex is constructed around it.
//! - Invalid tolerances rejected by Argmin surface as [`OptError`](crate::optimization::errors::OptError)
//!   through the crate's `From<argmin::core::Error>` conversion.
use argmin::solver::quasinewton::LBFGS;

use crate::optimization::{
    cost_optimizer::{
        momentum::MomentumDescent,
        traits::OptimizerArgs,
        types::{
            BfgsMoreThuente, Cost, DEFAULT_LBFGS_MEM, Grad, HagerZhangLS, LbfgsHagerZhang,
            LbfgsMoreThuente, MoreThuenteLS, NelderMeadSimplex, Theta,
        },
    },
    errors::{OptError, OptResult},
};

/// Relative size of each initial simplex edge.
const SIMPLEX_PERTURBATION: f64 = 0.05;

/// Edge length used for coordinates that start at exactly zero.
const SIMPLEX_ZERO_STEP: f64 = 0.00025;

/// Build a Nelder–Mead solver whose initial simplex surrounds `x0`.
///
/// # Errors
/// - [`OptError::EmptyParameter`] if `x0` is empty.
/// - Argmin configuration errors for an invalid `sd_tolerance`.
pub fn build_nelder_mead(x0: &Theta, args: &OptimizerArgs) -> OptResult<NelderMeadSimplex> {
    if x0.is_empty() {
        return Err(OptError::EmptyParameter);
    }
    let simplex = initial_simplex(x0);
    Ok(NelderMeadSimplex::new(simplex).with_sd_tolerance(args.sd_tolerance)?)
}

/// Vertices `x0` and `x0 + h_i e_i`, one per dimension.
///
/// Uses a 5% relative step per coordinate and a small absolute step for
/// coordinates equal to zero.
pub fn initial_simplex(x0: &Theta) -> Vec<Theta> {
    let mut vertices = Vec::with_capacity(x0.len() + 1);
    vertices.push(x0.clone());
    for i in 0..x0.len() {
        let step =
            if x0[i] == 0.0 { SIMPLEX_ZERO_STEP } else { SIMPLEX_PERTURBATION * x0[i].abs() };
        let mut vertex = x0.clone();
        vertex[i] += step;
        vertices.push(vertex);
    }
    vertices
}

/// Build full-memory BFGS with More–Thuente line search.
pub fn build_bfgs(args: &OptimizerArgs) -> OptResult<BfgsMoreThuente> {
    let mut solver = BfgsMoreThuente::new(MoreThuenteLS::new());
    if let Some(g) = args.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = args.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Build L-BFGS with Hager–Zhang line search.
pub fn build_lbfgs_hager_zhang(args: &OptimizerArgs) -> OptResult<LbfgsHagerZhang> {
    let mem = args.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsHagerZhang::new(HagerZhangLS::new(), mem);
    configure_lbfgs(lbfgs, args)
}

/// Build L-BFGS with More–Thuente line search.
pub fn build_lbfgs_more_thuente(args: &OptimizerArgs) -> OptResult<LbfgsMoreThuente> {
    let mem = args.lbfgs_mem.unwrap_or(DEFAULT_LBFGS_MEM);
    let lbfgs = LbfgsMoreThuente::new(MoreThuenteLS::new(), mem);
    configure_lbfgs(lbfgs, args)
}

/// Apply optional gradient and cost tolerances to an L-BFGS solver,
/// regardless of its line-search type. `None` keeps Argmin's defaults.
pub fn configure_lbfgs<L>(
    mut solver: LBFGS<L, Theta, Grad, Cost>, args: &OptimizerArgs,
) -> OptResult<LBFGS<L, Theta, Grad, Cost>> {
    if let Some(g) = args.tols.tol_grad {
        solver = solver.with_tolerance_grad(g)?;
    }
    if let Some(c) = args.tols.tol_cost {
        solver = solver.with_tolerance_cost(c)?;
    }
    Ok(solver)
}

/// Build the momentum gradient-descent solver from `args.step`.
pub fn build_momentum(args: &OptimizerArgs) -> OptResult<MomentumDescent> {
    MomentumDescent::new(args.step, args.tols.tol_grad, args.tols.tol_cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimization::cost_optimizer::traits::{LineSearcher, StepArgs, Tolerances};
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // Construction of each built-in solver and the initial simplex geometry.
    // Full solver runs are covered by the runner and dispatcher tests.
    // -------------------------------------------------------------------------

    fn args_with(tols: Tolerances, lbfgs_mem: Option<usize>) -> OptimizerArgs {
        OptimizerArgs::new(
            tols,
            LineSearcher::HagerZhang,
            lbfgs_mem,
            StepArgs::default(),
            1e-8,
            false,
        )
        .expect("OptimizerArgs should be valid")
    }

    #[test]
    // Purpose
    // -------
    // The initial simplex has D + 1 vertices, each moving one coordinate.
    //
    // Given
    // -----
    // - x0 = (2, 0, -4).
    //
    // Expect
    // ------
    // - Vertex 0 is x0; vertex i+1 differs from x0 only in coordinate i,
    //   by 5% of |x0_i| or by the zero step.
    fn initial_simplex_perturbs_one_coordinate_per_vertex() {
        // Arrange
        let x0 = array![2.0, 0.0, -4.0];

        // Act
        let simplex = initial_simplex(&x0);

        // Assert
        assert_eq!(simplex.len(), 4);
        assert_eq!(simplex[0], x0);
        assert_eq!(simplex[1], array![2.1, 0.0, -4.0]);
        assert_eq!(simplex[2], array![2.0, SIMPLEX_ZERO_STEP, -4.0]);
        assert_eq!(simplex[3], array![2.0, 0.0, -3.8]);
    }

    #[test]
    fn nelder_mead_rejects_empty_start() {
        let x0: Theta = array![];
        let res = build_nelder_mead(&x0, &OptimizerArgs::default());
        assert!(matches!(res, Err(OptError::EmptyParameter)));
    }

    #[test]
    fn nelder_mead_builds_for_valid_start() {
        assert!(build_nelder_mead(&array![1.0, 2.0], &OptimizerArgs::default()).is_ok());
    }

    #[test]
    fn bfgs_builds_with_both_tolerances() {
        let tols = Tolerances::new(Some(1e-6), Some(1e-10), Some(100)).unwrap();
        assert!(build_bfgs(&args_with(tols, None)).is_ok());
    }

    #[test]
    fn lbfgs_builders_respect_memory_settings() {
        let tols = Tolerances::new(Some(1e-6), None, Some(50)).unwrap();
        assert!(build_lbfgs_hager_zhang(&args_with(tols, None)).is_ok());
        assert!(build_lbfgs_more_thuente(&args_with(tols, Some(11))).is_ok());
    }

    #[test]
    fn configure_lbfgs_respects_absent_tolerances() {
        let raw = LBFGS::new(MoreThuenteLS::new(), DEFAULT_LBFGS_MEM);
        let tols = Tolerances::new(None, None, Some(50)).unwrap();
        assert!(configure_lbfgs(raw, &args_with(tols, None)).is_ok());
    }
}
