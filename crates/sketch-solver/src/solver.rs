use sketcher_types::SketchModel;
use tracing::{debug, instrument, warn};

use crate::relax;
use crate::types::{SolveResult, SolverError};

/// A constraint solver port. Implementations mutate the model they are given,
/// so callers pass a private copy and swap it in afterwards.
pub trait ConstraintSolver {
    fn solve(&self, model: &mut SketchModel) -> SolveResult;
}

/// Tunables for the relaxation solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Iteration cap. Each iteration applies every constraint once.
    pub max_iterations: usize,
    /// Convergence threshold on the summed squared error.
    pub epsilon: f64,
    /// Fraction of the way each constraint moves its points per iteration.
    pub step: f64,
}

impl SolverConfig {
    /// Cap the number of passes.
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the convergence threshold on total squared error.
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    /// Set the relaxation step factor.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = step;
        self
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            epsilon: 1e-6,
            step: 0.5,
        }
    }
}

/// Iterative local relaxation: every constraint nudges its own points toward
/// satisfaction, and repeated sweeps let shared points settle.
///
/// Over-constrained or conflicting systems are not guaranteed to converge;
/// that is reported as `NoConverge`, not treated as fatal.
#[derive(Debug, Clone, Default)]
pub struct RelaxationSolver {
    pub config: SolverConfig,
}

impl RelaxationSolver {
    /// Create a solver with `config`.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }
}

impl ConstraintSolver for RelaxationSolver {
    #[instrument(skip_all, fields(constraints = model.constraints.len()))]
    fn solve(&self, model: &mut SketchModel) -> SolveResult {
        let cfg = &self.config;

        let view: &SketchModel = model;
        let missing: Vec<SolverError> = view
            .constraints
            .values()
            .filter_map(|c| {
                relax::check_references(view, c)
                    .err()
                    .map(|reason| SolverError::missing_entity(c.id(), reason))
            })
            .collect();

        if !missing.is_empty() {
            warn!(count = missing.len(), "solve aborted on broken references");
            return SolveResult {
                success: false,
                iterations: 0,
                final_error: f64::INFINITY,
                errors: missing,
            };
        }

        // Constraints are values; a snapshot of them lets the loop borrow the
        // model mutably while points are replaced.
        let constraints: Vec<_> = model.constraints.values().cloned().collect();

        let mut total_error = f64::INFINITY;
        for iteration in 0..cfg.max_iterations {
            total_error = constraints
                .iter()
                .map(|c| relax::apply(model, c, cfg.step))
                .sum();

            if total_error < cfg.epsilon {
                debug!(iterations = iteration + 1, error = total_error, "sketch converged");
                return SolveResult {
                    success: true,
                    iterations: iteration + 1,
                    final_error: total_error,
                    errors: Vec::new(),
                };
            }
        }

        warn!(
            max_iterations = cfg.max_iterations,
            error = total_error,
            "sketch did not converge"
        );
        SolveResult {
            success: false,
            iterations: cfg.max_iterations,
            final_error: total_error,
            errors: vec![SolverError::no_converge(cfg.max_iterations)],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SolverErrorCode;
    use sketcher_types::{Constraint, SketchEntity};

    #[test]
    fn default_config_matches_documented_values() {
        let cfg = SolverConfig::default();
        assert_eq!(cfg.max_iterations, 100);
        assert_eq!(cfg.epsilon, 1e-6);
        assert_eq!(cfg.step, 0.5);
    }

    #[test]
    fn empty_model_converges_immediately() {
        let mut model = SketchModel::new();
        let result = RelaxationSolver::default().solve(&mut model);
        assert!(result.success);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.final_error, 0.0);
    }

    #[test]
    fn iteration_cap_of_one_reports_no_converge() {
        let mut model = SketchModel::new();
        let a = model.add_entity(SketchEntity::point(0.0, 0.0)).unwrap();
        let b = model.add_entity(SketchEntity::point(10.0, 5.0)).unwrap();
        let l = model.add_entity(SketchEntity::line(a, b)).unwrap();
        model.add_constraint(Constraint::horizontal(l)).unwrap();

        let solver = RelaxationSolver::new(SolverConfig::default().with_max_iterations(1));
        let result = solver.solve(&mut model);
        assert!(!result.success);
        assert_eq!(result.iterations, 1);
        assert_eq!(result.final_error, 25.0);
        assert!(result.has_error(SolverErrorCode::NoConverge));
    }
}
