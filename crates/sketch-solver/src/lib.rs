pub mod profiles;
pub mod relax;
pub mod solver;
pub mod types;

pub use profiles::{rectangle_profile, RectProfile};
pub use solver::{ConstraintSolver, RelaxationSolver, SolverConfig};
pub use types::*;
