mod problem;
mod simplex;
mod trace;

pub use problem::{Constraint, LinearProgram, ModelError, ObjectiveFunction};
pub use simplex::Solver;
pub use trace::{TableauStep, Trace, TraceStatus};
