//! Satisfaction assessment of goal models under fuzzy observations, with
//! exact algebra over piecewise linear membership functions.

mod combine;
mod error;
mod function;
mod fuzzy;
mod goal;
mod leaf;
mod math;
mod points;

pub use error::{FunctionError, FuzzyError, GoalError};
pub use function::{Breakpoint, PiecewiseLinear};
pub use fuzzy::{FuzzyBoolean, FuzzyNumber};
pub use goal::{GoalKey, GoalNode, GoalTree, LeafKind, LogicOp};
