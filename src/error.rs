use thiserror::Error;

use crate::goal::LeafKind;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FunctionError {
    #[error("no interval of the function contains x = {0}")]
    NoIntervalFound(f64),
    #[error("inverse is only defined for two-point functions, this one has {0} points")]
    InverseUnsupported(usize),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FuzzyError {
    #[error("function is not a fuzzy number: {0:?}")]
    NotAFuzzyNumber(Vec<(f64, f64)>),
    #[error("fuzzy number has no core, no membership value reaches 1")]
    MissingCore,
    #[error(transparent)]
    Function(#[from] FunctionError),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GoalError {
    #[error("intermediate goal has no children")]
    NoChildren,
    #[error("leaf goal has no recorded observation")]
    MissingObservation,
    #[error("truth criterion does not have the monotonic shape required by {0:?} goals")]
    TruthShape(LeafKind),
    #[error("goal key does not name a node in this tree")]
    UnknownGoal,
    #[error("only intermediate goals can take children")]
    NotAnIntermediateGoal,
    #[error("a goal cannot be its own child")]
    SelfChild,
    #[error("observations can only be set on leaf goals")]
    NotALeafGoal,
    #[error(transparent)]
    Function(#[from] FunctionError),
    #[error(transparent)]
    Fuzzy(#[from] FuzzyError),
}
