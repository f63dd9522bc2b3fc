use slotmap::{new_key_type, SlotMap};
use tracing::debug;

use crate::combine;
use crate::error::GoalError;
use crate::fuzzy::{FuzzyBoolean, FuzzyNumber};
use crate::leaf;

new_key_type! {
    /// A goal node key
    pub struct GoalKey;
}

/// How a leaf's satisfaction relates to the measured quantity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LeafKind {
    /// Satisfaction grows with the quantity; the truth criterion must be
    /// monotonically increasing.
    LowerBound,
    /// Satisfaction falls with the quantity; the truth criterion must be
    /// monotonically decreasing.
    UpperBound,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogicOp {
    And,
    Or,
}

/// The half line the supremum ranges over when combining child results.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Direction {
    After,
    Before,
}

impl LogicOp {
    pub(crate) fn direction(self) -> Direction {
        match self {
            LogicOp::And => Direction::After,
            LogicOp::Or => Direction::Before,
        }
    }
}

pub enum GoalNode {
    Leaf {
        kind: LeafKind,
        truth: FuzzyNumber,
        observation: Option<FuzzyNumber>,
    },
    Internal {
        op: LogicOp,
        children: Vec<GoalKey>,
    },
}

/// A goal model: leaves carrying truth criteria and observations, combined
/// by AND/OR intermediate goals.
#[derive(Default)]
pub struct GoalTree {
    nodes: SlotMap<GoalKey, GoalNode>,
}

impl GoalTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a leaf goal. The truth criterion's shape must match the kind.
    pub fn leaf(&mut self, kind: LeafKind, truth: FuzzyNumber) -> Result<GoalKey, GoalError> {
        let well_shaped = match kind {
            LeafKind::LowerBound => truth.function().is_monotonically_increasing(),
            LeafKind::UpperBound => truth.function().is_monotonically_decreasing(),
        };

        if !well_shaped {
            return Err(GoalError::TruthShape(kind));
        }

        Ok(self.nodes.insert(GoalNode::Leaf {
            kind,
            truth,
            observation: None,
        }))
    }

    pub fn leaf_with_observation(
        &mut self,
        kind: LeafKind,
        truth: FuzzyNumber,
        observation: FuzzyNumber,
    ) -> Result<GoalKey, GoalError> {
        let key = self.leaf(kind, truth)?;

        self.set_observation(key, observation)?;

        Ok(key)
    }

    pub fn internal(&mut self, op: LogicOp) -> GoalKey {
        self.nodes.insert(GoalNode::Internal {
            op,
            children: Vec::new(),
        })
    }

    /// Appends a child to an intermediate goal. Children are combined in
    /// insertion order.
    pub fn add_child(&mut self, parent: GoalKey, child: GoalKey) -> Result<(), GoalError> {
        if parent == child {
            return Err(GoalError::SelfChild);
        }
        if !self.nodes.contains_key(child) {
            return Err(GoalError::UnknownGoal);
        }

        match self.nodes.get_mut(parent) {
            Some(GoalNode::Internal { children, .. }) => {
                children.push(child);
                Ok(())
            }
            Some(_) => Err(GoalError::NotAnIntermediateGoal),
            None => Err(GoalError::UnknownGoal),
        }
    }

    /// Records or replaces a leaf's observation; assessment can then be
    /// repeated with fresh data.
    pub fn set_observation(
        &mut self,
        leaf: GoalKey,
        observation: FuzzyNumber,
    ) -> Result<(), GoalError> {
        match self.nodes.get_mut(leaf) {
            Some(GoalNode::Leaf { observation: slot, .. }) => {
                *slot = Some(observation);
                Ok(())
            }
            Some(_) => Err(GoalError::NotALeafGoal),
            None => Err(GoalError::UnknownGoal),
        }
    }

    pub fn node(&self, key: GoalKey) -> Option<&GoalNode> {
        self.nodes.get(key)
    }

    /// Assesses the satisfaction of a goal from its leaves up. Children of
    /// an intermediate goal are combined pairwise, left to right.
    pub fn assess(&self, goal: GoalKey) -> Result<FuzzyBoolean, GoalError> {
        match self.nodes.get(goal) {
            None => Err(GoalError::UnknownGoal),
            Some(GoalNode::Leaf {
                kind,
                truth,
                observation,
            }) => {
                let observation = observation.as_ref().ok_or(GoalError::MissingObservation)?;

                leaf::satisfaction(*kind, truth, observation)
            }
            Some(GoalNode::Internal { op, children }) => {
                debug!(?op, children = children.len(), "assessing intermediate goal");

                let mut iter = children.iter();
                let first = iter.next().ok_or(GoalError::NoChildren)?;
                let mut acc = self.assess(*first)?;

                for &child in iter {
                    let next = self.assess(child)?;

                    acc = combine::combine(*op, &acc, &next)?;
                }

                Ok(acc)
            }
        }
    }
}
