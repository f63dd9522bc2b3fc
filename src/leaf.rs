//! Leaf goal assessment through the extension principle: the satisfaction
//! of a leaf is the fuzzy truth value B(y) = sup { O(x) : T(x) = y } for
//! truth criterion T and fuzzy observation O. Both functions must cover the
//! same measurement range.

use tracing::{debug, trace};

use crate::error::GoalError;
use crate::function::PiecewiseLinear;
use crate::fuzzy::{FuzzyBoolean, FuzzyNumber};
use crate::goal::LeafKind;
use crate::math::{fuzzy_eq, merge_unique};
use crate::points;

pub(crate) fn satisfaction(
    kind: LeafKind,
    truth: &FuzzyNumber,
    observation: &FuzzyNumber,
) -> Result<FuzzyBoolean, GoalError> {
    debug!(?kind, "assessing leaf goal");

    let xs = merge_unique(
        truth.function().x_points(),
        observation.function().x_points(),
    );

    // The truth criterion is linear inside every cell of the partition, so
    // each cell maps to one output segment. Constant-truth cells collapse to
    // a single satisfaction degree and are handled as isolated points.
    let mut couples: Vec<(f64, f64)> = Vec::new();
    let mut isolated: Vec<(f64, f64)> = Vec::new();

    for w in xs.windows(2) {
        let [low, high] = cell_result(kind, truth, observation, w[0], w[1])?;

        trace!(left = w[0], right = w[1], ?low, ?high, "cell result");

        if fuzzy_eq(low.0, high.0) {
            isolated.push(low);
            isolated.push(high);
        } else {
            couples.push(low);
            couples.push(high);
        }
    }

    points::sort_interval_couples(&mut couples);
    points::sort_by_x(&mut isolated);
    points::retain_largest_y(&mut isolated);
    points::drop_dominated(&mut isolated, &couples);
    points::splice_isolated(&mut couples, &isolated);
    points::dedup_neighbors(&mut couples);

    Ok(FuzzyBoolean::new(PiecewiseLinear::from_points(couples))?)
}

/// The output segment of one partition cell: the observation evaluated at
/// the x values the truth segment's inverse assigns to the cell's extreme
/// satisfaction degrees. Degrees 0 and 1 pin the inversion to the cell end
/// the kind dictates.
fn cell_result(
    kind: LeafKind,
    truth: &FuzzyNumber,
    observation: &FuzzyNumber,
    left: f64,
    right: f64,
) -> Result<[(f64, f64); 2], GoalError> {
    let y_left = truth.function().value_at(left)?;
    let y_right = truth.function().value_at(right)?;
    let (min_y, max_y) = if y_left <= y_right {
        (y_left, y_right)
    } else {
        (y_right, y_left)
    };

    let mut segment = PiecewiseLinear::new();
    segment.add_point(left, y_left);
    segment.add_point(right, y_right);
    let inverse = segment.inverse()?;

    let x_for_min = if fuzzy_eq(min_y, 0.0) {
        match kind {
            LeafKind::LowerBound => left,
            LeafKind::UpperBound => right,
        }
    } else {
        inverse.value_at(min_y)?
    };
    let x_for_max = if fuzzy_eq(max_y, 1.0) {
        match kind {
            LeafKind::LowerBound => right,
            LeafKind::UpperBound => left,
        }
    } else {
        inverse.value_at(max_y)?
    };

    let o = observation.function();

    Ok([(min_y, o.value_at(x_for_min)?), (max_y, o.value_at(x_for_max)?)])
}
