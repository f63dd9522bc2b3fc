//! AND/OR combination of child satisfaction results. For child results F1
//! and F2 the combined truth value at a probe degree p is
//!
//!   max( min(F1(p), sup F2 over D(p)), min(F2(p), sup F1 over D(p)) )
//!
//! where D(p) is [p, 1] for And (sup-min composition) and [0, p] for Or
//! (sup-max composition).

use tracing::{debug, trace};

use crate::error::{FunctionError, GoalError};
use crate::function::PiecewiseLinear;
use crate::fuzzy::FuzzyBoolean;
use crate::goal::{Direction, LogicOp};
use crate::math::merge_unique;
use crate::points;

pub(crate) fn combine(
    op: LogicOp,
    f1: &FuzzyBoolean,
    f2: &FuzzyBoolean,
) -> Result<FuzzyBoolean, GoalError> {
    debug!(?op, "combining child results");

    let dir = op.direction();
    let g1 = f1.function();
    let g2 = f2.function();

    // Kinks of the combined function can only sit at a child breakpoint or
    // where the children's graphs cross.
    let breaks = merge_unique(g1.x_points(), g2.x_points());
    let probes = merge_unique(breaks, g1.find_intersections(g2)?);

    let mut pts: Vec<(f64, f64)> = Vec::new();

    for &p in &probes {
        let mins1 = side_minimums(g1, g2, p, dir)?;
        let mins2 = side_minimums(g2, g1, p, dir)?;

        trace!(p, ?mins1, ?mins2, "combination probe");

        let n = mins1.len().max(mins2.len());
        for i in 0..n {
            let a = mins1[i.min(mins1.len() - 1)];
            let b = mins2[i.min(mins2.len() - 1)];

            pts.push((p, a.max(b)));
        }
    }

    points::sort_by_x(&mut pts);

    Ok(FuzzyBoolean::new(
        PiecewiseLinear::from_points(pts).simplify(),
    )?)
}

/// Minima of one child's values at p against the other child's one-sided
/// supremum. At a discontinuity the value adjacent to the sup region (the
/// last one for After, the first one for Before) pairs with the supremum
/// seeded by only that limit value.
fn side_minimums(
    f: &PiecewiseLinear,
    other: &PiecewiseLinear,
    p: f64,
    dir: Direction,
) -> Result<Vec<f64>, FunctionError> {
    let sup = one_sided_sup(other, p, dir, false)?;
    let values = f.values_at(p)?;
    let mut mins: Vec<f64> = values.iter().map(|&v| v.min(sup)).collect();

    if mins.len() > 1 {
        let sup_limit = one_sided_sup(other, p, dir, true)?;

        match dir {
            Direction::After => {
                let i = mins.len() - 1;

                mins[i] = values[i].min(sup_limit);
            }
            Direction::Before => mins[0] = values[0].min(sup_limit),
        }
    }

    Ok(mins)
}

fn one_sided_sup(
    f: &PiecewiseLinear,
    p: f64,
    dir: Direction,
    limit_only: bool,
) -> Result<f64, FunctionError> {
    match dir {
        Direction::After => f.largest_value_after(p, limit_only),
        Direction::Before => f.largest_value_before(p, limit_only),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fuzzy::FuzzyNumber;
    use crate::goal::LeafKind;
    use crate::leaf;

    /// Upper-bound leaf whose truth criterion has a plateau at 0.5, so its
    /// result carries a jump there; the observation is a triangle rising
    /// from `start`, peaking at `peak` and back to zero at `finish`.
    fn plateau_leaf(start: f64, peak: f64, finish: f64) -> FuzzyBoolean {
        let truth = FuzzyNumber::from_points([
            (0.0, 1.0),
            (0.5, 1.0),
            (1.0, 0.5),
            (1.5, 0.5),
            (2.0, 0.0),
            (6.0, 0.0),
        ])
        .unwrap();
        let obs = FuzzyNumber::from_points([
            (0.0, 0.0),
            (start, 0.0),
            (peak, 1.0),
            (finish, 0.0),
            (6.0, 0.0),
        ])
        .unwrap();

        leaf::satisfaction(LeafKind::UpperBound, &truth, &obs).unwrap()
    }

    /// Upper-bound leaf with a plain decreasing truth criterion and a
    /// triangular observation centered on `top`.
    fn triangular_leaf(top: f64, width: f64) -> FuzzyBoolean {
        let truth =
            FuzzyNumber::from_points([(0.0, 1.0), (1.0, 0.0), (6.0, 0.0)]).unwrap();
        let obs = FuzzyNumber::from_points([
            (0.0, 0.0),
            (top - width / 2.0, 0.0),
            (top, 1.0),
            (top + width / 2.0, 0.0),
            (6.0, 0.0),
        ])
        .unwrap();

        leaf::satisfaction(LeafKind::UpperBound, &truth, &obs).unwrap()
    }

    fn assert_points(actual: &[(f64, f64)], expected: &[(f64, f64)]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!(
                (a.0 - e.0).abs() < 1e-4 && (a.1 - e.1).abs() < 1e-4,
                "{actual:?} vs {expected:?}"
            );
        }
    }

    #[test]
    fn and_with_a_more_satisfied_component() {
        let jumpy = plateau_leaf(0.9, 1.1, 4.0);
        let smooth = triangular_leaf(0.8, 0.2);

        let result = combine(LogicOp::And, &jumpy, &smooth).unwrap();

        assert_points(
            &result.datapoints(),
            &[
                (0.0, 0.689_655),
                (0.175, 0.75),
                (0.2, 1.0),
                (0.3, 0.0),
                (1.0, 0.0),
            ],
        );
    }

    #[test]
    fn and_is_commutative() {
        let jumpy = plateau_leaf(0.9, 1.1, 4.0);
        let smooth = triangular_leaf(0.8, 0.2);

        let a = combine(LogicOp::And, &jumpy, &smooth).unwrap();
        let b = combine(LogicOp::And, &smooth, &jumpy).unwrap();

        assert_points(&a.datapoints(), &b.datapoints());
    }

    #[test]
    fn and_of_two_jumpy_components_keeps_the_triple_point() {
        let a = plateau_leaf(0.9, 1.1, 4.0);
        let b = plateau_leaf(0.95, 1.1, 3.0);

        let result = combine(LogicOp::And, &a, &b).unwrap();

        assert_points(
            &result.datapoints(),
            &[
                (0.0, 0.689_655),
                (0.5, 0.862_069),
                (0.5, 1.0),
                (0.5, 0.333_333),
                (0.55, 0.0),
                (1.0, 0.0),
            ],
        );
    }

    #[test]
    fn or_with_a_more_satisfied_component() {
        let jumpy = plateau_leaf(0.9, 1.1, 4.0);
        let smooth = triangular_leaf(0.8, 0.2);

        let result = combine(LogicOp::Or, &jumpy, &smooth).unwrap();

        assert_points(
            &result.datapoints(),
            &[
                (0.0, 0.0),
                (0.1, 0.0),
                (0.175, 0.75),
                (0.5, 0.862_069),
                (0.5, 1.0),
                (0.5, 0.5),
                (0.6, 0.0),
                (1.0, 0.0),
            ],
        );
    }

    #[test]
    fn or_of_two_jumpy_components() {
        let a = plateau_leaf(0.9, 1.1, 4.0);
        let b = plateau_leaf(0.95, 1.1, 3.0);

        let result = combine(LogicOp::Or, &a, &b).unwrap();

        assert_points(
            &result.datapoints(),
            &[
                (0.0, 0.526_316),
                (0.5, 0.789_474),
                (0.5, 1.0),
                (0.5, 0.5),
                (0.6, 0.0),
                (1.0, 0.0),
            ],
        );
    }

    #[test]
    fn or_is_commutative() {
        let a = plateau_leaf(0.9, 1.1, 4.0);
        let b = plateau_leaf(0.95, 1.1, 3.0);

        let forward = combine(LogicOp::Or, &a, &b).unwrap();
        let backward = combine(LogicOp::Or, &b, &a).unwrap();

        assert_points(&forward.datapoints(), &backward.datapoints());
    }
}
