//! Utilities over flattened (x, y) point lists. Lists produced by leaf
//! assessment come as interval couples: consecutive pairs of points that
//! belong to the same output segment and must move together.

use crate::math::{fuzzy_eq, TOLERANCE};

pub(crate) fn sort_by_x(pts: &mut [(f64, f64)]) {
    pts.sort_by(|a, b| a.0.partial_cmp(&b.0).expect("not to find unsortable floats"));
}

/// Sorts a couple list by each couple's starting x, keeping couples intact.
pub(crate) fn sort_interval_couples(pts: &mut Vec<(f64, f64)>) {
    debug_assert!(pts.len() % 2 == 0);

    let mut couples: Vec<[(f64, f64); 2]> = pts.chunks_exact(2).map(|c| [c[0], c[1]]).collect();

    couples.sort_by(|a, b| {
        a[0].0
            .partial_cmp(&b[0].0)
            .expect("not to find unsortable floats")
    });

    *pts = couples.into_iter().flatten().collect();
}

/// Collapses runs of points sharing an x (within tolerance) into one point
/// carrying the largest y. Expects x-sorted input.
pub(crate) fn retain_largest_y(pts: &mut Vec<(f64, f64)>) {
    let mut out: Vec<(f64, f64)> = Vec::with_capacity(pts.len());

    for &(x, y) in pts.iter() {
        match out.last_mut() {
            Some(last) if fuzzy_eq(last.0, x) => last.1 = last.1.max(y),
            _ => out.push((x, y)),
        }
    }

    *pts = out;
}

/// Drops isolated points that sit at an x some couple already reaches with a
/// larger smallest y there.
pub(crate) fn drop_dominated(isolated: &mut Vec<(f64, f64)>, couples: &[(f64, f64)]) {
    isolated.retain(|&(x, y)| {
        let lowest = couples
            .iter()
            .filter(|p| fuzzy_eq(p.0, x))
            .map(|p| p.1)
            .fold(f64::INFINITY, f64::min);

        !(lowest.is_finite() && lowest > y)
    });
}

/// Splices isolated points into a couple list without breaking any couple:
/// insertion happens only at couple boundaries, walking the isolated points
/// from the largest x down. A point smaller than everything present is left
/// out.
pub(crate) fn splice_isolated(pts: &mut Vec<(f64, f64)>, isolated: &[(f64, f64)]) {
    for &p in isolated.iter().rev() {
        for i in (0..pts.len()).rev() {
            if pts[i].0 <= p.0 + TOLERANCE {
                if i % 2 == 1 {
                    pts.insert(i + 1, p);
                } else {
                    pts.insert(i, p);
                }
                break;
            }
        }
    }
}

/// Removes consecutive near-identical points.
pub(crate) fn dedup_neighbors(pts: &mut Vec<(f64, f64)>) {
    pts.dedup_by(|a, b| fuzzy_eq(a.0, b.0) && fuzzy_eq(a.1, b.1));
}
