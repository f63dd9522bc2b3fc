use num::Float;

/// Tolerance used for every coordinate comparison in the crate.
pub(crate) const TOLERANCE: f64 = 1e-4;

pub(crate) fn fuzzy_eq<F: Float>(a: F, b: F) -> bool {
    let tol = F::from(TOLERANCE).expect("tolerance to be representable");

    (a - b).abs() <= tol
}

/// Value of the segment between `left` and `right` at `x`. A zero-width
/// segment is a jump; its value is the landing (right) endpoint.
pub(crate) fn segment_y(left: (f64, f64), right: (f64, f64), x: f64) -> f64 {
    let ((x1, y1), (x2, y2)) = (left, right);

    if fuzzy_eq(x1, x2) {
        return y2;
    }

    y1 + (x - x1) * (y2 - y1) / (x2 - x1)
}

/// Merges two x coordinate collections into one ascending list without
/// near-duplicates.
pub(crate) fn merge_unique(
    a: impl IntoIterator<Item = f64>,
    b: impl IntoIterator<Item = f64>,
) -> Vec<f64> {
    let mut xs: Vec<f64> = a.into_iter().chain(b).collect();

    xs.sort_unstable_by(|a, b| a.partial_cmp(b).expect("not to find unsortable floats"));
    xs.dedup_by(|a, b| fuzzy_eq(*a, *b));
    xs
}

#[test]
fn test_fuzzy_eq() {
    assert!(fuzzy_eq(0.5, 0.500_05));
    assert!(!fuzzy_eq(0.5, 0.501));
    assert!(fuzzy_eq(1.0f32, 1.000_05f32));
}

#[test]
fn test_segment_y() {
    assert_eq!(segment_y((0., 0.), (2., 1.), 1.), 0.5);
    // Jump at x = 1 lands on the last value
    assert_eq!(segment_y((1., 0.3), (1., 0.9), 1.), 0.9);
}

#[test]
fn test_merge_unique() {
    let merged = merge_unique([0., 1., 2.], [0.5, 1.000_01, 3.]);

    assert_eq!(merged, vec![0., 0.5, 1., 2., 3.]);
}
