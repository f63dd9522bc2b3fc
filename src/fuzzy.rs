use crate::error::FuzzyError;
use crate::function::PiecewiseLinear;
use crate::math::fuzzy_eq;

fn is_fuzzy_shaped(function: &PiecewiseLinear) -> bool {
    let (Some(max), Some(min)) = (function.max_y(), function.min_y()) else {
        return false;
    };

    fuzzy_eq(max, 1.0)
        && fuzzy_eq(min, 0.0)
        && function.increasing_until_top()
        && function.decreasing_from_top()
}

/// A membership function validated to be fuzzy-number shaped: it reaches 1,
/// bottoms out at 0, never decreases before the top and never increases
/// after it.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyNumber {
    function: PiecewiseLinear,
}

impl FuzzyNumber {
    pub fn new(function: PiecewiseLinear) -> Result<Self, FuzzyError> {
        if !is_fuzzy_shaped(&function) {
            return Err(FuzzyError::NotAFuzzyNumber(function.datapoints()));
        }

        Ok(Self { function })
    }

    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Result<Self, FuzzyError> {
        Self::new(PiecewiseLinear::from_points(points))
    }

    pub fn function(&self) -> &PiecewiseLinear {
        &self.function
    }

    pub fn into_function(self) -> PiecewiseLinear {
        self.function
    }

    pub fn datapoints(&self) -> Vec<(f64, f64)> {
        self.function.datapoints()
    }

    /// The interval outside which membership is zero: the last x at 0 before
    /// the rise and the first x back at 0 after the fall. Domain endpoints
    /// stand in when a transition does not occur.
    pub fn support(&self) -> (f64, f64) {
        let pts = self.function.datapoints();

        let mut left = pts[0].0;
        let right = pts[pts.len() - 1].0;

        for w in pts.windows(2) {
            let (prev, p) = (w[0], w[1]);

            if fuzzy_eq(prev.1, 0.0) && p.1 > 0.0 {
                left = prev.0;
            }
            if prev.1 > 0.0 && fuzzy_eq(p.1, 0.0) {
                return (left, p.0);
            }
        }

        (left, right)
    }

    /// The interval where membership is 1.
    pub fn core(&self) -> Result<(f64, f64), FuzzyError> {
        let pts = self.function.datapoints();

        let mut left = None;
        let mut right = None;

        for &(x, y) in &pts {
            if fuzzy_eq(y, 1.0) {
                if left.is_none() {
                    left = Some(x);
                }
                right = Some(x);
            }
        }

        match (left, right) {
            (Some(l), Some(r)) => Ok((l, r)),
            _ => Err(FuzzyError::MissingCore),
        }
    }
}

/// A fuzzy truth value: a fuzzy number over the satisfaction degree domain
/// [0, 1], as produced by goal assessment.
#[derive(Clone, Debug, PartialEq)]
pub struct FuzzyBoolean(FuzzyNumber);

impl FuzzyBoolean {
    /// Wraps a satisfaction function. The shape requirements are the fuzzy
    /// number ones minus the zero minimum: an observation spanning the whole
    /// tolerated region is assessed as 1 everywhere.
    pub fn new(function: PiecewiseLinear) -> Result<Self, FuzzyError> {
        let well_shaped = function.max_y().is_some_and(|max| fuzzy_eq(max, 1.0))
            && function.increasing_until_top()
            && function.decreasing_from_top();

        if !well_shaped {
            return Err(FuzzyError::NotAFuzzyNumber(function.datapoints()));
        }

        Ok(Self(FuzzyNumber { function }))
    }

    pub fn function(&self) -> &PiecewiseLinear {
        self.0.function()
    }

    pub fn datapoints(&self) -> Vec<(f64, f64)> {
        self.0.datapoints()
    }

    pub fn as_fuzzy_number(&self) -> &FuzzyNumber {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_triangular_and_trapezoidal_numbers() {
        assert!(FuzzyNumber::from_points([(0.0, 0.0), (0.7, 1.0), (0.9, 0.0)]).is_ok());
        assert!(FuzzyNumber::from_points([
            (0.0, 0.0),
            (10.0, 0.0),
            (13.0, 1.0),
            (17.0, 1.0),
            (19.0, 0.0),
            (22.0, 0.0),
        ])
        .is_ok());
    }

    #[test]
    fn accepts_a_number_starting_at_the_top() {
        assert!(FuzzyNumber::from_points([(0.0, 1.0), (0.03, 0.0), (1.2, 0.0)]).is_ok());
    }

    #[test]
    fn rejects_functions_that_never_reach_the_top() {
        let err = FuzzyNumber::from_points([(0.0, 0.0), (0.5, 0.8), (1.0, 0.0)]);

        assert!(matches!(err, Err(FuzzyError::NotAFuzzyNumber(_))));
    }

    #[test]
    fn rejects_a_rebound_after_the_top() {
        let err = FuzzyNumber::from_points([
            (0.0, 0.0),
            (0.5, 1.0),
            (0.7, 0.2),
            (0.9, 0.5),
            (1.0, 0.0),
        ]);

        assert!(matches!(err, Err(FuzzyError::NotAFuzzyNumber(_))));
    }

    #[test]
    fn a_constant_one_verdict_is_a_valid_boolean() {
        let verdict =
            FuzzyBoolean::new(PiecewiseLinear::from_points([(0.0, 1.0), (1.0, 1.0)])).unwrap();

        assert_eq!(verdict.as_fuzzy_number().core().unwrap(), (0.0, 1.0));
        assert!(FuzzyNumber::from_points([(0.0, 1.0), (1.0, 1.0)]).is_err());
    }

    #[test]
    fn rejects_membership_above_one() {
        let err = FuzzyNumber::from_points([(0.0, 0.0), (0.5, 1.3), (1.0, 0.0)]);

        assert!(matches!(err, Err(FuzzyError::NotAFuzzyNumber(_))));
    }

    #[test]
    fn rejects_a_dip_before_the_top() {
        let err = FuzzyNumber::from_points([(0.0, 0.0), (0.3, 0.5), (0.5, 0.2), (0.7, 1.0), (1.0, 0.0)]);

        assert!(matches!(err, Err(FuzzyError::NotAFuzzyNumber(_))));
    }

    #[test]
    fn support_brackets_the_positive_region() {
        let n = FuzzyNumber::from_points([
            (0.0, 0.0),
            (10.0, 0.0),
            (13.0, 1.0),
            (17.0, 1.0),
            (19.0, 0.0),
            (22.0, 0.0),
        ])
        .unwrap();

        assert_eq!(n.support(), (10.0, 19.0));
    }

    #[test]
    fn support_falls_back_to_domain_endpoints() {
        let n = FuzzyNumber::from_points([(0.0, 1.0), (0.03, 0.0), (1.2, 0.0)]).unwrap();

        assert_eq!(n.support(), (0.0, 0.03));
    }

    #[test]
    fn core_spans_the_top_plateau() {
        let n = FuzzyNumber::from_points([
            (0.0, 0.0),
            (10.0, 0.0),
            (13.0, 1.0),
            (17.0, 1.0),
            (19.0, 0.0),
            (22.0, 0.0),
        ])
        .unwrap();

        assert_eq!(n.core().unwrap(), (13.0, 17.0));
    }
}
