use tracing::{trace, warn};

use crate::error::FunctionError;
use crate::math::{fuzzy_eq, merge_unique, segment_y, TOLERANCE};
use crate::points;

/// One domain point of a piecewise linear function. Several values recorded
/// at the same x encode a jump discontinuity, in recording order.
#[derive(Clone, Debug, PartialEq)]
pub struct Breakpoint {
    pub x: f64,
    pub ys: Vec<f64>,
}

impl Breakpoint {
    fn new(x: f64, y: f64) -> Self {
        Self { x, ys: vec![y] }
    }

    pub fn first_y(&self) -> f64 {
        self.ys[0]
    }

    pub fn last_y(&self) -> f64 {
        self.ys[self.ys.len() - 1]
    }

    fn min_y(&self) -> f64 {
        self.ys.iter().copied().fold(f64::INFINITY, f64::min)
    }

    fn max_y(&self) -> f64 {
        self.ys.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// A piecewise linear function kept as x-sorted breakpoints. Between
/// consecutive breakpoints the function interpolates from the last value of
/// the left one to the first value of the right one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PiecewiseLinear {
    breaks: Vec<Breakpoint>,
}

impl PiecewiseLinear {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_points(points: impl IntoIterator<Item = (f64, f64)>) -> Self {
        let mut f = Self::new();

        for (x, y) in points {
            f.add_point(x, y);
        }

        f
    }

    pub fn is_empty(&self) -> bool {
        self.breaks.is_empty()
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.breaks
    }

    pub fn x_points(&self) -> Vec<f64> {
        self.breaks.iter().map(|b| b.x).collect()
    }

    pub fn datapoints(&self) -> Vec<(f64, f64)> {
        self.breaks
            .iter()
            .flat_map(|b| b.ys.iter().map(|&y| (b.x, y)))
            .collect()
    }

    fn flat_ys(&self) -> Vec<f64> {
        self.breaks.iter().flat_map(|b| b.ys.iter().copied()).collect()
    }

    fn index_at(&self, x: f64) -> Option<usize> {
        let i = self.breaks.partition_point(|b| b.x < x - TOLERANCE);

        (i < self.breaks.len() && fuzzy_eq(self.breaks[i].x, x)).then_some(i)
    }

    /// Inserts a point keeping breakpoints x-sorted. A point at an already
    /// recorded x (within tolerance) extends that breakpoint's value list.
    pub fn add_point(&mut self, x: f64, y: f64) {
        let i = self.breaks.partition_point(|b| b.x < x - TOLERANCE);

        if i < self.breaks.len() && fuzzy_eq(self.breaks[i].x, x) {
            self.breaks[i].ys.push(y);
        } else {
            self.breaks.insert(i, Breakpoint::new(x, y));
        }
    }

    /// The function value at x. At a discontinuity this is the last recorded
    /// value, the one the right limit sees.
    pub fn value_at(&self, x: f64) -> Result<f64, FunctionError> {
        if let Some(i) = self.index_at(x) {
            return Ok(self.breaks[i].last_y());
        }

        let i = self.breaks.partition_point(|b| b.x < x);

        if i == 0 || i == self.breaks.len() {
            return Err(FunctionError::NoIntervalFound(x));
        }

        let left = &self.breaks[i - 1];
        let right = &self.breaks[i];

        Ok(segment_y((left.x, left.last_y()), (right.x, right.first_y()), x))
    }

    /// Every value recorded at x, in recording order; a single interpolated
    /// value when x is not a breakpoint.
    pub fn values_at(&self, x: f64) -> Result<Vec<f64>, FunctionError> {
        match self.index_at(x) {
            Some(i) => Ok(self.breaks[i].ys.clone()),
            None => Ok(vec![self.value_at(x)?]),
        }
    }

    pub fn is_discontinuous_at(&self, x: f64) -> bool {
        self.index_at(x).is_some_and(|i| self.breaks[i].ys.len() > 1)
    }

    /// Swaps coordinates of a two-point function. A horizontal segment turns
    /// into a single breakpoint whose last value is the right endpoint.
    pub fn inverse(&self) -> Result<PiecewiseLinear, FunctionError> {
        let pts = self.datapoints();

        let [(x1, y1), (x2, y2)] = pts[..] else {
            return Err(FunctionError::InverseUnsupported(pts.len()));
        };

        let mut inv = PiecewiseLinear::new();

        if y2 >= y1 {
            inv.add_point(y1, x1);
            inv.add_point(y2, x2);
        } else {
            inv.add_point(y2, x2);
            inv.add_point(y1, x1);
        }

        Ok(inv)
    }

    /// Supremum of the function on [p, +inf). With `right_limit_only` the
    /// contribution of p itself is only its last recorded value.
    pub fn largest_value_after(&self, p: f64, right_limit_only: bool) -> Result<f64, FunctionError> {
        let mut largest = match self.index_at(p) {
            Some(i) if right_limit_only => self.breaks[i].last_y(),
            Some(i) => self.breaks[i].max_y(),
            None => self.value_at(p)?,
        };

        for b in &self.breaks {
            if b.x > p + TOLERANCE {
                largest = largest.max(b.max_y());
            }
        }

        Ok(largest)
    }

    /// Supremum of the function on (-inf, p]. With `left_limit_only` the
    /// contribution of p itself is only its first recorded value.
    pub fn largest_value_before(&self, p: f64, left_limit_only: bool) -> Result<f64, FunctionError> {
        let mut largest = match self.index_at(p) {
            Some(i) if left_limit_only => self.breaks[i].first_y(),
            Some(i) => self.breaks[i].max_y(),
            None => self.value_at(p)?,
        };

        for b in &self.breaks {
            if b.x < p - TOLERANCE {
                largest = largest.max(b.max_y());
            }
        }

        Ok(largest)
    }

    /// Supremum on [left, right]. With `exclude_endpoints` the values
    /// recorded exactly at the endpoints are discarded and only their inner
    /// one-sided limits contribute.
    pub fn largest_value_between(
        &self,
        left: f64,
        right: f64,
        exclude_endpoints: bool,
    ) -> Result<f64, FunctionError> {
        let end = |x: f64, inner_limit: fn(&Breakpoint) -> f64| -> Result<f64, FunctionError> {
            match self.index_at(x) {
                Some(i) if exclude_endpoints => Ok(inner_limit(&self.breaks[i])),
                Some(i) => Ok(self.breaks[i].max_y()),
                None => self.value_at(x),
            }
        };

        let mut largest = end(left, Breakpoint::last_y)?.max(end(right, Breakpoint::first_y)?);

        for b in &self.breaks {
            if b.x > left + TOLERANCE && b.x < right - TOLERANCE {
                largest = largest.max(b.max_y());
            }
        }

        Ok(largest)
    }

    pub fn find_intersections(&self, other: &PiecewiseLinear) -> Result<Vec<f64>, FunctionError> {
        let segments = self.datapoints();

        if segments.is_empty() || other.is_empty() {
            return Ok(Vec::new());
        }
        if segments.len() == 1 {
            let (x, y) = segments[0];

            return Ok(other.values_at(x)?.iter().any(|&v| fuzzy_eq(v, y)).then_some(x).into_iter().collect());
        }

        let candidates = merge_unique(self.x_points(), other.x_points());
        let mut found = Vec::new();
        let mut c = 0;
        let mut seg_left = segments[0];
        let mut i = 1;

        while i < segments.len() && c + 1 < candidates.len() {
            let (left, right) = (candidates[c], candidates[c + 1]);
            let seg_right = segments[i];

            if let Some(x) = other.intersection_with_segment(left, right, seg_left, seg_right)? {
                trace!(x, "intersection found");
                found.push(x);
            }

            if right >= seg_right.0 {
                seg_left = seg_right;
                i += 1;
            } else {
                c += 1;
            }
        }

        Ok(found)
    }

    fn intersection_with_segment(
        &self,
        left: f64,
        right: f64,
        seg_left: (f64, f64),
        seg_right: (f64, f64),
    ) -> Result<Option<f64>, FunctionError> {
        let eff_left = left.max(seg_left.0);
        let eff_right = right.min(seg_right.0);

        if eff_right < eff_left {
            return Ok(None);
        }
        if fuzzy_eq(eff_left, eff_right) {
            return Ok(self
                .touches_at(eff_left, seg_left, seg_right)?
                .then_some(eff_left));
        }

        let mine_left = self.value_at(eff_left)?;
        let mine_right = self.value_at(eff_right)?;
        let seg_yl = segment_y(seg_left, seg_right, eff_left);
        let seg_yr = segment_y(seg_left, seg_right, eff_right);

        let crossing = (mine_left >= seg_yl && mine_right <= seg_yr)
            || (mine_left <= seg_yl && mine_right >= seg_yr);

        if !crossing {
            return Ok(None);
        }

        // Both sides are linear inside the effective interval.
        let s1 = (mine_right - mine_left) / (eff_right - eff_left);
        let s2 = (seg_right.1 - seg_left.1) / (seg_right.0 - seg_left.0);

        if (s2 - s1).abs() < f64::EPSILON {
            // Collinear overlap, report the interval end
            return Ok(Some(eff_right));
        }

        let b1 = mine_left - s1 * eff_left;
        let b2 = seg_left.1 - s2 * seg_left.0;

        Ok(Some((b1 - b2) / (s2 - s1)))
    }

    /// Zero-width overlap: the values (or the jump's value spread) must agree.
    fn touches_at(
        &self,
        x: f64,
        seg_left: (f64, f64),
        seg_right: (f64, f64),
    ) -> Result<bool, FunctionError> {
        if self.is_discontinuous_at(x) {
            let ys = self.values_at(x)?;
            let lo = ys.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = ys.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let y = segment_y(seg_left, seg_right, x);

            return Ok(y >= lo - TOLERANCE && y <= hi + TOLERANCE);
        }

        let mine = self.value_at(x)?;

        if fuzzy_eq(seg_left.0, seg_right.0) {
            let lo = seg_left.1.min(seg_right.1);
            let hi = seg_left.1.max(seg_right.1);

            return Ok(mine >= lo - TOLERANCE && mine <= hi + TOLERANCE);
        }

        Ok(fuzzy_eq(mine, segment_y(seg_left, seg_right, x)))
    }

    /// A canonical equivalent: adjacent duplicates removed, then interior
    /// points collinear with their neighbours removed. Idempotent.
    pub fn simplify(&self) -> PiecewiseLinear {
        let mut pts = self.datapoints();

        points::dedup_neighbors(&mut pts);

        let mut i = 2;
        while i < pts.len() {
            let (left, middle, right) = (pts[i - 2], pts[i - 1], pts[i]);

            if fuzzy_eq(segment_y(left, right, middle.0), middle.1) {
                pts.remove(i - 1);
            } else {
                i += 1;
            }
        }

        PiecewiseLinear::from_points(pts)
    }

    pub fn min_y(&self) -> Option<f64> {
        self.flat_ys().into_iter().reduce(f64::min)
    }

    pub fn max_y(&self) -> Option<f64> {
        self.flat_ys().into_iter().reduce(f64::max)
    }

    pub fn is_monotonically_increasing(&self) -> bool {
        self.flat_ys().windows(2).all(|w| w[1] >= w[0] - TOLERANCE)
    }

    pub fn is_monotonically_decreasing(&self) -> bool {
        self.flat_ys().windows(2).all(|w| w[1] <= w[0] + TOLERANCE)
    }

    /// True when values never decrease before the first one reaching 1.
    pub fn increasing_until_top(&self) -> bool {
        let ys = self.flat_ys();

        if ys.len() < 2 {
            return true;
        }

        let mut prev = ys[0];
        for &y in &ys[1..] {
            if prev >= 1.0 - TOLERANCE || y >= 1.0 - TOLERANCE {
                return true;
            }
            if prev > y + TOLERANCE {
                return false;
            }
            prev = y;
        }

        warn!(function = ?self.datapoints(), "no value reaches the top while checking monotonicity");
        true
    }

    /// True when values never increase after the first one reaching 1. The
    /// value right after the transition counts as well.
    pub fn decreasing_from_top(&self) -> bool {
        let ys = self.flat_ys();

        let mut top_reached = false;
        for w in ys.windows(2) {
            top_reached = top_reached || w[0] >= 1.0 - TOLERANCE;

            if top_reached && w[0] < w[1] - TOLERANCE {
                return false;
            }
        }

        true
    }
}
