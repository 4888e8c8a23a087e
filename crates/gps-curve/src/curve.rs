//! The Bezier curve generator.

use std::ops::BitOr;

use gps_core::{CoreError, CoreResult, SeededRng, Snapshot};
use serde::{Deserialize, Serialize};

use crate::{CurveError, CurveResult};

// ── CurveMode ─────────────────────────────────────────────────────────────────

/// Bitmask controlling which control points are pinned to the floor value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CurveMode(u8);

impl CurveMode {
    /// Every control point is random.
    pub const DEFAULT: CurveMode = CurveMode(0);
    /// The first control point is pinned to `min`, so `point(0).y == min`.
    pub const MIN_START: CurveMode = CurveMode(1);
    /// The last control point is pinned to `min`, so `point(1).y == min`.
    pub const MIN_END: CurveMode = CurveMode(1 << 1);

    const ALL: u8 = Self::MIN_START.0 | Self::MIN_END.0;

    #[inline]
    pub fn contains(self, other: CurveMode) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Build from raw bits; unknown bits are rejected.
    pub fn from_bits(bits: u8) -> Option<CurveMode> {
        (bits & !Self::ALL == 0).then_some(CurveMode(bits))
    }
}

impl BitOr for CurveMode {
    type Output = CurveMode;
    fn bitor(self, rhs: CurveMode) -> CurveMode {
        CurveMode(self.0 | rhs.0)
    }
}

// ── Points ────────────────────────────────────────────────────────────────────

/// A point in curve space: `x` is the control-point axis, `y` the value.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub x: f64,
    pub y: f64,
}

impl CurvePoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    #[inline]
    fn scale(self, k: f64) -> CurvePoint {
        CurvePoint { x: self.x * k, y: self.y * k }
    }

    #[inline]
    fn add(self, other: CurvePoint) -> CurvePoint {
        CurvePoint { x: self.x + other.x, y: self.y + other.y }
    }
}

/// One control point: the raw value `(i, y)` and the same point scaled by its
/// binomial weight `C(n - 1, i)`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub value:    CurvePoint,
    pub weighted: CurvePoint,
}

// ── Curve ─────────────────────────────────────────────────────────────────────

/// Curves with up to this many control points evaluate without allocating.
const INLINE_TERMS: usize = 32;

/// A bounded, re-generatable Bezier curve.
///
/// Invariant: `MIN_AMPLITUDE <= points.len() <= MAX_AMPLITUDE` and
/// `min <= max`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Curve {
    min:    f64,
    max:    f64,
    mode:   CurveMode,
    points: Vec<ControlPoint>,
}

impl Curve {
    pub const MIN_AMPLITUDE: usize = 4;
    pub const MAX_AMPLITUDE: usize = 512;

    /// Create a curve with `amplitude` control points drawn from `[min, max]`.
    pub fn new(
        min:       f64,
        max:       f64,
        amplitude: usize,
        mode:      CurveMode,
        rng:       &mut SeededRng,
    ) -> CurveResult<Self> {
        check_params(min, max, amplitude)?;
        let mut curve = Curve {
            min,
            max,
            mode,
            points: vec![ControlPoint::default(); amplitude],
        };
        curve.shuffle(rng);
        Ok(curve)
    }

    /// Redraw every control point (respecting `mode`) and recompute weights.
    /// The point buffer is reused.
    pub fn shuffle(&mut self, rng: &mut SeededRng) {
        let last = self.points.len() - 1;
        for i in 0..=last {
            let pinned = (i == 0 && self.mode.contains(CurveMode::MIN_START))
                || (i == last && self.mode.contains(CurveMode::MIN_END));
            let y = if pinned || self.min == self.max {
                self.min
            } else {
                rng.gen_range(self.min..=self.max)
            };
            self.points[i].value = CurvePoint::new(i as f64, y);
        }
        self.weigh();
    }

    /// Binomial weights via the recurrence `w_0 = 1`, `w_i = w_{i-1} * (n - i) / i`.
    fn weigh(&mut self) {
        let n = self.points.len();
        let mut w = 1.0;
        for i in 0..n {
            if i > 0 {
                w = w * (n - i) as f64 / i as f64;
            }
            let cp = &mut self.points[i];
            cp.weighted = cp.value.scale(w);
        }
    }

    /// Evaluate the curve at `t` (clamped to `[0, 1]`).
    ///
    /// Terms `weighted_i * t^i` are accumulated left to right, then folded
    /// from the last point backward with ascending powers of `(1 - t)`.  Keep
    /// the operation order: seeded runs are reproduced bit for bit.  `y` is
    /// clamped into `[min, max]` to absorb rounding.
    pub fn point(&self, t: f64) -> CurvePoint {
        let t = t.clamp(0.0, 1.0);
        let n = self.points.len();
        if n <= INLINE_TERMS {
            let mut terms = [CurvePoint::default(); INLINE_TERMS];
            self.eval(t, &mut terms[..n])
        } else {
            self.eval(t, &mut vec![CurvePoint::default(); n])
        }
    }

    /// Evaluate at `t` using `terms` (one slot per control point) as scratch.
    fn eval(&self, t: f64, terms: &mut [CurvePoint]) -> CurvePoint {
        let mut pt = 1.0;
        for (term, cp) in terms.iter_mut().zip(&self.points) {
            *term = cp.weighted.scale(pt);
            pt *= t;
        }

        let mut res = CurvePoint::default();
        let mut ot = 1.0;
        for term in terms.iter().rev() {
            res = res.add(term.scale(ot));
            ot *= 1.0 - t;
        }

        res.y = res.y.clamp(self.min, self.max);
        res
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    #[inline]
    pub fn mode(&self) -> CurveMode {
        self.mode
    }

    /// Number of control points (the amplitude).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`: a curve has at least `MIN_AMPLITUDE` points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }
}

impl Snapshot for Curve {
    fn validate(&self) -> CoreResult<()> {
        check_params(self.min, self.max, self.points.len())
            .map_err(|e| CoreError::Snapshot(e.to_string()))?;
        if CurveMode::from_bits(self.mode.bits()).is_none() {
            return Err(CoreError::Snapshot(format!("unknown curve mode {:#04b}", self.mode.bits())));
        }
        Ok(())
    }
}

fn check_params(min: f64, max: f64, amplitude: usize) -> CurveResult<()> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(CurveError::InvalidRange { min, max });
    }
    if !(Curve::MIN_AMPLITUDE..=Curve::MAX_AMPLITUDE).contains(&amplitude) {
        return Err(CurveError::InvalidAmplitude(amplitude));
    }
    Ok(())
}
