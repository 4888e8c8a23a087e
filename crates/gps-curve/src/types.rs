//! Typed curve wrappers: `(min, max, current value, curve)`.
//!
//! `next(t)` re-evaluates the curve at the lap-completion ratio `t` and stores
//! the result.  Wrappers never own an RNG; shuffling takes one explicitly.

use gps_core::{CoreError, CoreResult, SensorId, SeededRng, Snapshot};
use serde::{Deserialize, Serialize};

use crate::{Curve, CurveError, CurveMode, CurvePoint, CurveResult};

// ── Speed ─────────────────────────────────────────────────────────────────────

/// Ground speed in metres per second.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Speed {
    curve: Curve,
    value: f64,
}

impl Speed {
    pub fn new(min: f64, max: f64, amplitude: usize, rng: &mut SeededRng) -> CurveResult<Self> {
        if min < 0.0 {
            return Err(CurveError::Negative { what: "speed", value: min });
        }
        let curve = Curve::new(min, max, amplitude, CurveMode::DEFAULT, rng)?;
        let value = curve.point(0.0).y;
        Ok(Self { curve, value })
    }

    pub fn next(&mut self, t: f64) -> f64 {
        self.value = self.curve.point(t).y;
        self.value
    }

    pub fn shuffle(&mut self, rng: &mut SeededRng) {
        self.curve.shuffle(rng);
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.curve.min()
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.curve.max()
    }

    /// Midpoint of the range; used to estimate how long a lap takes.
    #[inline]
    pub fn average(&self) -> f64 {
        (self.curve.min() + self.curve.max()) * 0.5
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }
}

// ── Battery ───────────────────────────────────────────────────────────────────

/// Battery charge in percent.  The curve ends pinned to `min`, so the charge
/// drains to its floor by the end of every lap.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Battery {
    curve: Curve,
    value: f64,
}

impl Battery {
    pub fn new(min: f64, max: f64, amplitude: usize, rng: &mut SeededRng) -> CurveResult<Self> {
        if !(0.0..=100.0).contains(&min) || !(0.0..=100.0).contains(&max) {
            return Err(CurveError::BatteryRange { min, max });
        }
        let curve = Curve::new(min, max, amplitude, CurveMode::MIN_END, rng)?;
        let value = curve.point(0.0).y;
        Ok(Self { curve, value })
    }

    pub fn next(&mut self, t: f64) -> f64 {
        self.value = self.curve.point(t).y;
        self.value
    }

    pub fn shuffle(&mut self, rng: &mut SeededRng) {
        self.curve.shuffle(rng);
    }

    #[inline]
    pub fn value(&self) -> f64 {
        self.value
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.curve.min()
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.curve.max()
    }

    /// `true` once the charge is within 1 % of the span above the floor.
    pub fn is_low(&self) -> bool {
        let span = self.curve.max() - self.curve.min();
        self.value <= self.curve.min() + span * 0.01
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }
}

// ── Sensor ────────────────────────────────────────────────────────────────────

/// An arbitrary named scalar sensor.  Keeps the full curve point, so both
/// the curve-axis position `x` and the reading `y` are observable.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Sensor {
    id:    SensorId,
    name:  String,
    curve: Curve,
    value: CurvePoint,
}

impl Sensor {
    pub fn new(
        name:      impl Into<String>,
        min:       f64,
        max:       f64,
        amplitude: usize,
        mode:      CurveMode,
        rng:       &mut SeededRng,
    ) -> CurveResult<Self> {
        let curve = Curve::new(min, max, amplitude, mode, rng)?;
        let value = curve.point(0.0);
        Ok(Self { id: SensorId::random(rng), name: name.into(), curve, value })
    }

    pub fn next(&mut self, t: f64) -> CurvePoint {
        self.value = self.curve.point(t);
        self.value
    }

    pub fn shuffle(&mut self, rng: &mut SeededRng) {
        self.curve.shuffle(rng);
    }

    #[inline]
    pub fn id(&self) -> SensorId {
        self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> CurvePoint {
        self.value
    }

    #[inline]
    pub fn value_x(&self) -> f64 {
        self.value.x
    }

    #[inline]
    pub fn value_y(&self) -> f64 {
        self.value.y
    }

    #[inline]
    pub fn min(&self) -> f64 {
        self.curve.min()
    }

    #[inline]
    pub fn max(&self) -> f64 {
        self.curve.max()
    }

    #[inline]
    pub fn mode(&self) -> CurveMode {
        self.curve.mode()
    }

    pub fn curve(&self) -> &Curve {
        &self.curve
    }
}

impl Snapshot for Sensor {
    fn validate(&self) -> CoreResult<()> {
        self.curve.validate()?;
        if self.name.is_empty() {
            return Err(CoreError::Snapshot("sensor without a name".into()));
        }
        Ok(())
    }
}
