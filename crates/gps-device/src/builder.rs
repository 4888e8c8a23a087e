//! Fluent builder for constructing a [`Device`].

use gps_core::{Color, DeviceId, Properties, SeededRng};
use gps_curve::{Battery, CurveMode, Sensor, Speed};
use gps_nav::{Navigator, NavigatorConfig};
use gps_path::Route;
use serde::{Deserialize, Serialize};

use crate::device::{
    check_description, check_model, check_sensor_count, check_sensor_name, check_user_id,
};
use crate::{Device, DeviceError, DeviceResult};

/// Range and shape of one named sensor.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorConfig {
    pub name:      String,
    pub min:       f64,
    pub max:       f64,
    /// Control-point count of the sensor curve.
    pub amplitude: usize,
    pub mode:      CurveMode,
}

impl SensorConfig {
    pub fn new(name: impl Into<String>, min: f64, max: f64, amplitude: usize) -> Self {
        Self { name: name.into(), min, max, amplitude, mode: CurveMode::DEFAULT }
    }

    pub fn mode(mut self, mode: CurveMode) -> Self {
        self.mode = mode;
        self
    }
}

/// `(min, max, amplitude)` of a curve-backed value.
#[derive(Copy, Clone, Debug)]
struct Range {
    min:       f64,
    max:       f64,
    amplitude: usize,
}

/// Fluent builder for [`Device`].
///
/// # Required inputs
///
/// - a model string (`1..=64` characters)
/// - at least one [`Route`] via `.route(r)` or `.routes(v)`
///
/// # Optional inputs (have defaults)
///
/// | Method                      | Default                      |
/// |-----------------------------|------------------------------|
/// | `.id(id)`                   | random, drawn from the seed  |
/// | `.speed(min, max, amp)`     | 1–10 m/s, 4 control points   |
/// | `.battery(min, max, amp)`   | 0–100 %, 4 control points    |
/// | `.elevation(min, max, amp)` | 0–100 m, 4 control points    |
/// | `.offline(min, max)`        | 1–120 ticks                  |
/// | `.skip_offline(b)`          | `false`                      |
/// | `.sensor(cfg)`              | none                         |
/// | `.seed(s)`                  | drawn from OS entropy        |
///
/// # Example
///
/// ```rust,ignore
/// let device = DeviceBuilder::new("drone-x4")
///     .route(route)
///     .speed(2.0, 15.0, 8)
///     .sensor(SensorConfig::new("temperature", -5.0, 35.0, 6))
///     .skip_offline(true)
///     .seed(7)
///     .build()?;
/// ```
pub struct DeviceBuilder {
    id:          Option<DeviceId>,
    model:       String,
    user_id:     String,
    description: String,
    color:       Option<Color>,
    props:       Properties,
    routes:      Vec<Route>,
    speed:       Range,
    battery:     Range,
    nav:         NavigatorConfig,
    sensors:     Vec<SensorConfig>,
    seed:        Option<u64>,
}

impl DeviceBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id:          None,
            model:       model.into(),
            user_id:     String::new(),
            description: String::new(),
            color:       None,
            props:       Properties::new(),
            routes:      Vec::new(),
            speed:       Range { min: 1.0, max: 10.0, amplitude: 4 },
            battery:     Range { min: 0.0, max: 100.0, amplitude: 4 },
            nav:         NavigatorConfig::default(),
            sensors:     Vec::new(),
            seed:        None,
        }
    }

    /// Fix the device id instead of drawing one from the seed.
    pub fn id(mut self, id: DeviceId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    pub fn prop(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Speed range in m/s and its curve's control-point count.
    pub fn speed(mut self, min: f64, max: f64, amplitude: usize) -> Self {
        self.speed = Range { min, max, amplitude };
        self
    }

    /// Battery charge range in percent and its curve's control-point count.
    pub fn battery(mut self, min: f64, max: f64, amplitude: usize) -> Self {
        self.battery = Range { min, max, amplitude };
        self
    }

    /// Elevation range in metres and its curve's control-point count.
    pub fn elevation(mut self, min: f64, max: f64, amplitude: usize) -> Self {
        self.nav.elevation_min = min;
        self.nav.elevation_max = max;
        self.nav.elevation_amplitude = amplitude;
        self
    }

    /// Offline excursion length range, in ticks.
    pub fn offline(mut self, min: u32, max: u32) -> Self {
        self.nav.offline_min = min;
        self.nav.offline_max = max;
        self
    }

    pub fn skip_offline(mut self, skip: bool) -> Self {
        self.nav.skip_offline = skip;
        self
    }

    pub fn sensor(mut self, sensor: SensorConfig) -> Self {
        self.sensors.push(sensor);
        self
    }

    /// Fix the random seed for a reproducible device.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Validate every input and build the device.  Nothing is constructed
    /// when any input is rejected.
    pub fn build(self) -> DeviceResult<Device> {
        // ── Validate plain inputs ─────────────────────────────────────────
        check_model(&self.model)?;
        check_description(&self.description)?;
        check_user_id(&self.user_id)?;
        check_sensor_count(self.sensors.len())?;
        for sensor in &self.sensors {
            check_sensor_name(&sensor.name)?;
        }
        if self.routes.is_empty() {
            return Err(DeviceError::NoRoutes);
        }

        // ── Curves ────────────────────────────────────────────────────────
        let mut rng = self.seed.map_or_else(SeededRng::from_entropy, SeededRng::new);
        let id = self.id.unwrap_or_else(|| DeviceId::random(&mut rng));

        let s = self.speed;
        let speed = Speed::new(s.min, s.max, s.amplitude, &mut rng).map_err(DeviceError::curve("speed"))?;
        let b = self.battery;
        let battery =
            Battery::new(b.min, b.max, b.amplitude, &mut rng).map_err(DeviceError::curve("battery"))?;

        let mut sensors = Vec::with_capacity(self.sensors.len());
        for cfg in self.sensors {
            let sensor = Sensor::new(cfg.name, cfg.min, cfg.max, cfg.amplitude, cfg.mode, &mut rng)
                .map_err(DeviceError::curve("sensor"))?;
            sensors.push(sensor);
        }

        // ── Navigator ─────────────────────────────────────────────────────
        let navigator = Navigator::new(self.routes, self.nav, rng.child(1))?;

        log::debug!("built device {id} ({}) with {} sensors", self.model, sensors.len());

        Ok(Device::from_parts(
            id,
            self.user_id,
            self.model,
            self.description,
            self.color,
            self.props,
            navigator,
            speed,
            battery,
            sensors,
            rng,
        ))
    }
}
