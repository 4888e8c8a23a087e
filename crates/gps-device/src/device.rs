//! The simulated device.

use gps_core::{Color, CoreError, CoreResult, DeviceId, Properties, RouteId, SeededRng, Snapshot};
use gps_curve::{Battery, Sensor, Speed};
use gps_nav::Navigator;
use gps_path::Route;
use serde::{Deserialize, Serialize};

use crate::{DeviceError, DeviceResult, SensorReading, State};

pub const MAX_MODEL_LEN: usize = 64;
pub const MAX_DESCRIPTION_LEN: usize = 512;
pub const MAX_USER_ID_LEN: usize = 128;
pub const MAX_SENSORS: usize = 32;
pub const MAX_SENSOR_NAME_LEN: usize = 32;

/// A device following its routes while its telemetry curves evolve.
///
/// Built with [`DeviceBuilder`](crate::DeviceBuilder).  Owned by exactly one
/// runner once attached; every mutation goes through `&mut self`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Device {
    id:          DeviceId,
    user_id:     String,
    model:       String,
    description: String,
    color:       Option<Color>,
    props:       Properties,

    navigator: Navigator,
    speed:     Speed,
    battery:   Battery,
    sensors:   Vec<Sensor>,
    rng:       SeededRng,

    /// Elapsed seconds in the current lap.
    loop_ticks: f64,
    /// Expected seconds per lap at average speed.
    avg_ticks:  f64,
    tick:       u64,
}

impl Device {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        id:          DeviceId,
        user_id:     String,
        model:       String,
        description: String,
        color:       Option<Color>,
        props:       Properties,
        navigator:   Navigator,
        speed:       Speed,
        battery:     Battery,
        sensors:     Vec<Sensor>,
        rng:         SeededRng,
    ) -> Self {
        let mut device = Self {
            id,
            user_id,
            model,
            description,
            color,
            props,
            navigator,
            speed,
            battery,
            sensors,
            rng,
            loop_ticks: 0.0,
            avg_ticks: 0.0,
            tick: 0,
        };
        device.update_avg_ticks();
        device
    }

    // ── Tick ──────────────────────────────────────────────────────────────

    /// Advance the device by `tick` seconds.  Returns `true` when the
    /// position changed.
    pub fn next(&mut self, tick: f64) -> bool {
        self.tick += 1;

        if self.navigator.is_offline() {
            // Only counts the excursion down.
            return self.navigator.advance(tick, self.speed.value());
        }

        self.loop_ticks += tick;
        let t = self.lap_ratio();
        let speed = self.speed.next(t);
        self.battery.next(t);
        for sensor in &mut self.sensors {
            sensor.next(t);
        }

        let moved = self.navigator.advance(tick, speed);

        if self.navigator.is_finish() {
            log::debug!(
                "device {} finished a lap after {} ticks (battery low: {})",
                self.id,
                self.tick,
                self.battery.is_low()
            );
            self.navigator.to_offline();
            self.loop_ticks = 0.0;
            self.shuffle();
        }
        moved
    }

    /// `true` once the device has covered some distance in the current lap;
    /// states are only worth delivering from then on.
    #[inline]
    pub fn has_progress(&self) -> bool {
        self.navigator.current_distance() > 0.0
    }

    /// Restart the lap from the start of the first route, online.
    pub fn reset(&mut self) {
        self.navigator.reset();
        self.loop_ticks = 0.0;
        self.speed.next(0.0);
        self.battery.next(0.0);
        for sensor in &mut self.sensors {
            sensor.next(0.0);
        }
    }

    /// Draw fresh shapes for every curve.
    pub fn shuffle(&mut self) {
        self.speed.shuffle(&mut self.rng);
        self.battery.shuffle(&mut self.rng);
        for sensor in &mut self.sensors {
            sensor.shuffle(&mut self.rng);
        }
        self.navigator.shuffle();
    }

    /// Overwrite `state` with this tick's snapshot, reusing its allocations.
    pub fn fill_state(&self, state: &mut State) {
        let nav = &self.navigator;
        let point = nav.current_point();

        state.id = self.id;
        state.user_id.clear();
        state.user_id.push_str(&self.user_id);
        state.model.clear();
        state.model.push_str(&self.model);
        state.tick = self.tick;
        state.online = !nav.is_offline();
        state.lat = point.lat;
        state.lon = point.lon;
        state.elevation = nav.elevation();
        state.bearing = nav.bearing();
        state.speed = self.speed.value();
        state.battery = self.battery.value();
        state.distance = nav.current_distance();
        state.total_distance = nav.total_distance();
        state.route_index = nav.route_index();
        state.track_index = nav.track_index();
        state.segment_index = nav.segment_index();

        state.sensors.truncate(self.sensors.len());
        for (i, sensor) in self.sensors.iter().enumerate() {
            let value = sensor.value();
            match state.sensors.get_mut(i) {
                Some(reading) => {
                    reading.id = sensor.id();
                    reading.name.clear();
                    reading.name.push_str(sensor.name());
                    reading.x = value.x;
                    reading.y = value.y;
                }
                None => state.sensors.push(SensorReading {
                    id:   sensor.id(),
                    name: sensor.name().to_owned(),
                    x:    value.x,
                    y:    value.y,
                }),
            }
        }
    }

    /// A freshly allocated snapshot.
    pub fn state(&self) -> State {
        let mut state = State::default();
        self.fill_state(&mut state);
        state
    }

    // ── Routes ────────────────────────────────────────────────────────────

    pub fn add_route(&mut self, route: Route) -> DeviceResult<()> {
        self.navigator.add_route(route)?;
        self.loop_ticks = 0.0;
        self.update_avg_ticks();
        Ok(())
    }

    /// Remove a route.  The last route cannot be removed.
    pub fn remove_route(&mut self, id: RouteId) -> DeviceResult<bool> {
        if self.navigator.num_routes() == 1 && self.navigator.routes()[0].id() == id {
            return Err(DeviceError::NoRoutes);
        }
        let removed = self.navigator.remove_route(id);
        if removed {
            self.loop_ticks = 0.0;
            self.update_avg_ticks();
        }
        Ok(removed)
    }

    // ── Identity ──────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn set_user_id(&mut self, user_id: impl Into<String>) -> DeviceResult<()> {
        let user_id = user_id.into();
        check_user_id(&user_id)?;
        self.user_id = user_id;
        Ok(())
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn set_model(&mut self, model: impl Into<String>) -> DeviceResult<()> {
        let model = model.into();
        check_model(&model)?;
        self.model = model;
        Ok(())
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_description(&mut self, description: impl Into<String>) -> DeviceResult<()> {
        let description = description.into();
        check_description(&description)?;
        self.description = description;
        Ok(())
    }

    pub fn color(&self) -> Option<Color> {
        self.color
    }

    pub fn set_color(&mut self, color: Option<Color>) {
        self.color = color;
    }

    pub fn props(&self) -> &Properties {
        &self.props
    }

    pub fn insert_prop(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.props.insert(key.into(), value.into());
    }

    // ── Telemetry ─────────────────────────────────────────────────────────

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn speed(&self) -> &Speed {
        &self.speed
    }

    pub fn battery(&self) -> &Battery {
        &self.battery
    }

    pub fn sensors(&self) -> &[Sensor] {
        &self.sensors
    }

    #[inline]
    pub fn is_online(&self) -> bool {
        !self.navigator.is_offline()
    }

    /// Ticks advanced since construction.
    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Elapsed seconds in the current lap.
    #[inline]
    pub fn loop_ticks(&self) -> f64 {
        self.loop_ticks
    }

    /// Expected seconds per lap at average speed.
    #[inline]
    pub fn avg_ticks(&self) -> f64 {
        self.avg_ticks
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn lap_ratio(&self) -> f64 {
        if self.avg_ticks > 0.0 {
            (self.loop_ticks / self.avg_ticks).min(1.0)
        } else {
            0.0
        }
    }

    fn update_avg_ticks(&mut self) {
        let avg_speed = self.speed.average();
        self.avg_ticks = if avg_speed > 0.0 {
            self.navigator.total_distance() / avg_speed
        } else {
            0.0
        };
    }
}

impl Snapshot for Device {
    fn validate(&self) -> CoreResult<()> {
        let invalid = |e: DeviceError| CoreError::Snapshot(e.to_string());

        check_model(&self.model).map_err(invalid)?;
        check_description(&self.description).map_err(invalid)?;
        check_user_id(&self.user_id).map_err(invalid)?;
        check_sensor_count(self.sensors.len()).map_err(invalid)?;
        if self.navigator.num_routes() == 0 {
            return Err(invalid(DeviceError::NoRoutes));
        }
        self.navigator.validate()?;
        self.speed.curve().validate()?;
        self.battery.curve().validate()?;
        for sensor in &self.sensors {
            check_sensor_name(sensor.name()).map_err(invalid)?;
            sensor.validate()?;
        }
        if self.loop_ticks < 0.0 || self.avg_ticks < 0.0 {
            return Err(CoreError::Snapshot("negative lap counters".into()));
        }
        Ok(())
    }
}

// ── Validation ────────────────────────────────────────────────────────────────

pub(crate) fn check_model(model: &str) -> DeviceResult<()> {
    let len = model.chars().count();
    if len == 0 || len > MAX_MODEL_LEN {
        return Err(DeviceError::Model(len));
    }
    Ok(())
}

pub(crate) fn check_description(description: &str) -> DeviceResult<()> {
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LEN {
        return Err(DeviceError::Description(len));
    }
    Ok(())
}

pub(crate) fn check_user_id(user_id: &str) -> DeviceResult<()> {
    let len = user_id.chars().count();
    if len > MAX_USER_ID_LEN {
        return Err(DeviceError::UserId(len));
    }
    Ok(())
}

pub(crate) fn check_sensor_count(count: usize) -> DeviceResult<()> {
    if count > MAX_SENSORS {
        return Err(DeviceError::TooManySensors(count));
    }
    Ok(())
}

pub(crate) fn check_sensor_name(name: &str) -> DeviceResult<()> {
    let len = name.chars().count();
    if len == 0 || len > MAX_SENSOR_NAME_LEN {
        return Err(DeviceError::SensorName(name.to_owned()));
    }
    Ok(())
}
