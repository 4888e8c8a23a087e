//! The generator: a fixed set of runners and the device routing between them.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use gps_core::DeviceId;
use gps_device::{Device, State};

use crate::{GeneratorConfig, PacketHandler, Runner, SchedError, SchedResult, shard};

/// Owns `N` runners, created once at construction, and routes every device
/// to the runner picked by [`shard`].
///
/// # Example
///
/// ```rust,ignore
/// let generator = Generator::new(GeneratorConfig::default(), Arc::new(NoopHandler))?;
/// generator.attach(device)?;
/// generator.run()?;
/// // ...
/// generator.close();
/// ```
pub struct Generator {
    config:  GeneratorConfig,
    runners: Vec<Arc<Runner>>,
    closed:  AtomicBool,
}

impl Generator {
    pub fn new(config: GeneratorConfig, handler: Arc<dyn PacketHandler>) -> SchedResult<Self> {
        config.validate()?;
        let tick_secs = config.tick_secs();
        let runners = (0..config.runners())
            .map(|i| Arc::new(Runner::new(i, config.interval, tick_secs, Arc::clone(&handler))))
            .collect::<Vec<_>>();

        log::info!(
            "generator ready: {} runners, interval {:?}, {tick_secs} s per tick",
            runners.len(),
            config.interval
        );
        Ok(Self { config, runners, closed: AtomicBool::new(false) })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    pub fn num_runners(&self) -> usize {
        self.runners.len()
    }

    pub fn runners(&self) -> &[Arc<Runner>] {
        &self.runners
    }

    /// Index of the runner `id` is (or would be) attached to.
    #[inline]
    pub fn runner_for(&self, id: DeviceId) -> usize {
        shard(id, self.runners.len())
    }

    fn runner(&self, id: DeviceId) -> &Runner {
        &self.runners[self.runner_for(id)]
    }

    // ── Devices ───────────────────────────────────────────────────────────

    /// Attach a device.  Attaching an id that is already attached fails with
    /// [`SchedError::AlreadyAttached`].
    pub fn attach(&self, device: Device) -> SchedResult<()> {
        if self.is_closed() {
            return Err(SchedError::Closed);
        }
        self.runner(device.id()).attach(device)
    }

    /// Detach a device and hand it back.
    pub fn detach(&self, id: DeviceId) -> SchedResult<Device> {
        self.runner(id).detach(id)
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.runner(id).contains(id)
    }

    pub fn num_devices(&self) -> usize {
        self.runners.iter().map(|r| r.len()).sum()
    }

    /// Current state of an attached device.
    pub fn lookup(&self, id: DeviceId) -> Option<State> {
        self.runner(id).lookup(id)
    }

    /// Run `f` against an attached device (e.g. to jump it along its path).
    pub fn with_device<R>(&self, id: DeviceId, f: impl FnOnce(&mut Device) -> R) -> Option<R> {
        self.runner(id).with_device(id, f)
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Start every runner's ticker loop.  Idempotent.
    pub fn run(&self) -> SchedResult<()> {
        if self.is_closed() {
            return Err(SchedError::Closed);
        }
        for runner in &self.runners {
            runner.run()?;
        }
        log::info!("generator running");
        Ok(())
    }

    /// One synchronous sweep over every runner, advancing devices by
    /// `tick_secs`.  Useful for deterministic driving without the tickers.
    pub fn step(&self, tick_secs: f64) {
        for runner in &self.runners {
            runner.sweep(tick_secs);
        }
    }

    /// Stop every runner.  Idempotent.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        for runner in &self.runners {
            runner.close();
        }
        log::info!("generator closed with {} devices attached", self.num_devices());
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}

impl Drop for Generator {
    fn drop(&mut self) {
        self.close();
    }
}
