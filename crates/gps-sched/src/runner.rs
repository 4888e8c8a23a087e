//! One runner: a shard of devices, its ticker loop and its consumers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, TrySendError};
use gps_core::DeviceId;
use gps_device::{Device, State};

use crate::{Packet, PacketHandler, SchedError, SchedResult};

#[cfg(feature = "fx-hash")]
type DeviceMap = rustc_hash::FxHashMap<DeviceId, Mutex<Slot>>;
#[cfg(not(feature = "fx-hash"))]
type DeviceMap = std::collections::HashMap<DeviceId, Mutex<Slot>>;

// ── Slot ──────────────────────────────────────────────────────────────────────

/// An attached device and its hand-off channels.
pub(crate) struct Slot {
    device:   Device,
    state_tx: Sender<State>,
    /// The consumer returns the pooled shell here once it is done with it.
    ready_rx: Receiver<State>,
    /// The shell, when the runner holds it.  Starts filled so the very first
    /// tick is always delivered.
    shell:    Option<State>,
    consumer: Option<JoinHandle<()>>,
}

impl Slot {
    pub(crate) fn new(
        device:   Device,
        state_tx: Sender<State>,
        ready_rx: Receiver<State>,
        consumer: Option<JoinHandle<()>>,
    ) -> Self {
        Self { device, state_tx, ready_rx, shell: Some(State::default()), consumer }
    }

    pub(crate) fn device(&self) -> &Device {
        &self.device
    }

    pub(crate) fn device_mut(&mut self) -> &mut Device {
        &mut self.device
    }

    /// Pass the device's current state to its consumer if the consumer is
    /// ready, and return a copy for this sweep's packet.  `None` means the
    /// tick was coalesced away.
    pub(crate) fn hand_off(&mut self) -> Option<State> {
        if !self.device.has_progress() {
            return None;
        }
        if self.shell.is_none() {
            self.shell = self.ready_rx.try_recv().ok();
        }
        let mut shell = self.shell.take()?;
        self.device.fill_state(&mut shell);
        let delivered = shell.clone();
        match self.state_tx.try_send(shell) {
            Ok(()) => Some(delivered),
            Err(TrySendError::Full(shell) | TrySendError::Disconnected(shell)) => {
                self.shell = Some(shell);
                None
            }
        }
    }
}

/// Consumer loop: run the per-state callback, then return the shell.  Ends
/// when the state channel closes (device detached).
fn consume(states: Receiver<State>, ready: Sender<State>, handler: Arc<dyn PacketHandler>) {
    for state in states.iter() {
        handler.on_state(&state);
        if ready.send(state).is_err() {
            break;
        }
    }
}

// ── Runner ────────────────────────────────────────────────────────────────────

/// A shard of devices ticked sequentially on one thread.
pub struct Runner {
    index:     usize,
    interval:  Duration,
    tick_secs: f64,
    devices:   RwLock<DeviceMap>,
    handler:   Arc<dyn PacketHandler>,

    sweeps:   AtomicU64,
    close_tx: Mutex<Option<Sender<()>>>,
    close_rx: Receiver<()>,
    handle:   Mutex<Option<JoinHandle<()>>>,
}

impl Runner {
    pub fn new(
        index:     usize,
        interval:  Duration,
        tick_secs: f64,
        handler:   Arc<dyn PacketHandler>,
    ) -> Self {
        let (close_tx, close_rx) = crossbeam_channel::bounded(0);
        Self {
            index,
            interval,
            tick_secs,
            devices: RwLock::new(DeviceMap::default()),
            handler,
            sweeps: AtomicU64::new(0),
            close_tx: Mutex::new(Some(close_tx)),
            close_rx,
            handle: Mutex::new(None),
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    // ── Devices ───────────────────────────────────────────────────────────

    /// Take ownership of `device` and start its consumer thread.
    pub fn attach(&self, device: Device) -> SchedResult<()> {
        let id = device.id();
        let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
        if devices.contains_key(&id) {
            return Err(SchedError::AlreadyAttached(id));
        }

        let (state_tx, state_rx) = crossbeam_channel::bounded(1);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);
        let handler = Arc::clone(&self.handler);
        let consumer = thread::Builder::new()
            .name(format!("gps-consumer-{id}"))
            .spawn(move || consume(state_rx, ready_tx, handler))?;

        devices.insert(id, Mutex::new(Slot::new(device, state_tx, ready_rx, Some(consumer))));
        log::debug!("runner {} attached device {id} ({} devices)", self.index, devices.len());
        Ok(())
    }

    /// Remove a device, stop its consumer and hand the device back.
    pub fn detach(&self, id: DeviceId) -> SchedResult<Device> {
        let slot = {
            let mut devices = self.devices.write().unwrap_or_else(PoisonError::into_inner);
            devices.remove(&id).ok_or(SchedError::NotFound(id))?
        };
        let Slot { device, state_tx, consumer, .. } =
            slot.into_inner().unwrap_or_else(PoisonError::into_inner);

        drop(state_tx);
        if let Some(handle) = consumer {
            if handle.join().is_err() {
                log::warn!("consumer of device {id} panicked");
            }
        }
        log::debug!("runner {} detached device {id}", self.index);
        Ok(device)
    }

    pub fn contains(&self, id: DeviceId) -> bool {
        self.devices.read().unwrap_or_else(PoisonError::into_inner).contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.devices.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Run `f` against an attached device.
    pub fn with_device<R>(&self, id: DeviceId, f: impl FnOnce(&mut Device) -> R) -> Option<R> {
        let devices = self.devices.read().unwrap_or_else(PoisonError::into_inner);
        let slot = devices.get(&id)?;
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        Some(f(slot.device_mut()))
    }

    /// Current state of an attached device.
    pub fn lookup(&self, id: DeviceId) -> Option<State> {
        let devices = self.devices.read().unwrap_or_else(PoisonError::into_inner);
        let slot = devices.get(&id)?.lock().unwrap_or_else(PoisonError::into_inner);
        Some(slot.device().state())
    }

    // ── Ticking ───────────────────────────────────────────────────────────

    /// Advance every device by `tick` seconds, hand ready states to their
    /// consumers, and emit this sweep's delivered states as one packet.
    ///
    /// The map stays read-locked for the whole device pass, so attach and
    /// detach wait for it.
    pub fn sweep(&self, tick: f64) {
        let sweep = self.sweeps.fetch_add(1, Ordering::Relaxed) + 1;
        if self.index == 0 {
            self.handler.on_tick();
        }

        let (total, moved, states) = {
            let devices = self.devices.read().unwrap_or_else(PoisonError::into_inner);
            let mut moved = 0usize;
            let mut states = Vec::new();
            for slot in devices.values() {
                let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
                if slot.device.next(tick) {
                    moved += 1;
                }
                states.extend(slot.hand_off());
            }
            (devices.len(), moved, states)
        };

        let delivered = states.len();
        self.emit(sweep, states);
        log::trace!(
            "runner {} sweep {sweep}: {moved}/{total} moved, {delivered} delivered",
            self.index
        );
    }

    /// Sweeps performed so far.
    pub fn sweeps(&self) -> u64 {
        self.sweeps.load(Ordering::Relaxed)
    }

    fn emit(&self, sweep: u64, states: Vec<State>) {
        if states.is_empty() {
            return;
        }
        let count = states.len();
        let packet = Packet { runner: self.index, tick: sweep, states };
        match packet.encode() {
            Ok(bytes) => self.handler.on_packet(&bytes),
            Err(e) => {
                log::warn!("runner {} dropped a packet of {count} states: {e}", self.index);
                self.handler.on_error(&SchedError::Encode(e));
            }
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Start the ticker loop on its own thread.  Calling it again while the
    /// loop runs is a no-op.
    pub fn run(self: &Arc<Self>) -> SchedResult<()> {
        if self.is_closed() {
            return Err(SchedError::Closed);
        }
        let mut handle = self.handle.lock().unwrap_or_else(PoisonError::into_inner);
        if handle.is_some() {
            return Ok(());
        }

        let runner = Arc::clone(self);
        let ticker = crossbeam_channel::tick(self.interval);
        let close_rx = self.close_rx.clone();
        *handle = Some(
            thread::Builder::new()
                .name(format!("gps-runner-{}", self.index))
                .spawn(move || runner.run_loop(ticker, close_rx))?,
        );
        Ok(())
    }

    fn run_loop(&self, ticker: Receiver<std::time::Instant>, close_rx: Receiver<()>) {
        log::debug!("runner {} started, interval {:?}", self.index, self.interval);
        loop {
            crossbeam_channel::select! {
                recv(ticker) -> _ => self.sweep(self.tick_secs),
                recv(close_rx) -> _ => break,
            }
        }
        log::debug!("runner {} stopped after {} sweeps", self.index, self.sweeps());
    }

    /// Stop the ticker loop.  Idempotent; does not wait for a sweep in
    /// progress to finish.
    pub fn close(&self) {
        let sender = self.close_tx.lock().unwrap_or_else(PoisonError::into_inner).take();
        if sender.is_some() {
            log::debug!("runner {} closing", self.index);
        }
    }

    pub fn is_closed(&self) -> bool {
        self.close_tx.lock().unwrap_or_else(PoisonError::into_inner).is_none()
    }

    pub fn is_running(&self) -> bool {
        !self.is_closed() && self.handle.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
}
