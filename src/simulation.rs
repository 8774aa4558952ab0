//! The state shared between the simulation engine and the view.

use crate::network::RoadNetwork;
use crate::traffic::TrafficState;
use log::info;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};
use std::time::Duration;

/// The default pause between simulation ticks in ms.
pub const DEFAULT_SLEEP_TIME_MS: u32 = 20;

/// A callback invoked whenever the engine requests a repaint.
pub type RepaintCallback = Arc<dyn Fn() + Send + Sync>;

/// A handle to a running traffic simulation.
///
/// The engine thread and the view both hold an `Arc` to the same handle.
/// The engine must hold [SimulationHandle::lock_traffic] while it mutates
/// vehicles; the view holds the same lock for the whole foreground redraw.
pub struct SimulationHandle {
    /// The live traffic state.
    traffic: Mutex<TrafficState>,
    /// The road network being simulated.
    network: RwLock<Arc<RoadNetwork>>,
    /// Incremented every time the road network is replaced, while the
    /// `network` write lock is held.
    topology_version: AtomicU64,
    /// The simulation time in s, stored as `f64` bits.
    time: AtomicU64,
    /// The number of ticks since the simulation was last reset.
    iteration: AtomicU64,
    /// The pause between ticks in ms.
    sleep_ms: AtomicU32,
    paused: AtomicBool,
    stopped: AtomicBool,
    reset_requested: AtomicBool,
    repaint_requested: AtomicBool,
    on_repaint: Mutex<Option<RepaintCallback>>,
}

impl SimulationHandle {
    /// Creates a stopped simulation of the given network.
    pub fn new(network: RoadNetwork) -> Self {
        Self {
            traffic: Mutex::new(TrafficState::new()),
            network: RwLock::new(Arc::new(network)),
            topology_version: AtomicU64::new(0),
            time: AtomicU64::new(0.0f64.to_bits()),
            iteration: AtomicU64::new(0),
            sleep_ms: AtomicU32::new(DEFAULT_SLEEP_TIME_MS),
            paused: AtomicBool::new(false),
            stopped: AtomicBool::new(true),
            reset_requested: AtomicBool::new(false),
            repaint_requested: AtomicBool::new(false),
            on_repaint: Mutex::new(None),
        }
    }

    /// Locks the live traffic state.
    ///
    /// A panic on another thread while holding the lock does not make the
    /// state unreadable; the view keeps drawing whatever was left.
    pub fn lock_traffic(&self) -> MutexGuard<'_, TrafficState> {
        self.traffic.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The road network currently being simulated.
    pub fn network(&self) -> Arc<RoadNetwork> {
        self.network_snapshot().0
    }

    /// The road network together with the topology version it was published under.
    pub fn network_snapshot(&self) -> (Arc<RoadNetwork>, u64) {
        let network = self.network.read().unwrap_or_else(PoisonError::into_inner);
        (network.clone(), self.topology_version.load(Ordering::Acquire))
    }

    /// Replaces the road network, for instance when a new scenario is loaded.
    ///
    /// Clears the traffic state and signals a topology change to the view.
    pub fn replace_network(&self, network: RoadNetwork) {
        let segments = network.segment_count();
        let version = {
            let mut traffic = self.lock_traffic();
            traffic.clear();
            let mut current = self.network.write().unwrap_or_else(PoisonError::into_inner);
            *current = Arc::new(network);
            self.topology_version.fetch_add(1, Ordering::AcqRel) + 1
        };
        info!(
            "Replaced road network ({} segments, topology version {})",
            segments, version
        );
        self.request_repaint();
    }

    /// A number that changes whenever the road network is replaced.
    pub fn topology_version(&self) -> u64 {
        self.topology_version.load(Ordering::Acquire)
    }

    /// Sets the function called on every repaint request.
    pub fn set_repaint_callback(&self, callback: Option<RepaintCallback>) {
        *self.on_repaint.lock().unwrap_or_else(PoisonError::into_inner) = callback;
    }

    /// Asks the view to redraw; the engine calls this once per tick.
    ///
    /// The callback runs without any lock held, so it may call back into the handle.
    pub fn request_repaint(&self) {
        self.repaint_requested.store(true, Ordering::Release);
        let callback = self
            .on_repaint
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        if let Some(callback) = callback {
            callback();
        }
    }

    /// Whether a repaint was requested since the last call, clearing the request.
    pub fn take_repaint_request(&self) -> bool {
        self.repaint_requested.swap(false, Ordering::AcqRel)
    }

    /// Advances the simulation clock by one tick of `dt` seconds.
    pub fn advance_clock(&self, dt: f64) {
        let time = f64::from_bits(self.time.load(Ordering::Acquire)) + dt;
        self.time.store(time.to_bits(), Ordering::Release);
        self.iteration.fetch_add(1, Ordering::AcqRel);
    }

    /// The simulation time in s.
    pub fn simulation_time(&self) -> f64 {
        f64::from_bits(self.time.load(Ordering::Acquire))
    }

    /// The number of ticks since the simulation was last reset.
    pub fn iteration_count(&self) -> u64 {
        self.iteration.load(Ordering::Acquire)
    }

    /// The pause the engine should take between ticks.
    pub fn sleep_time(&self) -> Duration {
        Duration::from_millis(self.sleep_ms.load(Ordering::Relaxed).into())
    }

    pub fn set_sleep_time(&self, sleep_ms: u32) {
        self.sleep_ms.store(sleep_ms, Ordering::Relaxed);
    }

    pub fn start(&self) {
        self.paused.store(false, Ordering::Release);
        self.stopped.store(false, Ordering::Release);
    }

    pub fn stop(&self) {
        self.stopped.store(true, Ordering::Release);
    }

    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::Acquire)
    }

    /// Asks the engine to restart the current scenario.
    ///
    /// The clock is rewound and the traffic cleared immediately; the engine
    /// sees the request through [SimulationHandle::take_reset_request].
    pub fn reset(&self) {
        {
            let mut traffic = self.lock_traffic();
            traffic.clear();
            self.time.store(0.0f64.to_bits(), Ordering::Release);
            self.iteration.store(0, Ordering::Release);
        }
        self.reset_requested.store(true, Ordering::Release);
        self.request_repaint();
    }

    /// Whether a reset was requested since the last call, clearing the request.
    pub fn take_reset_request(&self) -> bool {
        self.reset_requested.swap(false, Ordering::AcqRel)
    }
}

impl Default for SimulationHandle {
    fn default() -> Self {
        Self::new(RoadNetwork::new())
    }
}
