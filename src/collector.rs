//! Timed sampling session: sensor pull, smoothing, point capture

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use nalgebra::Vector3;
use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, interval, interval_at};

use crate::attitude::Attitude;
use crate::smoothing::Smoother;
use crate::store::PointStore;
use crate::types::{CollectorSettings, DevicePose, FieldPoint, FieldStatistics, Frame, SpatialBounds};

/// Supplies device-frame magnetic field samples in microtesla.
///
/// Read only from the collection task, on the fast sampling cadence. A
/// platform layer receiving push callbacks should latch the latest sample
/// and hand it out here; returning `None` means no reading is available
/// yet, which the collector treats as a skipped tick, not an error.
pub trait MagnetometerSource: Send + 'static {
    /// Latest device-frame field sample, if one is available.
    fn read(&mut self) -> Option<Vector3<f32>>;
}

/// Supplies the latest known device pose.
///
/// Position and orientation are each optional; the collector substitutes
/// the configured fallback position and records `orientation: None` when
/// the respective feed is down.
pub trait PoseSource: Send + 'static {
    /// Latest known pose.
    fn read(&mut self) -> DevicePose;
}

/// Deterministic pose source tracing a slow sinusoidal path.
///
/// A demo and test aid for running the pipeline without an AR tracking
/// subsystem. This is strictly opt-in: a real pose source that loses
/// tracking reports `None`, and the collector falls back to the configured
/// fallback position — synthetic motion is never injected on its own.
#[derive(Debug, Default)]
pub struct SimulatedPose {
    tick: u64,
}

impl SimulatedPose {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PoseSource for SimulatedPose {
    fn read(&mut self) -> DevicePose {
        let t = self.tick as f32 * 0.1;
        self.tick += 1;
        let position = Vector3::new(
            1.5 * (0.4 * t).sin(),
            0.3 * (0.9 * t).sin(),
            1.5 * (0.4 * t).cos(),
        );
        DevicePose {
            position: Some(position),
            orientation: Some(Attitude::identity()),
        }
    }
}

/// Store plus the session gate, guarded by one lock so that flipping the
/// gate in `stop` synchronizes with any in-flight append.
struct SessionShared {
    active: bool,
    store: PointStore,
}

/// Drives the two-rate sampling session and owns the point store.
///
/// A fast timer pulls raw sensor samples through calibration and the
/// exponential smoother into a live-value cache; a slow timer captures the
/// cached value together with the current pose as a [`FieldPoint`]. Both
/// timers run on one cooperative tokio task.
///
/// State machine: `Idle` (no task, caches cleared) and `Collecting` (task
/// running, store growing). [`start`](Self::start) while collecting and
/// [`stop`](Self::stop) while idle are no-ops. Store contents survive
/// stop/start and are removed only by [`clear`](Self::clear).
///
/// Readers (UI, visualization) take copy-on-read snapshots and aggregate
/// statistics through the collector at any time; the live smoothed field is
/// published on a watch channel so a subscriber never observes a torn
/// update.
pub struct FieldCollector {
    settings: CollectorSettings,
    shared: Arc<RwLock<SessionShared>>,
    live: Arc<watch::Sender<Option<Vector3<f32>>>>,
    task: Option<JoinHandle<()>>,
}

impl FieldCollector {
    /// Create a collector with default settings.
    pub fn new() -> Self {
        Self::with_settings(CollectorSettings::default())
    }

    /// Create a collector with the given settings.
    pub fn with_settings(settings: CollectorSettings) -> Self {
        let store = PointStore::new(settings.store_capacity, settings.eviction_batch_fraction);
        let (live, _) = watch::channel(None);
        Self {
            settings,
            shared: Arc::new(RwLock::new(SessionShared {
                active: false,
                store,
            })),
            live: Arc::new(live),
            task: None,
        }
    }

    /// The configured settings.
    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    /// Whether a collection session is running.
    pub fn is_collecting(&self) -> bool {
        self.task.is_some()
    }

    /// Begin collecting from the given sources.
    ///
    /// No-op if a session is already running. Smoothing state starts fresh
    /// on every call; previously collected points are kept.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(
        &mut self,
        magnetometer: impl MagnetometerSource,
        pose: impl PoseSource,
    ) {
        if self.task.is_some() {
            tracing::debug!("collection already running, start ignored");
            return;
        }

        self.live.send_replace(None);
        self.shared.write().active = true;

        tracing::info!(
            sampling_interval = ?self.settings.sampling_interval,
            persist_interval = ?self.settings.persist_interval,
            "collection started"
        );

        self.task = Some(tokio::spawn(run_session(
            self.settings,
            magnetometer,
            pose,
            Arc::clone(&self.shared),
            Arc::clone(&self.live),
        )));
    }

    /// Stop collecting.
    ///
    /// No-op if idle. Synchronously halts future captures: the session gate
    /// is flipped under the store's write lock, so once this returns no
    /// point can be appended by a late tick. Collected points are kept.
    pub fn stop(&mut self) {
        let Some(task) = self.task.take() else {
            return;
        };

        self.shared.write().active = false;
        task.abort();
        self.live.send_replace(None);

        tracing::info!(points = self.shared.read().store.len(), "collection stopped");
    }

    /// Remove all collected points. Idempotent; allowed in any state.
    pub fn clear(&mut self) {
        self.shared.write().store.clear();
    }

    /// Number of collected points.
    pub fn len(&self) -> usize {
        self.shared.read().store.len()
    }

    /// Whether no points have been collected.
    pub fn is_empty(&self) -> bool {
        self.shared.read().store.is_empty()
    }

    /// Copy-on-read snapshot of the collected points, oldest first.
    pub fn snapshot(&self) -> Vec<FieldPoint> {
        self.shared.read().store.points().to_vec()
    }

    /// Aggregate magnitude statistics over the collected points.
    pub fn statistics(&self, frame: Frame) -> FieldStatistics {
        self.shared.read().store.statistics(frame)
    }

    /// Bounding box over the collected positions.
    pub fn spatial_bounds(&self) -> SpatialBounds {
        self.shared.read().store.spatial_bounds()
    }

    /// Latest smoothed device-frame field, if the session has seen a sample.
    pub fn live_field(&self) -> Option<Vector3<f32>> {
        *self.live.borrow()
    }

    /// Subscribe to live smoothed-field updates at the sampling cadence.
    pub fn subscribe(&self) -> watch::Receiver<Option<Vector3<f32>>> {
        self.live.subscribe()
    }
}

impl Default for FieldCollector {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for FieldCollector {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The collection session task.
///
/// The persistence timer starts one period in, so the first capture never
/// races the very first sensor pull at t=0.
async fn run_session(
    settings: CollectorSettings,
    mut magnetometer: impl MagnetometerSource,
    mut pose: impl PoseSource,
    shared: Arc<RwLock<SessionShared>>,
    live: Arc<watch::Sender<Option<Vector3<f32>>>>,
) {
    let mut smoother = Smoother::new(settings.smoothing_factor);
    let mut sample_tick = interval(settings.sampling_interval);
    let mut persist_tick = interval_at(
        Instant::now() + settings.persist_interval,
        settings.persist_interval,
    );
    let mut sampled: u64 = 0;
    let mut captured: u64 = 0;
    let mut sensor_warned = false;

    loop {
        tokio::select! {
            _ = sample_tick.tick() => {
                match magnetometer.read() {
                    Some(raw) => {
                        let calibrated = settings.calibration.apply(raw);
                        let smoothed = smoother.update(calibrated);
                        live.send_replace(Some(smoothed));
                        sampled += 1;
                        if sampled % 100 == 0 {
                            tracing::debug!(sampled, "magnetometer samples processed");
                        }
                    }
                    None => {
                        if !sensor_warned {
                            tracing::warn!("magnetometer source has no sample available");
                            sensor_warned = true;
                        }
                    }
                }
            }
            _ = persist_tick.tick() => {
                // No smoothed field yet: skip the tick, do not fabricate a point.
                let Some(field) = *live.borrow() else {
                    continue;
                };
                let current_pose = pose.read();
                let point = FieldPoint::capture(
                    unix_timestamp(),
                    current_pose.position.unwrap_or(settings.fallback_position),
                    field,
                    current_pose.orientation,
                );

                let mut guard = shared.write();
                if !guard.active {
                    break;
                }
                guard.store.append(point);
                captured += 1;
                if captured % 20 == 0 {
                    tracing::debug!(captured, retained = guard.store.len(), "points captured");
                }
            }
        }
    }
}

fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs_f64()
}
