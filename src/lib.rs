//! magtrace - device-to-world magnetic field transform and sampling pipeline
//!
//! Core library for magnetometer survey apps: takes raw 3-axis field samples
//! plus a device orientation/pose, produces a stable world-frame field
//! vector, and maintains a bounded, timestamped collection of positioned
//! field points for AR visualization, statistics overlays, and export.
//!
//! # Features
//!
//! - Exponential smoothing of raw samples, decoupled from capture cadence
//! - Quaternion/matrix device-to-world transform with validated attitudes
//! - Capacity-bounded point store with batch eviction and aggregate stats
//! - Optional hard/soft-iron magnetometer calibration
//! - Lossless, versioned interchange encoding of collected sessions
//!
//! # Quick Start
//!
//! ```rust
//! use nalgebra::Vector3;
//! use magtrace::{Attitude, FieldPoint, Frame, PointStore};
//!
//! // Device-frame reading (microtesla) and the device attitude.
//! let raw = Vector3::new(22.0, 5.0, -43.0);
//! let attitude = Attitude::identity();
//!
//! // Rotate into world coordinates and record the capture.
//! let mut store = PointStore::new(1000, 0.1);
//! store.append(FieldPoint::capture(0.0, Vector3::zeros(), raw, Some(attitude)));
//!
//! let stats = store.statistics(Frame::World);
//! assert!((stats.mean - raw.norm()).abs() < 1e-4);
//! ```
//!
//! Live collection runs through [`FieldCollector`], which drives a fast
//! sensor-sampling timer and a slow point-capture timer on one cooperative
//! tokio task; see its documentation for the session lifecycle.

mod attitude;
mod calibration;
mod collector;
mod error;
mod export;
mod math;
mod smoothing;
mod store;
mod types;

pub use attitude::Attitude;
pub use calibration::MagneticCalibration;
pub use collector::{FieldCollector, MagnetometerSource, PoseSource, SimulatedPose};
pub use error::Error;
pub use export::{FORMAT_VERSION, decode_points, encode_points};
pub use math::{NORMALIZE_EPSILON, Vector3Ext, rotation_between};
pub use smoothing::{DEFAULT_SMOOTHING_FACTOR, Smoother};
pub use store::PointStore;
pub use types::{
    CollectorSettings, DEFAULT_EVICTION_BATCH_FRACTION, DEFAULT_PERSIST_INTERVAL,
    DEFAULT_SAMPLING_INTERVAL, DEFAULT_STORE_CAPACITY, DevicePose, FieldPoint, FieldStatistics,
    Frame, SpatialBounds,
};
