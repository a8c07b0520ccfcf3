//! Core data types and configuration for the sampling pipeline

use std::time::Duration;

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::attitude::Attitude;
use crate::calibration::MagneticCalibration;
use crate::smoothing::DEFAULT_SMOOTHING_FACTOR;

/// Default cadence at which raw sensor samples are pulled and smoothed.
pub const DEFAULT_SAMPLING_INTERVAL: Duration = Duration::from_millis(100);
/// Default cadence at which points are captured into the store.
pub const DEFAULT_PERSIST_INTERVAL: Duration = Duration::from_millis(500);
/// Default maximum number of retained points.
pub const DEFAULT_STORE_CAPACITY: usize = 1000;
/// Default fraction of capacity evicted in one batch when over the cap.
pub const DEFAULT_EVICTION_BATCH_FRACTION: f32 = 0.1;

/// One captured magnetic field sample, pinned to a time and a place.
///
/// Created once by the collector at capture time and never mutated;
/// points leave the store only through eviction or an explicit clear.
///
/// `world_field` is `raw_field` rotated into the world frame when an
/// orientation was available, and equals `raw_field` otherwise —
/// `orientation: None` marks the degraded case so consumers can tell the
/// two apart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldPoint {
    /// Capture instant, seconds since the UNIX epoch.
    pub timestamp: f64,
    /// World-frame device position at capture time, meters.
    #[serde(with = "vec3_serde")]
    pub position: Vector3<f32>,
    /// Smoothed device-frame magnetometer reading, microtesla.
    #[serde(with = "vec3_serde")]
    pub raw_field: Vector3<f32>,
    /// Device attitude at capture time; `None` when the pose was unavailable.
    pub orientation: Option<Attitude>,
    /// Field in world coordinates, microtesla.
    #[serde(with = "vec3_serde")]
    pub world_field: Vector3<f32>,
}

impl FieldPoint {
    /// Build a point from a capture, deriving `world_field` from the
    /// optional orientation.
    pub fn capture(
        timestamp: f64,
        position: Vector3<f32>,
        raw_field: Vector3<f32>,
        orientation: Option<Attitude>,
    ) -> Self {
        let world_field = match orientation {
            Some(attitude) => attitude.to_world(raw_field),
            None => raw_field,
        };
        Self {
            timestamp,
            position,
            raw_field,
            orientation,
            world_field,
        }
    }
}

/// Latest known device pose, as reported by the tracking subsystem.
///
/// Position and orientation degrade independently: an AR session may lose
/// world tracking (no position) while the IMU still supplies attitude, or
/// vice versa.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DevicePose {
    /// World-frame position in meters, if tracking is available.
    pub position: Option<Vector3<f32>>,
    /// Device attitude, if available.
    pub orientation: Option<Attitude>,
}

/// Which vector the aggregate statistics are computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Frame {
    /// `world_field` magnitudes (the default).
    #[default]
    World,
    /// `raw_field` magnitudes.
    Device,
}

/// Aggregate magnitude statistics over the current store contents.
///
/// All three values are 0 for an empty store; that is a defined result,
/// not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldStatistics {
    /// Smallest field magnitude, microtesla.
    pub min: f32,
    /// Largest field magnitude, microtesla.
    pub max: f32,
    /// Mean field magnitude, microtesla.
    pub mean: f32,
}

/// Axis-aligned bounding box over captured positions.
///
/// Both corners sit at the origin for an empty store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialBounds {
    /// Componentwise minimum corner.
    pub min: Vector3<f32>,
    /// Componentwise maximum corner.
    pub max: Vector3<f32>,
}

impl Default for SpatialBounds {
    fn default() -> Self {
        Self {
            min: Vector3::zeros(),
            max: Vector3::zeros(),
        }
    }
}

/// Collection session configuration.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use magtrace::CollectorSettings;
///
/// let settings = CollectorSettings {
///     persist_interval: Duration::from_secs(1),
///     store_capacity: 5000,
///     ..Default::default()
/// };
/// assert_eq!(settings.smoothing_factor, 0.3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CollectorSettings {
    /// Cadence of the fast timer that pulls and smooths raw sensor samples.
    ///
    /// Decoupled from `persist_interval` so live-reading visualization can
    /// update faster than the recorded series.
    pub sampling_interval: Duration,
    /// Cadence of the slow timer that captures points into the store.
    pub persist_interval: Duration,
    /// Exponential smoothing factor; weight given to each new sample.
    ///
    /// 1.0 disables smoothing. Clamped to `[0, 1]` when the session starts.
    pub smoothing_factor: f32,
    /// Maximum number of retained points before eviction kicks in.
    pub store_capacity: usize,
    /// Fraction of capacity evicted in one oldest-first batch when the
    /// store exceeds capacity.
    ///
    /// Batching keeps eviction from running on every single insert once
    /// the store is full.
    pub eviction_batch_fraction: f32,
    /// Position recorded when the pose source has no tracking fix.
    #[serde(with = "vec3_serde")]
    pub fallback_position: Vector3<f32>,
    /// Correction applied to every raw sample before smoothing.
    pub calibration: MagneticCalibration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            sampling_interval: DEFAULT_SAMPLING_INTERVAL,
            persist_interval: DEFAULT_PERSIST_INTERVAL,
            smoothing_factor: DEFAULT_SMOOTHING_FACTOR,
            store_capacity: DEFAULT_STORE_CAPACITY,
            eviction_batch_fraction: DEFAULT_EVICTION_BATCH_FRACTION,
            fallback_position: Vector3::zeros(),
            calibration: MagneticCalibration::identity(),
        }
    }
}

// Serde helpers giving math types a compact array representation in the
// interchange payload ([x, y, z] rather than a struct of fields).

pub(crate) mod vec3_serde {
    use nalgebra::Vector3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vector3<f32>, s: S) -> Result<S::Ok, S::Error> {
        [v.x, v.y, v.z].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vector3<f32>, D::Error> {
        let [x, y, z] = <[f32; 3]>::deserialize(d)?;
        Ok(Vector3::new(x, y, z))
    }
}

pub(crate) mod mat3_serde {
    use nalgebra::Matrix3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(m: &Matrix3<f32>, s: S) -> Result<S::Ok, S::Error> {
        let rows: [[f32; 3]; 3] = [
            [m[(0, 0)], m[(0, 1)], m[(0, 2)]],
            [m[(1, 0)], m[(1, 1)], m[(1, 2)]],
            [m[(2, 0)], m[(2, 1)], m[(2, 2)]],
        ];
        rows.serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Matrix3<f32>, D::Error> {
        let r = <[[f32; 3]; 3]>::deserialize(d)?;
        Ok(Matrix3::new(
            r[0][0], r[0][1], r[0][2], r[1][0], r[1][1], r[1][2], r[2][0], r[2][1], r[2][2],
        ))
    }
}
