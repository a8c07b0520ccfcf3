//! Magnetometer calibration (hard and soft iron correction)

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

use crate::types::{mat3_serde, vec3_serde};

/// Hard-iron and soft-iron correction applied to raw magnetometer readings.
///
/// `calibrated = soft_iron * (raw - hard_iron)`. The default is the identity
/// correction, which leaves readings untouched. Parameters typically come
/// from a one-off figure-eight calibration pass in the surrounding app.
///
/// # Example
/// ```
/// use nalgebra::{Matrix3, Vector3};
/// use magtrace::MagneticCalibration;
///
/// let calibration = MagneticCalibration {
///     soft_iron: Matrix3::identity(),
///     hard_iron: Vector3::new(10.0, 20.0, 30.0),
/// };
///
/// let corrected = calibration.apply(Vector3::new(100.0, 200.0, 300.0));
/// assert_eq!(corrected, Vector3::new(90.0, 180.0, 270.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MagneticCalibration {
    /// 3x3 soft iron correction matrix.
    #[serde(with = "mat3_serde")]
    pub soft_iron: Matrix3<f32>,
    /// Hard iron offset vector in microtesla.
    #[serde(with = "vec3_serde")]
    pub hard_iron: Vector3<f32>,
}

impl MagneticCalibration {
    /// The identity correction: readings pass through unchanged.
    pub fn identity() -> Self {
        Self {
            soft_iron: Matrix3::identity(),
            hard_iron: Vector3::zeros(),
        }
    }

    /// Apply the correction to a raw reading.
    pub fn apply(&self, raw: Vector3<f32>) -> Vector3<f32> {
        self.soft_iron * (raw - self.hard_iron)
    }
}

impl Default for MagneticCalibration {
    fn default() -> Self {
        Self::identity()
    }
}
