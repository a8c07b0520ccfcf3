//! Device attitude and the device-to-world transform

use nalgebra::{Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector3};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Row norms may deviate from 1 by at most this much.
const ROW_NORM_TOLERANCE: f32 = 1e-4;
/// Dot products between distinct rows may deviate from 0 by at most this much.
const ORTHOGONALITY_TOLERANCE: f32 = 1e-4;
/// The determinant may deviate from +1 by at most this much.
const DETERMINANT_TOLERANCE: f32 = 1e-3;
/// Serialized quaternion norms may deviate from 1 by at most this much.
const UNIT_NORM_TOLERANCE: f32 = 1e-3;

/// Device attitude relative to the world reference frame.
///
/// Stored as a unit quaternion; convertible to and from an orthonormal
/// row-major 3x3 rotation matrix. Rotating a device-frame vector by an
/// `Attitude` yields the same vector expressed in world coordinates.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use magtrace::Attitude;
///
/// // Device yawed 90 degrees: device X points along world Y.
/// let attitude = Attitude::from_parts(0.0, 0.0, 0.70710678, 0.70710678);
/// let world = attitude.to_world(Vector3::new(1.0, 0.0, 0.0));
/// assert!((world - Vector3::new(0.0, 1.0, 0.0)).norm() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attitude(UnitQuaternion<f32>);

impl Attitude {
    /// The identity attitude: device axes coincide with world axes.
    pub fn identity() -> Self {
        Self(UnitQuaternion::identity())
    }

    /// Wrap an existing unit quaternion.
    pub fn from_quaternion(quaternion: UnitQuaternion<f32>) -> Self {
        Self(quaternion)
    }

    /// Build from raw quaternion components `(i, j, k, w)`, normalizing.
    pub fn from_parts(i: f32, j: f32, k: f32, w: f32) -> Self {
        Self(UnitQuaternion::new_normalize(Quaternion::new(w, i, j, k)))
    }

    /// Build from a row-major 3x3 rotation matrix.
    ///
    /// The matrix must be orthonormal within floating tolerance and must not
    /// encode a reflection; anything else is rejected with
    /// [`Error::NonOrthonormal`] rather than silently renormalized.
    pub fn from_matrix(matrix: &Matrix3<f32>) -> Result<Self, Error> {
        for r in 0..3 {
            if (matrix.row(r).norm() - 1.0).abs() > ROW_NORM_TOLERANCE {
                return Err(Error::NonOrthonormal("row is not unit length"));
            }
        }
        for (a, b) in [(0, 1), (0, 2), (1, 2)] {
            if matrix.row(a).dot(&matrix.row(b)).abs() > ORTHOGONALITY_TOLERANCE {
                return Err(Error::NonOrthonormal("rows are not perpendicular"));
            }
        }
        if (matrix.determinant() - 1.0).abs() > DETERMINANT_TOLERANCE {
            return Err(Error::NonOrthonormal("determinant is not +1"));
        }

        let rotation = Rotation3::from_matrix_unchecked(*matrix);
        Ok(Self(UnitQuaternion::from_rotation_matrix(&rotation)))
    }

    /// The underlying unit quaternion.
    pub fn quaternion(&self) -> UnitQuaternion<f32> {
        self.0
    }

    /// The equivalent row-major rotation matrix.
    pub fn to_matrix(&self) -> Matrix3<f32> {
        self.0.to_rotation_matrix().into_inner()
    }

    /// Rotate a device-frame vector into the world frame.
    pub fn to_world(&self, device: Vector3<f32>) -> Vector3<f32> {
        self.0 * device
    }

    /// The inverse attitude (world-to-device transform).
    pub fn inverse(&self) -> Self {
        Self(self.0.inverse())
    }
}

impl Default for Attitude {
    fn default() -> Self {
        Self::identity()
    }
}

// Serialized as an [i, j, k, w] array. Deserialization insists on a finite,
// near-unit quaternion so corrupt payloads fail instead of degrading.

impl Serialize for Attitude {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let q = self.0.as_ref();
        [q.i, q.j, q.k, q.w].serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Attitude {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let [i, j, k, w] = <[f32; 4]>::deserialize(deserializer)?;
        let quaternion = Quaternion::new(w, i, j, k);
        let norm = quaternion.norm();
        if !norm.is_finite() || (norm - 1.0).abs() > UNIT_NORM_TOLERANCE {
            return Err(D::Error::custom("orientation quaternion is not unit length"));
        }
        // Within tolerance of unit length; wrap without renormalizing so
        // encode/decode round-trips are bit-exact.
        Ok(Self(nalgebra::Unit::new_unchecked(quaternion)))
    }
}
