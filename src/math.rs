//! Vector helpers and rotation construction for the field transform pipeline

use nalgebra::{UnitQuaternion, Vector3};

/// Magnitudes below this are treated as zero when normalizing.
pub const NORMALIZE_EPSILON: f32 = 1e-9;

/// Cosine margin within which two unit vectors count as aligned or opposed.
const ALIGNMENT_EPSILON: f32 = 1e-6;

/// Extension trait for field-vector operations
pub trait Vector3Ext {
    /// Calculate the magnitude of the vector
    fn magnitude(&self) -> f32;

    /// Normalize the vector, falling back to the unit Z axis when the
    /// magnitude is below [`NORMALIZE_EPSILON`].
    ///
    /// The fallback is deliberate: downstream glyph builders always need a
    /// direction, so a zero-length field resolves to `(0, 0, 1)` rather
    /// than NaN or a degenerate vector.
    fn safe_normalize(&self) -> Vector3<f32>;

    /// Compass bearing of the horizontal field components in degrees,
    /// `[0, 360)`. World X maps to 0 (north), world Y to 90 (east).
    fn heading_deg(&self) -> f32;

    /// Dip angle of the field below the horizontal plane in degrees.
    ///
    /// Positive when the field points below the horizon (world Z up), as
    /// Earth's field does in the northern hemisphere.
    fn inclination_deg(&self) -> f32;
}

impl Vector3Ext for Vector3<f32> {
    fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    fn safe_normalize(&self) -> Vector3<f32> {
        let mag = self.magnitude();
        if mag < NORMALIZE_EPSILON {
            Vector3::z()
        } else {
            *self / mag
        }
    }

    fn heading_deg(&self) -> f32 {
        let mut deg = self.y.atan2(self.x).to_degrees();
        if deg < 0.0 {
            deg += 360.0;
        }
        deg
    }

    fn inclination_deg(&self) -> f32 {
        let horizontal = (self.x * self.x + self.y * self.y).sqrt();
        (-self.z).atan2(horizontal).to_degrees()
    }
}

/// Minimal rotation mapping the direction of `from` onto the direction of `to`.
///
/// Inputs need not be unit length; both are normalized first. Edge cases:
/// - coincident directions return the identity rotation
/// - opposed directions return a 180 degree rotation about a deterministic
///   perpendicular (built from the coordinate axis least aligned with `from`)
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use magtrace::rotation_between;
///
/// let rotation = rotation_between(Vector3::x(), Vector3::y());
/// let mapped = rotation * Vector3::x();
/// assert!((mapped - Vector3::y()).norm() < 1e-6);
/// ```
pub fn rotation_between(from: Vector3<f32>, to: Vector3<f32>) -> UnitQuaternion<f32> {
    let from = from.safe_normalize();
    let to = to.safe_normalize();
    let dot = from.dot(&to);

    if dot > 1.0 - ALIGNMENT_EPSILON {
        return UnitQuaternion::identity();
    }

    if dot < -1.0 + ALIGNMENT_EPSILON {
        let axis = perpendicular_to(from);
        return UnitQuaternion::from_scaled_axis(axis * core::f32::consts::PI);
    }

    let axis = from.cross(&to).safe_normalize();
    let angle = dot.clamp(-1.0, 1.0).acos();
    UnitQuaternion::from_scaled_axis(axis * angle)
}

/// Unit vector perpendicular to `unit`, chosen deterministically.
///
/// Seeds from the coordinate axis least aligned with `unit` so the
/// orthogonalization never collapses.
fn perpendicular_to(unit: Vector3<f32>) -> Vector3<f32> {
    let abs = unit.abs();
    let seed = if abs.x <= abs.y && abs.x <= abs.z {
        Vector3::x()
    } else if abs.y <= abs.z {
        Vector3::y()
    } else {
        Vector3::z()
    };
    (seed - unit * seed.dot(&unit)).safe_normalize()
}
