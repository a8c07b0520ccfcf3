//! Interchange encoding of collected point sets

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::FieldPoint;

/// Version tag written into every payload.
pub const FORMAT_VERSION: u32 = 1;

/// Self-contained payload: a version tag plus the point sequence.
///
/// Unknown fields are tolerated so newer writers can add metadata without
/// breaking this reader; missing or malformed required fields are not.
#[derive(Serialize, Deserialize)]
struct Envelope {
    version: u32,
    points: Vec<FieldPoint>,
}

/// Encode a point sequence into a self-contained byte payload.
///
/// The encoding is deterministic and losslessly round-trips every
/// [`FieldPoint`] field, including absent orientations.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use magtrace::{FieldPoint, decode_points, encode_points};
///
/// let points = vec![FieldPoint::capture(
///     0.5,
///     Vector3::zeros(),
///     Vector3::new(20.0, -1.0, -44.0),
///     None,
/// )];
/// let payload = encode_points(&points).unwrap();
/// assert_eq!(decode_points(&payload).unwrap(), points);
/// ```
pub fn encode_points(points: &[FieldPoint]) -> Result<Vec<u8>, Error> {
    let envelope = Envelope {
        version: FORMAT_VERSION,
        points: points.to_vec(),
    };
    Ok(serde_json::to_vec(&envelope)?)
}

/// Decode a payload produced by [`encode_points`].
///
/// All-or-nothing: a payload that does not parse, carries an unexpected
/// version, or contains any point violating the schema (missing field,
/// non-numeric value, wrong arity) yields an error and imports nothing.
/// Corrupt numeric data is never silently replaced with defaults.
pub fn decode_points(bytes: &[u8]) -> Result<Vec<FieldPoint>, Error> {
    let envelope: Envelope = serde_json::from_slice(bytes)?;
    if envelope.version != FORMAT_VERSION {
        return Err(Error::UnsupportedVersion {
            found: envelope.version,
            expected: FORMAT_VERSION,
        });
    }
    Ok(envelope.points)
}
