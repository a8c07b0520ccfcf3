//! Bounded, insertion-ordered storage for captured field points

use nalgebra::Vector3;

use crate::types::{
    DEFAULT_EVICTION_BATCH_FRACTION, DEFAULT_STORE_CAPACITY, FieldPoint, FieldStatistics, Frame,
    SpatialBounds,
};

/// Ordered collection of captured points with a hard retention cap.
///
/// Insertion order is preserved. Once an append pushes the count past
/// `capacity`, a contiguous batch of the oldest entries is dropped in one
/// go — batching keeps a full store from paying an eviction on every
/// single insert. `count <= capacity` holds after every append.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use magtrace::{FieldPoint, Frame, PointStore};
///
/// let mut store = PointStore::new(100, 0.1);
/// store.append(FieldPoint::capture(
///     0.0,
///     Vector3::zeros(),
///     Vector3::new(30.0, 0.0, -40.0),
///     None,
/// ));
///
/// let stats = store.statistics(Frame::World);
/// assert_eq!(stats.mean, 50.0);
/// ```
#[derive(Debug, Clone)]
pub struct PointStore {
    points: Vec<FieldPoint>,
    capacity: usize,
    eviction_batch: usize,
}

impl PointStore {
    /// Create a store holding at most `capacity` points, evicting
    /// `ceil(capacity * eviction_batch_fraction)` (at least one) oldest
    /// entries per overflow.
    pub fn new(capacity: usize, eviction_batch_fraction: f32) -> Self {
        let fraction = eviction_batch_fraction.clamp(0.0, 1.0);
        let eviction_batch = ((capacity as f32 * fraction).ceil() as usize).max(1);
        Self {
            points: Vec::with_capacity(capacity.min(4096)),
            capacity,
            eviction_batch,
        }
    }

    /// Append a point, evicting the oldest batch if the cap is exceeded.
    pub fn append(&mut self, point: FieldPoint) {
        self.points.push(point);
        if self.points.len() > self.capacity {
            let batch = self.eviction_batch.min(self.points.len());
            self.points.drain(..batch);
        }
    }

    /// Remove every point. Idempotent.
    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Number of retained points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the store holds no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The retention cap.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The retained points, oldest first.
    pub fn points(&self) -> &[FieldPoint] {
        &self.points
    }

    /// Min/max/mean field magnitude over the retained points.
    ///
    /// Returns the zero triple for an empty store.
    pub fn statistics(&self, frame: Frame) -> FieldStatistics {
        if self.points.is_empty() {
            return FieldStatistics::default();
        }

        let mut min = f32::MAX;
        let mut max = f32::MIN;
        let mut sum = 0.0f64;
        for point in &self.points {
            let magnitude = match frame {
                Frame::World => point.world_field.magnitude(),
                Frame::Device => point.raw_field.magnitude(),
            };
            min = min.min(magnitude);
            max = max.max(magnitude);
            sum += f64::from(magnitude);
        }

        FieldStatistics {
            min,
            max,
            mean: (sum / self.points.len() as f64) as f32,
        }
    }

    /// Axis-aligned bounding box over the retained positions.
    ///
    /// Returns an origin-to-origin box for an empty store.
    pub fn spatial_bounds(&self) -> SpatialBounds {
        if self.points.is_empty() {
            return SpatialBounds::default();
        }

        let mut min = Vector3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Vector3::new(f32::MIN, f32::MIN, f32::MIN);
        for point in &self.points {
            min = min.inf(&point.position);
            max = max.sup(&point.position);
        }
        SpatialBounds { min, max }
    }
}

impl Default for PointStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_CAPACITY, DEFAULT_EVICTION_BATCH_FRACTION)
    }
}
