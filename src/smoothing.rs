//! Exponential smoothing of raw magnetometer samples

use nalgebra::Vector3;

/// Default weight given to each new sample.
pub const DEFAULT_SMOOTHING_FACTOR: f32 = 0.3;

/// Single-pole exponential smoothing filter for field vectors.
///
/// Carries exactly one piece of state, the last smoothed value. The first
/// sample after construction or [`reset`](Self::reset) passes through
/// unchanged; every later sample blends into the carried value as
/// `smoothed * (1 - alpha) + raw * alpha`.
///
/// The filter must never leak history across collection sessions, so the
/// collector resets it on every start.
///
/// # Example
/// ```
/// use nalgebra::Vector3;
/// use magtrace::Smoother;
///
/// let mut smoother = Smoother::new(0.3);
/// let first = smoother.update(Vector3::new(10.0, 0.0, 0.0));
/// assert_eq!(first, Vector3::new(10.0, 0.0, 0.0));
///
/// let second = smoother.update(Vector3::new(20.0, 0.0, 0.0));
/// assert!((second.x - 13.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Smoother {
    alpha: f32,
    state: Option<Vector3<f32>>,
}

impl Smoother {
    /// Create a filter with the given smoothing factor.
    ///
    /// `alpha` is clamped to `[0, 1]`; 1 disables smoothing entirely and 0
    /// freezes the output at the first sample.
    pub fn new(alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            state: None,
        }
    }

    /// Blend a raw sample into the carried state and return the new
    /// smoothed value.
    pub fn update(&mut self, raw: Vector3<f32>) -> Vector3<f32> {
        let smoothed = match self.state {
            Some(prev) => prev * (1.0 - self.alpha) + raw * self.alpha,
            None => raw,
        };
        self.state = Some(smoothed);
        smoothed
    }

    /// The last smoothed value, if any sample has been seen.
    pub fn output(&self) -> Option<Vector3<f32>> {
        self.state
    }

    /// Discard carried state; the next sample passes through unchanged.
    pub fn reset(&mut self) {
        self.state = None;
    }

    /// The configured smoothing factor.
    pub fn alpha(&self) -> f32 {
        self.alpha
    }
}

impl Default for Smoother {
    fn default() -> Self {
        Self::new(DEFAULT_SMOOTHING_FACTOR)
    }
}
