//! Easing curves and frame-rate independent smoothing.

/// Cubic ease-out: fast start, gentle landing. Input is clamped to `[0, 1]`.
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// A scalar that follows a target with critically damped spring motion.
///
/// `smooth_time` is roughly the time in seconds to reach the target. The
/// step never overshoots.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Damped {
    value: f32,
    velocity: f32,
}

impl Damped {
    /// Start at rest at `value`.
    pub fn new(value: f32) -> Self {
        Self {
            value,
            velocity: 0.0,
        }
    }

    /// Current value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Advance toward `target` by `delta` seconds and return the new value.
    pub fn step(&mut self, target: f32, smooth_time: f32, delta: f32) -> f32 {
        if delta <= 0.0 || !delta.is_finite() {
            return self.value;
        }
        let smooth_time = smooth_time.max(1e-4);
        let omega = 2.0 / smooth_time;
        let x = omega * delta;
        let decay = 1.0 / (1.0 + x + 0.48 * x * x + 0.235 * x * x * x);

        let change = self.value - target;
        let temp = (self.velocity + omega * change) * delta;
        self.velocity = (self.velocity - omega * temp) * decay;
        let mut output = target + (change + temp) * decay;

        // Clamp when the step crossed the target.
        if (target - self.value > 0.0) == (output > target) {
            output = target;
            self.velocity = 0.0;
        }
        self.value = output;
        self.value
    }
}
