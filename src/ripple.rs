//! Pointer-drag ripples.
//!
//! Moving the pointer far enough, often enough, drops a [`Ripple`] at the
//! pointer. The render stage only ever sees the newest ripple, and only while
//! it is younger than [`RIPPLE_VISIBLE_SECS`]; older entries linger in the
//! tracker until [`RIPPLE_LIFETIME_MS`] and are then pruned.

use glam::Vec2;

/// Pointer travel (normalized units) that spawns a ripple.
pub const RIPPLE_DISTANCE_THRESHOLD: f32 = 0.005;

/// Pointer travel that refreshes the last recorded position without a ripple.
pub const POINTER_UPDATE_THRESHOLD: f32 = 0.001;

/// Minimum time between two ripples, in milliseconds.
pub const RIPPLE_MIN_INTERVAL_MS: f64 = 30.0;

/// Ripples at least this old are pruned, in milliseconds.
pub const RIPPLE_LIFETIME_MS: f64 = 3000.0;

/// Ripples at least this old are hidden from the shader, in seconds.
pub const RIPPLE_VISIBLE_SECS: f32 = 1.5;

/// Shader value meaning "no active ripple".
pub const NO_RIPPLE: f32 = -1.0;

/// One ripple event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ripple {
    /// Normalized pointer position at creation.
    pub origin: Vec2,
    /// Creation timestamp in milliseconds.
    pub start_ms: f64,
    /// Monotonically increasing identifier.
    pub id: u64,
}

impl Ripple {
    /// Age in milliseconds at `now_ms`.
    #[inline]
    pub fn age_ms(&self, now_ms: f64) -> f64 {
        now_ms - self.start_ms
    }
}

/// What the render stage sees of the ripples this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleSnapshot {
    /// Age of the active ripple in seconds, or [`NO_RIPPLE`].
    pub time: f32,
    /// Origin of the active ripple, or the current pointer if none.
    pub origin: Vec2,
}

impl RippleSnapshot {
    /// Whether a ripple is being shown.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.time >= 0.0
    }
}

/// Result of feeding one pointer sample to the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// A ripple was emitted.
    Rippled(u64),
    /// The last recorded pointer moved, no ripple.
    Moved,
    /// Movement below every threshold.
    Still,
}

/// Owns the ripple collection and the admission state.
#[derive(Debug, Clone, PartialEq)]
pub struct RippleTracker {
    ripples: Vec<Ripple>,
    last_pointer: Vec2,
    last_ripple_ms: Option<f64>,
    next_id: u64,
}

impl Default for RippleTracker {
    fn default() -> Self {
        Self::new(Vec2::splat(0.5))
    }
}

impl RippleTracker {
    /// Create a tracker whose last pointer sample is `pointer`.
    pub fn new(pointer: Vec2) -> Self {
        Self {
            ripples: Vec::new(),
            last_pointer: pointer,
            last_ripple_ms: None,
            next_id: 0,
        }
    }

    /// Live ripples in creation order.
    #[inline]
    pub fn ripples(&self) -> &[Ripple] {
        &self.ripples
    }

    /// Last recorded pointer position.
    #[inline]
    pub fn last_pointer(&self) -> Vec2 {
        self.last_pointer
    }

    /// Apply the admission policy to a pointer sample at `now_ms`.
    pub fn observe(&mut self, pointer: Vec2, now_ms: f64) -> PointerOutcome {
        let distance = pointer.distance(self.last_pointer);
        let interval_ok = self
            .last_ripple_ms
            .map_or(true, |last| now_ms - last > RIPPLE_MIN_INTERVAL_MS);

        let outcome = if distance > RIPPLE_DISTANCE_THRESHOLD && interval_ok {
            let id = self.next_id;
            self.next_id += 1;
            self.ripples.push(Ripple {
                origin: pointer,
                start_ms: now_ms,
                id,
            });
            self.last_ripple_ms = Some(now_ms);
            self.last_pointer = pointer;
            log::trace!("ripple {id} at ({:.3}, {:.3})", pointer.x, pointer.y);
            PointerOutcome::Rippled(id)
        } else if distance > POINTER_UPDATE_THRESHOLD {
            self.last_pointer = pointer;
            PointerOutcome::Moved
        } else {
            PointerOutcome::Still
        };

        self.prune(now_ms);
        outcome
    }

    /// Drop ripples that have outlived [`RIPPLE_LIFETIME_MS`].
    pub fn prune(&mut self, now_ms: f64) {
        self.ripples.retain(|r| r.age_ms(now_ms) < RIPPLE_LIFETIME_MS);
    }

    /// Newest ripple if it is still visible at `now_ms`.
    pub fn active(&self, now_ms: f64) -> Option<(&Ripple, f32)> {
        let newest = self.ripples.last()?;
        let age = (newest.age_ms(now_ms) / 1000.0) as f32;
        (age < RIPPLE_VISIBLE_SECS).then_some((newest, age))
    }

    /// Shader-facing view of the ripples at `now_ms`.
    pub fn snapshot(&self, now_ms: f64, pointer: Vec2) -> RippleSnapshot {
        match self.active(now_ms) {
            Some((ripple, age)) => RippleSnapshot {
                time: age,
                origin: ripple.origin,
            },
            None => RippleSnapshot {
                time: NO_RIPPLE,
                origin: pointer,
            },
        }
    }
}
