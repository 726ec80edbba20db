//! Intro reveal animation.
//!
//! The reveal grows a soft-edged disc from the world origin over
//! [`REVEAL_DURATION`] seconds. It runs once per session:
//!
//! ```text
//! NotStarted --first frame--> Revealing --progress hits 1.0--> Revealed
//! ```
//!
//! `Revealed` is terminal. Rewinding time afterwards (manual time) does not
//! bring the animation back.

use crate::easing::ease_out_cubic;

/// Seconds from first frame to fully revealed.
pub const REVEAL_DURATION: f32 = 3.5;

/// Reveal radius in world units at full progress.
pub const REVEAL_RADIUS: f32 = 4.0;

/// Phase of the reveal animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RevealState {
    /// No frame has run yet.
    NotStarted,
    /// Animating; `start` is the time of the first frame.
    Revealing { start: f32 },
    /// Done for the rest of the session.
    Revealed,
}

/// Values the render stage needs from the reveal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealFrame {
    /// Eased progress in `[0, 1]`.
    pub progress: f32,
    /// Reveal radius fed to the shader (`progress × REVEAL_RADIUS`).
    pub factor: f32,
    /// Whether the animation is still running.
    pub revealing: bool,
}

/// Lazily started, one-shot reveal timer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealTimer {
    state: RevealState,
    duration: f32,
    progress: f32,
}

impl Default for RevealTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl RevealTimer {
    /// A timer that has not seen a frame yet.
    pub fn new() -> Self {
        Self::with_duration(REVEAL_DURATION)
    }

    /// A timer with a custom duration in seconds.
    pub fn with_duration(duration: f32) -> Self {
        Self {
            state: RevealState::NotStarted,
            duration: duration.max(f32::EPSILON),
            progress: 0.0,
        }
    }

    /// Current phase.
    #[inline]
    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Whether the reveal is still animating (or has not started).
    #[inline]
    pub fn is_revealing(&self) -> bool {
        !matches!(self.state, RevealState::Revealed)
    }

    /// Advance to `now` (seconds) and return the frame's reveal values.
    pub fn advance(&mut self, now: f32) -> RevealFrame {
        if let RevealState::NotStarted = self.state {
            self.state = RevealState::Revealing { start: now };
        }

        if let RevealState::Revealing { start } = self.state {
            let linear = ((now - start) / self.duration).clamp(0.0, 1.0);
            // Latch the running maximum so a rewound clock cannot shrink it.
            self.progress = self.progress.max(ease_out_cubic(linear));
            // The eased curve rounds to 1.0 a few milliseconds early in f32.
            if self.progress >= 1.0 {
                self.progress = 1.0;
                self.state = RevealState::Revealed;
                log::debug!("reveal complete at t={now:.2}s");
            }
        }

        RevealFrame {
            progress: self.progress,
            factor: self.progress * REVEAL_RADIUS,
            revealing: self.is_revealing(),
        }
    }
}
