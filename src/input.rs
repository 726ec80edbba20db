//! Pointer and keyboard state gathered from window events.
//!
//! The pointer is reported in normalized window coordinates
//! (`x = cursor.x / width`, `y = cursor.y / height`, origin top-left) and is
//! not clamped, so a cursor dragged outside the window reads outside `[0, 1]`.
//! Hovering starts on the first cursor move and ends when the cursor leaves.
//! A resize only changes the scale used for the next cursor move; the pointer
//! itself holds still so a resize never reads as a drag.

use glam::Vec2;
use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

use crate::config::ParticleConfig;

/// Focus change per arrow press.
pub const FOCUS_STEP: f32 = 0.1;
/// Aperture change per arrow press.
pub const APERTURE_STEP: f32 = 0.05;

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Space,
    Up,
    Down,
    Left,
    Right,
    Escape,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::ArrowUp => KeyCode::Up,
            WinitKeyCode::ArrowDown => KeyCode::Down,
            WinitKeyCode::ArrowLeft => KeyCode::Left,
            WinitKeyCode::ArrowRight => KeyCode::Right,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// What the host should do after applying this frame's keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    Continue,
    Exit,
}

/// Input state for one window.
#[derive(Debug)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    pointer: Vec2,
    hovering: bool,
    window_size: (u32, u32),
}

impl Default for Input {
    fn default() -> Self {
        Self::new()
    }
}

impl Input {
    /// No keys held, pointer centred, not hovering.
    pub fn new() -> Self {
        Self {
            keys_held: HashSet::new(),
            keys_pressed: HashSet::new(),
            pointer: Vec2::splat(0.5),
            hovering: false,
            window_size: (800, 600),
        }
    }

    /// Whether `key` went down since the last [`Input::begin_frame`].
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_held(&self, key: KeyCode) -> bool {
        self.keys_held.contains(&key)
    }

    /// Normalized pointer position.
    pub fn pointer(&self) -> Vec2 {
        self.pointer
    }

    /// Whether the cursor is over the window.
    pub fn hovering(&self) -> bool {
        self.hovering
    }

    /// Clear per-frame state. Call after the frame consumed its input.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
    }

    /// Update the size used to normalize the next cursor move.
    pub fn set_window_size(&mut self, width: u32, height: u32) {
        self.window_size = (width, height);
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(code) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press(code.into()),
                        ElementState::Released => self.release(code.into()),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(position.x as f32, position.y as f32);
            }
            WindowEvent::CursorLeft { .. } => self.leave(),
            _ => {}
        }
    }

    fn press(&mut self, key: KeyCode) {
        // Key repeat does not count as a new press.
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    fn move_cursor(&mut self, x: f32, y: f32) {
        self.hovering = true;
        let (w, h) = self.window_size;
        if w > 0 && h > 0 {
            self.pointer = Vec2::new(x, y) / Vec2::new(w as f32, h as f32);
        }
    }

    fn leave(&mut self) {
        self.hovering = false;
    }

    /// Apply this frame's key presses to `config`.
    ///
    /// `Space` toggles manual time, freezing at `now`. The arrow keys nudge
    /// focus and aperture. `Escape` asks the host to exit.
    pub fn apply_controls(&self, config: &mut ParticleConfig, now: f32) -> ControlFlow {
        if self.key_pressed(KeyCode::Space) {
            config.use_manual_time = !config.use_manual_time;
            if config.use_manual_time {
                config.manual_time = now;
            }
            log::info!(
                "time {}",
                if config.use_manual_time { "frozen" } else { "running" }
            );
        }
        if self.key_pressed(KeyCode::Up) {
            config.focus += FOCUS_STEP;
        }
        if self.key_pressed(KeyCode::Down) {
            config.focus = (config.focus - FOCUS_STEP).max(0.0);
        }
        if self.key_pressed(KeyCode::Right) {
            config.aperture += APERTURE_STEP;
        }
        if self.key_pressed(KeyCode::Left) {
            config.aperture = (config.aperture - APERTURE_STEP).max(0.0);
        }
        if self.key_pressed(KeyCode::Up) || self.key_pressed(KeyCode::Down) {
            log::debug!("focus {:.2}", config.focus);
        }
        if self.key_pressed(KeyCode::Left) || self.key_pressed(KeyCode::Right) {
            log::debug!("aperture {:.2}", config.aperture);
        }

        if self.key_pressed(KeyCode::Escape) {
            ControlFlow::Exit
        } else {
            ControlFlow::Continue
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state() {
        let mut input = Input::new();
        assert!(!input.key_held(KeyCode::Space));

        input.press(KeyCode::Space);
        assert!(input.key_held(KeyCode::Space));
        assert!(input.key_pressed(KeyCode::Space));

        // Held across frames, pressed only once.
        input.begin_frame();
        input.press(KeyCode::Space);
        assert!(input.key_held(KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));

        input.release(KeyCode::Space);
        assert!(!input.key_held(KeyCode::Space));
    }

    #[test]
    fn test_pointer_normalized() {
        let mut input = Input::new();
        input.set_window_size(800, 600);
        input.move_cursor(400.0, 150.0);
        assert_eq!(input.pointer(), Vec2::new(0.5, 0.25));
        assert!(input.hovering());

        // Not clamped outside the window.
        input.move_cursor(-80.0, 900.0);
        assert_eq!(input.pointer(), Vec2::new(-0.1, 1.5));

        input.leave();
        assert!(!input.hovering());
    }

    #[test]
    fn test_pointer_centred_until_cursor_moves() {
        let mut input = Input::new();
        input.set_window_size(1280, 720);
        assert_eq!(input.pointer(), Vec2::splat(0.5));
        assert!(!input.hovering());
    }

    #[test]
    fn test_resize_holds_pointer_until_next_move() {
        let mut input = Input::new();
        input.set_window_size(100, 100);
        input.move_cursor(50.0, 50.0);
        input.set_window_size(200, 100);
        assert_eq!(input.pointer(), Vec2::new(0.5, 0.5));

        input.move_cursor(50.0, 50.0);
        assert_eq!(input.pointer(), Vec2::new(0.25, 0.5));
    }

    #[test]
    fn test_space_freezes_time() {
        let mut input = Input::new();
        let mut config = ParticleConfig::default();

        input.press(KeyCode::Space);
        assert_eq!(input.apply_controls(&mut config, 4.5), ControlFlow::Continue);
        assert!(config.use_manual_time);
        assert_eq!(config.manual_time, 4.5);

        input.begin_frame();
        input.release(KeyCode::Space);
        input.press(KeyCode::Space);
        input.apply_controls(&mut config, 9.0);
        assert!(!config.use_manual_time);
        assert_eq!(config.manual_time, 4.5);
    }

    #[test]
    fn test_arrows_adjust_focus_and_aperture() {
        let mut input = Input::new();
        let mut config = ParticleConfig::default();
        input.press(KeyCode::Up);
        input.press(KeyCode::Left);
        input.apply_controls(&mut config, 0.0);
        assert!((config.focus - 3.9).abs() < 1e-5);
        assert!((config.aperture - 1.74).abs() < 1e-5);
    }

    #[test]
    fn test_escape_exits() {
        let mut input = Input::new();
        input.press(KeyCode::Escape);
        assert_eq!(
            input.apply_controls(&mut ParticleConfig::default(), 0.0),
            ControlFlow::Exit
        );
    }
}
