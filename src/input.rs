//! Input polling for the scene.
//!
//! The scene consumes input through the [`InputState`] trait: a mouse delta
//! and an is-pressed query over the fixed [`Control`] set. [`WinitInput`]
//! implements it by accumulating winit events between frames; tests substitute
//! their own implementations.

use std::collections::HashSet;

use winit::{
    event::{DeviceEvent, ElementState, KeyEvent, WindowEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// The fixed set of controls the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    Forward,
    Backward,
    Left,
    Right,
    FilterPoint,
    FilterLinear,
    FilterAnisotropic,
}

/// Input snapshot polled once per scene update.
pub trait InputState {
    /// Mouse movement accumulated since the previous frame.
    fn mouse_delta(&self) -> (f32, f32);

    fn is_pressed(&self, control: Control) -> bool;
}

/// [`InputState`] over winit's event stream.
#[derive(Debug, Default)]
pub struct WinitInput {
    pressed: HashSet<KeyCode>,
    mouse_delta: (f32, f32),
}

impl WinitInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) {
        if let WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    physical_key: PhysicalKey::Code(code),
                    state,
                    ..
                },
            ..
        } = event
        {
            match state {
                ElementState::Pressed => {
                    self.pressed.insert(*code);
                }
                ElementState::Released => {
                    self.pressed.remove(code);
                }
            }
        }
    }

    pub fn handle_device_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.mouse_delta.0 += *dx as f32;
            self.mouse_delta.1 += *dy as f32;
        }
    }

    /// Reset the accumulated mouse delta; called after each scene update.
    pub fn end_frame(&mut self) {
        self.mouse_delta = (0.0, 0.0);
    }

    fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|code| self.pressed.contains(code))
    }
}

impl InputState for WinitInput {
    fn mouse_delta(&self) -> (f32, f32) {
        self.mouse_delta
    }

    fn is_pressed(&self, control: Control) -> bool {
        match control {
            Control::Forward => self.any_pressed(&[KeyCode::KeyW, KeyCode::ArrowUp]),
            Control::Backward => self.any_pressed(&[KeyCode::KeyS, KeyCode::ArrowDown]),
            Control::Left => self.any_pressed(&[KeyCode::KeyA, KeyCode::ArrowLeft]),
            Control::Right => self.any_pressed(&[KeyCode::KeyD, KeyCode::ArrowRight]),
            Control::FilterPoint => self.any_pressed(&[KeyCode::KeyF]),
            Control::FilterLinear => self.any_pressed(&[KeyCode::KeyG]),
            Control::FilterAnisotropic => self.any_pressed(&[KeyCode::KeyH]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mouse_motion_accumulates_until_end_frame() {
        let mut input = WinitInput::new();
        input.handle_device_event(&DeviceEvent::MouseMotion { delta: (3.0, -1.0) });
        input.handle_device_event(&DeviceEvent::MouseMotion { delta: (2.0, 2.0) });
        assert_eq!(input.mouse_delta(), (5.0, 1.0));
        input.end_frame();
        assert_eq!(input.mouse_delta(), (0.0, 0.0));
    }

    #[test]
    fn either_binding_triggers_a_control() {
        let mut input = WinitInput::new();
        input.pressed.insert(KeyCode::ArrowUp);
        assert!(input.is_pressed(Control::Forward));
        assert!(!input.is_pressed(Control::Backward));
        input.pressed.insert(KeyCode::KeyS);
        assert!(input.is_pressed(Control::Backward));
    }
}
