use std::collections::HashSet;

use glam::Vec2;
use tracing::debug;
use winit::keyboard::KeyCode;

use super::input::{InputAction, PressedKeys};
use super::pad::{DirectionalPad, PointerId};
use super::scene::InputSnapshot;

/// Window input translated into device terms. Positions are physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DeviceEvent {
    Key { key: KeyCode, pressed: bool },
    PointerDown { pointer: PointerId, position: Vec2 },
    PointerMoved { pointer: PointerId, position: Vec2 },
    PointerUp { pointer: PointerId },
    PointerCancelled { pointer: PointerId },
    FocusLost,
    Resized { width: u32, height: u32 },
}

/// Keyboard, on-screen pad and pointer state for one window.
///
/// Events are ignored until [`InputDevice::start`] and after
/// [`InputDevice::stop`]; stopping drops every held key and pointer.
#[derive(Debug)]
pub struct InputDevice {
    running: bool,
    keys: PressedKeys,
    pad: DirectionalPad,
    held_pointers: HashSet<PointerId>,
    cursor_position_px: Option<Vec2>,
    click_pressed_edge: Option<Vec2>,
    dismiss_pressed_edge: bool,
    overlay_toggle_pressed_edge: bool,
    window_width: u32,
    window_height: u32,
}

impl InputDevice {
    pub fn new(window_width: u32, window_height: u32, pad_travel_radius: f32) -> Self {
        Self {
            running: false,
            keys: PressedKeys::default(),
            pad: DirectionalPad::for_viewport(window_width, window_height, pad_travel_radius),
            held_pointers: HashSet::new(),
            cursor_position_px: None,
            click_pressed_edge: None,
            dismiss_pressed_edge: false,
            overlay_toggle_pressed_edge: false,
            window_width,
            window_height,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
        debug!("input_device_started");
    }

    pub fn stop(&mut self) {
        self.running = false;
        self.keys.clear();
        self.pad.reset();
        self.held_pointers.clear();
        self.click_pressed_edge = None;
        self.dismiss_pressed_edge = false;
        self.overlay_toggle_pressed_edge = false;
        debug!("input_device_stopped");
    }

    pub fn pad(&self) -> &DirectionalPad {
        &self.pad
    }

    pub fn cursor_position(&self) -> Option<Vec2> {
        self.cursor_position_px
    }

    pub fn clear_cursor_position(&mut self) {
        self.cursor_position_px = None;
    }

    pub fn handle(&mut self, event: DeviceEvent) {
        if !self.running {
            return;
        }
        match event {
            DeviceEvent::Key { key, pressed } => self.handle_key(key, pressed),
            DeviceEvent::PointerDown { pointer, position } => {
                self.track_cursor(pointer, position);
                if self.pad.press(pointer, position) {
                    return;
                }
                self.held_pointers.insert(pointer);
                self.click_pressed_edge = Some(position);
            }
            DeviceEvent::PointerMoved { pointer, position } => {
                self.track_cursor(pointer, position);
                self.pad.drag(pointer, position);
            }
            DeviceEvent::PointerUp { pointer } | DeviceEvent::PointerCancelled { pointer } => {
                if !self.pad.release(pointer) {
                    self.held_pointers.remove(&pointer);
                }
            }
            DeviceEvent::FocusLost => {
                // Releases are not delivered to an unfocused window.
                self.keys.clear();
                self.pad.reset();
                self.held_pointers.clear();
            }
            DeviceEvent::Resized { width, height } => {
                self.window_width = width;
                self.window_height = height;
                self.pad.relayout(width, height);
            }
        }
    }

    /// Keyboard plus pad, summed per component without renormalising.
    pub fn direction(&self) -> Vec2 {
        self.keys.action_states().direction() + self.pad.value()
    }

    /// True while any pointer that did not land on the pad is held.
    pub fn is_view_adjusting(&self) -> bool {
        !self.held_pointers.is_empty()
    }

    pub fn take_overlay_toggle_pressed(&mut self) -> bool {
        std::mem::take(&mut self.overlay_toggle_pressed_edge)
    }

    /// Current state plus the edges seen since the last snapshot.
    pub fn snapshot_for_frame(&mut self) -> InputSnapshot {
        let snapshot = InputSnapshot::new(
            self.keys.action_states(),
            self.direction(),
            self.is_view_adjusting(),
            self.cursor_position_px,
            self.click_pressed_edge,
            self.dismiss_pressed_edge,
            self.window_width,
            self.window_height,
        );
        self.click_pressed_edge = None;
        self.dismiss_pressed_edge = false;
        snapshot
    }

    fn handle_key(&mut self, key: KeyCode, pressed: bool) {
        if !pressed {
            self.keys.release(key);
            return;
        }
        if !self.keys.press(key) {
            return;
        }
        match InputAction::for_key(key) {
            Some(InputAction::Dismiss) => self.dismiss_pressed_edge = true,
            Some(InputAction::ToggleOverlay) => self.overlay_toggle_pressed_edge = true,
            _ => {}
        }
    }

    fn track_cursor(&mut self, pointer: PointerId, position: Vec2) {
        if pointer == PointerId::Mouse {
            self.cursor_position_px = Some(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started_device() -> InputDevice {
        let mut device = InputDevice::new(1280, 720, 42.0);
        device.start();
        device
    }

    fn key(device: &mut InputDevice, key: KeyCode, pressed: bool) {
        device.handle(DeviceEvent::Key { key, pressed });
    }

    fn pad_point(device: &InputDevice, offset: Vec2) -> Vec2 {
        device.pad().center() + offset
    }

    #[test]
    fn stopped_device_ignores_events() {
        let mut device = InputDevice::new(1280, 720, 42.0);
        key(&mut device, KeyCode::KeyW, true);
        assert_eq!(device.direction(), Vec2::ZERO);
    }

    #[test]
    fn stop_clears_held_state() {
        let mut device = started_device();
        key(&mut device, KeyCode::KeyW, true);
        device.handle(DeviceEvent::PointerDown {
            pointer: PointerId::Touch(3),
            position: Vec2::new(900.0, 200.0),
        });
        assert!(device.is_view_adjusting());
        device.stop();
        assert_eq!(device.direction(), Vec2::ZERO);
        assert!(!device.is_view_adjusting());
        device.start();
        assert_eq!(device.direction(), Vec2::ZERO);
    }

    #[test]
    fn keyboard_and_pad_sum_without_renormalising() {
        let mut device = started_device();
        key(&mut device, KeyCode::KeyD, true);
        let travel = device.pad().travel_radius();
        let press = pad_point(&device, Vec2::new(travel, 0.0));
        device.handle(DeviceEvent::PointerDown {
            pointer: PointerId::Touch(1),
            position: press,
        });
        let direction = device.direction();
        assert!((direction.x - 2.0).abs() < 1e-4, "{direction:?}");
        assert!(!device.is_view_adjusting());
    }

    #[test]
    fn pointer_off_pad_starts_view_adjust_until_release() {
        let mut device = started_device();
        device.handle(DeviceEvent::PointerDown {
            pointer: PointerId::Mouse,
            position: Vec2::new(640.0, 200.0),
        });
        assert!(device.is_view_adjusting());
        device.handle(DeviceEvent::PointerUp {
            pointer: PointerId::Mouse,
        });
        assert!(!device.is_view_adjusting());
    }

    #[test]
    fn focus_loss_ends_view_adjust() {
        let mut device = started_device();
        device.handle(DeviceEvent::PointerDown {
            pointer: PointerId::Mouse,
            position: Vec2::new(640.0, 200.0),
        });
        device.handle(DeviceEvent::FocusLost);
        assert!(!device.is_view_adjusting());
    }

    #[test]
    fn pad_cancel_recentres() {
        let mut device = started_device();
        let press = pad_point(&device, Vec2::new(0.0, -30.0));
        device.handle(DeviceEvent::PointerDown {
            pointer: PointerId::Touch(7),
            position: press,
        });
        assert!(device.direction().y < 0.0);
        device.handle(DeviceEvent::PointerCancelled {
            pointer: PointerId::Touch(7),
        });
        assert_eq!(device.direction(), Vec2::ZERO);
    }

    #[test]
    fn click_and_dismiss_are_edge_triggered_for_single_frame() {
        let mut device = started_device();
        device.handle(DeviceEvent::PointerDown {
            pointer: PointerId::Mouse,
            position: Vec2::new(500.0, 300.0),
        });
        key(&mut device, KeyCode::Escape, true);

        let first = device.snapshot_for_frame();
        let second = device.snapshot_for_frame();

        assert_eq!(first.click_position_px(), Some(Vec2::new(500.0, 300.0)));
        assert!(first.dismiss_pressed());
        assert!(second.click_position_px().is_none());
        assert!(!second.dismiss_pressed());
        assert!(second.view_adjusting());
    }

    #[test]
    fn held_escape_does_not_repeat_dismiss() {
        let mut device = started_device();
        key(&mut device, KeyCode::Escape, true);
        assert!(device.snapshot_for_frame().dismiss_pressed());
        key(&mut device, KeyCode::Escape, true);
        assert!(!device.snapshot_for_frame().dismiss_pressed());
        key(&mut device, KeyCode::Escape, false);
        key(&mut device, KeyCode::Escape, true);
        assert!(device.snapshot_for_frame().dismiss_pressed());
    }

    #[test]
    fn f3_toggle_is_edge_triggered() {
        let mut device = started_device();
        key(&mut device, KeyCode::F3, true);
        assert!(device.take_overlay_toggle_pressed());
        key(&mut device, KeyCode::F3, true);
        assert!(!device.take_overlay_toggle_pressed());
    }

    #[test]
    fn snapshot_carries_actions_cursor_and_window_size() {
        let mut device = started_device();
        key(&mut device, KeyCode::ArrowLeft, true);
        device.handle(DeviceEvent::PointerMoved {
            pointer: PointerId::Mouse,
            position: Vec2::new(100.0, 200.0),
        });
        device.handle(DeviceEvent::Resized {
            width: 800,
            height: 600,
        });
        let snapshot = device.snapshot_for_frame();
        assert!(snapshot.is_down(InputAction::MoveLeft));
        assert_eq!(snapshot.window_size(), (800, 600));
        assert_eq!(snapshot.cursor_position_px(), Some(Vec2::new(100.0, 200.0)));
        assert_eq!(snapshot.direction(), Vec2::new(-1.0, 0.0));
    }
}
