/// Input state tracker.
///
/// Keyboard keys are recomputed every frame from a "physically held"
/// snapshot.  Mouse buttons only change on press/release events, so they
/// are decayed once per frame (`Down → Repeat`, `Up → Idle`) before the
/// frame's events are applied.

use crate::consts::{JOYSTICK_DEAD_ZONE, MAX_KEYBOARD_KEYS, MAX_MOUSE_BUTTONS};
use crate::entities::{DeviceEvent, Key, KeyState};
use crate::error::Error;

/// Map a raw axis value to a discrete direction.
pub fn axis_direction(value: i16) -> i8 {
    if value < -JOYSTICK_DEAD_ZONE {
        -1
    } else if value > JOYSTICK_DEAD_ZONE {
        1
    } else {
        0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WindowEvents {
    /// Sticky: once a quit arrives the loop ends.
    pub quit: bool,
    pub visible: bool,
}

#[derive(Clone, Debug)]
pub struct InputTracker {
    keyboard: [KeyState; MAX_KEYBOARD_KEYS],
    mouse_buttons: [KeyState; MAX_MOUSE_BUTTONS],
    mouse_x: i32,
    mouse_y: i32,
    axis_x_dir: i8,
    axis_y_dir: i8,
    window: WindowEvents,
}

impl Default for InputTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl InputTracker {
    pub fn new() -> Self {
        InputTracker {
            keyboard: [KeyState::Idle; MAX_KEYBOARD_KEYS],
            mouse_buttons: [KeyState::Idle; MAX_MOUSE_BUTTONS],
            mouse_x: 0,
            mouse_y: 0,
            axis_x_dir: 0,
            axis_y_dir: 0,
            window: WindowEvents {
                quit: false,
                visible: true,
            },
        }
    }

    // ── Per-frame update ──────────────────────────────────────────────────────

    /// Decay terminal mouse states.  Must run before this frame's events.
    pub fn begin_frame(&mut self) {
        for state in self.mouse_buttons.iter_mut() {
            *state = match *state {
                KeyState::Down => KeyState::Repeat,
                KeyState::Up => KeyState::Idle,
                other => other,
            };
        }
    }

    pub fn apply_keyboard_snapshot(&mut self, held: &[bool; MAX_KEYBOARD_KEYS]) {
        for (state, &is_held) in self.keyboard.iter_mut().zip(held.iter()) {
            *state = state.next(is_held);
        }
    }

    pub fn apply_mouse_event(&mut self, button: usize, pressed: bool) -> Result<(), Error> {
        let slot = self.mouse_buttons.get_mut(button).ok_or(Error::OutOfRange {
            what: "mouse button",
            index: button,
            max: MAX_MOUSE_BUTTONS,
        })?;
        *slot = if pressed { KeyState::Down } else { KeyState::Up };
        Ok(())
    }

    pub fn apply_motion(&mut self, x: i32, y: i32) {
        self.mouse_x = x;
        self.mouse_y = y;
    }

    /// Route one device event.  Keyboard state is not touched here.
    pub fn apply_event(&mut self, event: &DeviceEvent) -> Result<(), Error> {
        match *event {
            DeviceEvent::Quit => self.window.quit = true,
            DeviceEvent::Visibility(visible) => {
                log::debug!("window {}", if visible { "shown" } else { "hidden" });
                self.window.visible = visible;
            }
            DeviceEvent::MouseButton { button, pressed } => {
                self.apply_mouse_event(button, pressed)?
            }
            DeviceEvent::MouseMotion { x, y } => self.apply_motion(x, y),
            DeviceEvent::JoyAxis { axis, value } => match axis {
                0 => self.axis_x_dir = axis_direction(value),
                1 => self.axis_y_dir = axis_direction(value),
                _ => {}
            },
        }
        Ok(())
    }

    /// Run a whole frame's input update in the required order.
    pub fn update(&mut self, events: &[DeviceEvent], held: &[bool; MAX_KEYBOARD_KEYS]) {
        self.begin_frame();
        for event in events {
            if let Err(e) = self.apply_event(event) {
                log::warn!("ignoring device event {:?}: {}", event, e);
            }
        }
        self.apply_keyboard_snapshot(held);
    }

    // ── Queries ───────────────────────────────────────────────────────────────

    pub fn state(&self, key: Key) -> KeyState {
        self.keyboard[key.scancode()]
    }

    pub fn key(&self, scancode: usize) -> Result<KeyState, Error> {
        self.keyboard.get(scancode).copied().ok_or(Error::OutOfRange {
            what: "key",
            index: scancode,
            max: MAX_KEYBOARD_KEYS,
        })
    }

    pub fn mouse_button(&self, button: usize) -> Result<KeyState, Error> {
        self.mouse_buttons.get(button).copied().ok_or(Error::OutOfRange {
            what: "mouse button",
            index: button,
            max: MAX_MOUSE_BUTTONS,
        })
    }

    pub fn mouse_position(&self) -> (i32, i32) {
        (self.mouse_x, self.mouse_y)
    }

    pub fn axis_direction(&self) -> (i8, i8) {
        (self.axis_x_dir, self.axis_y_dir)
    }

    pub fn window(&self) -> WindowEvents {
        self.window
    }

    /// Escape pressed this frame, or the window asked to close.
    pub fn wants_quit(&self) -> bool {
        self.state(Key::Escape) == KeyState::Down || self.window.quit
    }
}
