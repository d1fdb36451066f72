/// Terminal platform layer: setup/teardown and device event translation.
///
/// The game wants a "currently held" array each frame, but a terminal only
/// sends key events.  `HeldKeys` rebuilds the array from those events under
/// one of two policies, picked when the terminal opens:
/// * `HoldPolicy::UntilRelease` when the terminal reports release events.
///   A key stays down from its press until its release.
/// * `HoldPolicy::Expire` otherwise.  The OS repeats a held key as fresh
///   presses, after an initial delay of up to ~600 ms.  A key expires after
///   `HOLD_INITIAL` without a second event, then after `HOLD_REPEAT`
///   between repeats.  Both are wall-clock times, independent of `--fps`.

use std::collections::HashMap;
use std::io::Write;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        MouseButton, MouseEventKind, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use crate::consts::MAX_KEYBOARD_KEYS;
use crate::display::Viewport;
use crate::entities::{scancode, DeviceEvent};

/// How long a single press counts as held when no release will come.
/// Longer than the usual OS auto-repeat delay.
pub const HOLD_INITIAL: Duration = Duration::from_millis(650);

/// Allowed gap between auto-repeat events once repeating has started.
pub const HOLD_REPEAT: Duration = Duration::from_millis(150);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HoldPolicy {
    /// Release events are reported; keys stay held until released.
    UntilRelease,
    /// No release events; keys expire after a quiet period.
    Expire { initial: Duration, repeat: Duration },
}

impl HoldPolicy {
    pub const CLASSIC: HoldPolicy = HoldPolicy::Expire {
        initial: HOLD_INITIAL,
        repeat: HOLD_REPEAT,
    };
}

impl Default for HoldPolicy {
    fn default() -> Self {
        HoldPolicy::CLASSIC
    }
}

/// Scancode for a terminal key, if the game tracks it.
pub fn scancode_for(code: &KeyCode) -> Option<usize> {
    match code {
        KeyCode::Enter => Some(scancode::RETURN),
        KeyCode::Esc => Some(scancode::ESCAPE),
        KeyCode::Backspace => Some(scancode::BACKSPACE),
        KeyCode::Tab => Some(scancode::TAB),
        KeyCode::Right => Some(scancode::RIGHT),
        KeyCode::Left => Some(scancode::LEFT),
        KeyCode::Down => Some(scancode::DOWN),
        KeyCode::Up => Some(scancode::UP),
        KeyCode::Char(' ') => Some(scancode::SPACE),
        KeyCode::Char(c) if c.is_ascii_alphabetic() => {
            Some(scancode::A + (c.to_ascii_lowercase() as usize - 'a' as usize))
        }
        KeyCode::Char('0') => Some(scancode::NUM_0),
        KeyCode::Char(c @ '1'..='9') => Some(scancode::NUM_1 + (*c as usize - '1' as usize)),
        _ => None,
    }
}

// ── Held keys ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug)]
struct Held {
    last_seen: Instant,
    repeating: bool,
}

#[derive(Clone, Debug, Default)]
pub struct HeldKeys {
    policy: HoldPolicy,
    keys: HashMap<usize, Held>,
}

impl HeldKeys {
    pub fn new(policy: HoldPolicy) -> Self {
        HeldKeys {
            policy,
            keys: HashMap::new(),
        }
    }

    pub fn policy(&self) -> HoldPolicy {
        self.policy
    }

    /// Record a press or repeat.  A press of a key that is still held
    /// counts as a repeat.
    pub fn press(&mut self, scancode: usize, now: Instant) {
        self.keys
            .entry(scancode)
            .and_modify(|held| {
                held.last_seen = now;
                held.repeating = true;
            })
            .or_insert(Held {
                last_seen: now,
                repeating: false,
            });
    }

    pub fn release(&mut self, scancode: usize) {
        self.keys.remove(&scancode);
    }

    /// Forget every key, e.g. when focus is lost and releases go elsewhere.
    pub fn clear(&mut self) {
        self.keys.clear();
    }

    fn fresh(policy: HoldPolicy, held: &Held, now: Instant) -> bool {
        match policy {
            HoldPolicy::UntilRelease => true,
            HoldPolicy::Expire { initial, repeat } => {
                let window = if held.repeating { repeat } else { initial };
                now.saturating_duration_since(held.last_seen) <= window
            }
        }
    }

    pub fn is_held(&self, scancode: usize, now: Instant) -> bool {
        self.keys
            .get(&scancode)
            .is_some_and(|held| Self::fresh(self.policy, held, now))
    }

    /// Snapshot for every tracked key; expired entries are dropped.
    pub fn snapshot(&mut self, now: Instant) -> [bool; MAX_KEYBOARD_KEYS] {
        let policy = self.policy;
        self.keys.retain(|_, held| Self::fresh(policy, held, now));
        let mut snapshot = [false; MAX_KEYBOARD_KEYS];
        for &code in self.keys.keys() {
            if let Some(slot) = snapshot.get_mut(code) {
                *slot = true;
            }
        }
        snapshot
    }
}

// ── Event translation ─────────────────────────────────────────────────────────

fn mouse_button_id(button: MouseButton) -> usize {
    match button {
        MouseButton::Left => 0,
        MouseButton::Middle => 1,
        MouseButton::Right => 2,
    }
}

/// Turn one terminal event into a device event.  Key events only update
/// `held`; they never produce a device event except Ctrl+C (quit).
/// Losing focus drops every held key.
pub fn translate(
    event: &Event,
    held: &mut HeldKeys,
    now: Instant,
    viewport: &Viewport,
) -> Option<DeviceEvent> {
    match event {
        Event::Key(KeyEvent {
            code: KeyCode::Char('c'),
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) if modifiers.contains(KeyModifiers::CONTROL) => Some(DeviceEvent::Quit),
        Event::Key(KeyEvent { code, kind, .. }) => {
            let code = scancode_for(code)?;
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => held.press(code, now),
                KeyEventKind::Release => held.release(code),
            }
            None
        }
        Event::Mouse(mouse) => {
            let (x, y) = viewport.cell_to_world(mouse.column, mouse.row);
            match mouse.kind {
                MouseEventKind::Down(b) => Some(DeviceEvent::MouseButton {
                    button: mouse_button_id(b),
                    pressed: true,
                }),
                MouseEventKind::Up(b) => Some(DeviceEvent::MouseButton {
                    button: mouse_button_id(b),
                    pressed: false,
                }),
                MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                    Some(DeviceEvent::MouseMotion { x, y })
                }
                _ => None,
            }
        }
        Event::FocusGained => Some(DeviceEvent::Visibility(true)),
        Event::FocusLost => {
            held.clear();
            Some(DeviceEvent::Visibility(false))
        }
        _ => None,
    }
}

// ── Terminal ──────────────────────────────────────────────────────────────────

/// Current terminal size as a viewport.
pub fn viewport() -> std::io::Result<Viewport> {
    let (cols, rows) = terminal::size()?;
    Ok(Viewport::new(cols, rows))
}

/// Put the terminal back the way the shell expects it.  Safe to call more
/// than once and from a panic hook; errors are ignored.
pub fn restore_terminal<W: Write>(out: &mut W, keyboard_enhanced: bool) {
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableFocusChange);
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();
}

/// Raw-mode alternate screen with mouse and focus reporting.
///
/// Dropping it restores the terminal, so an early return or a panic
/// unwinding through the frame loop still leaves a usable shell.
pub struct Terminal<W: Write> {
    out: W,
    keyboard_enhanced: bool,
    restored: bool,
    held: HeldKeys,
    last_poll: Instant,
}

impl<W: Write> Terminal<W> {
    pub fn open(mut out: W) -> std::io::Result<Self> {
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        out.execute(EnableMouseCapture)?;
        out.execute(EnableFocusChange)?;

        // Only ask for release events where the terminal answers the
        // capability query; everything else gets the expiry policy.
        let supported = terminal::supports_keyboard_enhancement().unwrap_or(false);
        let keyboard_enhanced = supported
            && out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        let policy = if keyboard_enhanced {
            HoldPolicy::UntilRelease
        } else {
            HoldPolicy::CLASSIC
        };
        log::info!("terminal opened (held keys: {:?})", policy);

        Ok(Terminal {
            out,
            keyboard_enhanced,
            restored: false,
            held: HeldKeys::new(policy),
            last_poll: Instant::now(),
        })
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    /// Drain every pending terminal event without blocking.
    pub fn poll(&mut self, viewport: &Viewport) -> std::io::Result<Vec<DeviceEvent>> {
        self.last_poll = Instant::now();
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            if let Some(device) = translate(&ev, &mut self.held, self.last_poll, viewport) {
                events.push(device);
            }
        }
        Ok(events)
    }

    pub fn keyboard_snapshot(&mut self) -> [bool; MAX_KEYBOARD_KEYS] {
        self.held.snapshot(self.last_poll)
    }

    /// Restore the terminal now rather than at drop.
    pub fn close(mut self) {
        self.restore();
    }

    fn restore(&mut self) {
        if self.restored {
            return;
        }
        self.restored = true;
        restore_terminal(&mut self.out, self.keyboard_enhanced);
        log::info!("terminal restored");
    }
}

impl<W: Write> Drop for Terminal<W> {
    fn drop(&mut self) {
        self.restore();
    }
}
