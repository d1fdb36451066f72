use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};

use space_odyssey::compute::move_ship;
use space_odyssey::consts::{SHIP_MIN_X, SHIP_SPEED};
use space_odyssey::display::Viewport;
use space_odyssey::entities::{scancode, DeviceEvent, Key, KeyState, Ship};
use space_odyssey::input::InputTracker;
use space_odyssey::platform::*;

fn key(code: KeyCode, kind: KeyEventKind) -> Event {
    Event::Key(KeyEvent::new_with_kind(code, KeyModifiers::NONE, kind))
}

fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind,
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn viewport() -> Viewport {
    Viewport::new(100, 50)
}

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

/// Start of frame `n` at 60 FPS.
fn frame_time(t0: Instant, n: u64) -> Instant {
    t0 + Duration::from_micros(16_667 * n)
}

/// Hold Left: one press at frame 0, silence through the OS repeat delay,
/// then auto-repeat every other frame.  Returns the per-frame states and
/// the ship after moving through them.
fn hold_left(policy: HoldPolicy, repeat_kind: KeyEventKind) -> (Vec<KeyState>, Ship) {
    let t0 = Instant::now();
    let vp = viewport();
    let mut held = HeldKeys::new(policy);
    let mut input = InputTracker::new();
    let mut ship = Ship::centered();
    let mut states = Vec::new();
    for n in 0..60 {
        let now = frame_time(t0, n);
        if n == 0 {
            translate(&key(KeyCode::Left, KeyEventKind::Press), &mut held, now, &vp);
        } else if n >= 30 && n % 2 == 0 {
            translate(&key(KeyCode::Left, repeat_kind), &mut held, now, &vp);
        }
        input.update(&[], &held.snapshot(now));
        let left = input.state(Key::Left);
        ship = move_ship(&ship, left, input.state(Key::Right));
        states.push(left);
    }
    (states, ship)
}

// ── Scancodes ─────────────────────────────────────────────────────────────────

#[test]
fn scancodes_for_game_keys() {
    assert_eq!(scancode_for(&KeyCode::Enter), Some(scancode::RETURN));
    assert_eq!(scancode_for(&KeyCode::Esc), Some(scancode::ESCAPE));
    assert_eq!(scancode_for(&KeyCode::Left), Some(scancode::LEFT));
    assert_eq!(scancode_for(&KeyCode::Right), Some(scancode::RIGHT));
    assert_eq!(scancode_for(&KeyCode::Char(' ')), Some(scancode::SPACE));
}

#[test]
fn letters_ignore_case_and_digits_follow_hid_order() {
    assert_eq!(scancode_for(&KeyCode::Char('a')), Some(scancode::A));
    assert_eq!(scancode_for(&KeyCode::Char('A')), Some(scancode::A));
    assert_eq!(scancode_for(&KeyCode::Char('z')), Some(scancode::Z));
    assert_eq!(scancode_for(&KeyCode::Char('1')), Some(scancode::NUM_1));
    assert_eq!(scancode_for(&KeyCode::Char('0')), Some(scancode::NUM_0));
    assert_eq!(scancode_for(&KeyCode::F(1)), None);
    assert_eq!(scancode_for(&KeyCode::Char('é')), None);
}

// ── Held keys ─────────────────────────────────────────────────────────────────

#[test]
fn single_press_outlasts_repeat_delay() {
    let t0 = Instant::now();
    let mut held = HeldKeys::default();
    held.press(scancode::LEFT, t0);
    // 30 silent frames at 60 FPS
    assert!(held.is_held(scancode::LEFT, frame_time(t0, 30)));
    assert!(held.is_held(scancode::LEFT, t0 + HOLD_INITIAL));
    assert!(!held.is_held(scancode::LEFT, t0 + HOLD_INITIAL + ms(1)));
}

#[test]
fn repeats_use_the_short_window() {
    let t0 = Instant::now();
    let mut held = HeldKeys::default();
    held.press(scancode::LEFT, t0);
    held.press(scancode::LEFT, t0 + ms(500));
    assert!(held.is_held(scancode::LEFT, t0 + ms(500) + HOLD_REPEAT));
    assert!(!held.is_held(scancode::LEFT, t0 + ms(501) + HOLD_REPEAT));
}

#[test]
fn until_release_never_expires() {
    let t0 = Instant::now();
    let mut held = HeldKeys::new(HoldPolicy::UntilRelease);
    held.press(scancode::RIGHT, t0);
    assert!(held.is_held(scancode::RIGHT, t0 + ms(60_000)));
    held.release(scancode::RIGHT);
    assert!(!held.is_held(scancode::RIGHT, t0 + ms(60_000)));
}

#[test]
fn release_drops_key_immediately() {
    let t0 = Instant::now();
    let mut held = HeldKeys::default();
    held.press(scancode::RIGHT, t0);
    held.release(scancode::RIGHT);
    assert!(!held.is_held(scancode::RIGHT, t0));
}

#[test]
fn snapshot_marks_held_keys_only() {
    let t0 = Instant::now();
    let mut held = HeldKeys::default();
    held.press(scancode::RETURN, t0);
    held.press(scancode::SPACE, t0 + ms(100));
    let snap = held.snapshot(t0 + ms(100) + HOLD_INITIAL);
    assert!(snap[scancode::SPACE]);
    assert!(!snap[scancode::RETURN]);
    assert_eq!(snap.iter().filter(|&&h| h).count(), 1);
}

#[test]
fn held_key_goes_down_once_across_repeat_delay() {
    for (policy, kind) in [
        (HoldPolicy::CLASSIC, KeyEventKind::Press),
        (HoldPolicy::UntilRelease, KeyEventKind::Repeat),
    ] {
        let (states, ship) = hold_left(policy, kind);
        assert_eq!(states[0], KeyState::Down, "{:?}", policy);
        assert!(states[1..].iter().all(|&s| s == KeyState::Repeat), "{:?}", policy);
        // Every frame after the first moves the ship
        let moved = (states.len() as i32 - 1) * SHIP_SPEED;
        let expected = (Ship::centered().x - moved).max(SHIP_MIN_X);
        assert_eq!(ship.x, expected, "{:?}", policy);
    }
}

#[test]
fn classic_key_expires_after_repeats_stop() {
    let t0 = Instant::now();
    let vp = viewport();
    let mut held = HeldKeys::default();
    translate(&key(KeyCode::Left, KeyEventKind::Press), &mut held, t0, &vp);
    translate(&key(KeyCode::Left, KeyEventKind::Press), &mut held, t0 + ms(500), &vp);
    assert!(held.snapshot(t0 + ms(600))[scancode::LEFT]);
    assert!(!held.snapshot(t0 + ms(700))[scancode::LEFT]);
}

// ── Translation ───────────────────────────────────────────────────────────────

#[test]
fn key_events_feed_held_keys_not_device_events() {
    let t0 = Instant::now();
    let mut held = HeldKeys::default();
    let vp = viewport();
    assert_eq!(translate(&key(KeyCode::Enter, KeyEventKind::Press), &mut held, t0, &vp), None);
    assert!(held.is_held(scancode::RETURN, t0));

    translate(&key(KeyCode::Enter, KeyEventKind::Release), &mut held, t0 + ms(16), &vp);
    assert!(!held.is_held(scancode::RETURN, t0 + ms(16)));

    // Repeat refreshes the timestamp
    translate(&key(KeyCode::Left, KeyEventKind::Press), &mut held, t0, &vp);
    translate(&key(KeyCode::Left, KeyEventKind::Repeat), &mut held, t0 + ms(300), &vp);
    assert!(held.is_held(scancode::LEFT, t0 + ms(300) + HOLD_REPEAT));
}

#[test]
fn focus_loss_drops_held_keys() {
    let t0 = Instant::now();
    let mut held = HeldKeys::new(HoldPolicy::UntilRelease);
    let vp = viewport();
    translate(&key(KeyCode::Right, KeyEventKind::Press), &mut held, t0, &vp);
    translate(&Event::FocusLost, &mut held, t0, &vp);
    assert!(!held.is_held(scancode::RIGHT, t0));
}

#[test]
fn ctrl_c_quits() {
    let mut held = HeldKeys::default();
    let ev = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(translate(&ev, &mut held, Instant::now(), &viewport()), Some(DeviceEvent::Quit));
}

#[test]
fn mouse_buttons_and_motion() {
    let mut held = HeldKeys::default();
    let vp = viewport();
    assert_eq!(
        translate(&mouse(MouseEventKind::Down(MouseButton::Left), 0, 0), &mut held, Instant::now(), &vp),
        Some(DeviceEvent::MouseButton { button: 0, pressed: true })
    );
    assert_eq!(
        translate(&mouse(MouseEventKind::Up(MouseButton::Right), 0, 0), &mut held, Instant::now(), &vp),
        Some(DeviceEvent::MouseButton { button: 2, pressed: false })
    );
    assert_eq!(
        translate(&mouse(MouseEventKind::Moved, 50, 25), &mut held, Instant::now(), &vp),
        Some(DeviceEvent::MouseMotion { x: 450, y: 450 })
    );
    assert_eq!(
        translate(&mouse(MouseEventKind::ScrollUp, 1, 1), &mut held, Instant::now(), &vp),
        None
    );
}

#[test]
fn focus_maps_to_visibility() {
    let mut held = HeldKeys::default();
    let vp = viewport();
    assert_eq!(
        translate(&Event::FocusLost, &mut held, Instant::now(), &vp),
        Some(DeviceEvent::Visibility(false))
    );
    assert_eq!(
        translate(&Event::FocusGained, &mut held, Instant::now(), &vp),
        Some(DeviceEvent::Visibility(true))
    );
    assert_eq!(translate(&Event::Resize(80, 24), &mut held, Instant::now(), &vp), None);
}

// ── Teardown ──────────────────────────────────────────────────────────────────

#[test]
fn restore_leaves_alternate_screen_and_shows_cursor() {
    let mut out = Vec::new();
    restore_terminal(&mut out, true);
    // Safe to repeat, as the panic hook and drop both call it
    restore_terminal(&mut out, true);
    let text = String::from_utf8_lossy(&out);
    assert_eq!(text.matches("\x1b[?1049l").count(), 2);
    assert!(text.contains("\x1b[?25h"));
}
