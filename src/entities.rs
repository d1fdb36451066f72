/// All game entity types: pure data plus the tiny transition rule for keys.

use crate::consts::{
    SCREEN_HEIGHT, SCREEN_WIDTH, SHIP_HEIGHT, SHIP_WIDTH, SHOT_HIT_HEIGHT, SHOT_HIT_WIDTH,
};

// ── Input ─────────────────────────────────────────────────────────────────────

/// Per-frame state of a keyboard key or mouse button.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KeyState {
    #[default]
    Idle,
    /// Pressed this frame (visible for exactly one frame).
    Down,
    /// Held for more than one frame.
    Repeat,
    /// Released this frame (visible for exactly one frame).
    Up,
}

impl KeyState {
    /// Next state given whether the key is physically held this frame.
    pub fn next(self, held: bool) -> KeyState {
        match (self, held) {
            (KeyState::Idle | KeyState::Up, true) => KeyState::Down,
            (KeyState::Down | KeyState::Repeat, true) => KeyState::Repeat,
            (KeyState::Down | KeyState::Repeat, false) => KeyState::Up,
            (KeyState::Idle | KeyState::Up, false) => KeyState::Idle,
        }
    }

    pub fn is_pressed(self) -> bool {
        matches!(self, KeyState::Down | KeyState::Repeat)
    }
}

/// Keys the game reacts to, by USB-HID / SDL scancode.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Return,
    Escape,
    Space,
    Right,
    Left,
    Down,
    Up,
}

impl Key {
    pub fn scancode(self) -> usize {
        match self {
            Key::Return => scancode::RETURN,
            Key::Escape => scancode::ESCAPE,
            Key::Space => scancode::SPACE,
            Key::Right => scancode::RIGHT,
            Key::Left => scancode::LEFT,
            Key::Down => scancode::DOWN,
            Key::Up => scancode::UP,
        }
    }
}

pub mod scancode {
    pub const A: usize = 4;
    pub const Z: usize = 29;
    pub const NUM_1: usize = 30;
    pub const NUM_0: usize = 39;
    pub const RETURN: usize = 40;
    pub const ESCAPE: usize = 41;
    pub const BACKSPACE: usize = 42;
    pub const TAB: usize = 43;
    pub const SPACE: usize = 44;
    pub const RIGHT: usize = 79;
    pub const LEFT: usize = 80;
    pub const DOWN: usize = 81;
    pub const UP: usize = 82;
}

/// Device events drained from the platform once per frame.
#[derive(Clone, Debug, PartialEq)]
pub enum DeviceEvent {
    Quit,
    /// Window shown (`true`) or hidden / unfocused (`false`).
    Visibility(bool),
    /// Zero-based button id (0 = left, 1 = middle, 2 = right).
    MouseButton { button: usize, pressed: bool },
    MouseMotion { x: i32, y: i32 },
    JoyAxis { axis: u8, value: i16 },
}

// ── Geometry ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Rect { x, y, w, h }
    }

    /// Full-screen rectangle in world coordinates.
    pub const fn screen() -> Self {
        Rect::new(0, 0, SCREEN_WIDTH, SCREEN_HEIGHT)
    }

    /// Strict axis-aligned overlap. Zero-sized rectangles act as points.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

// ── Player & projectiles ──────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Ship {
    pub x: i32,
    /// Fixed during play; vertical movement is disabled.
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Ship {
    /// Ship centred horizontally, about three quarters down the screen.
    pub fn centered() -> Self {
        Ship {
            x: SCREEN_WIDTH / 2,
            y: (SCREEN_HEIGHT as f32 / 1.3) as i32,
            width: SHIP_WIDTH,
            height: SHIP_HEIGHT,
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// One slot of the projectile pool; identity is the slot index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Projectile {
    pub x: i32,
    pub y: i32,
    pub alive: bool,
}

impl Projectile {
    pub fn hit_box(&self) -> Rect {
        Rect::new(self.x, self.y, SHOT_HIT_WIDTH, SHOT_HIT_HEIGHT)
    }
}

// ── Screens & music ───────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Title,
    Gameplay,
    Ending,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Track {
    Gameplay,
    Ending,
}

/// Music commands emitted by the screen machine and applied by the audio layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusicCue {
    Stop,
    FadeOut { ms: u32 },
    Play(Track),
}
