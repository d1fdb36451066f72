//! 2021: Space Odyssey - dodge the falling shots.
//!
//! Core modules:
//! - `entities`: pure data (key states, ship, projectiles, screens)
//! - `input`: per-frame key/button state machine
//! - `pool`: fixed-capacity projectile ring with pattern spawning
//! - `compute`: screen flow and per-frame gameplay update
//! - `display`: software frame buffer presented on the terminal
//! - `audio`: looping music with fades
//! - `platform`: terminal setup and device event translation

pub mod audio;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod error;
pub mod input;
pub mod platform;
pub mod pool;

pub use error::Error;

/// Game configuration constants
pub mod consts {
    /// Logical playfield size; the terminal canvas is scaled from this
    pub const SCREEN_WIDTH: i32 = 901;
    pub const SCREEN_HEIGHT: i32 = 901;

    pub const MAX_KEYBOARD_KEYS: usize = 256;
    pub const MAX_MOUSE_BUTTONS: usize = 5;
    pub const JOYSTICK_DEAD_ZONE: i16 = 8000;

    /// Ship defaults
    pub const SHIP_SPEED: i32 = 8;
    pub const SHIP_WIDTH: i32 = 64;
    pub const SHIP_HEIGHT: i32 = 64;
    /// Horizontal band the ship is kept inside
    pub const SHIP_MIN_X: i32 = 155;
    pub const SHIP_MAX_X: i32 = 680;

    /// Projectile pool
    pub const MAX_SHOTS: usize = 32;
    pub const SHOT_SPEED: i32 = 12;
    pub const SHOT_SPAWN_Y: i32 = -20;
    /// Rows below the screen where a projectile triggers a respawn instead of moving
    pub const DEAD_BAND: i32 = 100;
    /// Sprite rectangle
    pub const SHOT_DRAW_WIDTH: i32 = 86;
    pub const SHOT_DRAW_HEIGHT: i32 = 124;
    /// Collision rectangle. Zero-sized: a shot hits only when its top-left
    /// corner falls strictly inside the ship, which is smaller than the sprite.
    pub const SHOT_HIT_WIDTH: i32 = 0;
    pub const SHOT_HIT_HEIGHT: i32 = 0;

    /// Background scroll speed (world pixels per frame)
    pub const SCROLL_SPEED: i32 = 19;

    /// Music fade used on screen changes
    pub const MUSIC_FADE_MS: u32 = 100;
}
