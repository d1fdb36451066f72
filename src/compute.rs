/// Pure game-logic functions: the screen flow and one frame of gameplay.
///
/// Nothing here touches the terminal or the audio device.  Music changes
/// come back to the caller as `MusicCue`s and all randomness goes through
/// the injected RNG.

use rand::Rng;

use crate::consts::{MUSIC_FADE_MS, SHIP_MAX_X, SHIP_MIN_X, SHIP_SPEED, SHOT_SPEED};
use crate::entities::{Key, KeyState, MusicCue, Screen, Ship, Track};
use crate::input::InputTracker;
use crate::pool::ProjectilePool;

/// The entire game state, threaded through every phase of the frame.
#[derive(Clone, Debug)]
pub struct GameState {
    pub screen: Screen,
    pub ship: Ship,
    pub pool: ProjectilePool,
    /// Frames spent in the current round.
    pub frame: u64,
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Title screen, centred ship, empty pool.
pub fn init_state() -> GameState {
    GameState {
        screen: Screen::Title,
        ship: Ship::centered(),
        pool: ProjectilePool::new(),
        frame: 0,
    }
}

/// Reset the field for a new round and fill the pool.
pub fn start_round(state: &mut GameState, rng: &mut impl Rng) {
    state.ship = Ship::centered();
    state.pool.clear();
    state.pool.prime(rng);
    state.frame = 0;
}

// ── Ship movement (pure) ─────────────────────────────────────────────────────

/// Horizontal movement for one frame.  Only a sustained (`Repeat`) key moves
/// the ship, left wins over right, and the result never leaves the band.
pub fn move_ship(ship: &Ship, left: KeyState, right: KeyState) -> Ship {
    let x = if (SHIP_MIN_X..=SHIP_MAX_X).contains(&ship.x) {
        let step = if left == KeyState::Repeat {
            -SHIP_SPEED
        } else if right == KeyState::Repeat {
            SHIP_SPEED
        } else {
            0
        };
        (ship.x + step).clamp(SHIP_MIN_X, SHIP_MAX_X)
    } else if ship.x < SHIP_MIN_X && right == KeyState::Repeat && left == KeyState::Idle {
        SHIP_MIN_X
    } else if ship.x > SHIP_MAX_X && left == KeyState::Repeat && right == KeyState::Idle {
        SHIP_MAX_X
    } else {
        ship.x
    };
    Ship { x, ..ship.clone() }
}

// ── Per-frame update ─────────────────────────────────────────────────────────

/// Advance the current screen by one frame.  Returns the music changes the
/// caller should apply, in order.
pub fn move_stuff(
    state: &mut GameState,
    input: &InputTracker,
    rng: &mut impl Rng,
) -> Vec<MusicCue> {
    let confirm = input.state(Key::Return) == KeyState::Down;

    match state.screen {
        Screen::Title => {
            if confirm {
                log::debug!("title -> gameplay");
                state.screen = Screen::Gameplay;
                start_round(state, rng);
                return vec![MusicCue::Stop, MusicCue::Play(Track::Gameplay)];
            }
        }
        Screen::Gameplay => {
            state.frame += 1;
            state.ship = move_ship(&state.ship, input.state(Key::Left), input.state(Key::Right));
            state.pool.advance(SHOT_SPEED, rng);

            if let Some(slot) = state.pool.first_hit(&state.ship.bounds()) {
                log::debug!(
                    "ship hit by shot {} after {} frames -> ending",
                    slot,
                    state.frame
                );
                state.screen = Screen::Ending;
                return vec![
                    MusicCue::FadeOut { ms: MUSIC_FADE_MS },
                    MusicCue::Play(Track::Ending),
                ];
            }
        }
        Screen::Ending => {
            if confirm {
                log::debug!("ending -> title");
                state.screen = Screen::Title;
                return vec![MusicCue::FadeOut { ms: MUSIC_FADE_MS }];
            }
        }
    }
    Vec::new()
}
