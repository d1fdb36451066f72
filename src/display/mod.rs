//! Rendering layer.  All terminal drawing lives here.
//!
//! The renderer receives an immutable view of the game state.  The only
//! thing it mutates is its own background scroll offset, which is purely
//! cosmetic.

pub mod canvas;
pub mod texture;

use std::collections::HashSet;
use std::io::Write;
use std::path::Path;

pub use canvas::{Canvas, Rgba, Viewport};
pub use texture::Texture;

use crate::compute::GameState;
use crate::consts::{SCROLL_SPEED, SHOT_DRAW_HEIGHT, SHOT_DRAW_WIDTH};
use crate::entities::{Rect, Screen};
use crate::error::Error;

// ── Assets ────────────────────────────────────────────────────────────────────

pub const BACKGROUND_FILE: &str = "Definitivisimo.png";
pub const SHIP_FILE: &str = "ship.png";
pub const SHOT_FILE: &str = "shot.png";
pub const GAME_OVER_FILE: &str = "Game_Over.png";
pub const TITLE_FILE: &str = "Play_Game.png";

/// Every texture the game draws.  A texture that failed to load is `None`.
#[derive(Debug, Default)]
pub struct Assets {
    pub background: Option<Texture>,
    pub ship: Option<Texture>,
    pub shot: Option<Texture>,
    pub game_over: Option<Texture>,
    pub title: Option<Texture>,
}

fn load_or_warn(dir: &Path, file: &str) -> Option<Texture> {
    match Texture::load(&dir.join(file)) {
        Ok(texture) => {
            log::info!("loaded {} ({}x{})", file, texture.width(), texture.height());
            Some(texture)
        }
        Err(e) => {
            log::warn!("{}", e);
            None
        }
    }
}

impl Assets {
    /// Load every texture from `dir`; missing files are logged and skipped.
    pub fn load(dir: &Path) -> Self {
        Assets {
            background: load_or_warn(dir, BACKGROUND_FILE),
            ship: load_or_warn(dir, SHIP_FILE),
            shot: load_or_warn(dir, SHOT_FILE),
            game_over: load_or_warn(dir, GAME_OVER_FILE),
            title: load_or_warn(dir, TITLE_FILE),
        }
    }
}

// ── Background scroll ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Scroll {
    offset: i32,
}

impl Scroll {
    pub fn offset(&self) -> i32 {
        self.offset
    }

    /// Move up by `SCROLL_SPEED`, wrapping to `texture_height` at zero.
    pub fn advance(&mut self, texture_height: i32) -> i32 {
        self.offset -= SCROLL_SPEED;
        if self.offset <= 0 {
            self.offset = texture_height;
        }
        self.offset
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

pub struct Renderer {
    canvas: Canvas,
    scroll: Scroll,
    /// Missing textures already reported, so each is logged once.
    reported: HashSet<&'static str>,
}

impl Renderer {
    pub fn new(viewport: Viewport) -> Self {
        Renderer {
            canvas: Canvas::new(viewport),
            scroll: Scroll::default(),
            reported: HashSet::new(),
        }
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn scroll(&self) -> Scroll {
        self.scroll
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.canvas.resize(viewport);
    }

    /// Compose one frame into the canvas without presenting it.
    pub fn compose(&mut self, state: &GameState, assets: &Assets) {
        self.canvas.clear(Rgba::CORNFLOWER_BLUE);

        match state.screen {
            Screen::Title => self.blit("title", assets.title.as_ref(), Rect::screen()),
            Screen::Gameplay => self.compose_gameplay(state, assets),
            Screen::Ending => self.blit("game over", assets.game_over.as_ref(), Rect::screen()),
        }
    }

    /// Compose and write one complete frame.
    pub fn draw<W: Write>(
        &mut self,
        out: &mut W,
        state: &GameState,
        assets: &Assets,
    ) -> Result<(), Error> {
        self.compose(state, assets);
        self.canvas
            .present(out)
            .map_err(|e| Error::Draw(format!("present: {e}")))
    }

    fn compose_gameplay(&mut self, state: &GameState, assets: &Assets) {
        // Background twice, stacked, for the vertical scroll.
        let (bw, bh) = assets
            .background
            .as_ref()
            .map(|t| (t.width() as i32, t.height() as i32))
            .unwrap_or((0, 0));
        let offset = self.scroll.advance(bh);
        let mut rec = Rect::new(0, -offset, bw, bh);
        self.blit("background", assets.background.as_ref(), rec);
        rec.y += bh;
        self.blit("background", assets.background.as_ref(), rec);

        self.blit("ship", assets.ship.as_ref(), state.ship.bounds());

        for shot in state.pool.alive() {
            let rec = Rect::new(shot.x, shot.y, SHOT_DRAW_WIDTH, SHOT_DRAW_HEIGHT);
            self.blit("shot", assets.shot.as_ref(), rec);
        }
    }

    fn blit(&mut self, name: &'static str, texture: Option<&Texture>, dest: Rect) {
        match texture {
            Some(texture) => self.canvas.draw_texture(texture, dest),
            None => {
                if self.reported.insert(name) {
                    log::warn!("{}", Error::Draw(format!("no {name} texture loaded")));
                }
            }
        }
    }
}
