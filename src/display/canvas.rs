/// Software frame buffer.
///
/// The playfield is `SCREEN_WIDTH × SCREEN_HEIGHT` world pixels; the canvas
/// has one pixel per terminal column and two per terminal row, and every
/// draw call scales world coordinates down to it.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};

use super::texture::Texture;
use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::entities::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const CORNFLOWER_BLUE: Rgba = Rgba::new(100, 149, 237, 255);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba { r, g, b, a }
    }

    fn to_color(self) -> Color {
        Color::Rgb {
            r: self.r,
            g: self.g,
            b: self.b,
        }
    }
}

/// `src` over an opaque `dst`.
fn blend(dst: Rgba, src: Rgba) -> Rgba {
    match src.a {
        0 => dst,
        255 => src,
        a => {
            let a = a as u16;
            let mix = |s: u8, d: u8| ((s as u16 * a + d as u16 * (255 - a)) / 255) as u8;
            Rgba::new(mix(src.r, dst.r), mix(src.g, dst.g), mix(src.b, dst.b), 255)
        }
    }
}

// ── Viewport ──────────────────────────────────────────────────────────────────

/// Terminal size in cells and the world ↔ canvas mapping that goes with it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16) -> Self {
        Viewport {
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn pixel_width(&self) -> i64 {
        self.cols as i64
    }

    pub fn pixel_height(&self) -> i64 {
        self.rows as i64 * 2
    }

    /// World point → canvas pixel (floored).
    pub fn to_pixel(&self, x: i32, y: i32) -> (i64, i64) {
        (
            (x as i64 * self.pixel_width()).div_euclid(SCREEN_WIDTH as i64),
            (y as i64 * self.pixel_height()).div_euclid(SCREEN_HEIGHT as i64),
        )
    }

    /// Terminal cell → world point (top-left of the cell).
    pub fn cell_to_world(&self, col: u16, row: u16) -> (i32, i32) {
        (
            (col as i64 * SCREEN_WIDTH as i64 / self.cols as i64) as i32,
            (row as i64 * SCREEN_HEIGHT as i64 / self.rows as i64) as i32,
        )
    }
}

// ── Canvas ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Canvas {
    viewport: Viewport,
    pixels: Vec<Rgba>,
}

impl Canvas {
    pub fn new(viewport: Viewport) -> Self {
        let len = (viewport.pixel_width() * viewport.pixel_height()) as usize;
        Canvas {
            viewport,
            pixels: vec![Rgba::CORNFLOWER_BLUE; len],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Reallocate when the terminal size changed.
    pub fn resize(&mut self, viewport: Viewport) {
        if viewport != self.viewport {
            *self = Canvas::new(viewport);
        }
    }

    pub fn pixel(&self, x: i64, y: i64) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        let (w, h) = (self.viewport.pixel_width(), self.viewport.pixel_height());
        if x < 0 || y < 0 || x >= w || y >= h {
            return None;
        }
        Some((y * w + x) as usize)
    }

    fn put(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = blend(self.pixels[i], color);
        }
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(Rgba { a: 255, ..color });
    }

    /// Canvas pixel span covered by a world rectangle, clipped.
    fn span(&self, rect: &Rect) -> Option<(i64, i64, i64, i64, i64, i64)> {
        let (x0, y0) = self.viewport.to_pixel(rect.x, rect.y);
        let (x1, y1) = self.viewport.to_pixel(rect.x + rect.w, rect.y + rect.h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0, y0, x1, y1, x1 - x0, y1 - y0))
    }

    // ── Primitives ────────────────────────────────────────────────────────────

    /// Stretch `texture` over `dest` (world coordinates).
    pub fn draw_texture(&mut self, texture: &Texture, dest: Rect) {
        let Some((x0, y0, x1, y1, dw, dh)) = self.span(&dest) else {
            return;
        };
        let (tw, th) = (texture.width() as i64, texture.height() as i64);
        if tw == 0 || th == 0 {
            return;
        }
        let w = self.viewport.pixel_width();
        let h = self.viewport.pixel_height();
        for py in y0.max(0)..y1.min(h) {
            let v = ((py - y0) * th / dh) as u32;
            for px in x0.max(0)..x1.min(w) {
                let u = ((px - x0) * tw / dw) as u32;
                self.put(px, py, texture.sample(u, v));
            }
        }
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Rgba) {
        let Some((x0, y0, x1, y1, _, _)) = self.span(&rect) else {
            return;
        };
        let w = self.viewport.pixel_width();
        let h = self.viewport.pixel_height();
        for py in y0.max(0)..y1.min(h) {
            for px in x0.max(0)..x1.min(w) {
                self.put(px, py, color);
            }
        }
    }

    /// Bresenham between two world points.
    pub fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: Rgba) {
        let (mut x, mut y) = self.viewport.to_pixel(x1, y1);
        let (tx, ty) = self.viewport.to_pixel(x2, y2);
        let dx = (tx - x).abs();
        let dy = -(ty - y).abs();
        let sx = if x < tx { 1 } else { -1 };
        let sy = if y < ty { 1 } else { -1 };
        let mut err = dx + dy;
        loop {
            self.put(x, y, color);
            if x == tx && y == ty {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                y += sy;
            }
        }
    }

    /// Outline sampled at every whole degree.
    pub fn draw_circle(&mut self, x: i32, y: i32, radius: i32, color: Rgba) {
        let mut last = None;
        for deg in 0..360 {
            let t = (deg as f32).to_radians();
            let px = (x as f32 + radius as f32 * t.cos()) as i32;
            let py = (y as f32 + radius as f32 * t.sin()) as i32;
            let p = self.viewport.to_pixel(px, py);
            // Neighbouring degrees often land on the same pixel; blend once.
            if last != Some(p) {
                self.put(p.0, p.1, color);
                last = Some(p);
            }
        }
    }

    // ── Output ────────────────────────────────────────────────────────────────

    /// Write the whole canvas as upper-half blocks and flush.
    pub fn present<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let w = self.viewport.pixel_width();
        let mut fg = None;
        let mut bg = None;

        for row in 0..self.viewport.rows as i64 {
            out.queue(cursor::MoveTo(0, row as u16))?;
            for col in 0..w {
                let top = self.pixels[((2 * row) * w + col) as usize];
                let bottom = self.pixels[((2 * row + 1) * w + col) as usize];
                if fg != Some(top) {
                    out.queue(style::SetForegroundColor(top.to_color()))?;
                    fg = Some(top);
                }
                if bg != Some(bottom) {
                    out.queue(style::SetBackgroundColor(bottom.to_color()))?;
                    bg = Some(bottom);
                }
                out.queue(Print('▀'))?;
            }
        }

        out.queue(style::ResetColor)?;
        out.flush()?;
        Ok(())
    }
}
