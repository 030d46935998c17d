//! Tiny RGBA raster helpers over a pixels frame.

use glam::Vec2;

pub type Rgba = [u8; 4];

/* ---------------- camera ---------------- */
/// Side view: world x to the right, world y up.
#[derive(Clone, Copy)]
pub struct Cam {
    pub center: Vec2, // world (x, y)
    pub ppm: f32,     // pixels per meter
}

impl Cam {
    pub fn world_to_screen(&self, p: Vec2, w: u32, h: u32) -> (i32, i32) {
        let sx = (w as f32 * 0.5) + (p.x - self.center.x) * self.ppm;
        let sy = (h as f32 * 0.5) - (p.y - self.center.y) * self.ppm;
        (sx.round() as i32, sy.round() as i32)
    }

    pub fn screen_to_world_x(&self, sx: i32, w: u32) -> f32 {
        self.center.x + (sx as f32 - w as f32 * 0.5) / self.ppm
    }
}

/* ---------------- canvas ---------------- */
pub struct Canvas<'a> {
    px: &'a mut [u8],
    pub w: u32,
    pub h: u32,
}

impl<'a> Canvas<'a> {
    pub fn new(px: &'a mut [u8], w: u32, h: u32) -> Self { Self { px, w, h } }

    pub fn clear(&mut self, rgba: Rgba) {
        for p in self.px.chunks_exact_mut(4) { p.copy_from_slice(&rgba); }
    }

    pub fn put(&mut self, x: i32, y: i32, rgba: Rgba) {
        if x < 0 || y < 0 { return; }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h { return; }
        let i = ((y * self.w + x) * 4) as usize;
        if let Some(dst) = self.px.get_mut(i..i + 4) { dst.copy_from_slice(&rgba); }
    }

    pub fn line(&mut self, mut x0: i32, mut y0: i32, x1: i32, y1: i32, rgba: Rgba) {
        let dx = (x1 - x0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let dy = -(y1 - y0).abs();
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;
        // Off-screen segments from a far zoom can be huge; cap the walk.
        let mut budget = 4 * (self.w + self.h) as i64;
        loop {
            self.put(x0, y0, rgba);
            if x0 == x1 && y0 == y1 { break; }
            budget -= 1;
            if budget <= 0 { break; }
            let e2 = 2 * err;
            if e2 >= dy { err += dy; x0 += sx; }
            if e2 <= dx { err += dx; y0 += sy; }
        }
    }

    /// Midpoint circle outline.
    pub fn circle(&mut self, cx: i32, cy: i32, r: i32, rgba: Rgba) {
        let (mut x, mut y, mut d) = (r.max(1), 0, 1 - r.max(1));
        while x >= y {
            for (px, py) in [(x, y), (y, x), (-y, x), (-x, y), (-x, -y), (-y, -x), (y, -x), (x, -y)] {
                self.put(cx + px, cy + py, rgba);
            }
            y += 1;
            if d < 0 { d += 2 * y + 1; } else { x -= 1; d += 2 * (y - x) + 1; }
        }
    }

    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, rgba: Rgba) {
        for y in y0.max(0)..y1.min(self.h as i32) {
            for x in x0.max(0)..x1.min(self.w as i32) {
                self.put(x, y, rgba);
            }
        }
    }

    /// World-space segment through the camera.
    pub fn seg(&mut self, cam: &Cam, a: Vec2, b: Vec2, rgba: Rgba) {
        let (x0, y0) = cam.world_to_screen(a, self.w, self.h);
        let (x1, y1) = cam.world_to_screen(b, self.w, self.h);
        self.line(x0, y0, x1, y1, rgba);
    }
}
