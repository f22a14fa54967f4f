/// Character-cell presentation surface for terminal rendering
use crossterm::{
    cursor,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use painter3d_core::{Rgb, Surface, Vec2};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    character: char,
    color: Rgb,
}

impl Cell {
    const BLANK: Cell = Cell {
        character: ' ',
        color: Rgb { r: 0, g: 0, b: 0 },
    };

    fn shaded(color: Rgb) -> Self {
        Self {
            character: ramp_char(color),
            color,
        }
    }
}

fn ramp_char(color: Rgb) -> char {
    let level = (color.r as usize + color.g as usize + color.b as usize) / 3;
    // Keep lit faces visible: skip the blank entry for anything above black
    let index = (level * (LUMINOSITY_RAMP.len() - 1) + 254) / 255;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Terminal raster target; one cell per raster unit
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![Cell::BLANK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Character at a cell, if inside the target
    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x].character)
        } else {
            None
        }
    }

    fn plot(&mut self, x: i32, y: i32, cell: Cell) {
        if x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height {
            let idx = y as usize * self.width + x as usize;
            self.cells[idx] = cell;
        }
    }

    fn fill_triangle(&mut self, v0: Vec2, v1: Vec2, v2: Vec2, cell: Cell) {
        // Bounding box
        let min_x = v0.u.min(v1.u).min(v2.u).floor() as i32;
        let max_x = v0.u.max(v1.u).max(v2.u).ceil() as i32;
        let min_y = v0.v.min(v1.v).min(v2.v).floor() as i32;
        let max_y = v0.v.max(v1.v).max(v2.v).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                if let Some((w0, w1, w2)) = barycentric(v0, v1, v2, Vec2::new(px, py)) {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        self.plot(x, y, cell);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, cell: Cell) {
        let (dx, dy) = (to.u - from.u, to.v - from.v);
        if !dx.is_finite() || !dy.is_finite() {
            return;
        }

        let steps = dx.abs().max(dy.abs()).ceil().max(1.0);
        let limit = (self.width + self.height) as f32 * 2.0;
        let steps = steps.min(limit) as i32;

        for i in 0..=steps {
            let t = i as f32 / steps as f32;
            let u = from.u + dx * t;
            let v = from.v + dy * t;
            self.plot(u.floor() as i32, v.floor() as i32, cell);
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            writer.queue(cursor::MoveTo(0, y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                let Rgb { r, g, b } = cell.color;

                writer.queue(SetForegroundColor(Color::Rgb { r, g, b }))?;
                writer.queue(Print(cell.character))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Surface for AsciiRenderer {
    fn size(&self) -> (u32, u32) {
        (self.width as u32, self.height as u32)
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: Rgb) {
        let cell = Cell::shaded(color);
        // Fan out from the first vertex; clipped polygons stay convex
        for i in 1..points.len().saturating_sub(1) {
            self.fill_triangle(points[0], points[i], points[i + 1], cell);
        }
    }

    fn stroke_polygon(&mut self, points: &[Vec2], color: Rgb) {
        let cell = Cell::shaded(color);
        for (i, &from) in points.iter().enumerate() {
            let to = points[(i + 1) % points.len()];
            self.draw_line(from, to, cell);
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(v0: Vec2, v1: Vec2, v2: Vec2, p: Vec2) -> Option<(f32, f32, f32)> {
    let denom = (v1.v - v2.v) * (v0.u - v2.u) + (v2.u - v1.u) * (v0.v - v2.v);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.v - v2.v) * (p.u - v2.u) + (v2.u - v1.u) * (p.v - v2.v)) / denom;
    let w1 = ((v2.v - v0.v) * (p.u - v2.u) + (v0.u - v2.u) * (p.v - v2.v)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
