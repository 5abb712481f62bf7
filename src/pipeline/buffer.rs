use std::io::{self, Write};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Print, ResetColor, SetForegroundColor},
};

use crate::core::Color;

/// A depth-tested 2D target the pipeline rasterizes into. Implementations
/// own presentation to their display backend.
pub trait Buffer {
    /// What `present` flushes to: a minifb window or the terminal's stdout.
    type Target;

    fn new(width: usize, height: usize) -> Self;
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    fn clear(&mut self);
    /// Write one pixel if it wins the depth test. Out-of-bounds writes are
    /// dropped silently.
    fn set_pixel(&mut self, x: usize, y: usize, depth: f32, color: Color);
    fn present(&self, target: &mut Self::Target) -> io::Result<()>;
}

/// 32-bit RGB framebuffer for the minifb window target.
pub struct FrameBuffer {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
    depth: Vec<f32>,
}

impl FrameBuffer {
    pub fn data(&self) -> &[u32] {
        &self.pixels
    }
}

impl Buffer for FrameBuffer {
    type Target = minifb::Window;

    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height],
            depth: vec![f32::INFINITY; width * height],
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        self.pixels.fill(0);
        self.depth.fill(f32::INFINITY);
    }

    fn set_pixel(&mut self, x: usize, y: usize, depth: f32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = y * self.width + x;
        if depth < self.depth[i] {
            self.depth[i] = depth;
            self.pixels[i] = color.to_u32();
        }
    }

    fn present(&self, window: &mut minifb::Window) -> io::Result<()> {
        window
            .update_with_buffer(&self.pixels, self.width, self.height)
            .map_err(io::Error::other)
    }
}

/// Character-cell buffer for the crossterm terminal target. One cell per
/// "pixel"; empty cells render as spaces.
pub struct TermBuffer {
    width: usize,
    height: usize,
    cells: Vec<Option<Color>>,
    depth: Vec<f32>,
}

impl Buffer for TermBuffer {
    type Target = io::Stdout;

    fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![None; width * height],
            depth: vec![f32::INFINITY; width * height],
        }
    }

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn clear(&mut self) {
        self.cells.fill(None);
        self.depth.fill(f32::INFINITY);
    }

    fn set_pixel(&mut self, x: usize, y: usize, depth: f32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }
        let i = y * self.width + x;
        if depth < self.depth[i] {
            self.depth[i] = depth;
            self.cells[i] = Some(color);
        }
    }

    fn present(&self, out: &mut io::Stdout) -> io::Result<()> {
        queue!(out, MoveTo(0, 0))?;
        for y in 0..self.height {
            queue!(out, MoveTo(0, y as u16))?;
            let mut run = String::with_capacity(self.width);
            let mut run_color: Option<Color> = None;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if cell != run_color {
                    if !run.is_empty() {
                        flush_run(out, &run, run_color)?;
                        run.clear();
                    }
                    run_color = cell;
                }
                run.push(if cell.is_some() { '█' } else { ' ' });
            }
            flush_run(out, &run, run_color)?;
        }
        queue!(out, ResetColor)?;
        out.flush()
    }
}

fn flush_run(out: &mut io::Stdout, run: &str, color: Option<Color>) -> io::Result<()> {
    if run.is_empty() {
        return Ok(());
    }
    if let Some(c) = color {
        queue!(out, SetForegroundColor(c.to_crossterm_color()))?;
    }
    queue!(out, Print(run))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_test_keeps_the_nearer_pixel() {
        let mut buf = FrameBuffer::new(4, 4);
        buf.set_pixel(1, 1, 0.5, Color::RED);
        buf.set_pixel(1, 1, 0.9, Color::GREEN);
        assert_eq!(buf.data()[5], Color::RED.to_u32());
        buf.set_pixel(1, 1, 0.1, Color::BLUE);
        assert_eq!(buf.data()[5], Color::BLUE.to_u32());
    }

    #[test]
    fn out_of_bounds_writes_are_dropped() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set_pixel(5, 0, 0.0, Color::WHITE);
        buf.set_pixel(0, 5, 0.0, Color::WHITE);
        assert!(buf.data().iter().all(|&p| p == 0));
    }

    #[test]
    fn clear_resets_pixels_and_depth() {
        let mut buf = FrameBuffer::new(2, 2);
        buf.set_pixel(0, 0, 0.5, Color::WHITE);
        buf.clear();
        assert!(buf.data().iter().all(|&p| p == 0));
        buf.set_pixel(0, 0, 0.9, Color::RED);
        assert_eq!(buf.data()[0], Color::RED.to_u32());
    }
}
