use crate::config::SpriteCut;
use crate::geometry::Vec2;
use sdl2::rect::Rect;
use sdl2::render::{Canvas, Texture};
use sdl2::video::Window;

/// Tick-driven frame cycling: advance the frame index every `interval` ticks,
/// wrapping at `len`. Fish and coins run their sheet animation with this.
#[derive(Debug, Clone)]
pub struct FrameCycle {
    interval: u32,
    counter: u32,
    index: usize,
    len: usize,
}

impl FrameCycle {
    pub fn new(interval: u32, len: usize) -> Self {
        debug_assert!(len > 0, "frame cycle needs at least one frame");
        FrameCycle {
            interval,
            counter: 0,
            index: 0,
            len,
        }
    }

    /// Steps one tick; returns true when the frame index moved.
    pub fn step(&mut self) -> bool {
        self.counter += 1;
        if self.counter > self.interval {
            self.counter = 0;
            self.index = (self.index + 1) % self.len;
            true
        } else {
            false
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// Copies one sheet cut to the canvas, centered on `center` and rotated by
/// `angle` radians about that center. `frame_row` selects a vertically stacked
/// frame below the base cut.
pub fn draw_cut(
    canvas: &mut Canvas<Window>,
    texture: &Texture,
    cut: &SpriteCut,
    frame_row: usize,
    center: Vec2,
    angle: f32,
) -> Result<(), String> {
    let src = Rect::new(cut.x, cut.y + cut.h as i32 * frame_row as i32, cut.w, cut.h);
    let dst = Rect::new(
        (center.x - cut.w as f32 / 2.0) as i32,
        (center.y - cut.h as f32 / 2.0) as i32,
        cut.w,
        cut.h,
    );
    canvas.copy_ex(
        texture,
        Some(src),
        Some(dst),
        f64::from(angle.to_degrees()),
        None,
        false,
        false,
    )
}

/// Like `draw_cut` but with the destination scaled about its center; the net
/// pulse draws through this.
pub fn draw_cut_scaled(
    canvas: &mut Canvas<Window>,
    texture: &Texture,
    cut: &SpriteCut,
    center: Vec2,
    scale: Vec2,
) -> Result<(), String> {
    let w = cut.w as f32 * scale.x;
    let h = cut.h as f32 * scale.y;
    let src = Rect::new(cut.x, cut.y, cut.w, cut.h);
    let dst = Rect::new(
        (center.x - w / 2.0) as i32,
        (center.y - h / 2.0) as i32,
        w as u32,
        h as u32,
    );
    canvas.copy(texture, Some(src), Some(dst))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_waits_for_interval() {
        let mut cycle = FrameCycle::new(2, 4);
        assert!(!cycle.step());
        assert!(!cycle.step());
        assert!(cycle.step());
        assert_eq!(cycle.index(), 1);
    }

    #[test]
    fn test_cycle_wraps() {
        let mut cycle = FrameCycle::new(0, 3);
        for _ in 0..3 {
            cycle.step();
        }
        assert_eq!(cycle.index(), 0);
    }
}
