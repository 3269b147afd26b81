/// Frame-stepped tweens for cosmetic animation
///
/// The scene runs at a fixed per-frame cadence, so tweens count frames instead
/// of wall-clock time; that keeps coin flights and net pulses deterministic in
/// tests. Only linear easing exists because nothing in the game uses any other
/// curve. Tweens are advanced in the animate phase, before any entity ticks.
use crate::geometry::Vec2;

#[derive(Debug, Clone)]
pub struct Tween {
    from: Vec2,
    to: Vec2,
    frames: u32,
    elapsed: u32,
    yoyo: bool,
    repeats_left: u32,
    forward: bool,
    finished: bool,
}

impl Tween {
    /// Linear tween from `from` to `to` over `frames` frames. A zero-frame
    /// tween finishes on its first advance.
    pub fn new(from: Vec2, to: Vec2, frames: u32) -> Self {
        Tween {
            from,
            to,
            frames,
            elapsed: 0,
            yoyo: false,
            repeats_left: 0,
            forward: true,
            finished: false,
        }
    }

    /// Bounce back to the start instead of stopping at the end.
    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    /// Run the tween `extra` additional times after the first pass.
    pub fn repeat(mut self, extra: u32) -> Self {
        self.repeats_left = extra;
        self
    }

    /// Steps one frame and returns the new value. Calling after completion
    /// keeps returning the resting value.
    pub fn advance(&mut self) -> Vec2 {
        if self.finished {
            return self.value();
        }
        self.elapsed += 1;
        if self.elapsed >= self.frames {
            self.elapsed = 0;
            if self.yoyo && self.forward {
                self.forward = false;
            } else if self.repeats_left > 0 {
                self.repeats_left -= 1;
                self.forward = true;
            } else {
                self.finished = true;
            }
        }
        self.value()
    }

    pub fn value(&self) -> Vec2 {
        if self.finished {
            let at_start = self.yoyo && self.repeats_left == 0;
            return if at_start { self.from } else { self.to };
        }
        let t = if self.frames == 0 {
            1.0
        } else {
            self.elapsed as f32 / self.frames as f32
        };
        let t = if self.forward { t } else { 1.0 - t };
        self.from + (self.to - self.from) * t
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }
}
