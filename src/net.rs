/// Capture net: the visual left at a bullet's impact point
///
/// Purely cosmetic: one scale pulse (out, back, out, back) driven by a yoyo
/// tween, then dead. The net never ticks and never collides.
use crate::config::SpriteCut;
use crate::geometry::Vec2;
use crate::scene::{DrawCtx, Entity, Vitals};
use crate::sprite::draw_cut_scaled;
use crate::tween::Tween;

const PULSE_FROM: f32 = 0.8;
const PULSE_TICKS: u32 = 7;

pub struct Net {
    vitals: Vitals,
    pos: Vec2,
    scale: Vec2,
    pulse: Tween,
    cut: SpriteCut,
}

impl Net {
    /// `cut` is the net sheet rectangle for the bullet level that made the
    /// capture; the bullet resolves it so the net stays table-agnostic.
    pub fn new(pos: Vec2, cut: SpriteCut) -> Self {
        Net {
            vitals: Vitals::new(),
            pos,
            scale: Vec2::new(PULSE_FROM, PULSE_FROM),
            pulse: Tween::new(
                Vec2::new(PULSE_FROM, PULSE_FROM),
                Vec2::new(1.0, 1.0),
                PULSE_TICKS,
            )
            .yoyo(true)
            .repeat(1),
            cut,
        }
    }
}

impl Entity for Net {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn ticks(&self) -> bool {
        false
    }

    fn animate(&mut self) {
        self.scale = self.pulse.advance();
        if self.pulse.is_finished() {
            self.vitals.kill();
        }
    }

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) -> Result<(), String> {
        let texture = ctx.assets.image(ctx.sprite)?;
        draw_cut_scaled(ctx.canvas, texture, &self.cut, self.pos, self.scale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cut() -> SpriteCut {
        SpriteCut {
            x: 332,
            y: 372,
            w: 88,
            h: 88,
        }
    }

    #[test]
    fn test_pulse_then_dead() {
        let mut net = Net::new(Vec2::new(100.0, 100.0), cut());
        let mut steps = 0;
        while !net.vitals.is_dead() {
            net.animate();
            steps += 1;
            assert!(steps < 100, "net never finished its pulse");
        }
        // Two yoyo legs, repeated once
        assert_eq!(steps, 4 * PULSE_TICKS);
    }

    #[test]
    fn test_scale_peaks_mid_pulse() {
        let mut net = Net::new(Vec2::new(0.0, 0.0), cut());
        for _ in 0..PULSE_TICKS {
            net.animate();
        }
        assert!((net.scale.x - 1.0).abs() < 1e-4);
    }
}
