/// Coin burst: the reward visuals spawned when a captured fish dies
///
/// `Coin` spins through its 10-frame sheet while a tween carries it to the
/// coin box in the corner; `CoinText` is the "x N" score popup drifting up
/// from the capture point, crediting the shared score when it arrives.
use crate::config::SpriteCut;
use crate::geometry::Vec2;
use crate::hud::Score;
use crate::scene::{DrawCtx, Entity, TickContext, Vitals};
use crate::sprite::{draw_cut, FrameCycle};
use crate::tween::Tween;

const COIN_CUT: SpriteCut = SpriteCut {
    x: 0,
    y: 0,
    w: 60,
    h: 60,
};
const COIN_SPIN_INTERVAL: u32 = 4;
const COIN_SPIN_FRAMES: usize = 10;
const COIN_FLIGHT_TICKS: u32 = 42;

const GLYPH_CUT: SpriteCut = SpriteCut {
    x: 0,
    y: 0,
    w: 36,
    h: 49,
};
// The multiplier sign sits after the ten digits in the glyph sheet.
const GLYPH_TIMES: usize = 10;
const POPUP_RISE: f32 = 50.0;
const POPUP_TICKS: u32 = 30;

pub struct Coin {
    vitals: Vitals,
    pos: Vec2,
    flight: Tween,
    spin: FrameCycle,
}

impl Coin {
    pub fn new(from: Vec2, coin_box: Vec2) -> Self {
        Coin {
            vitals: Vitals::new(),
            pos: from,
            flight: Tween::new(from, coin_box, COIN_FLIGHT_TICKS),
            spin: FrameCycle::new(COIN_SPIN_INTERVAL, COIN_SPIN_FRAMES),
        }
    }
}

impl Entity for Coin {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn animate(&mut self) {
        self.pos = self.flight.advance();
        if self.flight.is_finished() {
            self.vitals.kill();
        }
    }

    fn tick(&mut self, _ctx: &mut TickContext<'_>) {
        self.spin.step();
    }

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) -> Result<(), String> {
        let texture = ctx.assets.image(ctx.sprite)?;
        draw_cut(ctx.canvas, texture, &COIN_CUT, self.spin.index(), self.pos, 0.0)
    }
}

pub struct CoinText {
    vitals: Vitals,
    pos: Vec2,
    rise: Tween,
    amount: u32,
    score: Score,
}

impl CoinText {
    pub fn new(from: Vec2, amount: u32, score: &Score) -> Self {
        CoinText {
            vitals: Vitals::new(),
            pos: from,
            rise: Tween::new(from, from + Vec2::new(0.0, -POPUP_RISE), POPUP_TICKS),
            amount,
            score: score.clone(),
        }
    }
}

impl Entity for CoinText {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn ticks(&self) -> bool {
        false
    }

    fn animate(&mut self) {
        if self.rise.is_finished() {
            return;
        }
        self.pos = self.rise.advance();
        if self.rise.is_finished() {
            // Credit exactly once, on arrival
            self.score.add(self.amount);
            self.vitals.kill();
        }
    }

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) -> Result<(), String> {
        let texture = ctx.assets.image(ctx.sprite)?;
        // "x" then the amount, glyph by glyph
        let mut cursor = self.pos;
        let times = SpriteCut {
            x: GLYPH_CUT.x + GLYPH_CUT.w as i32 * GLYPH_TIMES as i32,
            ..GLYPH_CUT
        };
        draw_cut(ctx.canvas, texture, &times, 0, cursor, 0.0)?;
        for digit in digits(self.amount) {
            cursor.x += GLYPH_CUT.w as f32;
            let cut = SpriteCut {
                x: GLYPH_CUT.x + GLYPH_CUT.w as i32 * digit as i32,
                ..GLYPH_CUT
            };
            draw_cut(ctx.canvas, texture, &cut, 0, cursor, 0.0)?;
        }
        Ok(())
    }
}

fn digits(value: u32) -> Vec<u32> {
    let mut out = Vec::new();
    let mut rest = value;
    loop {
        out.push(rest % 10);
        rest /= 10;
        if rest == 0 {
            break;
        }
    }
    out.reverse();
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coin_flies_then_dies() {
        let mut coin = Coin::new(Vec2::new(400.0, 240.0), Vec2::new(100.0, 430.0));
        for _ in 0..COIN_FLIGHT_TICKS {
            coin.animate();
        }
        assert!(coin.vitals.is_dead());
        assert_eq!(coin.pos, Vec2::new(100.0, 430.0));
    }

    #[test]
    fn test_popup_credits_score_once_on_arrival() {
        let score = Score::new();
        let mut popup = CoinText::new(Vec2::new(400.0, 240.0), 5, &score);
        for _ in 0..POPUP_TICKS - 1 {
            popup.animate();
        }
        assert_eq!(score.get(), 0);
        popup.animate();
        assert_eq!(score.get(), 5);
        assert!(popup.vitals.is_dead());
        // The scene stops animating dead entities; even a stray extra call
        // must not double-credit
        popup.animate();
        assert_eq!(score.get(), 5);
    }

    #[test]
    fn test_popup_rises() {
        let score = Score::new();
        let mut popup = CoinText::new(Vec2::new(400.0, 240.0), 1, &score);
        popup.animate();
        assert!(popup.pos.y < 240.0);
        assert_eq!(popup.pos.x, 400.0);
    }

    #[test]
    fn test_digit_decomposition() {
        assert_eq!(digits(0), vec![0]);
        assert_eq!(digits(7), vec![7]);
        assert_eq!(digits(205), vec![2, 0, 5]);
    }
}
