/// HUD bar: score display and cannon level buttons
///
/// Drawn along the bottom edge. The score renders with the digit sprite sheet
/// (right-aligned into six fixed slots); the plus and minus buttons are click
/// regions that raise/lower the shared `CannonLevel`.
use std::cell::Cell;
use std::rc::Rc;

use sdl2::rect::Rect;

use crate::cannon::CannonLevel;
use crate::config::SpriteCut;
use crate::geometry::{OrientedRect, Vec2};
use crate::scene::{
    DrawCtx, Entity, PointerBinding, PointerEvent, PointerMap, TickContext, Vitals,
};

const BAR_HEIGHT: u32 = 72;

// Plus/minus buttons, cut from the bar sheet below the bar strip.
const BUTTON_X: f32 = 360.0;
const BUTTON_CUT_Y: i32 = 75;
const BUTTON_W: u32 = 36;
const BUTTON_H: u32 = 28;
const BUTTON_GAP: i32 = 4;
const BUTTON_SPACING: f32 = 130.0;

// Score digits, stacked 9..0 top-to-bottom in the digit sheet.
const DIGIT_CUT: SpriteCut = SpriteCut {
    x: 0,
    y: 0,
    w: 20,
    h: 24,
};
const DIGIT_SLOTS: [f32; 6] = [20.0, 43.0, 65.0, 87.0, 111.0, 135.0];

/// Shared score, credited by arriving score popups.
#[derive(Clone, Default)]
pub struct Score(Rc<Cell<u32>>);

impl Score {
    pub fn new() -> Self {
        Score::default()
    }

    pub fn add(&self, points: u32) {
        self.0.set(self.0.get() + points);
        log::debug!("score {}", self.0.get());
    }

    pub fn get(&self) -> u32 {
        self.0.get()
    }
}

pub struct Hud {
    vitals: Vitals,
    level: CannonLevel,
    score: Score,
    view: Vec2,
}

impl Hud {
    pub const LEVEL_UP: u32 = 0;
    pub const LEVEL_DOWN: u32 = 1;

    pub fn new(view: Vec2, level: CannonLevel, score: Score) -> Self {
        Hud {
            vitals: Vitals::new(),
            level,
            score,
            view,
        }
    }

    /// Click regions over the plus and minus buttons.
    pub fn pointer_map(view: Vec2) -> PointerMap {
        let half = Vec2::new(BUTTON_W as f32 / 2.0, BUTTON_H as f32 / 2.0);
        let top = view.y - BUTTON_H as f32;
        let plus_center = Vec2::new(BUTTON_X + BUTTON_GAP as f32 + half.x, top + half.y);
        let minus_center = plus_center + Vec2::new(BUTTON_SPACING, 0.0);
        PointerMap {
            moves: vec![],
            clicks: vec![
                PointerBinding {
                    region: OrientedRect::new(plus_center, half, 0.0),
                    action: Hud::LEVEL_UP,
                },
                PointerBinding {
                    region: OrientedRect::new(minus_center, half, 0.0),
                    action: Hud::LEVEL_DOWN,
                },
            ],
        }
    }
}

impl Entity for Hud {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn ticks(&self) -> bool {
        false
    }

    fn pointer(&mut self, action: u32, _event: PointerEvent, _ctx: &mut TickContext<'_>) {
        match action {
            Hud::LEVEL_UP => {
                self.level.raise();
                log::debug!("cannon level {}", self.level.get());
            }
            Hud::LEVEL_DOWN => {
                self.level.lower();
                log::debug!("cannon level {}", self.level.get());
            }
            _ => {}
        }
    }

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) -> Result<(), String> {
        let bar = ctx.assets.image(ctx.sprite)?;
        let (bar_w, _) = ctx.assets.size(ctx.sprite)?;
        let bar_x = (self.view.x / 2.0 - bar_w as f32 / 2.0) as i32;
        let bar_y = (self.view.y - BAR_HEIGHT as f32) as i32;
        ctx.canvas.copy(
            bar,
            Some(Rect::new(0, 0, bar_w, BAR_HEIGHT)),
            Some(Rect::new(bar_x, bar_y, bar_w, BAR_HEIGHT)),
        )?;

        // Plus and minus buttons come from the same sheet, below the bar
        let button_y = (self.view.y - BUTTON_H as f32) as i32;
        let stride = BUTTON_W as i32 + BUTTON_GAP * 2;
        for (slot, dst_offset) in [(1, 0.0), (3, BUTTON_SPACING)] {
            let src = Rect::new(slot * stride + BUTTON_GAP, BUTTON_CUT_Y, BUTTON_W, BUTTON_H);
            let dst = Rect::new(
                (BUTTON_X + dst_offset) as i32 + BUTTON_GAP,
                button_y,
                BUTTON_W,
                BUTTON_H,
            );
            ctx.canvas.copy(bar, Some(src), Some(dst))?;
        }

        // Score, right-aligned into the six digit slots
        let digits_img = ctx.assets.image("number_black")?;
        let text = self.score.get().to_string();
        let digits: Vec<u32> = text
            .chars()
            .filter_map(|c| c.to_digit(10))
            .collect();
        let shown = &digits[digits.len().saturating_sub(DIGIT_SLOTS.len())..];
        let base_x = self.view.x / 2.0 - bar_w as f32 / 2.0 + 10.0;
        let base_y = self.view.y - DIGIT_CUT.h as f32 + 8.0;
        for (i, digit) in shown.iter().enumerate() {
            let slot = DIGIT_SLOTS[i + DIGIT_SLOTS.len() - shown.len()];
            // Digits are stacked 9 down to 0
            let src = Rect::new(
                DIGIT_CUT.x,
                DIGIT_CUT.y + DIGIT_CUT.h as i32 * (9 - *digit as i32),
                DIGIT_CUT.w,
                DIGIT_CUT.h,
            );
            let dst = Rect::new(
                (base_x + slot - DIGIT_CUT.w as f32 / 2.0) as i32,
                (base_y - DIGIT_CUT.h as f32 / 2.0) as i32,
                DIGIT_CUT.w,
                DIGIT_CUT.h,
            );
            ctx.canvas.copy(digits_img, Some(src), Some(dst))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PointerKind, Scene};

    #[test]
    fn test_score_accumulates() {
        let score = Score::new();
        score.add(5);
        score.add(20);
        assert_eq!(score.get(), 25);
    }

    #[test]
    fn test_buttons_drive_the_shared_level() {
        let view = Vec2::new(800.0, 480.0);
        let level = CannonLevel::new();
        let mut scene = Scene::new();
        let spirit = scene.push(
            "bottom",
            Box::new(Hud::new(view, level.clone(), Score::new())),
            4,
        );
        scene.attach(&spirit, Hud::pointer_map(view));

        let plus = Vec2::new(BUTTON_X + BUTTON_GAP as f32 + 18.0, view.y - 14.0);
        let minus = plus + Vec2::new(BUTTON_SPACING, 0.0);
        scene.pointer(PointerEvent {
            kind: PointerKind::Click,
            pos: plus,
        });
        scene.pointer(PointerEvent {
            kind: PointerKind::Click,
            pos: plus,
        });
        assert_eq!(level.get(), 3);
        scene.pointer(PointerEvent {
            kind: PointerKind::Click,
            pos: minus,
        });
        assert_eq!(level.get(), 2);
        // A click on the bar but outside both buttons changes nothing
        scene.pointer(PointerEvent {
            kind: PointerKind::Click,
            pos: Vec2::new(300.0, view.y - 14.0),
        });
        assert_eq!(level.get(), 2);
    }
}
