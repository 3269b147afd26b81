/// Fish: the swimming targets
///
/// A fish swims along its spawn angle, cycling its 4-frame swim animation,
/// until one of three things happens: a bullet captures it (the school raises
/// its shared capture flag), it leaves the stage, or nothing and it keeps
/// swimming. A captured fish stops moving and plays the 4-frame dying cycle
/// for a fixed countdown, then flips its dead flag and bursts into a coin and
/// a score popup. Leaving the stage flips the dead flag with no ceremony.
use std::rc::Rc;

use crate::coin::{Coin, CoinText};
use crate::collision::Collider;
use crate::config::EntityTables;
use crate::geometry::{Bounds, OrientedRect, Vec2};
use crate::hud::Score;
use crate::scene::{DrawCtx, Entity, SpawnRequest, TickContext, Vitals};
use crate::school::{Membership, School};
use crate::sprite::{draw_cut, FrameCycle};

const FISH_SPEED: f32 = 1.0;
const SWIM_FRAME_INTERVAL: u32 = 10;
const SWIM_FRAMES: usize = 4;
// Dying frames sit below the swim frames in each fish sheet.
const DYING_FRAME_OFFSET: usize = 4;
const DYING_TICKS: u32 = 60;

pub const FISH_Z: i32 = 2;
const BURST_Z: i32 = 7;

pub struct Fish {
    vitals: Vitals,
    pos: Vec2,
    dir: Vec2,
    speed: f32,
    angle: f32,
    level: u8,
    bounds: Bounds,
    school: School,
    membership: Membership,
    swim: FrameCycle,
    dying_ticks: Option<u32>,
    tables: Rc<EntityTables>,
    score: Score,
    coin_box: Vec2,
}

impl Fish {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pos: Vec2,
        angle: f32,
        level: u8,
        bounds: Bounds,
        school: &School,
        tables: &Rc<EntityTables>,
        score: &Score,
        coin_box: Vec2,
    ) -> Self {
        let dir = Vec2::new(angle.cos(), angle.sin());
        let spec = tables.fish(level);
        let half = Vec2::new(spec.cut.w as f32 / 2.0, spec.cut.h as f32 / 2.0);
        let membership = school.enroll(OrientedRect::new(pos, half, angle));
        Fish {
            vitals: Vitals::new(),
            pos,
            dir,
            speed: FISH_SPEED,
            angle,
            level,
            bounds,
            school: school.clone(),
            membership,
            swim: FrameCycle::new(SWIM_FRAME_INTERVAL, SWIM_FRAMES),
            dying_ticks: None,
            tables: Rc::clone(tables),
            score: score.clone(),
            coin_box,
        }
    }

    pub fn membership_id(&self) -> u32 {
        self.membership.id
    }

    pub fn is_captured(&self) -> bool {
        self.membership.struck.get()
    }

    fn collider_rect(&self) -> OrientedRect {
        let spec = self.tables.fish(self.level);
        let half = Vec2::new(spec.cut.w as f32 / 2.0, spec.cut.h as f32 / 2.0);
        OrientedRect::new(self.pos, half, self.angle)
    }

    fn collider(&self) -> Collider {
        Collider::rect(self.collider_rect())
            .with_color(sdl2::pixels::Color::RGB(0, 200, 255))
    }
}

impl Entity for Fish {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.swim.step();

        if let Some(ticks) = self.dying_ticks.as_mut() {
            *ticks += 1;
            if *ticks >= DYING_TICKS {
                self.vitals.kill();
                let price = self.tables.fish(self.level).price;
                ctx.spawn(SpawnRequest::new(
                    "coinAni1",
                    Box::new(Coin::new(self.pos, self.coin_box)),
                    BURST_Z,
                ));
                ctx.spawn(SpawnRequest::new(
                    "coinText",
                    Box::new(CoinText::new(self.pos, price, &self.score)),
                    BURST_Z,
                ));
            }
            return;
        }

        if self.membership.struck.get() {
            self.dying_ticks = Some(0);
            return;
        }

        self.pos = self.pos + self.dir * self.speed;
        let rect = self.collider_rect();
        if rect.corners().iter().any(|c| self.bounds.contains(*c)) {
            self.school.refresh(self.membership.id, rect);
        } else {
            // Fully off the stage: expected end of life
            self.vitals.kill();
        }
    }

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) -> Result<(), String> {
        let spec = self.tables.fish(self.level);
        let frame = if self.dying_ticks.is_some() {
            self.swim.index() + DYING_FRAME_OFFSET
        } else {
            self.swim.index()
        };
        let texture = ctx.assets.image(ctx.sprite)?;
        draw_cut(ctx.canvas, texture, &spec.cut, frame, self.pos, self.angle)?;
        if ctx.debug_shapes {
            self.collider().debug_draw(ctx.canvas)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::TickContext;

    fn tables() -> Rc<EntityTables> {
        Rc::new(
            EntityTables::from_json(include_str!("../assets/config/entity_tables.json"))
                .expect("tables parse"),
        )
    }

    fn make_fish(pos: Vec2, angle: f32, school: &School) -> Fish {
        Fish::new(
            pos,
            angle,
            1,
            Bounds::new(0.0, 800.0, 0.0, 480.0),
            school,
            &tables(),
            &Score::new(),
            Vec2::new(100.0, 430.0),
        )
    }

    #[test]
    fn test_swim_moves_along_angle_and_refreshes() {
        let school = School::new(Bounds::new(0.0, 800.0, 0.0, 480.0));
        let mut fish = make_fish(Vec2::new(400.0, 240.0), 0.0, &school);
        let mut spawns = Vec::new();
        let mut ctx = TickContext::new(&mut spawns);
        for _ in 0..10 {
            fish.tick(&mut ctx);
        }
        // Angle 0 swims in +x at speed 1
        assert!((fish.pos.x - 410.0).abs() < 1e-3);
        assert_eq!(fish.pos.y, 240.0);
        // Registered rectangle followed along
        assert!(school.strike(&OrientedRect::new(
            Vec2::new(410.0, 240.0),
            Vec2::new(5.0, 5.0),
            0.0
        ))
        .is_some());
    }

    #[test]
    fn test_capture_runs_countdown_then_bursts() {
        let school = School::new(Bounds::new(0.0, 800.0, 0.0, 480.0));
        let mut fish = make_fish(Vec2::new(400.0, 240.0), 0.0, &school);
        fish.membership.struck.set(true);
        assert!(fish.is_captured());
        let mut spawns = Vec::new();
        {
            let mut ctx = TickContext::new(&mut spawns);
            // One tick to notice the capture, then the countdown
            fish.tick(&mut ctx);
            assert!(!fish.vitals.is_dead());
            let frozen = fish.pos;
            for _ in 0..DYING_TICKS {
                fish.tick(&mut ctx);
            }
            assert_eq!(fish.pos, frozen, "dying fish moved");
            assert!(fish.vitals.is_dead());
        }
        let assets: Vec<&str> = spawns.iter().map(|s| s.asset()).collect();
        assert_eq!(assets, vec!["coinAni1", "coinText"]);
        assert!(spawns.iter().all(|s| s.z_index() == BURST_Z));
    }

    #[test]
    fn test_leaving_the_stage_is_silent_death() {
        let school = School::new(Bounds::new(0.0, 800.0, 0.0, 480.0));
        // Just outside the right edge, swimming further out
        let mut fish = make_fish(Vec2::new(840.0, 240.0), 0.0, &school);
        let mut spawns = Vec::new();
        let mut ctx = TickContext::new(&mut spawns);
        fish.tick(&mut ctx);
        assert!(fish.vitals.is_dead());
        assert!(spawns.is_empty());
    }

    #[test]
    fn test_near_edge_fish_survives_while_a_corner_remains() {
        let school = School::new(Bounds::new(0.0, 800.0, 0.0, 480.0));
        // Center outside, trailing corner still inside (level 1 is 55 wide)
        let mut fish = make_fish(Vec2::new(810.0, 240.0), 0.0, &school);
        let mut spawns = Vec::new();
        let mut ctx = TickContext::new(&mut spawns);
        fish.tick(&mut ctx);
        assert!(!fish.vitals.is_dead());
    }
}
