/// Bullet: the cannon's projectile
///
/// Advances by unit direction times speed each tick. While any corner of its
/// collision rectangle is still on the stage it runs the strike query against
/// the fish school; a hit drops a capture net at the impact point and kills
/// the bullet in the same tick. Once every corner has left the stage the
/// bullet dies quietly.
use std::rc::Rc;

use crate::collision::Collider;
use crate::config::EntityTables;
use crate::geometry::{Bounds, OrientedRect, Vec2};
use crate::net::Net;
use crate::scene::{DrawCtx, Entity, SpawnRequest, TickContext, Vitals};
use crate::school::School;
use crate::sprite::draw_cut;

pub const BULLET_Z: i32 = 5;
const NET_Z: i32 = 3;

pub struct Bullet {
    vitals: Vitals,
    pos: Vec2,
    dir: Vec2,
    speed: f32,
    angle: f32,
    level: u8,
    bounds: Bounds,
    school: School,
    tables: Rc<EntityTables>,
    collided: bool,
}

impl Bullet {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pos: Vec2,
        dir: Vec2,
        speed: f32,
        angle: f32,
        level: u8,
        bounds: Bounds,
        school: School,
        tables: Rc<EntityTables>,
    ) -> Self {
        Bullet {
            vitals: Vitals::new(),
            pos,
            dir,
            speed,
            angle,
            level,
            bounds,
            school,
            tables,
            collided: false,
        }
    }

    fn collider_rect(&self) -> OrientedRect {
        let cut = &self.tables.bullet(self.level).cut;
        let half = Vec2::new(cut.w as f32 / 2.0, cut.h as f32 / 2.0);
        OrientedRect::new(self.pos, half, self.angle)
    }

    fn collider(&self) -> Collider {
        // The overlay shows a hit in a different color than a bullet in flight
        let color = if self.collided {
            sdl2::pixels::Color::RGB(255, 255, 0)
        } else {
            sdl2::pixels::Color::RGB(255, 0, 0)
        };
        Collider::rect(self.collider_rect()).with_color(color)
    }
}

impl Entity for Bullet {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn tick(&mut self, ctx: &mut TickContext<'_>) {
        self.pos = self.pos + self.dir * self.speed;
        let rect = self.collider_rect();

        if !rect.corners().iter().any(|c| self.bounds.contains(*c)) {
            log::debug!("bullet left the stage");
            self.vitals.kill();
            return;
        }

        if let Some(id) = self.school.strike(&rect) {
            self.collided = true;
            let cut = self.tables.net(self.level).cut.clone();
            ctx.spawn(SpawnRequest::new(
                "web",
                Box::new(Net::new(self.pos, cut)),
                NET_Z,
            ));
            self.vitals.kill();
            log::debug!("bullet netted target {id}");
        }
    }

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) -> Result<(), String> {
        let cut = &self.tables.bullet(self.level).cut;
        let texture = ctx.assets.image(ctx.sprite)?;
        draw_cut(ctx.canvas, texture, cut, 0, self.pos, self.angle)?;
        if ctx.debug_shapes {
            self.collider().debug_draw(ctx.canvas)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;

    fn tables() -> Rc<EntityTables> {
        Rc::new(
            EntityTables::from_json(include_str!("../assets/config/entity_tables.json"))
                .expect("tables parse"),
        )
    }

    #[test]
    fn test_projectile_reaches_target_and_both_flags_flip_same_tick() {
        // A stationary target at (50, 50) on a 100x100 stage; a projectile at
        // (50, 90) moving along (0, -1) at speed 5. Within the tick where the
        // shapes first overlap, the collision must report, the target's
        // capture flag must flip and the bullet must die.
        let bounds = Bounds::new(0.0, 100.0, 0.0, 100.0);
        let school = School::new(bounds);
        let target = school.enroll(OrientedRect::new(
            Vec2::new(50.0, 50.0),
            Vec2::new(10.0, 10.0),
            0.0,
        ));

        let bullet = Bullet::new(
            Vec2::new(50.0, 90.0),
            Vec2::new(0.0, -1.0),
            5.0,
            0.0,
            1,
            bounds,
            school.clone(),
            tables(),
        );
        let bullet_vitals = bullet.vitals().clone();

        let mut scene = Scene::new();
        scene.push("bullet", Box::new(bullet), BULLET_Z);

        let mut struck_tick = None;
        for tick in 1..=9 {
            scene.logic();
            if target.struck.get() {
                struck_tick = Some(tick);
                break;
            }
        }
        let struck_tick = struck_tick.expect("projectile never reached the target");
        // Struck before the projectile passed y = 50
        assert!(struck_tick <= 8);
        // The bullet died in the very tick the strike landed
        assert!(bullet_vitals.is_dead());
        // ...and left a capture net behind, drawn this same frame
        let drawn = scene.draw_pass();
        assert_eq!(drawn.len(), 1);
        assert_eq!(scene.spirit_count(), 1);
    }

    #[test]
    fn test_bullet_dies_when_fully_off_stage() {
        let bounds = Bounds::new(0.0, 100.0, 0.0, 100.0);
        let school = School::new(bounds);
        let mut bullet = Bullet::new(
            Vec2::new(50.0, 10.0),
            Vec2::new(0.0, -1.0),
            5.0,
            0.0,
            1,
            bounds,
            school,
            tables(),
        );
        let mut spawns = Vec::new();
        let mut ctx = TickContext::new(&mut spawns);
        // Level-1 bullets are 28 tall; a handful of ticks carries every
        // corner past the top edge
        for _ in 0..6 {
            bullet.tick(&mut ctx);
        }
        assert!(bullet.vitals.is_dead());
        assert!(spawns.is_empty());
    }

    #[test]
    fn test_miss_keeps_flying() {
        let bounds = Bounds::new(0.0, 100.0, 0.0, 100.0);
        let school = School::new(bounds);
        let far = school.enroll(OrientedRect::new(
            Vec2::new(10.0, 10.0),
            Vec2::new(5.0, 5.0),
            0.0,
        ));
        let mut bullet = Bullet::new(
            Vec2::new(90.0, 90.0),
            Vec2::new(0.0, -1.0),
            1.0,
            0.0,
            1,
            bounds,
            school,
            tables(),
        );
        let mut spawns = Vec::new();
        let mut ctx = TickContext::new(&mut spawns);
        bullet.tick(&mut ctx);
        assert!(!bullet.vitals.is_dead());
        assert!(!far.struck.get());
    }
}
