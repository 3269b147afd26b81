/// Cannon: the player's pointer-aimed turret
///
/// The cannon never ticks; everything it does is pointer-driven. A move event
/// anywhere on the stage re-aims it (its aim region is the full view on
/// purpose — aiming must work continuously, not only over the sprite), and a
/// click fires a bullet from the rotation pivot along the aim direction. The
/// shared `CannonLevel` selects both the cannon sprite and the bullet level;
/// the HUD's plus/minus buttons write it.
use std::cell::Cell;
use std::rc::Rc;

use sdl2::rect::Rect;

use crate::bullet::{Bullet, BULLET_Z};
use crate::config::EntityTables;
use crate::geometry::{Bounds, OrientedRect, Vec2};
use crate::scene::{
    DrawCtx, Entity, PointerBinding, PointerEvent, PointerMap, SpawnRequest, TickContext, Vitals,
};
use crate::school::School;

const PIVOT_X_OFFSET: f32 = 42.0;
const PIVOT_Y_OFFSET: f32 = 10.0;
// Each cannon sheet stacks this many frames vertically; frame 0 is drawn.
const SHEET_FRAMES: u32 = 5;
const BULLET_SPEED: f32 = 4.0;

pub const MAX_LEVEL: u8 = 7;

/// Shared cannon level, written by the HUD buttons and read by the cannon.
#[derive(Clone)]
pub struct CannonLevel(Rc<Cell<u8>>);

impl CannonLevel {
    pub fn new() -> Self {
        CannonLevel(Rc::new(Cell::new(1)))
    }

    pub fn get(&self) -> u8 {
        self.0.get()
    }

    pub fn raise(&self) {
        if self.0.get() < MAX_LEVEL {
            self.0.set(self.0.get() + 1);
        }
    }

    pub fn lower(&self) {
        if self.0.get() > 1 {
            self.0.set(self.0.get() - 1);
        }
    }
}

impl Default for CannonLevel {
    fn default() -> Self {
        CannonLevel::new()
    }
}

pub struct Cannon {
    vitals: Vitals,
    level: CannonLevel,
    angle: f32,
    view: Vec2,
    frame_size: Vec2,
    bounds: Bounds,
    school: School,
    tables: Rc<EntityTables>,
}

impl Cannon {
    pub const AIM: u32 = 0;
    pub const FIRE: u32 = 1;

    /// `frame_size` is one sheet frame of the cannon image; all levels share
    /// the same frame geometry so the pivot stays put across level changes.
    pub fn new(
        view: Vec2,
        frame_size: Vec2,
        level: CannonLevel,
        bounds: Bounds,
        school: School,
        tables: Rc<EntityTables>,
    ) -> Self {
        Cannon {
            vitals: Vitals::new(),
            level,
            angle: 0.0,
            view,
            frame_size,
            bounds,
            school,
            tables,
        }
    }

    /// Aim and fire regions covering the whole view.
    pub fn pointer_map(view: Vec2) -> PointerMap {
        let full = OrientedRect::new(view * 0.5, view * 0.5, 0.0);
        PointerMap {
            moves: vec![PointerBinding {
                region: full,
                action: Cannon::AIM,
            }],
            clicks: vec![PointerBinding {
                region: full,
                action: Cannon::FIRE,
            }],
        }
    }

    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Where the barrel rotates: centered on the mounted frame, which hangs
    /// partly below the bottom edge of the view.
    fn pivot(&self) -> Vec2 {
        let mount = Vec2::new(
            self.view.x / 2.0 + PIVOT_X_OFFSET,
            self.view.y + PIVOT_Y_OFFSET,
        );
        let start = Vec2::new(mount.x - self.frame_size.x / 2.0, mount.y - self.frame_size.y);
        Vec2::new(
            start.x + self.frame_size.x / 2.0,
            start.y + self.frame_size.y / 2.0,
        )
    }

    /// Points the barrel at the pointer and returns the aim vector relative
    /// to the pivot, with y measured upward from it. The angle is read from
    /// straight-up: positive leans right, negative leans left.
    fn aim_at(&mut self, point: Vec2) -> Vec2 {
        let pivot = self.pivot();
        let aim = Vec2::new(point.x - pivot.x, (point.y - pivot.y).abs());
        self.angle = aim.x.atan2(aim.y);
        aim
    }
}

impl Entity for Cannon {
    fn vitals(&self) -> &Vitals {
        &self.vitals
    }

    fn ticks(&self) -> bool {
        false
    }

    fn pointer(&mut self, action: u32, event: PointerEvent, ctx: &mut TickContext<'_>) {
        match action {
            Cannon::AIM => {
                self.aim_at(event.pos);
            }
            Cannon::FIRE => {
                let aim = self.aim_at(event.pos);
                let len = aim.length();
                if len == 0.0 {
                    // Click exactly on the pivot: no direction to fire along
                    return;
                }
                // Aim y points up; flip it into screen space
                let dir = Vec2::new(aim.x / len, -(aim.y / len));
                let level = self.level.get();
                ctx.spawn(SpawnRequest::new(
                    "bullet",
                    Box::new(Bullet::new(
                        self.pivot(),
                        dir,
                        BULLET_SPEED,
                        self.angle,
                        level,
                        self.bounds,
                        self.school.clone(),
                        Rc::clone(&self.tables),
                    )),
                    BULLET_Z,
                ));
                log::debug!("fired level {level} bullet");
            }
            _ => {}
        }
    }

    fn draw(&self, ctx: &mut DrawCtx<'_, '_>) -> Result<(), String> {
        // The sprite follows the current level, not the name pushed with
        let name = format!("cannon{}", self.level.get());
        let texture = ctx.assets.image(&name)?;
        let (w, h) = (self.frame_size.x as u32, self.frame_size.y as u32);
        let pivot = self.pivot();
        let src = Rect::new(0, 0, w, h);
        let dst = Rect::new(
            (pivot.x - self.frame_size.x / 2.0) as i32,
            (pivot.y - self.frame_size.y / 2.0) as i32,
            w,
            h,
        );
        // Default rotation center is the dst center, which is the pivot
        ctx.canvas.copy_ex(
            texture,
            Some(src),
            Some(dst),
            f64::from(self.angle.to_degrees()),
            None,
            false,
            false,
        )
    }
}

/// One sheet frame of a cannon image, given the full image size.
pub fn cannon_frame_size(image_size: (u32, u32)) -> Vec2 {
    Vec2::new(
        image_size.0 as f32,
        image_size.1 as f32 / SHEET_FRAMES as f32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{PointerKind, Scene};

    fn tables() -> Rc<EntityTables> {
        Rc::new(
            EntityTables::from_json(include_str!("../assets/config/entity_tables.json"))
                .expect("tables parse"),
        )
    }

    fn cannon(level: CannonLevel) -> Cannon {
        let bounds = Bounds::new(0.0, 800.0, 0.0, 480.0);
        Cannon::new(
            Vec2::new(800.0, 480.0),
            Vec2::new(74.0, 74.0),
            level,
            bounds,
            School::new(bounds),
            tables(),
        )
    }

    #[test]
    fn test_level_clamps_between_one_and_max() {
        let level = CannonLevel::new();
        level.lower();
        assert_eq!(level.get(), 1);
        for _ in 0..20 {
            level.raise();
        }
        assert_eq!(level.get(), MAX_LEVEL);
    }

    #[test]
    fn test_aim_straight_up_is_zero() {
        let mut cannon = cannon(CannonLevel::new());
        let pivot = cannon.pivot();
        cannon.aim_at(Vec2::new(pivot.x, 100.0));
        assert!(cannon.angle().abs() < 1e-5);
    }

    #[test]
    fn test_aim_right_leans_positive() {
        let mut cannon = cannon(CannonLevel::new());
        let pivot = cannon.pivot();
        cannon.aim_at(Vec2::new(pivot.x + 100.0, pivot.y));
        assert!((cannon.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
        cannon.aim_at(Vec2::new(pivot.x - 100.0, pivot.y - 100.0));
        assert!(cannon.angle() < 0.0);
    }

    #[test]
    fn test_click_fires_a_bullet_into_the_scene() {
        let level = CannonLevel::new();
        level.raise();
        let mut scene = Scene::new();
        let spirit = scene.push("cannon1", Box::new(cannon(level)), 6);
        scene.attach(&spirit, Cannon::pointer_map(Vec2::new(800.0, 480.0)));
        scene.pointer(PointerEvent {
            kind: PointerKind::Click,
            pos: Vec2::new(400.0, 100.0),
        });
        // Cannon plus one bullet
        assert_eq!(scene.spirit_count(), 2);
        let drawn = scene.draw_pass();
        assert_eq!(drawn.len(), 2);
        // The bullet sits below the cannon in the draw order
        assert_eq!(drawn[0].z_index(), BULLET_Z);
    }

    #[test]
    fn test_move_event_only_aims() {
        let mut scene = Scene::new();
        let spirit = scene.push("cannon1", Box::new(cannon(CannonLevel::new())), 6);
        scene.attach(&spirit, Cannon::pointer_map(Vec2::new(800.0, 480.0)));
        scene.pointer(PointerEvent {
            kind: PointerKind::Move,
            pos: Vec2::new(700.0, 100.0),
        });
        assert_eq!(scene.spirit_count(), 1);
    }
}
