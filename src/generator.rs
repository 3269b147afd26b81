/// Fish generator: keeps the school populated
///
/// Owned by the stage, which calls `top_up` from its tick until the school
/// holds the configured quota. Spawning is deterministic under a fixed seed
/// (Pcg32), which is what the tests lean on.
///
/// # Spawn placement
///
/// A fish enters from the left or the right edge. The entry edge is picked by
/// a random x, a random y picks the height, and the swim angle is drawn from
/// the quadrant-based inward ranges (a fish entering on the right swims
/// somewhere leftward, and so on). Finally the spawn point is mirrored about
/// the innermost collision corner so the whole fish starts just off-stage and
/// swims in; one pixel of inward bias keeps that corner on the stage so the
/// spawn is not culled by its own first bounds check.
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::config::EntityTables;
use crate::fish::{Fish, FISH_Z};
use crate::geometry::{Bounds, OrientedRect, Vec2};
use crate::hud::Score;
use crate::scene::{SpawnRequest, TickContext};
use crate::school::School;

const COIN_BOX_X_OFFSET: f32 = 100.0;
const COIN_BOX_Y_OFFSET: f32 = 50.0;

pub struct FishGenerator {
    school: School,
    tables: Rc<EntityTables>,
    score: Score,
    bounds: Bounds,
    quota: usize,
    rng: Pcg32,
    coin_box: Vec2,
}

impl FishGenerator {
    pub fn new(
        school: School,
        tables: Rc<EntityTables>,
        score: Score,
        bounds: Bounds,
        quota: usize,
        seed: u64,
    ) -> Self {
        FishGenerator {
            school,
            tables,
            score,
            bounds,
            quota,
            rng: Pcg32::seed_from_u64(seed),
            coin_box: Vec2::new(
                bounds.cx + COIN_BOX_X_OFFSET,
                bounds.fy - COIN_BOX_Y_OFFSET,
            ),
        }
    }

    /// Spawns until the school is back at quota.
    pub fn top_up(&mut self, ctx: &mut TickContext<'_>) {
        while self.school.population() < self.quota {
            self.spawn(ctx);
        }
    }

    fn spawn(&mut self, ctx: &mut TickContext<'_>) {
        let level = self.rng.random_range(1..=self.tables.fish_levels());
        let rough_x = self.rng.random_range(self.bounds.cx..self.bounds.fx);
        let y = self.rng.random_range(self.bounds.cy..self.bounds.fy);
        let at_left = rough_x < self.bounds.fx / 2.0;
        let mut x = if at_left { self.bounds.cx } else { self.bounds.fx };

        // Direction from the stage center to the spawn point, then a random
        // angle pointing back across the stage.
        let heading = (y - self.bounds.fy / 2.0)
            .atan2(x - self.bounds.fx / 2.0)
            .to_degrees();
        let angle_deg: f32 = if (-45.0..45.0).contains(&heading) {
            // Entering on the right: swim left
            self.rng.random_range(135.0..225.0)
        } else if (45.0..135.0).contains(&heading) {
            // Entering at the bottom: swim up
            self.rng.random_range(-135.0..-45.0)
        } else if heading >= 135.0 || heading < -135.0 {
            // Entering on the left: swim right
            self.rng.random_range(-45.0..45.0)
        } else {
            // Entering at the top: swim down
            self.rng.random_range(45.0..135.0)
        };
        let angle = angle_deg.to_radians();

        // Mirror the spawn about the innermost corner so the fish starts just
        // outside the edge it enters from.
        let spec = self.tables.fish(level);
        let half = Vec2::new(spec.cut.w as f32 / 2.0, spec.cut.h as f32 / 2.0);
        let corners = OrientedRect::new(Vec2::new(x, y), half, angle).corners();
        let mut innermost = corners[0];
        for corner in &corners[1..] {
            let further_in = if at_left {
                corner.x > innermost.x
            } else {
                corner.x < innermost.x
            };
            if further_in {
                innermost = *corner;
            }
        }
        x += x - innermost.x + if at_left { 1.0 } else { -1.0 };

        let fish = Fish::new(
            Vec2::new(x, y),
            angle,
            level,
            self.bounds,
            &self.school,
            &self.tables,
            &self.score,
            self.coin_box,
        );
        let id = fish.membership_id();
        let school = self.school.clone();
        log::debug!("spawned level {level} fish {id} at ({x:.0}, {y:.0})");
        ctx.spawn(
            SpawnRequest::new(&format!("fish{level}"), Box::new(fish), FISH_Z)
                .on_death(move || school.leave(id)),
        );
    }
}
