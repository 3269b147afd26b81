/// Collision detection for the fishhunt simulation
///
/// This module provides shape types and the Separating-Axis-Theorem test used
/// for bullet/fish hit detection. Unlike a grid game, both bullets and fish are
/// rotated to face their travel direction, so axis-aligned checks are not
/// enough: the narrow phase works on oriented rectangles.
///
/// # Architecture
///
/// - `CollisionShape`: tagged union over `OrientedRect` and `Circle` with one
///   symmetric `intersects` predicate dispatching on the pair of tags
/// - `rects_intersect`: exact SAT over the four local axes of both rectangles
/// - `Collider`: an entity-facing wrapper pairing a shape with a debug color
///   for the collision-box overlay (the color never influences logic)
///
/// # Comparison policy
///
/// All comparisons are strict `<`/`>` with no epsilon: rectangles that merely
/// touch along an edge do not collide. That is a deliberate design choice and
/// tests depend on it.
use crate::geometry::{Aabb, OrientedRect, Vec2};
use sdl2::pixels::Color;
use sdl2::rect::Point;
use sdl2::render::Canvas;
use sdl2::video::Window;

/// Circle shape. Used for round hit regions; the radius must be non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
}

impl Circle {
    pub fn new(center: Vec2, radius: f32) -> Self {
        debug_assert!(radius >= 0.0, "negative radius: {radius}");
        Circle { center, radius }
    }
}

/// Tagged union of the shapes the engine can intersect.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CollisionShape {
    Rect(OrientedRect),
    Circle(Circle),
}

impl CollisionShape {
    /// Symmetric intersection predicate: `a.intersects(&b) == b.intersects(&a)`
    /// for every pairing of tags.
    pub fn intersects(&self, other: &CollisionShape) -> bool {
        match (self, other) {
            (CollisionShape::Rect(a), CollisionShape::Rect(b)) => rects_intersect(a, b),
            (CollisionShape::Rect(r), CollisionShape::Circle(c))
            | (CollisionShape::Circle(c), CollisionShape::Rect(r)) => rect_circle_intersect(r, c),
            (CollisionShape::Circle(a), CollisionShape::Circle(b)) => {
                (a.center - b.center).length() < a.radius + b.radius
            }
        }
    }

    /// Axis-aligned envelope, used as the quadtree insertion key.
    pub fn bounds(&self) -> Aabb {
        match self {
            CollisionShape::Rect(r) => r.bounds(),
            CollisionShape::Circle(c) => Aabb::new(
                c.center.x - c.radius,
                c.center.y - c.radius,
                2.0 * c.radius,
                2.0 * c.radius,
            ),
        }
    }
}

/// Exact oriented-rectangle overlap via the Separating Axis Theorem.
///
/// # Algorithm
///
/// Two convex polygons are disjoint iff there is an axis on which their
/// projections do not overlap; for rectangles it suffices to test each
/// rectangle's two local axes. For every axis of rectangle `on`, the four
/// corners of the *other* rectangle are projected to signed distances from
/// `on`'s center; the projected interval `[min, max]` must strictly overlap
/// `on`'s own extent `(-half, +half)` along that axis.
///
/// Both directions are required: testing only one rectangle's axes misses
/// separations for unequal sizes/orientations, which is a classic SAT bug.
/// The pair collides only when all four axis tests pass.
pub fn rects_intersect(a: &OrientedRect, b: &OrientedRect) -> bool {
    overlaps_on_axes_of(a, b) && overlaps_on_axes_of(b, a)
}

/// Projects `rect`'s corners onto both axes of `on` and checks strict interval
/// overlap against `on`'s half-extents. One half of the full SAT test.
fn overlaps_on_axes_of(rect: &OrientedRect, on: &OrientedRect) -> bool {
    let corners = rect.corners();
    let axes = on.axes();
    for (i, axis) in axes.iter().enumerate() {
        let half = if i == 0 { on.half.x } else { on.half.y };
        let mut min = f32::INFINITY;
        let mut max = f32::NEG_INFINITY;
        for corner in &corners {
            let signed = (*corner - on.center).dot(*axis);
            min = min.min(signed);
            max = max.max(signed);
        }
        // Strict: an interval that only touches the extent does not overlap.
        if !(min < half && max > -half) {
            return false;
        }
    }
    true
}

/// Rectangle-vs-circle: true when any rectangle corner lies within the circle.
///
/// This is a deliberate approximation, not a full polygon/circle distance test.
/// The rectangles tested against circles here are small and thin, so checking
/// corners is accurate enough and keeps the test branch-free.
pub fn rect_circle_intersect(rect: &OrientedRect, circle: &Circle) -> bool {
    rect.corners()
        .iter()
        .any(|corner| (*corner - circle.center).length() < circle.radius)
}

/// An entity's collision volume plus the color used by the debug overlay.
///
/// The color carries no logical meaning; it exists so the 'B'-key overlay can
/// tell bullet boxes from fish boxes at a glance.
#[derive(Debug, Clone, Copy)]
pub struct Collider {
    pub shape: CollisionShape,
    pub color: Color,
}

impl Collider {
    pub fn rect(rect: OrientedRect) -> Self {
        Collider {
            shape: CollisionShape::Rect(rect),
            color: Color::RGB(255, 0, 0),
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn detect(&self, other: &Collider) -> bool {
        self.shape.intersects(&other.shape)
    }

    /// Draws the shape outline for the collision-box debug toggle.
    pub fn debug_draw(&self, canvas: &mut Canvas<Window>) -> Result<(), String> {
        canvas.set_draw_color(self.color);
        match self.shape {
            CollisionShape::Rect(rect) => {
                let corners = rect.corners();
                for i in 0..4 {
                    let a = corners[i];
                    let b = corners[(i + 1) % 4];
                    canvas.draw_line(
                        Point::new(a.x as i32, a.y as i32),
                        Point::new(b.x as i32, b.y as i32),
                    )?;
                }
            }
            CollisionShape::Circle(_) => {
                let bb = self.shape.bounds();
                canvas.draw_rect(sdl2::rect::Rect::new(
                    bb.x as i32,
                    bb.y as i32,
                    bb.w as u32,
                    bb.h as u32,
                ))?;
            }
        }
        Ok(())
    }
}
