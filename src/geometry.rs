/// 2D geometry primitives for the simulation core
///
/// Everything here is a plain value type: operations return new values and never
/// mutate in place. Angles are radians throughout the simulation; degree
/// conversion happens only at the rendering boundary (SDL's `copy_ex` wants
/// degrees) via the std `to_degrees`/`to_radians` helpers.
use std::ops::{Add, Mul, Neg, Sub};

/// Immutable 2D vector.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Returns the unit vector with this direction, or zero for the zero vector.
    pub fn normalized(self) -> Vec2 {
        let len = self.length();
        if len > 0.0 { self * (1.0 / len) } else { Vec2::ZERO }
    }

    /// Rotates counter-clockwise in a y-up frame; on screen (y-down) the same
    /// positive angle reads as clockwise. All rotation in the game goes through
    /// this one convention.
    pub fn rotated(self, theta: f32) -> Vec2 {
        let (sin, cos) = theta.sin_cos();
        Vec2 {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Vector projection onto a unit axis direction.
    pub fn project_onto(self, axis: Vec2) -> Vec2 {
        axis * self.dot(axis)
    }
}

impl Add for Vec2 {
    type Output = Vec2;
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;
    fn mul(self, rhs: f32) -> Vec2 {
        Vec2::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

/// Axis-aligned bounding box, used by the quadtree and as the broad-phase
/// envelope of rotated shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Aabb {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Aabb { x, y, w, h }
    }
}

/// A rectangle with a center, half-extents and a rotation.
///
/// The derived data — two rotated unit axes and four corner points — is computed
/// on demand rather than cached; the rectangles in this game are rebuilt from an
/// entity's position every tick anyway.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedRect {
    pub center: Vec2,
    pub half: Vec2,
    pub rotation: f32,
}

impl OrientedRect {
    /// Half-extents must be non-negative; a violation is a programming error,
    /// not a runtime condition.
    pub fn new(center: Vec2, half: Vec2, rotation: f32) -> Self {
        debug_assert!(
            half.x >= 0.0 && half.y >= 0.0,
            "negative half-extents: {half:?}"
        );
        OrientedRect {
            center,
            half,
            rotation,
        }
    }

    /// The rectangle's local X and Y axes as unit vectors (rotated basis).
    pub fn axes(&self) -> [Vec2; 2] {
        [
            Vec2::new(1.0, 0.0).rotated(self.rotation),
            Vec2::new(0.0, 1.0).rotated(self.rotation),
        ]
    }

    /// Corner points in a fixed winding order in the rectangle's own frame:
    /// +X+Y, +X-Y, -X-Y, -X+Y.
    pub fn corners(&self) -> [Vec2; 4] {
        let [ax, ay] = self.axes();
        let rx = ax * self.half.x;
        let ry = ay * self.half.y;
        [
            self.center + rx + ry,
            self.center + rx - ry,
            self.center - rx - ry,
            self.center - rx + ry,
        ]
    }

    /// Strict point containment (a point exactly on an edge is outside), in
    /// line with the no-epsilon comparison policy of the collision code.
    pub fn contains(&self, point: Vec2) -> bool {
        let local = (point - self.center).rotated(-self.rotation);
        local.x.abs() < self.half.x && local.y.abs() < self.half.y
    }

    /// Axis-aligned envelope of the four corners.
    pub fn bounds(&self) -> Aabb {
        let corners = self.corners();
        let mut min = corners[0];
        let mut max = corners[0];
        for c in &corners[1..] {
            min.x = min.x.min(c.x);
            min.y = min.y.min(c.y);
            max.x = max.x.max(c.x);
            max.y = max.y.max(c.y);
        }
        Aabb::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }
}

/// The stage play-field. Entities use the inclusive corner check to decide
/// whether they have left the simulation (an expected lifecycle end, signaled
/// through the dead flag).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub cx: f32,
    pub fx: f32,
    pub cy: f32,
    pub fy: f32,
}

impl Bounds {
    pub fn new(cx: f32, fx: f32, cy: f32, fy: f32) -> Self {
        Bounds { cx, fx, cy, fy }
    }

    /// Inclusive containment: edge points count as inside.
    pub fn contains(&self, p: Vec2) -> bool {
        !(p.x < self.cx || p.x > self.fx || p.y < self.cy || p.y > self.fy)
    }

    pub fn width(&self) -> f32 {
        self.fx - self.cx
    }

    pub fn height(&self) -> f32 {
        self.fy - self.cy
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn test_vector_ops_are_pure() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        let _ = a + b;
        let _ = a - b;
        let _ = a * 2.0;
        // Originals untouched
        assert_eq!(a, Vec2::new(1.0, 2.0));
        assert_eq!(b, Vec2::new(3.0, -1.0));
    }

    #[test]
    fn test_rotation_quarter_turn() {
        let r = Vec2::new(1.0, 0.0).rotated(FRAC_PI_2);
        assert!(close(r.x, 0.0));
        assert!(close(r.y, 1.0));
    }

    #[test]
    fn test_normalized_unit_length() {
        let v = Vec2::new(3.0, 4.0).normalized();
        assert!(close(v.length(), 1.0));
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn test_projection_onto_axis() {
        let p = Vec2::new(3.0, 4.0).project_onto(Vec2::new(1.0, 0.0));
        assert_eq!(p, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_corners_winding_order() {
        // Unrotated 20x10 rect at the origin: +X+Y, +X-Y, -X-Y, -X+Y
        let rect = OrientedRect::new(Vec2::ZERO, Vec2::new(10.0, 5.0), 0.0);
        let c = rect.corners();
        assert_eq!(c[0], Vec2::new(10.0, 5.0));
        assert_eq!(c[1], Vec2::new(10.0, -5.0));
        assert_eq!(c[2], Vec2::new(-10.0, -5.0));
        assert_eq!(c[3], Vec2::new(-10.0, 5.0));
    }

    #[test]
    fn test_corners_follow_rotation() {
        let rect = OrientedRect::new(Vec2::ZERO, Vec2::new(10.0, 5.0), PI);
        let c = rect.corners();
        // Half-turn maps +X+Y onto -X-Y
        assert!(close(c[0].x, -10.0));
        assert!(close(c[0].y, -5.0));
    }

    #[test]
    fn test_contains_is_strict_on_edges() {
        let rect = OrientedRect::new(Vec2::ZERO, Vec2::new(10.0, 10.0), 0.0);
        assert!(rect.contains(Vec2::new(9.9, 0.0)));
        assert!(!rect.contains(Vec2::new(10.0, 0.0)));
        assert!(!rect.contains(Vec2::new(0.0, -10.0)));
    }

    #[test]
    fn test_contains_rotated() {
        // 45 degrees: the old corner (10,10) is now well outside, the axis
        // point (13,0) is inside (half-diagonal ~14.14).
        let rect = OrientedRect::new(Vec2::ZERO, Vec2::new(10.0, 10.0), PI / 4.0);
        assert!(!rect.contains(Vec2::new(10.0, 10.0)));
        assert!(rect.contains(Vec2::new(13.0, 0.0)));
    }

    #[test]
    fn test_bounds_envelope_of_rotated_rect() {
        let rect = OrientedRect::new(Vec2::ZERO, Vec2::new(10.0, 10.0), PI / 4.0);
        let bb = rect.bounds();
        let half_diag = (2.0f32).sqrt() * 10.0;
        assert!(close(bb.x, -half_diag));
        assert!(close(bb.w, 2.0 * half_diag));
    }

    #[test]
    fn test_play_field_edges_inclusive() {
        let b = Bounds::new(0.0, 100.0, 0.0, 50.0);
        assert!(b.contains(Vec2::new(0.0, 0.0)));
        assert!(b.contains(Vec2::new(100.0, 50.0)));
        assert!(!b.contains(Vec2::new(100.1, 25.0)));
        assert!(!b.contains(Vec2::new(50.0, -0.1)));
    }
}
