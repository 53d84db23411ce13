//! Integer rectangles and polygon helpers shared by the tilemap and entity collision code.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in whole pixels.
/// `x`/`y` is the top-left corner (Y grows downward, as in the map editor).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> i32 {
        self.x
    }

    pub fn top(&self) -> i32 {
        self.y
    }

    /// Exclusive right edge.
    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.x as f32 + self.width as f32 / 2.0,
            self.y as f32 + self.height as f32 / 2.0,
        )
    }

    /// True when the rectangle covers no area.
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn contains(&self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Overlapping region of two rectangles.
    /// Returns None when they only touch or do not overlap at all.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right > left && bottom > top {
            Some(Rect::new(left, top, right - left, bottom - top))
        } else {
            None
        }
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.intersection(other).is_some()
    }

    /// Corners in clockwise order starting at the top-left.
    pub fn corners(&self) -> [Vec2; 4] {
        let (l, t) = (self.x as f32, self.y as f32);
        let (r, b) = (self.right() as f32, self.bottom() as f32);
        [Vec2::new(l, t), Vec2::new(r, t), Vec2::new(r, b), Vec2::new(l, b)]
    }
}

/// Even-odd point-in-polygon test.
/// Points exactly on a horizontal edge follow the half-open rule, so shared
/// edges between neighbouring polygons are counted once.
pub fn point_in_polygon(point: Vec2, verts: &[Vec2]) -> bool {
    if verts.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = verts.len() - 1;
    for i in 0..verts.len() {
        let vi = verts[i];
        let vj = verts[j];
        if (vi.y < point.y && vj.y >= point.y) || (vj.y < point.y && vi.y >= point.y) {
            let cross_x = vi.x + (point.y - vi.y) / (vj.y - vi.y) * (vj.x - vi.x);
            if cross_x < point.x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// True when any vertex of either polygon lies inside the other.
pub fn polygons_overlap(a: &[Vec2], b: &[Vec2]) -> bool {
    a.iter().any(|&p| point_in_polygon(p, b)) || b.iter().any(|&p| point_in_polygon(p, a))
}

/// Transform local points by rotation (radians) then translation.
pub fn transform_points(points: &[Vec2], rotation: f32, translation: Vec2) -> Vec<Vec2> {
    let rot = Vec2::from_angle(rotation);
    points.iter().map(|&p| rot.rotate(p) + translation).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_overlapping_rects() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(5, 5, 10, 10);
        assert_eq!(a.intersection(&b), Some(Rect::new(5, 5, 5, 5)));
    }

    #[test]
    fn touching_rects_do_not_intersect() {
        let a = Rect::new(0, 0, 10, 10);
        let b = Rect::new(10, 0, 10, 10);
        assert!(a.intersection(&b).is_none());
        assert!(!a.intersects(&b));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(2, 2, 4, 4);
        assert!(r.contains(2, 2));
        assert!(r.contains(5, 5));
        assert!(!r.contains(6, 5));
    }

    #[test]
    fn point_in_square() {
        let square = [
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        assert!(point_in_polygon(Vec2::new(5.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(15.0, 5.0), &square));
        assert!(!point_in_polygon(Vec2::new(5.0, -1.0), &square));
    }

    #[test]
    fn degenerate_polygon_contains_nothing() {
        let line = [Vec2::ZERO, Vec2::new(10.0, 10.0)];
        assert!(!point_in_polygon(Vec2::new(5.0, 5.0), &line));
    }

    #[test]
    fn rotated_squares_overlap() {
        let square = Rect::new(-5, -5, 10, 10).corners();
        let a = transform_points(&square, 0.0, Vec2::new(0.0, 0.0));
        let b = transform_points(&square, std::f32::consts::FRAC_PI_4, Vec2::new(12.0, 0.0));
        // Diamond's left tip reaches x = 12 - 7.07 ≈ 4.93, inside the first square.
        assert!(polygons_overlap(&a, &b));

        let c = transform_points(&square, std::f32::consts::FRAC_PI_4, Vec2::new(20.0, 0.0));
        assert!(!polygons_overlap(&a, &c));
    }
}
