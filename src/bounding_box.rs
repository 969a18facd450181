//! Axis-aligned bounding boxes (top-left origin, y grows down).

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Create a new copy of `that`.
    pub fn copy(that: &BoundingBox) -> Self {
        *that
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn w(&self) -> f64 {
        self.w
    }

    pub fn h(&self) -> f64 {
        self.h
    }

    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    pub fn set_x(&mut self, x: f64) -> &mut Self {
        self.x = x;
        self
    }

    pub fn set_y(&mut self, y: f64) -> &mut Self {
        self.y = y;
        self
    }

    pub fn set_w(&mut self, w: f64) -> &mut Self {
        self.w = w;
        self
    }

    pub fn set_h(&mut self, h: f64) -> &mut Self {
        self.h = h;
        self
    }

    /// Translate in place.
    pub fn move_by(&mut self, dx: f64, dy: f64) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self
    }

    /// Grow this box into the smallest box that also covers `other`.
    /// A box already contained in `self` leaves it unchanged.
    pub fn merge_with(&mut self, other: &BoundingBox) -> &mut Self {
        let new_x = self.x.min(other.x);
        let new_y = self.y.min(other.y);
        let new_w = self.right().max(other.right()) - new_x;
        let new_h = self.bottom().max(other.bottom()) - new_y;

        self.x = new_x;
        self.y = new_y;
        self.w = new_w;
        self.h = new_h;
        self
    }

    /// Non-mutating merge.
    pub fn merged(a: &BoundingBox, b: &BoundingBox) -> BoundingBox {
        let mut out = *a;
        out.merge_with(b);
        out
    }

    pub fn contains_point(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: &BoundingBox, b: &BoundingBox) -> bool {
        (a.x - b.x).abs() < 1e-9
            && (a.y - b.y).abs() < 1e-9
            && (a.w - b.w).abs() < 1e-9
            && (a.h - b.h).abs() < 1e-9
    }

    #[test]
    fn merge_overlapping_boxes() {
        let mut a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 10.0, 10.0);
        a.merge_with(&b);
        assert_eq!(a, BoundingBox::new(0.0, 0.0, 15.0, 15.0));
    }

    #[test]
    fn merge_is_result_commutative() {
        let pairs = [
            (BoundingBox::new(0.0, 0.0, 10.0, 10.0), BoundingBox::new(5.0, 5.0, 10.0, 10.0)),
            (BoundingBox::new(-3.0, 7.5, 2.0, 1.0), BoundingBox::new(4.0, -2.0, 0.5, 20.0)),
            (BoundingBox::new(1.0, 1.0, 0.0, 0.0), BoundingBox::new(1.0, 1.0, 3.0, 3.0)),
        ];
        for (a, b) in pairs {
            let ab = BoundingBox::merged(&a, &b);
            let ba = BoundingBox::merged(&b, &a);
            assert!(approx(&ab, &ba), "merge({a:?}, {b:?}) = {ab:?} but reversed = {ba:?}");
        }
    }

    #[test]
    fn merge_with_contained_box_keeps_outer() {
        let outer = BoundingBox::new(0.1, 0.2, 30.3, 40.4);
        let inner = BoundingBox::new(5.0, 6.0, 1.0, 2.0);
        let mut merged = outer;
        merged.merge_with(&inner);
        assert!(approx(&merged, &outer), "outer box changed: {merged:?}");

        let mut merged = inner;
        merged.merge_with(&outer);
        assert!(approx(&merged, &outer), "inner-first merge should equal outer: {merged:?}");
    }

    #[test]
    fn move_and_copy_are_independent() {
        let original = BoundingBox::new(1.0, 2.0, 3.0, 4.0);
        let mut moved = BoundingBox::copy(&original);
        moved.move_by(10.0, -2.0);
        assert_eq!(moved, BoundingBox::new(11.0, 0.0, 3.0, 4.0));
        assert_eq!(original, BoundingBox::new(1.0, 2.0, 3.0, 4.0));
        assert!(moved.contains_point(12.0, 1.0));
    }
}
