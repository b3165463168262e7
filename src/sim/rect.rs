//! Axis-aligned hitbox geometry
//!
//! Screen coordinates: x grows to the right, y grows downward, so the
//! ground line is the largest y a resting body reaches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle anchored at its top-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.min.x + self.size.x
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.min.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    /// Shrink (positive margin) or grow (negative) by `margin` on every side.
    ///
    /// The size never goes below zero; the center stays put.
    pub fn shrink(&self, margin: f32) -> Self {
        let size = (self.size - Vec2::splat(2.0 * margin)).max(Vec2::ZERO);
        Self {
            min: self.center() - size * 0.5,
            size,
        }
    }

    /// True when either side has collapsed to zero
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size.x <= 0.0 || self.size.y <= 0.0
    }

    /// Strict overlap test: touching edges and empty rects do not count
    #[inline]
    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.left() < other.right()
            && self.right() > other.left()
            && self.top() < other.bottom()
            && self.bottom() > other.top()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shrink_keeps_center() {
        let rect = Rect::new(100.0, 470.0, 80.0, 80.0);
        let shrunk = rect.shrink(6.0);
        assert_eq!(shrunk, Rect::new(106.0, 476.0, 68.0, 68.0));
        assert_eq!(shrunk.center(), rect.center());
    }

    #[test]
    fn test_shrink_clamps_to_zero() {
        let shrunk = Rect::new(0.0, 0.0, 10.0, 4.0).shrink(3.0);
        assert_eq!(shrunk.size, Vec2::new(4.0, 0.0));
        assert_eq!(shrunk.center(), Vec2::new(5.0, 2.0));
    }

    #[test]
    fn test_intersects_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&b));
        assert!(b.intersects(&a));
    }

    #[test]
    fn test_touching_edges_do_not_intersect() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let right = Rect::new(10.0, 0.0, 10.0, 10.0);
        let below = Rect::new(0.0, 10.0, 10.0, 10.0);
        assert!(!a.intersects(&right));
        assert!(!a.intersects(&below));
    }

    #[test]
    fn test_empty_rect_never_intersects() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let empty = Rect::new(5.0, 5.0, 0.0, 0.0);
        assert!(!a.intersects(&empty));
    }
}
