//! Axis-aligned rectangle collision
//!
//! The only physics in the game: boxes either overlap with positive area or
//! they don't. Touching edges do not count.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box (top-left corner + size, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    /// Box with its top-left corner at `pos`
    #[inline]
    pub fn at(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Box centered on `center`
    #[inline]
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self::new(center.x - size.x / 2.0, center.y - size.y / 2.0, size.x, size.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }
}

/// True iff the two boxes intersect with positive area
#[inline]
pub fn overlaps(a: Rect, b: Rect) -> bool {
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_overlap_basic() {
        let a = Rect::new(0.0, 0.0, 8.0, 8.0);
        let b = Rect::new(4.0, 4.0, 8.0, 8.0);
        assert!(overlaps(a, b));
        assert!(overlaps(b, a));
    }

    #[test]
    fn test_disjoint() {
        let a = Rect::new(0.0, 0.0, 8.0, 8.0);
        let b = Rect::new(20.0, 0.0, 8.0, 8.0);
        assert!(!overlaps(a, b));
    }

    #[test]
    fn test_contained() {
        let outer = Rect::new(0.0, 0.0, 16.0, 16.0);
        let inner = Rect::new(7.0, 7.0, 2.0, 2.0);
        assert!(overlaps(outer, inner));
        assert!(overlaps(inner, outer));
    }

    #[test]
    fn test_touching_edges_do_not_overlap() {
        let a = Rect::new(10.0, 10.0, 8.0, 8.0);
        assert!(!overlaps(a, Rect::new(18.0, 10.0, 8.0, 8.0)));
        assert!(!overlaps(a, Rect::new(10.0, 18.0, 8.0, 8.0)));
        // Corner contact only
        assert!(!overlaps(a, Rect::new(18.0, 18.0, 8.0, 8.0)));
    }

    #[test]
    fn test_centered() {
        let r = Rect::centered(Vec2::new(5.0, 5.0), Vec2::new(2.0, 2.0));
        assert_eq!(r, Rect::new(4.0, 4.0, 2.0, 2.0));
        assert_eq!(r.center(), Vec2::new(5.0, 5.0));
    }

    proptest! {
        #[test]
        fn prop_shift_by_own_extent_never_overlaps(
            x in -500.0f32..500.0,
            y in -500.0f32..500.0,
            w in 0.5f32..64.0,
            h in 0.5f32..64.0,
        ) {
            let a = Rect::new(x, y, w, h);
            let right = Rect::new(a.right(), y, w, h);
            let below = Rect::new(x, a.bottom(), w, h);
            prop_assert!(!overlaps(a, right));
            prop_assert!(!overlaps(a, below));
        }

        #[test]
        fn prop_overlap_is_symmetric(
            ax in -100.0f32..100.0, ay in -100.0f32..100.0,
            bx in -100.0f32..100.0, by in -100.0f32..100.0,
            w in 0.5f32..32.0, h in 0.5f32..32.0,
        ) {
            let a = Rect::new(ax, ay, w, h);
            let b = Rect::new(bx, by, h, w);
            prop_assert_eq!(overlaps(a, b), overlaps(b, a));
        }

        #[test]
        fn prop_box_overlaps_itself(
            x in -100.0f32..100.0, y in -100.0f32..100.0,
            w in 0.5f32..32.0, h in 0.5f32..32.0,
        ) {
            let a = Rect::new(x, y, w, h);
            prop_assert!(overlaps(a, a));
        }
    }
}
