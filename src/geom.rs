// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use std::fmt;

use float_cmp::ApproxEqUlps;

/// Approximate zero equality comparisons.
pub trait FuzzyZero: FuzzyEq {
    /// Returns `true` if the number is approximately zero.
    fn is_fuzzy_zero(&self) -> bool;
}

/// Approximate equality comparisons.
pub trait FuzzyEq<Rhs: ?Sized = Self> {
    /// Returns `true` if values are approximately equal.
    fn fuzzy_eq(&self, other: &Rhs) -> bool;

    /// Returns `true` if values are not approximately equal.
    #[inline]
    fn fuzzy_ne(&self, other: &Rhs) -> bool {
        !self.fuzzy_eq(other)
    }
}

impl FuzzyEq for f64 {
    #[inline]
    fn fuzzy_eq(&self, other: &f64) -> bool {
        self.approx_eq_ulps(other, 4)
    }
}

impl FuzzyZero for f64 {
    #[inline]
    fn is_fuzzy_zero(&self) -> bool {
        self.fuzzy_eq(&0.0)
    }
}


/// Bounds `f64` number.
#[inline]
pub(crate) fn f64_bound(min: f64, val: f64, max: f64) -> f64 {
    debug_assert!(min.is_finite());
    debug_assert!(val.is_finite());
    debug_assert!(max.is_finite());

    if val > max {
        max
    } else if val < min {
        min
    } else {
        val
    }
}


/// A size representation.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Creates a new `Size` from values.
    #[inline]
    pub fn new(width: f64, height: f64) -> Self {
        Size { width, height }
    }
}


/// A rect representation.
///
/// Unlike most rect types, a zero-sized rect is valid and means "empty".
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    /// Creates a new `Rect` from values.
    #[inline]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    /// Creates a new `Rect` from edges.
    #[inline]
    pub fn from_ltrb(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Returns rect's left edge position.
    #[inline]
    pub fn left(&self) -> f64 {
        self.x
    }

    /// Returns rect's right edge position.
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Returns rect's top edge position.
    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    /// Returns rect's bottom edge position.
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Checks that the rect has a zero or a negative size.
    #[inline]
    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Returns the smallest rect that contains both rects.
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_ltrb(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Returns an intersection of two rects.
    ///
    /// Non-overlapping rects produce a zero-sized rect.
    pub fn intersect(&self, other: &Rect) -> Rect {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right()).max(left);
        let bottom = self.bottom().min(other.bottom()).max(top);
        Rect::from_ltrb(left, top, right, bottom)
    }

    /// Returns a rect moved by the specified offset.
    #[inline]
    pub fn translate(&self, dx: f64, dy: f64) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub(crate) fn to_kurbo(&self) -> kurbo::Rect {
        kurbo::Rect::new(self.left(), self.top(), self.right(), self.bottom())
    }
}

impl From<kurbo::Rect> for Rect {
    #[inline]
    fn from(r: kurbo::Rect) -> Self {
        Rect::from_ltrb(r.x0, r.y0, r.x1, r.y1)
    }
}

impl From<(f64, f64, f64, f64)> for Rect {
    #[inline]
    fn from(v: (f64, f64, f64, f64)) -> Self {
        Rect::new(v.0, v.1, v.2, v.3)
    }
}

impl FuzzyEq for Rect {
    fn fuzzy_eq(&self, other: &Self) -> bool {
           self.x.fuzzy_eq(&other.x)
        && self.y.fuzzy_eq(&other.y)
        && self.width.fuzzy_eq(&other.width)
        && self.height.fuzzy_eq(&other.height)
    }
}

impl fmt::Debug for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Rect({} {} {} {})", self.x, self.y, self.width, self.height)
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}


#[rustfmt::skip]
#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_union {
        ($name:ident, $r1:expr, $r2:expr, $result:expr) => {
            #[test]
            fn $name() {
                let r1 = Rect::from($r1);
                let r2 = Rect::from($r2);
                assert!(r1.union(&r2).fuzzy_eq(&Rect::from($result)));
            }
        };
    }

    test_union!(union_1, (0.0, 0.0, 10.0, 10.0), (5.0, 5.0, 10.0, 10.0), (0.0, 0.0, 15.0, 15.0));
    test_union!(union_2, (-5.0, 0.0, 1.0, 1.0), (0.0, -5.0, 1.0, 1.0), (-5.0, -5.0, 6.0, 6.0));
    test_union!(union_3, (0.0, 0.0, 10.0, 10.0), (2.0, 2.0, 2.0, 2.0), (0.0, 0.0, 10.0, 10.0));

    macro_rules! test_intersect {
        ($name:ident, $r1:expr, $r2:expr, $result:expr) => {
            #[test]
            fn $name() {
                let r1 = Rect::from($r1);
                let r2 = Rect::from($r2);
                assert!(r1.intersect(&r2).fuzzy_eq(&Rect::from($result)));
            }
        };
    }

    test_intersect!(intersect_1, (0.0, 0.0, 10.0, 10.0), (5.0, 5.0, 10.0, 10.0), (5.0, 5.0, 5.0, 5.0));
    test_intersect!(intersect_2, (-10.0, -10.0, 120.0, 120.0), (0.0, 0.0, 50.0, 50.0), (0.0, 0.0, 50.0, 50.0));
    test_intersect!(intersect_disjoint, (0.0, 0.0, 1.0, 1.0), (5.0, 5.0, 1.0, 1.0), (5.0, 5.0, 0.0, 0.0));

    #[test]
    fn empty_rect() {
        assert!(Rect::new(0.0, 0.0, 0.0, 10.0).is_empty());
        assert!(!Rect::new(0.0, 0.0, 1.0, 10.0).is_empty());
    }
}
