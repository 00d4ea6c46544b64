//! Property-based invariants for rectangle geometry.
//!
//! Coordinates are whole pixels so every comparison is exact.

use proptest::prelude::*;
use reorder_core::geometry::{Point, Rect};

fn rect() -> impl Strategy<Value = Rect> {
    (-500i32..500, -500i32..500, 1i32..300, 1i32..300).prop_map(|(x, y, w, h)| {
        Rect::new(f64::from(x), f64::from(y), f64::from(w), f64::from(h))
    })
}

fn point() -> impl Strategy<Value = Point> {
    (-900i32..900, -900i32..900).prop_map(|(x, y)| Point::new(f64::from(x), f64::from(y)))
}

proptest! {
    #[test]
    fn union_covers_both(a in rect(), b in rect()) {
        let union = a.union(&b);
        for r in [a, b] {
            prop_assert!(union.left() <= r.left());
            prop_assert!(union.top() <= r.top());
            prop_assert!(union.right() >= r.right());
            prop_assert!(union.bottom() >= r.bottom());
        }
        prop_assert_eq!(union, b.union(&a));
    }

    #[test]
    fn translate_moves_containment(r in rect(), p in point(), offset in point()) {
        let moved = r.translate(offset);
        prop_assert_eq!((moved.width, moved.height), (r.width, r.height));
        prop_assert_eq!(r.contains(p), moved.contains(p.offset(offset)));
    }

    #[test]
    fn vertical_disjointness_is_symmetric(a in rect(), b in rect()) {
        prop_assert_eq!(a.vertically_disjoint(&b), b.vertically_disjoint(&a));
        prop_assert!(!a.vertically_disjoint(&a));
    }

    #[test]
    fn center_is_spanned_and_contained(r in rect()) {
        prop_assert!(r.spans_y(r.center_y()));
        prop_assert!(r.contains(Point::new(r.center_x(), r.center_y())));
        prop_assert!(!r.spans_y(r.top()));
        prop_assert!(!r.spans_y(r.bottom()));
    }

    #[test]
    fn contains_is_half_open(r in rect()) {
        prop_assert!(r.contains(Point::new(r.left(), r.top())));
        prop_assert!(!r.contains(Point::new(r.right(), r.top())));
        prop_assert!(!r.contains(Point::new(r.left(), r.bottom())));
    }
}
