#![forbid(unsafe_code)]

//! Geometry zoning: derive insertion zones from measured item rectangles.
//!
//! # Layout classification
//!
//! Each enabled item is classified against its neighbours (previous/next in
//! index order):
//!
//! | Layout | Condition | Zones |
//! |--------|-----------|-------|
//! | [`ItemLayout::Stacked`] | width > `full_width_ratio` x collection width | vertical asc + desc |
//! | [`ItemLayout::RowEnd`] | next is on another row, previous is not | horizontal asc (edge + overshoot) + desc |
//! | [`ItemLayout::InRow`] | neither neighbour is on another row | horizontal asc + desc |
//! | [`ItemLayout::RowStartTail`] | previous on another row, no next | horizontal asc only |
//! | [`ItemLayout::RowStart`] | previous on another row, next is not | horizontal asc + desc (edge - overshoot) |
//! | [`ItemLayout::Isolated`] | both neighbours on other rows | none |
//!
//! "On another row" means vertically disjoint: one rectangle sits entirely
//! above or below the other.
//!
//! # Invariants
//! 1. Output has exactly one [`ItemZones`] per input rectangle, in order.
//! 2. The computation is a pure function of its inputs; running it twice on
//!    the same rectangles yields identical zones.
//! 3. In a stacked column the ascending zone of item `i` and the descending
//!    zone of item `i + 1` meet at the midpoint of the gap between them.

use reorder_core::geometry::Rect;
use serde::{Deserialize, Serialize};

use crate::zone::{ItemZones, Orientation, Zone};

/// Extra reach past the first/last item so a drop beyond the ends still
/// resolves.
pub const DEFAULT_OVERSHOOT: f64 = 10.0;

/// Items wider than this fraction of their collection are treated as a
/// vertical stack.
pub const DEFAULT_FULL_WIDTH_RATIO: f64 = 0.8;

/// Tunables for zone construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoningParams {
    pub overshoot: f64,
    pub full_width_ratio: f64,
}

impl Default for ZoningParams {
    fn default() -> Self {
        Self {
            overshoot: DEFAULT_OVERSHOOT,
            full_width_ratio: DEFAULT_FULL_WIDTH_RATIO,
        }
    }
}

/// How an item sits relative to its neighbours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemLayout {
    Stacked,
    RowEnd,
    InRow,
    RowStartTail,
    RowStart,
    Isolated,
}

/// Classify the item at `index` within `rects`, or `None` when `index` is
/// out of range.
#[must_use]
pub fn classify(
    collection_width: f64,
    rects: &[Rect],
    index: usize,
    params: &ZoningParams,
) -> Option<ItemLayout> {
    let node = rects.get(index)?;
    let prev = index.checked_sub(1).and_then(|i| rects.get(i));
    let next = rects.get(index + 1);

    if collection_width * params.full_width_ratio < node.width {
        return Some(ItemLayout::Stacked);
    }

    let prev_other_row = prev.is_some_and(|prev| node.vertically_disjoint(prev));
    let next_other_row = next.is_some_and(|next| node.vertically_disjoint(next));

    Some(match (prev_other_row, next_other_row) {
        (false, true) => ItemLayout::RowEnd,
        (false, false) => ItemLayout::InRow,
        (true, _) if next.is_none() => ItemLayout::RowStartTail,
        (true, false) => ItemLayout::RowStart,
        (true, true) => ItemLayout::Isolated,
    })
}

/// Compute zones for every rectangle, in order.
///
/// `rects` must already be in document space (scroll-adjusted) and in the
/// index order of the enabled items.
#[must_use]
pub fn compute_zones(collection_width: f64, rects: &[Rect], params: &ZoningParams) -> Vec<ItemZones> {
    (0..rects.len())
        .map(|index| {
            let node = &rects[index];
            let prev = index.checked_sub(1).and_then(|i| rects.get(i));
            let next = rects.get(index + 1);

            let layout = classify(collection_width, rects, index, params)
                .unwrap_or(ItemLayout::Isolated);
            match layout {
                ItemLayout::Stacked => ItemZones {
                    ascending: Some(ascending_vertical(node, next, params)),
                    descending: Some(descending_vertical(node, prev, params)),
                },
                ItemLayout::RowEnd => ItemZones {
                    ascending: Some(ascending_horizontal(node, next, true, params)),
                    descending: Some(descending_horizontal(node, prev, params)),
                },
                ItemLayout::InRow => ItemZones {
                    ascending: Some(ascending_horizontal(node, next, false, params)),
                    descending: Some(descending_horizontal(node, prev, params)),
                },
                ItemLayout::RowStartTail => ItemZones {
                    ascending: Some(ascending_horizontal(node, None, false, params)),
                    descending: None,
                },
                ItemLayout::RowStart => ItemZones {
                    ascending: Some(ascending_horizontal(node, next, false, params)),
                    descending: Some(descending_horizontal(node, None, params)),
                },
                ItemLayout::Isolated => ItemZones::NONE,
            }
        })
        .collect()
}

fn ascending_vertical(node: &Rect, next: Option<&Rect>, params: &ZoningParams) -> Zone {
    let center = node.center_y();
    let far = match next {
        Some(next) => node.bottom() + (node.bottom() - next.top()).abs() / 2.0,
        None => center + node.height / 2.0 + params.overshoot,
    };
    Zone::new([node.left(), node.right()], [center, far], Orientation::Vertical)
}

fn descending_vertical(node: &Rect, prev: Option<&Rect>, params: &ZoningParams) -> Zone {
    let center = node.center_y();
    let near = match prev {
        Some(prev) => prev.bottom() + (prev.bottom() - node.top()).abs() / 2.0,
        None => center - node.height / 2.0 - params.overshoot,
    };
    Zone::new([node.left(), node.right()], [near, center], Orientation::Vertical)
}

fn ascending_horizontal(
    node: &Rect,
    next: Option<&Rect>,
    last_in_row: bool,
    params: &ZoningParams,
) -> Zone {
    let center = node.center_x();
    let far = match next {
        None => center + node.width,
        Some(_) if last_in_row => node.right() + params.overshoot,
        Some(next) => center + (center - next.center_x()).abs() / 2.0,
    };
    Zone::new([center, far], [node.top(), node.bottom()], Orientation::Horizontal)
}

fn descending_horizontal(node: &Rect, prev: Option<&Rect>, params: &ZoningParams) -> Zone {
    let center = node.center_x();
    let near = match prev {
        Some(prev) => prev.right() + (prev.right() - node.left()).abs() / 2.0,
        None => node.left() - params.overshoot,
    };
    Zone::new([near, center], [node.top(), node.bottom()], Orientation::Horizontal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::Direction;

    fn column(count: usize, height: f64, gap: f64) -> Vec<Rect> {
        (0..count)
            .map(|i| Rect::new(0.0, i as f64 * (height + gap), 200.0, height))
            .collect()
    }

    #[test]
    fn column_items_are_stacked() {
        let rects = column(3, 40.0, 10.0);
        let params = ZoningParams::default();
        for index in 0..3 {
            assert_eq!(classify(200.0, &rects, index, &params), Some(ItemLayout::Stacked));
        }
    }

    #[test]
    fn stacked_zones_meet_at_gap_midpoint() {
        let rects = column(3, 40.0, 10.0);
        let zones = compute_zones(200.0, &rects, &ZoningParams::default());

        let first_asc = zones[0].ascending.unwrap();
        let second_desc = zones[1].descending.unwrap();
        assert_eq!(first_asc.y_min, 20.0);
        assert_eq!(first_asc.y_max, 45.0);
        assert_eq!(second_desc.y_min, 45.0);
        assert_eq!(second_desc.y_max, 70.0);
        assert_eq!(first_asc.x_min, 0.0);
        assert_eq!(first_asc.x_max, 200.0);
    }

    #[test]
    fn stacked_ends_overshoot() {
        let rects = column(2, 40.0, 10.0);
        let zones = compute_zones(200.0, &rects, &ZoningParams::default());

        let top = zones[0].descending.unwrap();
        assert_eq!(top.y_min, -10.0);
        assert_eq!(top.y_max, 20.0);

        let bottom = zones[1].ascending.unwrap();
        assert_eq!(bottom.y_min, 70.0);
        assert_eq!(bottom.y_max, 100.0);
    }

    #[test]
    fn single_row_is_horizontal() {
        let rects: Vec<Rect> = (0..3)
            .map(|i| Rect::new(i as f64 * 60.0, 0.0, 50.0, 30.0))
            .collect();
        let params = ZoningParams::default();
        let zones = compute_zones(400.0, &rects, &params);

        assert_eq!(classify(400.0, &rects, 1, &params), Some(ItemLayout::InRow));
        let middle = zones[1];
        let asc = middle.ascending.unwrap();
        let desc = middle.descending.unwrap();
        assert_eq!(asc.orientation, Orientation::Horizontal);
        // center 85, next center 145 -> 85 + 30
        assert_eq!(asc.x_min, 85.0);
        assert_eq!(asc.x_max, 115.0);
        // prev right 50, own left 60 -> 55
        assert_eq!(desc.x_min, 55.0);
        assert_eq!(desc.x_max, 85.0);
        assert_eq!(desc.y_min, 0.0);
        assert_eq!(desc.y_max, 30.0);

        let first_desc = zones[0].descending.unwrap();
        assert_eq!(first_desc.x_min, -10.0);
        let last_asc = zones[2].ascending.unwrap();
        assert_eq!(last_asc.x_max, 145.0 + 50.0);
    }

    #[test]
    fn grid_rows_classify_row_end_and_start() {
        // Two rows of two: [0,1] on top, [2,3] below.
        let rects = vec![
            Rect::new(0.0, 0.0, 50.0, 30.0),
            Rect::new(60.0, 0.0, 50.0, 30.0),
            Rect::new(0.0, 40.0, 50.0, 30.0),
            Rect::new(60.0, 40.0, 50.0, 30.0),
        ];
        let params = ZoningParams::default();
        assert_eq!(classify(120.0, &rects, 0, &params), Some(ItemLayout::InRow));
        assert_eq!(classify(120.0, &rects, 1, &params), Some(ItemLayout::RowEnd));
        assert_eq!(classify(120.0, &rects, 2, &params), Some(ItemLayout::RowStart));
        assert_eq!(classify(120.0, &rects, 3, &params), Some(ItemLayout::InRow));

        let zones = compute_zones(120.0, &rects, &params);
        let row_end = zones[1].ascending.unwrap();
        assert_eq!(row_end.x_max, 110.0 + DEFAULT_OVERSHOOT);
        let row_start = zones[2].descending.unwrap();
        assert_eq!(row_start.x_min, -DEFAULT_OVERSHOOT);
    }

    #[test]
    fn row_start_tail_has_only_ascending() {
        let rects = vec![
            Rect::new(0.0, 0.0, 50.0, 30.0),
            Rect::new(60.0, 0.0, 50.0, 30.0),
            Rect::new(0.0, 40.0, 50.0, 30.0),
        ];
        let params = ZoningParams::default();
        assert_eq!(classify(120.0, &rects, 2, &params), Some(ItemLayout::RowStartTail));
        let zones = compute_zones(120.0, &rects, &params);
        assert!(zones[2].ascending.is_some());
        assert!(zones[2].get(Direction::Descending).is_none());
    }

    #[test]
    fn isolated_item_has_no_zones() {
        let rects = vec![
            Rect::new(0.0, 0.0, 50.0, 30.0),
            Rect::new(0.0, 40.0, 50.0, 30.0),
            Rect::new(0.0, 80.0, 50.0, 30.0),
        ];
        let params = ZoningParams::default();
        assert_eq!(classify(200.0, &rects, 1, &params), Some(ItemLayout::Isolated));
        assert!(compute_zones(200.0, &rects, &params)[1].is_empty());
    }

    #[test]
    fn recomputation_is_idempotent() {
        let rects = column(5, 32.0, 4.0);
        let params = ZoningParams::default();
        assert_eq!(
            compute_zones(200.0, &rects, &params),
            compute_zones(200.0, &rects, &params)
        );
    }

    #[test]
    fn empty_input_yields_no_zones() {
        assert!(compute_zones(100.0, &[], &ZoningParams::default()).is_empty());
    }

    #[test]
    fn classify_out_of_range_is_none() {
        let rects = column(2, 32.0, 4.0);
        let params = ZoningParams::default();
        assert_eq!(classify(200.0, &rects, 2, &params), None);
        assert_eq!(classify(200.0, &[], 0, &params), None);
    }
}
