#![forbid(unsafe_code)]

//! Zone resolution: map a pointer position to `(item, direction)`.
//!
//! Items are scanned in index order; for each item the ascending zone is
//! tested before the descending zone. The first zone that strictly contains
//! the pointer wins, so overlapping zones resolve deterministically in favour
//! of the lower index.

use reorder_core::geometry::Point;
use reorder_core::id::{CollectionId, ItemId};
use serde::{Deserialize, Serialize};

use crate::registry::ItemRecord;
use crate::zone::{Direction, Zone};

/// The zone chosen for the current pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub collection: CollectionId,
    pub item: ItemId,
    /// Index of `item` among the enabled items when resolved.
    pub index: usize,
    pub direction: Direction,
    pub zone: Zone,
}

const SCAN_ORDER: [Direction; 2] = [Direction::Ascending, Direction::Descending];

/// Find the first zone among `items` containing `pointer`.
///
/// `pointer` must be in the same (document) space the zones were computed in.
pub fn resolve<'a, V: 'a>(
    collection: CollectionId,
    pointer: Point,
    items: impl IntoIterator<Item = &'a ItemRecord<V>>,
) -> Option<Resolution> {
    items.into_iter().find_map(|item| {
        SCAN_ORDER.iter().find_map(|&direction| {
            let zone = item.zones.get(direction)?;
            zone.contains(pointer).then_some(Resolution {
                collection,
                item: item.id,
                index: item.index,
                direction,
                zone: *zone,
            })
        })
    })
}
