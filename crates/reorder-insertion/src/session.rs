#![forbid(unsafe_code)]

//! Drag session and hover resolution state.
//!
//! A [`DragSession`] exists only between drag start and drop/cancel. The
//! engine holds it as `Option<DragSession<V>>`; handlers that find `None`
//! do nothing.
//!
//! [`HoverState`] is the engine-scoped resolution state. Its variants make
//! "resolved item zone" and "hovered empty collection" mutually exclusive by
//! construction.

use std::fmt;

use reorder_core::geometry::Point;
use reorder_core::id::{CollectionId, ItemId};

use crate::resolver::Resolution;

/// One dragged item, captured at drag start.
#[derive(Debug, Clone, PartialEq)]
pub struct DraggedItem<V> {
    pub id: ItemId,
    /// Index among the enabled items of the initial collection.
    pub index: usize,
    pub value: V,
}

/// State shared by all handlers during one drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession<V> {
    dragged: Vec<DraggedItem<V>>,
    initial: CollectionId,
    last: CollectionId,
    pointer: Point,
    original_index: usize,
    dynamic_values: Vec<V>,
    synthetic: bool,
}

impl<V> DragSession<V> {
    /// Start a session for `dragged` items of `initial`.
    ///
    /// The first dragged item is the primary one; its index becomes the
    /// session's original index.
    pub fn new(
        initial: CollectionId,
        dragged: Vec<DraggedItem<V>>,
        pointer: Point,
    ) -> Result<Self, SessionError> {
        let Some(primary) = dragged.first() else {
            return Err(SessionError::NothingDragged { collection: initial });
        };
        let original_index = primary.index;
        Ok(Self {
            dragged,
            initial,
            last: initial,
            pointer,
            original_index,
            dynamic_values: Vec::new(),
            synthetic: false,
        })
    }

    /// Values to insert on transfer instead of the dragged values.
    #[must_use]
    pub fn with_dynamic_values(mut self, values: Vec<V>) -> Self {
        self.dynamic_values = values;
        self
    }

    /// Mark the session as driven by emulated (non-native) drag input.
    #[must_use]
    pub fn synthetic(mut self, synthetic: bool) -> Self {
        self.synthetic = synthetic;
        self
    }

    pub fn dragged(&self) -> &[DraggedItem<V>] {
        &self.dragged
    }

    /// The item the drag was started on.
    pub fn primary(&self) -> &DraggedItem<V> {
        &self.dragged[0]
    }

    /// Whether `item` is one of the dragged items.
    pub fn is_dragged(&self, item: ItemId) -> bool {
        self.dragged.iter().any(|dragged| dragged.id == item)
    }

    pub const fn initial(&self) -> CollectionId {
        self.initial
    }

    /// Collection hovered most recently with an accepted transition.
    pub const fn last(&self) -> CollectionId {
        self.last
    }

    pub(crate) fn set_last(&mut self, collection: CollectionId) {
        self.last = collection;
    }

    /// True once the hovered collection differs from the initial one.
    pub fn transferred(&self) -> bool {
        self.initial != self.last
    }

    /// Latest pointer position in document coordinates.
    pub const fn pointer(&self) -> Point {
        self.pointer
    }

    pub(crate) fn set_pointer(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    pub const fn original_index(&self) -> usize {
        self.original_index
    }

    pub fn dynamic_values(&self) -> &[V] {
        &self.dynamic_values
    }

    pub const fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

impl<V: Clone> DragSession<V> {
    /// Values of the dragged items, in drag order.
    pub fn dragged_values(&self) -> Vec<V> {
        self.dragged.iter().map(|item| item.value.clone()).collect()
    }

    /// Values inserted into a target collection on transfer.
    pub fn insert_values(&self) -> Vec<V> {
        if self.dynamic_values.is_empty() {
            self.dragged_values()
        } else {
            self.dynamic_values.clone()
        }
    }
}

/// What the pointer currently resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum HoverState {
    #[default]
    None,
    /// An item zone was resolved; the indicator is shown there.
    Item(Resolution),
    /// An empty collection accepted as a drop target.
    EmptyCollection(CollectionId),
}

impl HoverState {
    #[must_use]
    pub const fn resolution(&self) -> Option<&Resolution> {
        match self {
            Self::Item(resolution) => Some(resolution),
            _ => None,
        }
    }

    #[must_use]
    pub const fn empty_target(&self) -> Option<CollectionId> {
        match self {
            Self::EmptyCollection(collection) => Some(*collection),
            _ => None,
        }
    }

    /// Items currently highlighted by the resolution.
    #[must_use]
    pub fn highlighted(&self) -> Vec<ItemId> {
        self.resolution()
            .map(|resolution| vec![resolution.item])
            .unwrap_or_default()
    }
}

/// Session construction errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No item ids were given, so there is no collection to start in.
    NoItems,
    NothingDragged { collection: CollectionId },
    UnknownItem { item: ItemId },
    MixedCollections { expected: CollectionId, found: CollectionId },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoItems => f.write_str("drag started without items"),
            Self::NothingDragged { collection } => {
                write!(f, "drag in {collection} has no dragged items")
            }
            Self::UnknownItem { item } => write!(f, "{item} is not an enabled item"),
            Self::MixedCollections { expected, found } => write!(
                f,
                "dragged items must share one collection (expected {expected}, found {found})"
            ),
        }
    }
}

impl std::error::Error for SessionError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zone::{Direction, Orientation, Zone};

    fn dragged(raw: u64, index: usize, value: &'static str) -> DraggedItem<&'static str> {
        DraggedItem {
            id: ItemId::new(raw).unwrap(),
            index,
            value,
        }
    }

    #[test]
    fn empty_drag_is_rejected() {
        let err = DragSession::<u8>::new(CollectionId::MIN, Vec::new(), Point::ORIGIN).unwrap_err();
        assert_eq!(
            err,
            SessionError::NothingDragged {
                collection: CollectionId::MIN
            }
        );
    }

    #[test]
    fn session_starts_in_initial_collection() {
        let session = DragSession::new(
            CollectionId::MIN,
            vec![dragged(5, 2, "c"), dragged(6, 3, "d")],
            Point::new(1.0, 2.0),
        )
        .unwrap();
        assert_eq!(session.last(), session.initial());
        assert!(!session.transferred());
        assert_eq!(session.original_index(), 2);
        assert_eq!(session.primary().value, "c");
        assert_eq!(session.dragged_values(), vec!["c", "d"]);
        assert!(session.is_dragged(ItemId::new(6).unwrap()));
    }

    #[test]
    fn dynamic_values_replace_inserted_values() {
        let session = DragSession::new(CollectionId::MIN, vec![dragged(1, 0, "a")], Point::ORIGIN)
            .unwrap()
            .with_dynamic_values(vec!["a-copy"]);
        assert_eq!(session.insert_values(), vec!["a-copy"]);
        assert_eq!(session.dragged_values(), vec!["a"]);
    }

    #[test]
    fn transferred_tracks_last_collection() {
        let mut session =
            DragSession::new(CollectionId::MIN, vec![dragged(1, 0, "a")], Point::ORIGIN).unwrap();
        let other = CollectionId::new(2).unwrap();
        session.set_last(other);
        assert!(session.transferred());
        session.set_last(CollectionId::MIN);
        assert!(!session.transferred());
    }

    #[test]
    fn hover_state_is_exclusive() {
        let resolution = Resolution {
            collection: CollectionId::MIN,
            item: ItemId::MIN,
            index: 0,
            direction: Direction::Ascending,
            zone: Zone::new([0.0, 1.0], [0.0, 1.0], Orientation::Vertical),
        };
        let hover = HoverState::Item(resolution);
        assert_eq!(hover.highlighted(), vec![ItemId::MIN]);
        assert_eq!(hover.empty_target(), None);

        let hover = HoverState::EmptyCollection(CollectionId::MIN);
        assert!(hover.resolution().is_none());
        assert!(hover.highlighted().is_empty());
    }
}
