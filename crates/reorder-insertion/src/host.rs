#![forbid(unsafe_code)]

//! Host boundary: measurement, value storage, and presentation.
//!
//! The engine is a pure decision layer. Everything it needs from the
//! surrounding UI flows through these traits:
//!
//! - [`LayoutProbe`]: read-only measurement of rendered collections/items.
//! - [`ValueStore`]: the value sequence behind each collection.
//! - [`Presenter`]: the floating indicator and visual feedback classes.
//! - [`DragLifecycle`]: hand-off to the drag-end lifecycle after a drop.
//!
//! [`InsertionHost`] is implemented for any type providing all four.

use reorder_core::geometry::{Point, Rect};
use reorder_core::id::{CollectionId, ItemId};
use serde::{Deserialize, Serialize};

use crate::config::IndicatorConfig;
use crate::indicator::IndicatorPlacement;
use crate::session::DragSession;

/// One child element of a collection as the host rendered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RenderedNode {
    pub id: ItemId,
    /// Whether the node is currently draggable (enabled).
    pub draggable: bool,
}

impl RenderedNode {
    /// An enabled node.
    #[must_use]
    pub const fn enabled(id: ItemId) -> Self {
        Self {
            id,
            draggable: true,
        }
    }
}

/// Element that receives a feedback class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum ClassTarget {
    Collection(CollectionId),
    Item(ItemId),
}

/// Read-only measurement of what the host rendered.
pub trait LayoutProbe {
    /// Bounding rectangle of a collection in viewport coordinates.
    fn collection_rect(&self, collection: CollectionId) -> Option<Rect>;

    /// Bounding rectangle of an item in viewport coordinates.
    fn item_rect(&self, item: ItemId) -> Option<Rect>;

    /// Child nodes of a collection in render order.
    fn rendered_nodes(&self, collection: CollectionId) -> Vec<RenderedNode>;

    /// Current document scroll offset.
    fn scroll_offset(&self) -> Point {
        Point::ORIGIN
    }
}

/// Value sequences backing each collection.
///
/// `set_values` is expected to re-render the collection. When it renders
/// synchronously, item records attached to notifications reflect the new
/// order.
pub trait ValueStore<V> {
    fn values(&self, collection: CollectionId) -> Option<Vec<V>>;

    fn set_values(&mut self, collection: CollectionId, values: Vec<V>);
}

/// Presentation surface for the indicator and feedback classes.
pub trait Presenter {
    /// Create the indicator element. Called once, before the first placement.
    fn mount_indicator(&mut self, config: &IndicatorConfig);

    fn show_indicator(&mut self, placement: IndicatorPlacement);

    fn hide_indicator(&mut self);

    fn add_class(&mut self, _target: ClassTarget, _class: &str) {}

    fn remove_class(&mut self, _target: ClassTarget, _class: &str) {}
}

/// The drag-end lifecycle that finalizes element state after a drop.
pub trait DragLifecycle<V> {
    fn drag_ended(&mut self, _session: &DragSession<V>) {}
}

/// Everything the engine needs from a host.
pub trait InsertionHost<V>: LayoutProbe + ValueStore<V> + Presenter + DragLifecycle<V> {}

impl<V, T> InsertionHost<V> for T where T: LayoutProbe + ValueStore<V> + Presenter + DragLifecycle<V> {}
