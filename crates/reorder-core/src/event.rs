#![forbid(unsafe_code)]

//! Pointer input delivered by a host while a drag is in progress.
//!
//! Hosts translate their native events (DOM `dragover`, `pointermove`,
//! touch emulation, ...) into [`PointerEvent`] values. The host performs the
//! hit test; the engine only sees what was under the pointer.
//!
//! # Invariants
//! 1. `client` is in viewport coordinates. The engine adds the document
//!    scroll offset itself.
//! 2. A pointer over an item is also over the item's collection. Hosts report
//!    [`HitTarget::Item`] with both ids rather than [`HitTarget::Outside`].

use serde::{Deserialize, Serialize};

use crate::geometry::Point;
use crate::id::{CollectionId, ItemId};

/// What was under the pointer when the event fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "hit", rename_all = "snake_case")]
pub enum HitTarget {
    /// A registered collection element.
    Collection { collection: CollectionId },
    /// A registered item element inside `collection`.
    Item {
        collection: CollectionId,
        item: ItemId,
    },
    /// The floating insertion indicator.
    Indicator,
    /// Anything that is not part of a registered collection.
    Outside,
}

impl HitTarget {
    /// The collection the pointer is inside, if any.
    #[must_use]
    pub const fn collection(self) -> Option<CollectionId> {
        match self {
            Self::Collection { collection } | Self::Item { collection, .. } => Some(collection),
            Self::Indicator | Self::Outside => None,
        }
    }

    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Collection { .. } => "collection",
            Self::Item { .. } => "item",
            Self::Indicator => "indicator",
            Self::Outside => "outside",
        }
    }
}

/// Native event family that produced a [`PointerEvent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerEventKind {
    /// Native drag-and-drop `dragover`.
    DragOver,
    /// Pointer (mouse/pen/touch emulation) entering or moving over a target.
    PointerOver,
    /// Document-level pointer move.
    PointerMove,
}

/// One pointer sample with its hit-test result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub kind: PointerEventKind,
    pub target: HitTarget,
    /// Viewport coordinates of the pointer.
    pub client: Point,
}

impl PointerEvent {
    /// Create a new pointer event.
    #[must_use]
    pub const fn new(kind: PointerEventKind, target: HitTarget, client: Point) -> Self {
        Self {
            kind,
            target,
            client,
        }
    }

    /// A `dragover` on a collection.
    #[must_use]
    pub const fn drag_over(collection: CollectionId, client: Point) -> Self {
        Self::new(
            PointerEventKind::DragOver,
            HitTarget::Collection { collection },
            client,
        )
    }

    /// A document-level move over `target`.
    #[must_use]
    pub const fn moved(target: HitTarget, client: Point) -> Self {
        Self::new(PointerEventKind::PointerMove, target, client)
    }
}
