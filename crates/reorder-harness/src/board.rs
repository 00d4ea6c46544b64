#![forbid(unsafe_code)]

//! A simulated host: collections laid out on a virtual page.
//!
//! [`Board`] implements every host trait the engine needs. Collections are
//! placed at a document-space origin and render their values synchronously
//! as a column, a row, or a wrapping grid. Every presenter call is recorded
//! so tests can assert on indicator placements and feedback classes.
//!
//! # Coordinates
//! Layout is computed in document space. Rectangles handed to the engine are
//! in viewport space (document minus scroll), like a browser's
//! `getBoundingClientRect`.
//!
//! # Item ids
//! The item rendered at child position `p` of collection `c` has id
//! `c * 1000 + p + 1`. Ids therefore follow positions, not values, the same
//! way re-rendered elements do.

use std::collections::{BTreeMap, BTreeSet};

use reorder_core::event::{HitTarget, PointerEvent, PointerEventKind};
use reorder_core::geometry::{Point, Rect};
use reorder_core::id::{CollectionId, ItemId};
use reorder_insertion::config::IndicatorConfig;
use reorder_insertion::host::{
    ClassTarget, DragLifecycle, LayoutProbe, Presenter, RenderedNode, ValueStore,
};
use reorder_insertion::indicator::IndicatorPlacement;
use reorder_insertion::session::DragSession;

/// Item ids per collection.
const ID_STRIDE: u64 = 1000;

/// Height reported for a collection with no items.
pub const EMPTY_COLLECTION_HEIGHT: f64 = 40.0;

/// Id of the item rendered at `position` of `collection`.
#[must_use]
pub fn item_id(collection: CollectionId, position: usize) -> ItemId {
    let raw = collection.get() * ID_STRIDE + position as u64 + 1;
    ItemId::new(raw).unwrap_or(ItemId::MIN)
}

/// How a collection arranges its items.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoardLayout {
    /// Full-width items stacked top to bottom.
    Column { item_height: f64, gap: f64 },
    /// Fixed-size items side by side on one line.
    Row {
        item_width: f64,
        item_height: f64,
        gap: f64,
    },
    /// Fixed-size items wrapping after `columns` per row.
    Grid {
        columns: usize,
        item_width: f64,
        item_height: f64,
        gap: f64,
    },
}

impl BoardLayout {
    /// Column of 40px items with a 10px gap.
    pub const COLUMN: Self = Self::Column {
        item_height: 40.0,
        gap: 10.0,
    };

    /// Row of 50x30 items with a 10px gap.
    pub const ROW: Self = Self::Row {
        item_width: 50.0,
        item_height: 30.0,
        gap: 10.0,
    };

    fn item_rect(self, origin: Point, width: f64, position: usize) -> Rect {
        let p = position as f64;
        match self {
            Self::Column { item_height, gap } => {
                Rect::new(origin.x, origin.y + p * (item_height + gap), width, item_height)
            }
            Self::Row {
                item_width,
                item_height,
                gap,
            } => Rect::new(origin.x + p * (item_width + gap), origin.y, item_width, item_height),
            Self::Grid {
                columns,
                item_width,
                item_height,
                gap,
            } => {
                let columns = columns.max(1);
                let col = (position % columns) as f64;
                let row = (position / columns) as f64;
                Rect::new(
                    origin.x + col * (item_width + gap),
                    origin.y + row * (item_height + gap),
                    item_width,
                    item_height,
                )
            }
        }
    }
}

/// One collection on the board.
#[derive(Debug, Clone)]
pub struct BoardCollection<V> {
    pub origin: Point,
    pub width: f64,
    pub layout: BoardLayout,
    pub values: Vec<V>,
    /// Child positions rendered as not draggable.
    pub disabled: BTreeSet<usize>,
}

impl<V> BoardCollection<V> {
    fn bounds(&self) -> Rect {
        if self.values.is_empty() {
            return Rect::new(self.origin.x, self.origin.y, self.width, EMPTY_COLLECTION_HEIGHT);
        }
        let mut bounds = Rect::new(self.origin.x, self.origin.y, self.width, 0.0);
        for position in 0..self.values.len() {
            bounds = bounds.union(&self.layout.item_rect(self.origin, self.width, position));
        }
        bounds
    }
}

/// A recorded presenter or lifecycle call.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardCall {
    Mount(IndicatorConfig),
    Show(IndicatorPlacement),
    Hide,
    AddClass(ClassTarget, String),
    RemoveClass(ClassTarget, String),
    SetValues(CollectionId),
    DragEnded { dragged: Vec<ItemId> },
}

/// Simulated host.
#[derive(Debug, Clone)]
pub struct Board<V> {
    collections: BTreeMap<CollectionId, BoardCollection<V>>,
    scroll: Point,
    indicator: Option<IndicatorPlacement>,
    mounted: Option<IndicatorConfig>,
    classes: BTreeSet<(ClassTarget, String)>,
    calls: Vec<BoardCall>,
}

impl<V> Default for Board<V> {
    fn default() -> Self {
        Self {
            collections: BTreeMap::new(),
            scroll: Point::ORIGIN,
            indicator: None,
            mounted: None,
            classes: BTreeSet::new(),
            calls: Vec::new(),
        }
    }
}

impl<V> Board<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a collection on the board.
    pub fn add_collection(
        &mut self,
        id: CollectionId,
        origin: Point,
        width: f64,
        layout: BoardLayout,
        values: Vec<V>,
    ) {
        self.collections
            .entry(id)
            .and_modify(|existing| {
                existing.origin = origin;
                existing.width = width;
                existing.layout = layout;
            })
            .or_insert_with(|| BoardCollection {
                origin,
                width,
                layout,
                values: Vec::new(),
                disabled: BTreeSet::new(),
            })
            .values = values;
    }

    /// Render the item at `position` as not draggable.
    pub fn disable(&mut self, collection: CollectionId, position: usize) -> bool {
        self.collections
            .get_mut(&collection)
            .is_some_and(|board| board.disabled.insert(position))
    }

    /// Move a collection to a new document-space origin.
    pub fn move_collection(&mut self, collection: CollectionId, origin: Point) -> bool {
        let Some(board) = self.collections.get_mut(&collection) else {
            return false;
        };
        board.origin = origin;
        true
    }

    pub fn set_scroll(&mut self, scroll: Point) {
        self.scroll = scroll;
    }

    #[must_use]
    pub fn collection(&self, id: CollectionId) -> Option<&BoardCollection<V>> {
        self.collections.get(&id)
    }

    fn locate(&self, item: ItemId) -> Option<(&BoardCollection<V>, usize)> {
        let raw = item.get().checked_sub(1)?;
        let collection = CollectionId::new(raw / ID_STRIDE).ok()?;
        let position = usize::try_from(raw % ID_STRIDE).ok()?;
        let board = self.collections.get(&collection)?;
        (position < board.values.len()).then_some((board, position))
    }

    /// Document-space rectangle of the item at `position`.
    #[must_use]
    pub fn item_document_rect(&self, collection: CollectionId, position: usize) -> Option<Rect> {
        let board = self.collections.get(&collection)?;
        (position < board.values.len())
            .then(|| board.layout.item_rect(board.origin, board.width, position))
    }

    /// Document-space rectangle of a collection.
    #[must_use]
    pub fn collection_document_rect(&self, collection: CollectionId) -> Option<Rect> {
        self.collections.get(&collection).map(BoardCollection::bounds)
    }

    /// Document-space centre of the item at `position`.
    #[must_use]
    pub fn item_center(&self, collection: CollectionId, position: usize) -> Option<Point> {
        self.item_document_rect(collection, position)
            .map(|rect| Point::new(rect.center_x(), rect.center_y()))
    }

    /// Hit-test a document-space point. Items win over collections; among
    /// overlapping collections the smallest one wins.
    #[must_use]
    pub fn hit(&self, point: Point) -> HitTarget {
        if self
            .indicator
            .is_some_and(|indicator| indicator.rect.contains(point))
        {
            return HitTarget::Indicator;
        }

        let mut best: Option<(CollectionId, f64)> = None;
        for (&id, board) in &self.collections {
            for position in 0..board.values.len() {
                if board
                    .layout
                    .item_rect(board.origin, board.width, position)
                    .contains(point)
                {
                    return HitTarget::Item {
                        collection: id,
                        item: item_id(id, position),
                    };
                }
            }
            let bounds = board.bounds();
            let area = bounds.width * bounds.height;
            if bounds.contains(point) && best.is_none_or(|(_, smallest)| area < smallest) {
                best = Some((id, area));
            }
        }
        best.map_or(HitTarget::Outside, |(collection, _)| HitTarget::Collection {
            collection,
        })
    }

    /// A pointer event at a document-space point, hit-tested on the board.
    #[must_use]
    pub fn pointer(&self, kind: PointerEventKind, point: Point) -> PointerEvent {
        PointerEvent::new(kind, self.hit(point), self.to_client(point))
    }

    /// A drag-over event on `collection` at a document-space point, without
    /// hit testing.
    #[must_use]
    pub fn drag_over(&self, collection: CollectionId, point: Point) -> PointerEvent {
        PointerEvent::drag_over(collection, self.to_client(point))
    }

    /// Convert document space to viewport space.
    #[must_use]
    pub fn to_client(&self, point: Point) -> Point {
        Point::new(point.x - self.scroll.x, point.y - self.scroll.y)
    }

    fn to_viewport(&self, rect: Rect) -> Rect {
        rect.translate(Point::new(-self.scroll.x, -self.scroll.y))
    }

    /// Current indicator placement while shown.
    #[must_use]
    pub const fn indicator(&self) -> Option<IndicatorPlacement> {
        self.indicator
    }

    /// Config the indicator was mounted with.
    #[must_use]
    pub const fn mounted(&self) -> Option<&IndicatorConfig> {
        self.mounted.as_ref()
    }

    #[must_use]
    pub fn has_class(&self, target: ClassTarget, class: &str) -> bool {
        self.classes.contains(&(target, class.to_owned()))
    }

    /// Every recorded call, oldest first.
    #[must_use]
    pub fn calls(&self) -> &[BoardCall] {
        &self.calls
    }

    /// Number of `set_values` calls so far.
    #[must_use]
    pub fn writes(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BoardCall::SetValues(_)))
            .count()
    }

    /// Number of completed drag-end hand-offs.
    #[must_use]
    pub fn drags_ended(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, BoardCall::DragEnded { .. }))
            .count()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl<V: Clone> Board<V> {
    /// Current values of a collection.
    #[must_use]
    pub fn values_of(&self, collection: CollectionId) -> Vec<V> {
        self.collections
            .get(&collection)
            .map(|board| board.values.clone())
            .unwrap_or_default()
    }
}

impl<V> LayoutProbe for Board<V> {
    fn collection_rect(&self, collection: CollectionId) -> Option<Rect> {
        self.collection_document_rect(collection)
            .map(|rect| self.to_viewport(rect))
    }

    fn item_rect(&self, item: ItemId) -> Option<Rect> {
        let (board, position) = self.locate(item)?;
        let rect = board.layout.item_rect(board.origin, board.width, position);
        Some(self.to_viewport(rect))
    }

    fn rendered_nodes(&self, collection: CollectionId) -> Vec<RenderedNode> {
        let Some(board) = self.collections.get(&collection) else {
            return Vec::new();
        };
        (0..board.values.len())
            .map(|position| RenderedNode {
                id: item_id(collection, position),
                draggable: !board.disabled.contains(&position),
            })
            .collect()
    }

    fn scroll_offset(&self) -> Point {
        self.scroll
    }
}

impl<V: Clone> ValueStore<V> for Board<V> {
    fn values(&self, collection: CollectionId) -> Option<Vec<V>> {
        self.collections
            .get(&collection)
            .map(|board| board.values.clone())
    }

    fn set_values(&mut self, collection: CollectionId, values: Vec<V>) {
        let Some(board) = self.collections.get_mut(&collection) else {
            tracing::warn!(target: "reorder.harness", collection = %collection, "write to unknown collection");
            return;
        };
        tracing::trace!(
            target: "reorder.harness",
            collection = %collection,
            len = values.len(),
            "values written"
        );
        board.values = values;
        self.calls.push(BoardCall::SetValues(collection));
    }
}

impl<V> Presenter for Board<V> {
    fn mount_indicator(&mut self, config: &IndicatorConfig) {
        self.mounted = Some(config.clone());
        self.calls.push(BoardCall::Mount(config.clone()));
    }

    fn show_indicator(&mut self, placement: IndicatorPlacement) {
        self.indicator = Some(placement);
        self.calls.push(BoardCall::Show(placement));
    }

    fn hide_indicator(&mut self) {
        self.indicator = None;
        self.calls.push(BoardCall::Hide);
    }

    fn add_class(&mut self, target: ClassTarget, class: &str) {
        self.classes.insert((target, class.to_owned()));
        self.calls.push(BoardCall::AddClass(target, class.to_owned()));
    }

    fn remove_class(&mut self, target: ClassTarget, class: &str) {
        self.classes.remove(&(target, class.to_owned()));
        self.calls.push(BoardCall::RemoveClass(target, class.to_owned()));
    }
}

impl<V> DragLifecycle<V> for Board<V> {
    fn drag_ended(&mut self, session: &DragSession<V>) {
        self.calls.push(BoardCall::DragEnded {
            dragged: session.dragged().iter().map(|item| item.id).collect(),
        });
    }
}
