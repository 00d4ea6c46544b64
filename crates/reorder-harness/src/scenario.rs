#![forbid(unsafe_code)]

//! Scripted drags against a [`Board`].
//!
//! A [`Scenario`] owns an engine, a board and a [`HookRecorder`], and keeps
//! them in step: adding a collection registers it with the engine, renders
//! it on the board, and attaches recording hooks. Pointer helpers take
//! document-space points.

use reorder_core::event::PointerEventKind;
use reorder_core::geometry::Point;
use reorder_core::id::{CollectionId, ItemId};
use reorder_insertion::commit::CommitOutcome;
use reorder_insertion::config::{AcceptContext, CollectionHooks, CollectionOptions, InsertionConfig};
use reorder_insertion::engine::InsertionEngine;
use reorder_insertion::registry::RegistryError;
use reorder_insertion::session::SessionError;
use reorder_insertion::transition::Transition;

use crate::board::{Board, BoardLayout, item_id};
use crate::recorder::HookRecorder;

/// Engine, host and notification log driven together.
pub struct Scenario<V> {
    pub engine: InsertionEngine<V>,
    pub board: Board<V>,
    pub recorder: HookRecorder<V>,
}

impl<V: Clone + PartialEq + 'static> Default for Scenario<V> {
    fn default() -> Self {
        Self::with_engine(InsertionEngine::default())
    }
}

impl<V: Clone + PartialEq + 'static> Scenario<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from a custom engine configuration.
    pub fn with_config(config: InsertionConfig) -> Result<Self, reorder_insertion::ConfigError> {
        Ok(Self::with_engine(InsertionEngine::new(config)?))
    }

    fn with_engine(engine: InsertionEngine<V>) -> Self {
        Self {
            engine,
            board: Board::new(),
            recorder: HookRecorder::new(),
        }
    }

    /// Render and register a collection with recording hooks.
    pub fn add(
        &mut self,
        id: CollectionId,
        origin: Point,
        width: f64,
        layout: BoardLayout,
        values: Vec<V>,
        options: CollectionOptions,
    ) -> Result<(), RegistryError> {
        let hooks = self.recorder.hooks(id);
        self.add_with_hooks(id, origin, width, layout, values, options, hooks)
    }

    /// Like [`Scenario::add`] with a custom acceptance predicate.
    #[allow(clippy::too_many_arguments)]
    pub fn add_accepting(
        &mut self,
        id: CollectionId,
        origin: Point,
        width: f64,
        layout: BoardLayout,
        values: Vec<V>,
        options: CollectionOptions,
        accepts: impl Fn(&AcceptContext<'_, V>) -> bool + 'static,
    ) -> Result<(), RegistryError> {
        let hooks = self.recorder.hooks_accepting(id, accepts);
        self.add_with_hooks(id, origin, width, layout, values, options, hooks)
    }

    #[allow(clippy::too_many_arguments)]
    fn add_with_hooks(
        &mut self,
        id: CollectionId,
        origin: Point,
        width: f64,
        layout: BoardLayout,
        values: Vec<V>,
        options: CollectionOptions,
        hooks: CollectionHooks<V>,
    ) -> Result<(), RegistryError> {
        self.board.add_collection(id, origin, width, layout, values);
        self.engine.register_collection(id, options, hooks)?;
        self.engine.remap_finished(&mut self.board, id)
    }

    /// Let the host tick: run queued re-zoning.
    pub fn tick(&mut self) -> usize {
        self.engine.run_scheduled(&self.board)
    }

    /// Re-render every collection and refresh the engine's records.
    pub fn rerender_all(&mut self) -> Result<(), RegistryError> {
        let ids: Vec<_> = self.engine.registry().ids().collect();
        for id in ids {
            self.engine.remap_finished(&mut self.board, id)?;
        }
        Ok(())
    }

    /// Start dragging the item at `position` of `collection` from its centre,
    /// then tick so the origin is zoned.
    pub fn start(&mut self, collection: CollectionId, position: usize) -> Result<(), SessionError> {
        self.start_many(collection, &[position])
    }

    /// Start dragging several items of one collection; the first is primary.
    pub fn start_many(
        &mut self,
        collection: CollectionId,
        positions: &[usize],
    ) -> Result<(), SessionError> {
        let items: Vec<ItemId> = positions
            .iter()
            .map(|&position| item_id(collection, position))
            .collect();
        let from = positions
            .first()
            .and_then(|&position| self.board.item_center(collection, position))
            .unwrap_or(Point::ORIGIN);
        let client = self.board.to_client(from);
        self.engine
            .start_drag_items(&mut self.board, &items, client)?;
        self.tick();
        Ok(())
    }

    /// A drag-over on `collection` at a document-space point.
    pub fn drag_over(&mut self, collection: CollectionId, point: Point) -> Transition {
        let event = self.board.drag_over(collection, point);
        self.engine.handle_pointer(&mut self.board, event)
    }

    /// A hit-tested pointer-over at a document-space point.
    pub fn pointer_over(&mut self, point: Point) -> Transition {
        let event = self.board.pointer(PointerEventKind::PointerOver, point);
        self.engine.handle_pointer(&mut self.board, event)
    }

    /// A hit-tested document-level move at a document-space point.
    pub fn move_to(&mut self, point: Point) -> Transition {
        let event = self.board.pointer(PointerEventKind::PointerMove, point);
        self.engine.handle_pointer(&mut self.board, event)
    }

    pub fn drop(&mut self) -> CommitOutcome {
        self.engine.drop(&mut self.board)
    }

    pub fn cancel(&mut self) -> bool {
        self.engine.cancel_drag(&mut self.board)
    }

    /// Current values of `collection` on the board.
    #[must_use]
    pub fn values(&self, collection: CollectionId) -> Vec<V> {
        self.board.values_of(collection)
    }

    /// Document-space point inside the ascending zone of the item at
    /// `position`: just past its centre on the primary axis.
    #[must_use]
    pub fn after(&self, collection: CollectionId, position: usize) -> Option<Point> {
        self.nudge(collection, position, 1.0)
    }

    /// Document-space point inside the descending zone of the item at
    /// `position`: just before its centre on the primary axis.
    #[must_use]
    pub fn before(&self, collection: CollectionId, position: usize) -> Option<Point> {
        self.nudge(collection, position, -1.0)
    }

    fn nudge(&self, collection: CollectionId, position: usize, sign: f64) -> Option<Point> {
        let board = self.board.collection(collection)?;
        let center = self.board.item_center(collection, position)?;
        let offset = sign * 5.0;
        Some(match board.layout {
            BoardLayout::Column { .. } => Point::new(center.x, center.y + offset),
            BoardLayout::Row { .. } | BoardLayout::Grid { .. } => {
                Point::new(center.x + offset, center.y)
            }
        })
    }
}
