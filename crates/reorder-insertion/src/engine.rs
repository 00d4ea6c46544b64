#![forbid(unsafe_code)]

//! The insertion engine.
//!
//! [`InsertionEngine`] owns every piece of drag state: the collection
//! registry, the optional [`DragSession`], the hover resolution, the
//! indicator, and the re-zoning queue. Hosts drive it with three kinds of
//! calls:
//!
//! - lifecycle: [`register_collection`](InsertionEngine::register_collection),
//!   [`remap_finished`](InsertionEngine::remap_finished),
//!   [`start_drag`](InsertionEngine::start_drag),
//!   [`cancel_drag`](InsertionEngine::cancel_drag);
//! - input: `handle_pointer` and `drop`;
//! - layout: [`layout_changed`](InsertionEngine::layout_changed),
//!   [`document_scrolled`](InsertionEngine::document_scrolled),
//!   [`viewport_resized`](InsertionEngine::viewport_resized), followed by
//!   [`run_scheduled`](InsertionEngine::run_scheduled) on the host's next
//!   tick.
//!
//! Execution is single-threaded: each call runs to completion and no call
//! observes a half-applied state.

use reorder_core::geometry::{Point, Rect};
use reorder_core::id::{CollectionId, ItemId};

use crate::config::{CollectionHooks, CollectionOptions, ConfigError, InsertionConfig};
use crate::host::{InsertionHost, LayoutProbe};
use crate::indicator::InsertionIndicator;
use crate::registry::{CollectionRecord, Registry, RegistryError};
use crate::scheduler::{RezoneReason, RezoneScheduler, RezoneTicket};
use crate::session::{DragSession, DraggedItem, HoverState, SessionError};
use crate::zone::ItemZones;
use crate::zoning::{ZoningParams, compute_zones};

/// Drag-to-reorder engine for values of type `V`.
pub struct InsertionEngine<V> {
    pub(crate) params: ZoningParams,
    pub(crate) registry: Registry<V>,
    pub(crate) session: Option<DragSession<V>>,
    pub(crate) hover: HoverState,
    pub(crate) indicator: InsertionIndicator,
    pub(crate) scheduler: RezoneScheduler,
    /// Pending zoning for the collection a drag started in.
    pub(crate) drag_ticket: Option<RezoneTicket>,
    pub(crate) sequence: u64,
}

impl<V> Default for InsertionEngine<V> {
    fn default() -> Self {
        Self::with_config(InsertionConfig::default())
    }
}

impl<V> InsertionEngine<V> {
    /// Create an engine from a validated configuration.
    pub fn new(config: InsertionConfig) -> Result<Self, ConfigError> {
        let errors = config.validate();
        if !errors.is_empty() {
            return Err(ConfigError::Validation(errors));
        }
        Ok(Self::with_config(config))
    }

    fn with_config(config: InsertionConfig) -> Self {
        Self {
            params: config.zoning_params(),
            registry: Registry::new(),
            session: None,
            hover: HoverState::None,
            indicator: InsertionIndicator::new(config.indicator),
            scheduler: RezoneScheduler::new(),
            drag_ticket: None,
            sequence: 0,
        }
    }

    pub const fn zoning_params(&self) -> &ZoningParams {
        &self.params
    }

    pub const fn registry(&self) -> &Registry<V> {
        &self.registry
    }

    /// The active drag, if any.
    pub const fn session(&self) -> Option<&DragSession<V>> {
        self.session.as_ref()
    }

    pub const fn hover(&self) -> &HoverState {
        &self.hover
    }

    pub const fn indicator(&self) -> &InsertionIndicator {
        &self.indicator
    }

    pub const fn scheduler(&self) -> &RezoneScheduler {
        &self.scheduler
    }

    /// Register a collection and queue its first zoning.
    pub fn register_collection(
        &mut self,
        id: CollectionId,
        options: CollectionOptions,
        hooks: CollectionHooks<V>,
    ) -> Result<RezoneTicket, RegistryError> {
        self.registry.register(id, options, hooks)?;
        tracing::debug!(target: "reorder.registry", collection = %id, "collection registered");
        Ok(self.scheduler.schedule(id, RezoneReason::Invalidated))
    }

    /// Forget a collection. Hover state pointing into it is dropped.
    pub fn unregister_collection(&mut self, id: CollectionId) -> Option<CollectionRecord<V>> {
        let record = self.registry.unregister(id)?;
        self.scheduler.cancel_collection(id);
        let stale = match self.hover {
            HoverState::Item(resolution) => resolution.collection == id,
            HoverState::EmptyCollection(collection) => collection == id,
            HoverState::None => false,
        };
        if stale {
            self.hover = HoverState::None;
        }
        tracing::debug!(target: "reorder.registry", collection = %id, "collection unregistered");
        Some(record)
    }

    /// Record that `collection` is rendered inside `item`.
    pub fn set_owner_item(
        &mut self,
        collection: CollectionId,
        item: Option<ItemId>,
    ) -> Result<(), RegistryError> {
        self.registry.set_owner_item(collection, item)
    }

    /// Queue re-zoning after a collection's size changed.
    pub fn layout_changed(&mut self, collection: CollectionId) -> Option<RezoneTicket> {
        self.registry
            .contains(collection)
            .then(|| self.scheduler.schedule(collection, RezoneReason::Resized))
    }

    /// Queue re-zoning after a collection was mutated outside a commit.
    pub fn invalidate(&mut self, collection: CollectionId) -> Option<RezoneTicket> {
        self.registry
            .contains(collection)
            .then(|| self.scheduler.schedule(collection, RezoneReason::Invalidated))
    }

    /// Queue re-zoning of every collection after the document scrolled.
    pub fn document_scrolled(&mut self) -> Vec<RezoneTicket> {
        self.schedule_all(RezoneReason::Scrolled)
    }

    /// Queue re-zoning of every collection after the viewport resized.
    pub fn viewport_resized(&mut self) -> Vec<RezoneTicket> {
        self.schedule_all(RezoneReason::ViewportResized)
    }

    fn schedule_all(&mut self, reason: RezoneReason) -> Vec<RezoneTicket> {
        let ids: Vec<_> = self.registry.ids().collect();
        ids.into_iter()
            .map(|id| self.scheduler.schedule(id, reason))
            .collect()
    }

    /// Recompute the zones of every enabled item of `collection`.
    ///
    /// Rectangles are shifted into document space by the host's scroll
    /// offset. Items the host cannot measure get no zones and are skipped
    /// as neighbours. Returns the number of items that received zones.
    pub fn recompute(
        &mut self,
        probe: &impl LayoutProbe,
        collection: CollectionId,
    ) -> Result<usize, RegistryError> {
        let params = self.params;
        let record = self
            .registry
            .get_mut(collection)
            .ok_or(RegistryError::UnknownCollection { id: collection })?;

        record.clear_zones();
        let Some(bounds) = probe.collection_rect(collection) else {
            tracing::debug!(
                target: "reorder.zoning",
                collection = %collection,
                "collection not measurable; zones cleared"
            );
            return Ok(0);
        };

        let scroll = probe.scroll_offset();
        let measured: Vec<(usize, Rect)> = record
            .items
            .iter()
            .enumerate()
            .filter_map(|(slot, item)| {
                probe
                    .item_rect(item.id)
                    .map(|rect| (slot, rect.translate(scroll)))
            })
            .collect();
        let rects: Vec<Rect> = measured.iter().map(|(_, rect)| *rect).collect();
        let zones = compute_zones(bounds.width, &rects, &params);

        let mut zoned = 0;
        for ((slot, _), zones) in measured.iter().zip(zones) {
            if !zones.is_empty() {
                zoned += 1;
            }
            record.items[*slot].zones = zones;
        }

        tracing::debug!(
            target: "reorder.zoning",
            collection = %collection,
            items = record.items.len(),
            zoned,
            "zones computed"
        );
        Ok(zoned)
    }

    /// Drain queued re-zoning tasks. Call on the host's next tick.
    pub fn run_scheduled(&mut self, probe: &impl LayoutProbe) -> usize {
        let due = self.scheduler.take_due();
        let mut ran = 0;
        for task in due {
            if self.drag_ticket == Some(task.ticket) {
                self.drag_ticket = None;
            }
            match self.recompute(probe, task.collection) {
                Ok(_) => ran += 1,
                Err(err) => tracing::debug!(
                    target: "reorder.scheduler",
                    ticket = %task.ticket,
                    error = %err,
                    "skipped rezone"
                ),
            }
        }
        ran
    }

    /// Abandon the active drag without committing.
    pub fn cancel_drag<H: InsertionHost<V>>(&mut self, host: &mut H) -> bool
    where
        V: Clone,
    {
        if self.session.is_none() {
            return false;
        }
        if let Some(ticket) = self.drag_ticket.take() {
            self.scheduler.cancel(ticket);
        }
        self.indicator.hide(host);
        self.clear_empty_target(host);
        self.hover = HoverState::None;
        self.session = None;
        tracing::debug!(target: "reorder.transition", "drag cancelled");
        true
    }
}

impl<V: Clone> InsertionEngine<V> {
    /// Refresh item records after the host re-rendered `collection`, then
    /// recompute its zones immediately.
    pub fn remap_finished<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        collection: CollectionId,
    ) -> Result<(), RegistryError> {
        let nodes = host.rendered_nodes(collection);
        let values = host.values(collection).unwrap_or_default();
        self.registry.remap(collection, &nodes, &values)?;
        self.recompute(&*host, collection)?;
        if self.registry.any_sortable() {
            self.indicator.ensure_mounted(host);
        }
        Ok(())
    }

    /// Build a session for `items`, which must be enabled items of a single
    /// collection. The first item is the primary one.
    pub fn drag_session(
        &self,
        items: &[ItemId],
        client: Point,
        scroll: Point,
    ) -> Result<DragSession<V>, SessionError> {
        let mut initial = None;
        let mut dragged = Vec::with_capacity(items.len());
        for &id in items {
            let collection = self
                .registry
                .collection_of(id)
                .ok_or(SessionError::UnknownItem { item: id })?;
            match initial {
                None => initial = Some(collection),
                Some(expected) if expected != collection => {
                    return Err(SessionError::MixedCollections {
                        expected,
                        found: collection,
                    });
                }
                Some(_) => {}
            }
            let record = self
                .registry
                .item(id)
                .ok_or(SessionError::UnknownItem { item: id })?;
            dragged.push(DraggedItem {
                id,
                index: record.index,
                value: record.value.clone(),
            });
        }
        let initial = initial.ok_or(SessionError::NoItems)?;
        DragSession::new(initial, dragged, client.offset(scroll))
    }

    /// Make `session` the active drag.
    ///
    /// A sortable origin collection is queued for zoning on the next tick so
    /// the host can settle placeholders before it is measured.
    pub fn start_drag<H: InsertionHost<V>>(&mut self, host: &mut H, session: DragSession<V>) {
        if self.session.is_some() {
            self.cancel_drag(host);
        }
        let initial = session.initial();
        let sortable = self
            .registry
            .get(initial)
            .is_some_and(|record| record.options.sortable);
        if sortable {
            self.drag_ticket = Some(self.scheduler.schedule(initial, RezoneReason::DragStarted));
        }
        if self.registry.any_sortable() {
            self.indicator.ensure_mounted(host);
        }
        tracing::debug!(
            target: "reorder.transition",
            collection = %initial,
            dragged = session.dragged().len(),
            original_index = session.original_index(),
            synthetic = session.is_synthetic(),
            sortable,
            "drag started"
        );
        self.hover = HoverState::None;
        self.session = Some(session);
    }

    /// Convenience: build a session for `items` and start it.
    pub fn start_drag_items<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        items: &[ItemId],
        client: Point,
    ) -> Result<(), SessionError> {
        let session = self.drag_session(items, client, host.scroll_offset())?;
        self.start_drag(host, session);
        Ok(())
    }

    /// Zones currently attached to `item`.
    #[must_use]
    pub fn zones_of(&self, item: ItemId) -> Option<ItemZones> {
        self.registry.item(item).map(|record| record.zones)
    }
}
