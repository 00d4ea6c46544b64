#![forbid(unsafe_code)]

//! Commit engine: apply a drop to the value sequences.
//!
//! Three mutually exclusive cases, checked in this order:
//!
//! 1. An empty collection was the hovered target: the inserted values are
//!    appended to it and the dragged values leave the initial collection.
//!    Reported target position is `0`.
//! 2. The drag transferred and an item zone was resolved in the target:
//!    values are spliced in at the resolved index (`+1` when ascending) and
//!    removed from the initial collection at the original index.
//! 3. The drag stayed in its collection and resolved onto another item:
//!    the dragged values are removed and re-inserted at the corrected index.
//!
//! The index arithmetic lives in pure `plan_*` functions; the engine only
//! feeds them host values and writes the results back.
//!
//! # Reorder correction
//!
//! With `t` the resolved index and `o` the original index:
//!
//! | Condition | Splice index |
//! |-----------|--------------|
//! | `t > o` and descending | `t - 1` |
//! | `t < o` and ascending | `t + 1` |
//! | otherwise | `t` |
//!
//! The splice index is clamped to the length of the list after removal.

use reorder_core::id::CollectionId;
use serde::{Deserialize, Serialize};

use crate::engine::InsertionEngine;
use crate::host::{ClassTarget, InsertionHost};
use crate::registry::ItemRecord;
use crate::resolver::Resolution;
use crate::session::{DragSession, HoverState};
use crate::transition::drop_zone_class;
use crate::zone::Direction;

/// Payload of a reorder notification.
#[derive(Debug, Clone, PartialEq)]
pub struct SortEvent<V> {
    pub collection: CollectionId,
    pub previous_values: Vec<V>,
    pub values: Vec<V>,
    pub previous_items: Vec<ItemRecord<V>>,
    pub items: Vec<ItemRecord<V>>,
    pub dragged: Vec<V>,
    pub previous_position: usize,
    pub position: usize,
}

/// Payload of a transfer notification, delivered to target then source.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferEvent<V> {
    pub source: CollectionId,
    pub target: CollectionId,
    pub previous_source_values: Vec<V>,
    pub source_values: Vec<V>,
    pub previous_target_values: Vec<V>,
    pub target_values: Vec<V>,
    pub previous_source_items: Vec<ItemRecord<V>>,
    pub source_items: Vec<ItemRecord<V>>,
    pub previous_target_items: Vec<ItemRecord<V>>,
    pub target_items: Vec<ItemRecord<V>>,
    pub dragged: Vec<V>,
    pub source_previous_position: usize,
    pub target_position: usize,
}

/// Why a drop left every collection untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoMoveReason {
    /// Nothing was resolved when the drop happened.
    NoTarget,
    /// The resolved item is one of the dragged items.
    SelfDrop,
    /// The resolution belongs to a collection other than the hovered one.
    StaleResolution,
    /// A collection involved in the commit is no longer available.
    MissingCollection,
}

impl NoMoveReason {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoTarget => "no_target",
            Self::SelfDrop => "self_drop",
            Self::StaleResolution => "stale_resolution",
            Self::MissingCollection => "missing_collection",
        }
    }
}

/// Result of [`InsertionEngine::drop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CommitOutcome {
    Reordered {
        collection: CollectionId,
        previous_position: usize,
        position: usize,
    },
    Transferred {
        source: CollectionId,
        target: CollectionId,
        source_previous_position: usize,
        target_position: usize,
    },
    AppendedToEmpty {
        source: CollectionId,
        target: CollectionId,
    },
    NoMove {
        reason: NoMoveReason,
    },
    NoSession,
}

impl CommitOutcome {
    /// True when at least one value sequence was rewritten.
    #[must_use]
    pub const fn is_mutation(&self) -> bool {
        matches!(
            self,
            Self::Reordered { .. } | Self::Transferred { .. } | Self::AppendedToEmpty { .. }
        )
    }
}

/// New order of a single collection.
#[derive(Debug, Clone, PartialEq)]
pub struct ReorderPlan<V> {
    pub values: Vec<V>,
    /// Index the dragged values were inserted at.
    pub position: usize,
}

/// New contents of both sides of a transfer.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferPlan<V> {
    pub source_values: Vec<V>,
    pub target_values: Vec<V>,
}

/// Splice index for a same-collection reorder.
#[must_use]
pub const fn reorder_position(original_index: usize, target_index: usize, direction: Direction) -> usize {
    if target_index > original_index && !direction.is_ascending() {
        target_index - 1
    } else if target_index < original_index && direction.is_ascending() {
        target_index + 1
    } else {
        target_index
    }
}

/// Insertion index in a transfer target.
#[must_use]
pub const fn transfer_position(target_index: usize, direction: Direction) -> usize {
    if direction.is_ascending() {
        target_index + 1
    } else {
        target_index
    }
}

/// Remove `dragged` from `values` and re-insert it at the corrected index.
#[must_use]
pub fn plan_reorder<V: Clone + PartialEq>(
    values: &[V],
    dragged: &[V],
    original_index: usize,
    target_index: usize,
    direction: Direction,
) -> ReorderPlan<V> {
    let mut remaining: Vec<V> = values
        .iter()
        .filter(|value| !dragged.contains(value))
        .cloned()
        .collect();
    let position = reorder_position(original_index, target_index, direction).min(remaining.len());
    remaining.splice(position..position, dragged.iter().cloned());
    ReorderPlan {
        values: remaining,
        position,
    }
}

/// Remove `removed` values from `source` starting at `original_index` and
/// insert `insert` into `target` at `insert_at`.
#[must_use]
pub fn plan_transfer<V: Clone>(
    source: &[V],
    target: &[V],
    insert: &[V],
    original_index: usize,
    removed: usize,
    insert_at: usize,
) -> TransferPlan<V> {
    let mut source_values = source.to_vec();
    let start = original_index.min(source_values.len());
    let end = start.saturating_add(removed).min(source_values.len());
    source_values.drain(start..end);

    let mut target_values = target.to_vec();
    let at = insert_at.min(target_values.len());
    target_values.splice(at..at, insert.iter().cloned());

    TransferPlan {
        source_values,
        target_values,
    }
}

impl<V: Clone + PartialEq> InsertionEngine<V> {
    /// Commit the drop, clean up feedback, and end the session.
    ///
    /// Without an active session this is a no-op returning
    /// [`CommitOutcome::NoSession`].
    pub fn drop<H: InsertionHost<V>>(&mut self, host: &mut H) -> CommitOutcome {
        let Some(session) = self.session.take() else {
            return CommitOutcome::NoSession;
        };
        if let Some(ticket) = self.drag_ticket.take() {
            self.scheduler.cancel(ticket);
        }
        let hover = std::mem::take(&mut self.hover);

        let outcome = match hover {
            HoverState::EmptyCollection(target) => self.commit_append(host, &session, target),
            HoverState::Item(resolution) if session.transferred() => {
                if resolution.collection == session.last() {
                    self.commit_transfer(host, &session, &resolution)
                } else {
                    CommitOutcome::NoMove {
                        reason: NoMoveReason::StaleResolution,
                    }
                }
            }
            HoverState::Item(resolution) => {
                if resolution.collection != session.initial() {
                    CommitOutcome::NoMove {
                        reason: NoMoveReason::StaleResolution,
                    }
                } else if session.is_dragged(resolution.item) {
                    CommitOutcome::NoMove {
                        reason: NoMoveReason::SelfDrop,
                    }
                } else {
                    self.commit_reorder(host, &session, &resolution)
                }
            }
            HoverState::None => CommitOutcome::NoMove {
                reason: NoMoveReason::NoTarget,
            },
        };

        if let CommitOutcome::NoMove { reason } = outcome {
            tracing::debug!(
                target: "reorder.commit",
                initial = %session.initial(),
                last = %session.last(),
                reason = reason.as_str(),
                "drop without move"
            );
        }

        self.finish_drop(host, &session, hover);
        outcome
    }

    fn commit_reorder<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        session: &DragSession<V>,
        resolution: &Resolution,
    ) -> CommitOutcome {
        let collection = resolution.collection;
        let Some(previous_values) = host.values(collection) else {
            return CommitOutcome::NoMove {
                reason: NoMoveReason::MissingCollection,
            };
        };
        let previous_items = self.items_of(collection);
        let dragged = session.dragged_values();
        let previous_position = session.original_index();

        let plan = plan_reorder(
            &previous_values,
            &dragged,
            previous_position,
            resolution.index,
            resolution.direction,
        );
        tracing::debug!(
            target: "reorder.commit",
            collection = %collection,
            target_index = resolution.index,
            direction = resolution.direction.as_str(),
            previous_position,
            position = plan.position,
            "reorder planned"
        );

        host.set_values(collection, plan.values.clone());
        self.refresh_after_commit(host, collection);

        let event = SortEvent {
            collection,
            previous_values,
            values: plan.values,
            previous_items,
            items: self.items_of(collection),
            dragged,
            previous_position,
            position: plan.position,
        };
        tracing::info!(
            target: "reorder.commit",
            collection = %collection,
            previous_position,
            position = event.position,
            "reordered"
        );
        if let Some(on_sort) = self
            .registry
            .get(collection)
            .and_then(|record| record.hooks.on_sort.as_ref())
        {
            on_sort(&event);
        }

        CommitOutcome::Reordered {
            collection,
            previous_position,
            position: event.position,
        }
    }

    fn commit_transfer<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        session: &DragSession<V>,
        resolution: &Resolution,
    ) -> CommitOutcome {
        let position = transfer_position(resolution.index, resolution.direction);
        match self.apply_transfer(host, session, resolution.collection, Some(position), position) {
            Some(()) => CommitOutcome::Transferred {
                source: session.initial(),
                target: resolution.collection,
                source_previous_position: session.original_index(),
                target_position: position,
            },
            None => CommitOutcome::NoMove {
                reason: NoMoveReason::MissingCollection,
            },
        }
    }

    fn commit_append<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        session: &DragSession<V>,
        target: CollectionId,
    ) -> CommitOutcome {
        if target == session.initial() {
            return CommitOutcome::NoMove {
                reason: NoMoveReason::StaleResolution,
            };
        }
        match self.apply_transfer(host, session, target, None, 0) {
            Some(()) => CommitOutcome::AppendedToEmpty {
                source: session.initial(),
                target,
            },
            None => CommitOutcome::NoMove {
                reason: NoMoveReason::MissingCollection,
            },
        }
    }

    /// Move values between collections. `insert_at == None` appends.
    fn apply_transfer<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        session: &DragSession<V>,
        target: CollectionId,
        insert_at: Option<usize>,
        reported_position: usize,
    ) -> Option<()> {
        let source = session.initial();
        let previous_source_values = host.values(source)?;
        let previous_target_values = host.values(target)?;
        let previous_source_items = self.items_of(source);
        let previous_target_items = self.items_of(target);
        let dragged = session.dragged_values();

        let plan = plan_transfer(
            &previous_source_values,
            &previous_target_values,
            &session.insert_values(),
            session.original_index(),
            dragged.len(),
            insert_at.unwrap_or(previous_target_values.len()),
        );
        tracing::debug!(
            target: "reorder.commit",
            source = %source,
            target = %target,
            source_previous_position = session.original_index(),
            target_position = reported_position,
            append = insert_at.is_none(),
            "transfer planned"
        );

        host.set_values(target, plan.target_values.clone());
        host.set_values(source, plan.source_values.clone());
        self.refresh_after_commit(host, target);
        self.refresh_after_commit(host, source);

        let event = TransferEvent {
            source,
            target,
            previous_source_values,
            source_values: plan.source_values,
            previous_target_values,
            target_values: plan.target_values,
            previous_source_items,
            source_items: self.items_of(source),
            previous_target_items,
            target_items: self.items_of(target),
            dragged,
            source_previous_position: session.original_index(),
            target_position: reported_position,
        };
        tracing::info!(
            target: "reorder.commit",
            source = %source,
            target = %target,
            target_position = reported_position,
            "transferred"
        );

        for collection in [target, source] {
            if let Some(on_transfer) = self
                .registry
                .get(collection)
                .and_then(|record| record.hooks.on_transfer.as_ref())
            {
                on_transfer(&event);
            }
        }
        Some(())
    }

    /// Hide the indicator, clear feedback classes, hand off to drag end.
    fn finish_drop<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        session: &DragSession<V>,
        hover: HoverState,
    ) {
        self.indicator.hide(host);

        let initial_options = self
            .registry
            .get(session.initial())
            .map(|record| record.options.clone());

        match hover {
            HoverState::Item(resolution) => {
                if let Some(class) = initial_options
                    .as_ref()
                    .and_then(|options| drop_zone_class(options, session.is_synthetic()))
                {
                    host.remove_class(ClassTarget::Item(resolution.item), class);
                }
            }
            HoverState::EmptyCollection(collection) => {
                if let Some(class) = self.registry.get(collection).and_then(|record| {
                    drop_zone_class(&record.options, session.is_synthetic()).map(str::to_owned)
                }) {
                    host.remove_class(ClassTarget::Collection(collection), &class);
                }
            }
            HoverState::None => {}
        }

        if let Some(class) = initial_options
            .as_ref()
            .and_then(|options| options.classes.drag_placeholder_class.as_deref())
        {
            for dragged in session.dragged() {
                host.remove_class(ClassTarget::Item(dragged.id), class);
            }
        }

        host.drag_ended(session);
    }

    fn refresh_after_commit<H: InsertionHost<V>>(&mut self, host: &mut H, collection: CollectionId) {
        if let Err(err) = self.remap_finished(host, collection) {
            tracing::warn!(
                target: "reorder.commit",
                collection = %collection,
                error = %err,
                "could not refresh collection after commit"
            );
        }
    }

    fn items_of(&self, collection: CollectionId) -> Vec<ItemRecord<V>> {
        self.registry
            .get(collection)
            .map(|record| record.items.clone())
            .unwrap_or_default()
    }
}
