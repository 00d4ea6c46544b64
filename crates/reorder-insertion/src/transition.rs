#![forbid(unsafe_code)]

//! Transition controller: turn hover input into reorder/transfer/exit.
//!
//! Every pointer sample is classified against the active [`DragSession`]:
//!
//! | State | Condition | Action |
//! |-------|-----------|--------|
//! | Idle | no session | nothing |
//! | HoveringSameCollection | target == session's last collection | resolve a zone, place the indicator |
//! | ReturningHome | target is the initial collection, last is not | reset last to initial, then as HoveringSameCollection |
//! | HoveringOtherCollection | target != last collection | acceptance rules, then empty-target highlight or zone resolution |
//! | OutsideAnyCollection | pointer over no registered collection | hide indicator, clear hover, reset last to initial |
//!
//! Each call returns a [`Transition`] whose [`TransitionEffect`] names what
//! happened, including the silent no-op cases.
//!
//! # Invariants
//! 1. The session's last collection only changes on an accepted transition,
//!    on a return to the initial collection, or on exit (reset to initial).
//! 2. An empty-collection target and a resolved item zone are never active at
//!    the same time.
//! 3. When no zone matches, the previous indicator state is left untouched.
//!
//! # Failure Modes
//! Missing session, unregistered collections and rejected targets all
//! degrade to [`TransitionEffect::Noop`]; nothing here returns an error.

use reorder_core::event::{HitTarget, PointerEvent, PointerEventKind};
use reorder_core::geometry::Point;
use reorder_core::id::CollectionId;
use serde::{Deserialize, Serialize};

use crate::config::{AcceptContext, CollectionOptions};
use crate::engine::InsertionEngine;
use crate::host::{ClassTarget, InsertionHost, LayoutProbe, Presenter};
use crate::registry::{CollectionRecord, Registry};
use crate::resolver::{Resolution, resolve};
use crate::session::{DragSession, HoverState};

/// Why a target collection refused a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// The collection's custom `accepts` hook returned false.
    PredicateDeclined,
    DropZoneDisabled,
    /// Groups differ, or either side has no group.
    GroupMismatch,
    /// The target is rendered inside one of the dragged items.
    TreeContainment,
}

impl RejectReason {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PredicateDeclined => "predicate_declined",
            Self::DropZoneDisabled => "drop_zone_disabled",
            Self::GroupMismatch => "group_mismatch",
            Self::TreeContainment => "tree_containment",
        }
    }
}

/// Why a pointer sample changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    NoSession,
    UnknownCollection,
    IndicatorHovered,
    NotSortable,
    Rejected(RejectReason),
    NoZoneMatched,
    /// Still hovering the same empty collection.
    EmptyTargetUnchanged,
}

impl NoopReason {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NoSession => "no_session",
            Self::UnknownCollection => "unknown_collection",
            Self::IndicatorHovered => "indicator_hovered",
            Self::NotSortable => "not_sortable",
            Self::Rejected(reason) => reason.as_str(),
            Self::NoZoneMatched => "no_zone_matched",
            Self::EmptyTargetUnchanged => "empty_target_unchanged",
        }
    }
}

/// Outcome of one pointer sample.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum TransitionEffect {
    /// Zone resolved inside the collection the drag started in.
    Reordering { resolution: Resolution },
    /// Hovering an accepted collection other than the initial one.
    /// `resolution` is absent when the pointer sits between zones.
    Transferring {
        from: CollectionId,
        resolution: Option<Resolution>,
    },
    /// An accepted, empty collection is highlighted as the drop target.
    EmptyTargetHovered { collection: CollectionId },
    /// Pointer left every collection; the session was reset to `reset_to`.
    Exited { reset_to: CollectionId },
    Noop { reason: NoopReason },
}

impl TransitionEffect {
    const fn noop(reason: NoopReason) -> Self {
        Self::Noop { reason }
    }

    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop { .. })
    }

    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Reordering { .. } => "reordering",
            Self::Transferring { .. } => "transferring",
            Self::EmptyTargetHovered { .. } => "empty_target_hovered",
            Self::Exited { .. } => "exited",
            Self::Noop { .. } => "noop",
        }
    }
}

/// One controller step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transition {
    /// Monotonic per-engine counter.
    pub sequence: u64,
    pub kind: PointerEventKind,
    /// Collection the sample was applied to, after nested retargeting.
    pub collection: Option<CollectionId>,
    pub effect: TransitionEffect,
}

/// Run the acceptance rules for moving the drag into `target`.
///
/// Order: tree containment, then the custom `accepts` hook when present,
/// otherwise `drop_zone` and group equality with the initial collection.
pub fn check_acceptance<V>(
    registry: &Registry<V>,
    target: &CollectionRecord<V>,
    initial: &CollectionRecord<V>,
    last: &CollectionRecord<V>,
    session: &DragSession<V>,
) -> Result<(), RejectReason> {
    if target.options.tree_group
        && session
            .dragged()
            .iter()
            .any(|dragged| registry.item_contains_collection(dragged.id, target.id))
    {
        return Err(RejectReason::TreeContainment);
    }

    if let Some(accepts) = &target.hooks.accepts {
        let context = AcceptContext {
            target,
            initial,
            last,
            session,
        };
        return if accepts(&context) {
            Ok(())
        } else {
            Err(RejectReason::PredicateDeclined)
        };
    }

    if !target.options.drop_zone {
        return Err(RejectReason::DropZoneDisabled);
    }

    match (&target.options.group, &initial.options.group) {
        (Some(target_group), Some(initial_group)) if target_group == initial_group => Ok(()),
        _ => Err(RejectReason::GroupMismatch),
    }
}

/// Swap `collection` for its nested child when `pointer` (document space)
/// lies strictly within the child's vertical span.
pub fn retarget_nested<V>(
    registry: &Registry<V>,
    collection: CollectionId,
    pointer: Point,
    probe: &impl LayoutProbe,
) -> CollectionId {
    let Some(child) = registry
        .get(collection)
        .and_then(|record| record.options.nested)
    else {
        return collection;
    };
    if !registry.contains(child) {
        return collection;
    }
    match probe.collection_rect(child) {
        Some(rect) if rect.translate(probe.scroll_offset()).spans_y(pointer.y) => child,
        _ => collection,
    }
}

/// Feedback class applied to drop targets for this kind of drag.
pub(crate) fn drop_zone_class(options: &CollectionOptions, synthetic: bool) -> Option<&str> {
    if synthetic {
        options.classes.synth_drop_zone_class.as_deref()
    } else {
        options.classes.drop_zone_class.as_deref()
    }
}

impl<V: Clone> InsertionEngine<V> {
    /// Feed one pointer sample (drag-over, pointer-over, or document move).
    pub fn handle_pointer<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        event: PointerEvent,
    ) -> Transition {
        self.sequence += 1;
        let (collection, effect) = self.apply_pointer(host, event);

        match effect {
            TransitionEffect::Noop { reason } => tracing::trace!(
                target: "reorder.transition",
                sequence = self.sequence,
                kind = ?event.kind,
                hit = event.target.as_str(),
                reason = reason.as_str(),
                "pointer ignored"
            ),
            TransitionEffect::Exited { .. } => tracing::trace!(
                target: "reorder.transition",
                sequence = self.sequence,
                "pointer outside collections"
            ),
            _ => tracing::debug!(
                target: "reorder.transition",
                sequence = self.sequence,
                collection = ?collection.map(|id| id.get()),
                effect = effect.as_str(),
                "transition"
            ),
        }

        Transition {
            sequence: self.sequence,
            kind: event.kind,
            collection,
            effect,
        }
    }

    fn apply_pointer<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        event: PointerEvent,
    ) -> (Option<CollectionId>, TransitionEffect) {
        let Some(last) = self.session.as_ref().map(DragSession::last) else {
            return (None, TransitionEffect::noop(NoopReason::NoSession));
        };

        let hovered = match event.target {
            HitTarget::Indicator => {
                return (None, TransitionEffect::noop(NoopReason::IndicatorHovered));
            }
            HitTarget::Outside => return (None, self.exit(host)),
            HitTarget::Collection { collection } | HitTarget::Item { collection, .. } => collection,
        };

        if !self.registry.contains(hovered) {
            return (None, self.exit(host));
        }

        let pointer = event.client.offset(host.scroll_offset());
        if let Some(session) = self.session.as_mut() {
            session.set_pointer(pointer);
        }
        tracing::trace!(
            target: "reorder.transition",
            x = pointer.x,
            y = pointer.y,
            "pointer updated"
        );

        let target = retarget_nested(&self.registry, hovered, pointer, &*host);
        let effect = if target == last {
            self.move_within(host, target, pointer)
        } else if self.session.as_ref().is_some_and(|s| s.initial() == target) {
            self.return_home(host, target, pointer)
        } else {
            self.move_into(host, target, pointer)
        };
        (Some(target), effect)
    }

    /// Continue inside the collection hovered last.
    fn move_within<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        target: CollectionId,
        pointer: Point,
    ) -> TransitionEffect {
        let Some(record) = self.registry.get(target) else {
            return TransitionEffect::noop(NoopReason::UnknownCollection);
        };
        if !record.options.sortable {
            return TransitionEffect::noop(NoopReason::NotSortable);
        }

        if let HoverState::EmptyCollection(hovered) = self.hover {
            if hovered == target && self.values_empty(host, target) {
                return TransitionEffect::noop(NoopReason::EmptyTargetUnchanged);
            }
            self.clear_empty_target(host);
        }

        self.resolve_and_show(host, target, pointer)
    }

    /// Back in the collection the drag started in. Reordering there is never
    /// subject to the transfer rules.
    fn return_home<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        target: CollectionId,
        pointer: Point,
    ) -> TransitionEffect {
        if let Some(session) = self.session.as_mut() {
            session.set_last(target);
        }
        tracing::debug!(
            target: "reorder.transition",
            collection = %target,
            "returned to initial collection"
        );
        self.clear_empty_target(host);
        self.move_within(host, target, pointer)
    }

    /// Evaluate moving the drag into a collection other than the last one.
    fn move_into<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        target: CollectionId,
        pointer: Point,
    ) -> TransitionEffect {
        let Some(session) = self.session.as_ref() else {
            return TransitionEffect::noop(NoopReason::NoSession);
        };
        let (Some(target_record), Some(initial_record), Some(last_record)) = (
            self.registry.get(target),
            self.registry.get(session.initial()),
            self.registry.get(session.last()),
        ) else {
            return TransitionEffect::noop(NoopReason::UnknownCollection);
        };

        if let Err(reason) = check_acceptance(
            &self.registry,
            target_record,
            initial_record,
            last_record,
            session,
        ) {
            tracing::debug!(
                target: "reorder.transition",
                collection = %target,
                initial = %session.initial(),
                reason = reason.as_str(),
                "transfer rejected"
            );
            return TransitionEffect::noop(NoopReason::Rejected(reason));
        }

        if let Some(session) = self.session.as_mut() {
            session.set_last(target);
        }

        if self.values_empty(host, target) {
            if self.hover.empty_target() != Some(target) {
                self.clear_empty_target(host);
                if let Some(class) = self.drop_zone_class_for(target) {
                    host.add_class(ClassTarget::Collection(target), &class);
                }
                self.hover = HoverState::EmptyCollection(target);
            }
            self.indicator.hide(host);
            return TransitionEffect::EmptyTargetHovered { collection: target };
        }

        self.clear_empty_target(host);
        self.resolve_and_show(host, target, pointer)
    }

    fn resolve_and_show<H: InsertionHost<V>>(
        &mut self,
        host: &mut H,
        target: CollectionId,
        pointer: Point,
    ) -> TransitionEffect {
        let Some(initial) = self.session.as_ref().map(DragSession::initial) else {
            return TransitionEffect::noop(NoopReason::NoSession);
        };
        let found = self
            .registry
            .get(target)
            .and_then(|record| resolve(target, pointer, &record.items));

        match found {
            Some(resolution) => {
                self.indicator
                    .place(host, &resolution.zone, resolution.direction);
                self.hover = HoverState::Item(resolution);
                if target == initial {
                    TransitionEffect::Reordering { resolution }
                } else {
                    TransitionEffect::Transferring {
                        from: initial,
                        resolution: Some(resolution),
                    }
                }
            }
            None if target != initial => TransitionEffect::Transferring {
                from: initial,
                resolution: None,
            },
            None => TransitionEffect::noop(NoopReason::NoZoneMatched),
        }
    }

    /// Pointer left every collection.
    fn exit<H: InsertionHost<V>>(&mut self, host: &mut H) -> TransitionEffect {
        let Some(initial) = self.session.as_ref().map(DragSession::initial) else {
            return TransitionEffect::noop(NoopReason::NoSession);
        };
        self.indicator.hide(host);
        self.clear_empty_target(host);
        self.hover = HoverState::None;
        if let Some(session) = self.session.as_mut() {
            session.set_last(initial);
        }
        TransitionEffect::Exited { reset_to: initial }
    }

    /// Remove the drop-zone highlight from the hovered empty collection.
    pub(crate) fn clear_empty_target(&mut self, host: &mut impl Presenter) {
        let HoverState::EmptyCollection(collection) = self.hover else {
            return;
        };
        if let Some(class) = self.drop_zone_class_for(collection) {
            host.remove_class(ClassTarget::Collection(collection), &class);
        }
        self.hover = HoverState::None;
    }

    pub(crate) fn drop_zone_class_for(&self, collection: CollectionId) -> Option<String> {
        let synthetic = self
            .session
            .as_ref()
            .is_some_and(DragSession::is_synthetic);
        self.registry
            .get(collection)
            .and_then(|record| drop_zone_class(&record.options, synthetic))
            .map(str::to_owned)
    }

    fn values_empty<H: InsertionHost<V>>(&self, host: &H, collection: CollectionId) -> bool {
        match host.values(collection) {
            Some(values) => values.is_empty(),
            None => self
                .registry
                .get(collection)
                .is_none_or(|record| record.items.is_empty()),
        }
    }
}
