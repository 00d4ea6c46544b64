#![forbid(unsafe_code)]

//! Deferred re-zoning.
//!
//! Zones are measured after the host settles: once on the tick after a drag
//! starts (so placeholders are in place), and again whenever a collection's
//! layout is invalidated. Requests are queued here and drained by the host
//! on its next tick via `InsertionEngine::run_scheduled`.
//!
//! # Invariants
//! 1. At most one pending task exists per collection. Scheduling an already
//!    pending collection coalesces into the existing task: the ticket is
//!    kept, the latest reason wins.
//! 2. [`RezoneScheduler::take_due`] yields tasks in first-scheduled order.
//! 3. A cancelled ticket never runs. Cancelling a ticket that already ran or
//!    was cancelled is a no-op.

use std::fmt;

use reorder_core::id::CollectionId;
use serde::{Deserialize, Serialize};

/// Why a collection needs fresh zones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RezoneReason {
    DragStarted,
    Resized,
    Scrolled,
    ViewportResized,
    Invalidated,
}

impl RezoneReason {
    /// Returns the stable string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DragStarted => "drag_started",
            Self::Resized => "resized",
            Self::Scrolled => "scrolled",
            Self::ViewportResized => "viewport_resized",
            Self::Invalidated => "invalidated",
        }
    }
}

/// Handle to a pending re-zone task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RezoneTicket(u64);

impl RezoneTicket {
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RezoneTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rezone#{}", self.0)
    }
}

/// A queued re-zone request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingRezone {
    pub ticket: RezoneTicket,
    pub collection: CollectionId,
    pub reason: RezoneReason,
}

/// Queue of pending re-zone tasks.
#[derive(Debug, Default)]
pub struct RezoneScheduler {
    next_ticket: u64,
    pending: Vec<PendingRezone>,
    coalesced: u64,
}

impl RezoneScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `collection` for re-zoning.
    pub fn schedule(&mut self, collection: CollectionId, reason: RezoneReason) -> RezoneTicket {
        if let Some(task) = self
            .pending
            .iter_mut()
            .find(|task| task.collection == collection)
        {
            task.reason = reason;
            self.coalesced += 1;
            tracing::trace!(
                target: "reorder.scheduler",
                collection = %collection,
                ticket = %task.ticket,
                reason = reason.as_str(),
                "coalesced rezone"
            );
            return task.ticket;
        }

        self.next_ticket += 1;
        let ticket = RezoneTicket(self.next_ticket);
        self.pending.push(PendingRezone {
            ticket,
            collection,
            reason,
        });
        tracing::trace!(
            target: "reorder.scheduler",
            collection = %collection,
            ticket = %ticket,
            reason = reason.as_str(),
            "scheduled rezone"
        );
        ticket
    }

    /// Drop a pending task. Returns whether anything was removed.
    pub fn cancel(&mut self, ticket: RezoneTicket) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.ticket != ticket);
        let removed = self.pending.len() != before;
        if removed {
            tracing::trace!(target: "reorder.scheduler", ticket = %ticket, "cancelled rezone");
        }
        removed
    }

    /// Drop any pending task for `collection`.
    pub fn cancel_collection(&mut self, collection: CollectionId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|task| task.collection != collection);
        self.pending.len() != before
    }

    #[must_use]
    pub fn is_pending(&self, ticket: RezoneTicket) -> bool {
        self.pending.iter().any(|task| task.ticket == ticket)
    }

    #[must_use]
    pub fn is_collection_pending(&self, collection: CollectionId) -> bool {
        self.pending.iter().any(|task| task.collection == collection)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Number of requests folded into an existing task so far.
    #[must_use]
    pub const fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Drain every pending task in first-scheduled order.
    pub fn take_due(&mut self) -> Vec<PendingRezone> {
        std::mem::take(&mut self.pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cid(raw: u64) -> CollectionId {
        CollectionId::new(raw).unwrap()
    }

    #[test]
    fn repeated_requests_coalesce() {
        let mut scheduler = RezoneScheduler::new();
        let first = scheduler.schedule(cid(1), RezoneReason::Resized);
        let second = scheduler.schedule(cid(1), RezoneReason::Scrolled);
        assert_eq!(first, second);
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.coalesced(), 1);

        let due = scheduler.take_due();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].reason, RezoneReason::Scrolled);
        assert!(scheduler.is_empty());
    }

    #[test]
    fn take_due_preserves_first_scheduled_order() {
        let mut scheduler = RezoneScheduler::new();
        scheduler.schedule(cid(3), RezoneReason::Invalidated);
        scheduler.schedule(cid(1), RezoneReason::Resized);
        scheduler.schedule(cid(3), RezoneReason::Scrolled);
        let order: Vec<_> = scheduler
            .take_due()
            .into_iter()
            .map(|task| task.collection.get())
            .collect();
        assert_eq!(order, vec![3, 1]);
    }

    #[test]
    fn cancelled_ticket_never_runs() {
        let mut scheduler = RezoneScheduler::new();
        let ticket = scheduler.schedule(cid(1), RezoneReason::DragStarted);
        scheduler.schedule(cid(2), RezoneReason::DragStarted);
        assert!(scheduler.cancel(ticket));
        assert!(!scheduler.cancel(ticket));
        assert!(!scheduler.is_pending(ticket));
        let due = scheduler.take_due();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].collection, cid(2));
    }

    #[test]
    fn tickets_are_fresh_after_drain() {
        let mut scheduler = RezoneScheduler::new();
        let first = scheduler.schedule(cid(1), RezoneReason::Resized);
        scheduler.take_due();
        let second = scheduler.schedule(cid(1), RezoneReason::Resized);
        assert_ne!(first, second);
        assert!(scheduler.is_collection_pending(cid(1)));
        assert!(scheduler.cancel_collection(cid(1)));
        assert!(scheduler.is_empty());
    }
}
