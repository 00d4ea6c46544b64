#![forbid(unsafe_code)]

//! Notification capture.
//!
//! [`HookRecorder`] hands out [`CollectionHooks`] whose callbacks store a copy
//! of every sort/transfer payload, tagged with the collection whose hook
//! fired. Clones share the same log.

use std::cell::RefCell;
use std::rc::Rc;

use reorder_core::id::CollectionId;
use reorder_insertion::commit::{SortEvent, TransferEvent};
use reorder_insertion::config::{AcceptContext, CollectionHooks};

/// One captured notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Notification<V> {
    Sort {
        hook_owner: CollectionId,
        event: SortEvent<V>,
    },
    Transfer {
        hook_owner: CollectionId,
        event: TransferEvent<V>,
    },
}

/// Shared log of notifications.
#[derive(Debug)]
pub struct HookRecorder<V> {
    log: Rc<RefCell<Vec<Notification<V>>>>,
}

impl<V> Clone for HookRecorder<V> {
    fn clone(&self) -> Self {
        Self {
            log: Rc::clone(&self.log),
        }
    }
}

impl<V> Default for HookRecorder<V> {
    fn default() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
        }
    }
}

impl<V: Clone + 'static> HookRecorder<V> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hooks that record sort and transfer notifications for `owner`.
    #[must_use]
    pub fn hooks(&self, owner: CollectionId) -> CollectionHooks<V> {
        let sorts = Rc::clone(&self.log);
        let transfers = Rc::clone(&self.log);
        CollectionHooks::new()
            .on_sort(move |event| {
                sorts.borrow_mut().push(Notification::Sort {
                    hook_owner: owner,
                    event: event.clone(),
                });
            })
            .on_transfer(move |event| {
                transfers.borrow_mut().push(Notification::Transfer {
                    hook_owner: owner,
                    event: event.clone(),
                });
            })
    }

    /// Recording hooks plus a custom acceptance predicate.
    #[must_use]
    pub fn hooks_accepting(
        &self,
        owner: CollectionId,
        accepts: impl Fn(&AcceptContext<'_, V>) -> bool + 'static,
    ) -> CollectionHooks<V> {
        self.hooks(owner).accepts(accepts)
    }

    /// Every notification so far, oldest first.
    #[must_use]
    pub fn notifications(&self) -> Vec<Notification<V>> {
        self.log.borrow().clone()
    }

    #[must_use]
    pub fn sorts(&self) -> Vec<SortEvent<V>> {
        self.log
            .borrow()
            .iter()
            .filter_map(|notification| match notification {
                Notification::Sort { event, .. } => Some(event.clone()),
                Notification::Transfer { .. } => None,
            })
            .collect()
    }

    /// Transfer payloads with the collection whose hook received them.
    #[must_use]
    pub fn transfers(&self) -> Vec<(CollectionId, TransferEvent<V>)> {
        self.log
            .borrow()
            .iter()
            .filter_map(|notification| match notification {
                Notification::Transfer { hook_owner, event } => Some((*hook_owner, event.clone())),
                Notification::Sort { .. } => None,
            })
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }
}
