//! In-process snapshot notifications.
//!
//! # Responsibility
//! - Register snapshot handlers and deliver every published contact snapshot
//!   to them, synchronously and in subscription order.
//!
//! # Invariants
//! - Single-threaded: the hub is `!Sync` and never blocks.
//! - Handlers may subscribe/unsubscribe while being notified; those changes
//!   take effect once the current delivery finishes.
//! - A publish issued from inside a handler is skipped and logged, never
//!   panics.

use crate::model::contact::Contact;
use log::{debug, warn};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Callback invoked with each fully materialized, sorted snapshot.
pub type SnapshotHandler = Box<dyn FnMut(&[Contact])>;

/// Handle returned by [`SnapshotHub::on_snapshot_changed`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubscriptionId(u64);

/// Push channel from the contact store to interested views.
#[derive(Default)]
pub struct SnapshotHub {
    next_id: Cell<u64>,
    handlers: RefCell<BTreeMap<SubscriptionId, SnapshotHandler>>,
    pending: RefCell<Vec<(SubscriptionId, SnapshotHandler)>>,
    cancelled: RefCell<Vec<SubscriptionId>>,
}

impl SnapshotHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a handler for future snapshots.
    pub fn on_snapshot_changed<F>(&self, handler: F) -> SubscriptionId
    where
        F: FnMut(&[Contact]) + 'static,
    {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        let handler: SnapshotHandler = Box::new(handler);
        match self.handlers.try_borrow_mut() {
            Ok(mut handlers) => {
                handlers.insert(id, handler);
            }
            Err(_) => self.pending.borrow_mut().push((id, handler)),
        }
        id
    }

    /// Removes a handler. Returns `false` when `id` is unknown; during a
    /// delivery the removal is deferred and always reported as `true`.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut handlers) = self.handlers.try_borrow_mut() else {
            self.cancelled.borrow_mut().push(id);
            return true;
        };

        if handlers.remove(&id).is_some() {
            return true;
        }
        let mut pending = self.pending.borrow_mut();
        let before = pending.len();
        pending.retain(|(pending_id, _)| *pending_id != id);
        pending.len() != before
    }

    /// Delivers `snapshot` to every registered handler.
    ///
    /// Returns how many handlers were called.
    pub fn publish(&self, snapshot: &[Contact]) -> usize {
        let Ok(mut handlers) = self.handlers.try_borrow_mut() else {
            warn!("event=snapshot_publish module=observe status=skipped reason=reentrant");
            return 0;
        };

        for handler in handlers.values_mut() {
            handler(snapshot);
        }
        let delivered = handlers.len();

        handlers.extend(self.pending.borrow_mut().drain(..));
        for id in self.cancelled.borrow_mut().drain(..) {
            handlers.remove(&id);
        }

        debug!(
            "event=snapshot_publish module=observe status=ok contacts={} handlers={}",
            snapshot.len(),
            delivered
        );
        delivered
    }

    pub fn subscriber_count(&self) -> usize {
        let active = self
            .handlers
            .try_borrow()
            .map_or(0, |handlers| handlers.len());
        active + self.pending.borrow().len()
    }
}
