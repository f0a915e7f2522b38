//! Key filter registry.
//!
//! Widgets that need to observe keys not targeted at them (the pipette
//! watching for Escape while it holds pointer capture) subscribe a
//! [`KeyFilter`] on the host's [`InputHub`]. The hub is an ordinary value
//! owned by the host; the returned [`Subscription`] removes the filter when
//! dropped.

use super::KeyEvent;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Identifier of a filter subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Observes every key event dispatched through an [`InputHub`].
pub trait KeyFilter {
    /// Inspect a key event before normal routing.
    ///
    /// Returns true to consume the event.
    fn pre_filter(&mut self, event: &KeyEvent) -> bool;
}

type SharedFilter = Rc<RefCell<dyn KeyFilter>>;

#[derive(Default)]
struct Registry {
    next_id: u64,
    filters: Vec<(SubscriptionId, SharedFilter)>,
}

impl Registry {
    fn contains(&self, id: SubscriptionId) -> bool {
        self.filters.iter().any(|(fid, _)| *fid == id)
    }
}

/// Dispatches key events to subscribed filters in subscription order.
#[derive(Clone, Default)]
pub struct InputHub {
    registry: Rc<RefCell<Registry>>,
}

impl InputHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install a filter. It stays installed until the guard is dropped.
    #[must_use = "dropping the subscription uninstalls the filter"]
    pub fn subscribe(&self, filter: SharedFilter) -> Subscription {
        let mut registry = self.registry.borrow_mut();
        registry.next_id += 1;
        let id = SubscriptionId(registry.next_id);
        registry.filters.push((id, filter));
        log::debug!("Key filter {:?} installed", id);
        Subscription {
            id,
            registry: Rc::downgrade(&self.registry),
        }
    }

    /// Number of installed filters.
    pub fn filter_count(&self) -> usize {
        self.registry.borrow().filters.len()
    }

    /// Run a key event through every installed filter.
    ///
    /// All filters see the event even if an earlier one consumed it.
    /// Returns true if any filter consumed it.
    pub fn dispatch_key(&self, event: &KeyEvent) -> bool {
        // Snapshot so filters can unsubscribe (or subscribe) while we iterate.
        let snapshot: Vec<(SubscriptionId, SharedFilter)> = self
            .registry
            .borrow()
            .filters
            .iter()
            .map(|(id, f)| (*id, Rc::clone(f)))
            .collect();

        let mut consumed = false;
        for (id, filter) in snapshot {
            if !self.registry.borrow().contains(id) {
                continue;
            }
            match filter.try_borrow_mut() {
                Ok(mut filter) => consumed |= filter.pre_filter(event),
                Err(_) => log::warn!("Key filter {:?} is busy, skipping {:?}", id, event),
            }
        }
        consumed
    }
}

impl fmt::Debug for InputHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputHub")
            .field("filters", &self.filter_count())
            .finish()
    }
}

/// Guard for an installed filter; uninstalls it on drop.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    registry: Weak<RefCell<Registry>>,
}

impl Subscription {
    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            registry.borrow_mut().filters.retain(|(id, _)| *id != self.id);
            log::debug!("Key filter {:?} removed", self.id);
        }
    }
}
