//! Explicit publish/subscribe delivery of vendor data.
//!
//! A [`VendorFeed`] fetches [`VendorSnapshot`]s from a backend and publishes
//! them through a [`Subject`]. Every request is stamped with a generation
//! number taken when the request is issued, so subscribers can tell a late
//! response to an old request from the answer to the newest one.

use std::sync::mpsc::{self, Receiver, Sender};

use crate::backend::{CostBackend, VendorSnapshot};
use crate::error::ApiErrorInfo;
use crate::models::Vendor;

// ---------------------------------------------------------------------------
// Subject / Subscription
// ---------------------------------------------------------------------------

/// A multicast source of `T` values.
pub struct Subject<T> {
    next_id: u64,
    subscribers: Vec<(u64, Sender<T>)>,
}

/// Receiving end of a [`Subject`]. Hand it back to
/// [`Subject::unsubscribe`] to stop delivery.
#[derive(Debug)]
pub struct Subscription<T> {
    id: u64,
    rx: Receiver<T>,
}

impl<T: Clone> Subject<T> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> Subscription<T> {
        let (tx, rx) = mpsc::channel();
        let id = self.next_id;
        self.next_id += 1;
        self.subscribers.push((id, tx));
        Subscription { id, rx }
    }

    /// Stop delivering to `subscription`. Returns whether it was subscribed.
    pub fn unsubscribe(&mut self, subscription: Subscription<T>) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(id, _)| *id != subscription.id);
        self.subscribers.len() != before
    }

    /// Deliver `value` to every live subscriber, returning how many received it.
    ///
    /// Subscribers whose receiving end was dropped are pruned.
    pub fn publish(&mut self, value: T) -> usize {
        self.subscribers
            .retain(|(_, tx)| tx.send(value.clone()).is_ok());
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Clone> Default for Subject<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Subscription<T> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Next pending value, if any, without blocking.
    pub fn try_next(&self) -> Option<T> {
        self.rx.try_recv().ok()
    }

    /// All pending values, oldest first.
    pub fn drain(&self) -> Vec<T> {
        self.rx.try_iter().collect()
    }
}

// ---------------------------------------------------------------------------
// FeedUpdate / VendorFeed
// ---------------------------------------------------------------------------

/// Result of one feed request.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedUpdate {
    /// Issue order of the request; higher is newer.
    pub generation: u64,
    pub vendor: Vendor,
    pub snapshot: std::result::Result<VendorSnapshot, ApiErrorInfo>,
}

/// Fetches vendor snapshots and publishes them to subscribers.
pub struct VendorFeed<B> {
    backend: B,
    subject: Subject<FeedUpdate>,
    generation: u64,
}

impl<B: CostBackend> VendorFeed<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            subject: Subject::new(),
            generation: 0,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn subscribe(&mut self) -> Subscription<FeedUpdate> {
        self.subject.subscribe()
    }

    pub fn unsubscribe(&mut self, subscription: Subscription<FeedUpdate>) -> bool {
        self.subject.unsubscribe(subscription)
    }

    pub fn subscriber_count(&self) -> usize {
        self.subject.subscriber_count()
    }

    /// Reserve the generation number for a new request.
    ///
    /// Callers completing requests out of band pair this with
    /// [`publish`](Self::publish).
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn publish(&mut self, update: FeedUpdate) -> usize {
        self.subject.publish(update)
    }

    /// Fetch `vendor`'s snapshot now and publish it. Returns the request's generation.
    pub fn request(&mut self, vendor: Vendor) -> u64 {
        let generation = self.next_generation();
        tracing::debug!(vendor = %vendor, generation, "feed request");
        let snapshot = VendorSnapshot::fetch(&self.backend, vendor).map_err(|e| e.info());
        self.publish(FeedUpdate {
            generation,
            vendor,
            snapshot,
        });
        generation
    }
}
