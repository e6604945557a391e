//! Fan-out of change notifications to live subscribers.
//!
//! Every subscriber owns a bounded queue. Publishing never waits. A subscriber whose queue is
//! full misses that payload and is evicted: its queue drains what it already holds and then ends,
//! so the consumer knows to reconnect and refetch instead of sitting on a stale snapshot. A queue
//! whose receiver is gone is dropped from the registry.

use std::{
	collections::HashMap,
	pin::Pin,
	sync::{
		Arc, Mutex, Weak,
		atomic::{AtomicU64, Ordering},
	},
	task::{Context, Poll},
};

use tokio::sync::mpsc::{self, error::TrySendError};
use tokio_stream::Stream;

pub type Payload = Arc<str>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
	pub delivered: usize,
	/// Subscribers whose queue was full. They are evicted.
	pub dropped: usize,
	/// Subscribers found disconnected and removed.
	pub removed: usize,
}

#[derive(Clone)]
pub struct Broadcaster {
	registry: Arc<Registry>,
}
impl Broadcaster {
	pub fn new(queue_capacity: usize) -> Self {
		Self {
			registry: Arc::new(Registry {
				queue_capacity: queue_capacity.max(1),
				next_id: AtomicU64::new(1),
				subscribers: Mutex::new(HashMap::new()),
			}),
		}
	}

	pub fn subscribe(&self) -> Subscription {
		let (sender, receiver) = mpsc::channel(self.registry.queue_capacity);
		let id = self.registry.next_id.fetch_add(1, Ordering::Relaxed);
		let count = {
			let mut subscribers = self.registry.lock();

			subscribers.insert(id, sender);
			subscribers.len()
		};

		tracing::debug!(subscriber = id, subscribers = count, "Subscriber registered.");

		Subscription { id, receiver, registry: Arc::downgrade(&self.registry) }
	}

	/// Removes `subscription` from the registry. Returns `false` if it was already gone.
	///
	/// Takes the same lock as [`Broadcaster::publish`], so once this returns no later publish can
	/// reach the subscription's queue.
	pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
		self.registry.remove(subscription.id)
	}

	pub fn publish(&self, payload: impl Into<Payload>) -> PublishReport {
		let payload = payload.into();
		let mut report = PublishReport::default();
		let mut subscribers = self.registry.lock();

		subscribers.retain(|id, sender| match sender.try_send(Arc::clone(&payload)) {
			Ok(()) => {
				report.delivered += 1;

				true
			},
			Err(TrySendError::Full(_)) => {
				report.dropped += 1;

				tracing::warn!(subscriber = *id, "Subscriber queue full; evicting subscriber.");

				false
			},
			Err(TrySendError::Closed(_)) => {
				report.removed += 1;

				false
			},
		});

		drop(subscribers);

		if report.removed > 0 {
			tracing::debug!(removed = report.removed, "Removed disconnected subscribers.");
		}

		report
	}

	pub fn subscriber_count(&self) -> usize {
		self.registry.lock().len()
	}
}

/// One live subscriber. Dropping it unsubscribes.
pub struct Subscription {
	id: u64,
	receiver: mpsc::Receiver<Payload>,
	registry: Weak<Registry>,
}
impl Subscription {
	pub fn id(&self) -> u64 {
		self.id
	}

	/// Waits for the next payload. Returns `None` once unsubscribed and drained, or when the
	/// broadcaster is gone.
	pub async fn recv(&mut self) -> Option<Payload> {
		self.receiver.recv().await
	}

	pub fn try_recv(&mut self) -> Option<Payload> {
		self.receiver.try_recv().ok()
	}
}
impl Stream for Subscription {
	type Item = Payload;

	fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
		self.get_mut().receiver.poll_recv(cx)
	}
}
impl Drop for Subscription {
	fn drop(&mut self) {
		if let Some(registry) = self.registry.upgrade()
			&& registry.remove(self.id)
		{
			tracing::debug!(subscriber = self.id, "Subscriber dropped.");
		}
	}
}

struct Registry {
	queue_capacity: usize,
	next_id: AtomicU64,
	subscribers: Mutex<HashMap<u64, mpsc::Sender<Payload>>>,
}
impl Registry {
	fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<u64, mpsc::Sender<Payload>>> {
		self.subscribers.lock().unwrap_or_else(|err| err.into_inner())
	}

	fn remove(&self, id: u64) -> bool {
		self.lock().remove(&id).is_some()
	}
}
