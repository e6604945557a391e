pub mod add_note;
pub mod broadcast;
pub mod projects;
pub mod updates;

mod error;

pub use add_note::validate_note;
pub use broadcast::{Broadcaster, Payload, PublishReport, Subscription};
pub use error::{Error, Result};
pub use updates::{EXPORT_HEADER, ExportRow, UpdatesRequest, UpdatesResponse};

use std::sync::Arc;

use noteboard_config::Config;
use noteboard_domain::Project;
use noteboard_storage::Store;

/// What to do with a stored note whose date cannot be parsed while filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoredDatePolicy {
	/// Log the note and leave it out of the result.
	Skip,
	/// Fail the whole request with [`Error::InvalidDate`].
	Reject,
}
impl StoredDatePolicy {
	pub fn from_config(cfg: &Config) -> Self {
		match cfg.filter.malformed_stored_dates.as_str() {
			"reject" => Self::Reject,
			_ => Self::Skip,
		}
	}
}

pub struct NoteboardService {
	pub store: Arc<Store>,
	pub broadcaster: Broadcaster,
	pub stored_dates: StoredDatePolicy,
}
impl NoteboardService {
	pub fn new(cfg: &Config, store: Store) -> Self {
		Self {
			store: Arc::new(store),
			broadcaster: Broadcaster::new(cfg.stream.queue_capacity),
			stored_dates: StoredDatePolicy::from_config(cfg),
		}
	}

	pub fn with_parts(
		store: Store,
		broadcaster: Broadcaster,
		stored_dates: StoredDatePolicy,
	) -> Self {
		Self { store: Arc::new(store), broadcaster, stored_dates }
	}

	pub fn subscribe(&self) -> Subscription {
		self.broadcaster.subscribe()
	}
}

/// Publishes the full collection. Runs inside the store's commit callback, so snapshots leave
/// in commit order.
pub(crate) fn publish_snapshot(broadcaster: &Broadcaster, projects: &[Project]) {
	match serde_json::to_string(projects) {
		Ok(payload) => {
			let report = broadcaster.publish(payload);

			tracing::debug!(
				delivered = report.delivered,
				dropped = report.dropped,
				removed = report.removed,
				"Snapshot published."
			);
		},
		Err(err) => {
			tracing::error!(error = %err, "Failed to encode snapshot; subscribers not notified.");
		},
	}
}
