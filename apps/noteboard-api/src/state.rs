use std::{sync::Arc, time::Duration};

use noteboard_service::NoteboardService;
use noteboard_storage::Store;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<NoteboardService>,
	pub keep_alive: Duration,
}
impl AppState {
	pub async fn new(config: noteboard_config::Config) -> color_eyre::Result<Self> {
		let store = Store::open(&config.storage).await?;
		let service = NoteboardService::new(&config, store);

		Ok(Self::with_service(service, Duration::from_secs(config.stream.keep_alive_secs)))
	}

	pub fn with_service(service: NoteboardService, keep_alive: Duration) -> Self {
		Self { service: Arc::new(service), keep_alive }
	}
}
