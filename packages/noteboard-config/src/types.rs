use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub storage: Storage,
	#[serde(default)]
	pub stream: Stream,
	#[serde(default)]
	pub filter: Filter,
	#[serde(default)]
	pub security: Security,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
	/// Location of the JSON document holding every project.
	pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Stream {
	/// Pending payloads buffered per subscriber. A subscriber that falls further behind is evicted.
	#[serde(default = "default_queue_capacity")]
	pub queue_capacity: usize,
	#[serde(default = "default_keep_alive_secs")]
	pub keep_alive_secs: u64,
}
impl Default for Stream {
	fn default() -> Self {
		Self {
			queue_capacity: default_queue_capacity(),
			keep_alive_secs: default_keep_alive_secs(),
		}
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Filter {
	/// How a note with an unparsable stored date is treated: "skip" or "reject".
	#[serde(default = "default_malformed_stored_dates")]
	pub malformed_stored_dates: String,
}
impl Default for Filter {
	fn default() -> Self {
		Self { malformed_stored_dates: default_malformed_stored_dates() }
	}
}

#[derive(Debug, Clone, Deserialize)]
pub struct Security {
	#[serde(default = "default_true")]
	pub bind_localhost_only: bool,
}
impl Default for Security {
	fn default() -> Self {
		Self { bind_localhost_only: true }
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_queue_capacity() -> usize {
	8
}

fn default_keep_alive_secs() -> u64 {
	15
}

fn default_malformed_stored_dates() -> String {
	"skip".to_string()
}

fn default_true() -> bool {
	true
}
