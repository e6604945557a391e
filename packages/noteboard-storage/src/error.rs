use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Not found: {0}")]
	NotFound(String),
	#[error("Conflict: {0}")]
	Conflict(String),
	#[error("Corrupt document at {path:?}: {message}")]
	CorruptData { path: PathBuf, message: String },
	#[error("I/O error on {path:?}: {source}")]
	Io { path: PathBuf, source: std::io::Error },
	#[error(transparent)]
	Encode(#[from] serde_json::Error),
}
