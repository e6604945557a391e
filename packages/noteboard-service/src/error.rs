pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("Missing required fields: {}.", .fields.join(", "))]
	MissingFields { fields: Vec<String> },
	#[error("Invalid date {value:?}; expected YYYY-MM-DD.")]
	InvalidDate { value: String },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Project {pr:?} has no updates.")]
	NoUpdates { pr: String },
	#[error("Conflict: {message}")]
	Conflict { message: String },
	#[error("Corrupt data: {message}")]
	CorruptData { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl From<noteboard_storage::Error> for Error {
	fn from(err: noteboard_storage::Error) -> Self {
		match err {
			noteboard_storage::Error::NotFound(message) => Self::NotFound { message },
			noteboard_storage::Error::Conflict(message) => Self::Conflict { message },
			err @ noteboard_storage::Error::CorruptData { .. } =>
				Self::CorruptData { message: err.to_string() },
			err @ (noteboard_storage::Error::Io { .. } | noteboard_storage::Error::Encode(_)) =>
				Self::Storage { message: err.to_string() },
		}
	}
}

impl From<noteboard_domain::DateError> for Error {
	fn from(err: noteboard_domain::DateError) -> Self {
		match err {
			noteboard_domain::DateError::Invalid { value } => Self::InvalidDate { value },
		}
	}
}

impl From<tokio::task::JoinError> for Error {
	fn from(err: tokio::task::JoinError) -> Self {
		Self::Storage { message: format!("Write task failed: {err}.") }
	}
}
