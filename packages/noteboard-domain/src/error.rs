#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
	#[error("Invalid date {value:?}; expected YYYY-MM-DD.")]
	Invalid { value: String },
}
