pub mod date_filter;
pub mod project;

mod error;

pub use date_filter::DateRange;
pub use error::DateError;
pub use project::{Note, PointNote, Project, RangeNote};
