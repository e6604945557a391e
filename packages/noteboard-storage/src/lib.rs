pub mod document;
pub mod store;

mod error;

pub use error::Error;
pub use store::Store;

pub type Result<T, E = Error> = std::result::Result<T, E>;
