pub mod config;
pub mod error;
#[cfg(feature = "lambda")]
pub mod lambda;
pub mod model;
pub mod nearest;
pub mod service;
pub mod store;

pub use config::{Config, Table};
pub use error::MatchingError;
pub use store::{DynamoStore, MatchingStore, MemoryStore};
