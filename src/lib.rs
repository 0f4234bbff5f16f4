//! In-memory key-value store with a RESP front end
//!
//! [`store::Store`] is the concurrency-safe map every other module is built
//! around. The `protocol` and `server` modules expose it to Redis clients.

pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod store;

pub use error::StoreError;
pub use store::{Store, Storer};
