//! Redis keyspace commands module
//!
//! DEL and EXISTS accept several keys; each key is handled as its own store
//! operation, with no atomicity across keys.

pub mod dbsize;
pub mod del;
pub mod exists;

pub use dbsize::DbSizeCmd;
pub use del::DelCmd;
pub use exists::ExistsCmd;
