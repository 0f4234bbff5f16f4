//! Redis protocol implementation
//!
//! This module provides RESP (REdis Serialization Protocol) parsing and
//! the Redis commands that map onto the store contract.

pub mod command;
pub mod generic;
pub mod resp;
pub mod string;

pub use command::{ByteStore, Command, CommandFactory};
pub use resp::{Parser, ProtocolError, Value};
