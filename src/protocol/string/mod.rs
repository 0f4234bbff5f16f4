//! Redis string commands module
//!
//! This module provides Redis string commands GET, SET and GETDEL.

pub mod get;
pub mod getdel;
pub mod set;

pub use get::GetCmd;
pub use getdel::GetDelCmd;
pub use set::SetCmd;
