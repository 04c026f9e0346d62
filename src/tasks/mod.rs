//! Background Tasks Module
//!
//! # Tasks
//! - TTL Sweeper: removes expired cache entries at the configured interval

mod cleanup;

pub use cleanup::Sweeper;
