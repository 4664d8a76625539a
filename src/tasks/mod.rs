//! Background Tasks Module
//!
//! # Tasks
//! - Retention sweep: drops in-memory entries past their stale-retention window

mod cleanup;

pub use cleanup::spawn_cleanup_task;
