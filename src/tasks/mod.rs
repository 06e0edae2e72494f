//! Background Tasks Module
//!
//! Contains background tasks that run periodically for the life of a cache.
//!
//! # Tasks
//! - Expiration sweeper: reclaims expired entries a bounded batch at a time

mod sweeper;

pub(crate) use sweeper::spawn_sweeper_task;
pub use sweeper::SweeperHandle;
