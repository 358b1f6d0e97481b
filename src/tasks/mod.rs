//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the cache service
//! is up.
//!
//! # Tasks
//! - Reaper: drops entries and admission records past the retention window

mod reaper;

pub use reaper::spawn_reaper_task;
