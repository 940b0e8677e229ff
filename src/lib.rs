#![warn(missing_docs)]
//! Headsup is a lifecycle manager for transient "heads-up" alerts: it tracks
//! one entry per notification key, ranks them for display, enforces
//! accessibility-aware auto-dismiss timeouts and per-package snooze windows,
//! and confines all state to a single-consumer worker task.

pub mod clock;
pub mod cmd;
pub mod config;
pub mod engine;
pub mod models;
pub mod service;
pub mod test_helpers;
