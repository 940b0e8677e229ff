//! Data models for alerts and the events they emit.

pub mod alert;
pub mod event;

pub use alert::{AlertCategory, AlertEntry, AlertMetadata};
pub use event::{AlertEvent, RemovalReason};
