//! The alert engine: the core lifecycle state machine and the policy seams
//! it is composed from.

pub mod lifecycle;
pub mod policy;
pub mod snooze;
pub mod timeouts;
