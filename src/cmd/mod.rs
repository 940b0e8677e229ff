//! Command implementations for the `headsup` binary.

pub mod simulate;

pub use simulate::SimulateArgs;
