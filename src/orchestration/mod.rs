//! Phase orchestration layer
//!
//! This module runs lifecycle phases on top of the core abstractions.

pub mod lifecycle;
pub mod phase;


pub use lifecycle::LifecycleCoordinator;
pub use phase::{PhaseEntry, PhaseRecord, PhaseRunner};
