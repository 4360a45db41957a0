//! Core abstractions and interfaces
//!
//! This module provides the participant traits, priority resolution,
//! error types and bindings the orchestration layer is built on.

pub mod container;
pub mod error;
pub mod loader;
pub mod priority;
pub mod registry;
pub mod status;
pub mod traits;

#[cfg(test)]
mod tests;

// Re-export commonly used types
pub use container::LifecycleBindings;
pub use error::{BoxError, LifecycleError, LifecycleResult};
pub use loader::{DuplicatePolicy, LifecycleSettings};
pub use priority::{PriorityOverrides, TypeTag, DEFAULT_PRIORITY};
pub use registry::{ObservableRegistry, RegistryEvent, SubscriptionId};
pub use status::{CoordinatorStatus, PhaseReport, PhaseStatus};
pub use traits::*;
