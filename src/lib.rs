//! Priority-ordered lifecycle coordination.
//!
//! Participants register for the initialize, late-initialize, dispose and
//! late-dispose capabilities. Each phase runs exactly once, in priority
//! order, and stops at the first failing participant.

pub mod config;
pub mod core;
pub mod logging;
pub mod orchestration;
