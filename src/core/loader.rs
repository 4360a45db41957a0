//! Settings loading
//!
//! Turns the configuration document into the per-phase override tables
//! and duplicate policy a coordinator is constructed with.

use log::info;
use serde::{Deserialize, Serialize};

use crate::config::{Config, PriorityOverride};

use super::{priority::PriorityOverrides, traits::Phase};

/// What a phase does when the same participant instance is registered twice.
///
/// The check always runs; the policy only decides whether a hit aborts the
/// phase or is logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DuplicatePolicy {
    Fail,
    Warn,
}

impl Default for DuplicatePolicy {
    /// `Fail` in debug builds, `Warn` in release builds.
    fn default() -> Self {
        if cfg!(debug_assertions) {
            DuplicatePolicy::Fail
        } else {
            DuplicatePolicy::Warn
        }
    }
}

/// Construction parameters of a lifecycle coordinator
#[derive(Debug, Clone, Default)]
pub struct LifecycleSettings {
    pub initialize: PriorityOverrides,
    pub late_initialize: PriorityOverrides,
    pub dispose: PriorityOverrides,
    pub late_dispose: PriorityOverrides,
    pub duplicate_policy: DuplicatePolicy,
}

impl LifecycleSettings {
    pub fn overrides(&self, phase: Phase) -> &PriorityOverrides {
        match phase {
            Phase::Initialize => &self.initialize,
            Phase::LateInitialize => &self.late_initialize,
            Phase::Dispose => &self.dispose,
            Phase::LateDispose => &self.late_dispose,
        }
    }

    pub fn with_overrides(mut self, phase: Phase, overrides: PriorityOverrides) -> Self {
        match phase {
            Phase::Initialize => self.initialize = overrides,
            Phase::LateInitialize => self.late_initialize = overrides,
            Phase::Dispose => self.dispose = overrides,
            Phase::LateDispose => self.late_dispose = overrides,
        }
        self
    }

    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }
}

/// Build coordinator settings from a validated configuration
pub fn load_settings(config: &Config) -> LifecycleSettings {
    let priorities = &config.priorities;
    let settings = LifecycleSettings {
        initialize: to_overrides(&priorities.initialize),
        late_initialize: to_overrides(&priorities.late_initialize),
        dispose: to_overrides(&priorities.dispose),
        late_dispose: to_overrides(&priorities.late_dispose),
        duplicate_policy: config.lifecycle.duplicate_policy.unwrap_or_default(),
    };

    for phase in Phase::ALL {
        info!(
            "Loaded {} priority overrides for phase '{}'",
            settings.overrides(phase).len(),
            phase
        );
    }
    settings
}

fn to_overrides(entries: &[PriorityOverride]) -> PriorityOverrides {
    entries
        .iter()
        .map(|entry| (entry.type_name.trim().to_string(), entry.priority))
        .collect()
}
