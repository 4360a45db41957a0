//! Component lifecycle management
//!
//! This module owns the four lifecycle phases of a process and runs each
//! of them exactly once, in priority order.

use std::sync::Arc;

use log::{error, info};

use crate::core::{
    container::LifecycleBindings,
    error::LifecycleResult,
    loader::LifecycleSettings,
    status::CoordinatorStatus,
    traits::{
        Disposable, Dispose, Initializable, Initialize, LateDisposable, LateDispose,
        LateInitializable, LateInitialize,
    },
};

use super::phase::PhaseRunner;

/// Manages the lifecycle of registered participants
///
/// Startup runs `Initialize` then `LateInitialize`; shutdown runs
/// `Dispose` then `LateDispose`, each disposal phase tearing down in the
/// reverse order of its initialization counterpart.
pub struct LifecycleCoordinator {
    initialize: PhaseRunner<Initialize>,
    late_initialize: PhaseRunner<LateInitialize>,
    dispose: PhaseRunner<Dispose>,
    late_dispose: PhaseRunner<LateDispose>,
}

impl Default for LifecycleCoordinator {
    fn default() -> Self {
        Self::new(LifecycleSettings::default())
    }
}

impl LifecycleCoordinator {
    /// Create a coordinator with no participants
    pub fn new(settings: LifecycleSettings) -> Self {
        let policy = settings.duplicate_policy;
        Self {
            initialize: PhaseRunner::new(settings.initialize, policy),
            late_initialize: PhaseRunner::new(settings.late_initialize, policy),
            dispose: PhaseRunner::new(settings.dispose, policy),
            late_dispose: PhaseRunner::new(settings.late_dispose, policy),
        }
    }

    /// Create a coordinator from the participant lists handed over by the
    /// container. Every priority is resolved here, so an ambiguous
    /// override fails construction.
    pub fn from_bindings(
        bindings: LifecycleBindings,
        settings: LifecycleSettings,
    ) -> LifecycleResult<Self> {
        let coordinator = Self::new(settings);

        for participant in bindings.initializables {
            coordinator.initialize.register(participant)?;
        }
        for participant in bindings.late_initializables {
            coordinator.late_initialize.register(participant)?;
        }
        for participant in bindings.disposables {
            coordinator.dispose.register(participant)?;
        }
        for participant in bindings.late_disposables {
            coordinator.late_dispose.register(participant)?;
        }

        info!(
            "Lifecycle coordinator created with {} initializables, {} late initializables, {} disposables, {} late disposables",
            coordinator.initialize.len()?,
            coordinator.late_initialize.len()?,
            coordinator.dispose.len()?,
            coordinator.late_dispose.len()?
        );
        Ok(coordinator)
    }

    pub fn add_initializable(&self, participant: Arc<dyn Initializable>) -> LifecycleResult<i32> {
        self.initialize.register(participant)
    }

    pub fn add_initializable_with_priority(
        &self,
        participant: Arc<dyn Initializable>,
        priority: i32,
    ) -> LifecycleResult<()> {
        self.initialize.register_with_priority(participant, priority)
    }

    pub fn remove_initializable(&self, participant: &Arc<dyn Initializable>) -> LifecycleResult<()> {
        self.initialize.remove(participant)
    }

    pub fn add_late_initializable(
        &self,
        participant: Arc<dyn LateInitializable>,
    ) -> LifecycleResult<i32> {
        self.late_initialize.register(participant)
    }

    pub fn add_late_initializable_with_priority(
        &self,
        participant: Arc<dyn LateInitializable>,
        priority: i32,
    ) -> LifecycleResult<()> {
        self.late_initialize
            .register_with_priority(participant, priority)
    }

    pub fn remove_late_initializable(
        &self,
        participant: &Arc<dyn LateInitializable>,
    ) -> LifecycleResult<()> {
        self.late_initialize.remove(participant)
    }

    pub fn add_disposable(&self, participant: Arc<dyn Disposable>) -> LifecycleResult<i32> {
        self.dispose.register(participant)
    }

    pub fn add_disposable_with_priority(
        &self,
        participant: Arc<dyn Disposable>,
        priority: i32,
    ) -> LifecycleResult<()> {
        self.dispose.register_with_priority(participant, priority)
    }

    pub fn remove_disposable(&self, participant: &Arc<dyn Disposable>) -> LifecycleResult<()> {
        self.dispose.remove(participant)
    }

    pub fn add_late_disposable(
        &self,
        participant: Arc<dyn LateDisposable>,
    ) -> LifecycleResult<i32> {
        self.late_dispose.register(participant)
    }

    pub fn add_late_disposable_with_priority(
        &self,
        participant: Arc<dyn LateDisposable>,
        priority: i32,
    ) -> LifecycleResult<()> {
        self.late_dispose.register_with_priority(participant, priority)
    }

    pub fn remove_late_disposable(
        &self,
        participant: &Arc<dyn LateDisposable>,
    ) -> LifecycleResult<()> {
        self.late_dispose.remove(participant)
    }

    pub fn initialize(&self) -> LifecycleResult<()> {
        self.initialize.run()
    }

    pub fn late_initialize(&self) -> LifecycleResult<()> {
        self.late_initialize.run()
    }

    pub fn dispose(&self) -> LifecycleResult<()> {
        self.dispose.run()
    }

    pub fn late_dispose(&self) -> LifecycleResult<()> {
        self.late_dispose.run()
    }

    /// Run both initialization phases
    pub fn startup(&self) -> LifecycleResult<()> {
        info!("Starting component initialization...");
        self.initialize()
            .and_then(|_| self.late_initialize())
            .inspect_err(|e| error!("Startup aborted: {e}"))?;
        info!("Component initialization completed successfully");
        Ok(())
    }

    /// Run both disposal phases
    pub fn shutdown(&self) -> LifecycleResult<()> {
        info!("Starting graceful shutdown...");
        self.dispose()
            .and_then(|_| self.late_dispose())
            .inspect_err(|e| error!("Shutdown aborted: {e}"))?;
        info!("Graceful shutdown completed");
        Ok(())
    }

    pub fn status(&self) -> LifecycleResult<CoordinatorStatus> {
        Ok(CoordinatorStatus {
            phases: vec![
                self.initialize.report()?,
                self.late_initialize.report()?,
                self.dispose.report()?,
                self.late_dispose.report()?,
            ],
        })
    }

    pub fn initializables(&self) -> &PhaseRunner<Initialize> {
        &self.initialize
    }

    pub fn late_initializables(&self) -> &PhaseRunner<LateInitialize> {
        &self.late_initialize
    }

    pub fn disposables(&self) -> &PhaseRunner<Dispose> {
        &self.dispose
    }

    pub fn late_disposables(&self) -> &PhaseRunner<LateDispose> {
        &self.late_dispose
    }
}
