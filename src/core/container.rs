//! Participant bindings
//!
//! The dependency container that discovers and constructs participants
//! lives outside this crate. It hands its results over through
//! [`LifecycleBindings`]: one list per capability, in discovery order.

use std::sync::Arc;

use super::traits::{Disposable, Initializable, LateDisposable, LateInitializable, Phase};

/// Participants per capability, as supplied by the external container
#[derive(Default)]
pub struct LifecycleBindings {
    pub(crate) initializables: Vec<Arc<dyn Initializable>>,
    pub(crate) late_initializables: Vec<Arc<dyn LateInitializable>>,
    pub(crate) disposables: Vec<Arc<dyn Disposable>>,
    pub(crate) late_disposables: Vec<Arc<dyn LateDisposable>>,
}

impl LifecycleBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_initializable(mut self, participant: Arc<dyn Initializable>) -> Self {
        self.bind_initializable(participant);
        self
    }

    pub fn with_late_initializable(mut self, participant: Arc<dyn LateInitializable>) -> Self {
        self.bind_late_initializable(participant);
        self
    }

    pub fn with_disposable(mut self, participant: Arc<dyn Disposable>) -> Self {
        self.bind_disposable(participant);
        self
    }

    pub fn with_late_disposable(mut self, participant: Arc<dyn LateDisposable>) -> Self {
        self.bind_late_disposable(participant);
        self
    }

    pub fn bind_initializable(&mut self, participant: Arc<dyn Initializable>) -> &mut Self {
        self.initializables.push(participant);
        self
    }

    pub fn bind_late_initializable(
        &mut self,
        participant: Arc<dyn LateInitializable>,
    ) -> &mut Self {
        self.late_initializables.push(participant);
        self
    }

    pub fn bind_disposable(&mut self, participant: Arc<dyn Disposable>) -> &mut Self {
        self.disposables.push(participant);
        self
    }

    pub fn bind_late_disposable(&mut self, participant: Arc<dyn LateDisposable>) -> &mut Self {
        self.late_disposables.push(participant);
        self
    }

    /// Bind one instance to both the initialize and dispose lists.
    pub fn bind_scoped<P>(&mut self, participant: Arc<P>) -> &mut Self
    where
        P: Initializable + Disposable + 'static,
    {
        self.initializables.push(participant.clone());
        self.disposables.push(participant);
        self
    }

    /// Number of participants bound for a phase
    pub fn count(&self, phase: Phase) -> usize {
        match phase {
            Phase::Initialize => self.initializables.len(),
            Phase::LateInitialize => self.late_initializables.len(),
            Phase::Dispose => self.disposables.len(),
            Phase::LateDispose => self.late_disposables.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        Phase::ALL.iter().all(|phase| self.count(*phase) == 0)
    }
}
