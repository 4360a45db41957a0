//! Phase execution
//!
//! [`PhaseRunner`] drives one lifecycle phase to completion. It is generic
//! over the [`Capability`] it invokes, so the initialization and disposal
//! phases share one implementation of ordering, duplicate detection and
//! error wrapping.

use std::{
    collections::HashSet,
    marker::PhantomData,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use log::{debug, error, info};

use crate::{
    core::{
        error::{LifecycleError, LifecycleResult},
        loader::DuplicatePolicy,
        priority::PriorityOverrides,
        registry::same_instance,
        status::{PhaseReport, PhaseStatus},
        traits::{Capability, ExecutionOrder, Participant, Phase},
    },
    internal_error,
};

/// A participant paired with its resolved priority
pub struct PhaseRecord<T: ?Sized> {
    pub participant: Arc<T>,
    pub priority: i32,
}

impl<T: ?Sized> Clone for PhaseRecord<T> {
    fn clone(&self) -> Self {
        Self {
            participant: self.participant.clone(),
            priority: self.priority,
        }
    }
}

/// Diagnostic view of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseEntry {
    pub type_name: String,
    pub priority: i32,
}

struct PhaseState<T: ?Sized> {
    records: Vec<PhaseRecord<T>>,
    status: PhaseStatus,
}

/// Runs one phase exactly once, in priority order.
///
/// Registration and execution share one lock, so a runner may be used
/// from several threads. The lock is not held while participants run.
pub struct PhaseRunner<C: Capability> {
    overrides: PriorityOverrides,
    duplicate_policy: DuplicatePolicy,
    state: Mutex<PhaseState<C::Target>>,
    _capability: PhantomData<fn() -> C>,
}

impl<C: Capability> Default for PhaseRunner<C> {
    fn default() -> Self {
        Self::new(PriorityOverrides::default(), DuplicatePolicy::default())
    }
}

impl<C: Capability> PhaseRunner<C> {
    pub fn new(overrides: PriorityOverrides, duplicate_policy: DuplicatePolicy) -> Self {
        Self {
            overrides,
            duplicate_policy,
            state: Mutex::new(PhaseState {
                records: Vec::new(),
                status: PhaseStatus::Pending,
            }),
            _capability: PhantomData,
        }
    }

    pub fn phase(&self) -> Phase {
        C::PHASE
    }

    pub fn overrides(&self) -> &PriorityOverrides {
        &self.overrides
    }

    fn lock(&self) -> LifecycleResult<MutexGuard<'_, PhaseState<C::Target>>> {
        self.state
            .lock()
            .map_err(|_| internal_error!("state of phase '{}' is poisoned", C::PHASE))
    }

    fn ensure_open(state: &PhaseState<C::Target>, participant: &C::Target) -> LifecycleResult<()> {
        if state.status.has_run() {
            return Err(LifecycleError::RegistrationClosed {
                phase: C::PHASE,
                type_name: participant.type_name(),
            });
        }
        Ok(())
    }

    /// Append a participant with a priority resolved from the override
    /// table. Returns the resolved priority.
    pub fn register(&self, participant: Arc<C::Target>) -> LifecycleResult<i32> {
        let priority = self.overrides.resolve(participant.as_ref())?;
        self.register_with_priority(participant, priority)?;
        Ok(priority)
    }

    /// Append a participant with an explicit priority, bypassing the
    /// override table.
    pub fn register_with_priority(
        &self,
        participant: Arc<C::Target>,
        priority: i32,
    ) -> LifecycleResult<()> {
        let mut state = self.lock()?;
        Self::ensure_open(&state, participant.as_ref())?;

        debug!(
            "Registered {} '{}' with priority {}",
            C::PHASE.participant_kind(),
            participant.type_name(),
            priority
        );
        state.records.push(PhaseRecord {
            participant,
            priority,
        });
        Ok(())
    }

    /// Remove a previously registered participant by identity.
    pub fn remove(&self, participant: &Arc<C::Target>) -> LifecycleResult<()> {
        let mut state = self.lock()?;
        Self::ensure_open(&state, participant.as_ref())?;

        let position = state
            .records
            .iter()
            .position(|record| same_instance(&record.participant, participant))
            .ok_or_else(|| LifecycleError::NotRegistered {
                phase: C::PHASE,
                type_name: participant.type_name(),
            })?;
        state.records.remove(position);
        debug!(
            "Removed {} '{}'",
            C::PHASE.participant_kind(),
            participant.type_name()
        );
        Ok(())
    }

    /// Execute the phase.
    ///
    /// The phase is marked as executed before any participant runs, so a
    /// failure leaves it closed. The first failing participant aborts the
    /// phase; the ones after it are never invoked.
    pub fn run(&self) -> LifecycleResult<()> {
        let phase = C::PHASE;
        let ordered = {
            let mut state = self.lock()?;
            if state.status.has_run() {
                return Err(LifecycleError::AlreadyExecuted { phase });
            }
            state.status = PhaseStatus::Running;

            // stable: equal priorities keep registration order
            state.records.sort_by_key(|record| record.priority);
            if phase.order() == ExecutionOrder::Descending {
                state.records.reverse();
            }
            state.records.clone()
        };

        info!(phase = phase.as_str(), participants = ordered.len(); "Running lifecycle phase");
        let started = Instant::now();

        let result = self
            .check_duplicates(&ordered)
            .and_then(|_| Self::invoke_all(&ordered));

        let status = if result.is_ok() {
            PhaseStatus::Completed
        } else {
            PhaseStatus::Failed
        };
        self.lock()?.status = status;

        if result.is_ok() {
            info!(
                phase = phase.as_str(),
                elapsed_ms = started.elapsed().as_millis() as u64;
                "Lifecycle phase completed"
            );
        }
        result
    }

    fn check_duplicates(&self, ordered: &[PhaseRecord<C::Target>]) -> LifecycleResult<()> {
        let mut seen = HashSet::with_capacity(ordered.len());
        for record in ordered {
            if seen.insert(Arc::as_ptr(&record.participant).cast::<()>()) {
                continue;
            }

            let type_name = record.participant.type_name();
            match self.duplicate_policy {
                DuplicatePolicy::Fail => {
                    return Err(LifecycleError::DuplicateParticipant {
                        phase: C::PHASE,
                        type_name,
                    });
                }
                DuplicatePolicy::Warn => error!(
                    "Found duplicate {} with type '{}' in phase '{}'",
                    C::PHASE.participant_kind(),
                    type_name,
                    C::PHASE
                ),
            }
        }
        Ok(())
    }

    fn invoke_all(ordered: &[PhaseRecord<C::Target>]) -> LifecycleResult<()> {
        for record in ordered {
            let participant = record.participant.as_ref();
            let started = Instant::now();

            if let Err(source) = C::invoke(participant) {
                let type_name = participant.type_name();
                error!(
                    "Error occurred while {} {} with type '{}': {}",
                    C::PHASE.verb(),
                    C::PHASE.participant_kind(),
                    type_name,
                    source
                );
                return Err(LifecycleError::ParticipantFailed {
                    phase: C::PHASE,
                    type_name,
                    source,
                });
            }

            debug!(
                "{}.{}() took {:?}",
                participant.type_name(),
                C::PHASE,
                started.elapsed()
            );
        }
        Ok(())
    }

    pub fn status(&self) -> LifecycleResult<PhaseStatus> {
        Ok(self.lock()?.status)
    }

    pub fn has_run(&self) -> LifecycleResult<bool> {
        Ok(self.status()?.has_run())
    }

    pub fn len(&self) -> LifecycleResult<usize> {
        Ok(self.lock()?.records.len())
    }

    pub fn is_empty(&self) -> LifecycleResult<bool> {
        Ok(self.len()? == 0)
    }

    pub fn report(&self) -> LifecycleResult<PhaseReport> {
        let state = self.lock()?;
        Ok(PhaseReport {
            phase: C::PHASE,
            status: state.status,
            participant_count: state.records.len(),
        })
    }

    /// Records in registration order before the phase runs, in execution
    /// order afterwards.
    pub fn snapshot(&self) -> LifecycleResult<Vec<PhaseEntry>> {
        let state = self.lock()?;
        Ok(state
            .records
            .iter()
            .map(|record| PhaseEntry {
                type_name: record.participant.type_name(),
                priority: record.priority,
            })
            .collect())
    }
}
