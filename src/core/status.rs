use super::traits::Phase;

/// Where a single phase stands.
///
/// A phase leaves `Pending` exactly once. `Running` and `Failed` count as
/// executed: there is no way back to `Pending` and no retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhaseStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl PhaseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PhaseStatus::Pending => "pending",
            PhaseStatus::Running => "running",
            PhaseStatus::Completed => "completed",
            PhaseStatus::Failed => "failed",
        }
    }

    pub fn has_run(&self) -> bool {
        !matches!(self, PhaseStatus::Pending)
    }
}

/// Diagnostic view of one phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseReport {
    pub phase: Phase,
    pub status: PhaseStatus,
    pub participant_count: usize,
}

/// Snapshot of all four phases of a coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorStatus {
    pub phases: Vec<PhaseReport>,
}

impl CoordinatorStatus {
    pub fn phase(&self, phase: Phase) -> Option<&PhaseReport> {
        self.phases.iter().find(|report| report.phase == phase)
    }

    fn completed(&self, phase: Phase) -> bool {
        self.phase(phase)
            .is_some_and(|report| report.status == PhaseStatus::Completed)
    }

    /// Both initialization phases completed successfully.
    pub fn is_started(&self) -> bool {
        self.completed(Phase::Initialize) && self.completed(Phase::LateInitialize)
    }

    /// Both disposal phases completed successfully.
    pub fn is_shut_down(&self) -> bool {
        self.completed(Phase::Dispose) && self.completed(Phase::LateDispose)
    }

    /// Any phase that ran and failed.
    pub fn failed_phase(&self) -> Option<Phase> {
        self.phases
            .iter()
            .find(|report| report.status == PhaseStatus::Failed)
            .map(|report| report.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(statuses: [PhaseStatus; 4]) -> CoordinatorStatus {
        CoordinatorStatus {
            phases: Phase::ALL
                .iter()
                .zip(statuses)
                .map(|(phase, status)| PhaseReport {
                    phase: *phase,
                    status,
                    participant_count: 0,
                })
                .collect(),
        }
    }

    #[test]
    fn test_initial_state_not_started() {
        let status = status([PhaseStatus::Pending; 4]);
        assert!(!status.is_started());
        assert!(!status.is_shut_down());
        assert_eq!(status.failed_phase(), None);
    }

    #[test]
    fn test_started_after_both_initialization_phases() {
        let status = status([
            PhaseStatus::Completed,
            PhaseStatus::Completed,
            PhaseStatus::Pending,
            PhaseStatus::Pending,
        ]);
        assert!(status.is_started());
        assert!(!status.is_shut_down());
    }

    #[test]
    fn test_failed_phase_is_reported() {
        let status = status([
            PhaseStatus::Completed,
            PhaseStatus::Failed,
            PhaseStatus::Pending,
            PhaseStatus::Pending,
        ]);
        assert!(!status.is_started());
        assert_eq!(status.failed_phase(), Some(Phase::LateInitialize));
        assert!(PhaseStatus::Failed.has_run());
        assert!(PhaseStatus::Running.has_run());
        assert!(!PhaseStatus::Pending.has_run());
    }
}
