//! Core traits for lifecycle participants
//!
//! This module defines the capabilities a participant may implement and
//! the [`Capability`] seam that lets one phase engine drive all of them.

use std::fmt;

use super::{error::BoxError, priority::TypeTag};

/// The four lifecycle phases, in the order a process triggers them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Initialize,
    LateInitialize,
    Dispose,
    LateDispose,
}

/// Direction a phase walks its priority-sorted participants in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionOrder {
    /// Lowest priority first, ties in registration order.
    Ascending,
    /// Exact reverse of [`ExecutionOrder::Ascending`].
    Descending,
}

impl Phase {
    pub const ALL: [Phase; 4] = [
        Phase::Initialize,
        Phase::LateInitialize,
        Phase::Dispose,
        Phase::LateDispose,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Initialize => "initialize",
            Phase::LateInitialize => "late_initialize",
            Phase::Dispose => "dispose",
            Phase::LateDispose => "late_dispose",
        }
    }

    /// Progressive form used in error messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Phase::Initialize => "initializing",
            Phase::LateInitialize => "late initializing",
            Phase::Dispose => "disposing",
            Phase::LateDispose => "late disposing",
        }
    }

    /// Name of the capability a participant of this phase implements.
    pub fn participant_kind(&self) -> &'static str {
        match self {
            Phase::Initialize => "Initializable",
            Phase::LateInitialize => "LateInitializable",
            Phase::Dispose => "Disposable",
            Phase::LateDispose => "LateDisposable",
        }
    }

    /// Disposal releases in the opposite order of acquisition.
    pub fn order(&self) -> ExecutionOrder {
        match self {
            Phase::Initialize | Phase::LateInitialize => ExecutionOrder::Ascending,
            Phase::Dispose | Phase::LateDispose => ExecutionOrder::Descending,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Any object registered against one or more lifecycle capabilities.
///
/// Identity is the `Arc` allocation the participant lives in, never value
/// equality. The tags replace run-time inheritance checks: a participant
/// matches an override whose tag equals its own tag or one of its
/// ancestor tags.
pub trait Participant: Send + Sync {
    /// Stable identifier of the concrete type.
    fn type_tag(&self) -> TypeTag {
        TypeTag::from(std::any::type_name_of_val(self))
    }

    /// Identifiers of the families this type derives from.
    fn ancestor_tags(&self) -> Vec<TypeTag> {
        Vec::new()
    }

    /// Name used when reporting errors about this participant.
    fn type_name(&self) -> String {
        self.type_tag().to_string()
    }
}

pub trait Initializable: Participant {
    fn initialize(&self) -> Result<(), BoxError>;
}

pub trait LateInitializable: Participant {
    fn late_initialize(&self) -> Result<(), BoxError>;
}

pub trait Disposable: Participant {
    fn dispose(&self) -> Result<(), BoxError>;
}

pub trait LateDisposable: Participant {
    fn late_dispose(&self) -> Result<(), BoxError>;
}

/// Binds a participant trait object to the phase that invokes it.
///
/// The phase runner is generic over this trait, so ordering, duplicate
/// detection and error wrapping exist once for all four phases.
pub trait Capability: 'static {
    type Target: Participant + ?Sized + 'static;

    const PHASE: Phase;

    fn invoke(target: &Self::Target) -> Result<(), BoxError>;
}

pub struct Initialize;

pub struct LateInitialize;

pub struct Dispose;

pub struct LateDispose;

impl Capability for Initialize {
    type Target = dyn Initializable;
    const PHASE: Phase = Phase::Initialize;

    fn invoke(target: &Self::Target) -> Result<(), BoxError> {
        target.initialize()
    }
}

impl Capability for LateInitialize {
    type Target = dyn LateInitializable;
    const PHASE: Phase = Phase::LateInitialize;

    fn invoke(target: &Self::Target) -> Result<(), BoxError> {
        target.late_initialize()
    }
}

impl Capability for Dispose {
    type Target = dyn Disposable;
    const PHASE: Phase = Phase::Dispose;

    fn invoke(target: &Self::Target) -> Result<(), BoxError> {
        target.dispose()
    }
}

impl Capability for LateDispose {
    type Target = dyn LateDisposable;
    const PHASE: Phase = Phase::LateDispose;

    fn invoke(target: &Self::Target) -> Result<(), BoxError> {
        target.late_dispose()
    }
}
