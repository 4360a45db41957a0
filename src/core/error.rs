//! Unified error handling for the lifecycle coordinator
//!
//! Every failure a phase can produce is expressed as a [`LifecycleError`],
//! so the process driving startup and shutdown has one type to match on.

use std::fmt;

use super::traits::Phase;

/// Error type returned by participant entry points
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error types for the lifecycle system
#[derive(Debug)]
pub enum LifecycleError {
    /// A phase was run a second time
    AlreadyExecuted { phase: Phase },

    /// A participant was added or removed after its phase executed
    RegistrationClosed { phase: Phase, type_name: String },

    /// A participant type matched more than one distinct override priority
    AmbiguousPriority {
        type_name: String,
        priorities: Vec<i32>,
    },

    /// The same participant instance was registered twice for one phase
    DuplicateParticipant { phase: Phase, type_name: String },

    /// A participant's entry point returned an error
    ParticipantFailed {
        phase: Phase,
        type_name: String,
        source: BoxError,
    },

    /// Removal of a participant that was never registered
    NotRegistered { phase: Phase, type_name: String },

    /// Resource not found errors
    NotFound(String),

    /// Configuration-related errors
    Configuration(String),

    /// I/O errors while reading configuration
    Io(std::io::Error),

    /// Internal system errors
    Internal(String),
}

impl LifecycleError {
    /// Whether the owning process must treat the error as unrecoverable.
    ///
    /// Everything raised while running a phase is fatal. Only a missing
    /// entry on removal is left to the caller's judgement.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            LifecycleError::NotRegistered { .. } | LifecycleError::NotFound(_)
        )
    }

    /// The phase the error was raised in, if any
    pub fn phase(&self) -> Option<Phase> {
        match self {
            LifecycleError::AlreadyExecuted { phase }
            | LifecycleError::RegistrationClosed { phase, .. }
            | LifecycleError::DuplicateParticipant { phase, .. }
            | LifecycleError::ParticipantFailed { phase, .. }
            | LifecycleError::NotRegistered { phase, .. } => Some(*phase),
            _ => None,
        }
    }
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::AlreadyExecuted { phase } => {
                write!(f, "Tried to run phase '{phase}' twice")
            }
            LifecycleError::RegistrationClosed { phase, type_name } => write!(
                f,
                "Cannot change participants of phase '{phase}' after it executed (type '{type_name}')"
            ),
            LifecycleError::AmbiguousPriority {
                type_name,
                priorities,
            } => write!(
                f,
                "Ambiguous priority override for type '{type_name}': matched {priorities:?}"
            ),
            LifecycleError::DuplicateParticipant { phase, type_name } => write!(
                f,
                "Found duplicate {} with type '{type_name}'",
                phase.participant_kind()
            ),
            LifecycleError::ParticipantFailed {
                phase,
                type_name,
                source,
            } => write!(
                f,
                "Error occurred while {} {} with type '{type_name}': {source}",
                phase.verb(),
                phase.participant_kind()
            ),
            LifecycleError::NotRegistered { phase, type_name } => write!(
                f,
                "No {} with type '{type_name}' is registered",
                phase.participant_kind()
            ),
            LifecycleError::NotFound(msg) => write!(f, "Resource not found: {msg}"),
            LifecycleError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            LifecycleError::Io(err) => write!(f, "I/O error: {err}"),
            LifecycleError::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for LifecycleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LifecycleError::ParticipantFailed { source, .. } => Some(&**source),
            LifecycleError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for LifecycleError {
    fn from(err: std::io::Error) -> Self {
        LifecycleError::Io(err)
    }
}

/// Result type alias for lifecycle operations
pub type LifecycleResult<T> = std::result::Result<T, LifecycleError>;

/// Helper trait for adding context to errors
pub trait ErrorContext<T> {
    fn with_context(self, context: &str) -> LifecycleResult<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: fmt::Display,
{
    fn with_context(self, context: &str) -> LifecycleResult<T> {
        self.map_err(|e| LifecycleError::Internal(format!("{context}: {e}")))
    }
}

/// Convenience macros for error creation
#[macro_export]
macro_rules! config_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::core::error::LifecycleError::Configuration(format!($fmt $($arg)*))
    };
    ($msg:expr) => {
        $crate::core::error::LifecycleError::Configuration($msg.to_string())
    };
}

#[macro_export]
macro_rules! internal_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::core::error::LifecycleError::Internal(format!($fmt $($arg)*))
    };
    ($msg:expr) => {
        $crate::core::error::LifecycleError::Internal($msg.to_string())
    };
}
