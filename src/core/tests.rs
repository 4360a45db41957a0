//! Tests for the core module
//!
//! Error reporting and participant bindings, exercised the way the
//! orchestration layer and its callers use them.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::{
        config_error,
        core::{
            container::LifecycleBindings,
            error::{BoxError, ErrorContext, LifecycleError, LifecycleResult},
            traits::{Disposable, Initializable, LateDisposable, Participant, Phase},
        },
        internal_error,
    };

    struct Socket;

    impl Participant for Socket {}

    impl Initializable for Socket {
        fn initialize(&self) -> Result<(), BoxError> {
            Ok(())
        }
    }

    impl Disposable for Socket {
        fn dispose(&self) -> Result<(), BoxError> {
            Ok(())
        }
    }

    impl LateDisposable for Socket {
        fn late_dispose(&self) -> Result<(), BoxError> {
            Ok(())
        }
    }

    /// Test error messages name the phase and the participant type
    #[test]
    fn test_error_messages() {
        let err = LifecycleError::ParticipantFailed {
            phase: Phase::LateDispose,
            type_name: "db::Pool".to_string(),
            source: "connection reset".into(),
        };
        assert_eq!(
            err.to_string(),
            "Error occurred while late disposing LateDisposable with type 'db::Pool': connection reset"
        );
        assert_eq!(err.phase(), Some(Phase::LateDispose));
        assert!(err.is_fatal());

        let err = LifecycleError::DuplicateParticipant {
            phase: Phase::Initialize,
            type_name: "db::Pool".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Found duplicate Initializable with type 'db::Pool'"
        );

        let err = LifecycleError::AlreadyExecuted {
            phase: Phase::Dispose,
        };
        assert_eq!(err.to_string(), "Tried to run phase 'dispose' twice");

        let err = LifecycleError::AmbiguousPriority {
            type_name: "db::Pool".to_string(),
            priorities: vec![1, 2],
        };
        assert!(err.to_string().contains("[1, 2]"));
        assert_eq!(err.phase(), None);
    }

    /// Test error handling and conversion
    #[test]
    fn test_error_handling() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: LifecycleError = io_error.into();
        assert!(matches!(err, LifecycleError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());

        let missing = LifecycleError::NotRegistered {
            phase: Phase::Dispose,
            type_name: "Socket".to_string(),
        };
        assert!(!missing.is_fatal());

        let result: Result<(), String> = Err("boom".to_string());
        match result.with_context("loading") {
            Err(LifecycleError::Internal(msg)) => assert_eq!(msg, "loading: boom"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_error_macros() {
        let name = "late";
        let result: LifecycleResult<()> = Err(config_error!("bad phase '{}'", name));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Configuration error: bad phase 'late'"
        );

        let err = config_error!("inline {name}");
        assert_eq!(err.to_string(), "Configuration error: inline late");

        let err = internal_error!(String::from("plain"));
        assert_eq!(err.to_string(), "Internal error: plain");
    }

    /// Test bindings keep one list per capability
    #[test]
    fn test_bindings() {
        let socket = Arc::new(Socket);

        let mut bindings = LifecycleBindings::new();
        assert!(bindings.is_empty());

        bindings
            .bind_scoped(socket.clone())
            .bind_late_disposable(socket.clone());

        assert!(!bindings.is_empty());
        assert_eq!(bindings.count(Phase::Initialize), 1);
        assert_eq!(bindings.count(Phase::LateInitialize), 0);
        assert_eq!(bindings.count(Phase::Dispose), 1);
        assert_eq!(bindings.count(Phase::LateDispose), 1);

        let bindings = LifecycleBindings::new()
            .with_initializable(socket.clone())
            .with_initializable(socket);
        assert_eq!(bindings.count(Phase::Initialize), 2);
    }
}
