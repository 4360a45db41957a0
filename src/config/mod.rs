use std::fs;

use log::{debug, trace, LevelFilter};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::{
    config_error,
    core::{
        error::LifecycleResult,
        loader::{load_settings, DuplicatePolicy, LifecycleSettings},
    },
};

#[derive(Default, Debug, Serialize, Deserialize, Validate)]
pub struct Config {
    #[validate(nested)]
    #[serde(default)]
    pub log: Log,

    #[serde(default)]
    pub lifecycle: Lifecycle,

    #[validate(nested)]
    #[serde(default)]
    pub priorities: Priorities,
}

// Config file load and validation
impl Config {
    pub fn load_from_yaml<P>(path: P) -> LifecycleResult<Self>
    where
        P: AsRef<std::path::Path> + std::fmt::Display,
    {
        let conf_str = fs::read_to_string(&path)
            .map_err(|e| config_error!("Unable to read conf file from {path}: {e}"))?;
        debug!("Conf file read from {path}");
        Self::from_yaml(&conf_str)
    }

    pub fn from_yaml(conf_str: &str) -> LifecycleResult<Self> {
        trace!("Read conf file: {conf_str}");
        let conf: Config = serde_yaml::from_str(conf_str)
            .map_err(|e| config_error!("Unable to parse yaml conf: {e}"))?;

        trace!("Loaded conf: {conf:?}");

        conf.validate()
            .map_err(|e| config_error!("Conf file valid failed: {e}"))?;

        Ok(conf)
    }

    pub fn to_yaml(&self) -> LifecycleResult<String> {
        serde_yaml::to_string(self).map_err(|e| config_error!(e))
    }

    /// Coordinator settings described by this document
    pub fn lifecycle_settings(&self) -> LifecycleSettings {
        load_settings(self)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, Validate)]
#[validate(schema(function = "Log::validate_level"))]
pub struct Log {
    #[serde(default = "Log::default_level")]
    pub level: String,
}

impl Default for Log {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
        }
    }
}

impl Log {
    fn default_level() -> String {
        "info".to_string()
    }

    pub fn level_filter(&self) -> LifecycleResult<LevelFilter> {
        self.level
            .parse()
            .map_err(|_| config_error!("Unknown log level '{}'", self.level))
    }

    fn validate_level(&self) -> Result<(), ValidationError> {
        if self.level.parse::<LevelFilter>().is_err() {
            return Err(ValidationError::new("unknown_log_level"));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Falls back to the build profile default when absent.
    #[serde(default)]
    pub duplicate_policy: Option<DuplicatePolicy>,
}

/// Priority override tables, one per phase.
#[derive(Clone, Debug, Default, Serialize, Deserialize, Validate)]
pub struct Priorities {
    #[validate(nested)]
    #[serde(default)]
    pub initialize: Vec<PriorityOverride>,
    #[validate(nested)]
    #[serde(default)]
    pub late_initialize: Vec<PriorityOverride>,
    #[validate(nested)]
    #[serde(default)]
    pub dispose: Vec<PriorityOverride>,
    #[validate(nested)]
    #[serde(default)]
    pub late_dispose: Vec<PriorityOverride>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "PriorityOverride::validate_type_name"))]
pub struct PriorityOverride {
    #[serde(rename = "type")]
    pub type_name: String,
    pub priority: i32,
}

impl PriorityOverride {
    fn validate_type_name(&self) -> Result<(), ValidationError> {
        if self.type_name.trim().is_empty() {
            return Err(ValidationError::new("type_required"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LifecycleError;

    fn init_log() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn test_load_file() {
        init_log();
        let conf_str = r#"
---
log:
  level: debug

lifecycle:
  duplicate_policy: fail

priorities:
  initialize:
    - type: net::Listener
      priority: -10
    - type: storage
      priority: 5
  dispose:
    - type: net::Listener
      priority: 10
        "#
        .to_string();
        let conf = Config::from_yaml(&conf_str).unwrap();

        assert_eq!(conf.log.level_filter().unwrap(), LevelFilter::Debug);
        assert_eq!(conf.lifecycle.duplicate_policy, Some(DuplicatePolicy::Fail));
        assert_eq!(conf.priorities.initialize.len(), 2);
        assert_eq!(
            conf.priorities.initialize[0],
            PriorityOverride {
                type_name: "net::Listener".to_string(),
                priority: -10,
            }
        );
        assert!(conf.priorities.late_initialize.is_empty());
        assert_eq!(conf.priorities.dispose[0].priority, 10);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        init_log();
        let conf = Config::from_yaml("{}").unwrap();
        assert_eq!(conf.log.level, "info");
        assert!(conf.lifecycle.duplicate_policy.is_none());
        assert!(conf.priorities.dispose.is_empty());
    }

    #[test]
    fn test_valid_blank_type() {
        init_log();
        let conf_str = r#"
priorities:
  late_dispose:
    - type: "  "
      priority: 1
        "#;
        let err = Config::from_yaml(conf_str).unwrap_err();
        assert!(matches!(err, LifecycleError::Configuration(_)));
    }

    #[test]
    fn test_valid_log_level() {
        init_log();
        let conf_str = r#"
log:
  level: loud
        "#;
        assert!(Config::from_yaml(conf_str).is_err());
    }

    #[test]
    fn test_unknown_duplicate_policy() {
        init_log();
        let conf_str = r#"
lifecycle:
  duplicate_policy: ignore
        "#;
        assert!(Config::from_yaml(conf_str).is_err());
    }

    #[test]
    fn test_yaml_round_trip_keeps_type_key() {
        init_log();
        let mut conf = Config::default();
        conf.priorities.dispose.push(PriorityOverride {
            type_name: "cache".to_string(),
            priority: 3,
        });
        let yaml = conf.to_yaml().unwrap();
        assert!(yaml.contains("type: cache"));

        let reloaded = Config::from_yaml(&yaml).unwrap();
        assert_eq!(reloaded.priorities.dispose, conf.priorities.dispose);
    }

    #[test]
    fn test_load_from_missing_file() {
        init_log();
        let err = Config::load_from_yaml("/nonexistent/lifecycle.yaml").unwrap_err();
        assert!(err.to_string().contains("Unable to read conf file"));
    }

    #[test]
    fn test_load_from_file() {
        init_log();
        let path = std::env::temp_dir().join(format!(
            "lifecycle-coordinator-conf-{}.yaml",
            std::process::id()
        ));
        fs::write(
            &path,
            "priorities:\n  initialize:\n    - type: db\n      priority: -1\n",
        )
        .unwrap();

        let conf = Config::load_from_yaml(path.display().to_string()).unwrap();
        fs::remove_file(&path).unwrap();
        assert_eq!(conf.priorities.initialize[0].type_name, "db");
    }
}
