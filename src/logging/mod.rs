use env_logger::{Builder, Env};

use crate::{
    config,
    core::error::{ErrorContext, LifecycleResult},
};

/// Build a logger from the `log` section of the configuration.
///
/// The configured level is the default; `RUST_LOG` directives are applied
/// on top of it.
pub fn build_logger(config: &config::Log) -> LifecycleResult<Builder> {
    let mut builder = Builder::new();
    builder
        .filter_level(config.level_filter()?)
        .parse_env(Env::default())
        .format_timestamp_millis();
    Ok(builder)
}

/// Install the global logger. Fails if a logger is already installed.
pub fn init_logger(config: &config::Log) -> LifecycleResult<()> {
    build_logger(config)?
        .try_init()
        .with_context("Failed to install logger")
}
