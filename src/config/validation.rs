//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the listener address and certificate names
//! - Check the builder toolchain is named
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: FixtureConfig → Result<(), Vec<ValidationError>>
//! - Runs before the server is started

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::FixtureConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a socket address")]
    BindAddress(String),

    #[error("listener.hostnames must not be empty")]
    NoHostnames,

    #[error("builder.{0} must not be empty")]
    EmptyTool(&'static str),

    #[error("observability.log_level {0:?} is not one of trace, debug, info, warn, error")]
    LogLevel(String),
}

/// Validate a parsed configuration, collecting every problem.
pub fn validate_config(config: &FixtureConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.listener.hostnames.iter().all(|h| h.trim().is_empty()) {
        errors.push(ValidationError::NoHostnames);
    }
    if config.builder.compiler.trim().is_empty() {
        errors.push(ValidationError::EmptyTool("compiler"));
    }
    if config.builder.packager.trim().is_empty() {
        errors.push(ValidationError::EmptyTool("packager"));
    }
    if !LOG_LEVELS.contains(&config.observability.log_level.to_lowercase().as_str()) {
        errors.push(ValidationError::LogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
