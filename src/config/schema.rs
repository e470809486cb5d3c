//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the fixture.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the test server.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct FixtureConfig {
    /// Listener configuration (bind address, certificate names).
    pub listener: ListenerConfig,

    /// External tools used to build the served image.
    pub builder: BuilderConfig,

    /// Shutdown behaviour.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address; port 0 picks an ephemeral port.
    pub bind_address: String,

    /// Subject alternative names of the self-signed certificate.
    pub hostnames: Vec<String>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:0".to_string(),
            hostnames: vec!["localhost".to_string(), "127.0.0.1".to_string()],
        }
    }
}

/// External toolchain used by the image builder.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct BuilderConfig {
    /// Compiler invoked as `<compiler> build -o prog ./prog.go`.
    pub compiler: String,

    /// Packager invoked as `<packager> build <tree> <output>`.
    pub packager: String,

    /// Parent directory for per-build scratch directories.
    /// Defaults to the system temp directory.
    pub work_dir: Option<PathBuf>,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            compiler: "go".to_string(),
            packager: "actool".to_string(),
            work_dir: None,
        }
    }
}

/// Shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ShutdownConfig {
    /// How long in-flight requests may keep running after shutdown.
    /// 0 waits for all of them.
    pub drain_timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self {
            drain_timeout_secs: 10,
        }
    }
}

impl ShutdownConfig {
    pub fn drain_timeout(&self) -> Option<Duration> {
        match self.drain_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
