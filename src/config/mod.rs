//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → FixtureConfig (validated, immutable)
//!     → passed by reference to lifecycle::start
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; a fixture lives for one run
//! - All fields have defaults so no file is needed at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::BuilderConfig;
pub use schema::FixtureConfig;
pub use schema::ListenerConfig;
pub use schema::ObservabilityConfig;
pub use schema::ShutdownConfig;
