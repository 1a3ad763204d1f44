//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig (validated, immutable)
//!     → passed by reference into startup
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; the network mode never changes afterwards
//! - Required sections (`general`, `parameters`) have no defaults
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{
    FeeConfig, ListenerConfig, LogFormat, NodeEndpoint, ObservabilityConfig, ServiceConfig,
    TimeoutConfig, TlsConfig,
};
