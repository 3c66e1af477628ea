//! Configuration loading and process telemetry.

/// Tracing subscriber setup.
pub mod telemetry;
/// TOML configuration (`safevault.toml`).
pub mod toml_config;
