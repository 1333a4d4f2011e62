//! Runtime configuration.
//!
//! Held in a thread-local like the rest of the runtime state. Set it once at
//! startup with [`configure`]; later reads see the new values.
//!
//! ```ignore
//! use spark_dom::{configure, RuntimeConfig};
//!
//! configure(RuntimeConfig {
//!     style_prefix: "app-".into(),
//!     ..RuntimeConfig::from_env()
//! });
//! ```

use std::cell::RefCell;

/// Environment variable overriding [`RuntimeConfig::style_prefix`].
pub const ENV_STYLE_PREFIX: &str = "SPARK_DOM_STYLE_PREFIX";
/// Environment variable overriding [`RuntimeConfig::strict_dispose`].
pub const ENV_STRICT_DISPOSE: &str = "SPARK_DOM_STRICT_DISPOSE";
/// Environment variable overriding [`RuntimeConfig::dispatch_detached`].
pub const ENV_DISPATCH_DETACHED: &str = "SPARK_DOM_DISPATCH_DETACHED";

/// Default prefix for scoped style ids.
pub const DEFAULT_STYLE_PREFIX: &str = "spark-";

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Tunables for the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Prefix of every generated [`StyleId`](crate::StyleId) token.
    pub style_prefix: String,

    /// Report a second `Component::dispose()` as
    /// [`RuntimeError::DoubleDispose`](crate::RuntimeError::DoubleDispose)
    /// instead of ignoring it.
    pub strict_dispose: bool,

    /// Deliver dispatched events to nodes inside detached blocks.
    pub dispatch_detached: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            style_prefix: DEFAULT_STYLE_PREFIX.to_string(),
            strict_dispose: false,
            dispatch_detached: false,
        }
    }
}

impl RuntimeConfig {
    /// Defaults overridden by `SPARK_DOM_*` environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(prefix) = std::env::var(ENV_STYLE_PREFIX) {
            if !prefix.is_empty() {
                config.style_prefix = prefix;
            }
        }
        if let Some(flag) = env_flag(ENV_STRICT_DISPOSE) {
            config.strict_dispose = flag;
        }
        if let Some(flag) = env_flag(ENV_DISPATCH_DETACHED) {
            config.dispatch_detached = flag;
        }
        config
    }
}

fn env_flag(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    parse_flag(&value)
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

// =============================================================================
// Thread-local State
// =============================================================================

thread_local! {
    static CONFIG: RefCell<RuntimeConfig> = RefCell::new(RuntimeConfig::default());
}

/// Replace the active configuration.
pub fn configure(config: RuntimeConfig) {
    tracing::debug!(?config, "runtime configured");
    CONFIG.with(|c| *c.borrow_mut() = config);
}

/// Snapshot of the active configuration.
pub fn config() -> RuntimeConfig {
    CONFIG.with(|c| c.borrow().clone())
}

/// Read one field without cloning the whole configuration.
pub(crate) fn with_config<R>(f: impl FnOnce(&RuntimeConfig) -> R) -> R {
    CONFIG.with(|c| f(&c.borrow()))
}

/// Restore the default configuration (for testing).
pub fn reset_config() {
    CONFIG.with(|c| *c.borrow_mut() = RuntimeConfig::default());
}
