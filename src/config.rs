//! Dispatcher configuration
//!
//! Settings can be built in code or read from the process environment:
//!
//! - `TYPED_EVENTS_MAX_LISTENERS`: leak warning threshold per event (0 disables)
//! - `TYPED_EVENTS_TRACE_EMITS`: log every emission at debug level (`1`/`true`/`0`/`false`)

use crate::error::{ConfigErrorKind, Error, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MAX_LISTENERS_ENV: &str = "TYPED_EVENTS_MAX_LISTENERS";
pub const TRACE_EMITS_ENV: &str = "TYPED_EVENTS_TRACE_EMITS";

/// Listener count above which a possible leak is reported
pub const DEFAULT_MAX_LISTENERS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatcherConfig {
    /// Per-event listener count that triggers a leak warning; 0 means unlimited
    pub max_listeners: usize,
    /// Emit a debug record for every `emit` call
    pub trace_emits: bool,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_listeners: DEFAULT_MAX_LISTENERS,
            trace_emits: false,
        }
    }
}

impl DispatcherConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_listeners(mut self, max: usize) -> Self {
        self.max_listeners = max;
        self
    }

    pub fn trace_emits(mut self, enabled: bool) -> Self {
        self.trace_emits = enabled;
        self
    }

    /// Load overrides from the process environment on top of the defaults
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load overrides through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(MAX_LISTENERS_ENV) {
            config.max_listeners = raw.trim().parse().map_err(|_| {
                Error::config(
                    format!("expected a non-negative integer, got '{raw}'"),
                    ConfigErrorKind::InvalidValue,
                )
                .with_key(MAX_LISTENERS_ENV)
            })?;
        }

        if let Some(raw) = lookup(TRACE_EMITS_ENV) {
            config.trace_emits = parse_flag(&raw).ok_or_else(|| {
                Error::config(
                    format!("expected 1, 0, true or false, got '{raw}'"),
                    ConfigErrorKind::InvalidValue,
                )
                .with_key(TRACE_EMITS_ENV)
            })?;
        }

        Ok(config.validate())
    }

    /// Normalise settings. Tracing emissions is pointless without the `tracing` feature.
    pub fn validate(self) -> Self {
        let trace_emits = self.trace_emits && cfg!(feature = "tracing");
        Self {
            trace_emits,
            ..self
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}
