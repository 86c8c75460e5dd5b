//! Error types and Result alias for typed_events
//!
//! The dispatcher itself never produces an error: listener failures are
//! returned from `emit` exactly as the listener produced them. This module
//! provides a ready-made error type that event maps can adopt for their
//! listeners, and the errors raised while loading configuration.

use thiserror::Error;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Specific kinds of configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ConfigErrorKind {
    /// For host code layering its own required settings on top of `DispatcherConfig`
    #[error("Missing required configuration")]
    MissingRequired,
    #[error("Invalid configuration value")]
    InvalidValue,
}

/// Unified error type for listeners and configuration
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Error {
    /// A listener rejected the event it was handed
    #[error("Listener for '{event}' failed: {message}")]
    Listener {
        event: String,
        message: String,
    },

    /// Configuration could not be loaded or is malformed
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        key: Option<String>,
        kind: ConfigErrorKind,
    },
}

/// Result type alias using the unified Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a listener failure for the named event
    pub fn listener<E: Into<String>, M: Into<String>>(event: E, message: M) -> Self {
        Self::Listener {
            event: event.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config<M: Into<String>>(message: M, kind: ConfigErrorKind) -> Self {
        Self::Config {
            message: message.into(),
            key: None,
            kind,
        }
    }

    /// Attach the offending configuration key
    pub fn with_key<K: Into<String>>(mut self, key: K) -> Self {
        if let Self::Config { key: slot, .. } = &mut self {
            *slot = Some(key.into());
        }
        self
    }

    pub fn is_listener(&self) -> bool {
        matches!(self, Self::Listener { .. })
    }

    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config { .. })
    }

    /// Name of the event a listener failed on, if any
    pub fn event(&self) -> Option<&str> {
        match self {
            Self::Listener { event, .. } => Some(event),
            Self::Config { .. } => None,
        }
    }

    /// Configuration key involved, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Config { key, .. } => key.as_deref(),
            Self::Listener { .. } => None,
        }
    }

    /// Get a user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Self::Listener { event, message } => {
                format!("Handling '{event}' failed: {message}")
            }
            Self::Config { message, key, kind } => match key {
                Some(key) => format!("{kind} for {key}: {message}"),
                None => format!("{kind}: {message}"),
            },
        }
    }
}
