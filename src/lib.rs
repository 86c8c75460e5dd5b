//! # typed_events - Statically Typed Event Dispatch
//!
//! This crate provides a synchronous, in-process publish/subscribe dispatcher
//! whose events are declared up front:
//!
//! - Event maps name a closed family of events and the error their listeners return
//! - Each event key fixes the exact argument tuple it carries
//! - Listeners are invoked in registration order, with explicit prepends and one-shot listeners
//! - Listener failures abort the emission and surface unchanged to the emitter
//!
//! ## Design Principles
//!
//! - **Compile-Time Contracts**: undeclared events and mismatched arguments do not compile
//! - **Synchronous**: `emit` runs every listener to completion before returning
//! - **Reentrant**: listeners may subscribe, unsubscribe and emit on the dispatcher that called them
//! - **Fail-Fast**: no listener isolation, retries or error bookkeeping
//!
//! ## Example
//!
//! ```rust
//! use typed_events::prelude::*;
//!
//! event_map! {
//!     pub Jobs {
//!         Queued(u32),
//!         Finished(u32, bool),
//!     }
//! }
//!
//! let jobs = Dispatcher::<Jobs>::new();
//! let announce = Listener::<Queued>::new(|(id,)| {
//!     println!("job {id} queued");
//!     Ok(())
//! });
//!
//! jobs.on(announce.clone())
//!     .once(Listener::<Queued>::new(|_| Ok(())));
//!
//! assert_eq!(jobs.listener_count::<Queued>(), 2);
//! assert_eq!(jobs.emit::<Queued>((1,)), Ok(true));
//! assert_eq!(jobs.listener_count::<Queued>(), 1);
//! assert_eq!(jobs.emit::<Finished>((1, true)), Ok(false));
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod event;
pub mod macros;

// Re-export commonly used types
pub use config::DispatcherConfig;
pub use dispatcher::Dispatcher;
pub use error::{ConfigErrorKind, Error, Result};
pub use event::{Event, EventMap, Listener, ListenerError, ListenerResult};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::DispatcherConfig;
    pub use crate::dispatcher::Dispatcher;
    pub use crate::error::{Error, Result};
    pub use crate::event::{Event, EventMap, Listener, ListenerResult};
    pub use crate::event_map;
}
