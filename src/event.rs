//! Event maps, event keys and listener handles
//!
//! An [`EventMap`] names a family of events and the error type its listeners
//! may return. Each event key is a zero-sized type implementing [`Event`],
//! which pins the key to one map and fixes the argument tuple emitted with it.
//! Because a [`Dispatcher`](crate::Dispatcher) only accepts `E: Event<Map = M>`,
//! subscribing to an undeclared event or emitting the wrong arguments is a
//! compile error rather than a runtime check.

use std::fmt;
use std::sync::Arc;

/// A declared family of events sharing one dispatcher
pub trait EventMap: 'static {
    /// Error a listener may return to abort an emission
    type Error: 'static;

    /// Human-readable name of the map, used in diagnostics
    const NAME: &'static str;
}

/// An event key belonging to exactly one [`EventMap`]
pub trait Event: 'static {
    type Map: EventMap;

    /// Argument tuple handed to every listener of this event
    type Args: 'static;

    const NAME: &'static str;
}

/// Error type listeners of `E` return
pub type ListenerError<E> = <<E as Event>::Map as EventMap>::Error;

/// Outcome of a single listener invocation
pub type ListenerResult<E> = Result<(), ListenerError<E>>;

type Callback<E> = dyn Fn(&<E as Event>::Args) -> ListenerResult<E> + Send + Sync;

/// Handle to a listener callback
///
/// Cloning a handle does not create a new listener: all clones share one
/// identity, which is what [`Dispatcher::off`](crate::Dispatcher::off)
/// matches against. Two handles built from identical closures are still two
/// different listeners.
pub struct Listener<E: Event> {
    callback: Arc<Callback<E>>,
}

impl<E: Event> Listener<E> {
    pub fn new<F>(callback: F) -> Self
    where
        F: Fn(&E::Args) -> ListenerResult<E> + Send + Sync + 'static,
    {
        Self {
            callback: Arc::new(callback),
        }
    }

    /// Invoke the callback directly, bypassing any dispatcher
    pub fn call(&self, args: &E::Args) -> ListenerResult<E> {
        (self.callback)(args)
    }

    /// Whether both handles refer to the same listener
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.callback, &other.callback)
    }
}

impl<E: Event> Clone for Listener<E> {
    fn clone(&self) -> Self {
        Self {
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<E: Event> fmt::Debug for Listener<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listener")
            .field("event", &E::NAME)
            .field("callback", &Arc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counters;

    impl EventMap for Counters {
        type Error = String;
        const NAME: &'static str = "Counters";
    }

    struct Bump;

    impl Event for Bump {
        type Map = Counters;
        type Args = (usize,);
        const NAME: &'static str = "Bump";
    }

    #[test]
    fn test_clone_shares_identity() {
        let listener = Listener::<Bump>::new(|_| Ok(()));
        let clone = listener.clone();
        let twin = Listener::<Bump>::new(|_| Ok(()));

        assert!(listener.ptr_eq(&clone));
        assert!(!listener.ptr_eq(&twin));
    }

    #[test]
    fn test_call_passes_arguments() {
        let total = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&total);
        let listener = Listener::<Bump>::new(move |(n,)| {
            sink.fetch_add(*n, Ordering::Relaxed);
            Ok(())
        });

        listener.call(&(3,)).unwrap();
        listener.call(&(4,)).unwrap();
        assert_eq!(total.load(Ordering::Relaxed), 7);
    }

    #[test]
    fn test_call_returns_listener_error() {
        let listener = Listener::<Bump>::new(|(n,)| Err(format!("rejected {n}")));
        assert_eq!(listener.call(&(9,)), Err("rejected 9".to_string()));
    }
}
