//! Declarative event map definitions
//!
//! Implementing [`EventMap`](crate::EventMap) and [`Event`](crate::Event) by
//! hand means one marker type and impl block per event. [`event_map!`] writes
//! them from a compact listing of event names and argument types.

/// Declare an event map and its event keys
///
/// Each event becomes a unit struct implementing [`Event`](crate::Event) whose
/// `Args` is the tuple of the listed argument types (`()` when none are
/// given). The error type after the colon is what listeners return; it
/// defaults to [`typed_events::Error`](crate::Error) when omitted.
///
/// # Examples
///
/// ```rust
/// use typed_events::{event_map, Dispatcher, Listener};
///
/// event_map! {
///     /// Lifecycle of a client session
///     pub SessionEvents {
///         Opened(u64, String),
///         Closed,
///     }
/// }
///
/// let sessions = Dispatcher::<SessionEvents>::new();
/// let opened = Listener::<Opened>::new(|(id, peer)| {
///     println!("session {id} opened by {peer}");
///     Ok(())
/// });
///
/// sessions.on(opened.clone());
/// assert_eq!(sessions.emit::<Opened>((7, "10.0.0.1".to_string())), Ok(true));
/// assert_eq!(sessions.emit::<Closed>(()), Ok(false));
///
/// sessions.off(&opened);
/// assert!(sessions.is_empty());
/// ```
///
/// With a custom listener error:
///
/// ```rust
/// use typed_events::{event_map, Dispatcher, Listener};
///
/// event_map! {
///     pub Uploads: std::io::Error {
///         Chunk(Vec<u8>),
///     }
/// }
///
/// let uploads = Dispatcher::<Uploads>::new();
/// uploads.on(Listener::<Chunk>::new(|(bytes,)| {
///     if bytes.is_empty() {
///         return Err(std::io::Error::new(std::io::ErrorKind::InvalidData, "empty chunk"));
///     }
///     Ok(())
/// }));
///
/// assert!(uploads.emit::<Chunk>((vec![],)).is_err());
/// ```
#[macro_export]
macro_rules! event_map {
    (
        $(#[$meta:meta])*
        $vis:vis $map:ident : $error:ty {
            $(
                $(#[$event_meta:meta])*
                $event:ident $( ( $($arg:ty),* $(,)? ) )?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        $vis struct $map;

        impl $crate::EventMap for $map {
            type Error = $error;
            const NAME: &'static str = stringify!($map);
        }

        $(
            $(#[$event_meta])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
            $vis struct $event;

            impl $crate::Event for $event {
                type Map = $map;
                type Args = ( $( $($arg,)* )? );
                const NAME: &'static str = stringify!($event);
            }
        )*
    };

    (
        $(#[$meta:meta])*
        $vis:vis $map:ident { $($body:tt)* }
    ) => {
        $crate::event_map! {
            $(#[$meta])*
            $vis $map : $crate::Error { $($body)* }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::{Dispatcher, Event, EventMap, Listener};

    event_map! {
        Signals {
            Ping,
            Move(i32, i32),
            Label(String,),
        }
    }

    event_map! {
        Faults: &'static str {
            Tripped(u8),
        }
    }

    #[test]
    fn test_generated_names() {
        assert_eq!(<Signals as EventMap>::NAME, "Signals");
        assert_eq!(<Ping as Event>::NAME, "Ping");
        assert_eq!(<Move as Event>::NAME, "Move");
    }

    #[test]
    fn test_generated_args_shape() {
        let signals = Dispatcher::<Signals>::new();
        signals
            .on(Listener::<Ping>::new(|_| Ok(())))
            .on(Listener::<Move>::new(|(x, y)| {
                assert_eq!((*x, *y), (3, -4));
                Ok(())
            }))
            .on(Listener::<Label>::new(|(text,)| {
                assert_eq!(text, "north");
                Ok(())
            }));

        assert_eq!(signals.emit::<Ping>(()), Ok(true));
        assert_eq!(signals.emit::<Move>((3, -4)), Ok(true));
        assert_eq!(signals.emit::<Label>(("north".to_string(),)), Ok(true));
    }

    #[test]
    fn test_custom_error_type() {
        let faults = Dispatcher::<Faults>::new();
        faults.on(Listener::<Tripped>::new(|(code,)| {
            if *code > 3 {
                Err("breaker tripped")
            } else {
                Ok(())
            }
        }));

        assert_eq!(faults.emit::<Tripped>((1,)), Ok(true));
        assert_eq!(faults.emit::<Tripped>((9,)), Err("breaker tripped"));
    }

    #[test]
    fn test_default_error_type() {
        let signals = Dispatcher::<Signals>::new();
        signals.on(Listener::<Ping>::new(|_| {
            Err(crate::Error::listener(<Ping as Event>::NAME, "unreachable peer"))
        }));

        let err = signals.emit::<Ping>(()).unwrap_err();
        assert_eq!(err.event(), Some("Ping"));
    }
}
