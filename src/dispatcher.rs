//! Synchronous typed event dispatcher
//!
//! [`Dispatcher`] keeps one ordered listener sequence per event key and walks
//! it on every [`emit`](Dispatcher::emit). All operations take `&self`; the
//! registry lock is released before any listener runs, so listeners may
//! freely call back into the dispatcher that invoked them.
//!
//! Emission works on a snapshot of the sequence taken when `emit` starts:
//! listeners added mid-emission first run on the next `emit`, and listeners
//! removed mid-emission still run in the current pass. One-shot entries are
//! detached from the live registry right before their callback runs and are
//! never invoked twice, even under reentrant emission.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::DispatcherConfig;
use crate::event::{Event, EventMap, Listener};

/// A registered listener with its type erased so every event shares one registry
struct Entry {
    id: u64,
    once: bool,
    fired: AtomicBool,
    listener: Box<dyn Any + Send + Sync>,
}

impl Entry {
    fn new<E: Event>(id: u64, listener: Listener<E>, once: bool) -> Self {
        Self {
            id,
            once,
            fired: AtomicBool::new(false),
            listener: Box::new(listener),
        }
    }

    fn listener<E: Event>(&self) -> Option<&Listener<E>> {
        self.listener.downcast_ref::<Listener<E>>()
    }

    fn is<E: Event>(&self, listener: &Listener<E>) -> bool {
        self.listener::<E>()
            .is_some_and(|registered| registered.ptr_eq(listener))
    }
}

/// Listener sequence for one event key
struct Slot {
    name: &'static str,
    /// Order in which the event first gained a listener
    seq: u64,
    entries: Vec<Arc<Entry>>,
    /// Leak warning already reported since the slot was created
    warned: bool,
}

#[derive(Default)]
struct Registry {
    slots: HashMap<TypeId, Slot>,
    next_seq: u64,
    next_id: u64,
}

impl Registry {
    /// Detach the first entry of `key` matching `pred`, dropping the slot once empty.
    ///
    /// The entry is handed back so the caller can drop it after releasing the
    /// lock; its callback may own values whose `Drop` re-enters the dispatcher.
    fn remove_first<P>(&mut self, key: TypeId, pred: P) -> Option<Arc<Entry>>
    where
        P: Fn(&Entry) -> bool,
    {
        let slot = self.slots.get_mut(&key)?;
        let removed = slot
            .entries
            .iter()
            .position(|entry| pred(entry))
            .map(|index| slot.entries.remove(index));

        if slot.entries.is_empty() {
            self.slots.remove(&key);
        }
        removed
    }

    fn ordered_slots(&self) -> Vec<&Slot> {
        let mut slots: Vec<&Slot> = self.slots.values().collect();
        slots.sort_by_key(|slot| slot.seq);
        slots
    }
}

/// In-process event dispatcher for the events declared by `M`
pub struct Dispatcher<M: EventMap> {
    registry: Mutex<Registry>,
    max_listeners: AtomicUsize,
    #[cfg_attr(not(feature = "tracing"), allow(dead_code))]
    trace_emits: bool,
    _map: PhantomData<fn() -> M>,
}

impl<M: EventMap> Dispatcher<M> {
    /// Create an empty dispatcher with default settings
    pub fn new() -> Self {
        Self::with_config(DispatcherConfig::default())
    }

    /// Create an empty dispatcher, normalising `config` first
    pub fn with_config(config: DispatcherConfig) -> Self {
        let config = config.validate();
        Self {
            registry: Mutex::new(Registry::default()),
            max_listeners: AtomicUsize::new(config.max_listeners),
            trace_emits: config.trace_emits,
            _map: PhantomData,
        }
    }

    /// Append a listener to the end of the event's sequence
    pub fn on<E: Event<Map = M>>(&self, listener: Listener<E>) -> &Self {
        self.insert(listener, false, false)
    }

    /// Append a listener that is removed right before its first invocation
    pub fn once<E: Event<Map = M>>(&self, listener: Listener<E>) -> &Self {
        self.insert(listener, true, false)
    }

    /// Insert a listener at the front of the event's sequence
    pub fn prepend_listener<E: Event<Map = M>>(&self, listener: Listener<E>) -> &Self {
        self.insert(listener, false, true)
    }

    /// Insert a one-shot listener at the front of the event's sequence
    pub fn prepend_once_listener<E: Event<Map = M>>(&self, listener: Listener<E>) -> &Self {
        self.insert(listener, true, true)
    }

    /// Remove the first registration of `listener`, one-shot entries included.
    ///
    /// Removing a listener that is not registered does nothing.
    pub fn off<E: Event<Map = M>>(&self, listener: &Listener<E>) -> &Self {
        let removed = self
            .registry
            .lock()
            .remove_first(TypeId::of::<E>(), |entry| entry.is(listener));

        #[cfg(feature = "tracing")]
        {
            if removed.is_some() {
                tracing::trace!(map = M::NAME, event = E::NAME, "listener removed");
            }
        }
        drop(removed);

        self
    }

    /// Alias of [`off`](Self::off)
    pub fn remove_listener<E: Event<Map = M>>(&self, listener: &Listener<E>) -> &Self {
        self.off(listener)
    }

    /// Drop every listener of one event
    pub fn remove_all_listeners_for<E: Event<Map = M>>(&self) -> &Self {
        let removed = self.registry.lock().slots.remove(&TypeId::of::<E>());
        drop(removed);
        self
    }

    /// Drop every listener of every event
    pub fn remove_all_listeners(&self) -> &Self {
        let removed = std::mem::take(&mut self.registry.lock().slots);
        drop(removed);
        self
    }

    /// Invoke every listener of `E` in sequence order.
    ///
    /// Returns `Ok(true)` if the event had listeners when emission started and
    /// `Ok(false)` otherwise. The first listener error is returned unchanged
    /// and the remaining listeners of this pass are skipped.
    pub fn emit<E: Event<Map = M>>(&self, args: E::Args) -> Result<bool, M::Error> {
        let key = TypeId::of::<E>();
        let snapshot: Vec<Arc<Entry>> = self
            .registry
            .lock()
            .slots
            .get(&key)
            .map(|slot| slot.entries.clone())
            .unwrap_or_default();

        #[cfg(feature = "tracing")]
        {
            if self.trace_emits {
                tracing::debug!(
                    map = M::NAME,
                    event = E::NAME,
                    listeners = snapshot.len(),
                    "emitting event"
                );
            }
        }

        if snapshot.is_empty() {
            return Ok(false);
        }

        for entry in &snapshot {
            if entry.once {
                if entry.fired.swap(true, Ordering::AcqRel) {
                    continue;
                }
                let detached = self
                    .registry
                    .lock()
                    .remove_first(key, |registered| registered.id == entry.id);
                drop(detached);
            }

            if let Some(listener) = entry.listener::<E>() {
                listener.call(&args)?;
            }
        }

        Ok(true)
    }

    /// Snapshot of the event's listeners in invocation order
    pub fn listeners<E: Event<Map = M>>(&self) -> Vec<Listener<E>> {
        self.registry
            .lock()
            .slots
            .get(&TypeId::of::<E>())
            .map(|slot| {
                slot.entries
                    .iter()
                    .filter_map(|entry| entry.listener::<E>().cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of listeners registered for `E`, one-shot entries included
    pub fn listener_count<E: Event<Map = M>>(&self) -> usize {
        self.registry
            .lock()
            .slots
            .get(&TypeId::of::<E>())
            .map_or(0, |slot| slot.entries.len())
    }

    /// Names of events that currently have listeners, in first-registration order
    pub fn event_names(&self) -> Vec<&'static str> {
        self.registry
            .lock()
            .ordered_slots()
            .into_iter()
            .map(|slot| slot.name)
            .collect()
    }

    /// Whether no event has any listener
    pub fn is_empty(&self) -> bool {
        self.registry.lock().slots.is_empty()
    }

    /// Per-event listener count above which a leak warning is logged (0 = unlimited)
    pub fn max_listeners(&self) -> usize {
        self.max_listeners.load(Ordering::Relaxed)
    }

    /// Change the leak warning threshold for later registrations
    pub fn set_max_listeners(&self, max: usize) -> &Self {
        self.max_listeners.store(max, Ordering::Relaxed);
        self
    }

    fn insert<E: Event<Map = M>>(&self, listener: Listener<E>, once: bool, prepend: bool) -> &Self {
        let max = self.max_listeners();
        let mut guard = self.registry.lock();
        let Registry {
            slots,
            next_seq,
            next_id,
        } = &mut *guard;

        let id = *next_id;
        *next_id += 1;

        let slot = slots.entry(TypeId::of::<E>()).or_insert_with(|| {
            let seq = *next_seq;
            *next_seq += 1;
            Slot {
                name: E::NAME,
                seq,
                entries: Vec::new(),
                warned: false,
            }
        });

        let entry = Arc::new(Entry::new(id, listener, once));
        if prepend {
            slot.entries.insert(0, entry);
        } else {
            slot.entries.push(entry);
        }

        let count = slot.entries.len();

        #[cfg(feature = "tracing")]
        tracing::trace!(
            map = M::NAME,
            event = E::NAME,
            once,
            prepend,
            count,
            "listener registered"
        );

        if max > 0 && count > max && !slot.warned {
            slot.warned = true;
            #[cfg(feature = "tracing")]
            tracing::warn!(
                map = M::NAME,
                event = E::NAME,
                count,
                max,
                "possible listener leak: more listeners than the configured maximum"
            );
        }

        self
    }
}

impl<M: EventMap> Default for Dispatcher<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: EventMap> fmt::Debug for Dispatcher<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registry = self.registry.lock();
        let events: Vec<(&'static str, usize)> = registry
            .ordered_slots()
            .into_iter()
            .map(|slot| (slot.name, slot.entries.len()))
            .collect();

        f.debug_struct("Dispatcher")
            .field("map", &M::NAME)
            .field("events", &events)
            .field("max_listeners", &self.max_listeners())
            .finish()
    }
}
