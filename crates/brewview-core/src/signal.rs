//! Signal/slot system for brewview.
//!
//! This module provides the change channel used throughout the crate: domain
//! records emit a signal whenever one of their fields mutates, and models
//! connect slots (callbacks) to re-render in response.
//!
//! # Key Types
//!
//! - [`Signal<Args>`] - The signal type for emitting notifications
//! - [`ConnectionId`] - Unique identifier returned when connecting a slot
//!
//! # Delivery
//!
//! Every slot is invoked synchronously on the emitting thread before `emit`
//! returns. The slot list is snapshotted before delivery, so a slot may
//! connect or disconnect slots on the same signal without deadlocking; such
//! changes take effect from the next emission.
//!
//! # Example
//!
//! ```
//! use brewview_core::Signal;
//!
//! let name_changed = Signal::<String>::new();
//!
//! let conn_id = name_changed.connect(|name| {
//!     println!("Renamed to: {}", name);
//! });
//!
//! name_changed.emit("Pale Ale".to_string());
//! name_changed.disconnect(conn_id);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::{SlotMap, new_key_type};

use crate::logging::{span_names, targets};

new_key_type! {
    /// A unique identifier for a signal-slot connection.
    ///
    /// Use this ID to disconnect a specific connection via [`Signal::disconnect`].
    /// Keys are generation-checked: once disconnected, an ID never matches a
    /// later connection.
    pub struct ConnectionId;
}

type Slot<Args> = Arc<dyn Fn(&Args) + Send + Sync>;

/// Slots keyed by id, plus the order they were connected in.
///
/// The slot map reuses freed slots, so its iteration order is not the
/// connection order.
struct Connections<Args> {
    slots: SlotMap<ConnectionId, Slot<Args>>,
    order: Vec<ConnectionId>,
}

/// A type-safe signal that can have multiple connected slots.
///
/// # Type Parameter
///
/// - `Args`: The argument type passed to connected slots. Use `()` for signals
///   with no arguments, or a tuple like `(String, i32)` for multiple arguments.
///
/// # Thread Safety
///
/// `Signal<Args>` is `Send + Sync`. There is no queued delivery: slots always
/// run on the thread that calls [`emit`](Self::emit).
pub struct Signal<Args> {
    connections: Mutex<Connections<Args>>,
}

impl<Args: 'static> Default for Signal<Args> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Args: 'static> std::fmt::Debug for Signal<Args> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("connections", &self.connection_count())
            .finish()
    }
}

impl<Args: 'static> Signal<Args> {
    /// Create a new signal with no connections.
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(Connections {
                slots: SlotMap::with_key(),
                order: Vec::new(),
            }),
        }
    }

    /// Connect a slot (closure) to this signal.
    ///
    /// Returns a `ConnectionId` that can be used to disconnect the slot later.
    pub fn connect<F>(&self, slot: F) -> ConnectionId
    where
        F: Fn(&Args) + Send + Sync + 'static,
    {
        let mut connections = self.connections.lock();
        let id = connections.slots.insert(Arc::new(slot));
        connections.order.push(id);
        id
    }

    /// Disconnect a specific slot by its connection ID.
    ///
    /// Returns `true` if the connection was found and removed, `false` otherwise.
    pub fn disconnect(&self, id: ConnectionId) -> bool {
        let mut connections = self.connections.lock();
        if connections.slots.remove(id).is_none() {
            return false;
        }
        connections.order.retain(|&other| other != id);
        true
    }

    /// Get the number of connected slots.
    pub fn connection_count(&self) -> usize {
        self.connections.lock().slots.len()
    }

    /// Emit the signal, invoking all connected slots in connection order.
    pub fn emit(&self, args: Args) {
        let slots: Vec<Slot<Args>> = {
            let connections = self.connections.lock();
            connections
                .order
                .iter()
                .filter_map(|&id| connections.slots.get(id).cloned())
                .collect()
        };
        let _span = tracing::trace_span!(
            target: targets::SIGNAL,
            span_names::SIGNAL,
            connection_count = slots.len()
        )
        .entered();

        for slot in slots {
            slot(&args);
        }
    }
}

static_assertions::assert_impl_all!(Signal<String>: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_connect_emit() {
        let signal = Signal::<i32>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        signal.connect(move |&value| {
            received_clone.lock().push(value);
        });

        signal.emit(42);
        signal.emit(100);

        assert_eq!(*received.lock(), vec![42, 100]);
    }

    #[test]
    fn test_disconnect_by_id() {
        let signal = Signal::<&'static str>::new();
        let received = Arc::new(Mutex::new(Vec::new()));

        let received_clone = received.clone();
        let table = signal.connect(move |&property| {
            received_clone.lock().push(property);
        });
        let editor = signal.connect(|_| {});

        signal.emit("amount_kg");
        assert!(signal.disconnect(table));
        assert!(!signal.disconnect(table));
        assert_eq!(signal.connection_count(), 1);
        signal.emit("name");

        assert_eq!(*received.lock(), vec!["amount_kg"]);

        // A stale id never matches a newer connection.
        let _later = signal.connect(|_| {});
        assert!(!signal.disconnect(table));
        assert!(signal.disconnect(editor));
    }

    #[test]
    fn test_emit_follows_connection_order_after_reuse() {
        let signal = Signal::<()>::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let connect = |name: &'static str| {
            let order = order.clone();
            signal.connect(move |_| order.lock().push(name))
        };
        let first = connect("first");
        connect("second");
        assert!(signal.disconnect(first));
        connect("third");
        connect("fourth");

        signal.emit(());
        assert_eq!(*order.lock(), vec!["second", "third", "fourth"]);
    }

    #[test]
    fn test_slot_may_disconnect_reentrantly() {
        let signal = Arc::new(Signal::<i32>::new());
        let hits = Arc::new(Mutex::new(0));

        let id_cell = Arc::new(Mutex::new(None));
        let signal_clone = signal.clone();
        let id_clone = id_cell.clone();
        let hits_clone = hits.clone();
        let id = signal.connect(move |_| {
            *hits_clone.lock() += 1;
            if let Some(id) = id_clone.lock().take() {
                signal_clone.disconnect(id);
            }
        });
        *id_cell.lock() = Some(id);

        signal.emit(1);
        signal.emit(2);
        assert_eq!(*hits.lock(), 1);
    }

    #[test]
    fn test_emit_from_other_thread_runs_there() {
        let signal = Arc::new(Signal::<u32>::new());
        let total = Arc::new(Mutex::new(0));

        let total_clone = total.clone();
        signal.connect(move |&n| {
            *total_clone.lock() += n;
        });

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let signal = signal.clone();
                std::thread::spawn(move || {
                    for _ in 0..10 {
                        signal.emit(1);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*total.lock(), 40);
    }
}
