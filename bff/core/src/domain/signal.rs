// Copyright (c) 2026 RAGE Research Assistant
// SPDX-License-Identifier: AGPL-3.0
//! # Signal
//!
//! Single-slot observer bridging presenters to whatever consumes view
//! models (an RPC reply, a client-side state cell, a test assertion).
//!
//! `set(value)` invokes the currently bound handler, if any. There is no
//! buffering, no fan-out and no history: binding a new handler replaces
//! the previous one, and values published while unbound are dropped.

use parking_lot::Mutex;
use std::sync::Arc;

type Handler<T> = Arc<dyn Fn(T) + Send + Sync>;

pub struct Signal<T> {
    slot: Arc<Mutex<Option<Handler<T>>>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Default for Signal<T> {
    fn default() -> Self {
        Self {
            slot: Arc::new(Mutex::new(None)),
        }
    }
}

impl<T> std::fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Signal")
            .field("bound", &self.is_bound())
            .finish()
    }
}

impl<T> Signal<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_handler(handler: impl Fn(T) + Send + Sync + 'static) -> Self {
        let signal = Self::new();
        signal.bind(handler);
        signal
    }

    /// Bind `handler`, replacing any previous one.
    pub fn bind(&self, handler: impl Fn(T) + Send + Sync + 'static) {
        *self.slot.lock() = Some(Arc::new(handler));
    }

    pub fn unbind(&self) {
        self.slot.lock().take();
    }

    pub fn is_bound(&self) -> bool {
        self.slot.lock().is_some()
    }

    /// Publish `value` to the bound handler.
    ///
    /// The handler runs outside the slot lock so it may rebind the signal.
    pub fn set(&self, value: T) {
        let handler = self.slot.lock().clone();
        if let Some(handler) = handler {
            handler(value);
        }
    }
}

impl<T: Clone + Send + 'static> Signal<T> {
    /// A signal whose handler records the last published value.
    pub fn capture() -> (Self, Captured<T>) {
        let captured = Captured {
            last: Arc::new(Mutex::new(None)),
        };
        let sink = Arc::clone(&captured.last);
        let signal = Self::with_handler(move |value| {
            *sink.lock() = Some(value);
        });
        (signal, captured)
    }
}

/// Read side of [`Signal::capture`].
#[derive(Clone)]
pub struct Captured<T> {
    last: Arc<Mutex<Option<T>>>,
}

impl<T: Clone> Captured<T> {
    pub fn latest(&self) -> Option<T> {
        self.last.lock().clone()
    }

    pub fn take(&self) -> Option<T> {
        self.last.lock().take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn unbound_signal_drops_values() {
        let signal: Signal<u32> = Signal::new();
        assert!(!signal.is_bound());
        signal.set(1);
    }

    #[test]
    fn rebinding_replaces_the_handler() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let signal = Signal::new();
        let f = Arc::clone(&first);
        signal.bind(move |v: usize| {
            f.fetch_add(v, Ordering::SeqCst);
        });
        signal.set(1);

        let s = Arc::clone(&second);
        signal.bind(move |v: usize| {
            s.fetch_add(v, Ordering::SeqCst);
        });
        signal.set(10);

        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 10);
    }

    #[test]
    fn capture_keeps_only_the_last_value() {
        let (signal, captured) = Signal::capture();
        signal.set("a");
        signal.set("b");
        assert_eq!(captured.latest(), Some("b"));
        assert_eq!(captured.take(), Some("b"));
        assert_eq!(captured.latest(), None);
    }

    #[test]
    fn handler_may_unbind_itself() {
        let signal: Signal<u8> = Signal::new();
        let inner = signal.clone();
        signal.bind(move |_| inner.unbind());
        signal.set(0);
        assert!(!signal.is_bound());
    }
}
