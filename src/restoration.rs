//! Host-provided state restoration, consumed as a key/value snapshot
//! facility with scoped registration.
//!
//! The multi-branch shell persists each branch's encoded history under a
//! derived key. Registration is RAII: a [`ScopedRestoration`] acquires its
//! keys on construction and releases them on drop, on every exit path, so a
//! shell removed from the tree never leaves keys registered.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::Value;
use tracing::debug;

/// Key/value snapshot store supplied by the host framework.
///
/// The core treats it as opaque: values are plain serde trees, `None`
/// writes clear a key. The single-threaded model makes `Rc<RefCell<..>>`
/// the sharing vehicle (see [`SharedStore`]).
pub trait RestorationStore {
    /// Announce that `key` will be read and written by a live owner.
    fn register(&mut self, key: &str);
    /// Release a previously registered key.
    fn unregister(&mut self, key: &str);
    /// Read the persisted value for `key`, if any.
    fn read(&self, key: &str) -> Option<Value>;
    /// Persist (or with `None`, clear) the value for `key`.
    fn write(&mut self, key: &str, value: Option<Value>);
}

/// Shared handle to the host's restoration store.
pub type SharedStore = Rc<RefCell<dyn RestorationStore>>;

/// RAII registration of a set of restoration keys.
///
/// Keys are registered on acquisition and unregistered on drop.
pub struct ScopedRestoration {
    store: SharedStore,
    keys: Vec<String>,
}

impl ScopedRestoration {
    /// Register `keys` with the store and hold them until drop.
    #[must_use]
    pub fn acquire(store: SharedStore, keys: Vec<String>) -> Self {
        {
            let mut guard = store.borrow_mut();
            for key in &keys {
                guard.register(key);
            }
        }
        debug!(keys = keys.len(), "restoration scope acquired");
        Self { store, keys }
    }

    /// Read one of the scope's keys.
    #[must_use]
    pub fn read(&self, key: &str) -> Option<Value> {
        self.store.borrow().read(key)
    }

    /// Write one of the scope's keys.
    pub fn write(&self, key: &str, value: Option<Value>) {
        self.store.borrow_mut().write(key, value);
    }

    /// The keys held by this scope.
    #[must_use]
    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

impl Drop for ScopedRestoration {
    fn drop(&mut self) {
        let mut guard = self.store.borrow_mut();
        for key in &self.keys {
            guard.unregister(key);
        }
        debug!(keys = self.keys.len(), "restoration scope released");
    }
}

/// In-memory [`RestorationStore`] for tests and hosts without platform
/// persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    registered: HashSet<String>,
    values: HashMap<String, Value>,
}

impl MemoryStore {
    /// An empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seed a value, as a platform restore would before registration.
    pub fn seed(&mut self, key: impl Into<String>, value: Value) {
        self.values.insert(key.into(), value);
    }

    /// True while `key` is held by a live scope.
    #[must_use]
    pub fn is_registered(&self, key: &str) -> bool {
        self.registered.contains(key)
    }
}

impl RestorationStore for MemoryStore {
    fn register(&mut self, key: &str) {
        self.registered.insert(key.to_string());
    }

    fn unregister(&mut self, key: &str) {
        self.registered.remove(key);
    }

    fn read(&self, key: &str) -> Option<Value> {
        self.values.get(key).cloned()
    }

    fn write(&mut self, key: &str, value: Option<Value>) {
        match value {
            Some(v) => {
                self.values.insert(key.to_string(), v);
            }
            None => {
                self.values.remove(key);
            }
        }
    }
}
