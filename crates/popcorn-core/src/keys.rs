use crate::lock;
use std::fmt;
use std::sync::{Arc, Mutex, Weak};
use tracing::trace;

pub const ESCAPE: &str = "Escape";

type Callback = Arc<dyn Fn() + Send + Sync>;

struct Listener {
    id: u64,
    key: String,
    callback: Callback,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: Vec<Listener>,
}

/// Global key listeners scoped to the lifetime of a view.
///
/// [`KeyDispatcher::bind`] installs one listener and hands back a
/// [`KeyBinding`]; dropping the binding removes exactly that listener.
#[derive(Clone, Default)]
pub struct KeyDispatcher {
    registry: Arc<Mutex<Registry>>,
}

/// Live listener registration. Unbinds on drop.
#[must_use = "the listener is removed as soon as the binding is dropped"]
pub struct KeyBinding {
    id: u64,
    key: String,
    registry: Weak<Mutex<Registry>>,
}

impl KeyDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind<F>(&self, key: &str, callback: F) -> KeyBinding
    where
        F: Fn() + Send + Sync + 'static,
    {
        let mut registry = lock(&self.registry);
        registry.next_id += 1;
        let id = registry.next_id;
        registry.listeners.push(Listener {
            id,
            key: key.to_string(),
            callback: Arc::new(callback),
        });
        trace!(key, id, listeners = registry.listeners.len(), "Bound key listener");

        KeyBinding {
            id,
            key: key.to_string(),
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Run every listener bound to `key` (case-insensitive). Returns how many ran.
    pub fn dispatch(&self, key: &str) -> usize {
        // Callbacks run without the registry lock so they may drop bindings.
        let matching: Vec<Callback> = lock(&self.registry)
            .listeners
            .iter()
            .filter(|l| l.key.eq_ignore_ascii_case(key))
            .map(|l| Arc::clone(&l.callback))
            .collect();

        for callback in &matching {
            callback();
        }
        trace!(key, invoked = matching.len(), "Dispatched key");
        matching.len()
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.registry).listeners.len()
    }
}

impl fmt::Debug for KeyDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyDispatcher")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl KeyBinding {
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Same as dropping, spelled out at call sites.
    pub fn unbind(self) {}
}

impl Drop for KeyBinding {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = lock(&registry);
            registry.listeners.retain(|l| l.id != self.id);
            trace!(key = %self.key, id = self.id, "Unbound key listener");
        }
    }
}

impl fmt::Debug for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyBinding")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish()
    }
}
