//! Cooldown gate between successful forecast requests.

use std::sync::Mutex;
use std::time::Instant;

/// Stores the last successful forecast instant for one client.
///
/// Advisory only: the gate throttles the client it belongs to and nothing
/// else. Concurrent or multi-client callers are not coordinated here.
pub trait CooldownStore: Send + Sync {
    fn last_success(&self) -> Option<Instant>;
    fn record_success(&self, at: Instant);
}

/// Process-local store; a stand-in for client-local persistent storage.
#[derive(Debug, Default)]
pub struct InMemoryCooldownStore {
    last: Mutex<Option<Instant>>,
}

impl InMemoryCooldownStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-seeded last success.
    pub fn with_last_success(at: Instant) -> Self {
        Self {
            last: Mutex::new(Some(at)),
        }
    }
}

impl CooldownStore for InMemoryCooldownStore {
    fn last_success(&self) -> Option<Instant> {
        self.last.lock().ok().and_then(|guard| *guard)
    }

    fn record_success(&self, at: Instant) {
        if let Ok(mut guard) = self.last.lock() {
            *guard = Some(at);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty_and_remembers_the_latest_success() {
        let store = InMemoryCooldownStore::new();
        assert!(store.last_success().is_none());

        let first = Instant::now();
        store.record_success(first);
        let second = Instant::now();
        store.record_success(second);

        assert_eq!(store.last_success(), Some(second));
    }
}
