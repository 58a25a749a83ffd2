use crate::collections::FxDashMap;

/// Compiled stylesheet bodies, keyed by handle.
///
/// Holds at most one body per handle. Entries never expire; they stay until
/// [`Cache::clear`] is called. Every operation is
/// atomic with respect to the others, so concurrent readers never observe a
/// partially written body.
#[derive(Debug, Default)]
pub struct Cache {
    entries: FxDashMap<String, String>,
}

impl Cache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, handle: &str) -> Option<String> {
        let hit = self.entries.get(handle).map(|entry| entry.value().clone());
        tracing::trace!(handle, hit = hit.is_some(), "cache lookup");
        hit
    }

    /// Store `body` for `handle`, replacing whatever was there.
    pub fn update(&self, handle: impl Into<String>, body: impl Into<String>) {
        self.entries.insert(handle.into(), body.into());
    }

    /// Drop the entry for `handle`. Returns whether there was one.
    pub fn clear(&self, handle: &str) -> bool {
        self.entries.remove(handle).is_some()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn update_get_clear() {
        let cache = Cache::new();
        assert_eq!(cache.get("H"), None);

        cache.update("H", "value4");
        assert_eq!(cache.get("H").as_deref(), Some("value4"));

        assert!(cache.clear("H"));
        assert_eq!(cache.get("H"), None);
        assert!(!cache.clear("H"));
    }

    #[test]
    fn update_overwrites() {
        let cache = Cache::new();
        cache.update("theme", "a{}");
        cache.update("theme", "b{}");
        assert_eq!(cache.get("theme").as_deref(), Some("b{}"));
    }

    #[test]
    fn clear_only_touches_one_handle() {
        let cache = Cache::new();
        cache.update("theme", "a{}");
        cache.update("print", "b{}");
        assert!(cache.clear("theme"));
        assert_eq!(cache.get("theme"), None);
        assert_eq!(cache.get("print").as_deref(), Some("b{}"));
    }

    #[test]
    fn concurrent_readers_see_whole_bodies() {
        let cache = Arc::new(Cache::new());
        cache.update("H", "x".repeat(64));

        let writer = {
            let cache = Arc::clone(&cache);
            thread::spawn(move || {
                for _ in 0..200 {
                    cache.update("H", "y".repeat(64));
                    cache.update("H", "x".repeat(64));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let body = cache.get("H").unwrap();
                        assert!(body == "x".repeat(64) || body == "y".repeat(64));
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
    }
}
