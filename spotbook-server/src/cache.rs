use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task;
use tokio::time::{sleep, Duration, Instant};

pub struct Config {
    pub enabled: bool,
    pub ttl: Duration,
}

struct Entry<V> {
    value: Arc<V>,
    expires: Instant,
}

/// Rendered artifacts keyed by resource. Entries expire after `ttl` and are
/// dropped eagerly whenever the resource they describe changes.
pub struct Cache<K, V> {
    enabled: bool,
    inner: RwLock<HashMap<K, Entry<V>>>,
    ttl: Duration,
}

impl<K, V> Cache<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    pub fn new(config: Config) -> Arc<Self> {
        Arc::new(Self {
            enabled: config.enabled,
            ttl: config.ttl,
            inner: Default::default(),
        })
    }

    pub async fn insert(self: Arc<Self>, key: K, value: V) -> Arc<V> {
        let arcd = Arc::new(value);
        if !self.enabled {
            return arcd;
        }

        let entry = Entry {
            value: Arc::clone(&arcd),
            expires: Instant::now() + self.ttl,
        };
        self.inner.write().await.insert(key.clone(), entry);

        let self_clone = Arc::clone(&self);
        task::spawn(async move {
            sleep(self_clone.ttl).await;

            let mut inner = self_clone.inner.write().await;
            // A newer entry may have replaced ours in the meantime.
            if inner
                .get(&key)
                .is_some_and(|entry| entry.expires <= Instant::now())
            {
                inner.remove(&key);
            }
        });

        arcd
    }

    pub async fn get(&self, key: &K) -> Option<Arc<V>> {
        if !self.enabled {
            return None;
        }

        self.inner
            .read()
            .await
            .get(key)
            .filter(|entry| entry.expires > Instant::now())
            .map(|entry| Arc::clone(&entry.value))
    }

    pub async fn invalidate(&self, key: &K) {
        if self.enabled {
            self.inner.write().await.remove(key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cache(enabled: bool, ttl: Duration) -> Arc<Cache<u32, String>> {
        Cache::new(Config { enabled, ttl })
    }

    #[tokio::test]
    async fn hit_after_insert() {
        let cache = cache(true, Duration::from_secs(60));
        Arc::clone(&cache).insert(1, "calendar".into()).await;

        assert_eq!(cache.get(&1).await.as_deref().map(String::as_str), Some("calendar"));
        assert!(cache.get(&2).await.is_none());
    }

    #[tokio::test]
    async fn disabled_cache_never_hits() {
        let cache = cache(false, Duration::from_secs(60));
        let value = Arc::clone(&cache).insert(1, "calendar".into()).await;

        assert_eq!(value.as_str(), "calendar");
        assert!(cache.get(&1).await.is_none());
    }

    #[tokio::test]
    async fn invalidate_drops_entry() {
        let cache = cache(true, Duration::from_secs(60));
        Arc::clone(&cache).insert(1, "calendar".into()).await;
        cache.invalidate(&1).await;

        assert!(cache.get(&1).await.is_none());
    }

    #[tokio::test]
    async fn entries_expire() {
        let cache = cache(true, Duration::from_millis(20));
        Arc::clone(&cache).insert(1, "calendar".into()).await;

        sleep(Duration::from_millis(60)).await;
        assert!(cache.get(&1).await.is_none());
    }
}
