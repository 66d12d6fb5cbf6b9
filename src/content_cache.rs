use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use chrono::{DateTime, Duration, Utc};

/// Rendered content keyed by post slug.
/// A non-caching instance accepts inserts but never returns anything.
pub struct ContentCache<T> {
    cache: Option<RwLock<CacheMap<T>>>,
    expire_after: Expire,
}

type CacheMap<T> = HashMap<String, CacheValue<T>>;

#[derive(Clone, Copy, Debug)]
pub enum Expire {
    Never,
    After(Duration),
}

impl Expire {
    /// TTLs too large for chrono never expire.
    pub fn from_secs(secs: Option<i64>) -> Self {
        match secs.and_then(Duration::try_seconds) {
            Some(duration) => Expire::After(duration),
            None => Expire::Never,
        }
    }
}

struct CacheValue<T> {
    expire_date: DateTime<Utc>,
    value: Arc<T>,
}

impl<T> ContentCache<T> {
    pub fn new(expire_after: Expire) -> Self {
        ContentCache {
            cache: Some(RwLock::new(HashMap::new())),
            expire_after,
        }
    }

    pub fn non_caching() -> Self {
        ContentCache {
            cache: None,
            expire_after: Expire::Never,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.cache.is_some()
    }

    pub fn add(&self, key: &str, content: T) -> Arc<T> {
        let value = Arc::new(content);
        if let Some(ref cache) = self.cache {
            let expire_date = match self.expire_after {
                Expire::Never => DateTime::<Utc>::MAX_UTC,
                Expire::After(duration) => Utc::now()
                    .checked_add_signed(duration)
                    .unwrap_or(DateTime::<Utc>::MAX_UTC),
            };

            let mut cache = cache.write().unwrap_or_else(PoisonError::into_inner);
            cache.insert(key.to_string(), CacheValue {
                expire_date,
                value: value.clone(),
            });
        }
        value
    }

    pub fn get(&self, key: &str) -> Option<Arc<T>> {
        let cache = self.cache.as_ref()?;
        let cache = cache.read().unwrap_or_else(PoisonError::into_inner);
        let cache_value = cache.get(key)?;
        if Utc::now() > cache_value.expire_date {
            return None;
        }
        Some(cache_value.value.clone())
    }

    pub fn clear(&self) {
        if let Some(ref cache) = self.cache {
            cache.write().unwrap_or_else(PoisonError::into_inner).clear();
        }
    }
}
