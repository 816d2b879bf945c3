//! In-memory decision cache
//!
//! Concurrent misses on the same key may both compute; the last write wins.

use std::{future::Future, hash::Hash};

use tokio::time::Instant;

use crate::{platform::Platform, prelude::*, sv::Decision};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CheckKey {
  pub platform: Platform,
  pub current_version: String,
  /// Not used by the decision, kept so keys match what the client sent.
  pub build_number: Option<String>,
  pub locale: Option<String>,
}

pub type DecisionCache = TtlCache<CheckKey, Decision>;

#[derive(Debug)]
struct Entry<V> {
  value: V,
  expires_at: Instant,
}

pub struct TtlCache<K, V> {
  entries: DashMap<K, Entry<V>>,
}

impl<K, V> Default for TtlCache<K, V>
where
  K: Eq + Hash,
{
  fn default() -> Self {
    Self { entries: DashMap::new() }
  }
}

impl<K, V> TtlCache<K, V>
where
  K: Eq + Hash,
  V: Clone,
{
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, key: &K) -> Option<V> {
    let now = Instant::now();

    if let Some(entry) = self.entries.get(key) {
      if entry.expires_at > now {
        return Some(entry.value.clone());
      }
    }

    self.entries.remove_if(key, |_, entry| entry.expires_at <= now);
    None
  }

  /// Stores `value` for `ttl`. A `ttl` past what the clock can represent is
  /// not stored at all.
  pub fn insert(&self, key: K, value: V, ttl: Duration) {
    let Some(expires_at) = Instant::now().checked_add(ttl) else {
      warn!(?ttl, "Cache TTL out of range, not storing");
      return;
    };
    self.entries.insert(key, Entry { value, expires_at });
  }

  /// Returns the cached value or runs `compute` and stores its result.
  /// Errors are passed through and never cached. A zero `ttl` bypasses the
  /// cache entirely.
  pub async fn get_or_compute<F, Fut, E>(
    &self,
    key: K,
    ttl: Duration,
    compute: F,
  ) -> Result<V, E>
  where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<V, E>>,
  {
    if ttl.is_zero() {
      return compute().await;
    }

    if let Some(value) = self.get(&key) {
      debug!("Cache hit");
      return Ok(value);
    }

    let value = compute().await?;
    self.insert(key, value.clone(), ttl);
    Ok(value)
  }

  /// Drops expired entries, returns how many were removed.
  pub fn purge_expired(&self) -> usize {
    let now = Instant::now();
    let before = self.entries.len();
    self.entries.retain(|_, entry| entry.expires_at > now);
    before.saturating_sub(self.entries.len())
  }

  pub fn clear(&self) {
    self.entries.clear();
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }
}
