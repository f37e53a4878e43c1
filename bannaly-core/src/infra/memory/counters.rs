use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;

use crate::domain::counters::{incremented, toggled};
use crate::error::Result;
use crate::ports::CounterStore;

/// Counters held in a concurrent map. Each mutation runs under the entry's
/// shard lock, which makes read-modify-write atomic per key.
#[derive(Debug, Default)]
pub struct InMemoryCounterStore {
    values: DashMap<String, u64>,
}

impl InMemoryCounterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_values<I, K>(values: I) -> Self
    where
        I: IntoIterator<Item = (K, u64)>,
        K: Into<String>,
    {
        Self {
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }

    fn update(&self, key: &str, apply: impl FnOnce(u64) -> u64) -> u64 {
        let mut entry = self.values.entry(key.to_string()).or_insert(0);
        *entry = apply(*entry);
        *entry
    }
}

#[async_trait]
impl CounterStore for InMemoryCounterStore {
    async fn get(&self, key: &str) -> Result<u64> {
        Ok(self.values.get(key).map(|value| *value).unwrap_or(0))
    }

    async fn snapshot(&self) -> Result<HashMap<String, u64>> {
        Ok(self
            .values
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect())
    }

    async fn increment(&self, key: &str) -> Result<u64> {
        Ok(self.update(key, incremented))
    }

    async fn toggle(&self, key: &str, was_liked: bool) -> Result<u64> {
        Ok(self.update(key, |current| toggled(current, was_liked)))
    }
}
