use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Map;

use super::client::{FirestoreClient, update_write};
use super::values::integer_value;
use crate::domain::counters::{incremented, toggled};
use crate::error::Result;
use crate::ports::CounterStore;

/// One counter per document: `{collection}/{key}` holding an integer `field`.
#[derive(Debug, Clone)]
pub struct FirestoreCounterStore {
    client: Arc<FirestoreClient>,
    collection: String,
    field: String,
}

impl FirestoreCounterStore {
    pub fn new(
        client: Arc<FirestoreClient>,
        collection: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            client,
            collection: collection.into(),
            field: field.into(),
        }
    }

    async fn update(
        &self,
        key: &str,
        apply: impl Fn(u64) -> u64 + Send + Sync,
    ) -> Result<u64> {
        let client = self.client.as_ref();
        let collection = self.collection.as_str();
        let field = self.field.as_str();
        let name = client.document_name(collection, key)?;
        let apply = &apply;
        let name = &name;

        client
            .transact(move |transaction| async move {
                let current = client
                    .get_document(collection, key, Some(&transaction))
                    .await?
                    .map(|doc| doc.integer(field))
                    .unwrap_or(0);
                let next = apply(current);

                let mut fields = Map::new();
                fields.insert(field.to_string(), integer_value(next));
                Ok((vec![update_write(name, fields)], next))
            })
            .await
    }
}

#[async_trait]
impl CounterStore for FirestoreCounterStore {
    async fn get(&self, key: &str) -> Result<u64> {
        Ok(self
            .client
            .get_document(&self.collection, key, None)
            .await?
            .map(|doc| doc.integer(&self.field))
            .unwrap_or(0))
    }

    async fn snapshot(&self) -> Result<HashMap<String, u64>> {
        let documents = self.client.list_documents(&self.collection).await?;
        Ok(documents
            .iter()
            .map(|doc| (doc.id().to_string(), doc.integer(&self.field)))
            .collect())
    }

    async fn increment(&self, key: &str) -> Result<u64> {
        self.update(key, incremented).await
    }

    async fn toggle(&self, key: &str, was_liked: bool) -> Result<u64> {
        self.update(key, move |current| toggled(current, was_liked))
            .await
    }
}
