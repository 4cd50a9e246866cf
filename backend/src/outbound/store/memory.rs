//! Process-local document store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{Collection, Document, DocumentStore};
use crate::domain::ports::RepositoryError;

/// Documents held in memory; lost on restart.
#[derive(Clone)]
pub struct InMemoryDocumentStore {
    collections: Arc<RwLock<HashMap<Collection, Vec<Document>>>>,
    clock: Arc<dyn Clock>,
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl InMemoryDocumentStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            collections: Arc::default(),
            clock,
        }
    }
}

fn field_matches(body: &Value, field: &str, value: &str) -> bool {
    body.get(field).and_then(Value::as_str) == Some(value)
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, RepositoryError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, RepositoryError> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).cloned().unwrap_or_default())
    }

    async fn list_where(
        &self,
        collection: Collection,
        field: &'static str,
        value: &str,
    ) -> Result<Vec<Document>, RepositoryError> {
        let guard = self.collections.read().await;
        Ok(guard
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| field_matches(&doc.body, field, value))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn count(&self, collection: Collection) -> Result<u64, RepositoryError> {
        let guard = self.collections.read().await;
        Ok(guard.get(&collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn insert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), RepositoryError> {
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection).or_default();
        if docs.iter().any(|doc| doc.id == id) {
            return Err(RepositoryError::query(format!(
                "duplicate id {id} in {}",
                collection.as_str()
            )));
        }
        docs.push(Document {
            id,
            body,
            revision: 1,
            updated_at: self.clock.utc(),
        });
        Ok(())
    }

    async fn upsert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), RepositoryError> {
        let now = self.clock.utc();
        let mut guard = self.collections.write().await;
        let docs = guard.entry(collection).or_default();
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(doc) => {
                doc.body = body;
                doc.revision += 1;
                doc.updated_at = now;
            }
            None => docs.push(Document {
                id,
                body,
                revision: 1,
                updated_at: now,
            }),
        }
        Ok(())
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
        expected: u64,
    ) -> Result<(), RepositoryError> {
        let now = self.clock.utc();
        let mut guard = self.collections.write().await;
        let doc = guard
            .get_mut(&collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| RepositoryError::query(format!("document {id} not found")))?;
        if doc.revision != expected {
            return Err(RepositoryError::revision_mismatch(expected, doc.revision));
        }
        doc.body = body;
        doc.revision = expected + 1;
        doc.updated_at = now;
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, RepositoryError> {
        let mut guard = self.collections.write().await;
        let Some(docs) = guard.get_mut(&collection) else {
            return Ok(false);
        };
        let before = docs.len();
        docs.retain(|doc| doc.id != id);
        Ok(docs.len() != before)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn replace_checks_the_revision() {
        let store = InMemoryDocumentStore::default();
        let id = Uuid::new_v4();
        store
            .insert(Collection::Cases, id, json!({ "status": "new" }))
            .await
            .expect("insert");
        store
            .replace(Collection::Cases, id, json!({ "status": "assigned" }), 1)
            .await
            .expect("first writer wins");

        let error = store
            .replace(Collection::Cases, id, json!({ "status": "closed" }), 1)
            .await
            .expect_err("stale writer loses");
        assert_eq!(error, RepositoryError::revision_mismatch(1_u64, 2_u64));

        let stored = store
            .get(Collection::Cases, id)
            .await
            .expect("get")
            .expect("present");
        assert_eq!(stored.revision, 2);
        assert_eq!(stored.body["status"], "assigned");
    }

    #[tokio::test]
    async fn duplicate_inserts_are_rejected() {
        let store = InMemoryDocumentStore::default();
        let id = Uuid::new_v4();
        store
            .insert(Collection::Teams, id, json!({}))
            .await
            .expect("insert");
        assert!(store.insert(Collection::Teams, id, json!({})).await.is_err());
    }

    #[tokio::test]
    async fn list_where_matches_string_fields_in_order() {
        let store = InMemoryDocumentStore::default();
        let case_id = Uuid::new_v4().to_string();
        for (n, owner) in [(1, case_id.as_str()), (2, "other"), (3, case_id.as_str())] {
            store
                .insert(
                    Collection::CaseNotes,
                    Uuid::new_v4(),
                    json!({ "case_id": owner, "n": n }),
                )
                .await
                .expect("insert");
        }
        let found = store
            .list_where(Collection::CaseNotes, "case_id", &case_id)
            .await
            .expect("list");
        let order: Vec<_> = found.iter().map(|doc| doc.body["n"].clone()).collect();
        assert_eq!(order, vec![json!(1), json!(3)]);
        assert_eq!(store.count(Collection::CaseNotes).await.expect("count"), 3);
    }

    #[tokio::test]
    async fn delete_reports_whether_anything_was_removed() {
        let store = InMemoryDocumentStore::default();
        let id = Uuid::new_v4();
        assert!(!store.delete(Collection::Evidence, id).await.expect("delete"));
        store
            .insert(Collection::Evidence, id, json!({}))
            .await
            .expect("insert");
        assert!(store.delete(Collection::Evidence, id).await.expect("delete"));
    }
}
