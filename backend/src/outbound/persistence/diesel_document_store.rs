//! PostgreSQL-backed [`DocumentStore`] over a single `documents` table.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::{Bool, Text};
use diesel::upsert::excluded;
use diesel_async::RunQueryDsl;
use mockable::Clock;
use serde_json::Value;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::RepositoryError;
use crate::outbound::store::{Collection, Document, DocumentStore};

use super::models::{DocumentRow, NewDocumentRow};
use super::pool::DbPool;
use super::schema::documents;

#[derive(Clone)]
pub struct DieselDocumentStore {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselDocumentStore {
    pub fn new(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> RepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            RepositoryError::query("duplicate document id")
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            RepositoryError::connection("database connection error")
        }
        DieselError::DeserializationError(_) | DieselError::SerializationError(_) => {
            RepositoryError::serialization("document column could not be converted")
        }
        _ => RepositoryError::query("database error"),
    }
}

fn to_db_revision(revision: u64) -> Result<i64, RepositoryError> {
    i64::try_from(revision).map_err(|_| RepositoryError::query("revision out of range"))
}

fn from_db_revision(revision: i64) -> u64 {
    u64::try_from(revision).unwrap_or_default()
}

fn row_to_document(row: DocumentRow) -> Document {
    Document {
        id: row.id,
        body: row.body,
        revision: from_db_revision(row.revision),
        updated_at: row.updated_at,
    }
}

#[async_trait]
impl DocumentStore for DieselDocumentStore {
    async fn get(&self, collection: Collection, id: Uuid) -> Result<Option<Document>, RepositoryError> {
        let mut conn = self.pool.get().await?;
        let row = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .filter(documents::id.eq(id))
            .select(DocumentRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_document))
    }

    async fn list(&self, collection: Collection) -> Result<Vec<Document>, RepositoryError> {
        let mut conn = self.pool.get().await?;
        let rows = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .order(documents::seq.asc())
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_document).collect())
    }

    async fn list_where(
        &self,
        collection: Collection,
        field: &'static str,
        value: &str,
    ) -> Result<Vec<Document>, RepositoryError> {
        let mut conn = self.pool.get().await?;
        let matches_field = sql::<Bool>("body ->> ")
            .bind::<Text, _>(field)
            .sql(" = ")
            .bind::<Text, _>(value.to_owned());
        let rows = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .filter(matches_field)
            .order(documents::seq.asc())
            .select(DocumentRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_document).collect())
    }

    async fn count(&self, collection: Collection) -> Result<u64, RepositoryError> {
        let mut conn = self.pool.get().await?;
        let total: i64 = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(from_db_revision(total))
    }

    async fn insert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await?;
        let row = NewDocumentRow {
            collection: collection.as_str(),
            id,
            body: &body,
            revision: 1,
            updated_at: self.clock.utc(),
        };
        diesel::insert_into(documents::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(drop)
            .map_err(map_diesel_error)
    }

    async fn upsert(&self, collection: Collection, id: Uuid, body: Value) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await?;
        let row = NewDocumentRow {
            collection: collection.as_str(),
            id,
            body: &body,
            revision: 1,
            updated_at: self.clock.utc(),
        };
        diesel::insert_into(documents::table)
            .values(&row)
            .on_conflict((documents::collection, documents::id))
            .do_update()
            .set((
                documents::body.eq(excluded(documents::body)),
                documents::revision.eq(documents::revision + 1),
                documents::updated_at.eq(excluded(documents::updated_at)),
            ))
            .execute(&mut conn)
            .await
            .map(drop)
            .map_err(map_diesel_error)
    }

    async fn replace(
        &self,
        collection: Collection,
        id: Uuid,
        body: Value,
        expected: u64,
    ) -> Result<(), RepositoryError> {
        let expected_db = to_db_revision(expected)?;
        let mut conn = self.pool.get().await?;
        let updated = diesel::update(
            documents::table
                .filter(documents::collection.eq(collection.as_str()))
                .filter(documents::id.eq(id))
                .filter(documents::revision.eq(expected_db)),
        )
        .set((
            documents::body.eq(&body),
            documents::revision.eq(expected_db + 1),
            documents::updated_at.eq(self.clock.utc()),
        ))
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        if updated > 0 {
            return Ok(());
        }

        let current: Option<i64> = documents::table
            .filter(documents::collection.eq(collection.as_str()))
            .filter(documents::id.eq(id))
            .select(documents::revision)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Err(match current {
            Some(actual) => RepositoryError::revision_mismatch(expected, from_db_revision(actual)),
            None => RepositoryError::query(format!("document {id} not found")),
        })
    }

    async fn delete(&self, collection: Collection, id: Uuid) -> Result<bool, RepositoryError> {
        let mut conn = self.pool.get().await?;
        let removed = diesel::delete(
            documents::table
                .filter(documents::collection.eq(collection.as_str()))
                .filter(documents::id.eq(id)),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn unmapped_errors_are_query_errors() {
        let error = map_diesel_error(diesel::result::Error::NotFound);
        assert!(matches!(error, RepositoryError::Query { .. }));
    }

    #[rstest]
    #[case(0, 0)]
    #[case(7, 7)]
    #[case(-1, 0)]
    fn negative_revisions_clamp_to_zero(#[case] stored: i64, #[case] expected: u64) {
        assert_eq!(from_db_revision(stored), expected);
    }

    #[rstest]
    fn oversized_revisions_are_rejected() {
        assert!(to_db_revision(u64::MAX).is_err());
    }
}
