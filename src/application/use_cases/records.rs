//! Typed table access shared by the record use cases.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::application::services::SessionHub;
use crate::domain::code::CodeSequence;
use crate::domain::errors::{DataError, OperationError, ValidationError};
use crate::domain::ports::{DataPort, Filter, Query, Record, Table, decode_rows};

/// Session-aware wrapper over the data port.
#[derive(Clone)]
pub struct RecordStore {
    data_port: Arc<dyn DataPort>,
    hub: Arc<SessionHub>,
}

impl RecordStore {
    #[must_use]
    pub const fn new(data_port: Arc<dyn DataPort>, hub: Arc<SessionHub>) -> Self {
        Self { data_port, hub }
    }

    /// Runs `query` and decodes the rows as `T`.
    ///
    /// # Errors
    /// Returns error if the session is gone, the call fails or rows do not decode.
    pub async fn fetch<T: Record>(&self, query: &Query) -> Result<Vec<T>, OperationError> {
        self.fetch_as(query).await
    }

    /// Runs `query` and decodes the rows as any deserializable type.
    ///
    /// # Errors
    /// Returns error if the session is gone, the call fails or rows do not decode.
    pub async fn fetch_as<T>(&self, query: &Query) -> Result<Vec<T>, OperationError>
    where
        T: serde::de::DeserializeOwned,
    {
        let session = self.hub.session().await?;
        debug!(table = %query.table, filters = query.filters.len(), "Fetching rows");

        let rows = self.data_port.select(&session, query).await.map_err(|e| {
            warn!(error = %e, table = %query.table, "Select failed");
            e
        })?;

        Ok(decode_rows(query.table, rows)?)
    }

    /// Fetches a single row by id.
    ///
    /// # Errors
    /// Returns `DataError::NotFound` when no row has the id.
    pub async fn fetch_by_id<T: Record>(&self, id: &str) -> Result<T, OperationError> {
        let query = Query::table(T::TABLE).eq("id", id).limit(1);
        self.fetch::<T>(&query)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DataError::NotFound.into())
    }

    /// Inserts rows and returns them as stored.
    ///
    /// # Errors
    /// Returns error if the session is gone or the insert is rejected.
    pub async fn insert(&self, table: Table, rows: Vec<Value>) -> Result<Vec<Value>, OperationError> {
        let session = self.hub.session().await?;
        debug!(table = %table, count = rows.len(), "Inserting rows");

        Ok(self
            .data_port
            .insert(&session, table, rows)
            .await
            .map_err(|e| {
                warn!(error = %e, table = %table, "Insert failed");
                e
            })?)
    }

    /// Applies `patch` to rows matching `filters`.
    ///
    /// # Errors
    /// Returns error if the session is gone or the update is rejected.
    pub async fn update_where(
        &self,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<(), OperationError> {
        let session = self.hub.session().await?;
        debug!(table = %table, "Updating rows");

        Ok(self
            .data_port
            .update(&session, table, filters, patch)
            .await
            .map_err(|e| {
                warn!(error = %e, table = %table, "Update failed");
                e
            })?)
    }

    /// Applies `patch` to the row with `id`.
    ///
    /// # Errors
    /// Returns error if the session is gone or the update is rejected.
    pub async fn update(&self, table: Table, id: &str, patch: Value) -> Result<(), OperationError> {
        self.update_where(table, &[Filter::eq("id", id)], patch)
            .await
    }

    /// Deletes rows matching `filters`.
    ///
    /// # Errors
    /// Returns error if the session is gone or the delete is rejected.
    pub async fn delete_where(&self, table: Table, filters: &[Filter]) -> Result<(), OperationError> {
        let session = self.hub.session().await?;
        debug!(table = %table, "Deleting rows");

        Ok(self
            .data_port
            .delete(&session, table, filters)
            .await
            .map_err(|e| {
                warn!(error = %e, table = %table, "Delete failed");
                e
            })?)
    }

    /// Deletes the row with `id`.
    ///
    /// # Errors
    /// Returns error if the session is gone or the delete is rejected.
    pub async fn delete(&self, table: Table, id: &str) -> Result<(), OperationError> {
        self.delete_where(table, &[Filter::eq("id", id)]).await
    }

    /// Sets the active flag and the updated timestamp.
    ///
    /// # Errors
    /// Returns error if the update is rejected.
    pub async fn set_active(&self, table: Table, id: &str, active: bool) -> Result<(), OperationError> {
        self.update(
            table,
            id,
            json!({ "active": active, "updated_at": now() }),
        )
        .await
    }

    /// Next free code of `sequence` in `table`.
    ///
    /// # Errors
    /// Returns error if the codes cannot be read.
    pub async fn next_code(&self, table: Table, sequence: CodeSequence) -> Result<String, OperationError> {
        let query = Query::table(table).columns("code").order("code", false);
        let rows: Vec<Value> = self.fetch_as(&query).await?;

        let code = sequence.next_from(rows.iter().filter_map(|row| row["code"].as_str()));
        debug!(table = %table, code = %code, "Generated next code");
        Ok(code)
    }

    /// Fails with `CodeTaken` when another row of `table` already uses `code`.
    ///
    /// # Errors
    /// Returns `ValidationError::CodeTaken` or the lookup failure.
    pub async fn ensure_code_free(
        &self,
        table: Table,
        code: &str,
        exclude_id: Option<&str>,
    ) -> Result<(), OperationError> {
        let mut query = Query::table(table).columns("id").eq("code", code.trim());
        if let Some(id) = exclude_id {
            query = query.neq("id", id);
        }

        let rows: Vec<Value> = self.fetch_as(&query.limit(1)).await?;
        if rows.is_empty() {
            Ok(())
        } else {
            warn!(table = %table, code = %code, "Code already in use");
            Err(ValidationError::code_taken(code.trim()).into())
        }
    }
}

/// Current time as an RFC 3339 string for timestamp columns.
#[must_use]
pub fn now() -> String {
    Utc::now().to_rfc3339()
}
