//! Table API port definition.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::query::{Filter, Query, Table};
use crate::domain::entities::Session;
use crate::domain::errors::DataError;

/// Port for row-level access to platform tables.
#[async_trait]
pub trait DataPort: Send + Sync {
    /// Runs a select and returns the raw rows.
    async fn select(&self, session: &Session, query: &Query) -> Result<Vec<Value>, DataError>;

    /// Inserts rows and returns them as stored.
    async fn insert(
        &self,
        session: &Session,
        table: Table,
        rows: Vec<Value>,
    ) -> Result<Vec<Value>, DataError>;

    /// Applies `patch` to every row matching `filters`.
    async fn update(
        &self,
        session: &Session,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<(), DataError>;

    /// Deletes every row matching `filters`.
    async fn delete(
        &self,
        session: &Session,
        table: Table,
        filters: &[Filter],
    ) -> Result<(), DataError>;
}

/// Typed row of a platform table.
pub trait Record: DeserializeOwned + Clone + Send + Sync + 'static {
    const TABLE: Table;

    fn id(&self) -> &str;

    /// Base listing query (embeds and default order).
    fn query() -> Query {
        Query::table(Self::TABLE)
    }
}

/// Decodes raw rows into records.
///
/// # Errors
/// Returns `DataError::Decode` naming the table if any row does not fit.
pub fn decode_rows<T: DeserializeOwned>(table: Table, rows: Vec<Value>) -> Result<Vec<T>, DataError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(|e| DataError::decode(table.name(), e.to_string())))
        .collect()
}
