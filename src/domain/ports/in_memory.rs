//! In-memory table store for exercising use cases.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::{Map, Value};

use super::data_port::DataPort;
use super::query::{Filter, Query, Table, compare_cells};
use crate::domain::entities::Session;
use crate::domain::errors::DataError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

/// `DataPort` that evaluates queries over JSON rows held in memory.
#[derive(Default)]
pub struct InMemoryDataPort {
    tables: RwLock<HashMap<Table, Vec<Value>>>,
    failure: RwLock<Option<(Operation, Table)>>,
    calls: RwLock<Vec<(Operation, Table)>>,
}

impl InMemoryDataPort {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a table with rows.
    #[must_use]
    pub fn with_rows(self, table: Table, rows: Vec<Value>) -> Self {
        self.tables.write().entry(table).or_default().extend(rows);
        self
    }

    /// Makes the next matching call fail with a rejected error.
    pub fn fail_next(&self, operation: Operation, table: Table) {
        *self.failure.write() = Some((operation, table));
    }

    /// Current rows of a table.
    pub fn rows(&self, table: Table) -> Vec<Value> {
        self.tables.read().get(&table).cloned().unwrap_or_default()
    }

    /// Returns the first row whose `id` equals `id`.
    pub fn row(&self, table: Table, id: &str) -> Option<Value> {
        let filter = Filter::eq("id", id);
        self.rows(table).into_iter().find(|row| filter.matches(row))
    }

    /// Operations performed so far, in order.
    pub fn calls(&self) -> Vec<(Operation, Table)> {
        self.calls.read().clone()
    }

    fn record_call(&self, operation: Operation, table: Table) -> Result<(), DataError> {
        self.calls.write().push((operation, table));

        let mut failure = self.failure.write();
        if *failure == Some((operation, table)) {
            *failure = None;
            return Err(DataError::rejected(500, format!("{table} {operation:?} failed")));
        }
        Ok(())
    }

    fn embed_rows(&self, query: &Query, mut row: Value) -> Value {
        let tables = self.tables.read();

        for embed in &query.embeds {
            let parent = row.get(&embed.foreign_key).and_then(|key| {
                let filter = Filter::eq("id", key.clone());
                tables
                    .get(&embed.table)
                    .and_then(|rows| rows.iter().find(|r| filter.matches(r)))
            });

            let embedded = parent.map_or(Value::Null, |parent| project(parent, &embed.columns));
            if let Value::Object(map) = &mut row {
                map.insert(embed.alias.clone(), embedded);
            }
        }

        row
    }
}

fn project(row: &Value, columns: &str) -> Value {
    if columns.trim() == "*" {
        return row.clone();
    }

    let mut projected = Map::new();
    for column in columns.split(',').map(str::trim) {
        if let Some(value) = row.get(column) {
            projected.insert(column.to_string(), value.clone());
        }
    }
    Value::Object(projected)
}

fn matches_all(filters: &[Filter], row: &Value) -> bool {
    filters.iter().all(|f| f.matches(row))
}

#[async_trait]
impl DataPort for InMemoryDataPort {
    async fn select(&self, _session: &Session, query: &Query) -> Result<Vec<Value>, DataError> {
        self.record_call(Operation::Select, query.table)?;

        let mut rows: Vec<Value> = self
            .rows(query.table)
            .into_iter()
            .filter(|row| matches_all(&query.filters, row))
            .collect();

        rows.sort_by(|a, b| {
            query
                .order
                .iter()
                .map(|order| {
                    let ordering = compare_cells(
                        a.get(&order.column).unwrap_or(&Value::Null),
                        b.get(&order.column).unwrap_or(&Value::Null),
                    );
                    if order.ascending {
                        ordering
                    } else {
                        ordering.reverse()
                    }
                })
                .find(|ordering| ordering.is_ne())
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        if let Some(limit) = query.limit {
            rows.truncate(limit);
        }

        Ok(rows
            .into_iter()
            .map(|row| self.embed_rows(query, project(&row, &query.columns)))
            .collect())
    }

    async fn insert(
        &self,
        _session: &Session,
        table: Table,
        rows: Vec<Value>,
    ) -> Result<Vec<Value>, DataError> {
        self.record_call(Operation::Insert, table)?;

        let stored: Vec<Value> = rows
            .into_iter()
            .map(|mut row| {
                if let Value::Object(map) = &mut row {
                    map.entry("id")
                        .or_insert_with(|| Value::String(uuid::Uuid::new_v4().to_string()));
                }
                row
            })
            .collect();

        self.tables
            .write()
            .entry(table)
            .or_default()
            .extend(stored.iter().cloned());

        Ok(stored)
    }

    async fn update(
        &self,
        _session: &Session,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<(), DataError> {
        self.record_call(Operation::Update, table)?;

        let Value::Object(patch) = patch else {
            return Err(DataError::rejected(400, "patch must be an object"));
        };

        let mut tables = self.tables.write();
        for row in tables.entry(table).or_default().iter_mut() {
            if matches_all(filters, row) {
                if let Value::Object(map) = row {
                    map.extend(patch.clone());
                }
            }
        }
        Ok(())
    }

    async fn delete(
        &self,
        _session: &Session,
        table: Table,
        filters: &[Filter],
    ) -> Result<(), DataError> {
        self.record_call(Operation::Delete, table)?;

        self.tables
            .write()
            .entry(table)
            .or_default()
            .retain(|row| !matches_all(filters, row));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::Token;
    use crate::domain::ports::Embed;
    use chrono::Utc;
    use serde_json::json;

    fn session() -> Session {
        Session::new(
            Token::new_unchecked("access-token-value"),
            Token::new_unchecked("refresh-token-value"),
            Utc::now(),
            "auth-1",
            "ana@example.com",
        )
    }

    #[tokio::test]
    async fn test_select_filters_orders_and_embeds() {
        let port = InMemoryDataPort::new()
            .with_rows(
                Table::Companies,
                vec![json!({"id": "co1", "legal_name": "Acme"})],
            )
            .with_rows(
                Table::Clients,
                vec![
                    json!({"id": "c2", "code": "C0002", "company_id": "co1", "active": true}),
                    json!({"id": "c1", "code": "C0001", "company_id": "co1", "active": true}),
                    json!({"id": "c3", "code": "C0003", "company_id": null, "active": false}),
                ],
            );

        let query = Query::table(Table::Clients)
            .embed(Embed::company())
            .eq("active", true)
            .order("code", true);
        let rows = port.select(&session(), &query).await.unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["code"], "C0001");
        assert_eq!(rows[0]["company"]["legal_name"], "Acme");
    }

    #[tokio::test]
    async fn test_insert_assigns_ids_and_failure_is_one_shot() {
        let port = InMemoryDataPort::new();
        port.fail_next(Operation::Insert, Table::Companies);

        let first = port
            .insert(&session(), Table::Companies, vec![json!({"legal_name": "A"})])
            .await;
        assert!(first.is_err());

        let stored = port
            .insert(&session(), Table::Companies, vec![json!({"legal_name": "A"})])
            .await
            .unwrap();
        assert!(stored[0]["id"].is_string());
        assert_eq!(port.rows(Table::Companies).len(), 1);
    }
}
