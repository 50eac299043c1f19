//! Table API adapter.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::client::{PlatformClient, SendFailure};
use crate::domain::entities::Session;
use crate::domain::errors::DataError;
use crate::domain::ports::{DataPort, Filter, Query, Table};

const PREFER_HEADER: &str = "Prefer";
const RETURN_REPRESENTATION: &str = "return=representation";
const RETURN_MINIMAL: &str = "return=minimal";

/// Platform table client.
pub struct PlatformRestClient {
    client: PlatformClient,
}

impl PlatformRestClient {
    #[must_use]
    pub const fn new(client: PlatformClient) -> Self {
        Self { client }
    }

    fn table_request(&self, method: Method, table: Table, session: &Session) -> RequestBuilder {
        self.client
            .request(method, &format!("rest/v1/{table}"), Some(session.bearer()))
    }

    async fn execute(&self, table: Table, request: RequestBuilder) -> Result<Response, DataError> {
        let response = PlatformClient::send(request).await.map_err(network)?;
        let status = response.status();

        if status.is_success() {
            return Ok(response);
        }

        let message = PlatformClient::error_message(status, response).await;
        warn!(table = %table, %status, message = %message, "Table request failed");
        Err(map_status(status, message))
    }
}

fn network(failure: SendFailure) -> DataError {
    DataError::network(failure.to_string())
}

fn filter_params(filters: &[Filter]) -> Vec<(String, String)> {
    filters.iter().map(Filter::to_param).collect()
}

fn map_status(status: StatusCode, message: String) -> DataError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => DataError::unauthorized(message),
        StatusCode::NOT_FOUND => DataError::NotFound,
        StatusCode::TOO_MANY_REQUESTS => {
            DataError::rejected(status.as_u16(), "too many requests, try again later")
        }
        s if s.is_server_error() => DataError::network(format!("platform unavailable: {message}")),
        s => DataError::rejected(s.as_u16(), message),
    }
}

async fn rows(table: Table, response: Response) -> Result<Vec<Value>, DataError> {
    response.json::<Vec<Value>>().await.map_err(|e| {
        warn!(error = %e, table = %table, "Failed to parse rows");
        DataError::decode(table.name(), e.to_string())
    })
}

#[async_trait]
impl DataPort for PlatformRestClient {
    async fn select(&self, session: &Session, query: &Query) -> Result<Vec<Value>, DataError> {
        let request = self
            .table_request(Method::GET, query.table, session)
            .query(&query.to_params());

        let response = self.execute(query.table, request).await?;
        let rows = rows(query.table, response).await?;
        debug!(table = %query.table, count = rows.len(), "Rows fetched");
        Ok(rows)
    }

    async fn insert(
        &self,
        session: &Session,
        table: Table,
        rows_in: Vec<Value>,
    ) -> Result<Vec<Value>, DataError> {
        let request = self
            .table_request(Method::POST, table, session)
            .header(PREFER_HEADER, RETURN_REPRESENTATION)
            .json(&rows_in);

        let response = self.execute(table, request).await?;
        rows(table, response).await
    }

    async fn update(
        &self,
        session: &Session,
        table: Table,
        filters: &[Filter],
        patch: Value,
    ) -> Result<(), DataError> {
        let request = self
            .table_request(Method::PATCH, table, session)
            .header(PREFER_HEADER, RETURN_MINIMAL)
            .query(&filter_params(filters))
            .json(&patch);

        self.execute(table, request).await?;
        Ok(())
    }

    async fn delete(
        &self,
        session: &Session,
        table: Table,
        filters: &[Filter],
    ) -> Result<(), DataError> {
        let request = self
            .table_request(Method::DELETE, table, session)
            .header(PREFER_HEADER, RETURN_MINIMAL)
            .query(&filter_params(filters));

        self.execute(table, request).await?;
        Ok(())
    }
}
