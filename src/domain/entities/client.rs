//! Client entity.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::company::{CompanyRef, company_name};
use crate::domain::filter::Searchable;
use crate::domain::ports::{Embed, Query, Record, Table};
use crate::domain::serde_utils::{flexible_id, null_as_default, timestamp};

/// Customer of a tenant company.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Client {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub legal_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trade_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_id: String,
    #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub company: Option<CompanyRef>,
}

impl Client {
    #[must_use]
    pub fn company_name(&self) -> &str {
        company_name(self.company.as_ref())
    }
}

impl Searchable for Client {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.legal_name, &self.trade_name, &self.code]
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Record for Client {
    const TABLE: Table = Table::Clients;

    fn id(&self) -> &str {
        &self.id
    }

    fn query() -> Query {
        Query::table(Self::TABLE)
            .embed(Embed::company())
            .order("legal_name", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_embedded_company() {
        let client: Client = serde_json::from_value(json!({
            "id": "c1",
            "code": "C0001",
            "legal_name": "Joao Silva",
            "company_id": "co1",
            "active": true,
            "company": {"legal_name": "Acme"}
        }))
        .unwrap();

        assert_eq!(client.company_name(), "Acme");
        assert_eq!(client.company_id.as_deref(), Some("co1"));
    }

    #[test]
    fn test_missing_company_is_empty_name() {
        let client: Client = serde_json::from_value(json!({
            "id": "c1", "code": "C0001", "company": null
        }))
        .unwrap();

        assert_eq!(client.company_name(), "");
        assert!(client.matches_search("c0001"));
    }
}
