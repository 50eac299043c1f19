//! Service entity.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::company::{CompanyRef, company_name};
use crate::domain::filter::Searchable;
use crate::domain::ports::{Embed, Query, Record, Table};
use crate::domain::serde_utils::{flexible_id, null_as_default, timestamp};

/// Service offered by a company.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Service {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub company: Option<CompanyRef>,
}

impl Service {
    #[must_use]
    pub fn company_name(&self) -> &str {
        company_name(self.company.as_ref())
    }
}

impl Searchable for Service {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.code]
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Record for Service {
    const TABLE: Table = Table::Services;

    fn id(&self) -> &str {
        &self.id
    }

    fn query() -> Query {
        Query::table(Self::TABLE)
            .embed(Embed::company())
            .order("code", true)
    }
}
