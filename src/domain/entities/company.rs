//! Company entity.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::domain::filter::Searchable;
use crate::domain::ports::{Query, Record, Table};
use crate::domain::serde_utils::{flexible_id, null_as_default, timestamp};

/// Tenant company.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Company {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub legal_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub trade_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Searchable for Company {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.legal_name, &self.tax_id]
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Record for Company {
    const TABLE: Table = Table::Companies;

    fn id(&self) -> &str {
        &self.id
    }

    fn query() -> Query {
        Query::table(Self::TABLE).order("legal_name", true)
    }
}

/// Embedded `company{legal_name}` join.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CompanyRef {
    #[serde(default, deserialize_with = "null_as_default")]
    pub legal_name: String,
}

/// Company selector entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompanyOption {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub legal_name: String,
}

impl From<&Company> for CompanyOption {
    fn from(company: &Company) -> Self {
        Self {
            id: company.id.clone(),
            legal_name: company.legal_name.clone(),
        }
    }
}

/// Name of an optional embedded company, empty when absent.
#[must_use]
pub fn company_name(company: Option<&CompanyRef>) -> &str {
    company.map_or("", |c| c.legal_name.as_str())
}
