//! Person entity (sales staff).

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::company::{CompanyRef, company_name};
use crate::domain::filter::Searchable;
use crate::domain::ports::{Embed, Query, Record, Table};
use crate::domain::serde_utils::{flexible_id, null_as_default, timestamp};

/// Commercial role of a person.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonRole {
    #[default]
    Seller,
    Sdr,
    Both,
}

impl PersonRole {
    pub const ALL: [Self; 3] = [Self::Seller, Self::Sdr, Self::Both];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Seller => "Seller",
            Self::Sdr => "SDR",
            Self::Both => "Seller & SDR",
        }
    }

    /// Wire value of the role column.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Seller => "seller",
            Self::Sdr => "sdr",
            Self::Both => "both",
        }
    }
}

impl fmt::Display for PersonRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Seller or SDR attached to a company.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Person {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub individual_tax_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company_tax_id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: PersonRole,
    #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub company: Option<CompanyRef>,
}

impl Person {
    #[must_use]
    pub fn company_name(&self) -> &str {
        company_name(self.company.as_ref())
    }
}

impl Searchable for Person {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.individual_tax_id, &self.company_tax_id]
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Record for Person {
    const TABLE: Table = Table::People;

    fn id(&self) -> &str {
        &self.id
    }

    fn query() -> Query {
        Query::table(Self::TABLE)
            .embed(Embed::company())
            .order("name", true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_wire_values() {
        let person: Person = serde_json::from_value(json!({
            "id": "p1", "name": "Ana", "role": "both", "individual_tax_id": "12345678901"
        }))
        .unwrap();

        assert_eq!(person.role, PersonRole::Both);
        assert_eq!(person.role.as_str(), "both");
        assert!(person.matches_search("123456"));
    }

    #[test]
    fn test_null_role_defaults_to_seller() {
        let person: Person =
            serde_json::from_value(json!({"id": "p1", "role": null})).unwrap();
        assert_eq!(person.role, PersonRole::Seller);
    }
}
