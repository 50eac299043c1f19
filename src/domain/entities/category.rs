//! Financial category entities.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::filter::{KindFilter, Searchable};
use crate::domain::ports::{Query, Record, Table};
use crate::domain::serde_utils::{flexible_id, null_as_default, timestamp};

/// Whether a category books income or spending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[default]
    Revenue,
    Expense,
}

impl CategoryKind {
    pub const ALL: [Self; 2] = [Self::Revenue, Self::Expense];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::Expense => "Expense",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        }
    }
}

impl fmt::Display for CategoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl KindFilter {
    /// Kind for a `kind = ?` query filter, `None` when unrestricted.
    #[must_use]
    pub const fn as_kind(self) -> Option<CategoryKind> {
        match self {
            Self::Revenue => Some(CategoryKind::Revenue),
            Self::Expense => Some(CategoryKind::Expense),
            Self::All => None,
        }
    }
}

/// Financial category.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Category {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub kind: CategoryKind,
    #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
    pub group_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Searchable for Category {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.code]
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Record for Category {
    const TABLE: Table = Table::Categories;

    fn id(&self) -> &str {
        &self.id
    }

    fn query() -> Query {
        Query::table(Self::TABLE).order("code", true)
    }
}

/// Named grouping of categories.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryGroup {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default = "default_active", deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Record for CategoryGroup {
    const TABLE: Table = Table::CategoryGroups;

    fn id(&self) -> &str {
        &self.id
    }

    fn query() -> Query {
        Query::table(Self::TABLE).order("name", true)
    }
}

/// Category selector entry used by bulk linking.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryOption {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
}

/// Row of the category/company join table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CategoryLink {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub category_id: String,
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub company_id: String,
}

const fn default_active() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_category() {
        let category: Category = serde_json::from_value(json!({
            "id": 1,
            "code": "CAT001",
            "name": "Sales",
            "kind": "expense",
            "group_id": null,
            "active": true
        }))
        .unwrap();

        assert_eq!(category.kind, CategoryKind::Expense);
        assert_eq!(category.group_id, None);
    }

    #[test]
    fn test_kind_filter_maps_to_kind() {
        assert_eq!(KindFilter::All.as_kind(), None);
        assert_eq!(KindFilter::Revenue.as_kind(), Some(CategoryKind::Revenue));
    }
}
