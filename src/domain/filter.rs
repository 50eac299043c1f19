//! Client-side list filtering.

use serde::{Deserialize, Serialize};

/// Active flag filter; applied at fetch time and again on the loaded rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    Active,
    Inactive,
    All,
}

impl StatusFilter {
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::Active => Self::Inactive,
            Self::Inactive => Self::All,
            Self::All => Self::Active,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Inactive => "Inactive",
            Self::All => "All",
        }
    }

    /// Value for an `active = ?` query filter, `None` when unrestricted.
    #[must_use]
    pub const fn as_active_flag(self) -> Option<bool> {
        match self {
            Self::Active => Some(true),
            Self::Inactive => Some(false),
            Self::All => None,
        }
    }

    #[must_use]
    pub const fn accepts(self, active: bool) -> bool {
        match self.as_active_flag() {
            Some(flag) => flag == active,
            None => true,
        }
    }
}

/// Category kind filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum KindFilter {
    Revenue,
    Expense,
    #[default]
    All,
}

impl KindFilter {
    #[must_use]
    pub const fn cycle(self) -> Self {
        match self {
            Self::All => Self::Revenue,
            Self::Revenue => Self::Expense,
            Self::Expense => Self::All,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::Expense => "Expense",
            Self::All => "All",
        }
    }
}

/// Records that can be narrowed by a free-text search.
pub trait Searchable {
    /// Text fields matched by the search box.
    fn search_fields(&self) -> Vec<&str>;

    /// Active flag of the record.
    fn is_active(&self) -> bool;

    /// Case-insensitive substring match; an empty term matches everything.
    fn matches_search(&self, term: &str) -> bool {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return true;
        }
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&term))
    }
}

/// Returns the records matching both `search` and `status`, in order.
pub fn apply<'a, T: Searchable>(records: &'a [T], search: &str, status: StatusFilter) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| status.accepts(record.is_active()) && record.matches_search(search))
        .collect()
}
