//! User profile and auth directory entities.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::company::{CompanyRef, company_name};
use crate::domain::filter::Searchable;
use crate::domain::ports::{Embed, Query, Record, Table};
use crate::domain::serde_utils::{flexible_id, null_as_default, timestamp};

/// Access role of a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Master,
    Consultant,
    #[default]
    Client,
}

impl UserRole {
    pub const ALL: [Self; 3] = [Self::Master, Self::Consultant, Self::Client];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Master => "Master",
            Self::Consultant => "Consultant",
            Self::Client => "Client",
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Master => "master",
            Self::Consultant => "consultant",
            Self::Client => "client",
        }
    }

    /// Masters span every company and carry no company of their own.
    #[must_use]
    pub const fn is_master(self) -> bool {
        matches!(self, Self::Master)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Application profile linked to an auth user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserProfile {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
    pub auth_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub job_title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub avatar_url: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: UserRole,
    #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
    pub company_id: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub active: bool,
    #[serde(default, deserialize_with = "timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub company: Option<CompanyRef>,
}

impl UserProfile {
    #[must_use]
    pub fn company_name(&self) -> &str {
        company_name(self.company.as_ref())
    }

    /// Name for headers; falls back to the email.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            &self.email
        } else {
            &self.name
        }
    }
}

impl Searchable for UserProfile {
    fn search_fields(&self) -> Vec<&str> {
        vec![&self.name, &self.email]
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

impl Record for UserProfile {
    const TABLE: Table = Table::Users;

    fn id(&self) -> &str {
        &self.id
    }

    fn query() -> Query {
        Query::table(Self::TABLE)
            .embed(Embed::company())
            .order("name", true)
    }
}

/// Account created by a sign-up call.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DirectoryMetadata {
    #[serde(default)]
    pub name: Option<String>,
}

/// Account listed by the auth directory function.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DirectoryUser {
    #[serde(deserialize_with = "flexible_id::deserialize")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub user_metadata: DirectoryMetadata,
}

impl DirectoryUser {
    /// Metadata name, else the email local part, else empty.
    #[must_use]
    pub fn display_name(&self) -> String {
        if let Some(name) = self
            .user_metadata
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
        {
            return name.to_string();
        }

        self.email
            .split('@')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use test_case::test_case;

    #[test_case(json!({"id": "u1", "email": "ana@example.com", "user_metadata": {"name": "Ana Lima"}}), "Ana Lima" ; "metadata_name")]
    #[test_case(json!({"id": "u1", "email": "ana@example.com", "user_metadata": {}}), "ana" ; "email_local_part")]
    #[test_case(json!({"id": "u1", "email": "ana@example.com", "user_metadata": {"name": "  "}}), "ana" ; "blank_metadata_name")]
    #[test_case(json!({"id": "u1", "email": null, "user_metadata": null}), "" ; "nothing")]
    fn test_directory_display_name(raw: serde_json::Value, expected: &str) {
        let user: DirectoryUser = serde_json::from_value(raw).unwrap();
        assert_eq!(user.display_name(), expected);
    }

    #[test]
    fn test_master_flag() {
        assert!(UserRole::Master.is_master());
        assert!(!UserRole::Client.is_master());
    }
}
