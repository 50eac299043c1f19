//! Serde utilities for platform rows.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;

/// Deserializes `null` as the type's default value.
///
/// The platform returns `null` for empty text columns; records keep plain
/// `String`s and treat both as empty.
///
/// # Errors
///
/// Returns an error if the value is present but of the wrong type.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserializes an optional timestamp with or without an offset.
///
/// `timestamptz` columns carry an offset; plain `timestamp` columns do not
/// and are read as UTC.
///
/// # Errors
///
/// Returns an error if the value is present but not a timestamp.
pub fn timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };

    if raw.is_empty() {
        return Ok(None);
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(parsed.with_timezone(&Utc)));
    }

    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S%.f"))
        .map(|naive| Some(naive.and_utc()))
        .map_err(de::Error::custom)
}

/// Module to handle identifiers that might be UUID strings or bigint numbers.
pub mod flexible_id {
    use super::{Deserializer, Visitor, de, fmt};

    struct StringOrIntVisitor;

    impl Visitor<'_> for StringOrIntVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or integer row identifier")
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_string<E>(self, value: String) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(value)
        }
    }

    /// Deserializes an identifier from a string or number.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is neither a string nor an integer.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(StringOrIntVisitor)
    }

    /// Module to handle optional (nullable) identifiers.
    pub mod option {
        use super::{Deserializer, StringOrIntVisitor, de, fmt};
        use serde::de::Visitor;

        struct OptionVisitor;

        impl<'de> Visitor<'de> for OptionVisitor {
            type Value = Option<String>;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("an optional row identifier")
            }

            fn visit_none<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_unit<E>(self) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(None)
            }

            fn visit_some<D>(self, deserializer: D) -> Result<Self::Value, D::Error>
            where
                D: Deserializer<'de>,
            {
                let id = deserializer.deserialize_any(StringOrIntVisitor)?;
                Ok(if id.is_empty() { None } else { Some(id) })
            }
        }

        /// Deserializes an optional identifier; empty strings become `None`.
        ///
        /// # Errors
        ///
        /// Returns an error if the value is present but not an identifier.
        pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
        where
            D: Deserializer<'de>,
        {
            deserializer.deserialize_option(OptionVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Row {
        #[serde(deserialize_with = "flexible_id::deserialize")]
        id: String,
        #[serde(default, deserialize_with = "flexible_id::option::deserialize")]
        parent_id: Option<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "timestamp")]
        updated_at: Option<DateTime<Utc>>,
    }

    #[test]
    fn test_numeric_id_becomes_string() {
        let row: Row = serde_json::from_str(r#"{"id": 42, "name": "x"}"#).unwrap();
        assert_eq!(row.id, "42");
        assert_eq!(row.parent_id, None);
    }

    #[test]
    fn test_null_text_is_empty() {
        let row: Row = serde_json::from_str(r#"{"id": "a", "name": null}"#).unwrap();
        assert_eq!(row.name, "");
    }

    #[test]
    fn test_optional_id_variants() {
        let row: Row = serde_json::from_str(r#"{"id": "a", "parent_id": null}"#).unwrap();
        assert_eq!(row.parent_id, None);

        let row: Row = serde_json::from_str(r#"{"id": "a", "parent_id": ""}"#).unwrap();
        assert_eq!(row.parent_id, None);

        let row: Row = serde_json::from_str(r#"{"id": "a", "parent_id": 7}"#).unwrap();
        assert_eq!(row.parent_id, Some("7".to_string()));
    }

    #[test]
    fn test_timestamp_with_and_without_offset() {
        let row: Row = serde_json::from_str(
            r#"{"id": "a", "updated_at": "2024-03-01T12:30:00.123456+00:00"}"#,
        )
        .unwrap();
        assert!(row.updated_at.is_some());

        let row: Row =
            serde_json::from_str(r#"{"id": "a", "updated_at": "2024-03-01T12:30:00"}"#).unwrap();
        assert_eq!(
            row.updated_at.map(|t| t.to_rfc3339()),
            Some("2024-03-01T12:30:00+00:00".to_string())
        );

        let row: Row = serde_json::from_str(r#"{"id": "a", "updated_at": null}"#).unwrap();
        assert!(row.updated_at.is_none());
    }
}
