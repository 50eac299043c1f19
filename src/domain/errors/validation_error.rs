//! Form validation error types.

use thiserror::Error;

use crate::domain::code::CodeError;

/// Validation error variants; all are shown inline in the form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: &'static str },

    #[error("code {code} is already in use")]
    CodeTaken { code: String },

    #[error("select a company in the global filter first")]
    CompanyRequired,

    #[error("select at least one user")]
    NothingSelected,

    #[error("'{email}' is not a valid email address")]
    InvalidEmail { email: String },

    #[error(transparent)]
    Code(#[from] CodeError),
}

impl ValidationError {
    #[must_use]
    pub const fn required(field: &'static str) -> Self {
        Self::Required { field }
    }

    #[must_use]
    pub fn code_taken(code: impl Into<String>) -> Self {
        Self::CodeTaken { code: code.into() }
    }
}

/// Fails with `Required` when `value` is blank.
///
/// # Errors
/// Returns `ValidationError::Required` for blank values.
pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::required(field))
    } else {
        Ok(())
    }
}

/// Minimal `local@domain.tld` shape check.
///
/// # Errors
/// Returns `ValidationError::InvalidEmail` when the shape does not match.
pub fn require_email(email: &str) -> Result<(), ValidationError> {
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && domain.contains('.')
            && !domain.starts_with('.')
            && !domain.ends_with('.')
            && !email.contains(char::is_whitespace)
    });

    if valid {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail {
            email: email.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("ana@example.com", true ; "valid")]
    #[test_case("ana@example", false ; "no_tld")]
    #[test_case("@example.com", false ; "no_local")]
    #[test_case("ana example@x.com", false ; "whitespace")]
    #[test_case("", false ; "empty")]
    fn test_require_email(email: &str, ok: bool) {
        assert_eq!(require_email(email).is_ok(), ok);
    }

    #[test]
    fn test_require_blank() {
        assert_eq!(require("name", "  "), Err(ValidationError::required("name")));
        assert!(require("name", "Ana").is_ok());
    }
}
