//! Display formatting for Brazilian tax documents.

use std::sync::LazyLock;

use regex::Regex;

static CPF_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{3})(\d{3})(\d{3})(\d{2})$").expect("Invalid CPF regex")
});

static CNPJ_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2})(\d{3})(\d{3})(\d{4})(\d{2})$").expect("Invalid CNPJ regex")
});

/// Formats an 11-digit individual taxpayer number; other input is returned as is.
#[must_use]
pub fn format_cpf(raw: &str) -> String {
    CPF_RE.replace(raw, "$1.$2.$3-$4").into_owned()
}

/// Formats a 14-digit company taxpayer number; other input is returned as is.
#[must_use]
pub fn format_cnpj(raw: &str) -> String {
    CNPJ_RE.replace(raw, "$1.$2.$3/$4-$5").into_owned()
}

/// Formats either document kind, picked by digit count.
#[must_use]
pub fn format_tax_id(raw: &str) -> String {
    if CPF_RE.is_match(raw) {
        format_cpf(raw)
    } else {
        format_cnpj(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("12345678901", "123.456.789-01" ; "cpf")]
    #[test_case("1234567890", "1234567890" ; "cpf_too_short")]
    #[test_case("123.456.789-01", "123.456.789-01" ; "already_formatted")]
    fn test_format_cpf(raw: &str, expected: &str) {
        assert_eq!(format_cpf(raw), expected);
    }

    #[test_case("12345678000199", "12.345.678/0001-99" ; "cnpj")]
    #[test_case("", "" ; "empty")]
    #[test_case("abc", "abc" ; "garbage")]
    fn test_format_cnpj(raw: &str, expected: &str) {
        assert_eq!(format_cnpj(raw), expected);
    }

    #[test]
    fn test_format_tax_id_dispatches_on_length() {
        assert_eq!(format_tax_id("12345678901"), "123.456.789-01");
        assert_eq!(format_tax_id("12345678000199"), "12.345.678/0001-99");
    }
}
