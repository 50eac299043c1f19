//! Sequential record codes (`C0001`, `CAT001`, ...).

use thiserror::Error;
use tracing::warn;

/// Code parsing error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    #[error("code '{code}' does not follow the {prefix}{width_hint} pattern")]
    Malformed {
        code: String,
        prefix: &'static str,
        width_hint: String,
    },
    #[error("code '{code}' is the last one its counter can hold")]
    Exhausted { code: String },
}

/// A prefix plus a zero-padded counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeSequence {
    prefix: &'static str,
    width: usize,
}

impl CodeSequence {
    pub const CLIENT: Self = Self::new("C", 4);
    pub const PERSON: Self = Self::new("P", 4);
    pub const SERVICE: Self = Self::new("S", 4);
    pub const CATEGORY: Self = Self::new("CAT", 3);

    #[must_use]
    pub const fn new(prefix: &'static str, width: usize) -> Self {
        Self { prefix, width }
    }

    #[must_use]
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// First code of the sequence.
    #[must_use]
    pub fn first(&self) -> String {
        self.format(1)
    }

    /// Returns the code following `last`, or the first code when there is none.
    ///
    /// # Errors
    /// Returns `CodeError::Malformed` if `last` is not a code of this sequence
    /// and `CodeError::Exhausted` if its counter cannot be incremented.
    pub fn next_after(&self, last: Option<&str>) -> Result<String, CodeError> {
        match last {
            None => Ok(self.first()),
            Some(code) => self.successor(code).map(|n| self.format(n)),
        }
    }

    /// Returns the code after the numerically greatest code in `codes`.
    ///
    /// Malformed and exhausted codes are skipped.
    pub fn next_from<'a, I>(&self, codes: I) -> String
    where
        I: IntoIterator<Item = &'a str>,
    {
        let next = codes
            .into_iter()
            .filter_map(|code| match self.successor(code) {
                Ok(n) => Some(n),
                Err(e) => {
                    warn!(error = %e, "Skipping unusable code");
                    None
                }
            })
            .max();

        next.map_or_else(|| self.first(), |n| self.format(n))
    }

    fn successor(&self, code: &str) -> Result<u64, CodeError> {
        self.parse(code)?
            .checked_add(1)
            .ok_or_else(|| CodeError::Exhausted {
                code: code.to_string(),
            })
    }

    /// Extracts the numeric counter of `code`.
    ///
    /// # Errors
    /// Returns `CodeError::Malformed` if the prefix or digits are missing.
    pub fn parse(&self, code: &str) -> Result<u64, CodeError> {
        code.trim()
            .strip_prefix(self.prefix)
            .filter(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
            .and_then(|digits| digits.parse::<u64>().ok())
            .ok_or_else(|| self.malformed(code))
    }

    fn format(&self, n: u64) -> String {
        format!("{}{:0width$}", self.prefix, n, width = self.width)
    }

    fn malformed(&self, code: &str) -> CodeError {
        CodeError::Malformed {
            code: code.to_string(),
            prefix: self.prefix,
            width_hint: "0".repeat(self.width),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(CodeSequence::CLIENT, "C0001" ; "client")]
    #[test_case(CodeSequence::PERSON, "P0001" ; "person")]
    #[test_case(CodeSequence::SERVICE, "S0001" ; "service")]
    #[test_case(CodeSequence::CATEGORY, "CAT001" ; "category")]
    fn test_first_code(sequence: CodeSequence, expected: &str) {
        assert_eq!(sequence.first(), expected);
        assert_eq!(sequence.next_after(None).unwrap(), expected);
    }

    #[test_case(CodeSequence::CATEGORY, "CAT001", "CAT002" ; "category_increment")]
    #[test_case(CodeSequence::CLIENT, "C0009", "C0010" ; "client_carry")]
    #[test_case(CodeSequence::CLIENT, "C9999", "C10000" ; "client_overflow_not_truncated")]
    #[test_case(CodeSequence::SERVICE, "S0041", "S0042" ; "service_increment")]
    #[test_case(CodeSequence::CATEGORY, "CAT999", "CAT1000" ; "category_overflow")]
    fn test_next_after(sequence: CodeSequence, last: &str, expected: &str) {
        assert_eq!(sequence.next_after(Some(last)).unwrap(), expected);
    }

    #[test_case("X0001" ; "wrong_prefix")]
    #[test_case("C" ; "no_digits")]
    #[test_case("C00A1" ; "non_numeric")]
    #[test_case("" ; "empty")]
    fn test_malformed_code(code: &str) {
        assert!(matches!(
            CodeSequence::CLIENT.next_after(Some(code)),
            Err(CodeError::Malformed { .. })
        ));
    }

    #[test_case(CodeSequence::CLIENT, "C18446744073709551615" ; "client")]
    #[test_case(CodeSequence::CATEGORY, "CAT18446744073709551615" ; "category")]
    fn test_exhausted_counter(sequence: CodeSequence, last: &str) {
        assert!(matches!(
            sequence.next_after(Some(last)),
            Err(CodeError::Exhausted { .. })
        ));
    }

    #[test]
    fn test_next_from_skips_exhausted_code() {
        let codes = ["C0007", "C18446744073709551615"];
        assert_eq!(CodeSequence::CLIENT.next_from(codes), "C0008");
        assert_eq!(
            CodeSequence::CLIENT.next_from(["C18446744073709551615"]),
            "C0001"
        );
    }

    #[test]
    fn test_next_from_uses_numeric_maximum() {
        let codes = ["C0002", "C0010", "C0009", "bogus"];
        assert_eq!(CodeSequence::CLIENT.next_from(codes), "C0011");
    }

    #[test]
    fn test_next_from_empty_or_malformed_yields_first() {
        assert_eq!(CodeSequence::PERSON.next_from([]), "P0001");
        assert_eq!(CodeSequence::PERSON.next_from(["nope", "X1"]), "P0001");
    }
}
