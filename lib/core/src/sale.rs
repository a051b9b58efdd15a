use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

use crate::{Error, Result};

/// Number of leading characters of a sale identifier that encode its locale.
pub const LOCALE_LEN: usize = 5;

/// Opaque, stable identifier of a sale.
///
/// Identifiers look like `fr_FR123456`: the first [`LOCALE_LEN`] characters
/// are the locale ("culture") and the decimal digits embedded anywhere in
/// the string form the sale's numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(String);

impl SaleId {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Locale code: the first five characters of the identifier.
    pub fn locale(&self) -> Result<&str> {
        // Walk chars, not bytes, so multi-byte identifiers never split a code point.
        match self.0.char_indices().nth(LOCALE_LEN) {
            Some((end, _)) => Ok(&self.0[..end]),
            None if self.0.chars().count() == LOCALE_LEN => Ok(&self.0),
            None => Err(Error::MalformedIdentifier {
                id: self.0.clone(),
                reason: "shorter than the 5-character locale prefix",
            }),
        }
    }

    /// Numeric id: every decimal digit of the identifier, concatenated and
    /// parsed as base 10.
    pub fn numeric_id(&self) -> Result<u64> {
        let digits: String = self.0.chars().filter(char::is_ascii_digit).collect();
        if digits.is_empty() {
            return Err(Error::MalformedIdentifier {
                id: self.0.clone(),
                reason: "contains no decimal digits",
            });
        }
        digits.parse::<u64>().map_err(|_| Error::MalformedIdentifier {
            id: self.0.clone(),
            reason: "numeric id does not fit in 64 bits",
        })
    }
}

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for SaleId {
    fn from(s: String) -> Self {
        SaleId(s)
    }
}

impl From<&str> for SaleId {
    fn from(s: &str) -> Self {
        SaleId(s.to_string())
    }
}

impl AsRef<str> for SaleId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for SaleId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locale_is_first_five_chars() {
        let id = SaleId::new("fr_FR123456");
        assert_eq!(id.locale().unwrap(), "fr_FR");
        assert_eq!(id.locale().unwrap().len(), 5);
    }

    #[test]
    fn test_locale_exactly_five_chars() {
        let id = SaleId::new("de_DE");
        assert_eq!(id.locale().unwrap(), "de_DE");
    }

    #[test]
    fn test_locale_too_short() {
        let id = SaleId::new("fr1");
        assert!(matches!(id.locale(), Err(Error::MalformedIdentifier { .. })));
    }

    #[test]
    fn test_numeric_id_strips_non_digits() {
        assert_eq!(SaleId::new("fr_FR123456").numeric_id().unwrap(), 123456);
        assert_eq!(SaleId::new("it_IT-12-34x5").numeric_id().unwrap(), 12345);
    }

    #[test]
    fn test_numeric_id_without_digits() {
        let id = SaleId::new("es_ES_abc");
        assert!(matches!(id.numeric_id(), Err(Error::MalformedIdentifier { .. })));
    }

    #[test]
    fn test_numeric_id_overflow_is_malformed() {
        let id = SaleId::new("fr_FR99999999999999999999999");
        assert!(matches!(id.numeric_id(), Err(Error::MalformedIdentifier { .. })));
    }

    #[test]
    fn test_serde_is_transparent() {
        let id = SaleId::new("fr_FR42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"fr_FR42\"");
    }
}
