//! Opaque product identifiers.
//!
//! Remote catalogs disagree on identifier shape: some hand out integers,
//! others opaque strings such as `gid://shopify/Product/123`, and nothing
//! stops a source from sending something stranger. [`ProductId`] keeps
//! whatever scalar the source used so it can be sent back verbatim (e.g. as
//! the `productId` of a cart write).

use core::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Number;

/// A product identifier as issued by the remote catalog.
///
/// Serializes transparently: a numeric id stays a JSON number (at any
/// width JSON allows), a string id stays a JSON string.
///
/// # Example
///
/// ```rust
/// # use shopview_core::ProductId;
/// let numeric: ProductId = serde_json::from_str("42").unwrap();
/// let opaque: ProductId = serde_json::from_str("\"gid://shopify/Product/1\"").unwrap();
///
/// assert_eq!(numeric.to_string(), "42");
/// assert_eq!(opaque.to_string(), "gid://shopify/Product/1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProductId {
    /// Any JSON number, kept exactly as parsed.
    Numeric(Number),
    /// String identifier, kept as-is.
    Opaque(String),
    Bool(bool),
    Null,
}

impl ProductId {
    /// Returns true if `raw` is the textual form of this identifier.
    ///
    /// Used to resolve identifiers that round-tripped through a form field or
    /// URL path, where the numeric/string distinction is lost.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Opaque(s) => s == raw,
            other => other.to_string() == raw,
        }
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Opaque(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        Self::Numeric(Number::from(id))
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        Self::Opaque(id.to_string())
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        Self::Opaque(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_id_serializes_as_number() {
        let id = ProductId::from(7);
        assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    }

    #[test]
    fn test_opaque_id_serializes_as_string() {
        let id = ProductId::from("gid://shopify/Product/7982905098262");
        assert_eq!(
            serde_json::to_string(&id).unwrap(),
            "\"gid://shopify/Product/7982905098262\""
        );
    }

    #[test]
    fn test_id_beyond_i64_is_kept() {
        let id: ProductId = serde_json::from_str("18446744073709551615").unwrap();
        assert_eq!(id, ProductId::Numeric(Number::from(u64::MAX)));
        assert_eq!(id.to_string(), "18446744073709551615");
        assert_eq!(serde_json::to_string(&id).unwrap(), "18446744073709551615");
    }

    #[test]
    fn test_other_scalars_are_kept() {
        let negative: ProductId = serde_json::from_str("-3").unwrap();
        let float: ProductId = serde_json::from_str("1.5").unwrap();
        let flag: ProductId = serde_json::from_str("true").unwrap();
        let null: ProductId = serde_json::from_str("null").unwrap();

        assert_eq!(negative, ProductId::from(-3));
        assert_eq!(float.to_string(), "1.5");
        assert_eq!(flag, ProductId::Bool(true));
        assert_eq!(null, ProductId::Null);
        assert_eq!(serde_json::to_string(&null).unwrap(), "null");
    }

    #[test]
    fn test_numeric_and_string_forms_are_distinct() {
        assert_ne!(ProductId::from(1), ProductId::from("1"));
    }

    #[test]
    fn test_matches_raw_form() {
        assert!(ProductId::from(12).matches("12"));
        assert!(!ProductId::from(12).matches("120"));
        assert!(!ProductId::from(12).matches("twelve"));
        assert!(ProductId::Numeric(Number::from(u64::MAX)).matches("18446744073709551615"));
        assert!(ProductId::from("abc").matches("abc"));
        assert!(!ProductId::from("abc").matches("ABC"));
        assert!(ProductId::Null.matches("null"));
    }
}
