//! Form body decoding.

use url::form_urlencoded;

/// Name of the identifier field in lookup requests.
pub const OID_FIELD: &str = "oid";

/// First `oid` value in an `application/x-www-form-urlencoded` body, or an
/// empty string when the body has none.
pub fn extract_oid(body: &[u8]) -> String {
    form_urlencoded::parse(body)
        .find(|(key, _)| key == OID_FIELD)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_oid_among_pairs() {
        assert_eq!(extract_oid(b"oid=9537&range=1d"), "9537");
        assert_eq!(extract_oid(b"range=1d&oid=66"), "66");
    }

    #[test]
    fn first_value_wins() {
        assert_eq!(extract_oid(b"oid=221&oid=149"), "221");
    }

    #[test]
    fn missing_oid_is_empty() {
        assert_eq!(extract_oid(b""), "");
        assert_eq!(extract_oid(b"range=1d"), "");
        assert_eq!(extract_oid(b"oid"), "");
    }

    #[test]
    fn key_must_match_exactly() {
        assert_eq!(extract_oid(b"void=1&oids=2"), "");
    }

    #[test]
    fn decodes_percent_and_plus() {
        assert_eq!(extract_oid(b"oid=a%26b"), "a&b");
        assert_eq!(extract_oid(b"oid=1+2"), "1 2");
    }
}
