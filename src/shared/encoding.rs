//! Percent-encoding helpers.
//!
//! Browsers' `encodeURIComponent` is the reference for every place a curl
//! argument gets embedded into a URL or credential: unreserved marks such as
//! `!*'()` stay literal, everything else outside `A-Za-z0-9-_.~` is escaped.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters escaped by [`encode_uri_component`].
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encodes a single URI component.
pub fn encode_uri_component(input: &str) -> String {
    utf8_percent_encode(input, URI_COMPONENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_characters_are_escaped() {
        assert_eq!(encode_uri_component("a b&c=d"), "a%20b%26c%3Dd");
        assert_eq!(
            encode_uri_component("https://a.b/c?d=1"),
            "https%3A%2F%2Fa.b%2Fc%3Fd%3D1"
        );
    }

    #[test]
    fn test_unreserved_marks_stay_literal() {
        assert_eq!(encode_uri_component("it's-(ok)_~*!."), "it's-(ok)_~*!.");
    }

    #[test]
    fn test_utf8_is_encoded_per_byte() {
        assert_eq!(encode_uri_component("é"), "%C3%A9");
    }
}
