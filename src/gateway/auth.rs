//! Caller Identity
//!
//! The gateway does not authenticate; the fronting proxy does. Callers
//! arrive with an opaque identity in the `user-email` header, and every
//! metadata query is scoped to that string verbatim.

use hyper::HeaderMap;

/// Header carrying the opaque caller identity.
pub const IDENTITY_HEADER: &str = "user-email";

/// Extract the caller identity, if present and non-empty.
pub fn identity(headers: &HeaderMap) -> Option<String> {
    headers
        .get(IDENTITY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::header::HeaderValue;

    #[test]
    fn test_identity_present() {
        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("alice@example.com"));

        assert_eq!(identity(&headers).as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn test_identity_absent() {
        assert_eq!(identity(&HeaderMap::new()), None);
    }

    #[test]
    fn test_identity_empty_or_blank_rejected() {
        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static(""));
        assert_eq!(identity(&headers), None);

        headers.insert(IDENTITY_HEADER, HeaderValue::from_static("   "));
        assert_eq!(identity(&headers), None);
    }

    #[test]
    fn test_identity_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(IDENTITY_HEADER, HeaderValue::from_static(" alice@example.com "));

        assert_eq!(identity(&headers).as_deref(), Some("alice@example.com"));
    }
}
