//! # Credential Extraction
//!
//! Locates the access token across its two transport locations: the
//! dedicated assertion header, then the named cookie. The header wins when
//! both are present. Malformed or empty cookie fragments are treated as
//! "not found" — extraction never fails.

use axum::http::{header, HeaderMap};

/// Header carrying the provider-issued access token.
pub const ACCESS_TOKEN_HEADER: &str = "CF-Access-JWT-Assertion";

/// Cookie carrying the provider-issued access token.
pub const ACCESS_TOKEN_COOKIE: &str = "CF_Authorization";

/// Extract the access token from the request headers.
///
/// Precedence: [`ACCESS_TOKEN_HEADER`] over [`ACCESS_TOKEN_COOKIE`].
/// Returns `None` when neither location holds a non-empty value.
pub fn access_token(headers: &HeaderMap) -> Option<String> {
    let from_header = headers
        .get(ACCESS_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty());
    if let Some(token) = from_header {
        return Some(token.to_string());
    }

    headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .and_then(token_from_cookie)
}

/// Find the token cookie inside a `Cookie` header value.
///
/// Tolerates arbitrary whitespace around fragments and ignores fragments
/// without an `=` or with an empty value. Any parse ambiguity is "not
/// found", never an error.
fn token_from_cookie(cookie_header: &str) -> Option<String> {
    cookie_header
        .split(';')
        .map(str::trim)
        .filter_map(|fragment| fragment.split_once('='))
        .find(|(name, _)| *name == ACCESS_TOKEN_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(
                axum::http::HeaderName::try_from(*name).unwrap(),
                HeaderValue::from_str(value).unwrap(),
            );
        }
        map
    }

    #[test]
    fn header_token_found() {
        let map = headers(&[(ACCESS_TOKEN_HEADER, "tok-header")]);
        assert_eq!(access_token(&map), Some("tok-header".to_string()));
    }

    #[test]
    fn cookie_token_found() {
        let map = headers(&[("cookie", "CF_Authorization=tok-cookie")]);
        assert_eq!(access_token(&map), Some("tok-cookie".to_string()));
    }

    #[test]
    fn cookie_found_among_other_cookies() {
        let map = headers(&[(
            "cookie",
            "theme=dark; CF_Authorization=tok-cookie ;session=abc",
        )]);
        assert_eq!(access_token(&map), Some("tok-cookie".to_string()));
    }

    #[test]
    fn header_wins_over_cookie() {
        let map = headers(&[
            (ACCESS_TOKEN_HEADER, "tok-header"),
            ("cookie", "CF_Authorization=tok-cookie"),
        ]);
        assert_eq!(access_token(&map), Some("tok-header".to_string()));
    }

    #[test]
    fn absent_everywhere_is_none() {
        assert_eq!(access_token(&HeaderMap::new()), None);
        let map = headers(&[("cookie", "theme=dark; session=abc")]);
        assert_eq!(access_token(&map), None);
    }

    #[test]
    fn malformed_cookie_fragments_are_not_found() {
        // No '=' at all.
        let map = headers(&[("cookie", "CF_Authorization")]);
        assert_eq!(access_token(&map), None);

        // Empty value.
        let map = headers(&[("cookie", "CF_Authorization=")]);
        assert_eq!(access_token(&map), None);

        // Garbage separators around a valid fragment still parse.
        let map = headers(&[("cookie", ";;;=;CF_Authorization=tok;;")]);
        assert_eq!(access_token(&map), Some("tok".to_string()));
    }

    #[test]
    fn empty_header_falls_through_to_cookie() {
        let map = headers(&[
            (ACCESS_TOKEN_HEADER, ""),
            ("cookie", "CF_Authorization=tok-cookie"),
        ]);
        assert_eq!(access_token(&map), Some("tok-cookie".to_string()));
    }
}
