//! Token extraction

use http::header::AUTHORIZATION;
use http::HeaderMap;

/// Prefix stripped from `Authorization` values
pub const BEARER_PREFIX: &str = "Bearer ";

/// Read the token from `header_name`
///
/// The lookup is case-insensitive. When the header is `Authorization` and
/// the value starts with exactly `Bearer `, the prefix is stripped; any
/// other header is returned verbatim. Missing, non-UTF-8 or empty tokens
/// yield `None`.
pub fn extract_token(headers: &HeaderMap, header_name: &str) -> Option<String> {
    let value = std::str::from_utf8(headers.get(header_name)?.as_bytes()).ok()?;

    let token = if header_name.eq_ignore_ascii_case(AUTHORIZATION.as_str()) {
        value.strip_prefix(BEARER_PREFIX).unwrap_or(value)
    } else {
        value
    };

    (!token.is_empty()).then(|| token.to_string())
}
