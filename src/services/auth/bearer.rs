/*
 * Responsibility
 * - Authorization ヘッダから bearer token を取り出すだけ (pure parsing)
 * - 検証は verify 側の責務
 */
use axum::http::{HeaderMap, header};

use super::error::AuthError;

/// Pull the bearer token out of the `Authorization` header.
///
/// Accepts exactly `Bearer <token>` (scheme case-insensitive) and returns the
/// token part unmodified. Anything else is rejected before any decode work.
pub fn extract(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingAuthorizationHeader)?;

    let value = value
        .to_str()
        .map_err(|_| AuthError::MalformedAuthorizationHeader("header is not valid utf-8"))?;

    let mut parts = value.split_whitespace();
    let scheme = parts
        .next()
        .ok_or(AuthError::MalformedAuthorizationHeader("header is empty"))?;

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthError::MalformedAuthorizationHeader(
            "authorization header must start with Bearer",
        ));
    }

    let token = parts
        .next()
        .ok_or(AuthError::MalformedAuthorizationHeader("token not found"))?;

    if parts.next().is_some() {
        return Err(AuthError::MalformedAuthorizationHeader(
            "authorization header must be a bearer token",
        ));
    }

    Ok(token)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn missing_header_is_rejected() {
        let err = extract(&HeaderMap::new()).unwrap_err();
        assert!(matches!(err, AuthError::MissingAuthorizationHeader));
    }

    #[test]
    fn returns_the_token_part_unmodified() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(extract(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn scheme_is_case_insensitive() {
        let headers = headers_with("bearer tok");
        assert_eq!(extract(&headers).unwrap(), "tok");
    }

    #[test]
    fn wrong_scheme_is_rejected() {
        let err = extract(&headers_with("Basic dXNlcjpwdw==")).unwrap_err();
        assert!(matches!(err, AuthError::MalformedAuthorizationHeader(_)));
    }

    #[test]
    fn missing_token_is_rejected() {
        let err = extract(&headers_with("Bearer")).unwrap_err();
        assert!(matches!(err, AuthError::MalformedAuthorizationHeader(_)));
    }

    #[test]
    fn extra_parts_are_rejected() {
        let err = extract(&headers_with("Bearer tok extra")).unwrap_err();
        assert!(matches!(err, AuthError::MalformedAuthorizationHeader(_)));
    }
}
