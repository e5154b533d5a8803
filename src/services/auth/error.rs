/*
 * Responsibility
 * - 認可コアのエラー分類 (wire code + HTTP status)
 * - jsonwebtoken のエラーを分類へマッピング
 */
use axum::http::StatusCode;
use thiserror::Error;

/// One variant per detection site in the auth pipeline. The wire `code()` is
/// coarser than the variants on purpose: the variant keeps the status mapping
/// explicit (e.g. `invalid_header` is 401 for a missing kid but 400 for an
/// unknown one), while the code is what clients branch on.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingAuthorizationHeader,

    #[error("{0}")]
    MalformedAuthorizationHeader(&'static str),

    #[error("authorization token header must contain a key id")]
    MissingKeyId,

    #[error("unable to find an appropriate key")]
    UnknownKeyId,

    #[error("unable to parse authentication token")]
    MalformedToken(#[source] jsonwebtoken::errors::Error),

    #[error("token is expired")]
    TokenExpired,

    #[error("incorrect claims, please check the audience and issuer")]
    InvalidClaims(#[source] jsonwebtoken::errors::Error),

    #[error("permissions not included in token")]
    MissingPermissionsClaim,

    #[error("permission not found")]
    PermissionNotFound,
}

impl AuthError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingAuthorizationHeader => "authorization_header_missing",
            Self::MalformedAuthorizationHeader(_) => "invalid_header_format",
            Self::MissingKeyId | Self::UnknownKeyId | Self::MalformedToken(_) => "invalid_header",
            Self::TokenExpired => "token_expired",
            Self::InvalidClaims(_) | Self::MissingPermissionsClaim => "invalid_claims",
            Self::PermissionNotFound => "unauthorized",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::MissingAuthorizationHeader
            | Self::MalformedAuthorizationHeader(_)
            | Self::MissingKeyId
            | Self::TokenExpired
            | Self::InvalidClaims(_) => StatusCode::UNAUTHORIZED,
            Self::UnknownKeyId | Self::MalformedToken(_) | Self::MissingPermissionsClaim => {
                StatusCode::BAD_REQUEST
            }
            Self::PermissionNotFound => StatusCode::FORBIDDEN,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidAudience | ErrorKind::InvalidIssuer => AuthError::InvalidClaims(err),
            // Bad segments, bad base64, bad signature, wrong algorithm, ...
            _ => AuthError::MalformedToken(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_and_code_follow_the_taxonomy() {
        let cases: Vec<(AuthError, &str, StatusCode)> = vec![
            (
                AuthError::MissingAuthorizationHeader,
                "authorization_header_missing",
                StatusCode::UNAUTHORIZED,
            ),
            (
                AuthError::MalformedAuthorizationHeader("token not found"),
                "invalid_header_format",
                StatusCode::UNAUTHORIZED,
            ),
            (AuthError::MissingKeyId, "invalid_header", StatusCode::UNAUTHORIZED),
            (AuthError::UnknownKeyId, "invalid_header", StatusCode::BAD_REQUEST),
            (AuthError::TokenExpired, "token_expired", StatusCode::UNAUTHORIZED),
            (
                AuthError::MissingPermissionsClaim,
                "invalid_claims",
                StatusCode::BAD_REQUEST,
            ),
            (AuthError::PermissionNotFound, "unauthorized", StatusCode::FORBIDDEN),
        ];

        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status(), status);
        }
    }

    #[test]
    fn expired_jwt_error_maps_to_token_expired() {
        let jwt_err =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::ExpiredSignature);
        assert!(matches!(AuthError::from(jwt_err), AuthError::TokenExpired));
    }

    #[test]
    fn audience_jwt_error_maps_to_invalid_claims() {
        let jwt_err =
            jsonwebtoken::errors::Error::from(jsonwebtoken::errors::ErrorKind::InvalidAudience);
        assert!(matches!(AuthError::from(jwt_err), AuthError::InvalidClaims(_)));
    }
}
