/*
 * Responsibility
 * - access token (JWT) の検証: 署名 + iss/aud/exp
 * - kid で JWKS から鍵を引く
 * - 検証済み Claims を返す (permission チェックは permissions.rs)
 */
use std::str::FromStr;

use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use thiserror::Error;

use super::error::AuthError;
use super::jwks::{JwksClient, JwksError};

/// Decoded access-token claims.
///
/// NOTE:
/// - `aud` in JWT can be either string or array; jsonwebtoken validates it via
///   `Validation::set_audience`, so we keep the raw value.
/// - `permissions` is how Auth0 RBAC materializes granted actions. Its absence
///   is meaningful (malformed token shape) and is judged by the permission
///   checker, not here.
/// - `sub` is only used for logging, so a token without it still verifies.
#[derive(Debug, Clone, Deserialize)]
pub struct Claims {
    pub iss: String,
    #[serde(default)]
    pub aud: serde_json::Value,

    #[serde(default)]
    pub sub: Option<String>,
    pub exp: u64,

    #[serde(default)]
    pub permissions: Option<Vec<String>>,
}

/// Verification failures split into the auth taxonomy and key-set trouble.
/// The latter is a server configuration problem and must not be reported to
/// the caller as if their token were bad.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    KeySet(#[from] JwksError),
}

/// JWKS-backed access-token verifier.
pub struct AuthService {
    jwks: JwksClient,
    issuer: String,
    audience: String,
    algorithm: Algorithm,
    leeway_seconds: u64,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("algorithm", &self.algorithm)
            .finish()
    }
}

impl AuthService {
    pub fn new(
        jwks: JwksClient,
        issuer: String,
        audience: String,
        algorithm: &str,
        leeway_seconds: u64,
    ) -> Result<Self, String> {
        let algorithm = Algorithm::from_str(algorithm)
            .map_err(|_| format!("unsupported signing algorithm: {}", algorithm))?;

        Ok(Self {
            jwks,
            issuer,
            audience,
            algorithm,
            leeway_seconds,
        })
    }

    /// Verify and decode a bearer credential.
    ///
    /// Order matters: the unverified header is decoded first to learn the
    /// `kid`, the matching JWKS key is looked up, and only then are signature
    /// and claims (alg, aud, iss, exp) checked in one `decode` pass. Nothing
    /// from the token is trusted until that pass succeeds.
    pub async fn verify(&self, token: &str) -> Result<Claims, VerifyError> {
        let header = decode_header(token).map_err(AuthError::MalformedToken)?;
        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;

        let keys = self.jwks.keys().await?;
        let jwk = keys.find(&kid).ok_or(AuthError::UnknownKeyId)?;
        let decoding_key = DecodingKey::from_jwk(jwk).map_err(AuthError::MalformedToken)?;

        let mut validation = Validation::new(self.algorithm);
        validation.set_issuer(&[&self.issuer]);
        validation.set_audience(&[&self.audience]);
        validation.leeway = self.leeway_seconds;

        let data = decode::<Claims>(token, &decoding_key, &validation)
            .map_err(AuthError::from)?;

        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::test_utils::{self, TEST_AUDIENCE, TEST_ISSUER};

    async fn service_against(server: &MockServer) -> AuthService {
        test_utils::mount_jwks(server).await;
        let jwks = JwksClient::from_url(
            format!("{}/.well-known/jwks.json", server.uri()),
            Duration::from_secs(300),
        );
        AuthService::new(jwks, TEST_ISSUER.into(), TEST_AUDIENCE.into(), "RS256", 0).unwrap()
    }

    #[tokio::test]
    async fn valid_token_yields_claims() {
        let server = MockServer::start().await;
        let auth = service_against(&server).await;

        let token = test_utils::token_with(&["get:drinks-detail", "post:drinks"]);
        let claims = auth.verify(&token).await.unwrap();

        assert_eq!(claims.iss, TEST_ISSUER);
        assert_eq!(
            claims.permissions.as_deref(),
            Some(&["get:drinks-detail".to_string(), "post:drinks".to_string()][..])
        );
    }

    #[tokio::test]
    async fn token_without_sub_still_verifies() {
        let server = MockServer::start().await;
        let auth = service_against(&server).await;

        let token = test_utils::sign_token(&serde_json::json!({
            "iss": TEST_ISSUER,
            "aud": TEST_AUDIENCE,
            "exp": test_utils::unix_now() + 3_600,
            "permissions": ["get:drinks-detail"],
        }));
        let claims = auth.verify(&token).await.unwrap();
        assert!(claims.sub.is_none());
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let server = MockServer::start().await;
        let auth = service_against(&server).await;

        let token = test_utils::expired_token(&["get:drinks-detail"]);
        let err = auth.verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::Auth(AuthError::TokenExpired)));
    }

    #[tokio::test]
    async fn wrong_audience_is_invalid_claims_even_with_valid_signature() {
        let server = MockServer::start().await;
        let auth = service_against(&server).await;

        let token = test_utils::sign_token(&serde_json::json!({
            "iss": TEST_ISSUER,
            "aud": "wrong",
            "sub": "auth0|tester",
            "exp": test_utils::unix_now() + 3_600,
            "permissions": ["get:drinks-detail"],
        }));
        let err = auth.verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::Auth(AuthError::InvalidClaims(_))));
    }

    #[tokio::test]
    async fn wrong_issuer_is_invalid_claims() {
        let server = MockServer::start().await;
        let auth = service_against(&server).await;

        let token = test_utils::sign_token(&serde_json::json!({
            "iss": "https://somebody-else.example/",
            "aud": TEST_AUDIENCE,
            "sub": "auth0|tester",
            "exp": test_utils::unix_now() + 3_600,
            "permissions": [],
        }));
        let err = auth.verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::Auth(AuthError::InvalidClaims(_))));
    }

    #[tokio::test]
    async fn unknown_kid_is_rejected() {
        let server = MockServer::start().await;
        let auth = service_against(&server).await;

        let token = test_utils::token_signed_with_kid("some-other-key", &["get:drinks-detail"]);
        let err = auth.verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::Auth(AuthError::UnknownKeyId)));
    }

    #[tokio::test]
    async fn token_without_kid_is_rejected() {
        let server = MockServer::start().await;
        let auth = service_against(&server).await;

        let token = test_utils::token_without_kid(&["get:drinks-detail"]);
        let err = auth.verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::Auth(AuthError::MissingKeyId)));
    }

    #[tokio::test]
    async fn garbage_token_is_malformed() {
        let server = MockServer::start().await;
        let auth = service_against(&server).await;

        let err = auth.verify("not-a-jwt").await.unwrap_err();
        assert!(matches!(err, VerifyError::Auth(AuthError::MalformedToken(_))));
    }

    #[tokio::test]
    async fn tampered_signature_is_rejected() {
        let server = MockServer::start().await;
        let auth = service_against(&server).await;

        let mut token = test_utils::token_with(&["get:drinks-detail"]);
        // Flip a character in the signature segment.
        let flipped = if token.ends_with('A') { 'B' } else { 'A' };
        token.pop();
        token.push(flipped);

        let err = auth.verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::Auth(AuthError::MalformedToken(_))));
    }

    #[tokio::test]
    async fn key_set_failure_is_not_an_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/.well-known/jwks.json"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let jwks = JwksClient::from_url(
            format!("{}/.well-known/jwks.json", server.uri()),
            Duration::from_secs(300),
        );
        let auth =
            AuthService::new(jwks, TEST_ISSUER.into(), TEST_AUDIENCE.into(), "RS256", 0).unwrap();

        let token = test_utils::token_with(&["get:drinks-detail"]);
        let err = auth.verify(&token).await.unwrap_err();
        assert!(matches!(err, VerifyError::KeySet(_)));
    }

    #[test]
    fn unsupported_algorithm_fails_construction() {
        let jwks = JwksClient::from_url("http://localhost/jwks.json".into(), Duration::ZERO);
        let result = AuthService::new(jwks, TEST_ISSUER.into(), TEST_AUDIENCE.into(), "none", 0);
        assert!(result.is_err());
    }
}
