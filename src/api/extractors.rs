/*
 * Responsibility
 * - Handler で、検証済み Claims を受け取るための extractor
 * - middleware (auth::access) が Claims を request.extensions() に insert 済みである前提
 * - 見つからない場合は 401 (認証がかかってない・ミドルウェア未設定)
 */
use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::Claims;

pub struct AuthClaims(pub Claims);

impl<S> FromRequestParts<S> for AuthClaims
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthClaims)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
