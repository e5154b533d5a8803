/*
 * Responsibility
 * - Bearer トークンの検証 (ヘッダ抽出 → 検証 → permission 判定 → 拒否)
 * - 成功時に、検証済み Claims を request extensions に載せる
 * - route 登録時に必要 permission を明示的に渡す (decorator は使わない)
 */
use axum::{
    Router,
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
};

use crate::error::AppError;
use crate::services::auth::{bearer, permissions};
use crate::state::AppState;

#[derive(Clone)]
struct RequiredPermission {
    state: AppState,
    permission: &'static str,
}

/// Guard every route in `router` behind `permission`.
///
/// 例：
/// ```ignore
/// let detail = access::require(
///     Router::new().route("/drinks-detail", get(get_drinks_detail)),
///     state.clone(),
///     "get:drinks-detail",
/// );
/// ```
///
/// Extraction, verification and the permission check run in that order; the
/// first failure short-circuits with its auth error and the wrapped handler
/// never runs. `route_layer` (not `layer`) so unmatched paths still 404.
pub fn require(
    router: Router<AppState>,
    state: AppState,
    permission: &'static str,
) -> Router<AppState> {
    router.route_layer(middleware::from_fn_with_state(
        RequiredPermission { state, permission },
        access_middleware,
    ))
}

async fn access_middleware(
    State(ctx): State<RequiredPermission>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer::extract(req.headers())?;

    let claims = match ctx.state.auth.verify(token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = ?err,
                permission = ctx.permission,
                "access token verification failed"
            );
            return Err(err.into());
        }
    };

    permissions::check_permission(ctx.permission, &claims)?;

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
