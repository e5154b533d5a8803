/*
 * Responsibility
 * - URL 構造の定義
 * - endpoint ごとの必要 permission をここで明示する (guard は middleware::auth::access)
 */
use axum::{
    Router,
    routing::{delete, get, patch, post},
};

use crate::middleware::auth::access;
use crate::state::AppState;

use crate::api::handlers::{
    drinks::{delete_drink, get_drinks, get_drinks_detail, patch_drink, post_drink},
    health::health,
};

/// Build the route table. Guards are registered per route with their
/// permission; merging keeps `GET /drinks` public while `POST /drinks`
/// requires `post:drinks` (same path, different method, different guard).
pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/drinks", get(get_drinks));

    let detail = access::require(
        Router::new().route("/drinks-detail", get(get_drinks_detail)),
        state.clone(),
        "get:drinks-detail",
    );

    let create = access::require(
        Router::new().route("/drinks", post(post_drink)),
        state.clone(),
        "post:drinks",
    );

    let update = access::require(
        Router::new().route("/drinks/{drink_id}", patch(patch_drink)),
        state.clone(),
        "patch:drinks",
    );

    let remove = access::require(
        Router::new().route("/drinks/{drink_id}", delete(delete_drink)),
        state,
        "delete:drinks",
    );

    public.merge(detail).merge(create).merge(update).merge(remove)
}
