/*
 * Responsibility
 * - /drinks 系 CRUD handler
 * - 認可は route 側の guard が済ませている前提 (Claims は extractor で受け取る)
 * - short/long の出し分け: 公開 endpoint は recipe を返さない
 */
use axum::{
    Json,
    extract::{Path, State},
};

use crate::{
    api::{
        dto::drinks::{
            CreateDrinkRequest, DeleteResponse, DrinkLong, DrinkShort, DrinksResponse,
            UpdateDrinkRequest,
        },
        extractors::AuthClaims,
    },
    error::AppError,
    repos::drink_repo,
    state::AppState,
};

fn row_to_long(row: drink_repo::DrinkRow) -> Result<DrinkLong, AppError> {
    // The recipe column only ever holds JSON we serialized ourselves.
    let recipe = serde_json::from_str(&row.recipe).map_err(|e| {
        tracing::error!(error = %e, drink_id = row.id, "stored recipe is not valid json");
        AppError::Internal
    })?;

    Ok(DrinkLong {
        id: row.id,
        title: row.title,
        recipe,
    })
}

fn row_to_short(row: drink_repo::DrinkRow) -> DrinkShort {
    DrinkShort {
        id: row.id,
        title: row.title,
    }
}

/// GET /drinks: public, short representation.
pub async fn get_drinks(
    State(state): State<AppState>,
) -> Result<Json<DrinksResponse<DrinkShort>>, AppError> {
    let rows = drink_repo::list(&state.db).await?;
    let drinks = rows.into_iter().map(row_to_short).collect();

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

/// GET /drinks-detail: requires `get:drinks-detail`, long representation.
pub async fn get_drinks_detail(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    tracing::debug!(sub = claims.sub.as_deref(), "listing drink details");

    let rows = drink_repo::list(&state.db).await?;
    let mut drinks = Vec::with_capacity(rows.len());
    for row in rows {
        drinks.push(row_to_long(row)?);
    }

    Ok(Json(DrinksResponse {
        success: true,
        drinks,
    }))
}

/// POST /drinks: requires `post:drinks`.
pub async fn post_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(req): Json<CreateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_DRINK", m))?;

    let recipe = serde_json::to_string(&req.recipe).map_err(|_| AppError::Internal)?;
    let row = drink_repo::create(&state.db, req.title.trim(), &recipe).await?;

    tracing::info!(sub = claims.sub.as_deref(), drink_id = row.id, "drink created");

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![row_to_long(row)?],
    }))
}

/// PATCH /drinks/{drink_id}: requires `patch:drinks`, 404 if the id is unknown.
pub async fn patch_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(drink_id): Path<i64>,
    Json(req): Json<UpdateDrinkRequest>,
) -> Result<Json<DrinksResponse<DrinkLong>>, AppError> {
    req.validate()
        .map_err(|m| AppError::bad_request("INVALID_DRINK", m))?;

    let recipe = match &req.recipe {
        Some(value) => Some(serde_json::to_string(value).map_err(|_| AppError::Internal)?),
        None => None,
    };

    let row = drink_repo::update(
        &state.db,
        drink_id,
        req.title.as_deref().map(str::trim),
        recipe.as_deref(),
    )
    .await?
    .ok_or(AppError::not_found("drink"))?;

    tracing::info!(sub = claims.sub.as_deref(), drink_id, "drink updated");

    Ok(Json(DrinksResponse {
        success: true,
        drinks: vec![row_to_long(row)?],
    }))
}

/// DELETE /drinks/{drink_id}: requires `delete:drinks`, 404 if the id is unknown.
pub async fn delete_drink(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(drink_id): Path<i64>,
) -> Result<Json<DeleteResponse>, AppError> {
    drink_repo::get(&state.db, drink_id)
        .await?
        .ok_or(AppError::not_found("drink"))?;
    drink_repo::delete(&state.db, drink_id).await?;

    tracing::info!(sub = claims.sub.as_deref(), drink_id, "drink deleted");

    Ok(Json(DeleteResponse {
        success: true,
        delete: drink_id,
    }))
}
