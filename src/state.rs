/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::services::auth::AuthService;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: sqlx::SqlitePool,
    pub auth: Arc<AuthService>,
}

impl AppState {
    pub fn new(db: sqlx::SqlitePool, auth: Arc<AuthService>) -> Self {
        Self { db, auth }
    }
}
