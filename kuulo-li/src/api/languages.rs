//! Language catalog endpoint

use axum::{extract::State, routing::get, Json, Router};

use crate::db::languages::{self, Language};
use crate::{ApiResult, AppState};

/// GET /api/v1/languages
pub async fn list_languages(State(state): State<AppState>) -> ApiResult<Json<Vec<Language>>> {
    let languages = languages::list_languages(&state.db).await?;
    Ok(Json(languages))
}

/// Build language routes
pub fn language_routes() -> Router<AppState> {
    Router::new().route("/api/v1/languages", get(list_languages))
}
