use std::collections::HashMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::json;
use tracing::instrument;

use crate::{errors::IconSearchError, startup::AppState};

/// `GET /api/search-icon?q=` — relay to the third-party icon database.
/// Rejects a missing/blank query before any upstream call; zero upstream
/// results map to 404, upstream failures to 500.
#[instrument(name = "HTTP: Search icon", skip(state, params))]
pub async fn search_icon(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<serde_json::Value>, IconSearchError> {
    let query = required_query(&params)?;

    match state.icon_search.search(query).await? {
        Some(url) => Ok(Json(json!({ "url": url }))),
        None => {
            tracing::info!("No icon found for query");
            Err(IconSearchError::NotFound)
        }
    }
}

fn required_query(params: &HashMap<String, String>) -> Result<&str, IconSearchError> {
    params
        .get("q")
        .map(String::as_str)
        .filter(|q| !q.trim().is_empty())
        .ok_or(IconSearchError::MissingQuery)
}
