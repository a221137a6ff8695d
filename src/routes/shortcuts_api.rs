use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::ShortcutError,
    models::{
        palette::CardColor,
        shortcut::{ImageSource, Shortcut},
    },
    services::icon::AvatarStyle,
    services::shortcut::matches_query,
    startup::AppState,
};

/// A shortcut plus its render-time card presentation: the position-keyed
/// palette color and the image the card should actually display.
#[derive(Debug, Serialize)]
pub struct ShortcutView {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub display_image: String,
    pub color: CardColor,
}

/// Computes the display image for a card. Stored generated-avatar URLs are
/// regenerated with the card's palette color so adjacent avatars stay
/// visually distinct regardless of the color baked in at write time; any
/// other stored URL is displayed verbatim.
#[derive(Clone, Debug)]
pub struct CardPresenter {
    avatar: AvatarStyle,
    storage_public_base: String,
}

impl CardPresenter {
    pub fn new(avatar: AvatarStyle, storage_public_base: String) -> Self {
        Self {
            avatar,
            storage_public_base,
        }
    }

    pub fn present(&self, shortcut: &Shortcut, position: usize) -> ShortcutView {
        let color = CardColor::pick(position);

        let regenerate = || self.avatar.with_background(color.avatar).url_for(&shortcut.title);
        let display_image = match shortcut.image_url.as_deref().filter(|u| !u.is_empty()) {
            None => regenerate(),
            Some(url) => match ImageSource::classify(
                url,
                self.avatar.base_url(),
                &self.storage_public_base,
            ) {
                ImageSource::GeneratedAvatar => regenerate(),
                ImageSource::Upload | ImageSource::SearchResult => url.to_string(),
            },
        };

        ShortcutView {
            id: shortcut.id,
            title: shortcut.title.clone(),
            url: shortcut.url.clone(),
            image_url: shortcut.image_url.clone(),
            created_at: shortcut.created_at,
            display_image,
            color,
        }
    }
}

/// `GET /api/shortcuts[?q=]` — the whole collection, newest first, each item
/// carrying its card presentation. `q` applies the case-insensitive
/// substring filter over title and url.
#[instrument(name = "HTTP: List shortcuts", skip(state, params))]
pub async fn list_shortcuts(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Vec<ShortcutView>>, ShortcutError> {
    let shortcuts = state.shortcuts.list().await?;

    let query = params.get("q").map(String::as_str).unwrap_or("");
    let views: Vec<ShortcutView> = shortcuts
        .iter()
        .filter(|s| query.is_empty() || matches_query(s, query))
        .enumerate()
        .map(|(position, s)| state.presenter.present(s, position))
        .collect();

    Ok(Json(views))
}

/// `DELETE /api/shortcuts/{id}` — 204 on success, 404 when the row is
/// already gone so the client can surface it.
#[instrument(name = "HTTP: Delete shortcut", skip(state))]
pub async fn delete_shortcut(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ShortcutError> {
    if state.shortcuts.delete(id).await? {
        tracing::info!(%id, "Shortcut deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        tracing::warn!(%id, "Delete target was not found");
        Err(ShortcutError::NotFound)
    }
}
