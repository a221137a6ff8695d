use askama::Template;
use axum::{
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    errors::ShortcutError,
    models::shortcut::Shortcut,
    services::icon::UploadedImage,
    services::shortcut::{NewShortcut, ShortcutUpdate},
    startup::AppState,
};

#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {}

#[derive(Template)]
#[template(path = "add_shortcut.html")]
struct AddShortcutTemplate {}

#[derive(Template)]
#[template(path = "edit_shortcut.html")]
struct EditShortcutTemplate {
    shortcut: Shortcut,
}

pub async fn index_page() -> impl IntoResponse {
    Html(IndexTemplate {}.render().unwrap())
}

pub async fn add_page() -> impl IntoResponse {
    Html(AddShortcutTemplate {}.render().unwrap())
}

/// `GET /edit/{id}` — a missing edit target redirects straight back to the
/// list page.
#[instrument(name = "Web: Edit page", skip(state))]
pub async fn edit_page(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match state.shortcuts.get(id).await {
        Ok(Some(shortcut)) => Html(EditShortcutTemplate { shortcut }.render().unwrap()).into_response(),
        Ok(None) => {
            tracing::warn!(%id, "Edit target no longer exists, redirecting to list");
            Redirect::to("/").into_response()
        }
        Err(e) => e.into_response(),
    }
}

#[instrument(name = "Web: Create shortcut", skip(state, multipart))]
pub async fn create_shortcut(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Redirect, ShortcutError> {
    let form = read_form(multipart).await?;

    state
        .shortcuts
        .create(NewShortcut {
            title: form.title,
            url: form.url,
            image: form.image,
        })
        .await?;

    Ok(Redirect::to("/"))
}

#[instrument(name = "Web: Update shortcut", skip(state, multipart))]
pub async fn update_shortcut(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Redirect, ShortcutError> {
    let form = read_form(multipart).await?;

    state
        .shortcuts
        .update(
            id,
            ShortcutUpdate {
                title: form.title,
                url: form.url,
                image: form.image,
                remove_image: form.remove_image,
            },
        )
        .await?;

    Ok(Redirect::to("/"))
}

#[derive(Debug, Default)]
struct ShortcutForm {
    title: String,
    url: String,
    image: Option<UploadedImage>,
    remove_image: bool,
}

/// Pulls the create/edit form out of a multipart body. An image field with
/// no file name or no bytes counts as "no file chosen".
async fn read_form(mut multipart: Multipart) -> Result<ShortcutForm, ShortcutError> {
    let mut form = ShortcutForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ShortcutError::Validation(format!("malformed form payload: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = read_text(field).await?,
            "url" => form.url = read_text(field).await?,
            "remove_image" => {
                let value = read_text(field).await?;
                form.remove_image = matches!(value.as_str(), "on" | "true" | "1");
            }
            "image" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ShortcutError::Validation(format!("unreadable upload: {e}")))?;
                if !file_name.is_empty() && !bytes.is_empty() {
                    form.image = Some(UploadedImage {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            _ => {}
        }
    }

    Ok(form)
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, ShortcutError> {
    field
        .text()
        .await
        .map_err(|e| ShortcutError::Validation(format!("malformed form field: {e}")))
}
