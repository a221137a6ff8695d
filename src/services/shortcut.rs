use tracing::instrument;
use uuid::Uuid;

use crate::errors::ShortcutError;
use crate::models::shortcut::Shortcut;
use crate::services::icon::{IconResolver, UploadedImage};
use crate::store::ShortcutRepository;

#[derive(Debug)]
pub struct NewShortcut {
    pub title: String,
    pub url: String,
    pub image: Option<UploadedImage>,
}

#[derive(Debug)]
pub struct ShortcutUpdate {
    pub title: String,
    pub url: String,
    pub image: Option<UploadedImage>,
    /// The user explicitly cleared the stored image, triggering a fresh
    /// lookup even though no new file was picked.
    pub remove_image: bool,
}

#[derive(Clone, Debug)]
pub struct ShortcutService {
    repo: ShortcutRepository,
    icons: IconResolver,
}

impl ShortcutService {
    pub fn new(repo: ShortcutRepository, icons: IconResolver) -> Self {
        Self { repo, icons }
    }

    #[instrument(name = "Service: Create shortcut", skip(self, input), fields(title = %input.title))]
    pub async fn create(&self, input: NewShortcut) -> Result<Uuid, ShortcutError> {
        let (title, url) = validate(&input.title, &input.url)?;

        let image_url = self.icons.resolve(&title, input.image, None, false).await?;
        let id = self.repo.insert(&title, &url, Some(&image_url)).await?;

        tracing::info!(%id, "Shortcut created");
        Ok(id)
    }

    #[instrument(name = "Service: Update shortcut", skip(self, input))]
    pub async fn update(&self, id: Uuid, input: ShortcutUpdate) -> Result<(), ShortcutError> {
        let (title, url) = validate(&input.title, &input.url)?;

        let existing = self.repo.find_by_id(id).await?.ok_or(ShortcutError::NotFound)?;
        let previous = existing
            .image_url
            .as_deref()
            .filter(|u| !u.is_empty());

        let image_url = self
            .icons
            .resolve(&title, input.image, previous, input.remove_image)
            .await?;

        let found = self.repo.update(id, &title, &url, Some(&image_url)).await?;
        if !found {
            return Err(ShortcutError::NotFound);
        }
        Ok(())
    }

    /// Returns whether a row was actually removed.
    #[instrument(name = "Service: Delete shortcut", skip(self))]
    pub async fn delete(&self, id: Uuid) -> Result<bool, ShortcutError> {
        Ok(self.repo.delete(id).await?)
    }

    #[instrument(name = "Service: List shortcuts", skip(self))]
    pub async fn list(&self) -> Result<Vec<Shortcut>, ShortcutError> {
        Ok(self.repo.list_all().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Option<Shortcut>, ShortcutError> {
        Ok(self.repo.find_by_id(id).await?)
    }
}

fn validate(title: &str, url: &str) -> Result<(String, String), ShortcutError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ShortcutError::Validation("Title must not be empty".into()));
    }

    let url = url.trim();
    if url.is_empty() {
        return Err(ShortcutError::Validation("URL must not be empty".into()));
    }
    if url::Url::parse(url).is_err() {
        return Err(ShortcutError::Validation(
            "URL must be a valid absolute URL".into(),
        ));
    }

    Ok((title.to_string(), url.to_string()))
}

/// Case-insensitive substring match against both title and url, the list
/// page's live filter.
pub fn matches_query(shortcut: &Shortcut, query: &str) -> bool {
    let query = query.to_lowercase();
    shortcut.title.to_lowercase().contains(&query)
        || shortcut.url.to_lowercase().contains(&query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shortcut(title: &str, url: &str) -> Shortcut {
        Shortcut {
            id: Uuid::new_v4(),
            title: title.to_string(),
            url: url.to_string(),
            image_url: None,
            created_at: chrono::Utc::now(),
        }
    }

    #[test]
    fn empty_or_blank_titles_are_rejected() {
        assert!(validate("", "https://example.com").is_err());
        assert!(validate("   ", "https://example.com").is_err());
    }

    #[test]
    fn relative_urls_are_rejected() {
        assert!(validate("Work", "").is_err());
        assert!(validate("Work", "/dashboard").is_err());
        assert!(validate("Work", "example.com").is_err());
    }

    #[test]
    fn absolute_urls_pass_and_inputs_are_trimmed() {
        let (title, url) = validate("  Work  ", " https://example.com ").expect("valid input");
        assert_eq!(title, "Work");
        assert_eq!(url, "https://example.com");
    }

    #[test]
    fn filter_matches_title_and_url_case_insensitively() {
        let items = vec![
            shortcut("Work Mail", "https://mail.example.com"),
            shortcut("News", "https://hn.example.com"),
        ];

        let hits: Vec<_> = items.iter().filter(|s| matches_query(s, "WORK")).collect();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Work Mail");

        let by_url: Vec<_> = items.iter().filter(|s| matches_query(s, "hn.")).collect();
        assert_eq!(by_url.len(), 1);
        assert_eq!(by_url[0].title, "News");

        assert!(!items.iter().any(|s| matches_query(s, "missing")));
    }

    #[test]
    fn empty_query_matches_everything() {
        let s = shortcut("Work", "https://example.com");
        assert!(matches_query(&s, ""));
    }
}
