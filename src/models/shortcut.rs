use serde::{Deserialize, Serialize};
use sqlx::prelude::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Shortcut {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub image_url: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Where a stored `image_url` came from. The classification is a prefix test
/// against the configured avatar-service and storage-public base URLs; this
/// enum is the only place that sniffing happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSource {
    Upload,
    SearchResult,
    GeneratedAvatar,
}

impl ImageSource {
    pub fn classify(image_url: &str, avatar_base: &str, storage_public_base: &str) -> Self {
        if image_url.starts_with(avatar_base) {
            ImageSource::GeneratedAvatar
        } else if image_url.starts_with(storage_public_base) {
            ImageSource::Upload
        } else {
            ImageSource::SearchResult
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const AVATAR: &str = "https://ui-avatars.com";
    const STORAGE: &str = "https://abc.supabase.co/storage/v1/object/public/shortcut-images";

    #[test]
    fn generated_avatar_urls_are_recognized() {
        let url = "https://ui-avatars.com/api/?name=Work&background=4a4a6a&color=fff";
        assert_eq!(
            ImageSource::classify(url, AVATAR, STORAGE),
            ImageSource::GeneratedAvatar
        );
    }

    #[test]
    fn bucket_urls_are_uploads() {
        let url = "https://abc.supabase.co/storage/v1/object/public/shortcut-images/17-logo.png";
        assert_eq!(
            ImageSource::classify(url, AVATAR, STORAGE),
            ImageSource::Upload
        );
    }

    #[test]
    fn anything_else_is_a_search_result() {
        let url = "https://static.thenounproject.com/png/12345-200.png";
        assert_eq!(
            ImageSource::classify(url, AVATAR, STORAGE),
            ImageSource::SearchResult
        );
    }
}
