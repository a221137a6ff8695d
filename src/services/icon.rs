use tracing::instrument;

use crate::configuration::AvatarSettings;
use crate::errors::ShortcutError;
use crate::services::icon_search::NounProjectClient;
use crate::store::object::{self, ObjectStore};

/// An image file picked in the create/edit form.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Generated-avatar service parameters. Building a URL from a title is a
/// pure function of the title and these fields (except when `background` is
/// the literal "random", which delegates the choice to the service).
#[derive(Debug, Clone)]
pub struct AvatarStyle {
    base_url: String,
    background: String,
    color: String,
}

impl AvatarStyle {
    pub fn new(settings: &AvatarSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            background: settings.background.clone(),
            color: settings.color.clone(),
        }
    }

    pub fn url_for(&self, title: &str) -> String {
        format!(
            "{}/api/?name={}&background={}&color={}&size=256&font-size=0.33&bold=true",
            self.base_url,
            urlencoding::encode(title),
            self.background,
            self.color,
        )
    }

    /// Same style with the background swapped out, used for the
    /// position-keyed card colors on the list page.
    pub fn with_background(&self, background: &str) -> AvatarStyle {
        AvatarStyle {
            base_url: self.base_url.clone(),
            background: background.to_string(),
            color: self.color.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// What the resolver will do for a given set of form inputs, decided before
/// any I/O happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImagePlan {
    /// A file was picked: store it and use its public URL.
    Upload,
    /// No file and no kept image: icon search (when enabled), then avatar.
    Lookup,
    /// Edit with the image untouched: keep the stored URL.
    KeepPrevious,
}

impl ImagePlan {
    pub fn decide(has_file: bool, previous: Option<&str>, removed_previous: bool) -> ImagePlan {
        if has_file {
            ImagePlan::Upload
        } else if previous.is_none() || removed_previous {
            ImagePlan::Lookup
        } else {
            ImagePlan::KeepPrevious
        }
    }
}

/// Produces the final `image_url` for a shortcut at write time.
#[derive(Clone, Debug)]
pub struct IconResolver {
    store: ObjectStore,
    search: NounProjectClient,
    search_enabled: bool,
    avatar: AvatarStyle,
}

impl IconResolver {
    pub fn new(
        store: ObjectStore,
        search: NounProjectClient,
        search_enabled: bool,
        avatar: AvatarStyle,
    ) -> Self {
        Self {
            store,
            search,
            search_enabled,
            avatar,
        }
    }

    /// Resolve per policy: uploaded file first, then (create mode, or edit
    /// with the previous image removed) a single icon-search attempt with a
    /// silent avatar fallback, otherwise the previous URL untouched. Only
    /// the upload path can fail.
    #[instrument(name = "Resolving shortcut image", skip(self, file))]
    pub async fn resolve(
        &self,
        title: &str,
        file: Option<UploadedImage>,
        previous: Option<&str>,
        removed_previous: bool,
    ) -> Result<String, ShortcutError> {
        match ImagePlan::decide(file.is_some(), previous, removed_previous) {
            ImagePlan::Upload => {
                let file =
                    file.ok_or_else(|| ShortcutError::Upload("missing upload payload".into()))?;
                let key = object::object_key(&file.file_name);
                self.store
                    .upload(&key, file.bytes, &file.content_type)
                    .await
                    .map_err(|e| ShortcutError::Upload(e.to_string()))?;
                Ok(self.store.public_url(&key))
            }
            ImagePlan::Lookup => Ok(self.lookup_or_avatar(title).await),
            ImagePlan::KeepPrevious => Ok(previous.unwrap_or_default().to_string()),
        }
    }

    /// One icon-search attempt; any failure or empty result falls back to
    /// the generated avatar, which cannot fail.
    async fn lookup_or_avatar(&self, title: &str) -> String {
        if self.search_enabled {
            match self.search.search(title).await {
                Ok(Some(url)) => return url,
                Ok(None) => {
                    tracing::info!("No icon match, falling back to generated avatar");
                }
                Err(e) => {
                    tracing::warn!("Icon search failed, falling back to generated avatar: {e}");
                }
            }
        }
        self.avatar.url_for(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::configuration::{IconSearchSettings, StorageSettings};
    use secrecy::Secret;

    fn avatar() -> AvatarStyle {
        AvatarStyle::new(&AvatarSettings {
            base_url: "https://ui-avatars.com".into(),
            background: "4a4a6a".into(),
            color: "fff".into(),
        })
    }

    fn resolver(search_enabled: bool) -> IconResolver {
        let store = ObjectStore::new(&StorageSettings {
            base_url: "https://abc.supabase.co/storage/v1".into(),
            bucket: "shortcut-images".into(),
            service_key: Secret::new("key".into()),
        });
        let search = NounProjectClient::new(&IconSearchSettings {
            enabled: search_enabled,
            endpoint: "http://127.0.0.1:1/v2/icon".into(),
            consumer_key: "k".into(),
            consumer_secret: Secret::new("s".into()),
        });
        IconResolver::new(store, search, search_enabled, avatar())
    }

    #[test]
    fn avatar_urls_are_deterministic() {
        let style = avatar();
        assert_eq!(style.url_for("Work"), style.url_for("Work"));
        assert_eq!(
            style.url_for("Coffee Shop"),
            "https://ui-avatars.com/api/?name=Coffee%20Shop&background=4a4a6a&color=fff&size=256&font-size=0.33&bold=true"
        );
    }

    #[test]
    fn with_background_only_swaps_the_background() {
        let style = avatar().with_background("00c9c8");
        assert_eq!(
            style.url_for("Work"),
            "https://ui-avatars.com/api/?name=Work&background=00c9c8&color=fff&size=256&font-size=0.33&bold=true"
        );
    }

    #[test]
    fn plan_prefers_the_uploaded_file() {
        assert_eq!(ImagePlan::decide(true, None, false), ImagePlan::Upload);
        assert_eq!(
            ImagePlan::decide(true, Some("https://old"), false),
            ImagePlan::Upload
        );
    }

    #[test]
    fn plan_looks_up_when_there_is_nothing_to_keep() {
        assert_eq!(ImagePlan::decide(false, None, false), ImagePlan::Lookup);
        assert_eq!(
            ImagePlan::decide(false, Some("https://old"), true),
            ImagePlan::Lookup
        );
    }

    #[test]
    fn plan_keeps_an_untouched_image() {
        assert_eq!(
            ImagePlan::decide(false, Some("https://old"), false),
            ImagePlan::KeepPrevious
        );
    }

    #[tokio::test]
    async fn avatar_only_mode_resolves_without_any_network_call() {
        // Search disabled: the unroutable endpoint above must never be hit.
        let resolved = resolver(false)
            .resolve("Work", None, None, false)
            .await
            .expect("avatar fallback cannot fail");
        assert_eq!(resolved, avatar().url_for("Work"));
    }

    #[tokio::test]
    async fn search_failure_falls_back_to_the_generated_avatar() {
        // Search enabled but the endpoint is unroutable: the failure is
        // absorbed and the avatar URL comes back instead.
        let resolved = resolver(true)
            .resolve("Work", None, None, false)
            .await
            .expect("fallback cannot fail");
        assert_eq!(resolved, avatar().url_for("Work"));
    }

    #[tokio::test]
    async fn untouched_edit_keeps_the_previous_url() {
        let resolved = resolver(false)
            .resolve("Work", None, Some("https://kept.example/x.png"), false)
            .await
            .expect("keep path cannot fail");
        assert_eq!(resolved, "https://kept.example/x.png");
    }
}
