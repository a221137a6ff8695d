use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use crate::configuration::StorageSettings;

/// Gateway to the hosted object-storage bucket holding uploaded card
/// images. Public URLs are a pure function of base URL, bucket and key, so
/// no request is needed beyond the upload itself.
#[derive(Clone, Debug)]
pub struct ObjectStore {
    http: reqwest::Client,
    base_url: String,
    bucket: String,
    service_key: SecretString,
}

impl ObjectStore {
    pub fn new(settings: &StorageSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            bucket: settings.bucket.clone(),
            service_key: settings.service_key.clone(),
        }
    }

    #[instrument(name = "Storage: Upload object", skip(self, bytes), fields(size = bytes.len()))]
    pub async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> anyhow::Result<()> {
        let endpoint = format!("{}/object/{}/{}", self.base_url, self.bucket, key);
        let response = self
            .http
            .post(&endpoint)
            .bearer_auth(self.service_key.expose_secret())
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(bytes)
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("object store returned {}", response.status());
        }
        Ok(())
    }

    pub fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_base(), key)
    }

    pub fn public_base(&self) -> String {
        format!("{}/object/public/{}", self.base_url, self.bucket)
    }
}

/// Collision-resistant object key: millisecond timestamp plus the original
/// file name. Not globally unique, but good enough at human entry rates.
pub fn object_key(file_name: &str) -> String {
    format!(
        "{}-{}",
        chrono::Utc::now().timestamp_millis(),
        sanitize_file_name(file_name)
    )
}

fn sanitize_file_name(file_name: &str) -> String {
    let cleaned: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::Secret;

    fn store() -> ObjectStore {
        ObjectStore::new(&StorageSettings {
            base_url: "https://abc.supabase.co/storage/v1/".into(),
            bucket: "shortcut-images".into(),
            service_key: Secret::new("key".into()),
        })
    }

    #[test]
    fn public_url_is_a_pure_function_of_bucket_and_key() {
        assert_eq!(
            store().public_url("17-logo.png"),
            "https://abc.supabase.co/storage/v1/object/public/shortcut-images/17-logo.png"
        );
    }

    #[test]
    fn file_names_are_sanitized_for_url_safety() {
        assert_eq!(sanitize_file_name("my logo (v2).png"), "my-logo--v2-.png");
        assert_eq!(sanitize_file_name("ok_name-1.jpg"), "ok_name-1.jpg");
        assert_eq!(sanitize_file_name("///"), "---");
        assert_eq!(sanitize_file_name(""), "upload");
    }

    #[test]
    fn object_keys_carry_the_original_name() {
        let key = object_key("logo.png");
        assert!(key.ends_with("-logo.png"));
        let (prefix, _) = key.split_once('-').expect("key has a timestamp prefix");
        assert!(prefix.chars().all(|c| c.is_ascii_digit()));
    }
}
