use sqlx::{Pool, Postgres};
use tracing::instrument;
use uuid::Uuid;

use crate::models::shortcut::Shortcut;

#[derive(Clone, Debug)]
pub struct ShortcutRepository {
    pool: Pool<Postgres>,
}

impl ShortcutRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    #[instrument(name = "Saving new shortcut to database", skip(self))]
    pub async fn insert(
        &self,
        title: &str,
        url: &str,
        image_url: Option<&str>,
    ) -> anyhow::Result<Uuid> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "INSERT INTO shortcuts (title, url, image_url) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(title)
        .bind(url)
        .bind(image_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to execute query: {:?}", e);
            e
        })?;
        Ok(id)
    }

    /// Full-record overwrite, last write wins. Returns false when the row
    /// no longer exists.
    #[instrument(name = "Updating shortcut in database", skip(self))]
    pub async fn update(
        &self,
        id: Uuid,
        title: &str,
        url: &str,
        image_url: Option<&str>,
    ) -> anyhow::Result<bool> {
        let result =
            sqlx::query("UPDATE shortcuts SET title = $1, url = $2, image_url = $3 WHERE id = $4")
                .bind(title)
                .bind(url)
                .bind(image_url)
                .bind(id)
                .execute(&self.pool)
                .await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(name = "Deleting shortcut from database", skip(self))]
    pub async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM shortcuts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Fetch the whole collection, newest first.
    #[instrument(name = "Fetching all shortcuts from database", skip(self))]
    pub async fn list_all(&self) -> anyhow::Result<Vec<Shortcut>> {
        let rows = sqlx::query_as::<_, Shortcut>(
            "SELECT id, title, url, image_url, created_at FROM shortcuts ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to fetch shortcuts: {:?}", e);
            e
        })?;
        Ok(rows)
    }

    #[instrument(name = "Fetching shortcut by id from database", skip(self))]
    pub async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Shortcut>> {
        let row = sqlx::query_as::<_, Shortcut>(
            "SELECT id, title, url, image_url, created_at FROM shortcuts WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }
}
