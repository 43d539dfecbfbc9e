//! Media repository trait and implementation

use crate::error::{LibraryError, Result};
use crate::models::{MediaItem, MediaItemRow, MediaKind};
use async_trait::async_trait;
use sqlx::{query_as, SqlitePool};

/// Media repository interface for data access operations
///
/// Every operation is scoped to one [`MediaKind`]; the same `external_id`
/// may exist once per kind.
#[async_trait]
pub trait MediaRepository: Send + Sync {
    /// Find an item by its provider identifier
    ///
    /// # Returns
    /// - `Ok(Some(item))` if found
    /// - `Ok(None)` if not found
    /// - `Err` if database error occurs
    async fn find_by_external_id(
        &self,
        kind: MediaKind,
        external_id: &str,
    ) -> Result<Option<MediaItem>>;

    /// Insert a new item
    ///
    /// If a row with the same `external_id` was written in the meantime, its
    /// provider-owned fields are overwritten instead (last write wins).
    ///
    /// # Errors
    /// Returns error if validation fails or a database error occurs
    async fn insert(&self, item: &MediaItem) -> Result<()>;

    /// Update the provider-owned fields of an existing item
    ///
    /// # Errors
    /// Returns error if:
    /// - Item does not exist
    /// - Item validation fails
    /// - Database error occurs
    async fn update(&self, item: &MediaItem) -> Result<()>;

    /// Newest items first, ordered by `published_at` falling back to
    /// `created_at`. `featured_only` applies to either table.
    async fn list_recent(
        &self,
        kind: MediaKind,
        featured_only: bool,
        limit: u32,
    ) -> Result<Vec<MediaItem>>;

    /// Count items of a kind
    async fn count(&self, kind: MediaKind) -> Result<i64>;

    /// Flag or unflag an item for the featured listing
    ///
    /// Curation happens in the database by hand: sync never touches the flag
    /// and no HTTP route exposes it.
    ///
    /// # Returns
    /// - `Ok(true)` if the item was found
    async fn set_featured(&self, kind: MediaKind, external_id: &str, featured: bool)
        -> Result<bool>;
}

/// SQLite implementation of MediaRepository
pub struct SqliteMediaRepository {
    pool: SqlitePool,
}

impl SqliteMediaRepository {
    /// Create a new SQLite media repository
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    fn metadata_json(item: &MediaItem) -> Result<String> {
        serde_json::to_string(&item.metadata).map_err(|e| LibraryError::Serialization(e.to_string()))
    }

    fn validate(item: &MediaItem) -> Result<()> {
        item.validate().map_err(|msg| LibraryError::InvalidInput {
            field: "media_item".to_string(),
            message: msg,
        })
    }
}

#[async_trait]
impl MediaRepository for SqliteMediaRepository {
    async fn find_by_external_id(
        &self,
        kind: MediaKind,
        external_id: &str,
    ) -> Result<Option<MediaItem>> {
        let sql = format!(
            "SELECT * FROM {} WHERE external_id = ?",
            kind.table_name()
        );

        let row = query_as::<_, MediaItemRow>(&sql)
            .bind(external_id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_item(kind)).transpose()
    }

    async fn insert(&self, item: &MediaItem) -> Result<()> {
        Self::validate(item)?;

        let sql = format!(
            r#"
            INSERT INTO {} (
                id, external_id, title, description, thumbnail_url, source_url,
                category, is_featured, published_at, metadata, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(external_id) DO UPDATE SET
                title = excluded.title,
                description = excluded.description,
                thumbnail_url = excluded.thumbnail_url,
                source_url = excluded.source_url,
                published_at = excluded.published_at,
                metadata = excluded.metadata,
                updated_at = excluded.updated_at
            "#,
            item.kind.table_name()
        );

        sqlx::query(&sql)
            .bind(item.id.to_string())
            .bind(&item.external_id)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.thumbnail_url)
            .bind(&item.source_url)
            .bind(&item.category)
            .bind(item.is_featured)
            .bind(item.published_at)
            .bind(Self::metadata_json(item)?)
            .bind(item.created_at)
            .bind(item.updated_at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn update(&self, item: &MediaItem) -> Result<()> {
        Self::validate(item)?;

        let sql = format!(
            r#"
            UPDATE {} SET
                title = ?, description = ?, thumbnail_url = ?, source_url = ?,
                published_at = ?, metadata = ?, updated_at = ?
            WHERE external_id = ?
            "#,
            item.kind.table_name()
        );

        let result = sqlx::query(&sql)
            .bind(&item.title)
            .bind(&item.description)
            .bind(&item.thumbnail_url)
            .bind(&item.source_url)
            .bind(item.published_at)
            .bind(Self::metadata_json(item)?)
            .bind(item.updated_at)
            .bind(&item.external_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(LibraryError::NotFound {
                entity_type: item.kind.table_name().to_string(),
                id: item.external_id.clone(),
            });
        }

        Ok(())
    }

    async fn list_recent(
        &self,
        kind: MediaKind,
        featured_only: bool,
        limit: u32,
    ) -> Result<Vec<MediaItem>> {
        let sql = format!(
            r#"
            SELECT * FROM {}
            WHERE (? = 0 OR is_featured = 1)
            ORDER BY COALESCE(published_at, created_at) DESC, created_at DESC, id
            LIMIT ?
            "#,
            kind.table_name()
        );

        let rows = query_as::<_, MediaItemRow>(&sql)
            .bind(featured_only)
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter().map(|r| r.into_item(kind)).collect()
    }

    async fn count(&self, kind: MediaKind) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", kind.table_name());
        let count: (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;

        Ok(count.0)
    }

    async fn set_featured(
        &self,
        kind: MediaKind,
        external_id: &str,
        featured: bool,
    ) -> Result<bool> {
        let sql = format!(
            "UPDATE {} SET is_featured = ? WHERE external_id = ?",
            kind.table_name()
        );

        let result = sqlx::query(&sql)
            .bind(featured)
            .bind(external_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;
    use crate::models::MediaItemDraft;
    use serde_json::{json, Map};

    fn create_test_item(kind: MediaKind, external_id: &str, published_at: Option<i64>) -> MediaItem {
        let mut metadata = Map::new();
        metadata.insert("mimeType".to_string(), json!("image/jpeg"));

        MediaItem::from_draft(
            MediaItemDraft {
                kind,
                external_id: external_id.to_string(),
                title: format!("Item {}", external_id),
                description: None,
                thumbnail_url: Some(format!("https://thumb/{}", external_id)),
                source_url: Some(format!("https://view/{}", external_id)),
                published_at,
                metadata,
            },
            1_699_200_000,
        )
    }

    async fn repo() -> SqliteMediaRepository {
        SqliteMediaRepository::new(create_test_pool().await.unwrap())
    }

    #[tokio::test]
    async fn test_insert_and_find_item() {
        let repo = repo().await;
        let item = create_test_item(MediaKind::Photo, "file-1", None);

        repo.insert(&item).await.unwrap();

        let found = repo
            .find_by_external_id(MediaKind::Photo, "file-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, item.id);
        assert_eq!(found.title, "Item file-1");
        assert_eq!(found.category, "general");
        assert_eq!(found.metadata.get("mimeType"), Some(&json!("image/jpeg")));
    }

    #[tokio::test]
    async fn test_kinds_are_separate_namespaces() {
        let repo = repo().await;
        repo.insert(&create_test_item(MediaKind::Photo, "shared", None))
            .await
            .unwrap();

        assert!(repo
            .find_by_external_id(MediaKind::Video, "shared")
            .await
            .unwrap()
            .is_none());

        repo.insert(&create_test_item(MediaKind::Video, "shared", None))
            .await
            .unwrap();
        assert_eq!(repo.count(MediaKind::Photo).await.unwrap(), 1);
        assert_eq!(repo.count(MediaKind::Video).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_update_item() {
        let repo = repo().await;
        let mut item = create_test_item(MediaKind::Video, "vid-1", Some(10));
        repo.insert(&item).await.unwrap();

        item.title = "Renamed".to_string();
        item.updated_at += 60;
        repo.update(&item).await.unwrap();

        let found = repo
            .find_by_external_id(MediaKind::Video, "vid-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.title, "Renamed");
        assert_eq!(found.created_at, item.created_at);
        assert_eq!(found.updated_at, item.updated_at);
    }

    #[tokio::test]
    async fn test_update_missing_item_is_not_found() {
        let repo = repo().await;
        let item = create_test_item(MediaKind::Photo, "ghost", None);

        let err = repo.update(&item).await.unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_insert_converges() {
        let repo = repo().await;
        let first = create_test_item(MediaKind::Photo, "file-1", None);
        repo.insert(&first).await.unwrap();

        let mut second = create_test_item(MediaKind::Photo, "file-1", None);
        second.title = "Later".to_string();
        repo.insert(&second).await.unwrap();

        assert_eq!(repo.count(MediaKind::Photo).await.unwrap(), 1);
        let found = repo
            .find_by_external_id(MediaKind::Photo, "file-1")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, first.id);
        assert_eq!(found.title, "Later");
    }

    #[tokio::test]
    async fn test_list_recent_orders_newest_first() {
        let repo = repo().await;
        repo.insert(&create_test_item(MediaKind::Video, "old", Some(100)))
            .await
            .unwrap();
        repo.insert(&create_test_item(MediaKind::Video, "new", Some(300)))
            .await
            .unwrap();
        repo.insert(&create_test_item(MediaKind::Video, "mid", Some(200)))
            .await
            .unwrap();

        let items = repo.list_recent(MediaKind::Video, false, 2).await.unwrap();
        let ids: Vec<_> = items.iter().map(|i| i.external_id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid"]);
    }

    #[tokio::test]
    async fn test_list_recent_featured_only() {
        let repo = repo().await;
        repo.insert(&create_test_item(MediaKind::Photo, "a", Some(1)))
            .await
            .unwrap();
        repo.insert(&create_test_item(MediaKind::Photo, "b", Some(2)))
            .await
            .unwrap();

        assert!(repo.set_featured(MediaKind::Photo, "a", true).await.unwrap());
        assert!(!repo.set_featured(MediaKind::Photo, "zzz", true).await.unwrap());

        let items = repo.list_recent(MediaKind::Photo, true, 50).await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].external_id, "a");
        assert!(items[0].is_featured);
    }

    #[tokio::test]
    async fn test_insert_rejects_invalid_item() {
        let repo = repo().await;
        let item = create_test_item(MediaKind::Photo, "", None);

        let err = repo.insert(&item).await.unwrap_err();
        assert!(err.is_input_error());
    }
}
