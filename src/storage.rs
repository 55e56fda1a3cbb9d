use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ContentItem, ContentKind, Criterion, GalleryImageRecord};

/// Read access to published content.
///
/// Every query only sees live rows (`is_active` / `is_published`) and returns
/// them newest first, ties broken by descending id.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn find_live(
        &self,
        kind: ContentKind,
        criteria: &[Criterion],
        exclude_ids: &[i64],
        limit: usize,
    ) -> Result<Vec<ContentItem>>;

    async fn count_live(&self, kind: ContentKind, criteria: &[Criterion]) -> Result<u64>;

    async fn get_live(&self, kind: ContentKind, id: i64) -> Result<Option<ContentItem>>;
}

#[async_trait]
pub trait GalleryImageStore: Send + Sync {
    /// Images owned by one item, ordered by `order` then creation time.
    async fn list_gallery_images(&self, owner_kind: ContentKind, owner_id: i64) -> Result<Vec<GalleryImageRecord>>;
}
