use anyhow::Result;
use async_trait::async_trait;

use crate::storage::{ContentRepository, GalleryImageStore};
use crate::types::{ContentItem, ContentKind, Criterion, GalleryImageRecord};

/// Vec-backed repository with the same ordering rules as the SQLite one.
/// Used by tests and for embedding without a database.
#[derive(Debug, Default, Clone)]
pub struct MemoryRepository {
    items: Vec<ContentItem>,
    images: Vec<GalleryImageRecord>,
    honour_exclusions: bool,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self { honour_exclusions: true, ..Self::default() }
    }

    /// Returns excluded ids anyway; exercises callers that must not trust the store.
    pub fn ignoring_exclusions(mut self) -> Self {
        self.honour_exclusions = false;
        self
    }

    pub fn add_item(&mut self, item: ContentItem) {
        self.items.push(item);
    }

    pub fn add_image(&mut self, image: GalleryImageRecord) {
        self.images.push(image);
    }

    fn live<'a>(&'a self, kind: ContentKind, criteria: &'a [Criterion]) -> impl Iterator<Item = &'a ContentItem> + 'a {
        self.items
            .iter()
            .filter(move |i| i.kind() == kind && i.is_live && criteria.iter().all(|c| c.matches(i)))
    }
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    async fn find_live(
        &self,
        kind: ContentKind,
        criteria: &[Criterion],
        exclude_ids: &[i64],
        limit: usize,
    ) -> Result<Vec<ContentItem>> {
        let mut found: Vec<ContentItem> = self
            .live(kind, criteria)
            .filter(|i| !self.honour_exclusions || !exclude_ids.contains(&i.id))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.recency.cmp(&a.recency).then(b.id.cmp(&a.id)));
        found.truncate(limit);
        Ok(found)
    }

    async fn count_live(&self, kind: ContentKind, criteria: &[Criterion]) -> Result<u64> {
        Ok(self.live(kind, criteria).count() as u64)
    }

    async fn get_live(&self, kind: ContentKind, id: i64) -> Result<Option<ContentItem>> {
        Ok(self.live(kind, &[]).find(|i| i.id == id).cloned())
    }
}

#[async_trait]
impl GalleryImageStore for MemoryRepository {
    async fn list_gallery_images(&self, owner_kind: ContentKind, owner_id: i64) -> Result<Vec<GalleryImageRecord>> {
        let mut images: Vec<GalleryImageRecord> = self
            .images
            .iter()
            .filter(|i| i.owner_kind == owner_kind && i.owner_id == owner_id)
            .cloned()
            .collect();
        images.sort_by_key(|i| (i.order, i.created_at, i.id));
        Ok(images)
    }
}
