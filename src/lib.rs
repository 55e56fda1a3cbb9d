pub mod blob;
pub mod config;
pub mod dao;
pub mod db;
pub mod embed;
pub mod error;
pub mod faq;
pub mod gallery;
pub mod highlights;
pub mod mapping;
pub mod memory;
pub mod ordered;
pub mod pagination;
pub mod related;
pub mod seed;
pub mod storage;
pub mod types;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::blob::{BlobAsset, BlobField};
    pub use crate::config::Config;
    pub use crate::error::{ShowcaseError, ShowcaseResult};
    pub use crate::faq::{Faq, FaqView, Vote};
    pub use crate::gallery::{GalleryItem, GallerySource, MediaGalleryAssembler};
    pub use crate::highlights::{Highlights, Landing};
    pub use crate::pagination::Page;
    pub use crate::related::RelatedContentResolver;
    pub use crate::storage::{ContentRepository, GalleryImageStore};
    pub use crate::types::{Classification, ContentItem, ContentKind, Criterion, MediaUrls, NewsType};
    pub use crate::{ContentStats, DetailView, Showcase};
}

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::blob::{BlobAsset, BlobField};
use crate::config::Config;
use crate::db::Database;
use crate::error::{ShowcaseError, ShowcaseResult};
use crate::faq::{rank_by_helpfulness, FaqView, Vote};
use crate::gallery::{GalleryItem, MediaGalleryAssembler};
use crate::highlights::{highlights_for, Landing, HIGHLIGHT_LIMIT, LANDING_FAQ_LIMIT};
use crate::mapping::{faq_from_row, gallery_image_from_row};
use crate::pagination::Page;
use crate::related::RelatedContentResolver;
use crate::storage::{ContentRepository, GalleryImageStore};
use crate::types::{ContentItem, ContentKind, Criterion};

// --- Data structures for page rendering ---

/// Everything a detail page needs besides the item's own fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailView {
    pub item: ContentItem,
    pub related: Vec<ContentItem>,
    /// Published stories about this project; empty for other kinds.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub project_stories: Vec<ContentItem>,
    pub gallery: Page<GalleryItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStats {
    pub live_projects: u64,
    pub live_news_events: u64,
    pub live_success_stories: u64,
    pub gallery_images: u64,
    pub faqs: u64,
}

/// Async library entry point. Owns the database and the configured limits.
pub struct Showcase {
    db: Database,
    config: Config,
}

impl Showcase {
    /// Connect using `config.database_url` and (optionally) run migrations.
    pub async fn connect(config: Config, run_migrations: bool) -> ShowcaseResult<Self> {
        let db = Database::connect(config.database_url.as_deref(), config.max_connections).await?;
        if run_migrations {
            db.run_migrations().await?;
        }
        Ok(Self { db, config })
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    fn assembler(&self) -> MediaGalleryAssembler {
        MediaGalleryAssembler::new(self.config.gallery_page_size)
    }

    /// Live item or `NotFound`; unpublished items are treated as missing.
    pub async fn item(&self, kind: ContentKind, id: i64) -> ShowcaseResult<ContentItem> {
        self.db.get_live(kind, id).await?.ok_or(ShowcaseError::NotFound { kind, id })
    }

    /// Related items for a live item. `limit` defaults to the configured count.
    pub async fn related(&self, kind: ContentKind, id: i64, limit: Option<usize>) -> ShowcaseResult<Vec<ContentItem>> {
        let item = self.item(kind, id).await?;
        let limit = limit.unwrap_or(self.config.related_limit);
        Ok(RelatedContentResolver::new(&self.db).with_limit(limit).resolve(&item).await?)
    }

    /// One page of the unified gallery. `raw_page` is the unvalidated query parameter.
    pub async fn gallery(&self, kind: ContentKind, id: i64, raw_page: Option<&str>) -> ShowcaseResult<Page<GalleryItem>> {
        let item = self.item(kind, id).await?;
        self.gallery_for(&item, raw_page).await
    }

    async fn gallery_for(&self, item: &ContentItem, raw_page: Option<&str>) -> ShowcaseResult<Page<GalleryItem>> {
        let images = self.db.list_gallery_images(item.kind(), item.id).await?;
        Ok(self.assembler().build(images, &item.media, raw_page))
    }

    /// Detail page data: the item, related items, its gallery page and, for
    /// projects, the latest stories told about it.
    pub async fn detail(&self, kind: ContentKind, id: i64, raw_page: Option<&str>) -> ShowcaseResult<DetailView> {
        let item = self.item(kind, id).await?;
        let related = RelatedContentResolver::new(&self.db)
            .with_limit(self.config.related_limit)
            .resolve(&item)
            .await?;
        let project_stories = match kind {
            ContentKind::Project => {
                self.db
                    .find_live(ContentKind::SuccessStory, &[Criterion::RelatedProject(id)], &[], HIGHLIGHT_LIMIT)
                    .await?
            }
            _ => Vec::new(),
        };
        let gallery = self.gallery_for(&item, raw_page).await?;
        debug!(%kind, id, related = related.len(), gallery_items = gallery.total_items, "detail view");
        Ok(DetailView { item, related, project_stories, gallery })
    }

    /// Landing page rows for every kind plus the first FAQs.
    pub async fn landing(&self) -> ShowcaseResult<Landing> {
        let (projects, news_events, success_stories) = futures::try_join!(
            highlights_for(&self.db, ContentKind::Project, HIGHLIGHT_LIMIT),
            highlights_for(&self.db, ContentKind::NewsEvent, HIGHLIGHT_LIMIT),
            highlights_for(&self.db, ContentKind::SuccessStory, HIGHLIGHT_LIMIT),
        )?;
        let faqs = self.faqs(false, Some(LANDING_FAQ_LIMIT)).await?;
        Ok(Landing { projects, news_events, success_stories, faqs })
    }

    /// FAQs in editorial order, or ranked by helpfulness.
    ///
    /// Ranked listing reads the whole FAQ table and ranks in memory; `limit`
    /// only trims the result.
    pub async fn faqs(&self, ranked: bool, limit: Option<usize>) -> ShowcaseResult<Vec<FaqView>> {
        let fetch_limit = if ranked { None } else { limit };
        let mut faqs: Vec<FaqView> = dao::list_faqs(self.db.pool(), fetch_limit)
            .await?
            .into_iter()
            .map(|row| faq_from_row(row).into())
            .collect();
        if ranked {
            rank_by_helpfulness(&mut faqs);
            if let Some(l) = limit {
                faqs.truncate(l);
            }
        }
        Ok(faqs)
    }

    /// Record a thumbs up/down and return the updated FAQ.
    pub async fn vote_faq(&self, faq_id: i64, vote: Vote) -> ShowcaseResult<FaqView> {
        let touched = dao::record_faq_vote(self.db.pool(), faq_id, vote == Vote::Up).await?;
        if touched == 0 {
            return Err(ShowcaseError::FaqNotFound(faq_id));
        }
        let row = dao::get_faq(self.db.pool(), faq_id).await?.ok_or(ShowcaseError::FaqNotFound(faq_id))?;
        Ok(faq_from_row(row).into())
    }

    /// Binary column of a content row, restricted to the served whitelist.
    pub async fn blob(&self, kind: ContentKind, id: i64, field: &str) -> ShowcaseResult<BlobAsset> {
        let field = BlobField::resolve(kind, field)?;
        if !dao::content_exists(self.db.pool(), kind, id).await? {
            return Err(ShowcaseError::NotFound { kind, id });
        }
        let row = dao::fetch_content_blob(self.db.pool(), kind, id, field.column()).await?.ok_or_else(|| {
            ShowcaseError::BlobMissing { kind, id, field: field.column().to_string() }
        })?;
        Ok(BlobAsset::new(row.data, row.mime, row.file_name))
    }

    pub async fn gallery_image_blob(&self, image_id: i64) -> ShowcaseResult<BlobAsset> {
        let row = dao::get_gallery_image(self.db.pool(), image_id)
            .await?
            .ok_or(ShowcaseError::GalleryImageNotFound(image_id))?;
        let image = gallery_image_from_row(row)?;
        Ok(BlobAsset::new(image.data, image.mime, image.file_name.unwrap_or_default()))
    }

    pub async fn stats(&self) -> ShowcaseResult<ContentStats> {
        Ok(ContentStats {
            live_projects: self.db.count_live(ContentKind::Project, &[]).await?,
            live_news_events: self.db.count_live(ContentKind::NewsEvent, &[]).await?,
            live_success_stories: self.db.count_live(ContentKind::SuccessStory, &[]).await?,
            gallery_images: dao::count_gallery_images(self.db.pool(), None).await?,
            faqs: dao::count_faqs(self.db.pool()).await?,
        })
    }

    pub async fn seed_demo(&self, reset: bool) -> ShowcaseResult<seed::SeedReport> {
        Ok(seed::seed_demo(self.db.pool(), current_epoch(), reset).await?)
    }

    pub async fn vacuum_db(&self) -> ShowcaseResult<()> {
        Ok(self.db.vacuum().await?)
    }
}

pub fn current_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
