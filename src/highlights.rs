use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::faq::FaqView;
use crate::storage::ContentRepository;
use crate::types::{ContentItem, ContentKind, Criterion};

pub const HIGHLIGHT_LIMIT: usize = 3;
pub const LANDING_FAQ_LIMIT: usize = 5;

/// Carousel and card rows for one content kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlights {
    pub hero: Vec<ContentItem>,
    /// Featured items, or the newest items when nothing is featured.
    pub latest: Vec<ContentItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Landing {
    pub projects: Highlights,
    pub news_events: Highlights,
    pub success_stories: Highlights,
    pub faqs: Vec<FaqView>,
}

pub async fn highlights_for<R: ContentRepository + ?Sized>(
    repo: &R,
    kind: ContentKind,
    limit: usize,
) -> Result<Highlights> {
    let hero = repo.find_live(kind, &[Criterion::HeroHighlight], &[], limit).await?;
    let featured = repo.find_live(kind, &[Criterion::Featured], &[], limit).await?;
    let latest = if featured.is_empty() { repo.find_live(kind, &[], &[], limit).await? } else { featured };
    Ok(Highlights { hero, latest })
}
