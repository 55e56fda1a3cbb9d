//! Related-content recommendations.
//!
//! Each content kind has an ordered list of similarity tiers, from most to least
//! specific. Tiers are queried in turn until enough items are collected; later
//! tiers only fill the remaining slots and never repeat an earlier pick.

use anyhow::Result;
use tracing::debug;

use crate::ordered::OrderedIdSet;
use crate::storage::ContentRepository;
use crate::types::{Classification, ContentItem, ContentKind, Criterion};

pub const DEFAULT_RELATED_LIMIT: usize = 3;

/// One level of the fallback cascade. `criteria` returns `None` when the source
/// lacks the attribute the tier compares on, which skips the tier.
#[derive(Clone, Copy)]
pub struct Tier {
    pub label: &'static str,
    pub criteria: fn(&ContentItem) -> Option<Vec<Criterion>>,
}

impl std::fmt::Debug for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tier").field("label", &self.label).finish()
    }
}

const PROJECT_TIERS: &[Tier] = &[
    Tier { label: "same theme and country", criteria: project_theme_and_country },
    Tier { label: "same theme", criteria: project_theme },
    Tier { label: "same country", criteria: project_country },
];

const NEWS_EVENT_TIERS: &[Tier] = &[
    Tier { label: "same content type", criteria: news_type },
    Tier { label: "any published", criteria: anything },
];

const SUCCESS_STORY_TIERS: &[Tier] = &[
    Tier { label: "same project", criteria: story_project },
    Tier { label: "same project theme", criteria: story_project_theme },
    Tier { label: "any published", criteria: anything },
];

pub fn tiers_for(kind: ContentKind) -> &'static [Tier] {
    match kind {
        ContentKind::Project => PROJECT_TIERS,
        ContentKind::NewsEvent => NEWS_EVENT_TIERS,
        ContentKind::SuccessStory => SUCCESS_STORY_TIERS,
    }
}

fn project_theme_and_country(item: &ContentItem) -> Option<Vec<Criterion>> {
    match &item.classification {
        Classification::Project { theme, country } => {
            Some(vec![Criterion::Theme(theme.clone()), Criterion::Country(country.clone())])
        }
        _ => None,
    }
}

fn project_theme(item: &ContentItem) -> Option<Vec<Criterion>> {
    match &item.classification {
        Classification::Project { theme, .. } => Some(vec![Criterion::Theme(theme.clone())]),
        _ => None,
    }
}

fn project_country(item: &ContentItem) -> Option<Vec<Criterion>> {
    match &item.classification {
        Classification::Project { country, .. } => Some(vec![Criterion::Country(country.clone())]),
        _ => None,
    }
}

fn news_type(item: &ContentItem) -> Option<Vec<Criterion>> {
    match &item.classification {
        Classification::NewsEvent { content_type } => Some(vec![Criterion::NewsType(content_type.clone())]),
        _ => None,
    }
}

fn story_project(item: &ContentItem) -> Option<Vec<Criterion>> {
    match &item.classification {
        Classification::SuccessStory { related_project: Some(project) } => {
            Some(vec![Criterion::RelatedProject(project.id)])
        }
        _ => None,
    }
}

fn story_project_theme(item: &ContentItem) -> Option<Vec<Criterion>> {
    match &item.classification {
        Classification::SuccessStory { related_project: Some(project) } => {
            Some(vec![Criterion::RelatedProjectTheme(project.theme.clone())])
        }
        _ => None,
    }
}

fn anything(_: &ContentItem) -> Option<Vec<Criterion>> {
    Some(Vec::new())
}

pub struct RelatedContentResolver<'a, R: ContentRepository + ?Sized> {
    repo: &'a R,
    limit: usize,
}

impl<'a, R: ContentRepository + ?Sized> RelatedContentResolver<'a, R> {
    pub fn new(repo: &'a R) -> Self {
        Self { repo, limit: DEFAULT_RELATED_LIMIT }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Up to `limit` live items of the same kind as `source`, most similar first,
    /// newest first within a tier. Never contains `source` and never repeats an id.
    pub async fn resolve(&self, source: &ContentItem) -> Result<Vec<ContentItem>> {
        self.resolve_with(source, tiers_for(source.kind())).await
    }

    pub async fn resolve_with(&self, source: &ContentItem, tiers: &[Tier]) -> Result<Vec<ContentItem>> {
        let kind = source.kind();
        let mut picked = OrderedIdSet::excluding([source.id]);

        for tier in tiers {
            if picked.len() >= self.limit {
                break;
            }
            let Some(criteria) = (tier.criteria)(source) else {
                debug!(%kind, id = source.id, tier = tier.label, "tier skipped, attribute missing");
                continue;
            };
            let remaining = self.limit - picked.len();
            let found = self.repo.find_live(kind, &criteria, &picked.exclusions(), remaining).await?;
            let mut added = 0usize;
            for item in found {
                if item.kind() == kind && picked.insert(item.id, item) {
                    added += 1;
                }
            }
            debug!(%kind, id = source.id, tier = tier.label, added, total = picked.len(), "related tier");
        }

        picked.truncate(self.limit);
        Ok(picked.into_values())
    }
}
