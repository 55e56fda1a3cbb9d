use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ShowcaseError;

/// The three kinds of publishable content that have detail pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Project,
    NewsEvent,
    SuccessStory,
}

impl ContentKind {
    pub const ALL: [ContentKind; 3] = [ContentKind::Project, ContentKind::NewsEvent, ContentKind::SuccessStory];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Project => "project",
            ContentKind::NewsEvent => "news_event",
            ContentKind::SuccessStory => "success_story",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = ShowcaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "project" | "projects" => Ok(ContentKind::Project),
            "news_event" | "news_events" | "news" | "event" => Ok(ContentKind::NewsEvent),
            "success_story" | "success_stories" | "story" => Ok(ContentKind::SuccessStory),
            _ => Err(ShowcaseError::UnknownKind(s.to_string())),
        }
    }
}

/// Category of a news/event entry. Values not known to this crate are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsType {
    News,
    Event,
    Announcement,
    Other(String),
}

impl NewsType {
    pub fn as_str(&self) -> &str {
        match self {
            NewsType::News => "NEWS",
            NewsType::Event => "EVENT",
            NewsType::Announcement => "ANNOUNCEMENT",
            NewsType::Other(s) => s,
        }
    }

    pub fn from_stored(s: &str) -> Self {
        match s {
            "NEWS" => NewsType::News,
            "EVENT" => NewsType::Event,
            "ANNOUNCEMENT" => NewsType::Announcement,
            other => NewsType::Other(other.to_string()),
        }
    }
}

/// The project a success story is about, with the theme used for similarity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectRef {
    pub id: i64,
    pub theme: String,
}

/// Per-kind attributes that related-content matching looks at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Classification {
    Project { theme: String, country: String },
    NewsEvent { content_type: NewsType },
    SuccessStory { related_project: Option<ProjectRef> },
}

impl Classification {
    pub fn kind(&self) -> ContentKind {
        match self {
            Classification::Project { .. } => ContentKind::Project,
            Classification::NewsEvent { .. } => ContentKind::NewsEvent,
            Classification::SuccessStory { .. } => ContentKind::SuccessStory,
        }
    }
}

/// External media attached to an item, in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaUrls {
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(default)]
    pub video_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: i64,
    pub title: String,
    pub classification: Classification,
    /// `is_active` for projects, `is_published` for the other kinds.
    pub is_live: bool,
    pub is_hero_highlight: bool,
    pub is_featured: bool,
    /// Unix seconds of `created_at` / `publish_date` / `published_at`.
    pub recency: i64,
    #[serde(default)]
    pub media: MediaUrls,
}

impl ContentItem {
    pub fn kind(&self) -> ContentKind {
        self.classification.kind()
    }
}

/// A single filter a repository query must satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Criterion {
    Theme(String),
    Country(String),
    NewsType(NewsType),
    RelatedProject(i64),
    RelatedProjectTheme(String),
    HeroHighlight,
    Featured,
}

impl Criterion {
    /// In-memory evaluation; a criterion that does not apply to the item's kind never matches.
    pub fn matches(&self, item: &ContentItem) -> bool {
        match (self, &item.classification) {
            (Criterion::Theme(t), Classification::Project { theme, .. }) => theme == t,
            (Criterion::Country(c), Classification::Project { country, .. }) => country == c,
            (Criterion::NewsType(n), Classification::NewsEvent { content_type }) => content_type == n,
            (Criterion::RelatedProject(id), Classification::SuccessStory { related_project }) => {
                related_project.as_ref().is_some_and(|p| p.id == *id)
            }
            (Criterion::RelatedProjectTheme(t), Classification::SuccessStory { related_project }) => {
                related_project.as_ref().is_some_and(|p| &p.theme == t)
            }
            (Criterion::HeroHighlight, _) => item.is_hero_highlight,
            (Criterion::Featured, _) => item.is_featured,
            _ => false,
        }
    }
}

/// An image whose bytes live in the database, attached to one content item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImageRecord {
    pub id: i64,
    pub owner_kind: ContentKind,
    pub owner_id: i64,
    #[serde(skip)]
    pub data: Vec<u8>,
    pub mime: String,
    pub file_name: Option<String>,
    pub caption: Option<String>,
    pub order: i64,
    pub created_at: i64,
}
