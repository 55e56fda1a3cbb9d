use anyhow::{Context, Result};

use crate::dao::{ContentRow, FaqRow, GalleryImageRow};
use crate::faq::Faq;
use crate::types::{Classification, ContentItem, ContentKind, GalleryImageRecord, MediaUrls, NewsType, ProjectRef};

fn classification_from(kind: ContentKind, row: &ContentRow) -> Classification {
    match kind {
        ContentKind::Project => Classification::Project {
            theme: row.dim_primary.clone(),
            country: row.dim_secondary.clone(),
        },
        ContentKind::NewsEvent => Classification::NewsEvent { content_type: NewsType::from_stored(&row.dim_primary) },
        // project_id 0 stands for "no project" (COALESCE in the query)
        ContentKind::SuccessStory => Classification::SuccessStory {
            related_project: (row.project_id > 0)
                .then(|| ProjectRef { id: row.project_id, theme: row.dim_primary.clone() }),
        },
    }
}

fn url_list(raw: &str, what: &str, id: i64) -> Result<Vec<String>> {
    if raw.trim().is_empty() {
        return Ok(Vec::new());
    }
    serde_json::from_str(raw).with_context(|| format!("decoding {what} of content {id}"))
}

pub fn content_item_from_row(kind: ContentKind, row: ContentRow) -> Result<ContentItem> {
    let classification = classification_from(kind, &row);
    let media = MediaUrls {
        image_urls: url_list(&row.image_urls, "image_urls", row.id)?,
        video_urls: url_list(&row.video_urls, "video_urls", row.id)?,
    };
    Ok(ContentItem {
        id: row.id,
        title: row.title,
        classification,
        is_live: row.live != 0,
        is_hero_highlight: row.hero != 0,
        is_featured: row.featured != 0,
        recency: row.recency,
        media,
    })
}

pub fn gallery_image_from_row(row: GalleryImageRow) -> Result<GalleryImageRecord> {
    let owner_kind = row
        .owner_kind
        .parse::<ContentKind>()
        .with_context(|| format!("gallery image {} has unknown owner kind", row.id))?;
    Ok(GalleryImageRecord {
        id: row.id,
        owner_kind,
        owner_id: row.owner_id,
        data: row.image_blob,
        mime: row.image_blob_mime,
        file_name: Some(row.image_blob_name).filter(|s| !s.is_empty()),
        caption: Some(row.caption).filter(|s| !s.trim().is_empty()),
        order: row.sort_order,
        created_at: row.created_at,
    })
}

pub fn faq_from_row(row: FaqRow) -> Faq {
    Faq {
        id: row.id,
        question: row.question,
        answer: row.answer,
        order: row.sort_order,
        thumbs_up: row.thumbs_up.max(0) as u64,
        thumbs_down: row.thumbs_down.max(0) as u64,
    }
}
