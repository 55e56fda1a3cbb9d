//! Demo content for local runs of the CLI.

use anyhow::Result;
use sqlx::AnyPool;
use tracing::info;

use crate::blob::BlobField;
use crate::dao::{
    self, BlobInsert, FaqInsert, GalleryImageInsert, NewsEventInsert, ProjectInsert, SuccessStoryInsert,
};
use crate::types::ContentKind;

/// 1x1 transparent PNG.
const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00,
    0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1f, 0x15, 0xc4, 0x89, 0x00, 0x00, 0x00,
    0x0d, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0d, 0x0a, 0x2d,
    0xb4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
];

const DAY: i64 = 24 * 60 * 60;

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct SeedReport {
    pub projects: usize,
    pub news_events: usize,
    pub success_stories: usize,
    pub gallery_images: usize,
    pub faqs: usize,
}

/// Insert a small, varied data set. `now` anchors all timestamps (unix seconds).
///
/// Runs in one transaction. Without `reset`, rows whose title (or FAQ question)
/// already exists are left alone, so seeding twice adds nothing.
pub async fn seed_demo(pool: &AnyPool, now: i64, reset: bool) -> Result<SeedReport> {
    let mut tx = pool.begin().await?;
    if reset {
        dao::clear_content(&mut *tx).await?;
        info!("cleared existing content");
    }
    let mut report = SeedReport::default();

    let projects = [
        ("Teach English in Hanoi", "Education", "Vietnam", true, false),
        ("Library Builders", "Education", "Vietnam", false, true),
        ("Coding Club Mentors", "Education", "Vietnam", false, false),
        ("Rural Classrooms", "Education", "Kenya", false, true),
        ("Mobile Clinic Support", "Medical", "Vietnam", true, false),
        ("Clean Water Survey", "Environment", "Kenya", false, false),
        ("Mangrove Replanting", "Environment", "Vietnam", false, false),
    ];
    let mut project_ids = Vec::new();
    let mut first_is_new = false;
    for (i, (title, theme, country, hero, featured)) in projects.into_iter().enumerate() {
        if let Some(id) = dao::content_id_by_title(&mut *tx, ContentKind::Project, title).await? {
            project_ids.push(id);
            continue;
        }
        let id = dao::insert_project(
            &mut *tx,
            &ProjectInsert {
                title: title.to_string(),
                teaser: format!("{title}: volunteer with local partners."),
                country: country.to_string(),
                theme: theme.to_string(),
                is_active: true,
                is_hero_highlight: hero,
                is_featured: featured,
                image_urls: vec![format!("https://loremflickr.com/800/600/volunteer,{}", i + 1)],
                video_urls: if i % 2 == 0 { vec!["https://www.youtube.com/watch?v=dQw4w9WgXcQ".to_string()] } else { vec![] },
                created_at: now - (i as i64) * DAY,
            },
        )
        .await?;
        first_is_new |= i == 0;
        project_ids.push(id);
        report.projects += 1;
    }

    // Gallery and cover belong to the first project and come with it.
    if let (true, Some(&first)) = (first_is_new, project_ids.first()) {
        let images: Vec<GalleryImageInsert> = (0..3)
            .map(|n| GalleryImageInsert {
                owner_kind: ContentKind::Project,
                owner_id: first,
                data: PIXEL_PNG.to_vec(),
                mime: Some("image/png".to_string()),
                file_name: Some(format!("classroom-{n}.png")),
                caption: Some(format!("Classroom day {}", n + 1)),
                order: None,
                created_at: now,
            })
            .collect();
        report.gallery_images += dao::insert_gallery_images_on(&mut *tx, &images).await?.len();
        dao::set_content_blob(
            &mut *tx,
            ContentKind::Project,
            first,
            BlobField::CoverImage.column(),
            &BlobInsert {
                data: PIXEL_PNG.to_vec(),
                mime: Some("image/png".to_string()),
                file_name: Some("cover.png".to_string()),
            },
        )
        .await?;
    }

    let news = [
        ("Volunteer Fair 2024", "EVENT", true, true),
        ("New partner schools", "NEWS", false, false),
        ("Annual report published", "ANNOUNCEMENT", false, false),
        ("Info evening", "EVENT", false, false),
    ];
    for (i, (title, content_type, hero, featured)) in news.into_iter().enumerate() {
        if dao::content_id_by_title(&mut *tx, ContentKind::NewsEvent, title).await?.is_some() {
            continue;
        }
        dao::insert_news_event(
            &mut *tx,
            &NewsEventInsert {
                title: title.to_string(),
                body: String::new(),
                content_type: content_type.to_string(),
                is_published: true,
                is_hero_highlight: hero,
                is_featured: featured,
                image_urls: vec![],
                video_urls: vec![],
                publish_date: now - (i as i64) * DAY,
            },
        )
        .await?;
        report.news_events += 1;
    }

    let stories = [
        ("A summer in Hanoi", project_ids.first().copied()),
        ("Books for every child", project_ids.get(1).copied()),
        ("Why I went back", project_ids.first().copied()),
        ("Notes from the road", None),
    ];
    for (i, (title, related_project_id)) in stories.into_iter().enumerate() {
        if dao::content_id_by_title(&mut *tx, ContentKind::SuccessStory, title).await?.is_some() {
            continue;
        }
        dao::insert_success_story(
            &mut *tx,
            &SuccessStoryInsert {
                title: title.to_string(),
                body: String::new(),
                related_project_id,
                is_published: true,
                is_hero_highlight: i == 0,
                is_featured: false,
                image_urls: vec!["https://drive.google.com/file/d/1AbCdEf/view".to_string()],
                video_urls: vec![],
                published_at: now - (i as i64) * DAY,
            },
        )
        .await?;
        report.success_stories += 1;
    }

    let faqs = [
        ("Who can volunteer?", "Anyone over 18.", 87, 3),
        ("Do I need to speak the local language?", "No, but it helps.", 78, 8),
        ("Is accommodation provided?", "For most projects, yes.", 92, 5),
    ];
    for (question, answer, up, down) in faqs {
        if dao::faq_exists(&mut *tx, question).await? {
            continue;
        }
        let order = dao::next_faq_order(&mut *tx).await?;
        dao::insert_faq(
            &mut *tx,
            &FaqInsert {
                question: question.to_string(),
                answer: answer.to_string(),
                order,
                thumbs_up: up,
                thumbs_down: down,
            },
        )
        .await?;
        report.faqs += 1;
    }

    tx.commit().await?;
    info!(?report, "seeded demo content");
    Ok(report)
}

impl SeedReport {
    pub fn is_empty(&self) -> bool {
        self.projects + self.news_events + self.success_stories + self.gallery_images + self.faqs == 0
    }
}
