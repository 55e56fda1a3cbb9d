//! Content repository behaviour against a real SQLite file.

use gda_showcase::dao::{self, FaqInsert, GalleryImageInsert, NewsEventInsert, ProjectInsert, SuccessStoryInsert};
use gda_showcase::db::{sqlite_url_for, Database};
use gda_showcase::storage::{ContentRepository, GalleryImageStore};
use gda_showcase::types::{Classification, ContentKind, Criterion, NewsType};
use tempfile::TempDir;

async fn open() -> (TempDir, Database) {
    let dir = TempDir::new().unwrap();
    let url = sqlite_url_for(&dir.path().join("content.db"));
    let db = Database::connect(Some(&url), 4).await.unwrap();
    db.run_migrations().await.unwrap();
    (dir, db)
}

fn project(title: &str, theme: &str, country: &str, created_at: i64) -> ProjectInsert {
    ProjectInsert {
        title: title.to_string(),
        teaser: String::new(),
        country: country.to_string(),
        theme: theme.to_string(),
        is_active: true,
        is_hero_highlight: false,
        is_featured: false,
        image_urls: vec![],
        video_urls: vec![],
        created_at,
    }
}

fn story(title: &str, related_project_id: Option<i64>, published_at: i64) -> SuccessStoryInsert {
    SuccessStoryInsert {
        title: title.to_string(),
        body: String::new(),
        related_project_id,
        is_published: true,
        is_hero_highlight: false,
        is_featured: false,
        image_urls: vec![],
        video_urls: vec![],
        published_at,
    }
}

#[tokio::test]
async fn find_live_filters_excludes_orders_and_limits() {
    let (_dir, db) = open().await;
    let pool = db.pool();
    let a = dao::insert_project(pool, &project("a", "Education", "Vietnam", 100)).await.unwrap();
    let b = dao::insert_project(pool, &project("b", "Education", "Vietnam", 300)).await.unwrap();
    let c = dao::insert_project(pool, &project("c", "Education", "Vietnam", 200)).await.unwrap();
    let _d = dao::insert_project(pool, &project("d", "Education", "Kenya", 400)).await.unwrap();
    let mut inactive = project("e", "Education", "Vietnam", 500);
    inactive.is_active = false;
    dao::insert_project(pool, &inactive).await.unwrap();

    let criteria = [Criterion::Theme("Education".into()), Criterion::Country("Vietnam".into())];
    let found = db.find_live(ContentKind::Project, &criteria, &[a], 10).await.unwrap();
    assert_eq!(found.iter().map(|p| p.id).collect::<Vec<_>>(), vec![b, c]);

    let limited = db.find_live(ContentKind::Project, &criteria, &[], 1).await.unwrap();
    assert_eq!(limited.len(), 1);
    assert_eq!(limited[0].id, b);
    assert_eq!(
        limited[0].classification,
        Classification::Project { theme: "Education".into(), country: "Vietnam".into() }
    );

    assert_eq!(db.count_live(ContentKind::Project, &criteria).await.unwrap(), 3);
    assert_eq!(db.count_live(ContentKind::Project, &[]).await.unwrap(), 4);
    assert!(db.find_live(ContentKind::Project, &criteria, &[], 0).await.unwrap().is_empty());
}

#[tokio::test]
async fn success_stories_carry_their_project_theme() {
    let (_dir, db) = open().await;
    let pool = db.pool();
    let edu = dao::insert_project(pool, &project("edu", "Education", "Vietnam", 1)).await.unwrap();
    let health = dao::insert_project(pool, &project("health", "Medical", "Kenya", 2)).await.unwrap();
    let s1 = dao::insert_success_story(pool, &story("s1", Some(edu), 10)).await.unwrap();
    let s2 = dao::insert_success_story(pool, &story("s2", Some(health), 20)).await.unwrap();
    let s3 = dao::insert_success_story(pool, &story("s3", None, 30)).await.unwrap();

    let item = db.get_live(ContentKind::SuccessStory, s1).await.unwrap().unwrap();
    match &item.classification {
        Classification::SuccessStory { related_project: Some(p) } => {
            assert_eq!(p.id, edu);
            assert_eq!(p.theme, "Education");
        }
        other => panic!("unexpected classification {other:?}"),
    }
    let orphan = db.get_live(ContentKind::SuccessStory, s3).await.unwrap().unwrap();
    assert_eq!(orphan.classification, Classification::SuccessStory { related_project: None });

    let by_theme = db
        .find_live(ContentKind::SuccessStory, &[Criterion::RelatedProjectTheme("Medical".into())], &[], 3)
        .await
        .unwrap();
    assert_eq!(by_theme.iter().map(|s| s.id).collect::<Vec<_>>(), vec![s2]);
}

#[tokio::test]
async fn news_types_and_media_lists_round_trip() {
    let (_dir, db) = open().await;
    let id = dao::insert_news_event(
        db.pool(),
        &NewsEventInsert {
            title: "fair".into(),
            body: String::new(),
            content_type: "EVENT".into(),
            is_published: true,
            is_hero_highlight: true,
            is_featured: false,
            image_urls: vec!["https://a.example/1.png".into(), "  ".into(), "https://a.example/2.png".into()],
            video_urls: vec!["https://youtu.be/dQw4w9WgXcQ".into()],
            publish_date: 5,
        },
    )
    .await
    .unwrap();

    let item = db.get_live(ContentKind::NewsEvent, id).await.unwrap().unwrap();
    assert_eq!(item.classification, Classification::NewsEvent { content_type: NewsType::Event });
    assert!(item.is_hero_highlight);
    assert_eq!(item.media.image_urls, vec!["https://a.example/1.png", "https://a.example/2.png"]);
    assert_eq!(item.media.video_urls.len(), 1);

    let events = db
        .find_live(ContentKind::NewsEvent, &[Criterion::NewsType(NewsType::Event), Criterion::HeroHighlight], &[], 3)
        .await
        .unwrap();
    assert_eq!(events.len(), 1);
}

#[tokio::test]
async fn gallery_images_come_back_in_display_order() {
    let (_dir, db) = open().await;
    let owner = dao::insert_project(db.pool(), &project("p", "Education", "Vietnam", 1)).await.unwrap();
    let image = |order: Option<i64>, created_at: i64, caption: &str| GalleryImageInsert {
        owner_kind: ContentKind::Project,
        owner_id: owner,
        data: vec![1, 2, 3],
        mime: None,
        file_name: None,
        caption: Some(caption.to_string()),
        order,
        created_at,
    };
    dao::insert_gallery_images(db.pool(), &[image(Some(5), 1, "late"), image(Some(1), 9, "b"), image(Some(1), 2, "a")])
        .await
        .unwrap();
    dao::insert_gallery_images(db.pool(), &[image(None, 0, "appended")]).await.unwrap();

    let images = db.list_gallery_images(ContentKind::Project, owner).await.unwrap();
    let captions: Vec<_> = images.iter().map(|i| i.caption.clone().unwrap()).collect();
    assert_eq!(captions, vec!["a", "b", "late", "appended"]);
    assert_eq!(images[3].order, 6);
    assert_eq!(images[0].mime, "application/octet-stream");
    assert_eq!(images[0].data, vec![1, 2, 3]);

    assert!(db.list_gallery_images(ContentKind::NewsEvent, owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn inserted_rows_are_visible_on_every_pooled_connection() {
    let (_dir, db) = open().await;
    let mut ids = Vec::new();
    for t in 0..4 {
        ids.push(dao::insert_project(db.pool(), &project("p", "Education", "Vietnam", t)).await.unwrap());
        ids.push(dao::insert_success_story(db.pool(), &story("s", None, t)).await.unwrap());
    }

    // Concurrent reads spread over the pool's connections.
    let reads = ids.iter().step_by(2).flat_map(|&id| std::iter::repeat(id).take(4));
    let found = futures::future::join_all(reads.map(|id| db.get_live(ContentKind::Project, id))).await;
    assert!(found.into_iter().all(|r| r.unwrap().is_some()));

    // A fresh write transaction must not hit a lock left behind by the inserts.
    let mut tx = db.pool().begin().await.unwrap();
    let faq_id = dao::insert_faq(
        &mut *tx,
        &FaqInsert { question: "q".into(), answer: "a".into(), order: 0, thumbs_up: 0, thumbs_down: 0 },
    )
    .await
    .unwrap();
    assert_eq!(dao::content_id_by_title(&mut *tx, ContentKind::Project, "p").await.unwrap(), Some(ids[0]));
    tx.commit().await.unwrap();

    assert!(dao::get_faq(db.pool(), faq_id).await.unwrap().is_some());
    assert!(dao::content_exists(db.pool(), ContentKind::SuccessStory, ids[1]).await.unwrap());
}
