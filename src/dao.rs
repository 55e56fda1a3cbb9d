use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use sqlx::any::AnyArguments;
use sqlx::query::QueryAs;
use sqlx::{Any, AnyConnection, AnyPool, Executor};

use crate::types::{ContentKind, Criterion};

/// Uniform row shape for all three content tables. Kind-specific columns are
/// aliased onto `dim_primary` / `dim_secondary` / `project_id`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ContentRow {
    pub id: i64,
    pub title: String,
    pub dim_primary: String,
    pub dim_secondary: String,
    pub project_id: i64,
    pub live: i64,
    pub hero: i64,
    pub featured: i64,
    pub recency: i64,
    pub image_urls: String,
    pub video_urls: String,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GalleryImageRow {
    pub id: i64,
    pub owner_kind: String,
    pub owner_id: i64,
    pub image_blob: Vec<u8>,
    pub image_blob_mime: String,
    pub image_blob_name: String,
    pub caption: String,
    pub sort_order: i64,
    pub created_at: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FaqRow {
    pub id: i64,
    pub question: String,
    pub answer: String,
    pub sort_order: i64,
    pub thumbs_up: i64,
    pub thumbs_down: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlobRow {
    pub data: Vec<u8>,
    pub mime: String,
    pub file_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectInsert {
    pub title: String,
    pub teaser: String,
    pub country: String,
    pub theme: String,
    pub is_active: bool,
    pub is_hero_highlight: bool,
    pub is_featured: bool,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsEventInsert {
    pub title: String,
    pub body: String,
    pub content_type: String,
    pub is_published: bool,
    pub is_hero_highlight: bool,
    pub is_featured: bool,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub publish_date: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessStoryInsert {
    pub title: String,
    pub body: String,
    pub related_project_id: Option<i64>,
    pub is_published: bool,
    pub is_hero_highlight: bool,
    pub is_featured: bool,
    pub image_urls: Vec<String>,
    pub video_urls: Vec<String>,
    pub published_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GalleryImageInsert {
    pub owner_kind: ContentKind,
    pub owner_id: i64,
    pub data: Vec<u8>,
    pub mime: Option<String>,
    pub file_name: Option<String>,
    pub caption: Option<String>,
    /// Appended after the current last image when `None`.
    pub order: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FaqInsert {
    pub question: String,
    pub answer: String,
    pub order: i64,
    pub thumbs_up: i64,
    pub thumbs_down: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobInsert {
    pub data: Vec<u8>,
    pub mime: Option<String>,
    pub file_name: Option<String>,
}

/// Column names for one content table.
struct TableSpec {
    select: &'static str,
    id: &'static str,
    live: &'static str,
    recency: &'static str,
    hero: &'static str,
    featured: &'static str,
}

const PROJECTS: TableSpec = TableSpec {
    select: "SELECT id, title, theme AS dim_primary, country AS dim_secondary, 0 AS project_id,
                    is_active AS live, is_hero_highlight AS hero, is_featured AS featured,
                    created_at AS recency, image_urls, video_urls
             FROM projects",
    id: "id",
    live: "is_active",
    recency: "created_at",
    hero: "is_hero_highlight",
    featured: "is_featured",
};

const NEWS_EVENTS: TableSpec = TableSpec {
    select: "SELECT id, title, content_type AS dim_primary, '' AS dim_secondary, 0 AS project_id,
                    is_published AS live, is_hero_highlight AS hero, is_featured AS featured,
                    publish_date AS recency, image_urls, video_urls
             FROM news_events",
    id: "id",
    live: "is_published",
    recency: "publish_date",
    hero: "is_hero_highlight",
    featured: "is_featured",
};

const SUCCESS_STORIES: TableSpec = TableSpec {
    select: "SELECT s.id AS id, s.title AS title, COALESCE(p.theme, '') AS dim_primary, '' AS dim_secondary,
                    COALESCE(s.related_project_id, 0) AS project_id,
                    s.is_published AS live, s.is_hero_highlight AS hero, s.is_featured AS featured,
                    s.published_at AS recency, s.image_urls AS image_urls, s.video_urls AS video_urls
             FROM success_stories s LEFT JOIN projects p ON p.id = s.related_project_id",
    id: "s.id",
    live: "s.is_published",
    recency: "s.published_at",
    hero: "s.is_hero_highlight",
    featured: "s.is_featured",
};

fn table_name(kind: ContentKind) -> &'static str {
    match kind {
        ContentKind::Project => "projects",
        ContentKind::NewsEvent => "news_events",
        ContentKind::SuccessStory => "success_stories",
    }
}

fn table(kind: ContentKind) -> &'static TableSpec {
    match kind {
        ContentKind::Project => &PROJECTS,
        ContentKind::NewsEvent => &NEWS_EVENTS,
        ContentKind::SuccessStory => &SUCCESS_STORIES,
    }
}

enum BindValue {
    Text(String),
    Int(i64),
}

fn criterion_clause(kind: ContentKind, criterion: &Criterion) -> Result<(&'static str, BindValue)> {
    let spec = table(kind);
    let clause = match (kind, criterion) {
        (ContentKind::Project, Criterion::Theme(t)) => ("theme", BindValue::Text(t.clone())),
        (ContentKind::Project, Criterion::Country(c)) => ("country", BindValue::Text(c.clone())),
        (ContentKind::NewsEvent, Criterion::NewsType(n)) => ("content_type", BindValue::Text(n.as_str().to_string())),
        (ContentKind::SuccessStory, Criterion::RelatedProject(id)) => ("s.related_project_id", BindValue::Int(*id)),
        (ContentKind::SuccessStory, Criterion::RelatedProjectTheme(t)) => ("p.theme", BindValue::Text(t.clone())),
        (_, Criterion::HeroHighlight) => (spec.hero, BindValue::Int(1)),
        (_, Criterion::Featured) => (spec.featured, BindValue::Int(1)),
        (kind, other) => bail!("criterion {other:?} does not apply to {kind}"),
    };
    Ok(clause)
}

/// `WHERE` clause plus its bind values, in placeholder order.
fn where_clause(kind: ContentKind, criteria: &[Criterion], exclude_ids: &[i64]) -> Result<(String, Vec<BindValue>)> {
    let spec = table(kind);
    let mut sql = format!(" WHERE {} = 1", spec.live);
    let mut binds = Vec::with_capacity(criteria.len() + exclude_ids.len());
    for c in criteria {
        let (column, value) = criterion_clause(kind, c)?;
        sql.push_str(&format!(" AND {column} = ?"));
        binds.push(value);
    }
    if !exclude_ids.is_empty() {
        let placeholders = vec!["?"; exclude_ids.len()].join(", ");
        sql.push_str(&format!(" AND {} NOT IN ({placeholders})", spec.id));
        binds.extend(exclude_ids.iter().map(|id| BindValue::Int(*id)));
    }
    Ok((sql, binds))
}

fn bind_all<'q, O>(
    mut query: QueryAs<'q, Any, O, AnyArguments<'q>>,
    binds: Vec<BindValue>,
) -> QueryAs<'q, Any, O, AnyArguments<'q>> {
    for b in binds {
        query = match b {
            BindValue::Text(s) => query.bind(s),
            BindValue::Int(i) => query.bind(i),
        };
    }
    query
}

pub async fn find_live(
    pool: &AnyPool,
    kind: ContentKind,
    criteria: &[Criterion],
    exclude_ids: &[i64],
    limit: usize,
) -> Result<Vec<ContentRow>> {
    if limit == 0 {
        return Ok(Vec::new());
    }
    let spec = table(kind);
    let (filter, binds) = where_clause(kind, criteria, exclude_ids)?;
    let sql = format!("{}{filter} ORDER BY {} DESC, {} DESC LIMIT ?", spec.select, spec.recency, spec.id);
    let query = bind_all(sqlx::query_as::<_, ContentRow>(&sql), binds).bind(limit as i64);
    Ok(query.fetch_all(pool).await?)
}

pub async fn count_live(pool: &AnyPool, kind: ContentKind, criteria: &[Criterion]) -> Result<u64> {
    let (filter, binds) = where_clause(kind, criteria, &[])?;
    let sql = format!("SELECT COUNT(*) FROM ({}{filter}) AS matched", table(kind).select);
    let (count,): (i64,) = bind_all(sqlx::query_as::<_, (i64,)>(&sql), binds).fetch_one(pool).await?;
    Ok(count.max(0) as u64)
}

pub async fn get_live(pool: &AnyPool, kind: ContentKind, id: i64) -> Result<Option<ContentRow>> {
    let spec = table(kind);
    let sql = format!("{} WHERE {} = 1 AND {} = ? LIMIT 1", spec.select, spec.live, spec.id);
    let row = sqlx::query_as::<_, ContentRow>(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn list_gallery_images(pool: &AnyPool, owner_kind: ContentKind, owner_id: i64) -> Result<Vec<GalleryImageRow>> {
    let rows = sqlx::query_as::<_, GalleryImageRow>(
        "SELECT id, owner_kind, owner_id, image_blob, image_blob_mime, image_blob_name, caption, sort_order, created_at
         FROM gallery_images WHERE owner_kind = ? AND owner_id = ?
         ORDER BY sort_order, created_at, id",
    )
    .bind(owner_kind.as_str())
    .bind(owner_id)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_gallery_image(pool: &AnyPool, image_id: i64) -> Result<Option<GalleryImageRow>> {
    let row = sqlx::query_as::<_, GalleryImageRow>(
        "SELECT id, owner_kind, owner_id, image_blob, image_blob_mime, image_blob_name, caption, sort_order, created_at
         FROM gallery_images WHERE id = ? LIMIT 1",
    )
    .bind(image_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn count_gallery_images(pool: &AnyPool, owner_kind: Option<ContentKind>) -> Result<u64> {
    let count: i64 = match owner_kind {
        Some(kind) => {
            sqlx::query_scalar("SELECT COUNT(*) FROM gallery_images WHERE owner_kind = ?")
                .bind(kind.as_str())
                .fetch_one(pool)
                .await?
        }
        None => sqlx::query_scalar("SELECT COUNT(*) FROM gallery_images").fetch_one(pool).await?,
    };
    Ok(count.max(0) as u64)
}

/// Blob column stored on a content row. `column` must come from the whitelist in `blob.rs`.
pub async fn fetch_content_blob(pool: &AnyPool, kind: ContentKind, id: i64, column: &str) -> Result<Option<BlobRow>> {
    let table_name = table_name(kind);
    // Use COALESCE to avoid decoding NULL directly into Option<String> with the Any driver
    let sql = format!(
        "SELECT {column} AS data, COALESCE({column}_mime, '') AS mime, COALESCE({column}_name, '') AS file_name
         FROM {table_name} WHERE id = ? AND {column} IS NOT NULL AND length({column}) > 0 LIMIT 1"
    );
    let row = sqlx::query_as::<_, BlobRow>(&sql).bind(id).fetch_optional(pool).await?;
    Ok(row)
}

pub async fn content_exists(pool: &AnyPool, kind: ContentKind, id: i64) -> Result<bool> {
    let sql = match kind {
        ContentKind::Project => "SELECT 1 FROM projects WHERE id = ?",
        ContentKind::NewsEvent => "SELECT 1 FROM news_events WHERE id = ?",
        ContentKind::SuccessStory => "SELECT 1 FROM success_stories WHERE id = ?",
    };
    let exists: Option<i64> = sqlx::query_scalar(sql).bind(id).fetch_optional(pool).await?;
    Ok(exists.is_some())
}

pub async fn list_faqs(pool: &AnyPool, limit: Option<usize>) -> Result<Vec<FaqRow>> {
    let rows = sqlx::query_as::<_, FaqRow>(
        "SELECT id, question, answer, sort_order, thumbs_up, thumbs_down FROM faqs ORDER BY sort_order, id LIMIT ?",
    )
    .bind(limit.map(|l| l as i64).unwrap_or(-1))
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn get_faq(pool: &AnyPool, faq_id: i64) -> Result<Option<FaqRow>> {
    let row = sqlx::query_as::<_, FaqRow>(
        "SELECT id, question, answer, sort_order, thumbs_up, thumbs_down FROM faqs WHERE id = ? LIMIT 1",
    )
    .bind(faq_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn count_faqs(pool: &AnyPool) -> Result<u64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM faqs").fetch_one(pool).await?;
    Ok(count.max(0) as u64)
}

/// Bump one vote counter. Returns the number of rows touched (0 when the FAQ does not exist).
pub async fn record_faq_vote(pool: &AnyPool, faq_id: i64, helpful: bool) -> Result<u64> {
    let sql = if helpful {
        "UPDATE faqs SET thumbs_up = thumbs_up + 1 WHERE id = ?"
    } else {
        "UPDATE faqs SET thumbs_down = thumbs_down + 1 WHERE id = ?"
    };
    let res = sqlx::query(sql).bind(faq_id).execute(pool).await?;
    Ok(res.rows_affected())
}

fn urls_json(urls: &[String]) -> Result<String> {
    let kept: Vec<&String> = urls.iter().filter(|u| !u.trim().is_empty()).collect();
    Ok(serde_json::to_string(&kept)?)
}

/// Id produced by an `INSERT ... RETURNING id`.
///
/// The statement is always drained with `fetch_all`: stopping after the first
/// row leaves SQLite's implicit write transaction open on that connection. The
/// `Any` SQLite driver does not report `last_insert_id`, hence `RETURNING`.
fn returned_id(ids: Vec<i64>, table: &str) -> Result<i64> {
    ids.into_iter().next().with_context(|| format!("insert into {table} returned no id"))
}

pub async fn insert_project<'c, E>(executor: E, p: &ProjectInsert) -> Result<i64>
where
    E: Executor<'c, Database = Any>,
{
    let ids = sqlx::query_scalar::<_, i64>(
        "INSERT INTO projects(title, teaser, country, theme, is_active, is_hero_highlight, is_featured, image_urls, video_urls, created_at)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&p.title)
    .bind(&p.teaser)
    .bind(&p.country)
    .bind(&p.theme)
    .bind(p.is_active as i64)
    .bind(p.is_hero_highlight as i64)
    .bind(p.is_featured as i64)
    .bind(urls_json(&p.image_urls)?)
    .bind(urls_json(&p.video_urls)?)
    .bind(p.created_at)
    .fetch_all(executor)
    .await?;
    returned_id(ids, "projects")
}

pub async fn insert_news_event<'c, E>(executor: E, n: &NewsEventInsert) -> Result<i64>
where
    E: Executor<'c, Database = Any>,
{
    let ids = sqlx::query_scalar::<_, i64>(
        "INSERT INTO news_events(title, body, content_type, is_published, is_hero_highlight, is_featured, image_urls, video_urls, publish_date)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&n.title)
    .bind(&n.body)
    .bind(&n.content_type)
    .bind(n.is_published as i64)
    .bind(n.is_hero_highlight as i64)
    .bind(n.is_featured as i64)
    .bind(urls_json(&n.image_urls)?)
    .bind(urls_json(&n.video_urls)?)
    .bind(n.publish_date)
    .fetch_all(executor)
    .await?;
    returned_id(ids, "news_events")
}

pub async fn insert_success_story<'c, E>(executor: E, s: &SuccessStoryInsert) -> Result<i64>
where
    E: Executor<'c, Database = Any>,
{
    let ids = sqlx::query_scalar::<_, i64>(
        "INSERT INTO success_stories(title, body, related_project_id, is_published, is_hero_highlight, is_featured, image_urls, video_urls, published_at)
         VALUES(?, ?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&s.title)
    .bind(&s.body)
    .bind(s.related_project_id)
    .bind(s.is_published as i64)
    .bind(s.is_hero_highlight as i64)
    .bind(s.is_featured as i64)
    .bind(urls_json(&s.image_urls)?)
    .bind(urls_json(&s.video_urls)?)
    .bind(s.published_at)
    .fetch_all(executor)
    .await?;
    returned_id(ids, "success_stories")
}

/// Insert a batch of gallery images in one transaction.
pub async fn insert_gallery_images(pool: &AnyPool, images: &[GalleryImageInsert]) -> Result<Vec<i64>> {
    let mut tx = pool.begin().await?;
    let ids = insert_gallery_images_on(&mut *tx, images).await?;
    tx.commit().await?;
    Ok(ids)
}

/// Same as [`insert_gallery_images`] on a connection the caller controls.
pub async fn insert_gallery_images_on(conn: &mut AnyConnection, images: &[GalleryImageInsert]) -> Result<Vec<i64>> {
    let mut ids = Vec::with_capacity(images.len());
    for img in images {
        let order = match img.order {
            Some(o) => o,
            None => {
                let max: i64 = sqlx::query_scalar(
                    "SELECT COALESCE(MAX(sort_order), -1) FROM gallery_images WHERE owner_kind = ? AND owner_id = ?",
                )
                .bind(img.owner_kind.as_str())
                .bind(img.owner_id)
                .fetch_one(&mut *conn)
                .await?;
                max + 1
            }
        };
        let inserted = sqlx::query_scalar::<_, i64>(
            "INSERT INTO gallery_images(owner_kind, owner_id, image_blob, image_blob_mime, image_blob_name, caption, sort_order, created_at)
             VALUES(?, ?, ?, ?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(img.owner_kind.as_str())
        .bind(img.owner_id)
        .bind(img.data.clone())
        .bind(img.mime.clone().unwrap_or_else(|| "application/octet-stream".to_string()))
        .bind(img.file_name.clone().unwrap_or_default())
        .bind(img.caption.clone().unwrap_or_default())
        .bind(order)
        .bind(img.created_at)
        .fetch_all(&mut *conn)
        .await?;
        ids.push(returned_id(inserted, "gallery_images")?);
    }
    Ok(ids)
}

/// Store a blob into a whitelisted column of a content row.
pub async fn set_content_blob<'c, E>(executor: E, kind: ContentKind, id: i64, column: &str, blob: &BlobInsert) -> Result<u64>
where
    E: Executor<'c, Database = Any>,
{
    let sql = format!(
        "UPDATE {} SET {column} = ?, {column}_mime = ?, {column}_name = ? WHERE id = ?",
        table_name(kind)
    );
    let res = sqlx::query(&sql)
        .bind(blob.data.clone())
        .bind(blob.mime.clone())
        .bind(blob.file_name.clone())
        .bind(id)
        .execute(executor)
        .await?;
    Ok(res.rows_affected())
}

pub async fn insert_faq<'c, E>(executor: E, f: &FaqInsert) -> Result<i64>
where
    E: Executor<'c, Database = Any>,
{
    let ids = sqlx::query_scalar::<_, i64>(
        "INSERT INTO faqs(question, answer, sort_order, thumbs_up, thumbs_down) VALUES(?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&f.question)
    .bind(&f.answer)
    .bind(f.order)
    .bind(f.thumbs_up)
    .bind(f.thumbs_down)
    .fetch_all(executor)
    .await?;
    returned_id(ids, "faqs")
}

/// Sort position after the last FAQ, 0 for an empty table.
pub async fn next_faq_order<'c, E>(executor: E) -> Result<i64>
where
    E: Executor<'c, Database = Any>,
{
    let next: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(sort_order), -1) + 1 FROM faqs").fetch_one(executor).await?;
    Ok(next)
}

/// Id of the first row in `kind`'s table with this exact title, live or not.
pub async fn content_id_by_title<'c, E>(executor: E, kind: ContentKind, title: &str) -> Result<Option<i64>>
where
    E: Executor<'c, Database = Any>,
{
    let sql = format!("SELECT id FROM {} WHERE title = ? ORDER BY id LIMIT 1", table_name(kind));
    let id: Option<i64> = sqlx::query_scalar(&sql).bind(title).fetch_optional(executor).await?;
    Ok(id)
}

pub async fn faq_exists<'c, E>(executor: E, question: &str) -> Result<bool>
where
    E: Executor<'c, Database = Any>,
{
    let found: Option<i64> = sqlx::query_scalar("SELECT id FROM faqs WHERE question = ? LIMIT 1")
        .bind(question)
        .fetch_optional(executor)
        .await?;
    Ok(found.is_some())
}

pub async fn clear_content(conn: &mut AnyConnection) -> Result<()> {
    for table in ["gallery_images", "success_stories", "news_events", "projects", "faqs"] {
        sqlx::query(&format!("DELETE FROM {table}")).execute(&mut *conn).await?;
    }
    Ok(())
}
