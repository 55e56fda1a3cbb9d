use anyhow::{Context, Result};
use async_trait::async_trait;
use directories::ProjectDirs;
use sqlx::any::AnyPoolOptions;
use sqlx::{any::AnyConnectOptions, migrate::Migrator, AnyPool, ConnectOptions};
use std::sync::Once;
use std::{path::PathBuf, str::FromStr};
use tracing::{debug, info};

use crate::dao;
use crate::mapping::{content_item_from_row, gallery_image_from_row};
use crate::storage::{ContentRepository, GalleryImageStore};
use crate::types::{ContentItem, ContentKind, Criterion, GalleryImageRecord};

// Ensure drivers are installed exactly once for sqlx::any
static INSTALL_DRIVERS: Once = Once::new();

// Embed SQL migrations from the migrations/ directory
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Clone, Debug)]
pub struct Database {
    pool: AnyPool,
}

impl Database {
    // Create a connection pool. If database_url is None, use a sensible default
    // (SQLite file in the user's data directory).
    pub async fn connect(database_url: Option<&str>, max_connections: u32) -> Result<Self> {
        INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);

        let url = match database_url {
            Some(u) if !u.trim().is_empty() => u.to_string(),
            _ => default_sqlite_url()?,
        };

        let opts = AnyConnectOptions::from_str(&url).with_context(|| format!("invalid database URL: {url}"))?;
        // Quiet by default; callers can enable SQLX_LOG if they want
        let opts = opts.disable_statement_logging();

        // Every connection to an in-memory database is a separate database
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");
        let mut pool_opts = AnyPoolOptions::new().max_connections(if in_memory { 1 } else { max_connections.max(1) });
        if in_memory {
            pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
        }

        let pool = pool_opts
            .connect_with(opts)
            .await
            .with_context(|| format!("failed to connect to database: {url}"))?;

        debug!(url = %url, in_memory, "database pool ready");
        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        match MIGRATOR.run(&self.pool).await {
            Ok(_) => {
                info!("migrations applied");
                Ok(())
            }
            Err(e) => {
                let msg = e.to_string();
                let looks_modified = msg.contains("was previously applied but has been modified");
                let duplicate_version = msg.contains("UNIQUE constraint failed: _sqlx_migrations.version");
                if looks_modified || duplicate_version {
                    let _ = sqlx::query("DELETE FROM _sqlx_migrations").execute(&self.pool).await;
                    MIGRATOR.run(&self.pool).await.context("running migrations after ledger reset")
                } else {
                    Err(e).context("running migrations")
                }
            }
        }
    }

    pub fn pool(&self) -> &AnyPool {
        &self.pool
    }

    pub async fn vacuum(&self) -> Result<()> {
        sqlx::query("VACUUM").execute(&self.pool).await.context("vacuuming database")?;
        info!("database vacuumed");
        Ok(())
    }
}

#[async_trait]
impl ContentRepository for Database {
    async fn find_live(
        &self,
        kind: ContentKind,
        criteria: &[Criterion],
        exclude_ids: &[i64],
        limit: usize,
    ) -> Result<Vec<ContentItem>> {
        dao::find_live(&self.pool, kind, criteria, exclude_ids, limit)
            .await
            .with_context(|| format!("querying live {kind} items"))?
            .into_iter()
            .map(|row| content_item_from_row(kind, row))
            .collect()
    }

    async fn count_live(&self, kind: ContentKind, criteria: &[Criterion]) -> Result<u64> {
        dao::count_live(&self.pool, kind, criteria)
            .await
            .with_context(|| format!("counting live {kind} items"))
    }

    async fn get_live(&self, kind: ContentKind, id: i64) -> Result<Option<ContentItem>> {
        let row = dao::get_live(&self.pool, kind, id).await.with_context(|| format!("loading {kind} {id}"))?;
        row.map(|r| content_item_from_row(kind, r)).transpose()
    }
}

#[async_trait]
impl GalleryImageStore for Database {
    async fn list_gallery_images(&self, owner_kind: ContentKind, owner_id: i64) -> Result<Vec<GalleryImageRecord>> {
        dao::list_gallery_images(&self.pool, owner_kind, owner_id)
            .await
            .with_context(|| format!("listing gallery images of {owner_kind} {owner_id}"))?
            .into_iter()
            .map(gallery_image_from_row)
            .collect()
    }
}

fn default_sqlite_url() -> Result<String> {
    let proj = ProjectDirs::from("org", "gda", "gda-showcase")
        .context("unable to determine data directory for default sqlite path")?;
    let mut path: PathBuf = proj.data_dir().to_path_buf();
    std::fs::create_dir_all(&path).with_context(|| format!("creating data dir: {}", path.display()))?;
    path.push("showcase.db");
    Ok(sqlite_url_for(&path))
}

/// `sqlite://` URL for a file path, created on first connect.
pub fn sqlite_url_for(path: &std::path::Path) -> String {
    // Encode spaces in the path for a valid sqlite URL
    let path_str = path.to_string_lossy().replace(' ', "%20");
    format!("sqlite://{path_str}?mode=rwc")
}
