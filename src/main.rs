mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::{Cli, Commands};
use gda_showcase::blob::BlobAsset;
use gda_showcase::config::Config;
use gda_showcase::Showcase;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = cli.database_url {
        config.database_url = Some(url);
    }

    let run_migrations = !matches!(cli.command, Commands::Vacuum);
    let showcase = Showcase::connect(config, run_migrations).await?;

    match cli.command {
        Commands::Migrate => {
            println!("Database is up to date");
        }
        Commands::Seed { reset } => {
            print_json(&showcase.seed_demo(reset).await?)?;
        }
        Commands::Detail { kind, id, page } => {
            print_json(&showcase.detail(kind, id, page.as_deref()).await?)?;
        }
        Commands::Related { kind, id, limit } => {
            print_json(&showcase.related(kind, id, limit).await?)?;
        }
        Commands::Landing => {
            print_json(&showcase.landing().await?)?;
        }
        Commands::Faqs { rank, limit } => {
            print_json(&showcase.faqs(rank, limit).await?)?;
        }
        Commands::Vote { faq_id, vote } => {
            print_json(&showcase.vote_faq(faq_id, vote).await?)?;
        }
        Commands::Blob { kind, id, field, out } => {
            let asset = showcase.blob(kind, id, &field).await?;
            export_blob(&asset, out.as_deref()).await?;
        }
        Commands::GalleryImage { id, out } => {
            let asset = showcase.gallery_image_blob(id).await?;
            export_blob(&asset, out.as_deref()).await?;
        }
        Commands::Stats => {
            print_json(&showcase.stats().await?)?;
        }
        Commands::Vacuum => {
            showcase.vacuum_db().await?;
            println!("Vacuum complete");
        }
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct BlobSummary<'a> {
    content_type: &'a str,
    content_disposition: Option<String>,
    bytes: usize,
    written_to: Option<String>,
}

async fn export_blob(asset: &BlobAsset, out: Option<&std::path::Path>) -> Result<()> {
    if let Some(path) = out {
        tokio::fs::write(path, &asset.data)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
    }
    print_json(&BlobSummary {
        content_type: asset.content_type(),
        content_disposition: asset.content_disposition(),
        bytes: asset.data.len(),
        written_to: out.map(|p| p.display().to_string()),
    })
}
