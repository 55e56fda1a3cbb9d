use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gda_showcase::faq::Vote;
use gda_showcase::types::ContentKind;

/// Inspect published content the way detail and landing pages see it
#[derive(Parser)]
#[command(name = "gda-showcase")]
#[command(about = "Related content, media galleries and FAQs for the volunteer content site", long_about = None)]
pub struct Cli {
    /// TOML config file (database_url, related_limit, gallery_page_size)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override the database URL
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply database migrations
    Migrate,
    /// Insert demo content
    Seed {
        /// Delete existing content first
        #[arg(long)]
        reset: bool,
    },
    /// Detail page data: related items plus one gallery page
    Detail {
        kind: ContentKind,
        id: i64,
        /// Gallery page parameter, passed through unvalidated
        #[arg(short, long)]
        page: Option<String>,
    },
    /// Related items only
    Related {
        kind: ContentKind,
        id: i64,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Hero and featured rows for the landing page
    Landing,
    /// List FAQs
    Faqs {
        /// Most helpful first
        #[arg(long)]
        rank: bool,
        #[arg(short, long)]
        limit: Option<usize>,
    },
    /// Record a thumbs up or down on a FAQ
    Vote { faq_id: i64, vote: Vote },
    /// Export a stored image (cover_image_blob, image_file_blob)
    Blob {
        kind: ContentKind,
        id: i64,
        field: String,
        /// Write the bytes here instead of printing metadata only
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Export a gallery image by id
    GalleryImage {
        id: i64,
        #[arg(short, long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
    /// Content counts
    Stats,
    /// Compact the database file
    Vacuum,
}
