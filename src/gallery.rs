use serde::{Deserialize, Serialize};

use crate::embed::{image_embed_url, video_embed_url};
use crate::pagination::{Page, Paginator};
use crate::types::{GalleryImageRecord, MediaUrls};

pub const DEFAULT_GALLERY_PAGE_SIZE: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GallerySource {
    BlobImage { image: GalleryImageRecord },
    ImageUrl { url: String, embed_url: String },
    VideoUrl { url: String, embed_url: String },
}

/// One entry of the unified gallery. `index` is the position in the full
/// sequence, independent of the page the entry ends up on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    pub index: usize,
    pub caption: Option<String>,
    #[serde(flatten)]
    pub source: GallerySource,
}

/// Concatenate stored images, image links and video links, in that order.
pub fn assemble(images: Vec<GalleryImageRecord>, media: &MediaUrls) -> Vec<GalleryItem> {
    let blobs = images.into_iter().map(|image| (image.caption.clone(), GallerySource::BlobImage { image }));
    let image_links = media.image_urls.iter().map(|url| {
        (None, GallerySource::ImageUrl { url: url.clone(), embed_url: image_embed_url(url) })
    });
    let video_links = media.video_urls.iter().map(|url| {
        (None, GallerySource::VideoUrl { url: url.clone(), embed_url: video_embed_url(url) })
    });

    blobs
        .chain(image_links)
        .chain(video_links)
        .enumerate()
        .map(|(index, (caption, source))| GalleryItem { index, caption, source })
        .collect()
}

/// Builds the paginated gallery for one item's media snapshot.
#[derive(Debug, Clone, Copy)]
pub struct MediaGalleryAssembler {
    paginator: Paginator,
}

impl Default for MediaGalleryAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_GALLERY_PAGE_SIZE)
    }
}

impl MediaGalleryAssembler {
    pub fn new(page_size: usize) -> Self {
        Self { paginator: Paginator::new(page_size) }
    }

    pub fn page_size(&self) -> usize {
        self.paginator.page_size()
    }

    /// `raw_page` is the untrusted query parameter; invalid values give page 1.
    pub fn build(&self, images: Vec<GalleryImageRecord>, media: &MediaUrls, raw_page: Option<&str>) -> Page<GalleryItem> {
        self.paginator.page(assemble(images, media), raw_page)
    }
}
