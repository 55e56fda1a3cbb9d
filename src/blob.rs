use serde::{Deserialize, Serialize};

use crate::error::ShowcaseError;
use crate::types::ContentKind;

pub const DEFAULT_MIME: &str = "application/octet-stream";

/// Binary columns that may be served straight from a content row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlobField {
    CoverImage,
    ImageFile,
}

impl BlobField {
    pub fn column(&self) -> &'static str {
        match self {
            BlobField::CoverImage => "cover_image_blob",
            BlobField::ImageFile => "image_file_blob",
        }
    }

    /// Only whitelisted (kind, column) pairs are accepted.
    pub fn resolve(kind: ContentKind, field: &str) -> Result<Self, ShowcaseError> {
        match (kind, field) {
            (_, "cover_image_blob") => Ok(BlobField::CoverImage),
            (ContentKind::SuccessStory, "image_file_blob") => Ok(BlobField::ImageFile),
            _ => Err(ShowcaseError::FieldNotAllowed { kind, field: field.to_string() }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlobAsset {
    #[serde(skip)]
    pub data: Vec<u8>,
    pub mime: Option<String>,
    pub file_name: Option<String>,
}

impl BlobAsset {
    pub fn new(data: Vec<u8>, mime: impl Into<String>, file_name: impl Into<String>) -> Self {
        let mime = mime.into();
        let file_name = file_name.into();
        Self {
            data,
            mime: Some(mime).filter(|m| !m.trim().is_empty()),
            file_name: Some(file_name).filter(|n| !n.trim().is_empty()),
        }
    }

    pub fn content_type(&self) -> &str {
        self.mime.as_deref().unwrap_or(DEFAULT_MIME)
    }

    /// `inline; filename="..."` when a file name is known.
    pub fn content_disposition(&self) -> Option<String> {
        self.file_name
            .as_ref()
            .map(|name| format!("inline; filename=\"{}\"", name.replace('"', "")))
    }
}
