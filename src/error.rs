use thiserror::Error;

use crate::types::ContentKind;

/// Errors surfaced by the [`Showcase`](crate::Showcase) API.
///
/// Storage failures are carried through untouched in `Repository`; the caller
/// decides how to present them.
#[derive(Error, Debug)]
pub enum ShowcaseError {
    #[error("{kind} {id} not found")]
    NotFound { kind: ContentKind, id: i64 },

    #[error("unknown content kind `{0}`")]
    UnknownKind(String),

    #[error("field `{field}` cannot be served for {kind}")]
    FieldNotAllowed { kind: ContentKind, field: String },

    #[error("no blob stored in `{field}` for {kind} {id}")]
    BlobMissing { kind: ContentKind, id: i64, field: String },

    #[error("gallery image {0} not found")]
    GalleryImageNotFound(i64),

    #[error("FAQ {0} not found")]
    FaqNotFound(i64),

    #[error(transparent)]
    Repository(#[from] anyhow::Error),
}

pub type ShowcaseResult<T> = Result<T, ShowcaseError>;
