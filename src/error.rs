//! Error types for logo editing and export.
//!
//! Export failures never touch editing history: every error here is returned
//! to the caller of an export and the [`History`](crate::History) stays as it
//! was before the attempt.

use thiserror::Error;

/// Errors that abort a single export attempt.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The composition to rasterize could not be located or measured.
    ///
    /// Raised for zero-sized containers, pixmaps that cannot be allocated and
    /// markup that fails to parse.
    #[error("render target missing: {0}")]
    RenderTargetMissing(String),

    /// Converting the raster into the requested file format failed.
    #[error("encoding failed: {0}")]
    Encoding(String),

    /// Writing the bundle archive failed.
    #[error("packaging failed: {0}")]
    Packaging(String),

    /// Saving an artifact to disk failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for ExportError {
    fn from(err: image::ImageError) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<zip::result::ZipError> for ExportError {
    fn from(err: zip::result::ZipError) -> Self {
        Self::Packaging(err.to_string())
    }
}

/// A failure generating one size of an icon bundle.
///
/// These are collected rather than propagated; the bundle is still produced
/// from the sizes that succeeded.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("failed to generate {name} ({size}x{size}): {reason}")]
pub struct AssetError {
    pub name: String,
    pub size: u32,
    pub reason: String,
}

/// Errors surfaced by [`LogoEditor::dispatch`](crate::LogoEditor::dispatch).
#[derive(Debug, Error)]
pub enum EditorError {
    /// The requested glyph id is not in the catalog.
    #[error("unknown icon: {0}")]
    UnknownIcon(String),

    #[error(transparent)]
    Export(#[from] ExportError),
}

/// A specialized `Result` type defaulting to [`ExportError`].
pub type Result<T, E = ExportError> = std::result::Result<T, E>;
