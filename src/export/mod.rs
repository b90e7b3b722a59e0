//! Export pipeline: turns the current logo into downloadable files.
//!
//! Two request modes exist:
//!
//! - **Single image** ([`ExportFormat::Png`], [`ExportFormat::Jpeg`]): the full
//!   composition rasterized at [`ExportConfig::supersample`] times its size.
//! - **Bundle** ([`ExportFormat::Package`]): the glyph alone at every size in
//!   [`STANDARD_ICONS`] plus a maskable variant, zipped together with a web
//!   manifest, head-tag snippet and usage guide.
//!
//! # Example
//!
//! ```
//! use logo_forge::{ExportConfig, ExportFormat, Exporter, StyleState};
//!
//! let exporter = Exporter::new(ExportConfig::default());
//! let artifact = exporter
//!     .export(&StyleState::with_size(100.0), ExportFormat::Png, chrono::Utc::now())
//!     .unwrap();
//! assert!(artifact.file_name.ends_with(".png"));
//! ```

pub mod bundle;
pub mod manifest;
pub mod single;
pub mod throttle;

pub use bundle::{
    GlyphRasterizer, IconBundle, IconSpec, MASKABLE_ICON, STANDARD_ICONS, SvgGlyphRasterizer,
};
pub use manifest::{ManifestIcon, WebManifest};
pub use throttle::ThrottlePolicy;

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::style::StyleState;

/// Rasterization factor for single image exports.
pub const DEFAULT_SUPERSAMPLE: u32 = 8;

// ============================================================================
// ExportFormat
// ============================================================================

/// What the user asked to export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Png,
    Jpeg,
    Package,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Package => "zip",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Package => "application/zip",
        }
    }
}

// ============================================================================
// ExportArtifact
// ============================================================================

/// A finished file, ready to hand to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Writes the artifact into `dir` under its own file name.
    pub fn save_in(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let path = dir.as_ref().join(&self.file_name);
        fs::write(&path, &self.bytes)?;
        tracing::debug!(path = %path.display(), bytes = self.bytes.len(), "artifact saved");
        Ok(path)
    }
}

/// `icon-<ISO 8601 timestamp>.<ext>` with `:` and `.` replaced by `-`.
pub fn timestamped_file_name(timestamp: DateTime<Utc>, extension: &str) -> String {
    let iso = timestamp.to_rfc3339_opts(chrono::SecondsFormat::Millis, true);
    format!("icon-{}.{extension}", iso.replace([':', '.'], "-"))
}

// ============================================================================
// ExportConfig
// ============================================================================

/// Export settings.
///
/// # JSON Format
///
/// ```json
/// {
///   "supersample": 8,
///   "throttle": { "batchSize": 3, "itemPauseMs": 0, "batchPauseMs": 0 },
///   "appName": "Logo Forge",
///   "shortName": "Logo Forge",
///   "description": "Generated with Logo Forge"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportConfig {
    /// Single image rasterization factor relative to the container size.
    pub supersample: u32,
    pub throttle: ThrottlePolicy,
    /// Manifest `name`.
    pub app_name: String,
    /// Manifest `short_name`.
    pub short_name: String,
    /// Manifest `description`.
    pub description: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            supersample: DEFAULT_SUPERSAMPLE,
            throttle: ThrottlePolicy::default(),
            app_name: "Logo Forge".to_string(),
            short_name: "Logo Forge".to_string(),
            description: "Generated with Logo Forge".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

// ============================================================================
// Exporter
// ============================================================================

/// Runs exports against a style state.
///
/// The glyph rasterizer used for bundles is pluggable so hosts (and tests)
/// can substitute their own.
#[derive(Debug, Clone)]
pub struct Exporter<R: GlyphRasterizer = SvgGlyphRasterizer> {
    config: ExportConfig,
    rasterizer: R,
}

impl Exporter {
    pub fn new(config: ExportConfig) -> Self {
        Self::with_rasterizer(config, SvgGlyphRasterizer)
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new(ExportConfig::default())
    }
}

impl<R: GlyphRasterizer> Exporter<R> {
    pub fn with_rasterizer(config: ExportConfig, rasterizer: R) -> Self {
        Self { config, rasterizer }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Exports `state` in the requested format.
    ///
    /// `now` names single image files; bundles always use `icon-package.zip`.
    pub fn export(
        &self,
        state: &StyleState,
        format: ExportFormat,
        now: DateTime<Utc>,
    ) -> Result<ExportArtifact> {
        let _span = tracing::debug_span!("export", ?format).entered();
        let result = match format {
            ExportFormat::Png | ExportFormat::Jpeg => {
                single::export_image(state, format, self.config.supersample, now)
            }
            ExportFormat::Package => self.export_bundle(state).map(|bundle| bundle.archive),
        };
        if let Err(err) = &result {
            tracing::error!(error = %err, "export aborted");
        }
        result
    }

    /// Builds the multi-size icon bundle, keeping per-size failure details.
    pub fn export_bundle(&self, state: &StyleState) -> Result<IconBundle> {
        bundle::build(state, &self.config, &self.rasterizer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn file_name_replaces_separators() {
        let ts = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap()
            + chrono::Duration::milliseconds(789);
        assert_eq!(
            timestamped_file_name(ts, "png"),
            "icon-2024-05-01T12-34-56-789Z.png"
        );
    }

    #[test]
    fn format_extensions() {
        assert_eq!(ExportFormat::Png.extension(), "png");
        assert_eq!(ExportFormat::Jpeg.extension(), "jpeg");
        assert_eq!(ExportFormat::Jpeg.mime_type(), "image/jpeg");
        assert_eq!(
            serde_json::from_str::<ExportFormat>("\"package\"").unwrap(),
            ExportFormat::Package
        );
    }

    #[test]
    fn config_defaults_fill_missing_fields() {
        let config = ExportConfig::from_json(r#"{"appName":"Acme"}"#).unwrap();
        assert_eq!(config.app_name, "Acme");
        assert_eq!(config.supersample, 8);
        assert_eq!(config.throttle.batch_size, 3);

        let json = ExportConfig::default().to_json().unwrap();
        assert!(json.contains("\"shortName\""));
        assert!(json.contains("\"batchPauseMs\""));
    }

    #[test]
    fn save_in_writes_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let artifact = ExportArtifact {
            file_name: "icon-test.png".into(),
            mime_type: "image/png",
            bytes: vec![1, 2, 3],
        };
        let path = artifact.save_in(dir.path()).unwrap();
        assert_eq!(std::fs::read(path).unwrap(), vec![1, 2, 3]);
    }
}
