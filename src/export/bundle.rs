//! Multi-size icon bundle.
//!
//! # Archive Layout
//!
//! ```text
//! icon-package.zip
//! ├── icons/
//! │   ├── favicon-16x16.png … icon-512x512.png   (12 standard sizes)
//! │   └── maskable-512x512.png
//! ├── site.webmanifest
//! ├── meta-tags.html
//! └── README.md
//! ```
//!
//! A size that fails to generate is logged and left out; the manifest and
//! README only list what was actually written.

use std::io::{Cursor, Write};

use image::RgbaImage;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use super::manifest::{self, WebManifest};
use super::single::encode_png;
use super::{ExportArtifact, ExportConfig, ExportFormat};
use crate::error::{AssetError, Result};
use crate::render::{self, svg};
use crate::style::StyleState;

/// File name of the bundle archive.
pub const ARCHIVE_NAME: &str = "icon-package.zip";

/// Share of the canvas the glyph may occupy in the maskable variant.
pub const MASKABLE_SAFE_ZONE: f32 = 0.8;

// ============================================================================
// IconSpec
// ============================================================================

/// A square icon the bundle should contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSpec {
    /// File stem under `icons/`.
    pub name: &'static str,
    /// Side in px.
    pub size: u32,
    /// Manifest `purpose` tag.
    pub purpose: Option<&'static str>,
}

impl IconSpec {
    const fn standard(name: &'static str, size: u32) -> Self {
        Self {
            name,
            size,
            purpose: None,
        }
    }

    /// Archive path, e.g. `icons/favicon-16x16.png`.
    pub fn path(&self) -> String {
        format!("icons/{}.png", self.name)
    }

    /// Declared dimensions, e.g. `16x16`.
    pub fn sizes(&self) -> String {
        format!("{0}x{0}", self.size)
    }

    pub fn is_maskable(&self) -> bool {
        self.purpose == Some("maskable")
    }
}

/// Standard sizes, in generation order.
pub const STANDARD_ICONS: [IconSpec; 12] = [
    IconSpec::standard("favicon-16x16", 16),
    IconSpec::standard("favicon-32x32", 32),
    IconSpec::standard("favicon-48x48", 48),
    IconSpec::standard("favicon-64x64", 64),
    IconSpec::standard("icon-72x72", 72),
    IconSpec::standard("icon-96x96", 96),
    IconSpec::standard("icon-128x128", 128),
    IconSpec::standard("icon-144x144", 144),
    IconSpec::standard("icon-152x152", 152),
    IconSpec::standard("icon-192x192", 192),
    IconSpec::standard("icon-384x384", 384),
    IconSpec::standard("icon-512x512", 512),
];

/// Generated after the standard sizes.
pub const MASKABLE_ICON: IconSpec = IconSpec {
    name: "maskable-512x512",
    size: 512,
    purpose: Some("maskable"),
};

// ============================================================================
// Glyph rasterization
// ============================================================================

/// Produces the glyph-only raster for one bundle entry.
pub trait GlyphRasterizer {
    /// Returns a `spec.size` square image of the state's glyph.
    fn rasterize_glyph(&self, state: &StyleState, spec: &IconSpec) -> Result<RgbaImage>;
}

/// Draws the glyph in isolation (no background, fill or border), rotated and
/// colored like the on-screen icon, on a transparent square.
#[derive(Debug, Clone, Copy, Default)]
pub struct SvgGlyphRasterizer;

impl GlyphRasterizer for SvgGlyphRasterizer {
    fn rasterize_glyph(&self, state: &StyleState, spec: &IconSpec) -> Result<RgbaImage> {
        let icon = render::render(state).icon;
        let fraction = if spec.is_maskable() {
            MASKABLE_SAFE_ZONE
        } else {
            1.0
        };
        let markup = svg::glyph_svg(icon.glyph, icon.color, icon.rotation, fraction);
        svg::rasterize_to_width(&markup, spec.size)
    }
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for &R {
    fn rasterize_glyph(&self, state: &StyleState, spec: &IconSpec) -> Result<RgbaImage> {
        (**self).rasterize_glyph(state, spec)
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// Result of a bundle export.
#[derive(Debug, Clone)]
pub struct IconBundle {
    /// The zip archive.
    pub archive: ExportArtifact,
    pub manifest: WebManifest,
    /// Entries written to the archive, in order.
    pub generated: Vec<IconSpec>,
    /// Entries that failed and were left out.
    pub skipped: Vec<AssetError>,
}

impl IconBundle {
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }
}

/// Generates every size of `state`'s glyph and packages the bundle.
///
/// Per-size failures are collected in [`IconBundle::skipped`]; only archive
/// writing errors abort the export.
pub fn build<R: GlyphRasterizer>(
    state: &StyleState,
    config: &ExportConfig,
    rasterizer: &R,
) -> Result<IconBundle> {
    let throttle = &config.throttle;
    let mut files: Vec<(IconSpec, Vec<u8>)> = Vec::new();
    let mut skipped = Vec::new();

    let mut generate = |spec: &IconSpec| match generate_one(state, spec, rasterizer) {
        Ok(png) => files.push((*spec, png)),
        Err(err) => {
            tracing::warn!(
                name = spec.name,
                size = spec.size,
                error = %err.reason,
                "skipping icon size"
            );
            skipped.push(err);
        }
    };

    for batch in throttle.batches(&STANDARD_ICONS) {
        for spec in batch {
            generate(spec);
            throttle.after_item();
        }
        throttle.after_batch();
    }
    generate(&MASKABLE_ICON);

    let mut manifest = WebManifest::new(config);
    for (spec, _) in &files {
        manifest.push(spec);
    }
    let generated: Vec<IconSpec> = files.iter().map(|(spec, _)| *spec).collect();

    let archive = package(
        &files,
        &manifest,
        &manifest::meta_tags(state.background.primary_color(), &generated),
        &manifest::readme(&generated, config),
    )?;

    tracing::debug!(
        generated = generated.len(),
        skipped = skipped.len(),
        bytes = archive.len(),
        "icon bundle packaged"
    );

    Ok(IconBundle {
        archive: ExportArtifact {
            file_name: ARCHIVE_NAME.to_string(),
            mime_type: ExportFormat::Package.mime_type(),
            bytes: archive,
        },
        manifest,
        generated,
        skipped,
    })
}

fn generate_one<R: GlyphRasterizer>(
    state: &StyleState,
    spec: &IconSpec,
    rasterizer: &R,
) -> std::result::Result<Vec<u8>, AssetError> {
    let failed = |reason: String| AssetError {
        name: spec.name.to_string(),
        size: spec.size,
        reason,
    };
    let img = rasterizer
        .rasterize_glyph(state, spec)
        .map_err(|e| failed(e.to_string()))?;
    if img.dimensions() != (spec.size, spec.size) {
        return Err(failed(format!(
            "rasterized to {}x{}",
            img.width(),
            img.height()
        )));
    }
    encode_png(&img).map_err(|e| failed(e.to_string()))
}

/// Writes the archive: icons first, then manifest, meta tags and README.
fn package(
    files: &[(IconSpec, Vec<u8>)],
    manifest: &WebManifest,
    meta_tags: &str,
    readme: &str,
) -> Result<Vec<u8>> {
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (spec, png) in files {
        zip.start_file(spec.path(), options)?;
        zip.write_all(png)?;
    }

    let manifest_json = manifest
        .to_json_pretty()
        .map_err(|e| crate::error::ExportError::Packaging(e.to_string()))?;
    zip.start_file("site.webmanifest", options)?;
    zip.write_all(manifest_json.as_bytes())?;

    zip.start_file("meta-tags.html", options)?;
    zip.write_all(meta_tags.as_bytes())?;

    zip.start_file("README.md", options)?;
    zip.write_all(readme.as_bytes())?;

    Ok(zip.finish()?.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use std::io::Read;

    struct FailAt(u32);

    impl GlyphRasterizer for FailAt {
        fn rasterize_glyph(&self, state: &StyleState, spec: &IconSpec) -> Result<RgbaImage> {
            if spec.size == self.0 && !spec.is_maskable() {
                return Err(ExportError::RenderTargetMissing("forced".into()));
            }
            SvgGlyphRasterizer.rasterize_glyph(state, spec)
        }
    }

    struct WrongSize;

    impl GlyphRasterizer for WrongSize {
        fn rasterize_glyph(&self, _: &StyleState, _: &IconSpec) -> Result<RgbaImage> {
            Ok(RgbaImage::new(3, 3))
        }
    }

    fn archive_names(bytes: &[u8]) -> Vec<String> {
        let zip = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        zip.file_names().map(str::to_string).collect()
    }

    #[test]
    fn spec_paths_and_sizes() {
        assert_eq!(STANDARD_ICONS[0].path(), "icons/favicon-16x16.png");
        assert_eq!(STANDARD_ICONS[11].sizes(), "512x512");
        assert!(MASKABLE_ICON.is_maskable());
        assert_eq!(MASKABLE_ICON.path(), "icons/maskable-512x512.png");
    }

    #[test]
    fn full_bundle_layout() {
        let bundle = build(&StyleState::default(), &ExportConfig::default(), &SvgGlyphRasterizer)
            .unwrap();
        assert!(bundle.is_complete());
        assert_eq!(bundle.generated.len(), 13);
        assert_eq!(bundle.manifest.icons.len(), 13);
        assert_eq!(bundle.archive.file_name, "icon-package.zip");

        let names = archive_names(&bundle.archive.bytes);
        assert_eq!(names.len(), 16);
        for spec in STANDARD_ICONS.iter().chain([&MASKABLE_ICON]) {
            assert!(names.contains(&spec.path()), "missing {}", spec.path());
        }
        for extra in ["site.webmanifest", "meta-tags.html", "README.md"] {
            assert!(names.iter().any(|n| n == extra), "missing {extra}");
        }
    }

    #[test]
    fn generated_pngs_have_declared_dimensions() {
        let bundle = build(&StyleState::default(), &ExportConfig::default(), &SvgGlyphRasterizer)
            .unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(&bundle.archive.bytes)).unwrap();
        let mut png = Vec::new();
        zip.by_name("icons/icon-72x72.png")
            .unwrap()
            .read_to_end(&mut png)
            .unwrap();
        let img = image::load_from_memory(&png).unwrap();
        assert_eq!((img.width(), img.height()), (72, 72));
    }

    #[test]
    fn one_failed_size_is_skipped() {
        let bundle = build(&StyleState::default(), &ExportConfig::default(), &FailAt(144)).unwrap();

        assert_eq!(bundle.skipped.len(), 1);
        assert_eq!(bundle.skipped[0].size, 144);
        assert_eq!(bundle.generated.len(), 12);
        assert!(bundle.manifest.icons.iter().all(|i| i.sizes != "144x144"));

        let names = archive_names(&bundle.archive.bytes);
        assert!(!names.iter().any(|n| n == "icons/icon-144x144.png"));
        assert!(names.iter().any(|n| n == "icons/maskable-512x512.png"));
    }

    #[test]
    fn wrong_dimensions_count_as_failures() {
        let bundle = build(&StyleState::default(), &ExportConfig::default(), &WrongSize).unwrap();
        assert_eq!(bundle.skipped.len(), 13);
        assert!(bundle.generated.is_empty());
        assert!(bundle.manifest.icons.is_empty());
        assert_eq!(archive_names(&bundle.archive.bytes).len(), 3);
    }

    #[test]
    fn meta_tags_follow_background_mode() {
        use crate::style::{BackgroundMode, Color, StyleField, StylePatch};

        let state = StyleState::default().merge(
            &StylePatch::new()
                .with(StyleField::BackgroundMode(BackgroundMode::Solid))
                .with(StyleField::SolidColor(Color::new(0x12, 0x34, 0x56))),
        );
        let bundle = build(&state, &ExportConfig::default(), &SvgGlyphRasterizer).unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(&bundle.archive.bytes)).unwrap();
        let mut html = String::new();
        zip.by_name("meta-tags.html")
            .unwrap()
            .read_to_string(&mut html)
            .unwrap();
        assert!(html.contains(r##"content="#123456""##));
    }
}
