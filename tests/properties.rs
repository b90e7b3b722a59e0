use std::io::{Cursor, Read};

use chrono::Utc;
use image::RgbaImage;
use logo_forge::export::{
    GlyphRasterizer, IconSpec, MASKABLE_ICON, STANDARD_ICONS, SvgGlyphRasterizer,
};
use logo_forge::{
    Color, ExportConfig, ExportError, ExportFormat, Exporter, History, Paint, StyleField,
    StyleState, WebManifest, render,
};

/// Fails one standard size and delegates everything else.
struct FailingSize(u32);

impl GlyphRasterizer for FailingSize {
    fn rasterize_glyph(
        &self,
        state: &StyleState,
        spec: &IconSpec,
    ) -> logo_forge::Result<RgbaImage> {
        if spec.size == self.0 && !spec.is_maskable() {
            return Err(ExportError::Encoding(format!("forced failure at {}", spec.size)));
        }
        SvgGlyphRasterizer.rasterize_glyph(state, spec)
    }
}

#[test]
fn pushes_without_undo_track_the_latest_state() {
    let mut history = History::default();
    assert!(!history.can_undo());

    for size in [120.0, 240.0, 360.0, 480.0] {
        history.push(&StyleField::Size(size).into());
        assert!(history.can_undo());
        assert!(!history.can_redo());
        assert_eq!(history.current().geometry.size, size);
    }
}

#[test]
fn push_after_undo_discards_redo_branch() {
    let mut history = History::default();
    history.push(&StyleField::Rotation(10.0).into());
    history.push(&StyleField::Rotation(20.0).into());
    history.undo();
    history.push(&StyleField::Rotation(30.0).into());

    assert!(!history.can_redo());
    let before = history.current().clone();
    assert!(!history.redo());
    assert_eq!(history.current(), &before);
    assert_eq!(history.len(), 3);
    assert!(history.iter().all(|s| s.geometry.rotation != 20.0));
}

#[test]
fn undo_at_start_and_redo_at_end_are_no_ops() {
    let mut history = History::default();
    let initial = history.current().clone();
    assert!(!history.undo());
    assert_eq!(history.cursor(), 0);
    assert_eq!(history.current(), &initial);

    history.push(&StyleField::Padding(5.0).into());
    let latest = history.current().clone();
    assert!(!history.redo());
    assert_eq!(history.cursor(), 1);
    assert_eq!(history.current(), &latest);
}

#[test]
fn png_export_is_supersampled() {
    let exporter = Exporter::default();
    let state = StyleState::with_size(100.0);
    let artifact = exporter.export(&state, ExportFormat::Png, Utc::now()).unwrap();

    let decoded = image::load_from_memory(&artifact.bytes).unwrap();
    let expected = (100.0 * exporter.config().supersample as f32) as u32;
    assert_eq!((decoded.width(), decoded.height()), (expected, expected));
    assert!(artifact.file_name.starts_with("icon-"));
    assert!(!artifact.file_name.contains(':'));
}

#[test]
fn bundle_survives_one_failed_size() {
    let exporter = Exporter::with_rasterizer(ExportConfig::default(), FailingSize(144));
    let bundle = exporter.export_bundle(&StyleState::default()).unwrap();

    assert_eq!(bundle.skipped.len(), 1);
    assert_eq!(bundle.skipped[0].size, 144);

    let expected: Vec<IconSpec> = STANDARD_ICONS
        .iter()
        .copied()
        .filter(|s| s.size != 144)
        .chain([MASKABLE_ICON])
        .collect();
    assert_eq!(bundle.generated, expected);

    let mut zip = zip::ZipArchive::new(Cursor::new(bundle.archive.bytes.clone())).unwrap();
    for spec in &expected {
        assert!(zip.by_name(&spec.path()).is_ok(), "missing {}", spec.path());
    }
    assert!(zip.by_name("icons/icon-144x144.png").is_err());

    let mut json = String::new();
    zip.by_name("site.webmanifest")
        .unwrap()
        .read_to_string(&mut json)
        .unwrap();
    let manifest = WebManifest::from_json(&json).unwrap();
    let listed: Vec<&str> = manifest.icons.iter().map(|i| i.src.as_str()).collect();
    let paths: Vec<String> = expected.iter().map(IconSpec::path).collect();
    assert_eq!(listed, paths.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(manifest.icons.last().and_then(|i| i.purpose.as_deref()), Some("maskable"));

    let mut readme = String::new();
    zip.by_name("README.md")
        .unwrap()
        .read_to_string(&mut readme)
        .unwrap();
    assert!(!readme.contains("icon-144x144"));
    assert!(readme.contains("icon-152x152.png (152x152)"));

    let mut meta_tags = String::new();
    zip.by_name("meta-tags.html")
        .unwrap()
        .read_to_string(&mut meta_tags)
        .unwrap();
    assert!(!meta_tags.contains("icon-144x144"));
    assert!(!meta_tags.contains("msapplication-TileImage"));
    assert!(meta_tags.contains(r#"href="/icons/icon-152x152.png""#));
    assert!(meta_tags.contains(r#"href="/icons/favicon-16x16.png""#));
}

#[test]
fn icon_opacity_mirrors_fill_opacity() {
    let state = StyleState::default().merge(&StyleField::FillOpacity(0.3).into());
    let desc = render(&state);
    assert_eq!(desc.fill.opacity, 0.3);
    assert_eq!(desc.icon.opacity, 1.0 - 0.3);
}

#[test]
fn default_state_renders_indigo_purple_pink_gradient() {
    let state = StyleState::default();
    assert_eq!(state.icon, "apple");
    assert_eq!(state.geometry.size, 350.0);
    assert_eq!(state.geometry.corner_radius, 28.0);
    assert_eq!(state.geometry.padding, 20.0);
    assert_eq!(state.shadow.intensity, 0.1);

    let Paint::LinearGradient(gradient) = render(&state).background else {
        panic!("default background should be a gradient");
    };
    assert_eq!(gradient.angle, 135.0);
    let colors: Vec<Color> = gradient.stops.iter().map(|s| s.color).collect();
    assert_eq!(
        colors,
        [
            Color::from_hex("#6366f1").unwrap(),
            Color::from_hex("#a855f7").unwrap(),
            Color::from_hex("#ec4899").unwrap(),
        ]
    );
}
