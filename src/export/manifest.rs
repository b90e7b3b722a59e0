//! Web manifest and the companion text files shipped in an icon bundle.

use serde::{Deserialize, Serialize};

use super::bundle::IconSpec;
use super::ExportConfig;
use crate::style::Color;

/// One entry of the manifest `icons` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestIcon {
    pub src: String,
    /// `WxH`.
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub purpose: Option<String>,
}

impl From<&IconSpec> for ManifestIcon {
    fn from(spec: &IconSpec) -> Self {
        Self {
            src: spec.path(),
            sizes: spec.sizes(),
            mime_type: "image/png".to_string(),
            purpose: spec.purpose.map(str::to_string),
        }
    }
}

/// Contents of `site.webmanifest`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebManifest {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub icons: Vec<ManifestIcon>,
}

impl WebManifest {
    /// An empty manifest carrying the configured names.
    pub fn new(config: &ExportConfig) -> Self {
        Self {
            name: config.app_name.clone(),
            short_name: config.short_name.clone(),
            description: config.description.clone(),
            icons: Vec::new(),
        }
    }

    pub fn push(&mut self, spec: &IconSpec) {
        self.icons.push(spec.into());
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Favicon link sizes, in snippet order.
const FAVICON_SIZES: [u32; 3] = [16, 32, 48];

/// Apple touch icon sizes, in snippet order.
const TOUCH_ICON_SIZES: [u32; 2] = [152, 144];

/// Size used for the Microsoft tile image.
const TILE_SIZE: u32 = 144;

/// Head-tag snippet for `meta-tags.html`.
///
/// Icon links are only emitted for files present in `generated`.
pub fn meta_tags(theme_color: Color, generated: &[IconSpec]) -> String {
    let path_of = |prefix: &str, size: u32| {
        let name = format!("{prefix}-{size}x{size}");
        generated
            .iter()
            .any(|spec| spec.name == name)
            .then(|| format!("/icons/{name}.png"))
    };

    let mut lines = vec!["<!-- Favicon -->".to_string()];
    for size in FAVICON_SIZES {
        if let Some(href) = path_of("favicon", size) {
            lines.push(format!(
                r#"<link rel="icon" type="image/png" sizes="{size}x{size}" href="{href}">"#
            ));
        }
    }

    lines.push(String::new());
    lines.push("<!-- Apple Touch Icons -->".to_string());
    for size in TOUCH_ICON_SIZES {
        if let Some(href) = path_of("icon", size) {
            lines.push(format!(
                r#"<link rel="apple-touch-icon" sizes="{size}x{size}" href="{href}">"#
            ));
        }
    }

    lines.push(String::new());
    lines.push("<!-- PWA -->".to_string());
    lines.push(r#"<link rel="manifest" href="/site.webmanifest">"#.to_string());
    lines.push(format!(r#"<meta name="theme-color" content="{theme_color}">"#));

    lines.push(String::new());
    lines.push("<!-- Microsoft -->".to_string());
    lines.push(format!(r#"<meta name="msapplication-TileColor" content="{theme_color}">"#));
    if let Some(href) = path_of("icon", TILE_SIZE) {
        lines.push(format!(r#"<meta name="msapplication-TileImage" content="{href}">"#));
    }

    lines.join("\n")
}

/// Usage guide for `README.md`, listing every generated file.
pub fn readme(generated: &[IconSpec], config: &ExportConfig) -> String {
    let mut listing = String::new();
    for spec in generated {
        listing.push_str(&format!("- {}.png ({})", spec.name, spec.sizes()));
        if spec.is_maskable() {
            listing.push_str(" - For PWA maskable icon");
        }
        listing.push('\n');
    }

    format!(
        "# Icon Package

This package contains all the necessary icons for your web application.

## Contents
- Various sizes of favicon and app icons
- Maskable icon for PWA
- Web manifest file
- Meta tags for HTML

## Installation
1. Copy the 'icons' folder to your public directory
2. Copy 'site.webmanifest' to your public directory
3. Add the meta tags from 'meta-tags.html' to your HTML head section

## Icon Sizes
{listing}
## Generated with {}
",
        config.app_name
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::bundle::{MASKABLE_ICON, STANDARD_ICONS};

    #[test]
    fn manifest_json_shape() {
        let mut manifest = WebManifest::new(&ExportConfig::default());
        manifest.push(&STANDARD_ICONS[0]);
        manifest.push(&MASKABLE_ICON);

        let json = manifest.to_json_pretty().unwrap();
        assert!(json.contains("\"short_name\""));
        assert!(json.contains("\"type\": \"image/png\""));
        assert!(json.contains("\"sizes\": \"16x16\""));
        assert!(json.contains("\"src\": \"icons/maskable-512x512.png\""));
        // Only the maskable entry carries a purpose.
        assert_eq!(json.matches("\"purpose\"").count(), 1);

        let restored = WebManifest::from_json(&json).unwrap();
        assert_eq!(restored, manifest);
    }

    #[test]
    fn meta_tags_use_theme_color() {
        let html = meta_tags(Color::new(0x63, 0x66, 0xf1), &STANDARD_ICONS);
        assert!(html.contains(r##"<meta name="theme-color" content="#6366f1">"##));
        assert!(html.contains(r##"<meta name="msapplication-TileColor" content="#6366f1">"##));
        assert!(html.contains(r#"href="/site.webmanifest""#));
        assert!(html.contains(
            r#"<link rel="icon" type="image/png" sizes="16x16" href="/icons/favicon-16x16.png">"#
        ));
        assert!(html.contains(
            r#"<link rel="apple-touch-icon" sizes="152x152" href="/icons/icon-152x152.png">"#
        ));
        assert!(html.contains(
            r#"<meta name="msapplication-TileImage" content="/icons/icon-144x144.png">"#
        ));
    }

    #[test]
    fn meta_tags_skip_missing_icons() {
        let generated: Vec<IconSpec> = STANDARD_ICONS
            .iter()
            .copied()
            .filter(|spec| spec.size != 144 && spec.size != 32)
            .collect();
        let html = meta_tags(Color::BLACK, &generated);

        assert!(!html.contains("icon-144x144"));
        assert!(!html.contains("favicon-32x32"));
        assert!(!html.contains("msapplication-TileImage"));
        assert!(html.contains("/icons/favicon-16x16.png"));
        assert!(html.contains("/icons/icon-152x152.png"));
        assert!(html.contains(r##"<meta name="msapplication-TileColor" content="#000000">"##));
    }

    #[test]
    fn readme_lists_generated_files() {
        let generated = [STANDARD_ICONS[0], STANDARD_ICONS[11], MASKABLE_ICON];
        let text = readme(&generated, &ExportConfig::default());
        assert!(text.contains("- favicon-16x16.png (16x16)\n"));
        assert!(text.contains("- icon-512x512.png (512x512)\n"));
        assert!(text.contains("- maskable-512x512.png (512x512) - For PWA maskable icon"));
        assert!(!text.contains("icon-144x144"));
    }
}
