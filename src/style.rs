//! Style State: the immutable snapshot of every visual parameter of a logo.
//!
//! A [`StyleState`] is never edited in place. Changes are described by a
//! [`StylePatch`] (a list of [`StyleField`] updates) and applied with
//! [`StyleState::merge`], which clamps every numeric field into its range and
//! returns a fresh state.
//!
//! # JSON Format
//!
//! ```json
//! {
//!   "icon": "apple",
//!   "geometry": { "size": 350.0, "rotation": 0.0, "cornerRadius": 28.0, "padding": 20.0 },
//!   "border": { "width": 0.0, "color": "#000000" },
//!   "shadow": { "intensity": 0.1 },
//!   "fill": { "opacity": 0.0, "color": "#ffffff" },
//!   "background": {
//!     "present": true,
//!     "mode": "gradient",
//!     "solid": "#6366f1",
//!     "gradient": { "from": "#6366f1", "via": "#a855f7", "to": "#ec4899" },
//!     "angle": 135.0
//!   },
//!   "iconColor": "auto"
//! }
//! ```

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::glyph::DEFAULT_GLYPH;

// ============================================================================
// Ranges
// ============================================================================

pub const SIZE_RANGE: RangeInclusive<f32> = 100.0..=500.0;
pub const ROTATION_RANGE: RangeInclusive<f32> = -180.0..=180.0;
/// Corner radius as a percentage of the container side.
pub const CORNER_RADIUS_RANGE: RangeInclusive<f32> = 0.0..=50.0;
pub const PADDING_RANGE: RangeInclusive<f32> = 0.0..=100.0;
pub const BORDER_WIDTH_RANGE: RangeInclusive<f32> = 0.0..=10.0;
/// Shared by shadow intensity and fill opacity.
pub const UNIT_RANGE: RangeInclusive<f32> = 0.0..=1.0;
pub const GRADIENT_ANGLE_RANGE: RangeInclusive<f32> = 0.0..=360.0;

/// Clamps `value` into `range`. NaN collapses to the lower bound.
pub fn clamp_to(value: f32, range: &RangeInclusive<f32>) -> f32 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}

/// Border widths move in 0.1 px steps.
fn snap_border_width(value: f32) -> f32 {
    (clamp_to(value, &BORDER_WIDTH_RANGE) * 10.0).round() / 10.0
}

// ============================================================================
// Color
// ============================================================================

/// An opaque sRGB color, serialized as a `#rrggbb` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const WHITE: Self = Self::new(0xff, 0xff, 0xff);
    pub const BLACK: Self = Self::new(0x00, 0x00, 0x00);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb`, `rrggbb` or the short `#rgb` form.
    pub fn from_hex(hex: &str) -> Option<Self> {
        Srgb::<u8>::from_str(hex.trim()).ok().map(Self::from)
    }

    /// Lowercase `#rrggbb`.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn to_rgba(&self, alpha: u8) -> [u8; 4] {
        [self.r, self.g, self.b, alpha]
    }
}

impl From<Srgb<u8>> for Color {
    fn from(rgb: Srgb<u8>) -> Self {
        Self::new(rgb.red, rgb.green, rgb.blue)
    }
}

impl From<Color> for Srgb<u8> {
    fn from(color: Color) -> Self {
        Srgb::new(color.r, color.g, color.b)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

// ============================================================================
// State components
// ============================================================================

/// Container geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Geometry {
    /// Side of the square container in px.
    pub size: f32,
    /// Icon rotation in degrees.
    pub rotation: f32,
    /// Corner radius as a percentage of the container side.
    pub corner_radius: f32,
    /// Inner padding in px.
    pub padding: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Border {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    pub intensity: f32,
}

/// Color overlay stacked above the background and below the icon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fill {
    pub opacity: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundMode {
    Solid,
    #[default]
    Gradient,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradientStops {
    pub from: Color,
    pub via: Color,
    pub to: Color,
}

impl GradientStops {
    pub fn as_array(&self) -> [Color; 3] {
        [self.from, self.via, self.to]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Background {
    /// When false nothing is painted behind the icon, and border and shadow are dropped.
    pub present: bool,
    pub mode: BackgroundMode,
    pub solid: Color,
    pub gradient: GradientStops,
    /// Gradient direction in CSS degrees (0 points up, clockwise).
    pub angle: f32,
}

impl Background {
    /// The color that stands for this background in single-color contexts.
    ///
    /// Solid mode uses the solid color, gradient mode its first stop.
    pub fn primary_color(&self) -> Color {
        match self.mode {
            BackgroundMode::Solid => self.solid,
            BackgroundMode::Gradient => self.gradient.from,
        }
    }
}

/// Icon color, either derived from background presence or explicitly chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum IconColor {
    /// White over a background, black without one.
    #[default]
    Auto,
    Custom(Color),
}

// ============================================================================
// StyleState
// ============================================================================

/// Snapshot of all visual configuration for one logo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleState {
    /// Catalog id of the selected glyph.
    pub icon: String,
    pub geometry: Geometry,
    pub border: Border,
    pub shadow: Shadow,
    pub fill: Fill,
    pub background: Background,
    pub icon_color: IconColor,
}

impl Default for StyleState {
    fn default() -> Self {
        let indigo = Color::new(0x63, 0x66, 0xf1);
        Self {
            icon: DEFAULT_GLYPH.to_string(),
            geometry: Geometry {
                size: 350.0,
                rotation: 0.0,
                corner_radius: 28.0,
                padding: 20.0,
            },
            border: Border {
                width: 0.0,
                color: Color::BLACK,
            },
            shadow: Shadow { intensity: 0.1 },
            fill: Fill {
                opacity: 0.0,
                color: Color::WHITE,
            },
            background: Background {
                present: true,
                mode: BackgroundMode::Gradient,
                solid: indigo,
                gradient: GradientStops {
                    from: indigo,
                    via: Color::new(0xa8, 0x55, 0xf7),
                    to: Color::new(0xec, 0x48, 0x99),
                },
                angle: 135.0,
            },
            icon_color: IconColor::Auto,
        }
    }
}

impl StyleState {
    /// Default state with a different container size.
    pub fn with_size(size: f32) -> Self {
        Self::default().merge(&StyleField::Size(size).into())
    }

    /// The icon color after resolving [`IconColor::Auto`].
    pub fn icon_color(&self) -> Color {
        match self.icon_color {
            IconColor::Custom(color) => color,
            IconColor::Auto if self.background.present => Color::WHITE,
            IconColor::Auto => Color::BLACK,
        }
    }

    /// Returns a new state with `patch` applied on top of this one.
    ///
    /// Every numeric field of the result is clamped into its range, including
    /// fields the patch did not touch.
    pub fn merge(&self, patch: &StylePatch) -> Self {
        let mut next = self.clone();
        for field in &patch.fields {
            next.apply(field);
        }
        next.clamped()
    }

    /// Returns a copy with every numeric field forced into range.
    pub fn clamped(mut self) -> Self {
        let g = &mut self.geometry;
        g.size = clamp_to(g.size, &SIZE_RANGE);
        g.rotation = clamp_to(g.rotation, &ROTATION_RANGE);
        g.corner_radius = clamp_to(g.corner_radius, &CORNER_RADIUS_RANGE);
        g.padding = clamp_to(g.padding, &PADDING_RANGE);
        self.border.width = snap_border_width(self.border.width);
        self.shadow.intensity = clamp_to(self.shadow.intensity, &UNIT_RANGE);
        self.fill.opacity = clamp_to(self.fill.opacity, &UNIT_RANGE);
        self.background.angle = clamp_to(self.background.angle, &GRADIENT_ANGLE_RANGE);
        self
    }

    fn apply(&mut self, field: &StyleField) {
        match field {
            StyleField::Icon(id) => self.icon = id.clone(),
            StyleField::Size(v) => self.geometry.size = *v,
            StyleField::Rotation(v) => self.geometry.rotation = *v,
            StyleField::CornerRadius(v) => self.geometry.corner_radius = *v,
            StyleField::Padding(v) => self.geometry.padding = *v,
            StyleField::BorderWidth(v) => self.border.width = *v,
            StyleField::BorderColor(c) => self.border.color = *c,
            StyleField::ShadowIntensity(v) => self.shadow.intensity = *v,
            StyleField::FillOpacity(v) => self.fill.opacity = *v,
            StyleField::FillColor(c) => self.fill.color = *c,
            StyleField::BackgroundPresent(present) => {
                if self.background.present != *present {
                    self.background.present = *present;
                    // Presence flips re-derive the icon color.
                    self.icon_color = IconColor::Auto;
                }
            }
            StyleField::BackgroundMode(mode) => self.background.mode = *mode,
            StyleField::SolidColor(c) => self.background.solid = *c,
            StyleField::GradientFrom(c) => self.background.gradient.from = *c,
            StyleField::GradientVia(c) => self.background.gradient.via = *c,
            StyleField::GradientTo(c) => self.background.gradient.to = *c,
            StyleField::GradientAngle(v) => self.background.angle = *v,
            StyleField::IconColor(c) => self.icon_color = *c,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parses a state and clamps it into range.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::clamped)
    }
}

// ============================================================================
// Patches
// ============================================================================

/// A single field update, as reported by the host UI.
///
/// Serializes as `{ "field": "borderWidth", "value": 2.5 }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum StyleField {
    Icon(String),
    Size(f32),
    Rotation(f32),
    CornerRadius(f32),
    Padding(f32),
    BorderWidth(f32),
    BorderColor(Color),
    ShadowIntensity(f32),
    FillOpacity(f32),
    FillColor(Color),
    BackgroundPresent(bool),
    BackgroundMode(BackgroundMode),
    SolidColor(Color),
    GradientFrom(Color),
    GradientVia(Color),
    GradientTo(Color),
    GradientAngle(f32),
    IconColor(IconColor),
}

/// A partial set of field updates, applied in order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StylePatch {
    pub fields: Vec<StyleField>,
}

impl StylePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field update.
    pub fn with(mut self, field: StyleField) -> Self {
        self.fields.push(field);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl From<StyleField> for StylePatch {
    fn from(field: StyleField) -> Self {
        Self {
            fields: vec![field],
        }
    }
}

impl FromIterator<StyleField> for StylePatch {
    fn from_iter<I: IntoIterator<Item = StyleField>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_hex_parsing() {
        assert_eq!(Color::from_hex("#6366f1"), Some(Color::new(0x63, 0x66, 0xf1)));
        assert_eq!(Color::from_hex("ec4899"), Some(Color::new(0xec, 0x48, 0x99)));
        assert_eq!(Color::from_hex("#fff"), Some(Color::WHITE));
        assert_eq!(Color::from_hex("not-a-color"), None);
        assert_eq!(Color::new(0xa8, 0x55, 0xf7).to_hex(), "#a855f7");
    }

    #[test]
    fn default_state_matches_initial_look() {
        let state = StyleState::default();
        assert_eq!(state.icon, "apple");
        assert_eq!(state.geometry.size, 350.0);
        assert_eq!(state.geometry.corner_radius, 28.0);
        assert_eq!(state.geometry.padding, 20.0);
        assert_eq!(state.shadow.intensity, 0.1);
        assert_eq!(state.background.mode, BackgroundMode::Gradient);
        assert_eq!(state.background.angle, 135.0);
        assert_eq!(state.icon_color(), Color::WHITE);
    }

    #[test]
    fn merge_clamps_out_of_range_values() {
        let patch: StylePatch = [
            StyleField::Size(9000.0),
            StyleField::Rotation(-720.0),
            StyleField::CornerRadius(75.0),
            StyleField::Padding(-4.0),
            StyleField::BorderWidth(3.14159),
            StyleField::ShadowIntensity(2.0),
            StyleField::FillOpacity(f32::NAN),
            StyleField::GradientAngle(400.0),
        ]
        .into_iter()
        .collect();

        let state = StyleState::default().merge(&patch);
        assert_eq!(state.geometry.size, 500.0);
        assert_eq!(state.geometry.rotation, -180.0);
        assert_eq!(state.geometry.corner_radius, 50.0);
        assert_eq!(state.geometry.padding, 0.0);
        assert!((state.border.width - 3.1).abs() < 1e-6);
        assert_eq!(state.shadow.intensity, 1.0);
        assert_eq!(state.fill.opacity, 0.0);
        assert_eq!(state.background.angle, 360.0);
    }

    #[test]
    fn merge_leaves_source_untouched() {
        let original = StyleState::default();
        let next = original.merge(&StyleField::Rotation(45.0).into());
        assert_eq!(original.geometry.rotation, 0.0);
        assert_eq!(next.geometry.rotation, 45.0);
    }

    #[test]
    fn background_toggle_rederives_icon_color() {
        let state = StyleState::default()
            .merge(&StyleField::IconColor(IconColor::Custom(Color::new(10, 20, 30))).into());
        assert_eq!(state.icon_color(), Color::new(10, 20, 30));

        let without = state.merge(&StyleField::BackgroundPresent(false).into());
        assert_eq!(without.icon_color, IconColor::Auto);
        assert_eq!(without.icon_color(), Color::BLACK);

        let custom_again = without.merge(
            &StylePatch::new()
                .with(StyleField::BackgroundPresent(true))
                .with(StyleField::IconColor(IconColor::Custom(Color::new(1, 2, 3)))),
        );
        assert_eq!(custom_again.icon_color(), Color::new(1, 2, 3));
    }

    #[test]
    fn repeated_presence_does_not_reset_custom_color() {
        let custom = IconColor::Custom(Color::new(9, 9, 9));
        let state = StyleState::default().merge(&StyleField::IconColor(custom).into());
        let same = state.merge(&StyleField::BackgroundPresent(true).into());
        assert_eq!(same.icon_color, custom);
    }

    #[test]
    fn primary_color_follows_mode() {
        let state = StyleState::default();
        assert_eq!(state.background.primary_color(), Color::new(0x63, 0x66, 0xf1));

        let solid = state.merge(
            &StylePatch::new()
                .with(StyleField::BackgroundMode(BackgroundMode::Solid))
                .with(StyleField::SolidColor(Color::new(1, 2, 3))),
        );
        assert_eq!(solid.background.primary_color(), Color::new(1, 2, 3));
    }

    #[test]
    fn state_json_roundtrip_and_format() {
        let state = StyleState::default()
            .merge(&StyleField::IconColor(IconColor::Custom(Color::new(0xff, 0, 0))).into());
        let json = state.to_json_pretty().unwrap();
        assert!(json.contains("\"cornerRadius\""));
        assert!(json.contains("\"#ec4899\""));
        assert!(json.contains("\"gradient\""));

        let restored = StyleState::from_json(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn from_json_clamps() {
        let mut value = serde_json::to_value(StyleState::default()).unwrap();
        value["geometry"]["padding"] = serde_json::json!(250.0);
        let state = StyleState::from_json(&value.to_string()).unwrap();
        assert_eq!(state.geometry.padding, 100.0);
    }

    #[test]
    fn style_field_wire_format() {
        let json = serde_json::to_string(&StyleField::BorderWidth(2.5)).unwrap();
        assert_eq!(json, r#"{"field":"borderWidth","value":2.5}"#);

        let field: StyleField =
            serde_json::from_str(r##"{"field":"gradientTo","value":"#000000"}"##).unwrap();
        assert_eq!(field, StyleField::GradientTo(Color::BLACK));
    }
}
