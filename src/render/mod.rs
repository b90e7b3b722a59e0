//! Renderer: maps a [`StyleState`] to a layered visual description.
//!
//! [`render`] is a pure function. Its output is what the live preview paints
//! and what the export pipeline rasterizes via [`svg`].
//!
//! # Stacking Order
//!
//! ```text
//! ┌──────────────┐
//! │  Icon glyph  │ ◄── opacity = 1 - fill opacity
//! ├──────────────┤
//! │ Fill overlay │ ◄── fill color at fill opacity
//! ├──────────────┤
//! │  Background  │ ◄── transparent / solid / linear gradient,
//! └──────────────┘     plus border stroke and drop shadow
//! ```

pub mod svg;

use crate::glyph::{self, Glyph};
use crate::style::{BackgroundMode, Color, StyleState};

/// Icon glyph side relative to the container side.
pub const ICON_SCALE: f32 = 0.6;

/// Shadow blur radius per unit of shadow intensity, in px.
pub const SHADOW_BLUR_PER_INTENSITY: f32 = 32.0;

/// Vertical shadow offset, in px.
pub const SHADOW_OFFSET_Y: f32 = 8.0;

/// Corner radius of the fill overlay as a percentage of the container side.
pub const FILL_CORNER_RADIUS: f32 = 25.0;

// ============================================================================
// Visual description
// ============================================================================

/// The square container every layer is drawn into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerBox {
    /// Side length in px.
    pub size: f32,
    /// Corner radius in px.
    pub corner_radius: f32,
    /// Inset of the content box in px.
    pub padding: f32,
}

impl ContainerBox {
    /// Side of the padded content box.
    pub fn content_size(&self) -> f32 {
        (self.size - 2.0 * self.padding).max(0.0)
    }

    /// Center point of the box.
    pub fn center(&self) -> (f32, f32) {
        (self.size / 2.0, self.size / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient line, 0.0-1.0.
    pub offset: f32,
    pub color: Color,
}

/// A CSS-style linear gradient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearGradient {
    /// Direction in degrees; 0 points up, angles grow clockwise.
    pub angle: f32,
    pub stops: [GradientStop; 3],
}

impl LinearGradient {
    /// Start and end points of the gradient line across a `size` square.
    ///
    /// The line passes through the center and is long enough that the
    /// corners perpendicular to it land exactly on the first and last stop.
    pub fn endpoints(&self, size: f32) -> ((f32, f32), (f32, f32)) {
        let radians = self.angle.to_radians();
        let (dx, dy) = (radians.sin(), -radians.cos());
        let half = (size * dx.abs() + size * dy.abs()) / 2.0;
        let c = size / 2.0;
        ((c - dx * half, c - dy * half), (c + dx * half, c + dy * half))
    }
}

/// How the container background is painted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Paint {
    Transparent,
    Solid(Color),
    LinearGradient(LinearGradient),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BorderStroke {
    pub width: f32,
    pub color: Color,
}

/// A black drop shadow below the container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DropShadow {
    pub offset_y: f32,
    /// CSS blur radius in px.
    pub blur: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FillOverlay {
    pub color: Color,
    pub opacity: f32,
    /// Distance from the container edge in px; the overlay stays inside the border.
    pub inset: f32,
    /// Corner radius in px.
    pub corner_radius: f32,
}

impl FillOverlay {
    /// Side of the overlay square for a container of `size` px.
    pub fn side(&self, size: f32) -> f32 {
        (size - 2.0 * self.inset).max(0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IconLayer {
    pub glyph: &'static Glyph,
    /// Side of the glyph box in px, centered in the container.
    pub size: f32,
    /// Rotation in degrees around the glyph center.
    pub rotation: f32,
    pub color: Color,
    pub opacity: f32,
}

/// The paint layers, back to front.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Background,
    Fill,
    Icon,
}

/// Everything needed to paint one logo.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualDescription {
    pub container: ContainerBox,
    pub background: Paint,
    /// Absent without a background or with zero width.
    pub border: Option<BorderStroke>,
    /// Absent without a background or with zero intensity.
    pub shadow: Option<DropShadow>,
    pub fill: FillOverlay,
    pub icon: IconLayer,
}

impl VisualDescription {
    /// Paint order, back to front.
    pub const STACKING: [LayerKind; 3] = [LayerKind::Background, LayerKind::Fill, LayerKind::Icon];

    pub fn layers(&self) -> [LayerKind; 3] {
        Self::STACKING
    }
}

// ============================================================================
// Rendering
// ============================================================================

/// Maps a style state to its visual description.
///
/// Unknown glyph ids fall back to the default glyph so rendering stays total.
pub fn render(state: &StyleState) -> VisualDescription {
    let geometry = &state.geometry;
    let bg = &state.background;

    let container = ContainerBox {
        size: geometry.size,
        corner_radius: geometry.size * geometry.corner_radius / 100.0,
        padding: geometry.padding,
    };

    let background = if !bg.present {
        Paint::Transparent
    } else {
        match bg.mode {
            BackgroundMode::Solid => Paint::Solid(bg.solid),
            BackgroundMode::Gradient => {
                let [from, via, to] = bg.gradient.as_array();
                Paint::LinearGradient(LinearGradient {
                    angle: bg.angle,
                    stops: [
                        GradientStop {
                            offset: 0.0,
                            color: from,
                        },
                        GradientStop {
                            offset: 0.5,
                            color: via,
                        },
                        GradientStop {
                            offset: 1.0,
                            color: to,
                        },
                    ],
                })
            }
        }
    };

    let border = (bg.present && state.border.width > 0.0).then_some(BorderStroke {
        width: state.border.width,
        color: state.border.color,
    });

    let intensity = state.shadow.intensity;
    let shadow = (bg.present && intensity > 0.0).then_some(DropShadow {
        offset_y: SHADOW_OFFSET_Y,
        blur: SHADOW_BLUR_PER_INTENSITY * intensity,
        alpha: intensity,
    });

    let inset = border.map_or(0.0, |b| b.width);
    let fill_side = (geometry.size - 2.0 * inset).max(0.0);
    let fill = FillOverlay {
        color: state.fill.color,
        opacity: state.fill.opacity,
        inset,
        corner_radius: fill_side * FILL_CORNER_RADIUS / 100.0,
    };

    let glyph = glyph::find(&state.icon)
        .or_else(|| glyph::find(glyph::DEFAULT_GLYPH))
        .unwrap_or(&glyph::CATALOG[0]);

    let icon = IconLayer {
        glyph,
        size: geometry.size * ICON_SCALE,
        rotation: geometry.rotation,
        color: state.icon_color(),
        // The icon fades as the fill overlay strengthens.
        opacity: 1.0 - state.fill.opacity,
    };

    VisualDescription {
        container,
        background,
        border,
        shadow,
        fill,
        icon,
    }
}

// ============================================================================
// Tests
// ============================================================================
