//! SVG markup generation and rasterization using resvg/usvg.
//!
//! A [`VisualDescription`] is written out as a standalone SVG document whose
//! user units are CSS px, then rasterized at any scale. Lone glyphs (used for
//! icon bundles) go through the same path on their 24-unit grid.

use std::fmt::Write as _;

use image::{Rgb, RgbImage, Rgba, RgbaImage};
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use super::{Paint, VisualDescription};
use crate::error::{ExportError, Result};
use crate::glyph::{GLYPH_GRID, GLYPH_STROKE_WIDTH, Glyph};
use crate::style::Color;

const SVG_NS: &str = "http://www.w3.org/2000/svg";

// ============================================================================
// Markup
// ============================================================================

/// Writes the full composition as an SVG document `size` px square.
pub fn composition_svg(desc: &VisualDescription) -> String {
    let size = desc.container.size;
    let radius = desc.container.corner_radius;
    let mut svg = format!(
        r#"<svg xmlns="{SVG_NS}" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
    );

    svg.push_str("<defs>");
    if let Paint::LinearGradient(gradient) = &desc.background {
        let ((x1, y1), (x2, y2)) = gradient.endpoints(size);
        let _ = write!(
            svg,
            r#"<linearGradient id="background" gradientUnits="userSpaceOnUse" x1="{x1}" y1="{y1}" x2="{x2}" y2="{y2}">"#
        );
        for stop in &gradient.stops {
            let _ = write!(
                svg,
                r#"<stop offset="{}" stop-color="{}"/>"#,
                stop.offset, stop.color
            );
        }
        svg.push_str("</linearGradient>");
    }
    if let Some(shadow) = &desc.shadow {
        // CSS blur radius is twice the Gaussian standard deviation.
        let _ = write!(
            svg,
            r##"<filter id="shadow" x="-50%" y="-50%" width="200%" height="200%"><feDropShadow dx="0" dy="{}" stdDeviation="{}" flood-color="#000000" flood-opacity="{}"/></filter>"##,
            shadow.offset_y,
            shadow.blur / 2.0,
            shadow.alpha
        );
    }
    svg.push_str("</defs>");

    let background_fill = match &desc.background {
        Paint::Transparent => None,
        Paint::Solid(color) => Some(color.to_hex()),
        Paint::LinearGradient(_) => Some("url(#background)".to_string()),
    };
    if let Some(fill) = background_fill {
        let filter = if desc.shadow.is_some() {
            r#" filter="url(#shadow)""#
        } else {
            ""
        };
        let _ = write!(
            svg,
            r#"<rect width="{size}" height="{size}" rx="{radius}" fill="{fill}"{filter}/>"#
        );
    }

    if let Some(border) = &desc.border {
        let inset = border.width / 2.0;
        let side = (size - border.width).max(0.0);
        let rx = (radius - inset).max(0.0);
        let _ = write!(
            svg,
            r#"<rect x="{inset}" y="{inset}" width="{side}" height="{side}" rx="{rx}" fill="none" stroke="{}" stroke-width="{}"/>"#,
            border.color, border.width
        );
    }

    if desc.fill.opacity > 0.0 {
        let fill = &desc.fill;
        let side = fill.side(size);
        let _ = write!(
            svg,
            r#"<rect x="{0}" y="{0}" width="{side}" height="{side}" rx="{1}" fill="{2}" fill-opacity="{3}"/>"#,
            fill.inset, fill.corner_radius, fill.color, fill.opacity
        );
    }

    let icon = &desc.icon;
    let (cx, cy) = desc.container.center();
    svg.push_str(&glyph_group(
        icon.glyph,
        icon.color,
        (cx, cy),
        icon.size / GLYPH_GRID,
        icon.rotation,
        icon.opacity,
    ));

    svg.push_str("</svg>");
    svg
}

/// Writes a lone glyph as an SVG document on its 24-unit grid.
///
/// `fraction` shrinks the glyph around the grid center, leaving a safe zone
/// around it (1.0 fills the grid).
pub fn glyph_svg(glyph: &Glyph, color: Color, rotation: f32, fraction: f32) -> String {
    let grid = GLYPH_GRID;
    let center = grid / 2.0;
    format!(
        r#"<svg xmlns="{SVG_NS}" width="{grid}" height="{grid}" viewBox="0 0 {grid} {grid}">{}</svg>"#,
        glyph_group(glyph, color, (center, center), fraction, rotation, 1.0)
    )
}

fn glyph_group(
    glyph: &Glyph,
    color: Color,
    (cx, cy): (f32, f32),
    scale: f32,
    rotation: f32,
    opacity: f32,
) -> String {
    let half = GLYPH_GRID / 2.0;
    format!(
        r#"<g transform="translate({cx} {cy}) rotate({rotation}) scale({scale}) translate(-{half} -{half})" opacity="{opacity}" fill="none" stroke="{color}" stroke-width="{GLYPH_STROKE_WIDTH}" stroke-linecap="round" stroke-linejoin="round">{}</g>"#,
        glyph.markup
    )
}

// ============================================================================
// Rasterization
// ============================================================================

/// Rasterizes an SVG document at `scale` times its intrinsic size.
///
/// Fails with [`ExportError::RenderTargetMissing`] if the markup does not
/// parse or the scaled size is empty or too large to allocate.
pub fn rasterize(svg_data: &str, scale: f32) -> Result<RgbaImage> {
    let tree = Tree::from_str(svg_data, &Options::default())
        .map_err(|e| ExportError::RenderTargetMissing(format!("unparseable markup: {e}")))?;

    let size = tree.size();
    let width = (size.width() * scale).round() as u32;
    let height = (size.height() * scale).round() as u32;

    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        ExportError::RenderTargetMissing(format!("cannot allocate {width}x{height} surface"))
    })?;
    resvg::render(&tree, Transform::from_scale(scale, scale), &mut pixmap.as_mut());

    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Rasterizes an SVG document scaled so its width becomes `side` px.
pub fn rasterize_to_width(svg_data: &str, side: u32) -> Result<RgbaImage> {
    let tree = Tree::from_str(svg_data, &Options::default())
        .map_err(|e| ExportError::RenderTargetMissing(format!("unparseable markup: {e}")))?;
    let width = tree.size().width();
    if width <= 0.0 {
        return Err(ExportError::RenderTargetMissing("zero-width markup".into()));
    }
    rasterize(svg_data, side as f32 / width)
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        // tiny_skia uses premultiplied alpha
        let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
        *dst = Rgba([r, g, b, a]);
    }
    img
}

fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Compositing
// ============================================================================

/// Composites `img` over an opaque backdrop, dropping the alpha channel.
pub fn flatten_onto(img: &RgbaImage, backdrop: Color) -> RgbImage {
    let under = Rgba(backdrop.to_rgba(255));
    let mut out = RgbImage::new(img.width(), img.height());
    for (dst, src) in out.pixels_mut().zip(img.pixels()) {
        let [r, g, b, _] = alpha_blend(*src, under).0;
        *dst = Rgb([r, g, b]);
    }
    out
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Tests
// ============================================================================
