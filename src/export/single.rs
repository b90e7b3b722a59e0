//! Single image export (PNG or JPEG).

use std::io::Cursor;

use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};

use super::{ExportArtifact, ExportFormat, timestamped_file_name};
use crate::error::{ExportError, Result};
use crate::render::{self, svg};
use crate::style::{Color, StyleState};

/// JPEG quality used for exports (maximum).
pub const JPEG_QUALITY: u8 = 100;

/// Renders `state` and encodes it as a single image file.
///
/// The raster is `supersample` times the container size. PNG keeps
/// transparency; JPEG is flattened onto white first.
pub fn export_image(
    state: &StyleState,
    format: ExportFormat,
    supersample: u32,
    now: DateTime<Utc>,
) -> Result<ExportArtifact> {
    if format == ExportFormat::Package {
        return Err(ExportError::Encoding(
            "bundles are not single images".to_string(),
        ));
    }

    let raster = rasterize_composition(state, supersample)?;
    let bytes = if format == ExportFormat::Jpeg {
        encode_jpeg(&raster)?
    } else {
        encode_png(&raster)?
    };

    tracing::debug!(
        width = raster.width(),
        height = raster.height(),
        bytes = bytes.len(),
        "single image encoded"
    );

    Ok(ExportArtifact {
        file_name: timestamped_file_name(now, format.extension()),
        mime_type: format.mime_type(),
        bytes,
    })
}

/// Rasterizes the full composition at `supersample` times its size.
pub fn rasterize_composition(state: &StyleState, supersample: u32) -> Result<RgbaImage> {
    let desc = render::render(state);
    if desc.container.size <= 0.0 || supersample == 0 {
        return Err(ExportError::RenderTargetMissing(format!(
            "container {}px at {}x cannot be measured",
            desc.container.size, supersample
        )));
    }
    svg::rasterize(&svg::composition_svg(&desc), supersample as f32)
}

pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    PngEncoder::new(&mut out).write_image(
        img.as_raw(),
        img.width(),
        img.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(out.into_inner())
}

/// JPEG has no alpha channel, so the image is composited onto white.
pub fn encode_jpeg(img: &RgbaImage) -> Result<Vec<u8>> {
    let flat = svg::flatten_onto(img, Color::WHITE);
    let mut out = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY).write_image(
        flat.as_raw(),
        flat.width(),
        flat.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(out.into_inner())
}
