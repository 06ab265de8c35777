//! Slide compositor: places a capture on a fixed-size canvas.
//!
//! Two policies are supported:
//! - `Fit` scales the capture down (or up) until it fits entirely and
//!   centers it on a background-colored canvas.
//! - `Fill` scales until the canvas is covered and crops a canvas-sized
//!   window around the focal point.
//!
//! Resampling always uses Lanczos3; captures are text-heavy and nearest
//! neighbour aliasing is visible on slides.

use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use log::{debug, warn};

use crate::{CapturedImage, Error, FitMode, Focus, Result, SlideConfig};

const FILTER: FilterType = FilterType::Lanczos3;

/// Size of `src` scaled uniformly to fit inside `canvas`.
///
/// The limiting axis comes out exactly equal to the canvas edge; the other
/// axis is rounded to the nearest pixel and never exceeds the canvas.
pub fn fit_size(src: (u32, u32), canvas: (u32, u32)) -> (u32, u32) {
    let scale = f64::min(
        canvas.0 as f64 / src.0 as f64,
        canvas.1 as f64 / src.1 as f64,
    );
    (
        scaled(src.0, scale).clamp(1, canvas.0),
        scaled(src.1, scale).clamp(1, canvas.1),
    )
}

/// Size of `src` scaled uniformly to cover `canvas`; never smaller than the
/// canvas on either axis.
pub fn fill_size(src: (u32, u32), canvas: (u32, u32)) -> (u32, u32) {
    let scale = f64::max(
        canvas.0 as f64 / src.0 as f64,
        canvas.1 as f64 / src.1 as f64,
    );
    (
        scaled(src.0, scale).max(canvas.0),
        scaled(src.1, scale).max(canvas.1),
    )
}

fn scaled(v: u32, scale: f64) -> u32 {
    (v as f64 * scale).round() as u32
}

/// Top-left corner of the canvas-sized crop window inside `resized`.
///
/// The window is centered on the focal point and then clamped so it stays
/// within the resized image. Focus values outside `[0, 1]` are clamped.
pub fn crop_origin(resized: (u32, u32), canvas: (u32, u32), focus: Focus) -> (u32, u32) {
    let focus = focus.clamped();
    (
        crop_axis(resized.0, canvas.0, focus.x),
        crop_axis(resized.1, canvas.1, focus.y),
    )
}

fn crop_axis(resized: u32, canvas: u32, focus: f64) -> u32 {
    let max = resized.saturating_sub(canvas) as f64;
    let start = resized as f64 * focus - canvas as f64 / 2.0;
    start.round().clamp(0.0, max) as u32
}

/// Compose `captured` onto a canvas of `config.width` x `config.height`.
///
/// Fails with `Error::InvalidCaptureError` when the capture has no pixels.
pub fn compose(captured: &CapturedImage, config: &SlideConfig) -> Result<RgbImage> {
    if captured.is_empty() {
        return Err(Error::InvalidCaptureError {
            width: captured.width(),
            height: captured.height(),
        });
    }
    config.validate()?;

    let src = (captured.width(), captured.height());
    let canvas = (config.width, config.height);

    // Exact match: nothing to scale, crop or pad.
    if src == canvas {
        return Ok(captured.pixels.clone());
    }

    match config.mode {
        FitMode::Fit => Ok(letterbox(&captured.pixels, canvas, config.background)),
        FitMode::Fill => {
            let clamped = config.focus.clamped();
            if clamped != config.focus {
                warn!(
                    "focus ({}, {}) is outside [0, 1]; using ({}, {})",
                    config.focus.x, config.focus.y, clamped.x, clamped.y
                );
            }
            Ok(cover(&captured.pixels, canvas, clamped))
        }
    }
}

fn resize(src: &RgbImage, size: (u32, u32)) -> RgbImage {
    if src.dimensions() == size {
        return src.clone();
    }
    imageops::resize(src, size.0, size.1, FILTER)
}

fn letterbox(src: &RgbImage, canvas: (u32, u32), background: Rgb<u8>) -> RgbImage {
    let size = fit_size(src.dimensions(), canvas);
    let resized = resize(src, size);

    let x = (canvas.0 - size.0) / 2;
    let y = (canvas.1 - size.1) / 2;
    debug!(
        "fit: {}x{} -> {}x{} at ({}, {})",
        src.width(),
        src.height(),
        size.0,
        size.1,
        x,
        y
    );

    let mut out = RgbImage::from_pixel(canvas.0, canvas.1, background);
    imageops::replace(&mut out, &resized, x as i64, y as i64);
    out
}

fn cover(src: &RgbImage, canvas: (u32, u32), focus: Focus) -> RgbImage {
    let size = fill_size(src.dimensions(), canvas);
    let resized = resize(src, size);

    let (x, y) = crop_origin(size, canvas, focus);
    debug!(
        "fill: {}x{} -> {}x{}, crop at ({}, {})",
        src.width(),
        src.height(),
        size.0,
        size.1,
        x,
        y
    );

    imageops::crop_imm(&resized, x, y, canvas.0, canvas.1).to_image()
}

/// Parse `#rrggbb`, `rrggbb` or `#rgb` into an RGB color
pub fn parse_hex_color(s: &str) -> Result<Rgb<u8>> {
    let hex = s.trim().trim_start_matches('#');
    let bad = || Error::ConfigError(format!("invalid color '{}' (expected #rrggbb)", s));

    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(bad());
    }

    let expanded: String = match hex.len() {
        3 => hex.chars().flat_map(|c| [c, c]).collect(),
        6 => hex.to_string(),
        _ => return Err(bad()),
    };

    let channel = |i: usize| u8::from_str_radix(&expanded[i..i + 2], 16).map_err(|_| bad());
    Ok(Rgb([channel(0)?, channel(2)?, channel(4)?]))
}
