//! html2slide
//!
//! Renders a local HTML document in headless Chrome and composites the
//! screenshot onto a fixed-size slide canvas, producing a PNG that can be
//! dropped straight into a slide deck.
//!
//! # Features
//!
//! - **CDP Backend** (default): captures pages through the Chrome DevTools Protocol
//! - **Fit / Fill**: letterbox the capture or crop it around a focal point
//! - **Pluggable boundaries**: `Capturer` and `Writer` traits keep the
//!   compositor testable without a browser
//!
//! # Example
//!
//! ```
//! use html2slide::{compose, CapturedImage, FitMode, SlideConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let capture = CapturedImage::new(image::RgbImage::new(1920, 1080));
//! let config = SlideConfig { mode: FitMode::Fit, ..Default::default() };
//! let slide = compose::compose(&capture, &config)?;
//! assert_eq!(slide.dimensions(), (3840, 2160));
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

use image::{Rgb, RgbImage};
use log::{debug, info};

pub mod error;
pub use error::{Error, Result};

pub mod compose;
pub mod output;

#[cfg(feature = "cdp")]
pub mod cdp;

#[cfg(feature = "cdp")]
pub use cdp::CdpCapturer;
pub use output::PngWriter;

/// Default slide width in pixels (16:9 4K)
pub const DEFAULT_SLIDE_WIDTH: u32 = 3840;
/// Default slide height in pixels
pub const DEFAULT_SLIDE_HEIGHT: u32 = 2160;
/// Background color behind letterboxed captures
pub const DEFAULT_BACKGROUND: Rgb<u8> = Rgb([5, 5, 8]);

/// How the capture is placed on the slide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum FitMode {
    /// Keep the whole capture, letterbox the remaining area
    #[default]
    Fit,
    /// Cover the whole slide, cropping around the focal point
    Fill,
}

impl std::fmt::Display for FitMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FitMode::Fit => f.write_str("fit"),
            FitMode::Fill => f.write_str("fill"),
        }
    }
}

impl std::str::FromStr for FitMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fit" => Ok(FitMode::Fit),
            "fill" => Ok(FitMode::Fill),
            other => Err(Error::ConfigError(format!("unknown mode '{}' (expected fit or fill)", other))),
        }
    }
}

/// Normalized focal point used when cropping in fill mode.
///
/// `(0.0, 0.0)` keeps the top-left of the scaled capture, `(1.0, 1.0)` the
/// bottom-right. Values outside `[0, 1]` are clamped when used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Focus {
    pub x: f64,
    pub y: f64,
}

impl Focus {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Focus with both axes clamped into `[0, 1]`; NaN maps to the center.
    pub fn clamped(self) -> Self {
        fn clamp(v: f64) -> f64 {
            if v.is_nan() {
                0.5
            } else {
                v.clamp(0.0, 1.0)
            }
        }
        Self { x: clamp(self.x), y: clamp(self.y) }
    }
}

impl Default for Focus {
    fn default() -> Self {
        Self { x: 0.5, y: 0.5 }
    }
}

/// Slide canvas configuration
#[derive(Debug, Clone)]
pub struct SlideConfig {
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
    /// Fit policy
    pub mode: FitMode,
    /// Crop focus (fill mode only)
    pub focus: Focus,
    /// Letterbox color
    pub background: Rgb<u8>,
}

impl Default for SlideConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_SLIDE_WIDTH,
            height: DEFAULT_SLIDE_HEIGHT,
            mode: FitMode::Fit,
            focus: Focus::default(),
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl SlideConfig {
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::ConfigError(format!(
                "slide size must be positive, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

/// Browser viewport in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: DEFAULT_SLIDE_WIDTH,
            height: DEFAULT_SLIDE_HEIGHT,
        }
    }
}

/// Configuration for the capture step
///
/// The defaults match the CLI: a 4K viewport rendered at 2x density, one
/// second of settle time after load and no zoom.
///
/// # Examples
///
/// ```
/// let cfg = html2slide::CaptureConfig::default();
/// assert_eq!(cfg.effective_scale_factor(), 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Viewport dimensions
    pub viewport: Viewport,
    /// Pixel density multiplier; values below 1.0 are raised to 1.0
    pub device_scale_factor: f64,
    /// CSS zoom applied to `document.body` before capturing
    pub zoom: f64,
    /// Seconds to wait after load for fonts and late assets
    pub wait_secs: f64,
    /// Capture only this element instead of the full page
    pub selector: Option<String>,
    /// Bound for navigation and element lookup in milliseconds
    pub timeout_ms: u64,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            device_scale_factor: 2.0,
            zoom: 1.0,
            wait_secs: 1.0,
            selector: None,
            timeout_ms: 30000,
        }
    }
}

impl CaptureConfig {
    pub fn effective_scale_factor(&self) -> f64 {
        self.device_scale_factor.max(1.0)
    }

    pub fn validate(&self) -> Result<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(Error::ConfigError("viewport size must be positive".into()));
        }
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(Error::ConfigError(format!("zoom must be a positive number, got {}", self.zoom)));
        }
        if !self.wait_secs.is_finite() || self.wait_secs < 0.0 {
            return Err(Error::ConfigError(format!("wait must be zero or more seconds, got {}", self.wait_secs)));
        }
        if !self.device_scale_factor.is_finite() || self.device_scale_factor <= 0.0 {
            return Err(Error::ConfigError(format!(
                "device scale factor must be a positive number, got {}",
                self.device_scale_factor
            )));
        }
        if let Some(sel) = &self.selector {
            if sel.trim().is_empty() {
                return Err(Error::ConfigError("selector must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// A raster produced by a capture backend.
///
/// Zero-area captures are representable so the compositor can reject them
/// with `Error::InvalidCaptureError`.
#[derive(Debug, Clone)]
pub struct CapturedImage {
    pub pixels: RgbImage,
}

impl CapturedImage {
    pub fn new(pixels: RgbImage) -> Self {
        Self { pixels }
    }

    pub fn empty() -> Self {
        Self { pixels: RgbImage::new(0, 0) }
    }

    /// Decode PNG (or any enabled format) bytes into an RGB capture
    pub fn from_png(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self { pixels: decoded.to_rgb8() })
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }
}

/// Produces one raster image from an HTML file
pub trait Capturer {
    fn capture(&mut self, html_path: &Path, config: &CaptureConfig) -> Result<CapturedImage>;
}

/// Persists a finished slide
pub trait Writer {
    fn exists(&self, path: &Path) -> bool;

    /// Make sure the directory that will hold `path` exists
    fn prepare(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    /// Write a complete, final-size canvas to `path`
    fn write(&mut self, canvas: &RgbImage, path: &Path) -> Result<()>;
}

/// One HTML file to one slide PNG
#[derive(Debug, Clone)]
pub struct SlideJob {
    pub html_path: PathBuf,
    pub output_root: PathBuf,
    pub slide: SlideConfig,
    pub capture: CaptureConfig,
    pub overwrite: bool,
}

impl SlideJob {
    pub fn new(html_path: impl Into<PathBuf>) -> Self {
        Self {
            html_path: html_path.into(),
            output_root: PathBuf::from(output::DEFAULT_OUTPUT_ROOT),
            slide: SlideConfig::default(),
            capture: CaptureConfig::default(),
            overwrite: false,
        }
    }

    pub fn output_path(&self) -> PathBuf {
        output::output_path(&self.output_root, &self.html_path)
    }
}

/// What `render_slide` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The slide was rendered and written
    Written(PathBuf),
    /// The output already existed and overwrite was not requested
    Skipped(PathBuf),
}

impl Outcome {
    pub fn path(&self) -> &Path {
        match self {
            Outcome::Written(p) | Outcome::Skipped(p) => p,
        }
    }
}

/// Run the whole pipeline for one job: capture, compose, write.
///
/// The output directory is created up front, even for runs that skip or
/// fail; no file is written when the capture or composition fails. The
/// skip decision is made here, before the capturer is invoked.
pub fn render_slide<C, W>(capturer: &mut C, writer: &mut W, job: &SlideJob) -> Result<Outcome>
where
    C: Capturer + ?Sized,
    W: Writer + ?Sized,
{
    job.slide.validate()?;
    job.capture.validate()?;

    if !job.html_path.is_file() {
        return Err(Error::CaptureError(format!(
            "HTML file not found: {}",
            job.html_path.display()
        )));
    }

    let out = job.output_path();
    writer.prepare(&out)?;
    if writer.exists(&out) && !job.overwrite {
        info!("skipping {} (already exists)", out.display());
        return Ok(Outcome::Skipped(out));
    }

    debug!("capturing {}", job.html_path.display());
    let captured = capturer.capture(&job.html_path, &job.capture)?;
    debug!("captured {}x{}", captured.width(), captured.height());

    let canvas = compose::compose(&captured, &job.slide)?;
    writer.write(&canvas, &out)?;
    info!("wrote {}", out.display());

    Ok(Outcome::Written(out))
}
