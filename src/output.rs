//! PNG output writer and output path layout

use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use log::debug;

use crate::{Result, Writer};

/// Output directory used when none is given
pub const DEFAULT_OUTPUT_ROOT: &str = "output";

/// `<root>/<stem>_slides/<stem>_slide.png`
pub fn output_path(root: &Path, html_path: &Path) -> PathBuf {
    let stem = html_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "slide".to_string());
    root.join(format!("{}_slides", stem)).join(format!("{}_slide.png", stem))
}

/// Writes slides as PNG files, creating parent directories as needed
#[derive(Debug, Default, Clone)]
pub struct PngWriter;

impl PngWriter {
    pub fn new() -> Self {
        PngWriter
    }
}

impl Writer for PngWriter {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn prepare(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        Ok(())
    }

    fn write(&mut self, canvas: &RgbImage, path: &Path) -> Result<()> {
        self.prepare(path)?;
        debug!("encoding {}x{} PNG to {}", canvas.width(), canvas.height(), path.display());
        canvas.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_layout() {
        let p = output_path(Path::new("output"), Path::new("/decks/intro.html"));
        assert_eq!(p, PathBuf::from("output/intro_slides/intro_slide.png"));
    }

    #[test]
    fn output_path_keeps_inner_dots() {
        let p = output_path(Path::new("out"), Path::new("q3.review.htm"));
        assert_eq!(p, PathBuf::from("out/q3.review_slides/q3.review_slide.png"));
    }
}
