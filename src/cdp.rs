//! Chrome DevTools Protocol capture backend

use crate::{CaptureConfig, CapturedImage, Capturer, Error, Result, Viewport};
use base64::Engine as Base64Engine;
use headless_chrome::browser::tab::Tab;
use headless_chrome::protocol::cdp::Page;
use headless_chrome::{Browser, LaunchOptions};
use log::{debug, warn};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

const PAGE_SIZE_SCRIPT: &str = r#"
(function() {
    const doc = document.documentElement;
    const body = document.body;
    return JSON.stringify({
        width: Math.max(doc.scrollWidth, body ? body.scrollWidth : 0),
        height: Math.max(doc.scrollHeight, body ? body.scrollHeight : 0)
    });
})()
"#;

/// CDP-based capturer (uses the `headless_chrome` crate)
///
/// The browser is launched lazily on the first capture so that runs which
/// end up skipping the output never start Chrome. The browser process is
/// terminated when the capturer is dropped.
#[derive(Default)]
pub struct CdpCapturer {
    session: Option<Session>,
}

struct Session {
    browser: Browser,
    tab: Arc<Tab>,
    viewport: Viewport,
}

impl CdpCapturer {
    pub fn new() -> Self {
        Self { session: None }
    }

    fn tab_for(&mut self, config: &CaptureConfig) -> Result<Arc<Tab>> {
        if let Some(session) = &self.session {
            if session.viewport == config.viewport {
                return Ok(session.tab.clone());
            }
        }

        let session = launch(config)?;
        let tab = session.tab.clone();
        self.session = Some(session);
        Ok(tab)
    }

    /// Close the browser and clean up resources
    pub fn close(self) -> Result<()> {
        if let Some(session) = self.session {
            drop(session.tab);
            drop(session.browser);
        }
        Ok(())
    }
}

fn launch(config: &CaptureConfig) -> Result<Session> {
    let viewport = config.viewport;
    // Keep the DevTools connection alive through long settle waits.
    let idle = Duration::from_millis(config.timeout_ms) + Duration::from_secs_f64(config.wait_secs);

    let launch_options = LaunchOptions::default_builder()
        .headless(true)
        .window_size(Some((viewport.width, viewport.height)))
        .idle_browser_timeout(idle)
        .build()
        .map_err(|e| Error::InitializationError(format!("Failed to build launch options: {}", e)))?;

    let browser = Browser::new(launch_options)
        .map_err(|e| Error::InitializationError(format!("Failed to launch browser: {}", e)))?;

    let tab = browser
        .new_tab()
        .map_err(|e| Error::InitializationError(format!("Failed to create tab: {}", e)))?;
    tab.set_default_timeout(Duration::from_millis(config.timeout_ms));

    debug!("launched headless Chrome with {}x{} window", viewport.width, viewport.height);
    Ok(Session { browser, tab, viewport })
}

/// `file://` URL for a local HTML document
pub fn file_url(html_path: &Path) -> Result<String> {
    let canonical = html_path
        .canonicalize()
        .map_err(|e| Error::CaptureError(format!("HTML file not found: {} ({})", html_path.display(), e)))?;
    if !canonical.is_file() {
        return Err(Error::CaptureError(format!("HTML file not found: {}", canonical.display())));
    }
    url::Url::from_file_path(&canonical)
        .map(|u| u.to_string())
        .map_err(|_| Error::CaptureError(format!("Cannot build file URL for {}", canonical.display())))
}

fn zoom_script(zoom: f64) -> String {
    format!(
        "(function() {{ document.body.style.transformOrigin = 'top left'; document.body.style.zoom = {}; }})()",
        zoom
    )
}

/// Screenshot command for `clip`, painting content outside the viewport too.
///
/// `Tab::capture_screenshot` leaves `capture_beyond_viewport` unset, which
/// blanks everything below the window on tall pages.
fn screenshot_command(clip: Page::Viewport) -> Page::CaptureScreenshot {
    Page::CaptureScreenshot {
        format: Some(Page::CaptureScreenshotFormatOption::Png),
        quality: None,
        clip: Some(clip),
        from_surface: Some(true),
        capture_beyond_viewport: Some(true),
        optimize_for_speed: None,
    }
}

fn decode_screenshot(data: &str) -> Result<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(data)
        .map_err(|e| Error::CaptureError(format!("Screenshot payload is not valid base64: {}", e)))
}

/// Parse the `{width, height}` JSON returned by `PAGE_SIZE_SCRIPT`
fn parse_page_size(value: Option<serde_json::Value>) -> Result<(f64, f64)> {
    let val = value.ok_or_else(|| Error::CaptureError("No value returned for page size".into()))?;
    let parsed = if val.is_string() {
        serde_json::from_str::<serde_json::Value>(val.as_str().unwrap_or(""))
            .map_err(|e| Error::CaptureError(format!("Malformed page size: {}", e)))?
    } else {
        val
    };

    let dim = |key: &str| {
        parsed
            .get(key)
            .and_then(|v| v.as_f64())
            .ok_or_else(|| Error::CaptureError(format!("Page size is missing '{}'", key)))
    };
    Ok((dim("width")?, dim("height")?))
}

impl Capturer for CdpCapturer {
    fn capture(&mut self, html_path: &Path, config: &CaptureConfig) -> Result<CapturedImage> {
        let url = file_url(html_path)?;
        let tab = self.tab_for(config)?;
        let scale = config.effective_scale_factor();

        tab.navigate_to(&url)
            .map_err(|e| Error::CaptureError(format!("Navigation to {} failed: {}", url, e)))?;
        tab.wait_until_navigated()
            .map_err(|e| Error::CaptureError(format!("Loading {} failed: {}", url, e)))?;

        // Let fonts and late assets settle
        if config.wait_secs > 0.0 {
            std::thread::sleep(Duration::from_secs_f64(config.wait_secs));
        }

        if config.zoom != 1.0 {
            tab.evaluate(&zoom_script(config.zoom), false)
                .map_err(|e| Error::CaptureError(format!("Failed to apply zoom {}: {}", config.zoom, e)))?;
        }

        let clip = match &config.selector {
            Some(selector) => {
                let element = tab
                    .wait_for_element_with_custom_timeout(selector, Duration::from_millis(config.timeout_ms))
                    .map_err(|e| Error::CaptureError(format!("Selector '{}' matched no element: {}", selector, e)))?;

                if let Err(e) = element.scroll_into_view() {
                    warn!("Failed to scroll '{}' into view: {}", selector, e);
                }

                // Hidden elements have no box model; report them as an empty capture.
                match element.get_box_model() {
                    Ok(model) => model.border_viewport(),
                    Err(e) => {
                        debug!("'{}' has no layout box: {}", selector, e);
                        return Ok(CapturedImage::empty());
                    }
                }
            }
            None => {
                let eval = tab
                    .evaluate(PAGE_SIZE_SCRIPT, false)
                    .map_err(|e| Error::CaptureError(format!("Failed to measure page: {}", e)))?;
                let (width, height) = parse_page_size(eval.value)?;
                Page::Viewport { x: 0.0, y: 0.0, width, height, scale: 1.0 }
            }
        };

        if clip.width < 1.0 || clip.height < 1.0 {
            debug!("capture region is {}x{}, nothing to screenshot", clip.width, clip.height);
            return Ok(CapturedImage::empty());
        }

        let clip = Page::Viewport { scale, ..clip };
        debug!(
            "capturing {}x{} CSS px at scale {} from {}",
            clip.width, clip.height, scale, url
        );

        let shot = tab
            .call_method(screenshot_command(clip))
            .map_err(|e| Error::CaptureError(format!("Screenshot failed: {}", e)))?;

        CapturedImage::from_png(&decode_screenshot(&shot.data)?)
    }
}
