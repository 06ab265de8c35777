use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use html2slide::{
    compose, render_slide, CaptureConfig, CdpCapturer, FitMode, Focus, Outcome, PngWriter, SlideConfig, SlideJob,
    Viewport, DEFAULT_SLIDE_HEIGHT, DEFAULT_SLIDE_WIDTH,
};

#[derive(Parser, Debug)]
#[command(name = "html2slide")]
#[command(version, about = "Create 16x9 slide-ready images from HTML inputs")]
struct Cli {
    /// Path to the HTML file to capture
    html_path: PathBuf,

    /// Slide width in pixels
    #[arg(long, default_value_t = DEFAULT_SLIDE_WIDTH)]
    width: u32,

    /// Slide height in pixels
    #[arg(long, default_value_t = DEFAULT_SLIDE_HEIGHT)]
    height: u32,

    /// Seconds to wait after load for assets
    #[arg(long, default_value_t = 1.0)]
    wait: f64,

    /// CSS zoom factor applied before screenshot
    #[arg(long, default_value_t = 1.0)]
    zoom: f64,

    /// Fit keeps full content with letterbox, fill crops to cover the slide
    #[arg(long, value_enum, default_value_t = FitMode::Fit)]
    mode: FitMode,

    /// Optional CSS selector to screenshot instead of the full page
    #[arg(long)]
    selector: Option<String>,

    /// Horizontal crop focus 0-1 when using fill (0.5 = center)
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    focus_x: f64,

    /// Vertical crop focus 0-1 when using fill (0.5 = center)
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    focus_y: f64,

    /// Device scale factor for crisper screenshots
    #[arg(long, default_value_t = 2.0)]
    device_scale_factor: f64,

    /// Regenerate the PNG even if it already exists
    #[arg(long)]
    overwrite: bool,

    /// Letterbox color as #rrggbb
    #[arg(long, default_value = "#050508")]
    background: String,

    /// Directory that receives <name>_slides/<name>_slide.png
    #[arg(long, default_value = html2slide::output::DEFAULT_OUTPUT_ROOT)]
    output_root: PathBuf,

    /// Navigation and selector wait bound in milliseconds
    #[arg(long, default_value_t = 30000)]
    timeout_ms: u64,
}

impl Cli {
    fn into_job(self) -> html2slide::Result<SlideJob> {
        let background = compose::parse_hex_color(&self.background)?;
        Ok(SlideJob {
            html_path: self.html_path,
            output_root: self.output_root,
            slide: SlideConfig {
                width: self.width,
                height: self.height,
                mode: self.mode,
                focus: Focus::new(self.focus_x, self.focus_y),
                background,
            },
            capture: CaptureConfig {
                viewport: Viewport { width: self.width, height: self.height },
                device_scale_factor: self.device_scale_factor,
                zoom: self.zoom,
                wait_secs: self.wait,
                selector: self.selector,
                timeout_ms: self.timeout_ms,
            },
            overwrite: self.overwrite,
        })
    }
}

fn run(cli: Cli) -> anyhow::Result<Outcome> {
    let job = cli.into_job()?;
    let mut capturer = CdpCapturer::new();
    let mut writer = PngWriter::new();
    let outcome = render_slide(&mut capturer, &mut writer, &job)
        .with_context(|| format!("Failed to render {}", job.html_path.display()));
    if let Err(e) = capturer.close() {
        log::warn!("Failed to close browser: {}", e);
    }
    outcome
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    match run(cli) {
        Ok(Outcome::Written(path)) => {
            println!("Wrote {}", path.display());
            ExitCode::SUCCESS
        }
        Ok(Outcome::Skipped(path)) => {
            println!(
                "Skipping {} (already exists, use --overwrite to regenerate)",
                path.display()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            log::debug!("render failed: {:?}", e);
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
