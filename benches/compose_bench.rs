use criterion::{criterion_group, criterion_main, Criterion};
use html2slide::{compose, CapturedImage, FitMode, Focus, SlideConfig};
use image::{Rgb, RgbImage};

// A typical 2x capture of a 1920x1080 viewport with some structure in it
fn sample_capture(w: u32, h: u32) -> CapturedImage {
    let mut img = RgbImage::new(w, h);
    for (x, y, p) in img.enumerate_pixels_mut() {
        *p = if (x / 64 + y / 64) % 2 == 0 { Rgb([250, 250, 250]) } else { Rgb([20, 24, 40]) };
    }
    CapturedImage::new(img)
}

fn bench_fit(c: &mut Criterion) {
    let capture = sample_capture(1920, 2400);
    let cfg = SlideConfig { mode: FitMode::Fit, ..Default::default() };

    c.bench_function("compose_fit_portrait_to_4k", |b| {
        b.iter(|| {
            let _ = compose::compose(&capture, &cfg).unwrap();
        })
    });
}

fn bench_fill(c: &mut Criterion) {
    let capture = sample_capture(1920, 2400);
    let cfg = SlideConfig {
        mode: FitMode::Fill,
        focus: Focus::new(0.5, 0.2),
        ..Default::default()
    };

    c.bench_function("compose_fill_portrait_to_4k", |b| {
        b.iter(|| {
            let _ = compose::compose(&capture, &cfg).unwrap();
        })
    });
}

fn bench_same_size(c: &mut Criterion) {
    let capture = sample_capture(3840, 2160);
    let cfg = SlideConfig::default();

    c.bench_function("compose_exact_size_passthrough", |b| {
        b.iter(|| {
            let _ = compose::compose(&capture, &cfg).unwrap();
        })
    });
}

criterion_group!(benches, bench_fit, bench_fill, bench_same_size);
criterion_main!(benches);
