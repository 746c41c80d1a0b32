//! End-to-end driver: load one image, equalize it sequentially and in
//! parallel, persist both result sets, and compare them.

use crate::errors::Result;
use crate::exporters::{self, OutputLayout, RunMode};
use crate::image_loader;
use crate::parallel::Workers;
use crate::pipeline::{self, EqualizationRun};
use crate::profiler::{self, PerformanceReport, Profiler};
use crate::settings::Settings;
use std::path::Path;
use std::time::Instant;

pub fn run(input: &Path, settings: &Settings) -> Result<PerformanceReport> {
    settings.validate()?;
    let started = Instant::now();
    let mut timings = Profiler::new();

    let layout = OutputLayout::new(&settings.output_dir, input);
    layout.ensure_dir()?;

    let processors = num_cpus::get();
    log::info!("Processors available: {}", processors);

    let image = timings.time(profiler::LOAD, || image_loader::load_image(input))?;
    log::info!(
        "Image {}x{} with {} channel(s), {} samples",
        image.width(),
        image.height(),
        image.channels(),
        image.data().len()
    );

    // Pools are built up front so thread start-up is not billed to either run
    let sequential_workers = Workers::sequential()?;
    let parallel_workers = Workers::new(settings.resolved_threads())?;

    log::info!("Sequential run with {} worker", sequential_workers.count());
    let sequential = timings.time(profiler::SEQUENTIAL, || {
        pipeline::equalize(image.as_buffer(), &sequential_workers)
    })?;
    persist(&layout, RunMode::Sequential, &sequential, settings, &mut timings)?;

    log::info!("Parallel run with {} workers", parallel_workers.count());
    let parallel = timings.time(profiler::PARALLEL, || {
        pipeline::equalize(image.as_buffer(), &parallel_workers)
    })?;
    persist(&layout, RunMode::Parallel, &parallel, settings, &mut timings)?;

    let report = PerformanceReport::from_profiler(
        &timings,
        started.elapsed(),
        processors,
        parallel_workers.count(),
        sequential.matches(&parallel),
    );
    if !report.runs_match {
        log::error!("{}", report);
        pipeline::verify_identical(&sequential, &parallel)?;
    }

    Ok(report)
}

/// Write every artifact of one run. The original-histogram chart only
/// depends on the input, so it is written once with the sequential results.
fn persist(
    layout: &OutputLayout,
    mode: RunMode,
    run: &EqualizationRun,
    settings: &Settings,
    timings: &mut Profiler,
) -> Result<()> {
    let quality = settings.jpeg_quality;

    timings.time(profiler::IMAGE_SAVE, || {
        exporters::save_jpeg(&layout.equalized_image(mode), run.equalized.as_buffer(), quality)
    })?;

    if settings.write_csv {
        timings.time(profiler::CSV, || {
            exporters::write_histogram_csv(&layout.histogram_csv(mode), &run.histogram, &run.map)
        })?;
    }

    if settings.write_charts {
        timings.time(profiler::CHARTS, || -> Result<()> {
            if mode == RunMode::Sequential {
                exporters::save_histogram_chart(&layout.original_chart(), &run.histogram, quality)?;
            }
            exporters::save_histogram_chart(&layout.equalized_chart(mode), &run.equalized_histogram, quality)
        })?;
    }

    log::info!("Saved {} results to {:?}", mode.label(), layout.dir());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn gradient_png(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("gradient.png");
        RgbaImage::from_fn(64, 32, |x, y| Rgba([(x * 2) as u8 + 40, (y * 3) as u8 + 60, 90, 200]))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_full_run_writes_outputs() {
        let dir = tempfile::tempdir().unwrap();
        let input = gradient_png(dir.path());
        let settings = Settings {
            output_dir: dir.path().join("results"),
            threads: Some(4),
            ..Settings::default()
        };

        let report = run(&input, &settings).unwrap();
        assert!(report.runs_match);
        assert_eq!(report.threads, 4);

        let layout = OutputLayout::new(&settings.output_dir, &input);
        for mode in [RunMode::Sequential, RunMode::Parallel] {
            assert!(layout.equalized_image(mode).exists());
            assert!(layout.histogram_csv(mode).exists());
            assert!(layout.equalized_chart(mode).exists());
        }
        assert!(layout.original_chart().exists());

        let seq_csv = std::fs::read_to_string(layout.histogram_csv(RunMode::Sequential)).unwrap();
        let par_csv = std::fs::read_to_string(layout.histogram_csv(RunMode::Parallel)).unwrap();
        assert_eq!(seq_csv, par_csv);
    }

    #[test]
    fn test_optional_outputs_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let input = gradient_png(dir.path());
        let settings = Settings {
            output_dir: dir.path().join("out"),
            threads: Some(2),
            write_csv: false,
            write_charts: false,
            ..Settings::default()
        };

        run(&input, &settings).unwrap();

        let layout = OutputLayout::new(&settings.output_dir, &input);
        assert!(layout.equalized_image(RunMode::Parallel).exists());
        assert!(!layout.histogram_csv(RunMode::Sequential).exists());
        assert!(!layout.original_chart().exists());
    }

    #[test]
    fn test_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            output_dir: dir.path().join("out"),
            ..Settings::default()
        };

        let err = run(&dir.path().join("missing.png"), &settings).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }
}
