use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

pub const LOAD: &str = "image_load";
pub const SEQUENTIAL: &str = "sequential";
pub const PARALLEL: &str = "parallel";
pub const IMAGE_SAVE: &str = "image_save";
pub const CSV: &str = "csv";
pub const CHARTS: &str = "charts";

/// Named wall-clock timers. A name may be measured several times; totals add up.
#[derive(Debug, Default)]
pub struct Profiler {
    timers: HashMap<String, Instant>,
    measurements: HashMap<String, Vec<Duration>>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start_timer(&mut self, name: &str) {
        tracing::trace!(timer = name, "start_timer");
        self.timers.insert(name.to_string(), Instant::now());
    }

    pub fn end_timer(&mut self, name: &str) {
        if let Some(start) = self.timers.remove(name) {
            let duration = start.elapsed();
            tracing::debug!(timer = name, duration_us = duration.as_micros() as u64, "end_timer");
            self.add_measurement(name, duration);
        }
    }

    pub fn add_measurement(&mut self, name: &str, duration: Duration) {
        self.measurements.entry(name.to_string()).or_default().push(duration);
    }

    /// Time `f` under `name`.
    pub fn time<R>(&mut self, name: &str, f: impl FnOnce() -> R) -> R {
        self.start_timer(name);
        let result = f();
        self.end_timer(name);
        result
    }

    /// Sum of every measurement recorded under `name`.
    pub fn total(&self, name: &str) -> Duration {
        self.measurements
            .get(name)
            .map(|m| m.iter().sum())
            .unwrap_or_default()
    }
}

/// Summary of one sequential-vs-parallel comparison.
#[derive(Debug, Clone)]
pub struct PerformanceReport {
    pub processors: usize,
    pub threads: usize,
    pub sequential: Duration,
    pub parallel: Duration,
    pub load: Duration,
    pub image_save: Duration,
    pub csv: Duration,
    pub charts: Duration,
    pub overhead: Duration,
    pub runs_match: bool,
}

impl PerformanceReport {
    /// Build a report from the profiler's totals. Overhead is whatever part
    /// of `wall_time` no stage accounts for.
    pub fn from_profiler(profiler: &Profiler, wall_time: Duration, processors: usize, threads: usize, runs_match: bool) -> Self {
        let sequential = profiler.total(SEQUENTIAL);
        let parallel = profiler.total(PARALLEL);
        let load = profiler.total(LOAD);
        let image_save = profiler.total(IMAGE_SAVE);
        let csv = profiler.total(CSV);
        let charts = profiler.total(CHARTS);
        let measured = sequential + parallel + load + image_save + csv + charts;

        Self {
            processors,
            threads,
            sequential,
            parallel,
            load,
            image_save,
            csv,
            charts,
            overhead: wall_time.saturating_sub(measured),
            runs_match,
        }
    }

    pub fn speedup(&self) -> f64 {
        let parallel = self.parallel.as_secs_f64();
        if parallel == 0.0 {
            0.0
        } else {
            self.sequential.as_secs_f64() / parallel
        }
    }

    /// Speedup per thread, as a percentage.
    pub fn efficiency(&self) -> f64 {
        if self.threads == 0 {
            0.0
        } else {
            self.speedup() / self.threads as f64 * 100.0
        }
    }
}

impl fmt::Display for PerformanceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processors: {}", self.processors)?;
        writeln!(f, "Parallel threads: {}", self.threads)?;
        writeln!(f)?;
        writeln!(f, "Performance (algorithm only):")?;
        writeln!(f, "  Sequential time: {:.6} s", self.sequential.as_secs_f64())?;
        writeln!(f, "  Parallel time: {:.6} s", self.parallel.as_secs_f64())?;
        writeln!(f, "  Speedup: {:.2}", self.speedup())?;
        writeln!(f, "  Efficiency: {:.2}%", self.efficiency())?;
        writeln!(f)?;
        writeln!(f, "Additional times:")?;
        writeln!(f, "  Overhead: {:.6} s", self.overhead.as_secs_f64())?;
        writeln!(f, "  Image load: {:.6} s", self.load.as_secs_f64())?;
        writeln!(f, "  Image save: {:.6} s", self.image_save.as_secs_f64())?;
        writeln!(f, "  CSV generation: {:.6} s", self.csv.as_secs_f64())?;
        writeln!(f, "  Histogram charts: {:.6} s", self.charts.as_secs_f64())?;
        writeln!(f)?;
        write!(
            f,
            "Sequential and parallel outputs {}",
            if self.runs_match { "match" } else { "DIFFER" }
        )
    }
}
