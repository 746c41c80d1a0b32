use anyhow::Context;
use clap::Parser;
use histeq::{logging, Settings};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "histeq")]
#[command(version, about = "Histogram equalization, sequential vs parallel", long_about = None)]
struct Cli {
    /// Input image
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    out: Option<PathBuf>,

    /// Number of threads for the parallel run (default: all hardware threads)
    #[arg(short = 'j', long, value_name = "N")]
    threads: Option<usize>,

    /// JPEG quality for every written image (1-100)
    #[arg(short, long, value_name = "Q")]
    quality: Option<u8>,

    /// Settings file (JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip the CSV tables
    #[arg(long)]
    no_csv: bool,

    /// Skip the histogram charts
    #[arg(long)]
    no_charts: bool,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path).with_context(|| format!("loading {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(out) = &self.out {
            settings.output_dir = out.clone();
        }
        if self.threads.is_some() {
            settings.threads = self.threads;
        }
        if let Some(quality) = self.quality {
            settings.jpeg_quality = quality;
        }
        settings.write_csv &= !self.no_csv;
        settings.write_charts &= !self.no_charts;
        settings.debug |= self.debug;

        settings.validate()?;
        Ok(settings)
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli.settings()?;
    logging::init_tracing(settings.debug);

    match histeq::app::run(&cli.input, &settings) {
        Ok(report) => {
            println!("{}", report);
            Ok(())
        }
        Err(e) => {
            log::error!("[{}] {}", e.error_code(), e);
            eprintln!("{}", e.user_message());
            Err(e.into())
        }
    }
}
