//! Histogram equalization for 8-bit gray and RGB images, with a sequential
//! reference mode and a multi-threaded mode that produce identical output.

pub mod app;
pub mod errors;
pub mod exporters;
pub mod histogram;
pub mod image_loader;
pub mod logging;
pub mod parallel;
pub mod pipeline;
pub mod pixels;
pub mod profiler;
pub mod settings;


pub use errors::{EqualizeError, Result};
pub use histogram::{Cdf, EqualizationMap, Histogram, MapKind};
pub use parallel::Workers;
pub use pipeline::{equalize, verify_identical, EqualizationRun};
pub use pixels::{OwnedPixels, PixelBuffer};
pub use settings::Settings;
