use crate::errors::{EqualizeError, Result};
use crate::histogram::{chart_to_rgb, render_histogram_chart, EqualizationMap, Histogram, LEVELS};
use crate::pixels::PixelBuffer;
use image::codecs::jpeg::JpegEncoder;
use image::ExtendedColorType;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Which pipeline run produced an output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Sequential,
    Parallel,
}

impl RunMode {
    pub fn label(&self) -> &'static str {
        match self {
            RunMode::Sequential => "sequential",
            RunMode::Parallel => "parallel",
        }
    }
}

/// File names of every artifact written for one input image.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    dir: PathBuf,
    stem: String,
}

impl OutputLayout {
    pub fn new(dir: &Path, input: &Path) -> Self {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("image")
            .to_string();
        Self {
            dir: dir.to_path_buf(),
            stem,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn equalized_image(&self, mode: RunMode) -> PathBuf {
        self.dir.join(format!("{}_eq_{}.jpg", self.stem, mode.label()))
    }

    pub fn histogram_csv(&self, mode: RunMode) -> PathBuf {
        self.dir.join(format!("{}_histo_{}.csv", self.stem, mode.label()))
    }

    pub fn equalized_chart(&self, mode: RunMode) -> PathBuf {
        self.dir.join(format!("{}_histogram_eq_{}.jpg", self.stem, mode.label()))
    }

    pub fn original_chart(&self) -> PathBuf {
        self.dir.join(format!("{}_histogram_original.jpg", self.stem))
    }

    /// Create the output directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir).map_err(|e| EqualizeError::ExportError {
            path: self.dir.clone(),
            message: format!("cannot create output directory: {}", e),
        })
    }
}

pub fn save_jpeg(path: &Path, pixels: PixelBuffer<'_>, quality: u8) -> Result<()> {
    let color = match pixels.channels() {
        1 => ExtendedColorType::L8,
        _ => ExtendedColorType::Rgb8,
    };

    let file = File::create(path).map_err(|e| EqualizeError::ExportError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let mut writer = BufWriter::new(file);

    JpegEncoder::new_with_quality(&mut writer, quality)
        .encode(pixels.samples(), pixels.width(), pixels.height(), color)
        .map_err(|e| EqualizeError::ExportError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    writer.flush()?;
    log::debug!("Saved {:?}", path);
    Ok(())
}

/// Render `histogram` as a 3-channel bar chart and save it as JPEG.
pub fn save_histogram_chart(path: &Path, histogram: &Histogram, quality: u8) -> Result<()> {
    let chart = chart_to_rgb(&render_histogram_chart(histogram));
    let buffer = PixelBuffer::new(chart.as_raw(), chart.width(), chart.height(), 3)?;
    save_jpeg(path, buffer, quality)
}

#[derive(Debug, Serialize)]
struct HistogramRow {
    level: usize,
    original: u64,
    equalized: u8,
}

/// Write the `level,original,equalized` table: one row per intensity level.
pub fn write_histogram_table<W: Write>(writer: W, original: &Histogram, map: &EqualizationMap) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for level in 0..LEVELS {
        csv_writer.serialize(HistogramRow {
            level,
            original: original.counts()[level],
            equalized: map.table()[level],
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub fn write_histogram_csv(path: &Path, original: &Histogram, map: &EqualizationMap) -> Result<()> {
    let file = File::create(path).map_err(|e| EqualizeError::ExportError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_histogram_table(BufWriter::new(file), original, map)?;
    log::debug!("Saved {:?}", path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::{MapKind, CHART_HEIGHT, CHART_WIDTH};
    use image::GenericImageView;

    #[test]
    fn test_layout_names() {
        let layout = OutputLayout::new(Path::new("out"), Path::new("/photos/beach.png"));

        assert_eq!(layout.equalized_image(RunMode::Sequential), PathBuf::from("out/beach_eq_sequential.jpg"));
        assert_eq!(layout.histogram_csv(RunMode::Parallel), PathBuf::from("out/beach_histo_parallel.csv"));
        assert_eq!(layout.equalized_chart(RunMode::Parallel), PathBuf::from("out/beach_histogram_eq_parallel.jpg"));
        assert_eq!(layout.original_chart(), PathBuf::from("out/beach_histogram_original.jpg"));
    }

    #[test]
    fn test_csv_table() {
        let mut hist = Histogram::new();
        hist.record_all(&[0, 0, 7]);
        let map = EqualizationMap::identity(MapKind::Empty);

        let mut out = Vec::new();
        write_histogram_table(&mut out, &hist, &map).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), LEVELS + 1);
        assert_eq!(lines[0], "level,original,equalized");
        assert_eq!(lines[1], "0,2,0");
        assert_eq!(lines[8], "7,1,7");
        assert_eq!(lines[256], "255,0,255");
    }

    #[test]
    fn test_chart_written_as_rgb_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(&dir.path().join("nested"), Path::new("img.png"));
        layout.ensure_dir().unwrap();

        let mut hist = Histogram::new();
        hist.record_all(&[5, 5, 6]);
        save_histogram_chart(&layout.original_chart(), &hist, 90).unwrap();

        let chart = image::open(layout.original_chart()).unwrap();
        assert_eq!(chart.dimensions(), (CHART_WIDTH, CHART_HEIGHT));
        assert_eq!(chart.color(), image::ColorType::Rgb8);
    }

    #[test]
    fn test_save_gray_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.jpg");
        let data = vec![128u8; 16 * 8];

        save_jpeg(&path, PixelBuffer::new(&data, 16, 8, 1).unwrap(), 100).unwrap();
        let decoded = image::open(&path).unwrap();
        assert_eq!(decoded.color(), image::ColorType::L8);
    }

    #[test]
    fn test_unwritable_path() {
        let data = [0u8; 3];
        let err = save_jpeg(Path::new("/no/such/dir/x.jpg"), PixelBuffer::new(&data, 1, 1, 3).unwrap(), 100)
            .unwrap_err();
        assert_eq!(err.error_code(), "EXPORT_ERROR");
    }
}
