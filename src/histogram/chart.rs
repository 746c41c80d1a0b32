use super::Histogram;
use image::{GrayImage, Luma, Rgb, RgbImage};

pub const CHART_WIDTH: u32 = 256;
pub const CHART_HEIGHT: u32 = 200;

/// Render `histogram` as white bars on black, one column per level.
///
/// Bars are scaled so the tallest reaches `CHART_HEIGHT - 1` rows.
pub fn render_histogram_chart(histogram: &Histogram) -> GrayImage {
    // all-zero histograms render empty instead of dividing by zero
    let max = histogram.max_count().max(1);
    let mut chart = GrayImage::new(CHART_WIDTH, CHART_HEIGHT);

    for (x, &count) in histogram.counts().iter().enumerate() {
        let bar = bar_height(count, max);
        for y in 0..bar {
            chart.put_pixel(x as u32, CHART_HEIGHT - 1 - y, Luma([255]));
        }
    }

    chart
}

fn bar_height(count: u64, max: u64) -> u32 {
    let scaled = (count as f64 / max as f64 * (CHART_HEIGHT - 1) as f64).round();
    (scaled as u32).min(CHART_HEIGHT - 1)
}

/// Replicate the gray channel into R, G and B.
pub fn chart_to_rgb(chart: &GrayImage) -> RgbImage {
    RgbImage::from_fn(chart.width(), chart.height(), |x, y| {
        let Luma([v]) = *chart.get_pixel(x, y);
        Rgb([v, v, v])
    })
}
