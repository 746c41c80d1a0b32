use super::{Histogram, LEVELS};
use crate::parallel::Workers;
use rayon::prelude::*;

/// Running sum of a histogram. Non-decreasing, last entry equals the total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cdf {
    values: [u64; LEVELS],
}

impl Cdf {
    pub fn values(&self) -> &[u64; LEVELS] {
        &self.values
    }

    pub fn get(&self, level: u8) -> u64 {
        self.values[level as usize]
    }

    pub fn total(&self) -> u64 {
        self.values[LEVELS - 1]
    }
}

pub fn calculate_cdf(histogram: &Histogram) -> Cdf {
    let mut values = [0u64; LEVELS];
    let mut running = 0u64;
    for (value, &count) in values.iter_mut().zip(histogram.counts().iter()) {
        running += count;
        *value = running;
    }
    Cdf { values }
}

/// Smallest strictly positive CDF entry, or `None` when the CDF is all zero.
pub fn calculate_cdf_min(cdf: &Cdf, workers: &Workers) -> Option<u64> {
    workers.install(|| cdf.values().par_iter().copied().filter(|&v| v > 0).min())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cdf_is_running_sum() {
        let mut counts = [0u64; LEVELS];
        counts[0] = 3;
        counts[255] = 1;
        let cdf = calculate_cdf(&Histogram::from_counts(counts));

        assert_eq!(cdf.get(0), 3);
        assert!((1..255).all(|i| cdf.get(i) == 3));
        assert_eq!(cdf.get(255), 4);
        assert_eq!(cdf.total(), 4);
    }

    #[test]
    fn test_cdf_non_decreasing() {
        let mut hist = Histogram::new();
        hist.record_all(&[9, 9, 200, 17, 0, 255, 128, 128]);
        let cdf = calculate_cdf(&hist);

        assert!(cdf.values().windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(cdf.total(), hist.total());
    }

    #[test]
    fn test_cdf_min() {
        let workers = Workers::new(3).unwrap();
        let mut hist = Histogram::new();
        hist.record_all(&[50, 50, 60]);
        let cdf = calculate_cdf(&hist);

        assert_eq!(calculate_cdf_min(&cdf, &workers), Some(2));
    }

    #[test]
    fn test_cdf_min_all_zero() {
        let workers = Workers::new(2).unwrap();
        let cdf = calculate_cdf(&Histogram::new());
        assert_eq!(calculate_cdf_min(&cdf, &workers), None);
    }
}
