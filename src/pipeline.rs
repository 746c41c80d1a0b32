use crate::errors::{EqualizeError, Result};
use crate::histogram::{
    apply_equalization, calculate_cdf, calculate_cdf_min, calculate_equalized_map, calculate_histogram, Cdf,
    EqualizationMap, Histogram,
};
use crate::parallel::Workers;
use crate::pixels::{OwnedPixels, PixelBuffer};

/// Everything one pipeline invocation produces.
#[derive(Debug, Clone)]
pub struct EqualizationRun {
    pub histogram: Histogram,
    pub cdf: Cdf,
    pub cdf_min: Option<u64>,
    pub map: EqualizationMap,
    pub equalized: OwnedPixels,
    pub equalized_histogram: Histogram,
    pub workers: usize,
}

impl EqualizationRun {
    /// Name of the first artifact that differs from `other`, if any.
    pub fn first_difference(&self, other: &EqualizationRun) -> Option<&'static str> {
        if self.histogram != other.histogram {
            Some("histogram")
        } else if self.cdf != other.cdf {
            Some("cdf")
        } else if self.cdf_min != other.cdf_min {
            Some("cdf_min")
        } else if self.map != other.map {
            Some("equalization map")
        } else if self.equalized != other.equalized {
            Some("equalized buffer")
        } else if self.equalized_histogram != other.equalized_histogram {
            Some("equalized histogram")
        } else {
            None
        }
    }

    pub fn matches(&self, other: &EqualizationRun) -> bool {
        self.first_difference(other).is_none()
    }
}

/// Equalize `buffer` using `workers`.
///
/// Stages run back to back, each consuming the complete output of the one
/// before. The input is only read.
pub fn equalize(buffer: PixelBuffer<'_>, workers: &Workers) -> Result<EqualizationRun> {
    let _span = tracing::info_span!(
        "equalize",
        samples = buffer.sample_count(),
        workers = workers.count()
    )
    .entered();

    let samples = buffer.samples();
    let histogram = calculate_histogram(samples, workers);
    let cdf = calculate_cdf(&histogram);
    let cdf_min = calculate_cdf_min(&cdf, workers);
    let map = calculate_equalized_map(&cdf, cdf_min, samples.len() as u64, workers);
    tracing::debug!(?cdf_min, kind = ?map.kind(), "equalization map ready");

    let mut output = allocate_samples(samples.len())?;
    apply_equalization(samples, &mut output, &map, workers)?;
    let equalized = OwnedPixels::new(output, buffer.width(), buffer.height(), buffer.channels())?;
    let equalized_histogram = calculate_histogram(equalized.data(), workers);

    Ok(EqualizationRun {
        histogram,
        cdf,
        cdf_min,
        map,
        equalized,
        equalized_histogram,
        workers: workers.count(),
    })
}

/// Fail with [`EqualizeError::RunMismatch`] unless both runs are identical.
pub fn verify_identical(reference: &EqualizationRun, candidate: &EqualizationRun) -> Result<()> {
    match reference.first_difference(candidate) {
        None => Ok(()),
        Some(artifact) => Err(EqualizeError::RunMismatch {
            message: format!(
                "{} differs between {} and {} workers",
                artifact, reference.workers, candidate.workers
            ),
        }),
    }
}

fn allocate_samples(len: usize) -> Result<Vec<u8>> {
    let mut samples = Vec::new();
    samples
        .try_reserve_exact(len)
        .map_err(|_| EqualizeError::AllocationFailed {
            what: "equalized buffer",
            bytes: len,
        })?;
    samples.resize(len, 0);
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::MapKind;

    #[test]
    fn test_two_by_two_scenario() {
        let data = [0u8, 0, 0, 255];
        let buffer = PixelBuffer::new(&data, 2, 2, 1).unwrap();
        let run = equalize(buffer, &Workers::sequential().unwrap()).unwrap();

        assert_eq!(run.histogram.get(0), 3);
        assert_eq!(run.histogram.get(255), 1);
        assert_eq!(run.cdf_min, Some(3));
        assert_eq!(run.cdf.total(), 4);
        assert_eq!(run.map.get(0), 0);
        assert_eq!(run.map.get(255), 255);
        assert_eq!(run.equalized.data(), &data);
        assert_eq!(run.equalized_histogram, run.histogram);
    }

    #[test]
    fn test_uniform_image_falls_back() {
        let data = vec![128u8; 300];
        let buffer = PixelBuffer::new(&data, 10, 10, 3).unwrap();
        let run = equalize(buffer, &Workers::new(4).unwrap()).unwrap();

        assert_eq!(run.histogram.get(128), 300);
        assert_eq!(run.cdf_min, Some(300));
        assert_eq!(run.map.kind(), MapKind::Degenerate);
        assert_eq!(run.equalized.data(), data.as_slice());
    }

    #[test]
    fn test_empty_image() {
        let buffer = PixelBuffer::new(&[], 0, 5, 1).unwrap();
        let run = equalize(buffer, &Workers::new(3).unwrap()).unwrap();

        assert!(run.histogram.is_empty());
        assert_eq!(run.cdf_min, None);
        assert_eq!(run.map.kind(), MapKind::Empty);
        assert!(run.equalized.data().is_empty());
    }

    #[test]
    fn test_oversized_output_is_resource_failure() {
        let err = allocate_samples(usize::MAX).unwrap_err();
        assert_eq!(err.error_code(), "ALLOCATION_FAILED");
        assert!(err.is_resource_failure());
    }

    #[test]
    fn test_verify_identical_reports_artifact() {
        let a = [0u8, 10, 20, 30];
        let b = [0u8, 10, 20, 40];
        let workers = Workers::sequential().unwrap();
        let run_a = equalize(PixelBuffer::new(&a, 4, 1, 1).unwrap(), &workers).unwrap();
        let run_b = equalize(PixelBuffer::new(&b, 4, 1, 1).unwrap(), &workers).unwrap();

        assert!(verify_identical(&run_a, &run_a.clone()).is_ok());
        let err = verify_identical(&run_a, &run_b).unwrap_err();
        assert_eq!(err.error_code(), "RUN_MISMATCH");
        assert!(err.to_string().contains("histogram"));
    }
}
