use super::Histogram;
use crate::parallel::Workers;

/// Build the 256-bucket histogram of `samples`.
///
/// Each worker tallies its own partition into a private table; the tables are
/// summed after all workers finish. The result equals a single-pass tally for
/// any worker count.
pub fn calculate_histogram(samples: &[u8], workers: &Workers) -> Histogram {
    let _span = tracing::debug_span!(
        "calculate_histogram",
        samples = samples.len(),
        workers = workers.count()
    )
    .entered();

    workers.partition_reduce(
        samples,
        Histogram::new,
        |hist, chunk| hist.record_all(chunk),
        |total, partial| total.merge(&partial),
    )
}
