use super::EqualizationMap;
use crate::errors::{EqualizeError, Result};
use crate::parallel::Workers;

/// `output[i] = map[input[i]]` for every sample.
pub fn apply_equalization(
    input: &[u8],
    output: &mut [u8],
    map: &EqualizationMap,
    workers: &Workers,
) -> Result<()> {
    if input.len() != output.len() {
        return Err(EqualizeError::InvalidBuffer {
            message: format!(
                "output holds {} samples, input has {}",
                output.len(),
                input.len()
            ),
        });
    }

    let _span = tracing::debug_span!(
        "apply_equalization",
        samples = input.len(),
        workers = workers.count()
    )
    .entered();

    let table = map.table();
    workers.for_each_partition_mut(input, output, |src, dst| {
        for (out, &sample) in dst.iter_mut().zip(src) {
            *out = table[sample as usize];
        }
    });
    Ok(())
}
