use super::{Cdf, LEVELS};
use crate::parallel::Workers;
use rayon::prelude::*;

/// How an [`EqualizationMap`] was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    /// Rescaled from the CDF.
    Equalized,
    /// Every sample has the same value, so `total - cdf_min` is zero.
    /// Identity map.
    Degenerate,
    /// No samples at all. Identity map.
    Empty,
}

/// Replacement intensity for each input level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualizationMap {
    table: [u8; LEVELS],
    kind: MapKind,
}

impl EqualizationMap {
    pub fn identity(kind: MapKind) -> Self {
        let mut table = [0u8; LEVELS];
        for (level, entry) in table.iter_mut().enumerate() {
            *entry = level as u8;
        }
        Self { table, kind }
    }

    pub fn table(&self) -> &[u8; LEVELS] {
        &self.table
    }

    pub fn get(&self, level: u8) -> u8 {
        self.table[level as usize]
    }

    pub fn kind(&self) -> MapKind {
        self.kind
    }

    pub fn is_identity(&self) -> bool {
        self.table.iter().enumerate().all(|(level, &v)| v as usize == level)
    }
}

/// Rescale the CDF into 0..=255.
///
/// `map[i] = round((cdf[i] - cdf_min) / (total - cdf_min) * 255)`, clamped at 0
/// for levels below the first occupied bucket. Constant and empty images get
/// the identity map instead of dividing by zero.
pub fn calculate_equalized_map(
    cdf: &Cdf,
    cdf_min: Option<u64>,
    total_samples: u64,
    workers: &Workers,
) -> EqualizationMap {
    let Some(cdf_min) = cdf_min else {
        tracing::debug!("no samples, using identity map");
        return EqualizationMap::identity(MapKind::Empty);
    };

    if total_samples <= cdf_min {
        tracing::debug!(cdf_min, total_samples, "constant image, using identity map");
        return EqualizationMap::identity(MapKind::Degenerate);
    }

    let range = (total_samples - cdf_min) as f64;
    let levels: Vec<u8> = workers.install(|| {
        cdf.values()
            .par_iter()
            .map(|&value| equalize_level(value, cdf_min, range))
            .collect()
    });

    let mut table = [0u8; LEVELS];
    table.copy_from_slice(&levels);
    EqualizationMap {
        table,
        kind: MapKind::Equalized,
    }
}

fn equalize_level(cdf_value: u64, cdf_min: u64, range: f64) -> u8 {
    let scaled = ((cdf_value as f64 - cdf_min as f64) / range * 255.0).round();
    scaled.clamp(0.0, 255.0) as u8
}
