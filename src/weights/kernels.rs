use super::{periodogram, MultiNoiseWeights, WeightMultiPsd, WeightRecords1D};
use crate::kernel::{ConfigError, ExecInvariantViolation, KernelLifecycle, Write1D};
use crate::series::{MultiPsdVector, PsdRecord, RecordVector};
use crate::stats::{mean, running_median};
use alloc::vec::Vec;
use log::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Constructor config shared by [`NoiseWeightKernel`] and
/// [`MultiNoiseWeightKernel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseWeightConfig {
    /// Running-median window, in bins. Must be at least 1 and no longer than
    /// the records it is run against.
    pub block_size: usize,
    /// Percentile of extreme window medians (respectively PSD samples) to
    /// trim from each end before averaging, in `[0, 100]`.
    pub exclude_percentile: u32,
}

fn validate(config: NoiseWeightConfig) -> Result<(), ConfigError> {
    if config.block_size == 0 {
        return Err(ConfigError::InvalidArgument {
            arg: "block_size",
            reason: "running-median window must be at least 1 bin",
        });
    }
    if config.exclude_percentile > 100 {
        return Err(ConfigError::InvalidArgument {
            arg: "exclude_percentile",
            reason: "percentile must be in [0, 100]",
        });
    }
    Ok(())
}

/// Exclusion index for a median sequence of length `length_psd`: the number
/// of entries trimmed from each end, `floor(p * (length_psd/2) / 100)` in
/// integer arithmetic.
fn exclude_index(exclude_percentile: u32, length_psd: usize) -> usize {
    exclude_percentile as usize * (length_psd / 2) / 100
}

/// Single-instrument noise-weight kernel (see
/// [`compute_noise_weights`](super::compute_noise_weights)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoiseWeightKernel {
    block_size: usize,
    exclude_percentile: u32,
}

impl KernelLifecycle for NoiseWeightKernel {
    type Config = NoiseWeightConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        validate(config)?;
        Ok(Self {
            block_size: config.block_size,
            exclude_percentile: config.exclude_percentile,
        })
    }
}

impl WeightRecords1D for NoiseWeightKernel {
    fn run_into<O>(
        &self,
        records: &RecordVector,
        weights: &mut O,
    ) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<f64> + ?Sized,
    {
        let weights = weights
            .write_slice_mut()
            .map_err(ExecInvariantViolation::from)?;
        if weights.len() != records.len() {
            return Err(ExecInvariantViolation::LengthMismatch {
                arg: "weights",
                expected: records.len(),
                got: weights.len(),
            });
        }
        if records.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "records" }.into());
        }

        let length_sft = records.bin_count();
        if length_sft == 0 {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "records are header-only",
            });
        }
        if self.block_size > length_sft {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "running-median window exceeds the record length",
            });
        }
        let length_psd = length_sft - self.block_size + 1;
        let exclude = exclude_index(self.exclude_percentile, length_psd);

        // Stage every factor before touching the caller's buffer, so a
        // mid-collection failure leaves prior weights intact.
        let mut factors = Vec::with_capacity(records.len());
        for record in &records.records {
            let pdg = periodogram(record);
            if pdg.len() != length_sft {
                return Err(ExecInvariantViolation::LengthMismatch {
                    arg: "records",
                    expected: length_sft,
                    got: pdg.len(),
                });
            }

            let mut medians = running_median(&pdg, self.block_size);
            medians.sort_unstable_by(f64::total_cmp);
            let sum_med: f64 = medians[exclude..length_psd - exclude].iter().sum();
            factors.push(1.0 / sum_med);
        }

        for (w, factor) in weights.iter_mut().zip(factors) {
            *w *= factor;
        }
        Ok(())
    }
}

/// Noise level of one PSD segment: the average of its raw samples with
/// `half_block` running-median edge bins and the extreme `exclude` samples
/// dropped from each end.
fn segment_noise_level(
    psd: &PsdRecord,
    block_size: usize,
    exclude_percentile: u32,
) -> Result<f64, ExecInvariantViolation> {
    let data = psd
        .data
        .as_deref()
        .ok_or(ExecInvariantViolation::InvalidState {
            reason: "PSD segment is header-only",
        })?;

    let length_sft = data.len();
    if length_sft < block_size {
        return Err(ExecInvariantViolation::InvalidState {
            reason: "running-median window exceeds the segment length",
        });
    }
    let length_psd = length_sft - block_size + 1;
    let exclude = exclude_index(exclude_percentile, length_psd);
    let half_block = block_size / 2;

    let lo = half_block + exclude;
    let hi = (length_sft - half_block).saturating_sub(exclude);
    if lo >= hi {
        return Err(ExecInvariantViolation::InvalidState {
            reason: "percentile trim excludes every PSD sample",
        });
    }

    Ok(mean(&data[lo..hi]).0)
}

/// Multi-instrument noise-weight kernel (see
/// [`compute_multi_noise_weights`](super::compute_multi_noise_weights)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MultiNoiseWeightKernel {
    block_size: usize,
    exclude_percentile: u32,
}

impl KernelLifecycle for MultiNoiseWeightKernel {
    type Config = NoiseWeightConfig;

    fn try_new(config: Self::Config) -> Result<Self, ConfigError> {
        validate(config)?;
        Ok(Self {
            block_size: config.block_size,
            exclude_percentile: config.exclude_percentile,
        })
    }
}

impl MultiNoiseWeightKernel {
    /// Per-segment noise levels in instrument-major order. With the
    /// `parallel` feature this fans out across instruments and segments;
    /// each segment reads only its own PSD entry.
    fn noise_levels(
        &self,
        psds: &MultiPsdVector,
    ) -> Result<Vec<Vec<f64>>, ExecInvariantViolation> {
        #[cfg(feature = "parallel")]
        {
            psds.vectors
                .par_iter()
                .map(|vect| {
                    vect.records
                        .par_iter()
                        .map(|psd| segment_noise_level(psd, self.block_size, self.exclude_percentile))
                        .collect()
                })
                .collect()
        }

        #[cfg(not(feature = "parallel"))]
        {
            psds.vectors
                .iter()
                .map(|vect| {
                    vect.records
                        .iter()
                        .map(|psd| segment_noise_level(psd, self.block_size, self.exclude_percentile))
                        .collect()
                })
                .collect()
        }
    }
}

impl WeightMultiPsd for MultiNoiseWeightKernel {
    fn run_alloc(&self, psds: &MultiPsdVector) -> Result<MultiNoiseWeights, ExecInvariantViolation> {
        if psds.is_empty() {
            return Err(ConfigError::EmptyInput { arg: "psds" }.into());
        }
        let total_segments = psds.total_records();
        if total_segments == 0 {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "multi PSD collection has no segments",
            });
        }

        // Tsft comes from segment (0,0) by convention.
        let first = psds.vectors[0]
            .records
            .first()
            .ok_or(ExecInvariantViolation::InvalidState {
                reason: "first instrument has no segments",
            })?;
        if !(first.delta_f > 0.0) {
            return Err(ExecInvariantViolation::InvalidState {
                reason: "frequency spacing of segment (0,0) must be > 0",
            });
        }
        let tsft = 1.0 / first.delta_f;

        let noise_levels = self.noise_levels(psds)?;

        // Sequential grand sum in instrument-major segment order, identical
        // with and without the parallel feature.
        let mut sum_sn = 0.0;
        let mut weights: Vec<Vec<f64>> = Vec::with_capacity(noise_levels.len());
        for per_instrument in &noise_levels {
            let mut w = Vec::with_capacity(per_instrument.len());
            for &sn in per_instrument {
                sum_sn += sn;
                w.push(1.0 / sn);
            }
            weights.push(w);
        }

        let cal_s = sum_sn / total_segments as f64;
        for per_instrument in &mut weights {
            for w in per_instrument {
                *w *= cal_s;
            }
        }

        debug!(
            "noise normalization: calS = {cal_s:.6e} over {total_segments} segments from {} instruments",
            psds.len()
        );

        Ok(MultiNoiseWeights {
            weights,
            sinv_tsft: tsft * tsft / cal_s,
        })
    }
}
