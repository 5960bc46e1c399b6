//! Noise weighting: per-record combination weights correcting for
//! time-varying and detector-varying noise floors.
//!
//! Two stages live here, mirroring how downstream combination consumes them:
//!
//! * [`compute_noise_weights`] (single instrument) multiplies an existing
//!   weight buffer by `1 / sumMed`, where `sumMed` is a percentile-trimmed
//!   sum of running medians of each record's periodogram. Multiplying rather
//!   than overwriting makes the stage composable; initialize weights to 1
//!   when this is the first stage (see [`NoiseWeights::ones`]).
//! * [`compute_multi_noise_weights`] (multi instrument) builds a fresh
//!   [`MultiNoiseWeights`] from raw PSD estimates, rescaled to order unity by
//!   the average noise level `calS`, together with the `Sinv_Tsft`
//!   normalization scalar used by the combination statistic.
//!
//! Kernel forms with caller-provided output buffers are in
//! [`NoiseWeightKernel`] and [`MultiNoiseWeightKernel`].

mod kernels;

pub use kernels::{MultiNoiseWeightKernel, NoiseWeightConfig, NoiseWeightKernel};

use crate::kernel::{ExecInvariantViolation, KernelLifecycle, Write1D};
use crate::series::{MultiPsdVector, RecordVector, SpectralRecord};
use alloc::vec::Vec;

/// Per-record scalar weights for one instrument.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoiseWeights {
    /// One weight per record, in record order.
    pub weights: Vec<f64>,
    /// The `Sinv * Tsft` normalization scalar. Only the multi-instrument
    /// computation fills this in; it stays 0 for single-instrument use.
    pub sinv_tsft: f64,
}

impl NoiseWeights {
    /// Weights pre-initialized to 1, ready for the first multiplicative
    /// weighting stage.
    pub fn ones(len: usize) -> Self {
        Self {
            weights: alloc::vec![1.0; len],
            sinv_tsft: 0.0,
        }
    }

    /// Number of weights.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether there are no weights.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}

/// Per-instrument, per-record weights plus one shared normalization scalar.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiNoiseWeights {
    /// One weight sequence per instrument, in instrument order.
    pub weights: Vec<Vec<f64>>,
    /// `Tsft² / calS`: the factor by which the inverse noise levels were
    /// normalized to give order-unity weights.
    pub sinv_tsft: f64,
}

impl MultiNoiseWeights {
    /// Number of instruments.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether there are no instruments.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Total weight count across instruments.
    pub fn total_weights(&self) -> usize {
        self.weights.iter().map(Vec::len).sum()
    }
}

/// Squared-magnitude spectrum of one record, as a real sequence of the
/// record's bin count. Header-only records yield an empty sequence.
pub fn periodogram(record: &SpectralRecord) -> Vec<f64> {
    record
        .data
        .as_deref()
        .unwrap_or_default()
        .iter()
        .map(|z| z.norm_sqr() as f64)
        .collect()
}

/// Capability: multiply a per-record weight buffer by noise-weight factors
/// derived from a record collection.
pub trait WeightRecords1D {
    /// Multiply `weights` in place, one factor per record in `records`.
    ///
    /// On error the buffer keeps its prior contents.
    fn run_into<O>(
        &self,
        records: &RecordVector,
        weights: &mut O,
    ) -> Result<(), ExecInvariantViolation>
    where
        O: Write1D<f64> + ?Sized;
}

/// Capability: build multi-instrument noise weights from PSD estimates.
pub trait WeightMultiPsd {
    /// Compute and allocate the full weight structure.
    fn run_alloc(&self, psds: &MultiPsdVector) -> Result<MultiNoiseWeights, ExecInvariantViolation>;
}

/// Multiply an existing weight buffer by single-instrument noise-weight
/// factors (one per record), using a running median of each record's
/// periodogram with the extreme `exclude_percentile` of window medians
/// trimmed before summing.
///
/// Callers starting from scratch pass a buffer of ones. The buffer is only
/// written once every record has validated, so a failed call leaves it
/// untouched.
pub fn compute_noise_weights<O>(
    records: &RecordVector,
    weights: &mut O,
    block_size: usize,
    exclude_percentile: u32,
) -> Result<(), ExecInvariantViolation>
where
    O: Write1D<f64> + ?Sized,
{
    let kernel = NoiseWeightKernel::try_new(NoiseWeightConfig {
        block_size,
        exclude_percentile,
    })?;
    kernel.run_into(records, weights)
}

/// Compute multi-instrument noise weights from per-instrument PSD estimates.
///
/// Every segment's noise level `Sn` is the trimmed average of its raw PSD
/// samples; weights are `calS / Sn` with `calS` the grand average of all
/// `Sn`, so they come out order unity, and `sinv_tsft = Tsft² / calS` with
/// `Tsft` taken from segment (0,0).
pub fn compute_multi_noise_weights(
    psds: &MultiPsdVector,
    block_size: usize,
    exclude_percentile: u32,
) -> Result<MultiNoiseWeights, ExecInvariantViolation> {
    let kernel = MultiNoiseWeightKernel::try_new(NoiseWeightConfig {
        block_size,
        exclude_percentile,
    })?;
    kernel.run_alloc(psds)
}

#[cfg(test)]
mod tests {
    use super::{periodogram, NoiseWeights};
    use crate::series::SpectralRecord;
    use approx::assert_relative_eq;
    use num_complex::Complex32;

    #[test]
    fn ones_matches_the_multiplicative_contract() {
        let w = NoiseWeights::ones(4);
        assert_eq!(w.len(), 4);
        assert!(w.weights.iter().all(|&wi| wi == 1.0));
        assert_eq!(w.sinv_tsft, 0.0);
    }

    #[test]
    fn periodogram_is_the_squared_magnitude() {
        let mut record = SpectralRecord::zeroed(0);
        record.data = Some(vec![Complex32::new(3.0, 4.0), Complex32::new(0.0, -2.0)]);
        let pdg = periodogram(&record);
        assert_eq!(pdg.len(), 2);
        assert_relative_eq!(pdg[0], 25.0);
        assert_relative_eq!(pdg[1], 4.0);
    }

    #[test]
    fn periodogram_of_header_only_record_is_empty() {
        let record = SpectralRecord::zeroed(0);
        assert!(periodogram(&record).is_empty());
    }
}
