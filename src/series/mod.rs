//! The SFT data model: frequency-domain records, per-instrument collections,
//! and multi-instrument collections.
//!
//! Everything is built from one generic record, [`FrequencySeries`], holding
//! provenance (name, epoch, frequency origin and spacing, unit tag) plus an
//! optional owned data buffer; `None` data is a header-only record. Complex
//! bins give spectral records, real bins give PSD estimates:
//!
//! * [`SpectralRecord`] / [`RecordVector`] / [`MultiRecordVector`]
//! * [`PsdRecord`] / [`PsdVector`] / [`MultiPsdVector`]
//!
//! Outer collections exclusively own their inner ones. Construction either
//! yields a fully built aggregate or nothing; destruction is `Drop`. The one
//! partially-built hazard of the original C layout, a vector whose tail was
//! never allocated, cannot be expressed here.

mod epoch;

pub use epoch::{make_timestamps, Epoch, TimestampVector};

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use num_complex::Complex32;
use num_traits::Zero;

/// Errors from record and collection lifecycle operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    /// The destination record already owns a data buffer.
    AlreadyPopulated,
    /// Two collections disagree on their per-record bin count.
    BinCountMismatch {
        /// Bin count of the left-hand collection.
        left: usize,
        /// Bin count of the right-hand collection.
        right: usize,
    },
}

impl fmt::Display for SeriesError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeriesError::AlreadyPopulated => {
                write!(f, "Destination record already owns data.")
            }
            SeriesError::BinCountMismatch { left, right } => {
                write!(
                    f,
                    "Collections have incompatible bin counts: {left} vs {right}."
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for SeriesError {}

/// One frequency-domain record: provenance plus an optional owned sequence
/// of bin values.
///
/// Invariant: when `data` is present, its length is the record's bin count;
/// `None` represents a header-only record (a record read without its data,
/// or a slot awaiting a copy).
#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySeries<T> {
    /// Channel or record name.
    pub name: String,
    /// Start time of the underlying time-domain segment.
    pub epoch: Epoch,
    /// Frequency of the first bin, in Hz.
    pub f0: f64,
    /// Frequency spacing between bins, in Hz.
    pub delta_f: f64,
    /// Unit tag, carried verbatim; unit algebra lives elsewhere.
    pub unit: String,
    /// Owned bin values, or `None` for a header-only record.
    pub data: Option<Vec<T>>,
}

// A default record is header-only, so no bound on `T` is needed.
impl<T> Default for FrequencySeries<T> {
    fn default() -> Self {
        Self {
            name: String::new(),
            epoch: Epoch::default(),
            f0: 0.0,
            delta_f: 0.0,
            unit: String::new(),
            data: None,
        }
    }
}

impl<T> FrequencySeries<T> {
    /// Number of bins, 0 for a header-only record.
    pub fn bin_count(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}

impl<T: Zero + Clone> FrequencySeries<T> {
    /// A default-header record with `num_bins` zeroed bins, or header-only
    /// when `num_bins == 0`.
    pub fn zeroed(num_bins: usize) -> Self {
        Self {
            data: (num_bins > 0).then(|| alloc::vec![T::zero(); num_bins]),
            ..Self::default()
        }
    }
}

impl<T: Clone> FrequencySeries<T> {
    /// Copy `src` into this record: header fields verbatim, data deep-copied
    /// when the source has any, header-only otherwise.
    ///
    /// The destination must not already own data; a populated destination
    /// fails with [`SeriesError::AlreadyPopulated`] and is left unchanged.
    pub fn copy_from(&mut self, src: &Self) -> Result<(), SeriesError> {
        if self.data.is_some() {
            return Err(SeriesError::AlreadyPopulated);
        }
        self.name = src.name.clone();
        self.epoch = src.epoch;
        self.f0 = src.f0;
        self.delta_f = src.delta_f;
        self.unit = src.unit.clone();
        self.data = src.data.clone();
        Ok(())
    }
}

/// Ordered, per-instrument collection of records.
///
/// Every populated record is expected to share one bin count; the first
/// record's data length stands for the whole vector (header-only and empty
/// vectors count as 0 bins). The expectation is enforced where it matters,
/// at [`concat`](Self::concat) and inside the weighting kernels, not at
/// construction, which allocates every record identically anyway.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesVector<T> {
    /// The records, in caller-supplied segment order.
    pub records: Vec<FrequencySeries<T>>,
}

impl<T> Default for SeriesVector<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<T> SeriesVector<T> {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Representative per-record bin count: the first record's data length,
    /// 0 for header-only or empty vectors.
    pub fn bin_count(&self) -> usize {
        self.records.first().map_or(0, FrequencySeries::bin_count)
    }

    /// Append one record, preserving all existing elements.
    pub fn push(&mut self, record: FrequencySeries<T>) {
        self.records.push(record);
    }

    /// Epochs of all records, in order, one per record.
    ///
    /// An empty vector yields an empty timestamp vector; the original
    /// asserted non-emptiness here, but no call site depends on that.
    pub fn timestamps(&self) -> TimestampVector {
        self.records.iter().map(|r| r.epoch).collect()
    }
}

impl<T: Zero + Clone> SeriesVector<T> {
    /// A collection of `num_records` identically allocated records, each
    /// with `num_bins` zeroed bins (header-only when `num_bins == 0`).
    /// `num_records == 0` yields a valid empty collection.
    pub fn new(num_records: usize, num_bins: usize) -> Self {
        Self {
            records: alloc::vec![FrequencySeries::zeroed(num_bins); num_records],
        }
    }
}

impl<T: Clone> SeriesVector<T> {
    /// Concatenate two collections into a new one: deep copies of `self`'s
    /// records in order, then `other`'s.
    ///
    /// Both sides must agree on the representative bin count; header-only
    /// collections count as 0 bins and concatenate with each other.
    pub fn concat(&self, other: &Self) -> Result<Self, SeriesError> {
        let left = self.bin_count();
        let right = other.bin_count();
        if left != right {
            return Err(SeriesError::BinCountMismatch { left, right });
        }

        let mut records = Vec::with_capacity(self.len() + other.len());
        records.extend(self.records.iter().cloned());
        records.extend(other.records.iter().cloned());
        Ok(Self { records })
    }
}

impl<T> core::ops::Index<usize> for SeriesVector<T> {
    type Output = FrequencySeries<T>;

    fn index(&self, index: usize) -> &Self::Output {
        &self.records[index]
    }
}

impl<T> core::ops::IndexMut<usize> for SeriesVector<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.records[index]
    }
}

/// Ordered-by-instrument collection of [`SeriesVector`]s.
///
/// Inner vectors may differ in length and bin count across instruments; the
/// outer collection exclusively owns each inner one.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiSeriesVector<T> {
    /// One collection per instrument, in instrument order.
    pub vectors: Vec<SeriesVector<T>>,
}

impl<T> Default for MultiSeriesVector<T> {
    fn default() -> Self {
        Self {
            vectors: Vec::new(),
        }
    }
}

impl<T> MultiSeriesVector<T> {
    /// Number of instruments.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether there are no instruments.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Total record count across all instruments.
    pub fn total_records(&self) -> usize {
        self.vectors.iter().map(SeriesVector::len).sum()
    }
}

impl<T: Zero + Clone> MultiSeriesVector<T> {
    /// One inner collection per entry of `counts`, each with that many
    /// records of `num_bins` zeroed bins, instrument order preserved.
    ///
    /// Each instrument's collection is fully built before the next one is
    /// started, so a failure can never leave a half-made aggregate behind.
    pub fn from_counts(num_bins: usize, counts: &[usize]) -> Self {
        Self {
            vectors: counts
                .iter()
                .map(|&n| SeriesVector::new(n, num_bins))
                .collect(),
        }
    }
}

/// One complex spectrum derived from a fixed-duration time-domain segment.
pub type SpectralRecord = FrequencySeries<Complex32>;
/// Per-instrument collection of spectral records.
pub type RecordVector = SeriesVector<Complex32>;
/// Multi-instrument collection of spectral records.
pub type MultiRecordVector = MultiSeriesVector<Complex32>;

/// One per-segment power-spectral-density estimate.
pub type PsdRecord = FrequencySeries<f64>;
/// Per-instrument collection of PSD estimates.
pub type PsdVector = SeriesVector<f64>;
/// Multi-instrument collection of PSD estimates.
pub type MultiPsdVector = MultiSeriesVector<f64>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    fn sample_record(epoch_s: i64, bins: &[f32]) -> SpectralRecord {
        SpectralRecord {
            name: "H1:test".to_string(),
            epoch: Epoch::new(epoch_s, 0),
            f0: 100.0,
            delta_f: 1.0 / 1800.0,
            unit: "strain".to_string(),
            data: Some(bins.iter().map(|&re| Complex32::new(re, -re)).collect()),
        }
    }

    #[test]
    fn new_allocates_every_record_identically() {
        let vect = RecordVector::new(5, 16);
        assert_eq!(vect.len(), 5);
        assert_eq!(vect.bin_count(), 16);
        for record in &vect.records {
            assert_eq!(record.bin_count(), 16);
            assert!(record.data.as_ref().unwrap().iter().all(|z| z.is_zero()));
        }
    }

    #[test]
    fn new_with_zero_bins_is_header_only() {
        let vect = RecordVector::new(3, 0);
        assert_eq!(vect.len(), 3);
        assert_eq!(vect.bin_count(), 0);
        assert!(vect.records.iter().all(|r| r.data.is_none()));
    }

    #[test]
    fn new_with_zero_records_is_a_valid_empty_vector() {
        let vect = RecordVector::new(0, 16);
        assert!(vect.is_empty());
        assert_eq!(vect.bin_count(), 0);
        assert!(vect.timestamps().is_empty());
    }

    #[test]
    fn copy_from_requires_empty_destination() {
        let src = sample_record(800_000_000, &[1.0, 2.0]);
        let mut dest = SpectralRecord::default();
        dest.copy_from(&src).expect("copy into empty record");
        assert_eq!(dest, src);

        let err = dest.copy_from(&src).expect_err("second copy must fail");
        assert_eq!(err, SeriesError::AlreadyPopulated);
    }

    #[test]
    fn copy_from_header_only_source_stays_header_only() {
        let mut src = sample_record(800_000_000, &[1.0]);
        src.data = None;
        let mut dest = SpectralRecord::default();
        dest.copy_from(&src).expect("header-only copy");
        assert_eq!(dest.name, src.name);
        assert!(dest.data.is_none());
    }

    #[test]
    fn concat_preserves_order_and_contents() {
        let mut a = RecordVector::default();
        a.push(sample_record(1000, &[1.0, 2.0]));
        a.push(sample_record(2800, &[3.0, 4.0]));
        let mut b = RecordVector::default();
        b.push(sample_record(4600, &[5.0, 6.0]));

        let joined = a.concat(&b).expect("equal bin counts");
        assert_eq!(joined.len(), 3);
        assert_eq!(joined[0], a[0]);
        assert_eq!(joined[1], a[1]);
        assert_eq!(joined[2], b[0]);
    }

    #[test]
    fn concat_rejects_mismatched_bin_counts() {
        let a = RecordVector::new(2, 8);
        let b = RecordVector::new(1, 4);
        let err = a.concat(&b).expect_err("bin counts differ");
        assert_eq!(err, SeriesError::BinCountMismatch { left: 8, right: 4 });
    }

    #[test]
    fn concat_of_header_only_vectors_is_allowed() {
        let a = RecordVector::new(2, 0);
        let b = RecordVector::new(3, 0);
        let joined = a.concat(&b).expect("both header-only");
        assert_eq!(joined.len(), 5);
        assert_eq!(joined.bin_count(), 0);
    }

    #[test]
    fn push_one_at_a_time_matches_bulk_construction() {
        let template = [
            sample_record(1000, &[1.0, 2.0, 3.0]),
            sample_record(2800, &[4.0, 5.0, 6.0]),
            sample_record(4600, &[7.0, 8.0, 9.0]),
        ];

        let mut grown = RecordVector::default();
        for record in &template {
            grown.push(record.clone());
        }

        let mut bulk = RecordVector::new(template.len(), 0);
        for (slot, record) in bulk.records.iter_mut().zip(template.iter()) {
            slot.copy_from(record).expect("slot starts header-only");
        }

        assert_eq!(grown, bulk);
    }

    #[test]
    fn timestamps_match_record_epochs() {
        let mut vect = RecordVector::default();
        for s in [1000i64, 2800, 4600, 6400] {
            vect.push(sample_record(s, &[1.0]));
        }
        let ts = vect.timestamps();
        assert_eq!(ts.len(), vect.len());
        for (t, r) in ts.iter().zip(vect.records.iter()) {
            assert_eq!(*t, r.epoch);
        }
    }

    #[test]
    fn from_counts_preserves_instrument_order_and_sizes() {
        let multi = MultiRecordVector::from_counts(8, &[3, 0, 5]);
        assert_eq!(multi.len(), 3);
        assert_eq!(multi.vectors[0].len(), 3);
        assert_eq!(multi.vectors[1].len(), 0);
        assert_eq!(multi.vectors[2].len(), 5);
        assert_eq!(multi.total_records(), 8);
        assert_eq!(multi.vectors[0].bin_count(), 8);
    }

    #[test]
    fn psd_aliases_share_the_series_machinery() {
        let mut psd = PsdRecord::zeroed(4);
        psd.delta_f = 1.0 / 1800.0;
        let mut vect = PsdVector::default();
        vect.push(psd);
        assert_eq!(vect.bin_count(), 4);
    }
}
