//! Collections of short-duration frequency-domain records ("SFTs") and the
//! noise weighting that makes them combinable across detectors.
//!
//! A long time series is segmented and Fourier transformed elsewhere; what
//! arrives here is an ordered collection of complex spectra, one per segment,
//! possibly one collection per instrument. Before those spectra can be summed
//! into a joint detection statistic, each segment needs a scalar weight that
//! corrects for its instrument's noise floor at that time. This crate owns
//! both halves of that problem:
//!
//! * [`series`] is the data model: [`series::FrequencySeries`] records,
//!   per-instrument [`series::SeriesVector`] collections and
//!   multi-instrument [`series::MultiSeriesVector`] collections, plus epoch
//!   and timestamp handling.
//! * [`weights`] is the noise-weighting engine, single-instrument and
//!   multi-instrument, built on the robust estimators in [`stats`].
//!
//! Kernels follow the trait-first shape in [`kernel`]: a config struct
//! validated at construction, run entrypoints that either fully succeed or
//! leave caller-visible state untouched, and 1D buffer adapters so callers
//! can hand in slices, `Vec`s, or `ndarray` views interchangeably.
//!
//! The transform engine, the on-disk SFT encoding, and detector geometry are
//! deliberately out of scope; this crate is the in-memory target those layers
//! read into and the weight producer the search stage consumes.

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod kernel;
pub mod series;
pub mod stats;
pub mod weights;
