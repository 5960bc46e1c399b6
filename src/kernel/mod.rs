//! Trait-first kernel substrate shared by the weighting kernels.
//!
//! Construction-time validation, run-time invariant errors, and 1D buffer
//! adapters live here so every kernel in the crate validates and fails the
//! same way.

mod errors;
mod io;
mod lifecycle;

pub use errors::*;
pub use io::*;
pub use lifecycle::*;
