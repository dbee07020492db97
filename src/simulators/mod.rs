//! Execution backends
//!
//! A backend turns a closed circuit into counts over output bitstrings.
//! [`SamplingBackend`] draws shots from the exact distribution.

use std::collections::BTreeMap;

use crate::config::CountsParams;
use crate::error::Result;
use crate::quantum::circuit::Circuit;

pub mod sampler;

pub use sampler::SamplingBackend;

/// One bit per output wire, most significant first
pub type Bitstring = Vec<u8>;

/// Counts or probabilities per observed bitstring
pub type Counts = BTreeMap<Bitstring, f64>;

/// Something that can run circuits and report counts
pub trait Backend: Send + Sync {
    fn name(&self) -> &str;

    fn get_counts(&self, circuit: &Circuit, params: &CountsParams) -> Result<Counts>;
}
