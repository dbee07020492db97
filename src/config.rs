//! Parameters for obtaining counts from a circuit

use serde::{Deserialize, Serialize};

/// Options passed through [`crate::Circuit::get_counts`] to a backend.
///
/// Missing fields take their default when deserialized.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CountsParams {
    /// Number of shots to sample
    pub n_shots: usize,
    /// Seed for reproducible sampling, fresh entropy when absent
    pub seed: Option<u64>,
    /// Whether counts are divided by their total
    pub normalize: bool,
}

impl Default for CountsParams {
    fn default() -> Self {
        CountsParams {
            n_shots: 1 << 10,
            seed: None,
            normalize: true,
        }
    }
}

impl CountsParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_shots(mut self, n_shots: usize) -> Self {
        self.n_shots = n_shots;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_normalize(mut self, normalize: bool) -> Self {
        self.normalize = normalize;
        self
    }
}
