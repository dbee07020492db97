//! Shot-based sampling from the exact output distribution
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use super::{Backend, Counts};
use crate::config::CountsParams;
use crate::error::{CqError, Result};
use crate::quantum::circuit::Circuit;

/// Samples `n_shots` bitstrings from the analytic probabilities of a circuit.
///
/// Probabilities that do not sum to one, as left by post-selection,
/// are renormalized before sampling.
#[derive(Clone, Debug, Default)]
pub struct SamplingBackend;

impl SamplingBackend {
    pub fn new() -> Self {
        SamplingBackend
    }
}

impl Backend for SamplingBackend {
    fn name(&self) -> &str {
        "sampler"
    }

    fn get_counts(&self, circuit: &Circuit, params: &CountsParams) -> Result<Counts> {
        let distribution = circuit.get_counts(None, params)?;
        let (outcomes, weights): (Vec<_>, Vec<_>) = distribution.into_iter().unzip();
        let index = WeightedIndex::new(&weights)
            .map_err(|e| CqError::Backend(format!("cannot sample from {}: {}", circuit, e)))?;

        let mut rng = match params.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut counts = Counts::new();
        for _ in 0..params.n_shots {
            let outcome = &outcomes[index.sample(&mut rng)];
            *counts.entry(outcome.clone()).or_insert(0.0) += 1.0;
        }
        debug!(shots = params.n_shots, outcomes = counts.len(), "sampled circuit");
        Ok(counts)
    }
}
