//! Evaluating circuits
//!
//! Pure circuits evaluate to tensors through [`TensorFunctor`], mixed ones
//! to classical-quantum maps through [`CQMapFunctor`]. A [`Backend`] can
//! stand in for either by sampling, in which case the output is the
//! empirical tensor of its counts.

use ndarray::{ArrayD, IxDyn};
use num_complex::Complex64;
use rayon::prelude::*;
use tracing::debug;

use super::circuit::{Circuit, Obj, Ty};
use super::cq::{C, Q};
use super::cq_map::CQMap;
use super::functors::{CQMapFunctor, TensorFunctor};
use super::gate;
use super::tensor::{indicator, one_hot, ravel, Dim, Tensor};
use crate::category::DiagramFunctor;
use crate::config::CountsParams;
use crate::error::{CqError, Result};
use crate::simulators::{Backend, Counts};

/// Big-endian binary expansion of `i` on `length` bits
pub fn index2bitstring(i: usize, length: usize) -> Vec<u8> {
    (0..length).rev().map(|k| ((i >> k) & 1) as u8).collect()
}

/// Inverse of [`index2bitstring`]
pub fn bitstring2index(bitstring: &[u8]) -> usize {
    bitstring.iter().fold(0, |acc, &b| (acc << 1) | b as usize)
}

/// The result of evaluating a circuit
#[derive(Clone, Debug, PartialEq)]
pub enum Evaluation {
    Tensor(Tensor),
    CQMap(CQMap),
}

impl Evaluation {
    pub fn array(&self) -> &ArrayD<Complex64> {
        match self {
            Evaluation::Tensor(tensor) => tensor.array(),
            Evaluation::CQMap(map) => map.array(),
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, Evaluation::CQMap(_))
    }

    pub fn into_tensor(self) -> Option<Tensor> {
        match self {
            Evaluation::Tensor(tensor) => Some(tensor),
            Evaluation::CQMap(_) => None,
        }
    }

    pub fn into_cq_map(self) -> Option<CQMap> {
        match self {
            Evaluation::CQMap(map) => Some(map),
            Evaluation::Tensor(_) => None,
        }
    }
}

fn qubit_dims(n: usize) -> Dim {
    Dim::new(vec![2; n])
}

impl Circuit {
    /// Exact evaluation, as a CQ map when the circuit is mixed
    pub fn eval(&self) -> Result<Evaluation> {
        self.evaluate(None, false, &CountsParams::default())
    }

    /// Evaluation with an optional backend, forcing a CQ map when `mixed`
    pub fn evaluate(
        &self,
        backend: Option<&dyn Backend>,
        mixed: bool,
        params: &CountsParams,
    ) -> Result<Evaluation> {
        match backend {
            Some(backend) => self.eval_on(backend, params).map(Evaluation::Tensor),
            None if mixed || self.is_mixed() => {
                debug!(circuit = %self, "mixed evaluation");
                self.eval_mixed().map(Evaluation::CQMap)
            }
            None => {
                debug!(circuit = %self, "pure evaluation");
                self.eval_tensor().map(Evaluation::Tensor)
            }
        }
    }

    pub fn eval_mixed(&self) -> Result<CQMap> {
        CQMapFunctor::default().map_circuit(self)
    }

    pub fn eval_tensor(&self) -> Result<Tensor> {
        TensorFunctor::default().map_circuit(self)
    }

    /// Empirical state from a backend's counts.
    ///
    /// Each bitstring contributes its count times the matching basis ket.
    /// Counts go through [`Circuit::get_counts`], so they are frequencies
    /// unless `params.normalize` is unset.
    pub fn eval_on(&self, backend: &dyn Backend, params: &CountsParams) -> Result<Tensor> {
        debug!(backend = backend.name(), shots = params.n_shots, "delegating to backend");
        let counts = self.get_counts(Some(backend), params)?;
        let n_bits = match counts.keys().next() {
            Some(bitstring) => bitstring.len(),
            None => return Err(CqError::Backend(format!("{} returned no counts", backend.name()))),
        };
        let shape = vec![2; n_bits];
        let mut array = ArrayD::<Complex64>::zeros(IxDyn(&shape));
        for (bitstring, &count) in &counts {
            if bitstring.len() != n_bits {
                return Err(CqError::Backend(format!(
                    "{} returned bitstrings of lengths {} and {}",
                    backend.name(),
                    n_bits,
                    bitstring.len()
                )));
            }
            let idx: Vec<usize> = bitstring.iter().map(|&b| b as usize).collect();
            array.scaled_add(Complex64::new(count, 0.0), &one_hot(&shape, &idx));
        }
        Tensor::new(Dim::unit(), qubit_dims(n_bits), array)
    }

    /// Counts of a closed circuit.
    ///
    /// Without a backend these are the exact probabilities of the nonzero
    /// outcomes. Quantum outputs of a mixed circuit are traced out so only
    /// its bits are reported.
    pub fn get_counts(&self, backend: Option<&dyn Backend>, params: &CountsParams) -> Result<Counts> {
        if let Some(backend) = backend {
            let mut counts = backend.get_counts(self, params)?;
            if params.normalize {
                let total: f64 = counts.values().sum();
                if total > 0.0 {
                    counts.values_mut().for_each(|count| *count /= total);
                }
            }
            return Ok(counts);
        }
        if !self.dom().is_empty() {
            return Err(CqError::DimensionMismatch(format!(
                "counts need a circuit with no inputs, got dom {}",
                self.dom()
            )));
        }
        let (n_bits, probabilities): (usize, Vec<f64>) = match self.eval()? {
            Evaluation::Tensor(tensor) => (
                self.cod().len(),
                tensor.array().iter().map(|amplitude| amplitude.norm_sqr()).collect(),
            ),
            Evaluation::CQMap(map) => {
                let cod = map.cod().clone();
                let keep = CQMap::id(&C(cod.classical.clone())).tensor(&CQMap::discard(&Q(cod.quantum)));
                let marginal = map.then(&keep)?;
                (
                    self.cod().count(Obj::Bit),
                    marginal.array().iter().map(|z| z.re).collect(),
                )
            }
        };
        Ok(probabilities
            .into_iter()
            .enumerate()
            .filter(|(_, p)| *p != 0.0)
            .map(|(i, p)| (index2bitstring(i, n_bits), p))
            .collect())
    }

    /// Probability of every output basis state given every input basis state.
    ///
    /// The array has one axis of size 2 per input wire then one per output
    /// wire. The mixed path encodes input qubits and measures output qubits
    /// before evaluating; the pure path applies the Born rule to each pair
    /// of basis ket and bra.
    pub fn measure(&self, mixed: bool) -> Result<ArrayD<f64>> {
        if mixed || self.is_mixed() {
            let encode = Circuit::tensor_all(self.dom().iter().map(|obj| match obj {
                Obj::Qubit => gate::encode(1, true),
                Obj::Bit => Circuit::id(&Ty::bit()),
            }));
            let measure = Circuit::tensor_all(self.cod().iter().map(|obj| match obj {
                Obj::Qubit => gate::measure(1, true),
                Obj::Bit => Circuit::id(&Ty::bit()),
            }));
            let map = encode.then(self)?.then(&measure)?.eval_mixed()?;
            return Ok(map.array().mapv(|z| z.re));
        }

        let process = self.eval_tensor()?;
        let n_dom = self.dom().len();
        let n_cod = self.cod().len();
        let dom_dims = vec![2; n_dom];
        let rows = (0..1usize << n_dom)
            .into_par_iter()
            .map(|i| -> Result<Vec<f64>> {
                let state = Tensor::from_fn(Dim::unit(), qubit_dims(n_dom), |idx| {
                    indicator(ravel(idx, &dom_dims) == i)
                });
                let row = state.then(&process)?;
                Ok(row.array().iter().map(|amplitude| amplitude.norm_sqr()).collect())
            })
            .collect::<Result<Vec<Vec<f64>>>>()?;

        let shape = vec![2; n_dom + n_cod];
        ArrayD::from_shape_vec(IxDyn(&shape), rows.concat()).map_err(|_| CqError::ShapeMismatch {
            dom: self.dom().to_string(),
            cod: self.cod().to_string(),
            got: shape.clone(),
        })
    }
}
