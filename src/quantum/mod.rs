//! Classical-quantum maps and the circuits they evaluate
//!
//! [`Tensor`]s are linear maps between dimensions, [`CQMap`]s are
//! completely positive maps between classical-quantum systems stored as
//! doubled tensors. [`Circuit`]s are layered diagrams over bits and
//! qubits which functors send to either.

pub mod circuit;
pub mod cq;
pub mod cq_map;
pub mod evaluation;
pub mod functors;
pub mod gate;
pub mod tensor;

pub use circuit::{BoxKind, Circuit, CircuitBox, CircuitCategory, Layer, Obj, Ty};
pub use cq::{C, CQ, Q};
pub use cq_map::{CQMap, CQMapBuilder, CQMapCategory};
pub use evaluation::{bitstring2index, index2bitstring, Evaluation};
pub use functors::{CQMapFunctor, CircuitFunctor, TensorFunctor};
pub use tensor::{Dim, Tensor, TensorCategory};

/// Re-export commonly used types
pub mod prelude {
    pub use super::gate;
    pub use super::{Circuit, CircuitBox, Dim, Evaluation, Obj, Tensor, Ty, C, CQ, CQMap, Q};
    pub use super::{CQMapFunctor, CircuitFunctor, TensorFunctor};
}
