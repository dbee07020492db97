//! Functors evaluating circuits as tensors or as classical-quantum maps
//!
//! [`TensorFunctor`] sends bits and qubits to `Dim(2)` and boxes to their
//! own arrays; it only knows pure boxes. [`CQMapFunctor`] sends bits to
//! `C(Dim(2))`, qubits to `Q(Dim(2))` and handles every box kind.
//!
//! Both look up [`BoxKind::Symbol`] boxes by name in a table of arrows.
//! [`CircuitFunctor`] rewrites circuits into circuits.

use std::collections::HashMap;

use tracing::debug;

use super::circuit::{BoxKind, Circuit, CircuitBox, CircuitCategory, Obj, Ty};
use super::cq::{C, CQ, Q};
use super::cq_map::{CQMap, CQMapCategory};
use super::tensor::{Dim, Tensor, TensorCategory};
use crate::category::DiagramFunctor;
use crate::error::{CqError, Result};

fn lookup<'a, T>(arrows: &'a HashMap<String, T>, boxed: &CircuitBox) -> Result<&'a T> {
    arrows
        .get(&boxed.name)
        .ok_or_else(|| CqError::MissingMapping(format!("{}: {} -> {}", boxed.name, boxed.dom, boxed.cod)))
}

/// Pure evaluation into [`TensorCategory`]
#[derive(Clone, Debug)]
pub struct TensorFunctor {
    pub bit: Dim,
    pub qubit: Dim,
    arrows: HashMap<String, Tensor>,
}

impl Default for TensorFunctor {
    fn default() -> Self {
        TensorFunctor {
            bit: Dim::new([2]),
            qubit: Dim::new([2]),
            arrows: HashMap::new(),
        }
    }
}

impl TensorFunctor {
    /// Registers the image of the symbol boxes called `name`
    pub fn with_arrow(mut self, name: impl Into<String>, arrow: Tensor) -> Self {
        self.arrows.insert(name.into(), arrow);
        self
    }
}

impl DiagramFunctor for TensorFunctor {
    type Target = TensorCategory;

    fn target(&self) -> &TensorCategory {
        &TensorCategory
    }

    fn map_obj(&self, obj: Obj) -> Dim {
        match obj {
            Obj::Bit => self.bit.clone(),
            Obj::Qubit => self.qubit.clone(),
        }
    }

    fn map_box(&self, boxed: &CircuitBox) -> Result<Tensor> {
        match &boxed.kind {
            BoxKind::PureGate { array, .. } => {
                Tensor::new(self.map_type(&boxed.dom), self.map_type(&boxed.cod), array.clone())
            }
            BoxKind::Swap { left, right } => Ok(Tensor::swap(&self.map_obj(*left), &self.map_obj(*right))),
            BoxKind::Symbol => lookup(&self.arrows, boxed).cloned(),
            _ => Err(CqError::MissingMapping(format!(
                "{} is mixed and has no tensor image, evaluate it as a CQ map",
                boxed.name
            ))),
        }
    }
}

/// Mixed evaluation into [`CQMapCategory`]
#[derive(Clone, Debug)]
pub struct CQMapFunctor {
    pub bit: CQ,
    pub qubit: CQ,
    arrows: HashMap<String, CQMap>,
}

impl Default for CQMapFunctor {
    fn default() -> Self {
        CQMapFunctor {
            bit: C(Dim::new([2])),
            qubit: Q(Dim::new([2])),
            arrows: HashMap::new(),
        }
    }
}

impl CQMapFunctor {
    /// Registers the image of the symbol boxes called `name`
    pub fn with_arrow(mut self, name: impl Into<String>, arrow: CQMap) -> Self {
        self.arrows.insert(name.into(), arrow);
        self
    }
}

impl DiagramFunctor for CQMapFunctor {
    type Target = CQMapCategory;

    fn target(&self) -> &CQMapCategory {
        &CQMapCategory
    }

    fn map_obj(&self, obj: Obj) -> CQ {
        match obj {
            Obj::Bit => self.bit.clone(),
            Obj::Qubit => self.qubit.clone(),
        }
    }

    fn map_box(&self, boxed: &CircuitBox) -> Result<CQMap> {
        debug!(name = %boxed.name, mixed = boxed.is_mixed, "evaluating box as CQ map");
        let dom = self.map_type(&boxed.dom);
        let cod = self.map_type(&boxed.cod);
        match &boxed.kind {
            BoxKind::PureGate {
                array,
                classical: true,
            } => Ok(CQMap::classical(&Tensor::new(dom.classical, cod.classical, array.clone())?)),
            BoxKind::PureGate {
                array,
                classical: false,
            } => Ok(CQMap::pure(&Tensor::new(dom.quantum, cod.quantum, array.clone())?)),
            BoxKind::Swap { left, right } => Ok(CQMap::swap(&self.map_obj(*left), &self.map_obj(*right))),
            BoxKind::Discard => Ok(CQMap::discard(&dom)),
            BoxKind::MixedState => Ok(CQMap::discard(&cod).dagger()),
            BoxKind::Measure { destructive } => Ok(CQMap::measure(&dom.quantum, *destructive)),
            BoxKind::Encode { constructive } => Ok(CQMap::encode(&dom.classical, *constructive)),
            BoxKind::Symbol => lookup(&self.arrows, boxed).cloned(),
        }
    }
}

/// Substitution of circuits for boxes.
///
/// Boxes with a registered arrow are replaced by it. Other boxes are kept
/// as they are, which needs their wires to be mapped to themselves.
#[derive(Clone, Debug)]
pub struct CircuitFunctor {
    pub bit: Ty,
    pub qubit: Ty,
    arrows: HashMap<String, Circuit>,
}

impl Default for CircuitFunctor {
    fn default() -> Self {
        CircuitFunctor::new(Ty::bit(), Ty::qubit())
    }
}

impl CircuitFunctor {
    pub fn new(bit: Ty, qubit: Ty) -> Self {
        CircuitFunctor {
            bit,
            qubit,
            arrows: HashMap::new(),
        }
    }

    /// Registers the image of the boxes called `name`
    pub fn with_arrow(mut self, name: impl Into<String>, arrow: Circuit) -> Self {
        self.arrows.insert(name.into(), arrow);
        self
    }
}

impl DiagramFunctor for CircuitFunctor {
    type Target = CircuitCategory;

    fn target(&self) -> &CircuitCategory {
        &CircuitCategory
    }

    fn map_obj(&self, obj: Obj) -> Ty {
        match obj {
            Obj::Bit => self.bit.clone(),
            Obj::Qubit => self.qubit.clone(),
        }
    }

    fn map_box(&self, boxed: &CircuitBox) -> Result<Circuit> {
        let dom = self.map_type(&boxed.dom);
        let cod = self.map_type(&boxed.cod);
        match self.arrows.get(&boxed.name) {
            Some(arrow) if arrow.dom() == &dom && arrow.cod() == &cod => Ok(arrow.clone()),
            Some(arrow) => Err(CqError::DimensionMismatch(format!(
                "image of {} should be {} -> {}, got {} -> {}",
                boxed.name,
                dom,
                cod,
                arrow.dom(),
                arrow.cod()
            ))),
            None if dom == boxed.dom && cod == boxed.cod => Ok(boxed.clone().into()),
            None => Err(CqError::MissingMapping(format!(
                "{}: {} -> {}",
                boxed.name, boxed.dom, boxed.cod
            ))),
        }
    }
}
