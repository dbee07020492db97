//! Classical-quantum circuits
//!
//! A [`Circuit`] is a diagram over the free monoid on `bit` and `qubit`,
//! stored as a sequence of layers. Each layer places one box between
//! identity wires on its left and right.

use std::fmt;

use ndarray::{ArrayD, Dimension, IxDyn};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use super::gate;
use crate::category::{Category, MonoidalCategory};
use crate::error::{CqError, Result};

/// Generating wire types
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Obj {
    Bit,
    Qubit,
}

impl fmt::Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obj::Bit => write!(f, "bit"),
            Obj::Qubit => write!(f, "qubit"),
        }
    }
}

/// A sequence of bits and qubits
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Ty(Vec<Obj>);

impl Ty {
    pub fn new(objects: Vec<Obj>) -> Self {
        Ty(objects)
    }

    pub fn unit() -> Self {
        Ty(Vec::new())
    }

    pub fn bit() -> Self {
        Ty(vec![Obj::Bit])
    }

    pub fn qubit() -> Self {
        Ty(vec![Obj::Qubit])
    }

    pub fn bits(n: usize) -> Self {
        Ty(vec![Obj::Bit; n])
    }

    pub fn qubits(n: usize) -> Self {
        Ty(vec![Obj::Qubit; n])
    }

    pub fn pow(&self, n: usize) -> Self {
        Ty(self.0.iter().copied().cycle().take(self.0.len() * n).collect())
    }

    pub fn tensor(&self, other: &Ty) -> Ty {
        Ty(self.0.iter().chain(other.0.iter()).copied().collect())
    }

    pub fn objects(&self) -> &[Obj] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obj> + '_ {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn count(&self, obj: Obj) -> usize {
        self.0.iter().filter(|&&o| o == obj).count()
    }

    fn all(&self, obj: Obj) -> bool {
        self.0.iter().all(|&o| o == obj)
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "Ty()");
        }
        let mut runs: Vec<(Obj, usize)> = Vec::new();
        for &obj in &self.0 {
            match runs.last_mut() {
                Some((last, n)) if *last == obj => *n += 1,
                _ => runs.push((obj, 1)),
            }
        }
        let parts: Vec<String> = runs
            .into_iter()
            .map(|(obj, n)| if n > 1 { format!("{} ** {}", obj, n) } else { obj.to_string() })
            .collect();
        write!(f, "{}", parts.join(" @ "))
    }
}

/// What a box does, fixed at construction
#[derive(Clone, Debug, PartialEq)]
pub enum BoxKind {
    /// A linear map on bits only (`classical`) or qubits only, one axis of size 2 per wire
    PureGate {
        array: ArrayD<Complex64>,
        classical: bool,
    },
    Swap { left: Obj, right: Obj },
    Discard,
    MixedState,
    Measure { destructive: bool },
    Encode { constructive: bool },
    /// Opaque box, only evaluated through a functor's arrow table
    Symbol,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CircuitBox {
    pub name: String,
    pub dom: Ty,
    pub cod: Ty,
    pub kind: BoxKind,
    pub is_mixed: bool,
}

impl CircuitBox {
    pub fn new(name: impl Into<String>, dom: Ty, cod: Ty, kind: BoxKind) -> Self {
        let is_mixed = match &kind {
            BoxKind::PureGate { .. } | BoxKind::Symbol => false,
            BoxKind::Swap { left, right } => left != right,
            BoxKind::Discard
            | BoxKind::MixedState
            | BoxKind::Measure { .. }
            | BoxKind::Encode { .. } => true,
        };
        CircuitBox {
            name: name.into(),
            dom,
            cod,
            kind,
            is_mixed,
        }
    }

    /// A pure box on bits only or qubits only.
    ///
    /// Boxes without wires (scalars) count as quantum.
    pub fn pure(name: impl Into<String>, dom: Ty, cod: Ty, entries: Vec<Complex64>) -> Result<Self> {
        let name = name.into();
        let wires = dom.tensor(&cod);
        let classical = !wires.is_empty() && wires.all(Obj::Bit);
        if !classical && !wires.all(Obj::Qubit) {
            return Err(CqError::DimensionMismatch(format!(
                "{}: dom and cod should be bits only or qubits only, got {} -> {}",
                name, dom, cod
            )));
        }
        let shape = vec![2; wires.len()];
        let len = entries.len();
        let array = ArrayD::from_shape_vec(IxDyn(&shape), entries).map_err(|_| CqError::ShapeMismatch {
            dom: dom.to_string(),
            cod: cod.to_string(),
            got: vec![len],
        })?;
        Ok(CircuitBox::new(name, dom, cod, BoxKind::PureGate { array, classical }))
    }

    pub fn symbol(name: impl Into<String>, dom: Ty, cod: Ty) -> Self {
        CircuitBox::new(name, dom, cod, BoxKind::Symbol)
    }

    pub fn dagger(&self) -> CircuitBox {
        let name = match self.name.strip_suffix(".dagger()") {
            Some(stripped) => stripped.to_string(),
            None => format!("{}.dagger()", self.name),
        };
        let (dom, cod) = (self.cod.clone(), self.dom.clone());
        match &self.kind {
            BoxKind::PureGate { array, classical } => {
                // axes are reordered from (dom, cod) to (cod, dom)
                let k = self.cod.len();
                let adjoint = ArrayD::from_shape_fn(array.raw_dim(), |idx| {
                    let idx = idx.slice();
                    let source: Vec<usize> = idx[k..].iter().chain(&idx[..k]).copied().collect();
                    array[IxDyn(&source)].conj()
                });
                CircuitBox::new(
                    name,
                    dom,
                    cod,
                    BoxKind::PureGate {
                        array: adjoint,
                        classical: *classical,
                    },
                )
            }
            BoxKind::Swap { left, right } => gate::swap_box(*right, *left),
            BoxKind::Discard => gate::mixed_state_box(&self.dom),
            BoxKind::MixedState => gate::discard_box(&self.cod),
            BoxKind::Measure { destructive } => gate::encode_box(self.dom.len(), *destructive),
            BoxKind::Encode { constructive } => gate::measure_box(self.cod.len(), *constructive),
            BoxKind::Symbol => CircuitBox::symbol(name, dom, cod),
        }
    }
}

/// One box with identity wires on either side
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    pub left: Ty,
    pub boxed: CircuitBox,
    pub right: Ty,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Circuit {
    dom: Ty,
    cod: Ty,
    layers: Vec<Layer>,
}

impl From<CircuitBox> for Circuit {
    fn from(boxed: CircuitBox) -> Self {
        Circuit {
            dom: boxed.dom.clone(),
            cod: boxed.cod.clone(),
            layers: vec![Layer {
                left: Ty::unit(),
                boxed,
                right: Ty::unit(),
            }],
        }
    }
}

impl Circuit {
    pub fn id(dom: &Ty) -> Self {
        Circuit {
            dom: dom.clone(),
            cod: dom.clone(),
            layers: Vec::new(),
        }
    }

    pub fn dom(&self) -> &Ty {
        &self.dom
    }

    pub fn cod(&self) -> &Ty {
        &self.cod
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn boxes(&self) -> impl Iterator<Item = &CircuitBox> + '_ {
        self.layers.iter().map(|layer| &layer.boxed)
    }

    pub fn then(&self, other: &Circuit) -> Result<Circuit> {
        if self.cod != other.dom {
            return Err(CqError::composability(&self.cod, &other.dom));
        }
        Ok(Circuit {
            dom: self.dom.clone(),
            cod: other.cod.clone(),
            layers: self.layers.iter().chain(&other.layers).cloned().collect(),
        })
    }

    pub fn tensor(&self, other: &Circuit) -> Circuit {
        let below = self.layers.iter().map(|layer| Layer {
            left: layer.left.clone(),
            boxed: layer.boxed.clone(),
            right: layer.right.tensor(&other.dom),
        });
        let after = other.layers.iter().map(|layer| Layer {
            left: self.cod.tensor(&layer.left),
            boxed: layer.boxed.clone(),
            right: layer.right.clone(),
        });
        Circuit {
            dom: self.dom.tensor(&other.dom),
            cod: self.cod.tensor(&other.cod),
            layers: below.chain(after).collect(),
        }
    }

    /// Tensor product of a sequence of circuits, the empty identity if there are none
    pub fn tensor_all(circuits: impl IntoIterator<Item = Circuit>) -> Circuit {
        circuits
            .into_iter()
            .fold(Circuit::id(&Ty::unit()), |acc, c| acc.tensor(&c))
    }

    pub fn dagger(&self) -> Circuit {
        Circuit {
            dom: self.cod.clone(),
            cod: self.dom.clone(),
            layers: self
                .layers
                .iter()
                .rev()
                .map(|layer| Layer {
                    left: layer.left.clone(),
                    boxed: layer.boxed.dagger(),
                    right: layer.right.clone(),
                })
                .collect(),
        }
    }

    /// Places `boxed` after this circuit, `offset` wires from the left
    fn then_at(&self, offset: usize, boxed: CircuitBox) -> Circuit {
        let wires = self.cod.objects();
        let left = Ty::new(wires[..offset].to_vec());
        let right = Ty::new(wires[offset + boxed.dom.len()..].to_vec());
        let cod = left.tensor(&boxed.cod).tensor(&right);
        let mut layers = self.layers.clone();
        layers.push(Layer { left, boxed, right });
        Circuit {
            dom: self.dom.clone(),
            cod,
            layers,
        }
    }

    /// Moves the `left` wires past the `right` ones with elementary swaps
    pub fn swap(left: &Ty, right: &Ty) -> Circuit {
        let mut circuit = Circuit::id(&left.tensor(right));
        for i in (0..left.len()).rev() {
            for j in 0..right.len() {
                let boxed = gate::swap_box(left.objects()[i], right.objects()[j]);
                circuit = circuit.then_at(i + j, boxed);
            }
        }
        circuit
    }

    /// Sends wire `i` of `dom` to position `perm[i]` with adjacent swaps
    pub fn permutation(perm: &[usize], dom: &Ty) -> Result<Circuit> {
        let mut seen = vec![false; perm.len()];
        let valid = perm.len() == dom.len()
            && perm
                .iter()
                .all(|&p| p < seen.len() && !std::mem::replace(&mut seen[p], true));
        if !valid {
            return Err(CqError::DimensionMismatch(format!(
                "{:?} is not a permutation of the {} wires of {}",
                perm,
                dom.len(),
                dom
            )));
        }
        let mut targets = perm.to_vec();
        let mut circuit = Circuit::id(dom);
        for pass in 0..targets.len() {
            for k in 0..targets.len().saturating_sub(pass + 1) {
                if targets[k] > targets[k + 1] {
                    let wires = circuit.cod.objects();
                    let boxed = gate::swap_box(wires[k], wires[k + 1]);
                    circuit = circuit.then_at(k, boxed);
                    targets.swap(k, k + 1);
                }
            }
        }
        Ok(circuit)
    }

    /// Nested Bell effects on qubits, pairing `left[i]` with `right[n - 1 - i]`
    pub fn cups(left: &Ty, right: &Ty) -> Result<Circuit> {
        let wires = left.tensor(right);
        if !wires.all(Obj::Qubit) || left.len() != right.len() {
            return Err(CqError::DimensionMismatch(format!(
                "cups need matching qubit types, got {} and {}",
                left, right
            )));
        }
        let cup = gate::cx()
            .then(&gate::h().tensor(&gate::sqrt(2.0)).tensor(&Circuit::id(&Ty::qubit())))?
            .then(&gate::bra(&[0, 0]))?;
        let mut circuit = Circuit::id(&wires);
        for i in (0..left.len()).rev() {
            let layer = Circuit::id(&Ty::qubits(i))
                .tensor(&cup)
                .tensor(&Circuit::id(&Ty::qubits(i)));
            circuit = circuit.then(&layer)?;
        }
        Ok(circuit)
    }

    pub fn caps(left: &Ty, right: &Ty) -> Result<Circuit> {
        Ok(Circuit::cups(left, right)?.dagger())
    }

    /// Whether the circuit mixes bits with qubits on its input or holds a mixed box.
    ///
    /// Mixed circuits can only be evaluated as classical-quantum maps.
    pub fn is_mixed(&self) -> bool {
        let both = self.dom.count(Obj::Bit) > 0 && self.dom.count(Obj::Qubit) > 0;
        both || self.boxes().any(|b| b.is_mixed)
    }
}

/// The free category of circuits, for functors between circuits
#[derive(Debug, Clone, Copy, Default)]
pub struct CircuitCategory;

impl Category for CircuitCategory {
    type Object = Ty;
    type Morphism = Circuit;

    fn domain(&self, f: &Circuit) -> Ty {
        f.dom.clone()
    }

    fn codomain(&self, f: &Circuit) -> Ty {
        f.cod.clone()
    }

    fn identity(&self, obj: &Ty) -> Circuit {
        Circuit::id(obj)
    }

    fn compose(&self, f: &Circuit, g: &Circuit) -> Result<Circuit> {
        f.then(g)
    }
}

impl MonoidalCategory for CircuitCategory {
    fn unit(&self) -> Ty {
        Ty::unit()
    }

    fn tensor_objects(&self, a: &Ty, b: &Ty) -> Ty {
        a.tensor(b)
    }

    fn tensor_morphisms(&self, f: &Circuit, g: &Circuit) -> Circuit {
        f.tensor(g)
    }
}

impl fmt::Display for Circuit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn id(ty: &Ty) -> String {
            if ty.all(Obj::Qubit) {
                format!("Id({})", ty.len())
            } else {
                format!("Id({})", ty)
            }
        }
        if self.layers.is_empty() {
            return write!(f, "{}", id(&self.dom));
        }
        let layers: Vec<String> = self
            .layers
            .iter()
            .map(|layer| {
                let mut parts = Vec::new();
                if !layer.left.is_empty() {
                    parts.push(id(&layer.left));
                }
                parts.push(layer.boxed.name.clone());
                if !layer.right.is_empty() {
                    parts.push(id(&layer.right));
                }
                parts.join(" @ ")
            })
            .collect();
        write!(f, "{}", layers.join(" >> "))
    }
}
