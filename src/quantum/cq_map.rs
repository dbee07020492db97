//! Classical-quantum maps
//!
//! A [`CQMap`] between `CQ` objects is backed by a tensor from
//! `dom.classical @ dom.quantum @ dom.quantum` to
//! `cod.classical @ cod.quantum @ cod.quantum`. The quantum dimension is
//! doubled so a map acts on density operators: the first copy carries the
//! ket index, the second the bra index.

use std::fmt;

use ndarray::ArrayD;
use num_complex::Complex64;

use super::cq::{C, CQ, Q};
use super::tensor::{format_array, indicator, Dim, Tensor};
use crate::category::prelude::*;
use crate::error::{CqError, Result};

/// The dimension of the tensor backing a map with this (co)domain
fn doubled(obj: &CQ) -> Dim {
    obj.classical.tensor(&obj.quantum).tensor(&obj.quantum)
}

/// A completely positive map between classical-quantum systems
#[derive(Clone, Debug, PartialEq)]
pub struct CQMap {
    dom: CQ,
    cod: CQ,
    data: Tensor,
}

/// Collects the pieces of a [`CQMap`] before validating them
#[derive(Clone, Debug)]
pub struct CQMapBuilder {
    dom: CQ,
    cod: CQ,
    array: Option<ArrayD<Complex64>>,
    data: Option<Tensor>,
}

impl CQMapBuilder {
    pub fn array(mut self, array: ArrayD<Complex64>) -> Self {
        self.array = Some(array);
        self
    }

    pub fn data(mut self, data: Tensor) -> Self {
        self.data = Some(data);
        self
    }

    /// A prebuilt tensor takes precedence over a raw array
    pub fn build(self) -> Result<CQMap> {
        match (self.data, self.array) {
            (Some(data), _) => CQMap::from_tensor(self.dom, self.cod, data),
            (None, Some(array)) => CQMap::new(self.dom, self.cod, array),
            (None, None) => Err(CqError::MalformedConstruction),
        }
    }
}

impl CQMap {
    pub fn new(dom: CQ, cod: CQ, array: ArrayD<Complex64>) -> Result<Self> {
        let data = Tensor::new(doubled(&dom), doubled(&cod), array)?;
        Ok(CQMap { dom, cod, data })
    }

    pub fn from_reals(dom: CQ, cod: CQ, data: &[f64]) -> Result<Self> {
        let data = Tensor::from_reals(doubled(&dom), doubled(&cod), data)?;
        Ok(CQMap { dom, cod, data })
    }

    /// Wraps a tensor whose legs already follow the doubled layout
    pub fn from_tensor(dom: CQ, cod: CQ, data: Tensor) -> Result<Self> {
        if *data.dom() != doubled(&dom) || *data.cod() != doubled(&cod) {
            return Err(CqError::ShapeMismatch {
                dom: dom.to_string(),
                cod: cod.to_string(),
                got: data.array().shape().to_vec(),
            });
        }
        Ok(CQMap { dom, cod, data })
    }

    pub fn builder(dom: CQ, cod: CQ) -> CQMapBuilder {
        CQMapBuilder {
            dom,
            cod,
            array: None,
            data: None,
        }
    }

    pub fn dom(&self) -> &CQ {
        &self.dom
    }

    pub fn cod(&self) -> &CQ {
        &self.cod
    }

    pub fn data(&self) -> &Tensor {
        &self.data
    }

    pub fn array(&self) -> &ArrayD<Complex64> {
        self.data.array()
    }

    pub fn id(dom: &CQ) -> Self {
        CQMap {
            dom: dom.clone(),
            cod: dom.clone(),
            data: Tensor::id(&doubled(dom)),
        }
    }

    /// Sequential composition, `self` first
    pub fn then(&self, other: &CQMap) -> Result<CQMap> {
        if self.cod != other.dom {
            return Err(CqError::composability(&self.cod, &other.dom));
        }
        Ok(CQMap {
            dom: self.dom.clone(),
            cod: other.cod.clone(),
            data: self.data.contract(&other.data),
        })
    }

    /// Parallel composition.
    ///
    /// Concatenating the two backing tensors yields legs grouped per operand
    /// (`f.c f.q f.q g.c g.q g.q` on each side), while the combined object
    /// expects every classical leg, then every ket leg, then every bra leg.
    /// The axes are regrouped by a single transposition.
    pub fn tensor(&self, other: &CQMap) -> CQMap {
        let groups = |f: &CQ, g: &CQ| {
            [&f.classical, &f.quantum, &f.quantum, &g.classical, &g.quantum, &g.quantum]
                .map(|dim| dim.len())
        };
        let lens: Vec<usize> = groups(&self.dom, &other.dom)
            .into_iter()
            .chain(groups(&self.cod, &other.cod))
            .collect();
        let starts: Vec<usize> = lens
            .iter()
            .scan(0, |offset, &len| {
                let start = *offset;
                *offset += len;
                Some(start)
            })
            .collect();
        // f.c g.c f.q g.q f.q g.q, for the domain then the codomain
        let order = [0, 3, 1, 4, 2, 5, 6, 9, 7, 10, 8, 11];
        let axes: Vec<usize> = order
            .iter()
            .flat_map(|&group| starts[group]..starts[group] + lens[group])
            .collect();

        let dom = self.dom.tensor(&other.dom);
        let cod = self.cod.tensor(&other.cod);
        let data = self
            .data
            .tensor(&other.data)
            .permuted(doubled(&dom), doubled(&cod), &axes);
        CQMap { dom, cod, data }
    }

    pub fn dagger(&self) -> CQMap {
        CQMap {
            dom: self.cod.clone(),
            cod: self.dom.clone(),
            data: self.data.dagger(),
        }
    }

    /// Entrywise sum of two maps of the same type
    pub fn sum(&self, other: &CQMap) -> Result<CQMap> {
        if (&self.dom, &self.cod) != (&other.dom, &other.cod) {
            return Err(CqError::composability(
                format!("{} -> {}", self.dom, self.cod),
                format!("{} -> {}", other.dom, other.cod),
            ));
        }
        CQMap::new(
            self.dom.clone(),
            self.cod.clone(),
            self.array() + other.array(),
        )
    }

    /// Swaps a `left` bundle past a `right` bundle, classical legs once and
    /// both quantum copies in lockstep.
    pub fn swap(left: &CQ, right: &CQ) -> CQMap {
        let data = Tensor::swap(&left.classical, &right.classical)
            .tensor(&Tensor::swap(&left.quantum, &right.quantum))
            .tensor(&Tensor::swap(&left.quantum, &right.quantum));
        CQMap {
            dom: left.tensor(right),
            cod: right.tensor(left),
            data,
        }
    }

    /// Measurement in the computational basis, one axis at a time from the left
    pub fn measure(dim: &Dim, destructive: bool) -> CQMap {
        dim.dims()
            .iter()
            .map(|&n| CQMap::measure_axis(n, destructive))
            .reduce(|acc, m| acc.tensor(&m))
            .unwrap_or_else(|| CQMap::id(&CQ::unit()))
    }

    fn measure_axis(n: usize, destructive: bool) -> CQMap {
        let axis = Dim::new([n]);
        let cod = if destructive {
            C(axis.clone())
        } else {
            C(axis.clone()).tensor(&Q(axis.clone()))
        };
        let dom = Q(axis);
        let data = Tensor::from_fn(doubled(&dom), doubled(&cod), |idx| {
            indicator(idx.iter().all(|&i| i == idx[0]))
        });
        CQMap { dom, cod, data }
    }

    /// Preparation of basis states, the adjoint of [`CQMap::measure`]
    pub fn encode(dim: &Dim, constructive: bool) -> CQMap {
        CQMap::measure(dim, constructive).dagger()
    }

    /// Lifts a quantum tensor `U` to the map `ρ ↦ U ρ U†`
    pub fn pure(tensor: &Tensor) -> CQMap {
        CQMap {
            dom: Q(tensor.dom().clone()),
            cod: Q(tensor.cod().clone()),
            data: tensor.conjugate().tensor(tensor),
        }
    }

    /// Lifts a tensor to a map on classical systems
    pub fn classical(tensor: &Tensor) -> CQMap {
        CQMap {
            dom: C(tensor.dom().clone()),
            cod: C(tensor.cod().clone()),
            data: tensor.clone(),
        }
    }

    /// Marginalises the classical part and traces out the quantum part
    pub fn discard(dom: &CQ) -> CQMap {
        let kc = dom.classical.len();
        let kq = dom.quantum.len();
        let data = Tensor::from_fn(doubled(dom), Dim::unit(), |idx| {
            indicator(idx[kc..kc + kq] == idx[kc + kq..])
        });
        CQMap {
            dom: dom.clone(),
            cod: CQ::unit(),
            data,
        }
    }

    pub fn is_close(&self, other: &CQMap) -> bool {
        self.dom == other.dom && self.cod == other.cod && self.data.is_close(&other.data)
    }

    /// Whether discarding the output is the same as discarding the input
    pub fn is_causal(&self) -> bool {
        let after = CQMap {
            dom: self.dom.clone(),
            cod: CQ::unit(),
            data: self.data.contract(&CQMap::discard(&self.cod).data),
        };
        CQMap::discard(&self.dom).is_close(&after)
    }

    pub fn cups(left: &CQ, right: &CQ) -> Result<CQMap> {
        let classical = CQMap::classical(&Tensor::cups(&left.classical, &right.classical)?);
        let quantum = CQMap::pure(&Tensor::cups(&left.quantum, &right.quantum)?);
        Ok(classical.tensor(&quantum))
    }

    pub fn caps(left: &CQ, right: &CQ) -> Result<CQMap> {
        Ok(CQMap::cups(left, right)?.dagger())
    }
}

impl fmt::Display for CQMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CQMap(dom={}, cod={}, array={})",
            self.dom,
            self.cod,
            format_array(self.array())
        )
    }
}

/// The category of classical-quantum maps
#[derive(Debug, Clone, Copy, Default)]
pub struct CQMapCategory;

impl Category for CQMapCategory {
    type Object = CQ;
    type Morphism = CQMap;

    fn domain(&self, f: &CQMap) -> CQ {
        f.dom.clone()
    }

    fn codomain(&self, f: &CQMap) -> CQ {
        f.cod.clone()
    }

    fn identity(&self, obj: &CQ) -> CQMap {
        CQMap::id(obj)
    }

    fn compose(&self, f: &CQMap, g: &CQMap) -> Result<CQMap> {
        f.then(g)
    }
}

impl MonoidalCategory for CQMapCategory {
    fn unit(&self) -> CQ {
        CQ::unit()
    }

    fn tensor_objects(&self, a: &CQ, b: &CQ) -> CQ {
        a.tensor(b)
    }

    fn tensor_morphisms(&self, f: &CQMap, g: &CQMap) -> CQMap {
        f.tensor(g)
    }
}

impl SymmetricMonoidalCategory for CQMapCategory {
    fn braiding(&self, a: &CQ, b: &CQ) -> CQMap {
        CQMap::swap(a, b)
    }
}

impl DaggerCategory for CQMapCategory {
    fn dagger(&self, f: &CQMap) -> CQMap {
        f.dagger()
    }
}

impl CompactClosedCategory for CQMapCategory {
    fn dual(&self, a: &CQ) -> CQ {
        a.r()
    }

    fn unit_morphism(&self, a: &CQ) -> Result<CQMap> {
        CQMap::caps(a, &a.r())
    }

    fn counit_morphism(&self, a: &CQ) -> Result<CQMap> {
        CQMap::cups(&a.r(), a)
    }
}

impl DaggerCompactCategory for CQMapCategory {}
