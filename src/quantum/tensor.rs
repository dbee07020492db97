//! Dimensions and tensors
//!
//! A [`Tensor`] is a complex array whose axes are the domain dimensions
//! followed by the codomain dimensions. Composition contracts the codomain
//! axes of the first tensor against the domain axes of the second; the
//! tensor product orders axes as `f.dom, g.dom, f.cod, g.cod`.

use std::fmt;

use ndarray::{Array2, ArrayD, Dimension, IxDyn};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::category::prelude::*;
use crate::error::{CqError, Result};

const RTOL: f64 = 1e-5;
const ATOL: f64 = 1e-8;

/// Ordered axis sizes.
///
/// Axes of size 1 carry no information and are dropped, so `Dim::new([1])`
/// is the monoidal unit.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dim(Vec<usize>);

impl Dim {
    pub fn new(dims: impl IntoIterator<Item = usize>) -> Self {
        Dim(dims.into_iter().filter(|&d| d != 1).collect())
    }

    pub fn unit() -> Self {
        Dim(Vec::new())
    }

    pub fn dims(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entries spanned by these axes
    pub fn size(&self) -> usize {
        self.0.iter().product()
    }

    pub fn tensor(&self, other: &Dim) -> Dim {
        Dim(self.0.iter().chain(other.0.iter()).copied().collect())
    }

    pub fn reversed(&self) -> Dim {
        Dim(self.0.iter().rev().copied().collect())
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "Dim(1)");
        }
        let dims: Vec<String> = self.0.iter().map(|d| d.to_string()).collect();
        write!(f, "Dim({})", dims.join(", "))
    }
}

/// Row-major offset of a multi-index
pub(crate) fn ravel(idx: &[usize], dims: &[usize]) -> usize {
    idx.iter().zip(dims).fold(0, |acc, (i, d)| acc * d + i)
}

pub(crate) fn indicator(condition: bool) -> Complex64 {
    if condition {
        Complex64::new(1.0, 0.0)
    } else {
        Complex64::new(0.0, 0.0)
    }
}

/// Array of the given shape with a single one at `idx`
pub(crate) fn one_hot(shape: &[usize], idx: &[usize]) -> ArrayD<Complex64> {
    ArrayD::from_shape_fn(IxDyn(shape), |i| indicator(i.slice() == idx))
}

pub(crate) fn format_array(array: &ArrayD<Complex64>) -> String {
    let entries: Vec<String> = array
        .iter()
        .map(|z| {
            if z.im == 0.0 {
                format!("{}", z.re)
            } else {
                format!("{}{:+}j", z.re, z.im)
            }
        })
        .collect();
    format!("[{}]", entries.join(", "))
}

pub(crate) fn all_close(a: &ArrayD<Complex64>, b: &ArrayD<Complex64>) -> bool {
    a.shape() == b.shape()
        && a.iter()
            .zip(b.iter())
            .all(|(x, y)| (x - y).norm() <= ATOL + RTOL * y.norm())
}

/// A linear map between dimensions backed by a complex array
#[derive(Clone, Debug, PartialEq)]
pub struct Tensor {
    dom: Dim,
    cod: Dim,
    array: ArrayD<Complex64>,
}

impl Tensor {
    /// Wraps an array as a tensor `dom -> cod`.
    ///
    /// An array with the right number of entries but another shape is
    /// reshaped in row-major order.
    pub fn new(dom: Dim, cod: Dim, array: ArrayD<Complex64>) -> Result<Self> {
        let shape: Vec<usize> = dom.dims().iter().chain(cod.dims()).copied().collect();
        if array.shape() == shape.as_slice() {
            return Ok(Tensor { dom, cod, array });
        }
        let got = array.shape().to_vec();
        let mismatch = |dom: &Dim, cod: &Dim| CqError::ShapeMismatch {
            dom: dom.to_string(),
            cod: cod.to_string(),
            got: got.clone(),
        };
        if array.len() != dom.size() * cod.size() {
            return Err(mismatch(&dom, &cod));
        }
        let array = ArrayD::from_shape_vec(IxDyn(&shape), array.iter().cloned().collect())
            .map_err(|_| mismatch(&dom, &cod))?;
        Ok(Tensor { dom, cod, array })
    }

    /// Builds a tensor from entries listed in row-major order
    pub fn from_vec(dom: Dim, cod: Dim, data: Vec<Complex64>) -> Result<Self> {
        let len = data.len();
        let shape: Vec<usize> = dom.dims().iter().chain(cod.dims()).copied().collect();
        let array = ArrayD::from_shape_vec(IxDyn(&shape), data).map_err(|_| CqError::ShapeMismatch {
            dom: dom.to_string(),
            cod: cod.to_string(),
            got: vec![len],
        })?;
        Ok(Tensor { dom, cod, array })
    }

    pub fn from_reals(dom: Dim, cod: Dim, data: &[f64]) -> Result<Self> {
        Self::from_vec(dom, cod, data.iter().map(|&x| Complex64::new(x, 0.0)).collect())
    }

    pub fn scalar(value: Complex64) -> Self {
        Tensor {
            dom: Dim::unit(),
            cod: Dim::unit(),
            array: ArrayD::from_elem(IxDyn(&[]), value),
        }
    }

    pub fn dom(&self) -> &Dim {
        &self.dom
    }

    pub fn cod(&self) -> &Dim {
        &self.cod
    }

    pub fn array(&self) -> &ArrayD<Complex64> {
        &self.array
    }

    /// Builds a tensor entry by entry from its multi-index
    pub(crate) fn from_fn(dom: Dim, cod: Dim, f: impl Fn(&[usize]) -> Complex64) -> Self {
        let shape: Vec<usize> = dom.dims().iter().chain(cod.dims()).copied().collect();
        let array = ArrayD::from_shape_fn(IxDyn(&shape), |idx| f(idx.slice()));
        Tensor { dom, cod, array }
    }

    /// Reorders the axes, `axes[k]` being the source of axis `k`.
    ///
    /// Callers guarantee the permuted shape is `dom` followed by `cod`.
    pub(crate) fn permuted(&self, dom: Dim, cod: Dim, axes: &[usize]) -> Self {
        let array = self
            .array
            .view()
            .permuted_axes(IxDyn(axes))
            .as_standard_layout()
            .into_owned();
        Tensor { dom, cod, array }
    }

    pub fn id(dim: &Dim) -> Self {
        let k = dim.len();
        Tensor::from_fn(dim.clone(), dim.clone(), |idx| indicator(idx[..k] == idx[k..]))
    }

    fn as_matrix(&self) -> Array2<Complex64> {
        let (rows, cols) = (self.dom.size(), self.cod.size());
        let data: Vec<Complex64> = self.array.iter().cloned().collect();
        Array2::from_shape_fn((rows, cols), |(r, c)| data[r * cols + c])
    }

    fn from_matrix(dom: Dim, cod: Dim, matrix: &Array2<Complex64>) -> Self {
        let k = dom.len();
        let shape: Vec<usize> = dom.dims().iter().chain(cod.dims()).copied().collect();
        let array = ArrayD::from_shape_fn(IxDyn(&shape), |idx| {
            let idx = idx.slice();
            matrix[[ravel(&idx[..k], dom.dims()), ravel(&idx[k..], cod.dims())]]
        });
        Tensor { dom, cod, array }
    }

    /// Sequential composition `self ; other`
    pub fn then(&self, other: &Tensor) -> Result<Tensor> {
        if self.cod != other.dom {
            return Err(CqError::composability(&self.cod, &other.dom));
        }
        Ok(self.contract(other))
    }

    /// Contraction of matching legs, callers guarantee `self.cod == other.dom`
    pub(crate) fn contract(&self, other: &Tensor) -> Tensor {
        let product = self.as_matrix().dot(&other.as_matrix());
        Tensor::from_matrix(self.dom.clone(), other.cod.clone(), &product)
    }

    /// Parallel composition with axes `self.dom, other.dom, self.cod, other.cod`
    pub fn tensor(&self, other: &Tensor) -> Tensor {
        let (a, b) = (self.as_matrix(), other.as_matrix());
        let (r2, c2) = b.dim();
        let (r1, c1) = a.dim();
        let kron = Array2::from_shape_fn((r1 * r2, c1 * c2), |(r, c)| {
            a[[r / r2, c / c2]] * b[[r % r2, c % c2]]
        });
        Tensor::from_matrix(self.dom.tensor(&other.dom), self.cod.tensor(&other.cod), &kron)
    }

    /// Conjugate transpose
    pub fn dagger(&self) -> Tensor {
        let adjoint = self.as_matrix().t().mapv(|z| z.conj());
        Tensor::from_matrix(self.cod.clone(), self.dom.clone(), &adjoint)
    }

    pub fn conjugate(&self) -> Tensor {
        Tensor {
            dom: self.dom.clone(),
            cod: self.cod.clone(),
            array: self.array.mapv(|z| z.conj()),
        }
    }

    /// The symmetry `left @ right -> right @ left`
    pub fn swap(left: &Dim, right: &Dim) -> Tensor {
        let (l, r) = (left.size(), right.size());
        let matrix = Array2::from_shape_fn((l * r, r * l), |(row, col)| {
            let (a, b) = (row / r, row % r);
            indicator(col == b * l + a)
        });
        Tensor::from_matrix(left.tensor(right), right.tensor(left), &matrix)
    }

    /// The effect `left @ right -> Dim(1)` pairing `left[i]` with `right[n - 1 - i]`
    pub fn cups(left: &Dim, right: &Dim) -> Result<Tensor> {
        if left.reversed() != *right {
            return Err(CqError::DimensionMismatch(format!(
                "cannot build cups on {} and {}",
                left, right
            )));
        }
        let n = left.len();
        Ok(Tensor::from_fn(left.tensor(right), Dim::unit(), |idx| {
            indicator((0..n).all(|m| idx[m] == idx[2 * n - 1 - m]))
        }))
    }

    /// The state `Dim(1) -> left @ right`, dagger of [`Tensor::cups`]
    pub fn caps(left: &Dim, right: &Dim) -> Result<Tensor> {
        Ok(Tensor::cups(left, right)?.dagger())
    }

    pub fn is_close(&self, other: &Tensor) -> bool {
        self.dom == other.dom && self.cod == other.cod && all_close(&self.array, &other.array)
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Tensor(dom={}, cod={}, array={})",
            self.dom,
            self.cod,
            format_array(&self.array)
        )
    }
}

/// The category of dimensions and tensors
#[derive(Debug, Clone, Copy, Default)]
pub struct TensorCategory;

impl Category for TensorCategory {
    type Object = Dim;
    type Morphism = Tensor;

    fn domain(&self, f: &Tensor) -> Dim {
        f.dom.clone()
    }

    fn codomain(&self, f: &Tensor) -> Dim {
        f.cod.clone()
    }

    fn identity(&self, obj: &Dim) -> Tensor {
        Tensor::id(obj)
    }

    fn compose(&self, f: &Tensor, g: &Tensor) -> Result<Tensor> {
        f.then(g)
    }
}

impl MonoidalCategory for TensorCategory {
    fn unit(&self) -> Dim {
        Dim::unit()
    }

    fn tensor_objects(&self, a: &Dim, b: &Dim) -> Dim {
        a.tensor(b)
    }

    fn tensor_morphisms(&self, f: &Tensor, g: &Tensor) -> Tensor {
        f.tensor(g)
    }
}

impl SymmetricMonoidalCategory for TensorCategory {
    fn braiding(&self, a: &Dim, b: &Dim) -> Tensor {
        Tensor::swap(a, b)
    }
}

impl DaggerCategory for TensorCategory {
    fn dagger(&self, f: &Tensor) -> Tensor {
        f.dagger()
    }
}

impl CompactClosedCategory for TensorCategory {
    fn dual(&self, a: &Dim) -> Dim {
        a.reversed()
    }

    fn unit_morphism(&self, a: &Dim) -> Result<Tensor> {
        Tensor::caps(a, &a.reversed())
    }

    fn counit_morphism(&self, a: &Dim) -> Result<Tensor> {
        Tensor::cups(&a.reversed(), a)
    }
}

impl DaggerCompactCategory for TensorCategory {}
