//! Functors out of circuit diagrams
//!
//! A diagram functor is fixed by its image on generating objects and
//! boxes. It extends to whole circuits by mapping each layer to
//! `id(left) ⊗ F(box) ⊗ id(right)` and composing the layers in order.

use tracing::trace;

use super::{Category, MonoidalCategory};
use crate::error::Result;
use crate::quantum::circuit::{Circuit, CircuitBox, Obj, Ty};

/// A strict monoidal functor from circuits into a monoidal category
pub trait DiagramFunctor {
    /// The category receiving the image
    type Target: MonoidalCategory;

    fn target(&self) -> &Self::Target;

    /// Image of a generating object
    fn map_obj(&self, obj: Obj) -> <Self::Target as Category>::Object;

    /// Image of a box, failing when the functor has no mapping for it
    fn map_box(&self, boxed: &CircuitBox) -> Result<<Self::Target as Category>::Morphism>;

    /// Image of a type, the tensor of its objects' images
    fn map_type(&self, ty: &Ty) -> <Self::Target as Category>::Object {
        let target = self.target();
        ty.iter()
            .fold(target.unit(), |acc, &obj| target.tensor_objects(&acc, &self.map_obj(obj)))
    }

    /// Image of a whole circuit
    fn map_circuit(&self, circuit: &Circuit) -> Result<<Self::Target as Category>::Morphism> {
        let target = self.target();
        let mut result = target.identity(&self.map_type(circuit.dom()));
        for (i, layer) in circuit.layers().iter().enumerate() {
            trace!(layer = i, name = %layer.boxed.name, "mapping layer");
            let left = target.identity(&self.map_type(&layer.left));
            let right = target.identity(&self.map_type(&layer.right));
            let middle = self.map_box(&layer.boxed)?;
            let image = target.tensor_morphisms(&target.tensor_morphisms(&left, &middle), &right);
            result = target.compose(&result, &image)?;
        }
        Ok(result)
    }
}
