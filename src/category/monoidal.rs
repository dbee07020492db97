//! Monoidal category structures
//!
//! Traits for categories, monoidal categories and their symmetric, dagger
//! and compact closed refinements. Both the tensor category and the
//! category of classical-quantum maps implement the whole tower, which is
//! what lets a single diagram functor target either of them.

use std::fmt::Debug;

use crate::error::Result;

/// A category consists of objects and morphisms between them.
///
/// Objects are wire types (dimensions, classical-quantum pairs) and
/// morphisms are the numeric maps between them.
pub trait Category {
    /// The type representing objects in this category
    type Object: Clone + Debug + PartialEq;

    /// The type representing morphisms between objects
    ///
    /// PartialEq is required so the category laws can be checked exactly
    type Morphism: Clone + Debug + PartialEq;

    /// The domain (source) of a morphism
    fn domain(&self, f: &Self::Morphism) -> Self::Object;

    /// The codomain (target) of a morphism
    fn codomain(&self, f: &Self::Morphism) -> Self::Object;

    /// The identity morphism for a given object
    fn identity(&self, obj: &Self::Object) -> Self::Morphism;

    /// Composition of f: A → B followed by g: B → C.
    ///
    /// Fails with a composability error when the codomain of f is not the domain of g.
    fn compose(&self, f: &Self::Morphism, g: &Self::Morphism) -> Result<Self::Morphism>;

    /// Whether f can be followed by g
    fn can_compose(&self, f: &Self::Morphism, g: &Self::Morphism) -> bool {
        self.codomain(f) == self.domain(g)
    }
}

/// A monoidal category extends a category with a tensor product operation.
///
/// The categories in this crate are strict: unitors and associators are identities.
pub trait MonoidalCategory: Category {
    /// The monoidal unit (I)
    fn unit(&self) -> Self::Object;

    /// Tensor product of objects
    fn tensor_objects(&self, a: &Self::Object, b: &Self::Object) -> Self::Object;

    /// Tensor product of morphisms
    fn tensor_morphisms(&self, f: &Self::Morphism, g: &Self::Morphism) -> Self::Morphism;

    /// Left unitor: λ_A: I ⊗ A → A
    fn left_unitor(&self, a: &Self::Object) -> Self::Morphism {
        self.identity(a)
    }

    /// Right unitor: ρ_A: A ⊗ I → A
    fn right_unitor(&self, a: &Self::Object) -> Self::Morphism {
        self.identity(a)
    }

    /// Associator: α_{A,B,C}: (A ⊗ B) ⊗ C → A ⊗ (B ⊗ C)
    fn associator(&self, a: &Self::Object, b: &Self::Object, c: &Self::Object) -> Self::Morphism {
        let ab = self.tensor_objects(a, b);
        self.identity(&self.tensor_objects(&ab, c))
    }
}

/// A symmetric monoidal category has a braiding that swaps tensor factors.
pub trait SymmetricMonoidalCategory: MonoidalCategory {
    /// Braiding/symmetry isomorphism: σ_{A,B}: A ⊗ B → B ⊗ A
    fn braiding(&self, a: &Self::Object, b: &Self::Object) -> Self::Morphism;
}

/// A compact closed category gives every object a dual together with
/// a unit (state) and counit (effect).
pub trait CompactClosedCategory: SymmetricMonoidalCategory {
    /// Returns the dual object of a given object
    fn dual(&self, a: &Self::Object) -> Self::Object;

    /// Unit morphism: η_A: I → A ⊗ A*
    fn unit_morphism(&self, a: &Self::Object) -> Result<Self::Morphism>;

    /// Counit morphism: ε_A: A* ⊗ A → I
    fn counit_morphism(&self, a: &Self::Object) -> Result<Self::Morphism>;
}

/// A dagger category is a category with an involutive contravariant endofunctor
/// that is the identity on objects.
pub trait DaggerCategory: Category {
    /// The dagger (adjoint) of a morphism
    fn dagger(&self, f: &Self::Morphism) -> Self::Morphism;
}

/// A dagger compact category combines dagger and compact closed structures.
pub trait DaggerCompactCategory: DaggerCategory + CompactClosedCategory {}

/// Checks of the category laws against sample morphisms
pub mod laws {
    use super::*;

    /// Identity and associativity laws.
    ///
    /// Every composable triple drawn from `test_morphisms` is checked.
    pub fn verify_category_laws<C: Category>(category: &C, test_morphisms: &[C::Morphism]) -> bool {
        let identity_law = test_morphisms.iter().all(|f| {
            let id_dom = category.identity(&category.domain(f));
            let id_cod = category.identity(&category.codomain(f));
            match (category.compose(&id_dom, f), category.compose(f, &id_cod)) {
                (Ok(left), Ok(right)) => left == *f && right == *f,
                _ => false,
            }
        });

        let mut associativity_law = true;
        for f in test_morphisms {
            for g in test_morphisms.iter().filter(|g| category.can_compose(f, g)) {
                for h in test_morphisms.iter().filter(|h| category.can_compose(g, h)) {
                    let left = category
                        .compose(f, g)
                        .and_then(|fg| category.compose(&fg, h));
                    let right = category
                        .compose(g, h)
                        .and_then(|gh| category.compose(f, &gh));
                    associativity_law &= matches!((left, right), (Ok(l), Ok(r)) if l == r);
                }
            }
        }

        identity_law && associativity_law
    }

    /// Unit laws of the tensor product: f ⊗ id_I = f = id_I ⊗ f
    pub fn verify_monoidal_laws<C: MonoidalCategory>(category: &C, test_morphisms: &[C::Morphism]) -> bool {
        let id_unit = category.identity(&category.unit());
        test_morphisms.iter().all(|f| {
            category.tensor_morphisms(f, &id_unit) == *f
                && category.tensor_morphisms(&id_unit, f) == *f
        })
    }

    /// Symmetry: σ_{B,A} ∘ σ_{A,B} = id_{A⊗B}
    pub fn verify_symmetric_monoidal_laws<C: SymmetricMonoidalCategory>(
        category: &C,
        test_objects: &[C::Object],
    ) -> bool {
        if test_objects.is_empty() {
            return false;
        }

        test_objects.iter().all(|a| {
            test_objects.iter().all(|b| {
                let id_ab = category.identity(&category.tensor_objects(a, b));
                category
                    .compose(&category.braiding(a, b), &category.braiding(b, a))
                    .map(|composed| composed == id_ab)
                    .unwrap_or(false)
            })
        })
    }

    /// Snake equation: (η_A ⊗ 1_A) ; (1_A ⊗ ε_A) = 1_A
    pub fn verify_compact_closed_laws<C: CompactClosedCategory>(
        category: &C,
        test_objects: &[C::Object],
    ) -> bool {
        if test_objects.is_empty() {
            return false;
        }

        test_objects.iter().all(|a| {
            let id_a = category.identity(a);
            let snake = category.unit_morphism(a).and_then(|unit| {
                let counit = category.counit_morphism(a)?;
                let top = category.tensor_morphisms(&unit, &id_a);
                let bottom = category.tensor_morphisms(&id_a, &counit);
                category.compose(&top, &bottom)
            });
            matches!(snake, Ok(s) if s == id_a)
        })
    }

    /// Involution (f†)† = f and contravariance (f ; g)† = g† ; f†
    pub fn verify_dagger_laws<C: DaggerCategory>(category: &C, test_morphisms: &[C::Morphism]) -> bool {
        if test_morphisms.is_empty() {
            return false;
        }

        let involutive_law = test_morphisms
            .iter()
            .all(|f| category.dagger(&category.dagger(f)) == *f);

        let contravariant_law = test_morphisms.iter().all(|f| {
            test_morphisms.iter().all(|g| match category.compose(f, g) {
                Ok(fg) => category
                    .compose(&category.dagger(g), &category.dagger(f))
                    .map(|rhs| category.dagger(&fg) == rhs)
                    .unwrap_or(false),
                // not composable, vacuously true
                Err(_) => true,
            })
        });

        involutive_law && contravariant_law
    }
}
