//! Category theory abstractions
//!
//! The tensor category and the category of classical-quantum maps share
//! one tower of traits, so circuits can be sent to either by a
//! [`DiagramFunctor`].

pub mod functor;
pub mod monoidal;

pub use monoidal::{
    Category, CompactClosedCategory, DaggerCategory, DaggerCompactCategory, MonoidalCategory,
    SymmetricMonoidalCategory,
};

pub use functor::DiagramFunctor;

/// Verification of category laws on sample data
pub mod laws {
    pub use super::monoidal::laws::{
        verify_category_laws, verify_compact_closed_laws, verify_dagger_laws,
        verify_monoidal_laws, verify_symmetric_monoidal_laws,
    };
}

/// Re-export commonly used traits
pub mod prelude {
    pub use super::{
        Category, CompactClosedCategory, DaggerCategory, DaggerCompactCategory, DiagramFunctor,
        MonoidalCategory, SymmetricMonoidalCategory,
    };
}
