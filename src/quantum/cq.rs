//! Dimensions of classical-quantum systems
//!
//! A [`CQ`] object pairs a classical dimension with a quantum one. Its
//! tensor product concatenates the two components independently, so the
//! classical slots of `A @ B` come first, then all the quantum slots.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::tensor::Dim;

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CQ {
    pub classical: Dim,
    pub quantum: Dim,
}

impl CQ {
    pub fn new(classical: Dim, quantum: Dim) -> Self {
        CQ { classical, quantum }
    }

    /// The empty system
    pub fn unit() -> Self {
        CQ::default()
    }

    pub fn is_empty(&self) -> bool {
        self.classical.is_empty() && self.quantum.is_empty()
    }

    pub fn tensor(&self, other: &CQ) -> CQ {
        CQ {
            classical: self.classical.tensor(&other.classical),
            quantum: self.quantum.tensor(&other.quantum),
        }
    }

    /// Left dual, reverses both components
    pub fn l(&self) -> CQ {
        CQ {
            classical: self.classical.reversed(),
            quantum: self.quantum.reversed(),
        }
    }

    /// Right dual, equal to the left dual
    pub fn r(&self) -> CQ {
        self.l()
    }

    /// Labelled slots of the underlying monoidal type
    pub fn slots(&self) -> Vec<String> {
        let classical = self.classical.dims().iter().map(|d| format!("C({})", d));
        let quantum = self.quantum.dims().iter().map(|d| format!("Q({})", d));
        classical.chain(quantum).collect()
    }
}

/// A purely classical system
#[allow(non_snake_case)]
pub fn C(dim: Dim) -> CQ {
    CQ::new(dim, Dim::unit())
}

/// A purely quantum system
#[allow(non_snake_case)]
pub fn Q(dim: Dim) -> CQ {
    CQ::new(Dim::unit(), dim)
}

impl fmt::Display for CQ {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.classical.is_empty(), self.quantum.is_empty()) {
            (true, true) => write!(f, "CQ()"),
            (true, false) => write!(f, "Q({})", self.quantum),
            (false, true) => write!(f, "C({})", self.classical),
            (false, false) => write!(f, "C({}) @ Q({})", self.classical, self.quantum),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tensor_groups_components() {
        let a = CQ::new(Dim::new([2]), Dim::new([3]));
        let b = CQ::new(Dim::new([4]), Dim::new([5]));
        let ab = a.tensor(&b);
        assert_eq!(ab.classical, Dim::new([2, 4]));
        assert_eq!(ab.quantum, Dim::new([3, 5]));
        assert_eq!(ab.slots(), vec!["C(2)", "C(4)", "Q(3)", "Q(5)"]);
        assert_eq!(ab.to_string(), "C(Dim(2, 4)) @ Q(Dim(3, 5))");
    }

    #[test]
    fn display_special_cases() {
        assert_eq!(CQ::unit().to_string(), "CQ()");
        assert_eq!(C(Dim::new([2])).to_string(), "C(Dim(2))");
        assert_eq!(Q(Dim::new([2])).to_string(), "Q(Dim(2))");
        assert_eq!(CQ::new(Dim::new([1]), Dim::new([1])), CQ::unit());
    }

    #[test]
    fn duals_reverse_both_components() {
        let a = CQ::new(Dim::new([2, 3]), Dim::new([4, 5]));
        assert_eq!(a.l(), CQ::new(Dim::new([3, 2]), Dim::new([5, 4])));
        assert_eq!(a.l(), a.r());
    }
}
