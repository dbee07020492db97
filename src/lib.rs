//! Classical-quantum maps and circuit evaluation
//!
//! This crate implements the category of classical-quantum maps, the
//! functors sending bit and qubit circuits into it, and an evaluation
//! pipeline producing exact maps, Born-rule probability tables or counts
//! sampled through a backend.

pub mod category;
pub mod config;
pub mod error;
pub mod quantum;
pub mod simulators;

pub use config::CountsParams;
pub use error::{CqError, Result};
pub use quantum::{Circuit, CQMap, Dim, Tensor, Ty, CQ};

pub mod prelude {
    pub use crate::category::prelude::*;
    pub use crate::config::CountsParams;
    pub use crate::error::{CqError, Result};
    pub use crate::quantum::prelude::*;
    pub use crate::simulators::{Backend, Counts, SamplingBackend};
}

// Version and crate information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
