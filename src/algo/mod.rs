//! Mesh processing algorithms.
//!
//! - **Bevel**: the tiered, weight-driven bevel and its weight propagation
//! - **Progress**: callbacks for reporting progress of long runs

pub mod bevel;
pub mod progress;

pub use progress::Progress;
