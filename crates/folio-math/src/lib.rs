//! # Folio Math
//!
//! Numerical utilities for the Folio portfolio analytics workspace.
//!
//! This crate provides:
//!
//! - **Solvers**: Root-finding algorithms (Bisection, Hybrid Newton-Raphson)
//!
//! ## Design Philosophy
//!
//! - **Bounded**: Every loop runs under an explicit iteration cap
//! - **Deterministic**: The same inputs always take the same path, so failure
//!   modes are reproducible
//! - **Explicit failure**: Non-convergence is an error value, never a guess

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]

pub mod error;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{bisection, find_bracket, hybrid, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
