//! Tax calculation modules.
//!
//! This module provides the progressive bracket engine along with the
//! rounding helpers shared by callers that present its results.

pub mod common;
pub mod engine;

pub use engine::{TaxEngine, compute_tax};
