//! Reductions over a `ProjectionResult`.
//!
//! Nothing here mutates the result; every function derives a new value
//! from it.

pub mod extinction;
pub mod summary;

pub use extinction::{
    quasi_extinction_probability, risk_curve, ExtinctionCriterion, QuasiExtinctionResult,
};
pub use summary::{summarize_years, YearSummary};
