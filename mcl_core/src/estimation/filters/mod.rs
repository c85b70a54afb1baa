// mcl_core/src/estimation/filters/mod.rs

pub mod mcl;

pub use mcl::MonteCarloLocalization;
