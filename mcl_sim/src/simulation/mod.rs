// mcl_sim/src/simulation/mod.rs

pub mod config;
pub mod core;
pub mod debugging;
pub mod runner;
pub mod sensors;
pub mod world;
