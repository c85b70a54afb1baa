// mcl_sim/src/simulation/sensors/mod.rs

pub mod odometry;
pub mod vision;
