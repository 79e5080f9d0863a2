// lane_sim/src/simulation/core/mod.rs

pub mod prng;
pub mod runner;
pub mod trajectory;
