// lane_sim/src/simulation/sensors/mod.rs

pub mod lane_camera;
