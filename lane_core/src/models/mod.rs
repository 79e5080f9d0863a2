// lane_core/src/models/mod.rs

pub mod lane;
