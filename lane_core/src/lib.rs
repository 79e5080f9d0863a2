// lane_core/src/lib.rs

// This file defines the public modules of your library.
pub mod error;
pub mod estimation;
pub mod state;
pub mod models;
pub mod prelude;
pub mod types;
