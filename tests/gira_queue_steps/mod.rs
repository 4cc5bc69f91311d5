//! Step definitions for the walk-in consultation queue scenarios.

pub mod given;
pub mod then;
pub mod when;
pub mod world;
