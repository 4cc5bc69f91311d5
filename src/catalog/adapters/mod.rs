//! Adapter implementations of the catalog repository port.

pub mod memory;
pub mod postgres;
