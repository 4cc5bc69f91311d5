//! Giras, presence, and the walk-in consultation queue.
//!
//! This is the core of Terreiro. Administrators open and close giras and
//! mark which practitioners are present; the front desk registers
//! consultants into a per-gira sequence, assigns them to practitioners, and
//! tracks each consultation to completion. Consistency under concurrent
//! front-desk use comes from the store ports, which number entries, close
//! giras, and apply status changes atomically.
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
