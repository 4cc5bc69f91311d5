//! Adapter implementations of the gira and queue repository ports.
//!
//! Each backend provides one store type implementing both ports, so a
//! close and an enqueue contend for the same lock.

pub mod memory;
pub mod postgres;
