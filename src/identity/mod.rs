//! Identity and session tokens for Terreiro.
//!
//! This module is the authentication collaborator consumed by every desk
//! operation: it owns user accounts, verifies email/password credentials,
//! issues signed session tokens with a fixed validity window, and resolves a
//! token back to the caller's identity (user id and access role). The module
//! follows hexagonal architecture:
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
