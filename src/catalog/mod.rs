//! Catalog of practitioner roles, gira types, and practitioners.
//!
//! These are the reference data a gira is built from: the type of session
//! being held, the people who may be marked present, and the function each
//! of them performs. Creation is an administrator task; listings are public
//! and always ordered by name.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
