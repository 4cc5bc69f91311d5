//! The front desk: the role-gated surface clients call.
//!
//! [`FrontDesk`] resolves the caller's session token, checks the role an
//! operation needs, and delegates to the identity, catalog, and gira
//! services. Every failure is folded into a [`DeskError`] whose
//! [`DeskErrorKind`] a client can act on; store failures are logged here
//! and reported only as `internal`. [`DeskResponse`] wraps a result into
//! the `{ok, data | error}` envelope sent over the wire.

mod error;
mod front_desk;
mod response;

pub use error::{DeskError, DeskErrorKind, DeskResult};
pub use front_desk::FrontDesk;
pub use response::DeskResponse;

#[cfg(test)]
mod tests;
