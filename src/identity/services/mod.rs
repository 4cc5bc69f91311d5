//! Application services for authentication and session tokens.

mod auth;
mod token;

pub use auth::{AuthService, AuthServiceError, AuthServiceResult, CreateUserRequest, LoginOutcome};
pub use token::{
    DEFAULT_TOKEN_TTL_HOURS, MAX_TOKEN_TTL_HOURS, SessionToken, TokenCodec, TokenError,
};
