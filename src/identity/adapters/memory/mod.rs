//! In-memory identity adapters for tests and single-process deployments.

mod account;

pub use account::InMemoryUserAccountRepository;
