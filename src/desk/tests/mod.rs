//! Unit tests for the desk module.

mod error_tests;
