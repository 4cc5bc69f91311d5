//! Unit tests for the gira module.

mod poller_tests;
