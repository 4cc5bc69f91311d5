//! Terreiro: walk-in consultation queue for giras.
//!
//! A gira is a session held by a group of practitioners. While it is open,
//! consultants arrive, take a numbered ticket, wait, and are called to a
//! practitioner. This crate manages that lifecycle: opening and closing
//! giras, recording which practitioners are present, and running the
//! consultation queue with strictly increasing per-gira sequence numbers.
//!
//! # Architecture
//!
//! Terreiro follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//!
//! # Modules
//!
//! - [`identity`]: User accounts, login, and session tokens
//! - [`catalog`]: Practitioner roles, gira types, and practitioners
//! - [`gira`]: Gira lifecycle, presence, and the queue engine
//! - [`desk`]: Role-gated operation surface with a uniform error taxonomy
//! - [`config`], [`telemetry`], [`storage`]: Runtime wiring

pub mod catalog;
pub mod config;
pub mod desk;
pub mod gira;
pub mod identity;
pub mod storage;
pub mod telemetry;
