//! Outbound adapters implementing domain ports for external services.
//!
//! - **user_api**: reqwest-backed client for the upstream user service.
//!
//! Adapters are thin translators between domain types and wire formats.
//! They contain no page logic.

pub mod user_api;
