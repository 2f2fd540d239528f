//! Upstream user service adapters.
//!
//! This module provides the reqwest implementation of the
//! `UserRecordSource` port.

mod http_source;

pub use http_source::HttpUserRecordSource;
