//! HTTP inbound adapter: console pages, sign-in and health checks.

pub mod access_gate;
pub mod error;
pub mod health;
pub mod html;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod user_detail;
pub mod users;

pub use error::ApiResult;
