//! Driven port for "get user by id".
//!
//! The detail page treats the source as an opaque collaborator: whatever
//! error it returns is shown to the operator unchanged. Transport, caching and
//! retry concerns belong to adapters and to the record cache.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::domain::{RecordKey, UserRecord};

use super::define_port_error;

define_port_error! {
    /// Failures raised while loading a user record.
    pub enum UserRecordSourceError {
        /// The source has no record for the identifier.
        NotFound { id: String } => "user {id} was not found",
        /// The upstream answered with a non-success status.
        Status { status: u16, message: String } =>
            "user service responded with status {status}: {message}",
        /// The request did not complete.
        Transport { message: String } => "user service request failed: {message}",
        /// The response body could not be decoded.
        Decode { message: String } => "user service returned an invalid payload: {message}",
    }
}

/// Port for reading a single user record.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRecordSource: Send + Sync {
    /// Load the record keyed by `key`.
    async fn get_user_by_id(&self, key: &RecordKey) -> Result<UserRecord, UserRecordSourceError>;
}

/// In-memory source used for local runs and tests.
#[derive(Debug, Clone)]
pub struct FixtureUserRecordSource {
    records: HashMap<String, UserRecord>,
}

impl FixtureUserRecordSource {
    /// Source holding no records.
    pub fn empty() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    /// Add or replace the record served for `id`.
    #[must_use]
    pub fn with_record(mut self, id: impl Into<String>, record: UserRecord) -> Self {
        self.records.insert(id.into(), record);
        self
    }
}

impl Default for FixtureUserRecordSource {
    fn default() -> Self {
        Self::empty()
            .with_record(
                "1",
                UserRecord {
                    id: Some("1".to_owned()),
                    email: Some("ada@example.com".to_owned()),
                    first_name: Some("Ada".to_owned()),
                    last_name: Some("Lovelace".to_owned()),
                    created_at: Some("2024-01-01T09:00:00Z".to_owned()),
                    updated_at: Some("2024-03-15T17:30:00Z".to_owned()),
                },
            )
            .with_record(
                "2",
                UserRecord {
                    id: Some("2".to_owned()),
                    email: Some("grace@example.com".to_owned()),
                    first_name: Some("Grace".to_owned()),
                    last_name: None,
                    created_at: Some("2024-02-02T08:15:00Z".to_owned()),
                    updated_at: None,
                },
            )
    }
}

#[async_trait]
impl UserRecordSource for FixtureUserRecordSource {
    async fn get_user_by_id(&self, key: &RecordKey) -> Result<UserRecord, UserRecordSourceError> {
        self.records
            .get(key.as_str())
            .cloned()
            .ok_or_else(|| UserRecordSourceError::not_found(key.as_str()))
    }
}
