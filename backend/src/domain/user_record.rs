//! Read-only user record rendered by the detail page.
//!
//! The record is owned by the upstream data source. The console borrows it
//! for display and never enforces invariants on its contents: any attribute
//! may be missing, and timestamps are opaque text.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// User record as returned by "get user by id".
///
/// Wire names follow the upstream payload: `firstName` / `lastName` are
/// camelCase while the timestamps are snake_case.
///
/// # Examples
/// ```
/// use user_console::domain::UserRecord;
///
/// let record: UserRecord = serde_json::from_str(
///     r#"{"email":"a@b.com","firstName":"Ann","created_at":1704067200}"#,
/// )
/// .expect("valid payload");
/// assert_eq!(record.first_name.as_deref(), Some("Ann"));
/// assert_eq!(record.created_at.as_deref(), Some("1704067200"));
/// assert!(record.last_name.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, deserialize_with = "opaque_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "opaque_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(
        rename = "firstName",
        default,
        deserialize_with = "opaque_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub first_name: Option<String>,
    #[serde(
        rename = "lastName",
        default,
        deserialize_with = "opaque_text",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "opaque_text", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "opaque_text", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Accept strings, numbers and booleans as display text; everything else is
/// treated as absent.
fn opaque_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(text)) => Some(text),
        Some(Value::Number(number)) => Some(number.to_string()),
        Some(Value::Bool(flag)) => Some(flag.to_string()),
        _ => None,
    })
}
