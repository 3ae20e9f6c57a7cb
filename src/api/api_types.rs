//! Serde types matching backend responses.
//!
//! The list endpoint is decoded in two steps so that a well-formed JSON body
//! with the wrong shape can be told apart from a transport failure.

use crate::api::types::User;
use crate::sync::SyncError;
use serde_json::Value;

/// Decode a list response body into users.
///
/// Anything other than a JSON array of user objects is a `BadResponseShape`.
pub fn decode_user_list(body: &str) -> Result<Vec<User>, SyncError> {
  let value: Value = serde_json::from_str(body)
    .map_err(|e| SyncError::BadResponseShape(format!("invalid JSON: {}", e)))?;

  if !value.is_array() {
    return Err(SyncError::BadResponseShape(format!(
      "expected an array, got {}",
      value_kind(&value)
    )));
  }

  serde_json::from_value(value).map_err(|e| SyncError::BadResponseShape(e.to_string()))
}

/// Pull the id out of a mutation response for logging, if there is one
pub fn response_id(body: &str) -> Option<u64> {
  serde_json::from_str::<Value>(body)
    .ok()?
    .get("id")?
    .as_u64()
}

fn value_kind(value: &Value) -> &'static str {
  match value {
    Value::Null => "null",
    Value::Bool(_) => "a boolean",
    Value::Number(_) => "a number",
    Value::String(_) => "a string",
    Value::Array(_) => "an array",
    Value::Object(_) => "an object",
  }
}
