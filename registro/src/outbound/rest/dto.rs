//! Wire shapes that only the REST adapter needs.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Body of `POST /auth/login`.
#[derive(Debug, Serialize)]
pub(super) struct LoginRequestDto<'a> {
    pub user: &'a str,
    pub password: &'a str,
}

/// Login reply; the token may sit at the top level or inside `data`.
#[derive(Debug, Deserialize)]
pub(super) struct LoginResponseDto {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    data: Option<LoginDataDto>,
}

#[derive(Debug, Deserialize)]
struct LoginDataDto {
    #[serde(default)]
    token: Option<String>,
}

impl LoginResponseDto {
    pub fn into_token(self) -> Option<String> {
        self.token
            .or_else(|| self.data.and_then(|data| data.token))
            .filter(|token| !token.trim().is_empty())
    }
}

/// Strip the `{ data, status, message }` envelope when present.
///
/// Some resources answer with the bare record, so anything that is not an
/// object carrying `data` is returned unchanged.
pub(super) fn unwrap_envelope(value: Value) -> Value {
    match value {
        Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

/// The `message` of an error body, joining validation message lists.
pub(super) fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let message = match value.get("message")? {
        Value::String(message) => message.trim().to_owned(),
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    (!message.is_empty()).then_some(message)
}
