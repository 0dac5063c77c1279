//! Client records from the backend API.
//!
//! The API is loose about key spelling (`id`/`_id`/`client_id`,
//! `name`/`client_name`/`company_name`) and about id types. Everything is
//! mapped to [`ClientRecord`] here, once, at the boundary.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::chat::core::errors::{ChatError, ChatResult};

const ID_KEYS: [&str; 3] = ["id", "_id", "client_id"];
const NAME_KEYS: [&str; 3] = ["name", "client_name", "company_name"];

/// Canonical client record.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ClientRecord {
    /// Backend identifier, always as text.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Industry label.
    pub industry: Option<String>,
}

fn first_present<'a>(object: &'a Map<String, Value>, keys: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    keys.iter()
        .find_map(|key| object.get(*key).filter(|v| !v.is_null()).map(|v| (*key, v)))
}

fn non_blank(key: &str, value: &Value) -> ChatResult<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Ok(s.trim().to_string()),
        Value::String(_) => Err(ChatError::MalformedRecord(format!("`{key}` is blank"))),
        other => Err(ChatError::MalformedRecord(format!(
            "`{key}` must be a string, got {other}"
        ))),
    }
}

fn optional_text(object: &Map<String, Value>, key: &str) -> ChatResult<Option<String>> {
    match object.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.trim().to_string())),
        Some(other) => Err(ChatError::MalformedRecord(format!(
            "`{key}` must be a string, got {other}"
        ))),
    }
}

/// Map one loosely-typed client payload to a [`ClientRecord`].
///
/// # Errors
/// Returns `MalformedRecord` if the payload is not an object, lacks an id or
/// name under any accepted key, or carries mistyped fields.
pub fn normalize_client(value: &Value) -> ChatResult<ClientRecord> {
    let Value::Object(object) = value else {
        return Err(ChatError::MalformedRecord(format!(
            "client must be an object, got {value}"
        )));
    };

    let id = match first_present(object, &ID_KEYS) {
        Some((_, Value::Number(n))) => n.to_string(),
        Some((key, v)) => non_blank(key, v)?,
        None => {
            return Err(ChatError::MalformedRecord(format!(
                "client has none of {ID_KEYS:?}"
            )));
        }
    };

    let name = match first_present(object, &NAME_KEYS) {
        Some((key, v)) => non_blank(key, v)?,
        None => {
            return Err(ChatError::MalformedRecord(format!(
                "client {id} has none of {NAME_KEYS:?}"
            )));
        }
    };

    Ok(ClientRecord {
        id,
        name,
        email: optional_text(object, "email")?,
        industry: optional_text(object, "industry")?,
    })
}

/// Map a JSON array of client payloads. The first bad entry aborts.
///
/// # Errors
/// Returns `MalformedRecord` if `value` is not an array or any entry is malformed.
pub fn normalize_clients(value: &Value) -> ChatResult<Vec<ClientRecord>> {
    let Value::Array(items) = value else {
        return Err(ChatError::MalformedRecord(
            "client list must be an array".to_string(),
        ));
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            normalize_client(item).map_err(|err| match err {
                ChatError::MalformedRecord(reason) => {
                    ChatError::MalformedRecord(format!("client #{index}: {reason}"))
                }
                other => other,
            })
        })
        .collect()
}

/// Clients whose name, email or industry contains `query`, ignoring case.
#[must_use]
pub fn filter_clients<'a>(records: &'a [ClientRecord], query: &str) -> Vec<&'a ClientRecord> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return records.iter().collect();
    }

    let matches = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&needle));
    records
        .iter()
        .filter(|r| {
            matches(Some(&r.name)) || matches(r.email.as_deref()) || matches(r.industry.as_deref())
        })
        .collect()
}
