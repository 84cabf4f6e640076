//! The record returned by the server after a successful submit.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Server-returned profile record.
///
/// The payload is kept verbatim: unknown keys survive a save/load cycle and
/// are sent back unchanged by the report actions.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionResult(Map<String, Value>);

impl SubmissionResult {
    /// Text form of a top-level key. Numbers and booleans are rendered,
    /// missing and null values become an empty string.
    pub fn text(&self, key: &str) -> String {
        value_text(self.0.get(key))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TryFrom<Value> for SubmissionResult {
    type Error = Value;

    /// Only JSON objects are records; anything else is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

/// Read-only projection of a record, as shown on the report page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProfileView {
    pub email: String,
    pub name: String,
    pub age: String,
    pub role: String,
    pub companyname: String,
    pub image: Option<String>,
}

impl From<&SubmissionResult> for ProfileView {
    fn from(record: &SubmissionResult) -> Self {
        let image = record.text("image");
        Self {
            email: record.text("email"),
            name: record.text("name"),
            age: record.text("age"),
            role: record.text("role"),
            companyname: record.text("companyname"),
            image: (!image.is_empty()).then_some(image),
        }
    }
}

pub(crate) fn value_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
