//! Input schemas for every request body.
//!
//! A schema reads a `serde_json::Value` field by field and collects every problem it
//! finds as an [`Issue`], so a client gets the full list in one 400 response. Nothing
//! here panics or reaches the store: callers branch on the `Result`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use ts_rs::TS;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CreateBlogInput, SigninInput, SignupInput, UpdateBlogInput};

/// Minimum password length accepted by signup and signin.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Issue
///
/// One field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS, ToSchema)]
#[ts(export)]
pub struct Issue {
    /// Machine-readable kind, e.g. `invalid_type`, `too_small`, `invalid_string`.
    pub code: String,
    /// Field names leading to the offending value. Empty for the body itself.
    pub path: Vec<String>,
    pub message: String,
}

impl Issue {
    fn new(code: &str, path: &[&str], message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            path: path.iter().map(|segment| segment.to_string()).collect(),
            message: message.into(),
        }
    }
}

/// Schema
///
/// Structural parse plus predicate check for a request payload.
pub trait Schema: Sized {
    fn from_value(value: &Value) -> Result<Self, Vec<Issue>>;
}

/// parse
///
/// Entry point used by handlers: raw body bytes in, typed input or issues out.
pub fn parse<T: Schema>(raw: &[u8]) -> Result<T, Vec<Issue>> {
    let value: Value = serde_json::from_slice(raw)
        .map_err(|e| vec![Issue::new("invalid_json", &[], format!("Malformed JSON body: {e}"))])?;
    T::from_value(&value)
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Field reader over one JSON object. Records issues instead of returning early.
struct Fields<'a> {
    object: &'a Map<String, Value>,
    issues: Vec<Issue>,
}

impl<'a> Fields<'a> {
    fn of(value: &'a Value) -> Result<Self, Vec<Issue>> {
        match value {
            Value::Object(object) => Ok(Self {
                object,
                issues: Vec::new(),
            }),
            other => Err(vec![Issue::new(
                "invalid_type",
                &[],
                format!("Expected object, received {}", type_name(other)),
            )]),
        }
    }

    fn string(&mut self, field: &str, required: bool) -> Option<String> {
        match self.object.get(field) {
            None | Some(Value::Null) if required => {
                self.issues.push(Issue::new("invalid_type", &[field], "Required"));
                None
            }
            None | Some(Value::Null) => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => {
                self.issues.push(Issue::new(
                    "invalid_type",
                    &[field],
                    format!("Expected string, received {}", type_name(other)),
                ));
                None
            }
        }
    }

    fn min_len(&mut self, field: &str, value: Option<String>, min: usize) -> Option<String> {
        let value = value?;
        if value.chars().count() < min {
            self.issues.push(Issue::new(
                "too_small",
                &[field],
                format!("String must contain at least {min} character(s)"),
            ));
            return None;
        }
        Some(value)
    }

    fn required(&mut self, field: &str, min: usize) -> Option<String> {
        let value = self.string(field, true);
        self.min_len(field, value, min)
    }

    fn optional(&mut self, field: &str, min: usize) -> Option<String> {
        let value = self.string(field, false);
        self.min_len(field, value, min)
    }

    fn email(&mut self, field: &str) -> Option<String> {
        let value = self.string(field, true)?;
        if !is_email(&value) {
            self.issues
                .push(Issue::new("invalid_string", &[field], "Invalid email"));
            return None;
        }
        Some(value)
    }

    fn uuid(&mut self, field: &str) -> Option<Uuid> {
        let value = self.string(field, true)?;
        match Uuid::parse_str(&value) {
            Ok(id) => Some(id),
            Err(_) => {
                self.issues
                    .push(Issue::new("invalid_string", &[field], "Invalid uuid"));
                None
            }
        }
    }

    /// Returns the collected issues, or builds the value when there are none.
    fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, Vec<Issue>> {
        if !self.issues.is_empty() {
            return Err(self.issues);
        }
        build().ok_or_else(|| vec![Issue::new("custom", &[], "Invalid input")])
    }
}

/// is_email
///
/// Single `@`, non-empty local part, dotted domain without empty labels, no whitespace.
pub fn is_email(candidate: &str) -> bool {
    if candidate.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = candidate.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    let labels: Vec<&str> = domain.split('.').collect();
    labels.len() >= 2 && labels.iter().all(|label| !label.is_empty())
}

impl Schema for SignupInput {
    fn from_value(value: &Value) -> Result<Self, Vec<Issue>> {
        let mut fields = Fields::of(value)?;
        let email = fields.email("email");
        let password = fields.required("password", MIN_PASSWORD_LEN);
        let name = fields.optional("name", 0);
        fields.finish(|| {
            Some(Self {
                email: email?,
                password: password?,
                name,
            })
        })
    }
}

impl Schema for SigninInput {
    fn from_value(value: &Value) -> Result<Self, Vec<Issue>> {
        let mut fields = Fields::of(value)?;
        let email = fields.email("email");
        let password = fields.required("password", MIN_PASSWORD_LEN);
        fields.finish(|| {
            Some(Self {
                email: email?,
                password: password?,
            })
        })
    }
}

impl Schema for CreateBlogInput {
    fn from_value(value: &Value) -> Result<Self, Vec<Issue>> {
        let mut fields = Fields::of(value)?;
        let title = fields.required("title", 1);
        let content = fields.required("content", 1);
        fields.finish(|| {
            Some(Self {
                title: title?,
                content: content?,
            })
        })
    }
}

impl Schema for UpdateBlogInput {
    fn from_value(value: &Value) -> Result<Self, Vec<Issue>> {
        let mut fields = Fields::of(value)?;
        let id = fields.uuid("id");
        let title = fields.optional("title", 1);
        let content = fields.optional("content", 1);
        fields.finish(|| {
            Some(Self {
                id: id?,
                title,
                content,
            })
        })
    }
}
