use serde::{ser::SerializeMap, Serialize, Serializer};
use serde_json::Value;

use crate::error::ParseError;

/// How the request payload is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    #[default]
    None,
    Raw,
    Urlencoded,
    Multipart,
}

/// Value of a `-F` field: literal text or a `@file` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum FormValue {
    Text(String),
    File { file: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormField {
    pub key: String,
    pub value: FormValue,
}

/// Final payload of a descriptor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestBody {
    Text(String),
    Json(Value),
    Form(Vec<FormField>),
}

/// Ordered header list with unique, case-insensitive names.
///
/// Setting an existing name replaces the value in place and keeps the
/// spelling of the latest write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(Vec<(String, String)>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.position(&name) {
            Some(idx) => self.0[idx] = (name, value),
            None => self.0.push((name, value)),
        }
    }

    /// Sets `name` only when no header of that name exists yet.
    pub fn set_default(&mut self, name: &str, value: &str) {
        if !self.contains(name) {
            self.0.push((name.to_string(), value.to_string()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.0[idx].1.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl Serialize for Headers {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Request under construction while the dispatcher walks the tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDraft {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body_fragments: Vec<String>,
    pub body_type: BodyType,
    pub form_fields: Vec<FormField>,
    pub get_mode: bool,
    pub auth_credential: Option<String>,
    pub explicit_method_set: bool,
}

impl Default for RequestDraft {
    fn default() -> Self {
        Self {
            method: "GET".to_string(),
            url: String::new(),
            headers: Headers::new(),
            body_fragments: Vec::new(),
            body_type: BodyType::None,
            form_fields: Vec::new(),
            get_mode: false,
            auth_credential: None,
            explicit_method_set: false,
        }
    }
}

impl RequestDraft {
    /// Appends a body fragment, inserting `separator` when the body already
    /// holds data.
    pub fn push_fragment(&mut self, separator: &str, fragment: String) {
        if !self.body_fragments.is_empty() && !separator.is_empty() {
            self.body_fragments.push(separator.to_string());
        }
        self.body_fragments.push(fragment);
    }

    pub fn joined_body(&self) -> Option<String> {
        if self.body_fragments.is_empty() {
            None
        } else {
            Some(self.body_fragments.concat())
        }
    }
}

/// Finalized request, ready for execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub method: String,
    pub url: String,
    pub headers: Headers,
    pub body: Option<RequestBody>,
    pub body_type: BodyType,
}

/// Wire shape of a parse attempt: `{ok, request}` or `{ok, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ParseOutcome {
    Parsed { ok: bool, request: RequestDescriptor },
    Failed { ok: bool, error: String },
}

impl From<Result<RequestDescriptor, ParseError>> for ParseOutcome {
    fn from(result: Result<RequestDescriptor, ParseError>) -> Self {
        match result {
            Ok(request) => ParseOutcome::Parsed { ok: true, request },
            Err(e) => ParseOutcome::Failed {
                ok: false,
                error: e.to_string(),
            },
        }
    }
}
