//! # Credential Contents
//!
//! The typed view of a credential body and its conversion to and from the
//! JSON map that gets signed.
//!
//! ## Wire Shape
//!
//! - Absent optional fields are omitted, never written as `null` or `""`.
//! - `type`, `credentialSubject`, `credentialSchema`, and `credentialStatus`
//!   serialize a single entry as a bare value and several as an array.
//!   Parsing accepts both.
//! - Dates render as `YYYY-MM-DDTHH:MM:SS.fffZ`.

use credkit_core::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::VcError;

/// One `@context` entry: a context IRI or an inline context definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContextEntry {
    Iri(String),
    Definition(Map<String, Value>),
}

impl From<&str> for ContextEntry {
    fn from(iri: &str) -> Self {
        ContextEntry::Iri(iri.to_string())
    }
}

impl ContextEntry {
    fn to_value(&self) -> Value {
        match self {
            ContextEntry::Iri(iri) => Value::String(iri.clone()),
            ContextEntry::Definition(map) => Value::Object(map.clone()),
        }
    }
}

/// A `credentialSubject` entry. Everything except `id` lives in
/// `custom_fields`, in document order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Subject {
    pub id: Option<String>,
    pub custom_fields: Map<String, Value>,
}

impl Subject {
    pub fn with_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            custom_fields: Map::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.custom_fields.insert(name.into(), value.into());
        self
    }

    fn to_value(&self) -> Value {
        let mut obj = Map::new();
        if let Some(id) = self.id.as_deref().filter(|s| !s.is_empty()) {
            obj.insert("id".into(), Value::String(id.to_string()));
        }
        for (k, v) in &self.custom_fields {
            if k != "id" {
                obj.insert(k.clone(), v.clone());
            }
        }
        Value::Object(obj)
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        let mut custom_fields = obj.clone();
        let id = match custom_fields.remove("id") {
            Some(Value::String(id)) => Some(id),
            _ => None,
        };
        Self { id, custom_fields }
    }
}

/// A `credentialSchema` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Schema {
    pub id: String,
    pub schema_type: String,
}

impl Schema {
    pub fn new(id: impl Into<String>, schema_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            schema_type: schema_type.into(),
        }
    }

    fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("id".into(), Value::String(self.id.clone()));
        if !self.schema_type.is_empty() {
            obj.insert("type".into(), Value::String(self.schema_type.clone()));
        }
        Value::Object(obj)
    }

    fn from_value(value: &Value) -> Result<Self, VcError> {
        match value {
            Value::String(id) => Ok(Self::new(id.clone(), "")),
            Value::Object(obj) => Ok(Self {
                id: string_field(obj, "id").unwrap_or_default(),
                schema_type: string_field(obj, "type").unwrap_or_default(),
            }),
            other => Err(invalid(format!("unsupported credentialSchema entry: {}", kind(other)))),
        }
    }
}

/// A `credentialStatus` entry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Status {
    pub id: Option<String>,
    pub status_type: Option<String>,
    pub status_purpose: Option<String>,
    pub status_list_index: Option<String>,
    pub status_list_credential: Option<String>,
}

impl Status {
    fn fields(&self) -> [(&'static str, &Option<String>); 5] {
        [
            ("id", &self.id),
            ("type", &self.status_type),
            ("statusPurpose", &self.status_purpose),
            ("statusListIndex", &self.status_list_index),
            ("statusListCredential", &self.status_list_credential),
        ]
    }

    fn to_value(&self) -> Value {
        let obj = self
            .fields()
            .into_iter()
            .filter_map(|(name, value)| {
                value
                    .as_deref()
                    .filter(|s| !s.is_empty())
                    .map(|s| (name.to_string(), Value::String(s.to_string())))
            })
            .collect();
        Value::Object(obj)
    }

    fn from_object(obj: &Map<String, Value>) -> Self {
        Self {
            id: string_field(obj, "id"),
            status_type: string_field(obj, "type"),
            status_purpose: string_field(obj, "statusPurpose"),
            status_list_index: string_field(obj, "statusListIndex"),
            status_list_credential: string_field(obj, "statusListCredential"),
        }
    }
}

/// The typed body of a W3C Verifiable Credential.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CredentialContents {
    pub context: Vec<ContextEntry>,
    pub id: Option<String>,
    pub types: Vec<String>,
    pub issuer: Option<String>,
    pub valid_from: Option<Timestamp>,
    pub valid_until: Option<Timestamp>,
    pub credential_status: Vec<Status>,
    pub subject: Vec<Subject>,
    pub schemas: Vec<Schema>,
}

impl CredentialContents {
    fn id(&self) -> Option<&str> {
        self.id.as_deref().filter(|s| !s.is_empty())
    }

    /// Issuer DID, if set and non-empty.
    pub fn issuer(&self) -> Option<&str> {
        self.issuer.as_deref().filter(|s| !s.is_empty())
    }

    /// `id` of the first subject, the JWT `sub` claim.
    pub fn first_subject_id(&self) -> Option<&str> {
        self.subject.first()?.id.as_deref().filter(|s| !s.is_empty())
    }

    /// The JSON map form.
    ///
    /// # Errors
    ///
    /// [`VcError::InvalidContents`] when none of context, id, and issuer is
    /// set, or when a context entry is invalid.
    pub fn to_map(&self) -> Result<Map<String, Value>, VcError> {
        if self.context.is_empty() && self.id().is_none() && self.issuer().is_none() {
            return Err(invalid("credential needs at least one of @context, id, issuer"));
        }

        let mut map = Map::new();
        if !self.context.is_empty() {
            validate_context(&self.context)?;
            let entries = self.context.iter().map(ContextEntry::to_value).collect();
            map.insert("@context".into(), Value::Array(entries));
        }
        if let Some(id) = self.id() {
            map.insert("id".into(), Value::String(id.to_string()));
        }
        if !self.types.is_empty() {
            map.insert(
                "type".into(),
                one_or_many(self.types.iter().cloned().map(Value::String).collect()),
            );
        }
        if let Some(issuer) = self.issuer() {
            map.insert("issuer".into(), Value::String(issuer.to_string()));
        }
        if let Some(from) = &self.valid_from {
            map.insert("validFrom".into(), Value::String(from.to_rfc3339_millis()));
        }
        if let Some(until) = &self.valid_until {
            map.insert("validUntil".into(), Value::String(until.to_rfc3339_millis()));
        }
        if !self.subject.is_empty() {
            map.insert(
                "credentialSubject".into(),
                one_or_many(self.subject.iter().map(Subject::to_value).collect()),
            );
        }
        if !self.schemas.is_empty() {
            map.insert(
                "credentialSchema".into(),
                one_or_many(self.schemas.iter().map(Schema::to_value).collect()),
            );
        }
        if !self.credential_status.is_empty() {
            map.insert(
                "credentialStatus".into(),
                one_or_many(self.credential_status.iter().map(Status::to_value).collect()),
            );
        }
        Ok(map)
    }

    /// Read the typed view back out of a credential map. Unknown top-level
    /// members are ignored.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, VcError> {
        let mut contents = CredentialContents {
            id: string_field(map, "id"),
            issuer: string_field(map, "issuer"),
            valid_from: date_field(map, "validFrom")?,
            valid_until: date_field(map, "validUntil")?,
            ..Default::default()
        };

        match present(map, "@context") {
            None => {}
            Some(Value::String(iri)) => contents.context.push(ContextEntry::Iri(iri.clone())),
            Some(Value::Array(entries)) => {
                for entry in entries {
                    contents.context.push(match entry {
                        Value::String(iri) => ContextEntry::Iri(iri.clone()),
                        Value::Object(def) => ContextEntry::Definition(def.clone()),
                        other => return Err(invalid(format!("unsupported @context entry: {}", kind(other)))),
                    });
                }
            }
            Some(other) => return Err(invalid(format!("unsupported @context: {}", kind(other)))),
        }

        match present(map, "type") {
            None => {}
            Some(Value::String(t)) => contents.types.push(t.clone()),
            Some(Value::Array(types)) => {
                contents.types = types.iter().filter_map(Value::as_str).map(str::to_string).collect();
            }
            Some(other) => return Err(invalid(format!("unsupported type: {}", kind(other)))),
        }

        match present(map, "credentialSubject") {
            None => {}
            Some(Value::String(id)) => contents.subject.push(Subject::with_id(id.clone())),
            Some(Value::Object(obj)) => contents.subject.push(Subject::from_object(obj)),
            Some(Value::Array(items)) => {
                for item in items {
                    let obj = item.as_object().ok_or_else(|| {
                        invalid(format!("unsupported credentialSubject entry: {}", kind(item)))
                    })?;
                    contents.subject.push(Subject::from_object(obj));
                }
            }
            Some(other) => return Err(invalid(format!("unsupported credentialSubject: {}", kind(other)))),
        }

        match present(map, "credentialSchema") {
            None => {}
            Some(obj @ Value::Object(_)) => contents.schemas.push(Schema::from_value(obj)?),
            Some(Value::Array(items)) => {
                contents.schemas = items.iter().map(Schema::from_value).collect::<Result<_, _>>()?;
            }
            Some(other) => return Err(invalid(format!("unsupported credentialSchema: {}", kind(other)))),
        }

        match present(map, "credentialStatus") {
            None => {}
            Some(Value::Object(obj)) => contents.credential_status.push(Status::from_object(obj)),
            Some(Value::Array(items)) => {
                for item in items {
                    let obj = item.as_object().ok_or_else(|| {
                        invalid(format!("unsupported credentialStatus entry: {}", kind(item)))
                    })?;
                    contents.credential_status.push(Status::from_object(obj));
                }
            }
            Some(other) => return Err(invalid(format!("unsupported credentialStatus: {}", kind(other)))),
        }

        Ok(contents)
    }
}

/// Reject context entries that cannot be processed: empty IRIs, nested
/// `@context`, empty keys, and empty string values.
pub fn validate_context(entries: &[ContextEntry]) -> Result<(), VcError> {
    for (i, entry) in entries.iter().enumerate() {
        match entry {
            ContextEntry::Iri(iri) if iri.is_empty() => {
                return Err(invalid(format!("context entry {i} is an empty string")));
            }
            ContextEntry::Iri(_) => {}
            ContextEntry::Definition(def) => {
                if def.contains_key("@context") {
                    return Err(invalid(format!("context entry {i} contains a nested @context")));
                }
                for (key, value) in def {
                    if key.is_empty() {
                        return Err(invalid(format!("context entry {i} has an empty key")));
                    }
                    if value.as_str() == Some("") {
                        return Err(invalid(format!("context entry {i} maps {key:?} to an empty string")));
                    }
                }
            }
        }
    }
    Ok(())
}

fn invalid(msg: impl Into<String>) -> VcError {
    VcError::InvalidContents(msg.into())
}

fn one_or_many(mut values: Vec<Value>) -> Value {
    if values.len() == 1 {
        values.remove(0)
    } else {
        Value::Array(values)
    }
}

/// A member that is present and not `null`.
fn present<'m>(map: &'m Map<String, Value>, key: &str) -> Option<&'m Value> {
    map.get(key).filter(|v| !v.is_null())
}

fn string_field(map: &Map<String, Value>, key: &str) -> Option<String> {
    map.get(key).and_then(Value::as_str).map(str::to_string)
}

fn date_field(map: &Map<String, Value>, key: &str) -> Result<Option<Timestamp>, VcError> {
    match map.get(key).and_then(Value::as_str) {
        Some(raw) => Timestamp::parse(raw)
            .map(Some)
            .map_err(|e| invalid(format!("{key}: {e}"))),
        None => Ok(None),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
