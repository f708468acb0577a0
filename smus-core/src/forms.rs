//! Metadata form normalization and upsert merging.
//!
//! Forms come back from the catalog in two shapes: older responses name the
//! form type `typeName`, newer ones `typeIdentifier`, and content may arrive
//! either as serialized JSON text or as an already decoded mapping. Every
//! ingress point runs [`normalize_forms`] once so the rest of the crate only
//! sees [`MetadataForm`], which is also the shape a revision submits.
//!
//! Within one asset the type identifier is unique. The catalog does not
//! enforce that; [`merge_form`] does, by updating the matching form in place
//! instead of appending a second one.

use crate::{Result, error::SmusError};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Decoded form content: field name to value.
pub type FormContent = Map<String, Value>;

/// A form as it arrives from the service, before normalization.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawForm {
    pub form_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub type_revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

/// A normalized form, ready to be submitted in a revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataForm {
    pub form_name: String,
    pub type_identifier: Option<String>,
    pub type_revision: Option<String>,
    /// Serialized JSON text
    pub content: Option<String>,
}

impl MetadataForm {
    /// Decodes the content leniently: missing or malformed content is empty.
    pub fn content_map(&self) -> FormContent {
        self.content
            .as_deref()
            .and_then(|text| serde_json::from_str::<FormContent>(text).ok())
            .unwrap_or_default()
    }
}

impl From<MetadataForm> for RawForm {
    fn from(form: MetadataForm) -> Self {
        Self {
            form_name: form.form_name,
            type_name: None,
            type_identifier: form.type_identifier,
            type_revision: form.type_revision,
            content: form.content.map(Value::String),
        }
    }
}

/// A form to add to an asset, or to merge into its existing form of the same type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormCandidate {
    pub form_name: String,
    pub type_identifier: String,
    /// JSON object, or JSON text encoding one
    pub content: Value,
}

impl FormCandidate {
    /// Creates a candidate whose form name equals its type identifier.
    pub fn new(type_identifier: impl Into<String>, content: FormContent) -> Self {
        let type_identifier = type_identifier.into();
        Self {
            form_name: type_identifier.clone(),
            type_identifier,
            content: Value::Object(content),
        }
    }

    /// Decodes the candidate content strictly.
    ///
    /// # Errors
    /// Returns `ContentDecode` for malformed JSON text and `InvalidContent`
    /// when the content is not a mapping.
    pub fn decoded_content(&self) -> Result<FormContent> {
        let value = match &self.content {
            Value::String(text) => {
                serde_json::from_str::<Value>(text).map_err(|source| SmusError::ContentDecode {
                    type_identifier: self.type_identifier.clone(),
                    source,
                })?
            }
            other => other.clone(),
        };

        match value {
            Value::Object(map) => Ok(map),
            other => Err(SmusError::InvalidContent {
                type_identifier: self.type_identifier.clone(),
                found: json_kind(&other),
            }),
        }
    }
}

/// Outcome of merging a candidate into a form list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormUpsert {
    /// An existing form of the same type had its content updated
    Updated,
    /// No form of that type existed; a new one was appended
    Added,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Normalizes a single form.
///
/// `typeName` wins over `typeIdentifier` when both are present. Mapping
/// content is serialized to JSON text; text content is kept verbatim.
pub fn normalize_form(raw: RawForm) -> MetadataForm {
    let type_identifier = raw.type_name.or(raw.type_identifier);
    let content = match raw.content {
        None | Some(Value::Null) => None,
        Some(Value::String(text)) => Some(text),
        Some(other) => Some(other.to_string()),
    };

    MetadataForm {
        form_name: raw.form_name,
        type_identifier,
        type_revision: raw.type_revision,
        content,
    }
}

/// Normalizes a full form list, preserving order.
pub fn normalize_forms(raw: impl IntoIterator<Item = RawForm>) -> Vec<MetadataForm> {
    raw.into_iter().map(normalize_form).collect()
}

/// Merges `candidate` into an already normalized form list.
///
/// The first form with the candidate's type identifier gets its content
/// shallow-merged with the candidate's keys winning; otherwise a new form is
/// appended. The returned list is complete and can be submitted as is.
///
/// # Errors
/// Fails only when the candidate content cannot be decoded; existing content
/// that fails to decode is treated as empty.
pub fn merge_form(
    mut forms: Vec<MetadataForm>,
    candidate: &FormCandidate,
) -> Result<(Vec<MetadataForm>, FormUpsert)> {
    let new_content = candidate.decoded_content()?;

    let existing = forms
        .iter_mut()
        .find(|form| form.type_identifier.as_deref() == Some(candidate.type_identifier.as_str()));

    let outcome = match existing {
        Some(form) => {
            let mut merged = form.content_map();
            merged.extend(new_content);
            form.content = Some(Value::Object(merged).to_string());
            FormUpsert::Updated
        }
        None => {
            forms.push(MetadataForm {
                form_name: candidate.form_name.clone(),
                type_identifier: Some(candidate.type_identifier.clone()),
                type_revision: None,
                content: Some(Value::Object(new_content).to_string()),
            });
            FormUpsert::Added
        }
    };

    Ok((forms, outcome))
}

/// Finds a form by its display name.
pub fn find_by_name<'a>(forms: &'a [MetadataForm], form_name: &str) -> Option<&'a MetadataForm> {
    forms.iter().find(|form| form.form_name == form_name)
}
