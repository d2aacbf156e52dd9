//! Field instances and their kind-specific attributes

use serde::{Deserialize, Serialize};

use super::ids::{FieldId, PageId};

/// Kind identifier of a field, as registered in the field type registry
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldKind(String);

impl FieldKind {
    pub fn new(kind: &str) -> Self {
        Self(kind.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for FieldKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One option of a choice field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectOption {
    pub id: String,
    pub value: String,
    pub label: String,
    /// Surcharge attached to the option; 0 means free
    #[serde(default)]
    pub price: f64,
}

impl SelectOption {
    pub fn new(id: &str, value: &str, label: &str, price: f64) -> Self {
        Self {
            id: id.to_string(),
            value: value.to_string(),
            label: label.to_string(),
            price,
        }
    }
}

/// Kind-specific attribute payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum FieldAttributes {
    /// String length bounds
    #[serde(rename_all = "camelCase")]
    Text {
        min_length: Option<u32>,
        max_length: Option<u32>,
    },
    /// Numeric value bounds
    #[serde(rename_all = "camelCase")]
    Numeric {
        min: Option<f64>,
        max: Option<f64>,
        allow_decimal: bool,
    },
    /// Ordered list of selectable options
    Choice { options: Vec<SelectOption> },
}

impl FieldAttributes {
    /// Name of the payload shape, used in error messages
    pub fn shape(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Numeric { .. } => "numeric",
            Self::Choice { .. } => "choice",
        }
    }

    pub fn same_shape(&self, other: &Self) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A field placed on a form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub id: FieldId,
    pub kind: FieldKind,
    pub page_id: PageId,
    pub label: String,
    pub description: String,
    pub placeholder: String,
    pub required: bool,
    pub disabled_after_submission: bool,
    pub attributes: FieldAttributes,
}

impl Field {
    pub fn has_label(&self) -> bool {
        !self.label.trim().is_empty()
    }

    /// Options of a choice field (empty for other shapes)
    pub fn options(&self) -> &[SelectOption] {
        match &self.attributes {
            FieldAttributes::Choice { options } => options,
            _ => &[],
        }
    }
}

/// Partial update for a field; `None` leaves the value unchanged
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldPatch {
    pub label: Option<String>,
    pub description: Option<String>,
    pub placeholder: Option<String>,
    pub required: Option<bool>,
    pub disabled_after_submission: Option<bool>,
    /// Replacement payload; must have the same shape as the field's current one
    pub attributes: Option<FieldAttributes>,
}

impl FieldPatch {
    pub fn label(label: &str) -> Self {
        Self {
            label: Some(label.to_string()),
            ..Default::default()
        }
    }

    /// Apply the shared envelope changes; the payload is handled by the caller
    pub(crate) fn apply_envelope(&self, field: &mut Field) {
        if let Some(label) = &self.label {
            field.label = label.clone();
        }
        if let Some(description) = &self.description {
            field.description = description.clone();
        }
        if let Some(placeholder) = &self.placeholder {
            field.placeholder = placeholder.clone();
        }
        if let Some(required) = self.required {
            field.required = required;
        }
        if let Some(disabled) = self.disabled_after_submission {
            field.disabled_after_submission = disabled;
        }
    }
}
