//! Projection of a form document into the renderer's element schema
//!
//! [`project`] is a pure function of the document: it is recomputed on
//! demand and never cached, so element keys (`field_<n>`) follow the
//! current traversal order and shift when fields are reordered.

use indexmap::IndexMap;
use serde::Serialize;

use crate::state::{Document, Field, FieldAttributes, GRID_COLUMNS};

/// Renderer element type for an internal field kind; unknown kinds pass through
fn element_type(kind: &str) -> &str {
    match kind {
        "text" | "email" | "number" => "text",
        "textarea" => "textarea",
        "select" => "select",
        other => other,
    }
}

/// Input hint for kinds the renderer shows as plain text inputs
fn input_type(kind: &str) -> Option<&'static str> {
    match kind {
        "email" => Some("email"),
        "number" => Some("number"),
        _ => None,
    }
}

/// Schema handed to the form renderer
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaDocument {
    pub schema: IndexMap<String, SchemaElement>,
    pub steps: IndexMap<String, SchemaStep>,
}

impl SchemaDocument {
    pub fn element(&self, key: &str) -> Option<&SchemaElement> {
        self.schema.get(key)
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaElement {
    #[serde(rename = "type")]
    pub element_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<SchemaItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<DisabledRule>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaItem {
    pub value: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisabledRule {
    pub after_submission: bool,
}

/// One wizard step per page
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchemaStep {
    pub label: String,
    pub elements: Vec<String>,
}

/// Project `document` into the renderer schema
pub fn project(document: &Document) -> SchemaDocument {
    let mut out = SchemaDocument::default();
    let mut position = 0usize;

    for (page_index, page) in document.pages().iter().enumerate() {
        let mut elements = Vec::new();
        for row in document.rows_of(&page.id) {
            let columns = row.columns();
            for field in row.fields.iter().filter_map(|id| document.field(id)) {
                position += 1;
                let key = format!("field_{position}");
                out.schema.insert(key.clone(), element(field, columns));
                elements.push(key);
            }
        }
        out.steps.insert(
            format!("page_{}", page_index + 1),
            SchemaStep {
                label: page.title.clone(),
                elements,
            },
        );
    }
    out
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

fn element(field: &Field, columns: u8) -> SchemaElement {
    let kind = field.kind.as_str();
    let items = match &field.attributes {
        FieldAttributes::Choice { options } => Some(
            options
                .iter()
                .map(|o| SchemaItem {
                    value: o.value.clone(),
                    label: o.label.clone(),
                    price: (o.price > 0.0).then_some(o.price),
                })
                .collect(),
        ),
        _ => None,
    };

    SchemaElement {
        element_type: element_type(kind).to_string(),
        input_type: input_type(kind).map(str::to_string),
        label: non_empty(&field.label),
        placeholder: non_empty(&field.placeholder),
        description: non_empty(&field.description),
        columns: (columns < GRID_COLUMNS).then_some(columns),
        rules: rules(field),
        items,
        disabled: field
            .disabled_after_submission
            .then_some(DisabledRule {
                after_submission: true,
            }),
    }
}

/// `|`-joined validation rules, `None` when the field has none
fn rules(field: &Field) -> Option<String> {
    let mut rules = Vec::new();
    if field.required {
        rules.push("required".to_string());
    }
    match &field.attributes {
        FieldAttributes::Text {
            min_length,
            max_length,
        } => {
            if let Some(min) = min_length.filter(|n| *n > 0) {
                rules.push(format!("min:{min}"));
            }
            if let Some(max) = max_length.filter(|n| *n > 0) {
                rules.push(format!("max:{max}"));
            }
        }
        FieldAttributes::Numeric { min, max, .. } => {
            if let Some(min) = min {
                rules.push(format!("min:{min}"));
            }
            if let Some(max) = max {
                rules.push(format!("max:{max}"));
            }
        }
        FieldAttributes::Choice { .. } => {}
    }
    if field.kind.as_str() == "email" {
        rules.push("email".to_string());
    }
    (!rules.is_empty()).then(|| rules.join("|"))
}
