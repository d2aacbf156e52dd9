//! Field type descriptors and the built-in seed table

use crate::state::{FieldAttributes, FieldKind, SelectOption};

/// Static description of a field kind and the defaults new fields copy
#[derive(Debug, Clone, PartialEq)]
pub struct FieldTypeDescriptor {
    pub kind: FieldKind,
    pub label: &'static str,
    pub icon: &'static str,
    pub defaults: FieldDefaults,
}

/// Initial values of a freshly created field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDefaults {
    pub label: String,
    pub description: String,
    pub placeholder: String,
    pub required: bool,
    pub disabled_after_submission: bool,
    pub attributes: FieldAttributes,
}

impl FieldDefaults {
    fn with(attributes: FieldAttributes) -> Self {
        Self {
            label: String::new(),
            description: String::new(),
            placeholder: String::new(),
            required: false,
            disabled_after_submission: false,
            attributes,
        }
    }
}

impl FieldTypeDescriptor {
    pub fn new(
        kind: &str,
        label: &'static str,
        icon: &'static str,
        attributes: FieldAttributes,
    ) -> Self {
        Self {
            kind: FieldKind::new(kind),
            label,
            icon,
            defaults: FieldDefaults::with(attributes),
        }
    }
}

/// Kinds every registry starts with, in palette order
pub fn builtin_descriptors() -> Vec<FieldTypeDescriptor> {
    vec![
        FieldTypeDescriptor::new(
            "text",
            "Text Input",
            "📝",
            FieldAttributes::Text {
                min_length: Some(3),
                max_length: Some(100),
            },
        ),
        FieldTypeDescriptor::new(
            "email",
            "Email",
            "✉️",
            FieldAttributes::Text {
                min_length: None,
                max_length: Some(255),
            },
        ),
        FieldTypeDescriptor::new(
            "textarea",
            "Text Area",
            "📄",
            FieldAttributes::Text {
                min_length: None,
                max_length: Some(1000),
            },
        ),
        FieldTypeDescriptor::new(
            "number",
            "Number",
            "🔢",
            FieldAttributes::Numeric {
                min: None,
                max: None,
                allow_decimal: false,
            },
        ),
        FieldTypeDescriptor::new(
            "select",
            "Dropdown",
            "🔽",
            FieldAttributes::Choice {
                options: vec![
                    SelectOption::new("option_1", "option_1", "Option 1", 0.0),
                    SelectOption::new("option_2", "option_2", "Option 2", 0.0),
                ],
            },
        ),
    ]
}
