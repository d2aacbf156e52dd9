//! Identifier newtypes and id generation

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

id_type!(
    /// Identifier of a field instance, stable for the field's lifetime
    FieldId
);
id_type!(
    /// Identifier of a row
    RowId
);
id_type!(
    /// Identifier of a page
    PageId
);

/// The kind of entity an id is minted for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdScope {
    Field,
    Row,
    Page,
}

impl IdScope {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Field => "field",
            Self::Row => "row",
            Self::Page => "page",
        }
    }
}

/// Source of unique identifiers for one builder session.
///
/// Implementations must never return the same id twice for the same scope.
pub trait IdGenerator: Send {
    fn next_id(&mut self, scope: IdScope) -> String;

    /// Called with every id already present when a stored document is
    /// reopened, so later ids cannot collide with it
    fn observe(&mut self, _existing: &str) {}

    fn field_id(&mut self) -> FieldId {
        FieldId(self.next_id(IdScope::Field))
    }

    fn row_id(&mut self) -> RowId {
        RowId(self.next_id(IdScope::Row))
    }

    fn page_id(&mut self) -> PageId {
        PageId(self.next_id(IdScope::Page))
    }
}

/// Monotonic counter ids (`field_1`, `row_1`, `page_1`, ...)
#[derive(Debug, Clone, Default)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self, scope: IdScope) -> String {
        self.next += 1;
        format!("{}_{}", scope.prefix(), self.next)
    }

    fn observe(&mut self, existing: &str) {
        let counter = existing
            .rsplit_once('_')
            .and_then(|(_, n)| n.parse::<u64>().ok());
        if let Some(n) = counter {
            self.next = self.next.max(n);
        }
    }
}

/// Random v4 UUID ids, prefixed by scope
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdGenerator for UuidIds {
    fn next_id(&mut self, scope: IdScope) -> String {
        format!("{}_{}", scope.prefix(), Uuid::new_v4().simple())
    }
}
