//! Error types for builder operations

use std::fmt;

use thiserror::Error;

use crate::state::{FieldId, FieldKind, PageId, RowId};

/// Errors returned by layout engine operations.
///
/// Every variant except `PersistenceFailed` and `Corrupt` is recoverable by the
/// caller adjusting its input; none of them leave the document modified.
#[derive(Debug, Error)]
pub enum BuilderError {
    #[error("unknown field kind: {0}")]
    UnknownFieldKind(String),

    #[error("field not found: {0}")]
    FieldNotFound(FieldId),

    #[error("page not found: {0}")]
    PageNotFound(PageId),

    #[error("row {row_index} already holds the maximum of 2 fields")]
    RowFull { row_index: usize },

    #[error("index {index} out of range (len {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("cannot delete the last remaining page")]
    LastPageProtected,

    #[error("field {field} expects {expected} attributes")]
    AttributeMismatch {
        field: FieldId,
        expected: &'static str,
    },

    #[error("form is not valid: {}", join_issues(.0))]
    ValidationFailed(Vec<ValidationIssue>),

    #[error("persistence failed: {0}")]
    PersistenceFailed(#[source] anyhow::Error),

    #[error("stored form is corrupt: {0}")]
    Corrupt(#[from] LayoutFault),
}

/// A single reason a form cannot be saved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    MissingFormName,
    MissingFormSlug,
    InvalidFormSlug(String),
    MissingLabel { field: FieldId, page: PageId },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingFormName => write!(f, "form name is required"),
            Self::MissingFormSlug => write!(f, "form slug is required"),
            Self::InvalidFormSlug(slug) => write!(f, "form slug {slug:?} is not url-safe"),
            Self::MissingLabel { field, page } => {
                write!(f, "field {field} on page {page} has no label")
            }
        }
    }
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Structural invariant violations.
///
/// These are internal-consistency faults: no sequence of public operations
/// produces them. They surface when auditing a document that came from outside
/// the engine, e.g. a stored snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutFault {
    #[error("document has no pages")]
    NoPages,

    #[error("current page {0} does not exist")]
    DanglingCurrentPage(PageId),

    #[error("page {0} appears more than once")]
    DuplicatePage(PageId),

    #[error("row stored under {key} carries id {id}")]
    MisfiledRow { key: RowId, id: RowId },

    #[error("field stored under {key} carries id {id}")]
    MisfiledField { key: FieldId, id: FieldId },

    #[error("row {row} holds {count} fields")]
    RowOccupancy { row: RowId, count: usize },

    #[error("row {0} is referenced by a page but does not exist")]
    MissingRow(RowId),

    #[error("row {0} is referenced more than once or by no page")]
    RowOwnership(RowId),

    #[error("field {0} is referenced by a row but does not exist")]
    MissingField(FieldId),

    #[error("field {0} does not belong to exactly one row")]
    FieldOwnership(FieldId),

    #[error("field {field} claims page {claimed} but sits on page {actual}")]
    PageMismatch {
        field: FieldId,
        claimed: PageId,
        actual: PageId,
    },

    #[error("selected field {0} does not exist")]
    DanglingSelection(FieldId),

    #[error("field {field} has unregistered kind {kind}")]
    UnregisteredKind { field: FieldId, kind: FieldKind },

    #[error("field {field} of kind {kind} carries {shape} attributes")]
    KindShape {
        field: FieldId,
        kind: FieldKind,
        shape: &'static str,
    },
}
