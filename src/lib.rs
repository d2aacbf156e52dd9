//! Form layout engine
//!
//! Composes multi-page forms out of typed fields arranged in rows of one or
//! two columns, and projects them into a renderer element schema.

pub mod builder;
pub mod config;
pub mod error;
pub mod registry;
pub mod schema;
pub mod state;
pub mod store;

pub use builder::{BuilderContext, DropZone, FormBuilder, FormSnapshot, PagePatch, Side};
pub use config::BuilderConfig;
pub use error::{BuilderError, LayoutFault, ValidationIssue};
pub use registry::{FieldFactory, FieldTypeRegistry};
pub use schema::{project, SchemaDocument};
pub use state::{Document, Field, FieldAttributes, FieldId, FieldPatch, PageId, RowId};
pub use store::{FileStore, FormStore, MemoryStore, StoredId};
