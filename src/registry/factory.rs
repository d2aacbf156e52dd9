//! Field factory: builds field instances from registry defaults

use std::sync::Arc;

use super::FieldTypeRegistry;
use crate::error::BuilderError;
use crate::state::{Field, IdGenerator, PageId, RowId};

/// Creates fields (and mints row/page ids) for one builder session
pub struct FieldFactory {
    registry: Arc<FieldTypeRegistry>,
    ids: Box<dyn IdGenerator>,
}

impl std::fmt::Debug for FieldFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldFactory")
            .field("kinds", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl FieldFactory {
    pub fn new(registry: Arc<FieldTypeRegistry>, ids: Box<dyn IdGenerator>) -> Self {
        Self { registry, ids }
    }

    pub fn registry(&self) -> &FieldTypeRegistry {
        &self.registry
    }

    /// Build a field of `kind` owned by `page`.
    ///
    /// The field gets its own copy of the descriptor defaults.
    pub fn create(&mut self, kind: &str, page: &PageId) -> Result<Field, BuilderError> {
        let descriptor = self
            .registry
            .describe(kind)
            .ok_or_else(|| BuilderError::UnknownFieldKind(kind.to_string()))?;
        let defaults = descriptor.defaults.clone();
        let kind = descriptor.kind.clone();

        Ok(Field {
            id: self.ids.field_id(),
            kind,
            page_id: page.clone(),
            label: defaults.label,
            description: defaults.description,
            placeholder: defaults.placeholder,
            required: defaults.required,
            disabled_after_submission: defaults.disabled_after_submission,
            attributes: defaults.attributes,
        })
    }

    pub fn row_id(&mut self) -> RowId {
        self.ids.row_id()
    }

    pub fn page_id(&mut self) -> PageId {
        self.ids.page_id()
    }
}
