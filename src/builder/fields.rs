//! Field operations: add, update, delete

use tracing::debug;

use super::{insertion_index, FormBuilder, Side};
use crate::error::BuilderError;
use crate::state::{Field, FieldId, FieldPatch, Row};

impl FormBuilder {
    /// Add a field of `kind` to the current page in a row of its own.
    ///
    /// The row goes to `target_row_index` when that is a valid insert position
    /// (`<=` the row count), otherwise to the end of the page. The new field
    /// becomes the selected one.
    pub fn add_field(
        &mut self,
        kind: &str,
        target_row_index: Option<usize>,
    ) -> Result<FieldId, BuilderError> {
        let page_id = self.document.current_page.clone();
        self.page_ref(&page_id)?;
        let field = self.factory.create(kind, &page_id)?;
        let row_id = self.factory.row_id();
        let field_id = field.id.clone();

        let page = self.page_mut(&page_id)?;
        let position = match target_row_index {
            Some(index) if index <= page.rows.len() => index,
            _ => page.rows.len(),
        };
        page.rows.insert(position, row_id.clone());

        self.document
            .rows
            .insert(row_id.clone(), Row::new(row_id, vec![field_id.clone()]));
        self.document.fields.insert(field_id.clone(), field);
        self.document.selected_field = Some(field_id.clone());

        debug!("Added {kind} field {field_id} as row {position} of page {page_id}");
        Ok(field_id)
    }

    /// Add a field of `kind` next to the fields already in row `row_index`
    /// of the current page.
    ///
    /// With an anchor the field goes on `side` of it, otherwise at the row's
    /// start (`Left`) or end (`Right`).
    pub fn add_field_to_row(
        &mut self,
        kind: &str,
        row_index: usize,
        side: Side,
        after_field: Option<&FieldId>,
    ) -> Result<FieldId, BuilderError> {
        let page_id = self.document.current_page.clone();
        let row_id = self.row_id_at(&page_id, row_index)?;
        let row = self.row_ref(&row_id)?;
        if row.is_full() {
            return Err(BuilderError::RowFull { row_index });
        }
        let position = insertion_index(&row.fields, side, after_field)?;

        let field = self.factory.create(kind, &page_id)?;
        let field_id = field.id.clone();
        self.row_mut(&row_id)?.fields.insert(position, field_id.clone());
        self.document.fields.insert(field_id.clone(), field);
        self.document.selected_field = Some(field_id.clone());

        debug!("Added {kind} field {field_id} to row {row_index} at {position}");
        Ok(field_id)
    }

    /// Merge `patch` into a field. Id, page and row membership never change.
    pub fn update_field(&mut self, id: &FieldId, patch: FieldPatch) -> Result<(), BuilderError> {
        let field = self
            .document
            .fields
            .get_mut(id)
            .ok_or_else(|| BuilderError::FieldNotFound(id.clone()))?;

        if let Some(attributes) = &patch.attributes {
            if !field.attributes.same_shape(attributes) {
                return Err(BuilderError::AttributeMismatch {
                    field: id.clone(),
                    expected: field.attributes.shape(),
                });
            }
        }

        patch.apply_envelope(field);
        if let Some(attributes) = patch.attributes {
            field.attributes = attributes;
        }
        Ok(())
    }

    /// Remove a field; its row goes with it when it was the only occupant
    pub fn delete_field(&mut self, id: &FieldId) -> Result<Field, BuilderError> {
        let location = self
            .document
            .locate_field(id)
            .ok_or_else(|| BuilderError::FieldNotFound(id.clone()))?;

        let row = self.row_mut(&location.row_id)?;
        row.fields.remove(location.field_index);
        if row.fields.is_empty() {
            self.document.rows.shift_remove(&location.row_id);
            self.page_mut(&location.page_id)?
                .rows
                .remove(location.row_index);
        }

        if self.document.selected_field.as_ref() == Some(id) {
            self.document.selected_field = None;
        }

        let field = self
            .document
            .fields
            .shift_remove(id)
            .ok_or_else(|| BuilderError::FieldNotFound(id.clone()))?;
        debug!("Deleted field {id}");
        Ok(field)
    }
}
