//! Page operations

use tracing::debug;

use super::FormBuilder;
use crate::error::BuilderError;
use crate::state::{Page, PageId};

/// Partial update for a page; `None` leaves the value unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagePatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl FormBuilder {
    /// Append a new page and switch to it
    pub fn add_page(&mut self) -> PageId {
        let id = self.factory.page_id();
        let title = format!("Page {}", self.document.pages.len() + 1);
        self.document.pages.push(Page::new(id.clone(), title));
        self.document.current_page = id.clone();
        self.document.selected_field = None;
        debug!("Added page {id}");
        id
    }

    pub fn update_page(&mut self, id: &PageId, patch: PagePatch) -> Result<(), BuilderError> {
        let page = self.page_mut(id)?;
        if let Some(title) = patch.title {
            page.title = title;
        }
        if let Some(description) = patch.description {
            page.description = description;
        }
        Ok(())
    }

    /// Delete a page, handing its rows and fields to the first remaining page.
    ///
    /// The only page of a form cannot be deleted.
    pub fn delete_page(&mut self, id: &PageId) -> Result<Page, BuilderError> {
        let index = self
            .document
            .page_index(id)
            .ok_or_else(|| BuilderError::PageNotFound(id.clone()))?;
        if self.document.pages.len() == 1 {
            return Err(BuilderError::LastPageProtected);
        }

        let removed = self.document.pages.remove(index);
        let heir = self.document.pages[0].id.clone();

        let mut moved = 0usize;
        for row_id in &removed.rows {
            let Some(row) = self.document.rows.get(row_id) else {
                continue;
            };
            for field_id in &row.fields {
                if let Some(field) = self.document.fields.get_mut(field_id) {
                    field.page_id = heir.clone();
                    moved += 1;
                }
            }
        }
        self.document.pages[0]
            .rows
            .extend(removed.rows.iter().cloned());

        if &self.document.current_page == id {
            self.document.current_page = heir.clone();
        }
        let selection_visible = self
            .document
            .selected_field()
            .is_some_and(|f| f.page_id == self.document.current_page);
        if !selection_visible {
            self.document.selected_field = None;
        }

        debug!("Deleted page {id}; {moved} fields moved to page {heir}");
        Ok(removed)
    }

    /// Move a page within the page order
    pub fn reorder_pages(&mut self, from: usize, to: usize) -> Result<(), BuilderError> {
        let len = self.document.pages.len();
        for index in [from, to] {
            if index >= len {
                return Err(BuilderError::IndexOutOfRange { index, len });
            }
        }
        if from != to {
            let page = self.document.pages.remove(from);
            self.document.pages.insert(to, page);
        }
        Ok(())
    }

    /// Switch the page being edited; the field selection is dropped
    pub fn select_page(&mut self, id: &PageId) -> Result<(), BuilderError> {
        self.page_ref(id)?;
        self.document.current_page = id.clone();
        self.document.selected_field = None;
        Ok(())
    }
}
