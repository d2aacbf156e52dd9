//! Layout model: pages, rows and the field arena

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::field::Field;
use super::ids::{FieldId, PageId, RowId};
use crate::error::LayoutFault;

/// Maximum number of fields sharing a row
pub const MAX_ROW_FIELDS: usize = 2;

/// Width of the grid a row is laid out on
pub const GRID_COLUMNS: u8 = 12;

/// Column width each field gets in a row holding `field_count` fields
pub fn column_width(field_count: usize) -> u8 {
    match field_count {
        2 => GRID_COLUMNS / 2,
        _ => GRID_COLUMNS,
    }
}

/// A horizontal group of one or two fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub id: RowId,
    pub fields: Vec<FieldId>,
    #[serde(default)]
    pub description: String,
}

impl Row {
    pub(crate) fn new(id: RowId, fields: Vec<FieldId>) -> Self {
        Self {
            id,
            fields,
            description: String::new(),
        }
    }

    pub fn is_full(&self) -> bool {
        self.fields.len() >= MAX_ROW_FIELDS
    }

    pub fn columns(&self) -> u8 {
        column_width(self.fields.len())
    }

    pub fn position_of(&self, field: &FieldId) -> Option<usize> {
        self.fields.iter().position(|f| f == field)
    }
}

/// One step of a multi-page form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub rows: Vec<RowId>,
}

impl Page {
    pub(crate) fn new(id: PageId, title: String) -> Self {
        Self {
            id,
            title,
            description: String::new(),
            rows: Vec::new(),
        }
    }
}

/// Where a field currently sits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLocation {
    pub page_id: PageId,
    pub row_id: RowId,
    pub row_index: usize,
    pub field_index: usize,
}

/// The form under construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub form_name: String,
    pub form_slug: String,
    pub(crate) pages: Vec<Page>,
    pub(crate) rows: IndexMap<RowId, Row>,
    pub(crate) fields: IndexMap<FieldId, Field>,
    pub(crate) current_page: PageId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) selected_field: Option<FieldId>,
}

impl Document {
    /// An empty document with a single page
    pub(crate) fn new(first_page: PageId) -> Self {
        Self {
            form_name: String::new(),
            form_slug: String::new(),
            pages: vec![Page::new(first_page.clone(), "Page 1".to_string())],
            rows: IndexMap::new(),
            fields: IndexMap::new(),
            current_page: first_page,
            selected_field: None,
        }
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|p| &p.id == id)
    }

    pub(crate) fn page_mut(&mut self, id: &PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| &p.id == id)
    }

    pub(crate) fn page_index(&self, id: &PageId) -> Option<usize> {
        self.pages.iter().position(|p| &p.id == id)
    }

    pub fn current_page_id(&self) -> &PageId {
        &self.current_page
    }

    /// The page being edited; `None` only for a document that fails its audit
    pub fn current_page(&self) -> Option<&Page> {
        self.page(&self.current_page)
    }

    pub fn row(&self, id: &RowId) -> Option<&Row> {
        self.rows.get(id)
    }

    /// Rows of a page in display order
    pub fn rows_of(&self, page: &PageId) -> Vec<&Row> {
        self.page(page)
            .map(|p| p.rows.iter().filter_map(|id| self.rows.get(id)).collect())
            .unwrap_or_default()
    }

    pub fn field(&self, id: &FieldId) -> Option<&Field> {
        self.fields.get(id)
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// All fields in page/row/field order
    pub fn fields(&self) -> impl Iterator<Item = &Field> + '_ {
        self.pages
            .iter()
            .flat_map(|page| page.rows.iter())
            .filter_map(|row| self.rows.get(row))
            .flat_map(|row| row.fields.iter())
            .filter_map(|field| self.fields.get(field))
    }

    /// Fields of one page in row/field order
    pub fn fields_on(&self, page: &PageId) -> Vec<&Field> {
        self.rows_of(page)
            .into_iter()
            .flat_map(|row| row.fields.iter())
            .filter_map(|field| self.fields.get(field))
            .collect()
    }

    pub fn selected_field_id(&self) -> Option<&FieldId> {
        self.selected_field.as_ref()
    }

    pub fn selected_field(&self) -> Option<&Field> {
        self.selected_field.as_ref().and_then(|id| self.fields.get(id))
    }

    pub fn locate_field(&self, id: &FieldId) -> Option<FieldLocation> {
        let page_id = &self.fields.get(id)?.page_id;
        let page = self.page(page_id)?;
        page.rows.iter().enumerate().find_map(|(row_index, row_id)| {
            let row = self.rows.get(row_id)?;
            row.position_of(id).map(|field_index| FieldLocation {
                page_id: page_id.clone(),
                row_id: row_id.clone(),
                row_index,
                field_index,
            })
        })
    }

    /// True when the row exists and still has room for another field
    pub fn can_add_to_row(&self, page: &PageId, row_index: usize) -> bool {
        self.page(page)
            .and_then(|p| p.rows.get(row_index))
            .and_then(|id| self.rows.get(id))
            .is_some_and(|row| !row.is_full())
    }

    /// Derived column width of a field, from its row's occupancy
    pub fn column_width(&self, field: &FieldId) -> Option<u8> {
        let location = self.locate_field(field)?;
        self.rows.get(&location.row_id).map(Row::columns)
    }

    /// Audit every structural invariant of the layout
    pub fn check_invariants(&self) -> Result<(), LayoutFault> {
        if self.pages.is_empty() {
            return Err(LayoutFault::NoPages);
        }
        let mut page_ids = HashSet::new();
        for page in &self.pages {
            if !page_ids.insert(&page.id) {
                return Err(LayoutFault::DuplicatePage(page.id.clone()));
            }
        }
        if self.page(&self.current_page).is_none() {
            return Err(LayoutFault::DanglingCurrentPage(self.current_page.clone()));
        }
        if let Some((key, row)) = self.rows.iter().find(|(key, row)| &row.id != *key) {
            return Err(LayoutFault::MisfiledRow {
                key: key.clone(),
                id: row.id.clone(),
            });
        }
        if let Some((key, field)) = self.fields.iter().find(|(key, field)| &field.id != *key) {
            return Err(LayoutFault::MisfiledField {
                key: key.clone(),
                id: field.id.clone(),
            });
        }

        let mut row_owners: HashMap<&RowId, usize> = HashMap::new();
        let mut field_pages: HashMap<&FieldId, Vec<&PageId>> = HashMap::new();

        for page in &self.pages {
            for row_id in &page.rows {
                *row_owners.entry(row_id).or_default() += 1;
                let row = self
                    .rows
                    .get(row_id)
                    .ok_or_else(|| LayoutFault::MissingRow(row_id.clone()))?;
                if row.fields.is_empty() || row.fields.len() > MAX_ROW_FIELDS {
                    return Err(LayoutFault::RowOccupancy {
                        row: row_id.clone(),
                        count: row.fields.len(),
                    });
                }
                for field_id in &row.fields {
                    if !self.fields.contains_key(field_id) {
                        return Err(LayoutFault::MissingField(field_id.clone()));
                    }
                    field_pages.entry(field_id).or_default().push(&page.id);
                }
            }
        }

        if let Some(row) = self
            .rows
            .keys()
            .find(|id| row_owners.get(id).copied() != Some(1))
        {
            return Err(LayoutFault::RowOwnership(row.clone()));
        }

        for (id, field) in &self.fields {
            match field_pages.get(id).map(Vec::as_slice) {
                Some([page]) if *page == &field.page_id => {}
                Some([page]) => {
                    return Err(LayoutFault::PageMismatch {
                        field: id.clone(),
                        claimed: field.page_id.clone(),
                        actual: (*page).clone(),
                    })
                }
                _ => return Err(LayoutFault::FieldOwnership(id.clone())),
            }
        }

        if let Some(selected) = &self.selected_field {
            if !self.fields.contains_key(selected) {
                return Err(LayoutFault::DanglingSelection(selected.clone()));
            }
        }

        Ok(())
    }
}
