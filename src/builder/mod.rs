//! Layout engine: the builder session and its operations
//!
//! A [`FormBuilder`] owns one [`Document`] for the lifetime of an editing
//! session. Every operation checks its inputs before touching the document,
//! so an `Err` always leaves the layout exactly as it was.

mod fields;
mod moves;
mod pages;
mod persist;

use std::sync::Arc;

pub use moves::DropZone;
pub use pages::PagePatch;
pub use persist::FormSnapshot;

use crate::error::{BuilderError, LayoutFault};
use crate::registry::{FieldFactory, FieldTypeRegistry};
use crate::state::{
    slugify, Document, FieldId, IdGenerator, Page, PageId, Row, RowId, SequentialIds, UuidIds,
};

/// Placeholder shown in preview urls before a slug exists
const PREVIEW_SLUG_PLACEHOLDER: &str = "form-slug";

/// Side of an anchor field (or of a row) a new field is placed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    Left,
    #[default]
    Right,
}

/// Everything a builder session needs from its surroundings
pub struct BuilderContext {
    pub registry: Arc<FieldTypeRegistry>,
    pub ids: Box<dyn IdGenerator>,
}

impl BuilderContext {
    pub fn new(registry: Arc<FieldTypeRegistry>, ids: Box<dyn IdGenerator>) -> Self {
        Self { registry, ids }
    }

    /// Built-in kinds with random ids
    pub fn builtin() -> Self {
        Self::new(Arc::new(FieldTypeRegistry::builtin()), Box::new(UuidIds))
    }

    /// Built-in kinds with counter ids (`field_1`, `row_2`, ...)
    pub fn sequential() -> Self {
        Self::new(
            Arc::new(FieldTypeRegistry::builtin()),
            Box::new(SequentialIds::new()),
        )
    }
}

/// One editing session over a form document
#[derive(Debug)]
pub struct FormBuilder {
    document: Document,
    factory: FieldFactory,
}

impl FormBuilder {
    /// Start a session on an empty form with one page
    pub fn new(context: BuilderContext) -> Self {
        let mut factory = FieldFactory::new(context.registry, context.ids);
        let document = Document::new(factory.page_id());
        Self { document, factory }
    }

    /// Resume a session on an existing document after auditing its layout
    /// and every field against the registry
    pub fn open(context: BuilderContext, document: Document) -> Result<Self, BuilderError> {
        document.check_invariants()?;
        for field in document.fields.values() {
            context.registry.check_field(field)?;
        }
        let mut ids = context.ids;
        let existing = document
            .pages
            .iter()
            .map(|p| p.id.as_str())
            .chain(document.rows.keys().map(RowId::as_str))
            .chain(document.fields.keys().map(FieldId::as_str));
        for id in existing {
            ids.observe(id);
        }
        Ok(Self {
            document,
            factory: FieldFactory::new(context.registry, ids),
        })
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn registry(&self) -> &FieldTypeRegistry {
        self.factory.registry()
    }

    /// Highlight a field for editing
    pub fn select_field(&mut self, id: &FieldId) -> Result<(), BuilderError> {
        if self.document.field(id).is_none() {
            return Err(BuilderError::FieldNotFound(id.clone()));
        }
        self.document.selected_field = Some(id.clone());
        Ok(())
    }

    pub fn deselect_field(&mut self) {
        self.document.selected_field = None;
    }

    pub fn set_form_name(&mut self, name: &str) {
        self.document.form_name = name.to_string();
    }

    pub fn set_form_slug(&mut self, slug: &str) {
        self.document.form_slug = slug.to_string();
    }

    /// Fill a blank slug from the form name; an existing slug is kept
    pub fn generate_slug(&mut self) {
        if self.document.form_slug.is_empty() && !self.document.form_name.is_empty() {
            self.document.form_slug = slugify(&self.document.form_name);
        }
    }

    /// The slug a save would use: the explicit one, else one derived from the name
    pub fn effective_slug(&self) -> String {
        if self.document.form_slug.trim().is_empty() {
            slugify(&self.document.form_name)
        } else {
            self.document.form_slug.clone()
        }
    }

    /// Public address of the form, e.g. `club.example.test/forms/summer-camp`
    pub fn preview_url(&self, host: &str) -> String {
        let slug = self.effective_slug();
        let slug = if slug.is_empty() {
            PREVIEW_SLUG_PLACEHOLDER
        } else {
            slug.as_str()
        };
        format!("{}/forms/{}", host.trim_end_matches('/'), slug)
    }

    // Lookup helpers shared by the operation modules

    fn page_ref(&self, id: &PageId) -> Result<&Page, BuilderError> {
        self.document
            .page(id)
            .ok_or_else(|| BuilderError::PageNotFound(id.clone()))
    }

    fn page_mut(&mut self, id: &PageId) -> Result<&mut Page, BuilderError> {
        self.document
            .page_mut(id)
            .ok_or_else(|| BuilderError::PageNotFound(id.clone()))
    }

    /// Id of the row at `index` on `page`
    fn row_id_at(&self, page: &PageId, index: usize) -> Result<RowId, BuilderError> {
        let rows = &self.page_ref(page)?.rows;
        rows.get(index)
            .cloned()
            .ok_or(BuilderError::IndexOutOfRange {
                index,
                len: rows.len(),
            })
    }

    fn row_ref(&self, id: &RowId) -> Result<&Row, BuilderError> {
        self.document
            .rows
            .get(id)
            .ok_or_else(|| LayoutFault::MissingRow(id.clone()).into())
    }

    fn row_mut(&mut self, id: &RowId) -> Result<&mut Row, BuilderError> {
        self.document
            .rows
            .get_mut(id)
            .ok_or_else(|| LayoutFault::MissingRow(id.clone()).into())
    }
}

/// Index a new field goes to in `fields`, relative to `anchor` when given
fn insertion_index(
    fields: &[FieldId],
    side: Side,
    anchor: Option<&FieldId>,
) -> Result<usize, BuilderError> {
    match anchor {
        Some(anchor) => {
            let position = fields
                .iter()
                .position(|f| f == anchor)
                .ok_or_else(|| BuilderError::FieldNotFound(anchor.clone()))?;
            Ok(match side {
                Side::Left => position,
                Side::Right => position + 1,
            })
        }
        None => Ok(match side {
            Side::Left => 0,
            Side::Right => fields.len(),
        }),
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    mod session {
        use super::*;

        #[test]
        fn test_new_session_has_one_empty_page() {
            let builder = builder();
            let doc = builder.document();
            assert_eq!(doc.pages().len(), 1);
            assert_eq!(doc.field_count(), 0);
            assert!(doc.selected_field_id().is_none());
            assert_consistent(&builder);
        }

        #[test]
        fn test_open_rejects_corrupt_document() {
            let mut doc = builder().document().clone();
            doc.pages.clear();
            let err = FormBuilder::open(BuilderContext::sequential(), doc).unwrap_err();
            assert!(matches!(err, BuilderError::Corrupt(LayoutFault::NoPages)));
        }

        #[test]
        fn test_open_rejects_payload_of_wrong_shape() {
            let mut builder = builder();
            let id = builder.add_field("select", None).unwrap();
            let mut doc = builder.document().clone();
            doc.fields[&id].attributes = crate::state::FieldAttributes::Text {
                min_length: None,
                max_length: None,
            };
            let err = FormBuilder::open(BuilderContext::sequential(), doc).unwrap_err();
            assert!(matches!(
                err,
                BuilderError::Corrupt(LayoutFault::KindShape { shape: "text", .. })
            ));
        }

        #[test]
        fn test_open_rejects_unregistered_kind() {
            let mut builder = builder();
            let id = builder.add_field("text", None).unwrap();
            let mut doc = builder.document().clone();
            doc.fields[&id].kind = crate::state::FieldKind::new("signature");
            let err = FormBuilder::open(BuilderContext::sequential(), doc).unwrap_err();
            assert!(matches!(
                err,
                BuilderError::Corrupt(LayoutFault::UnregisteredKind { .. })
            ));
        }
    }

    mod selection {
        use super::*;

        #[test]
        fn test_select_and_deselect() {
            let mut builder = builder();
            let first = builder.add_field("text", None).unwrap();
            let second = builder.add_field("text", None).unwrap();
            assert_eq!(builder.document().selected_field_id(), Some(&second));

            builder.select_field(&first).unwrap();
            assert_eq!(builder.document().selected_field().unwrap().id, first);

            builder.deselect_field();
            assert!(builder.document().selected_field().is_none());
        }

        #[test]
        fn test_select_unknown_field() {
            let mut builder = builder();
            let err = builder.select_field(&FieldId::from("nope")).unwrap_err();
            assert!(matches!(err, BuilderError::FieldNotFound(_)));
        }
    }

    mod slug {
        use super::*;

        #[test]
        fn test_generate_slug_fills_blank_slug() {
            let mut builder = builder();
            builder.set_form_name("Summer Camp Registration");
            builder.generate_slug();
            assert_eq!(builder.document().form_slug, "summer-camp-registration");
        }

        #[test]
        fn test_generate_slug_keeps_existing_slug() {
            let mut builder = builder();
            builder.set_form_slug("custom");
            builder.set_form_name("Something Else");
            builder.generate_slug();
            assert_eq!(builder.document().form_slug, "custom");
        }

        #[test]
        fn test_preview_url() {
            let mut builder = builder();
            assert_eq!(
                builder.preview_url("club.example.test/"),
                "club.example.test/forms/form-slug"
            );
            builder.set_form_name("Race Day");
            assert_eq!(
                builder.preview_url("club.example.test"),
                "club.example.test/forms/race-day"
            );
        }
    }

    mod insertion {
        use super::*;

        #[test]
        fn test_insertion_index_without_anchor() {
            let fields = vec![FieldId::from("a")];
            assert_eq!(insertion_index(&fields, Side::Left, None).unwrap(), 0);
            assert_eq!(insertion_index(&fields, Side::Right, None).unwrap(), 1);
        }

        #[test]
        fn test_insertion_index_with_anchor() {
            let fields = vec![FieldId::from("a"), FieldId::from("b")];
            let b = FieldId::from("b");
            assert_eq!(insertion_index(&fields, Side::Left, Some(&b)).unwrap(), 1);
            assert_eq!(insertion_index(&fields, Side::Right, Some(&b)).unwrap(), 2);
        }

        #[test]
        fn test_insertion_index_missing_anchor() {
            let fields = vec![FieldId::from("a")];
            let err = insertion_index(&fields, Side::Left, Some(&FieldId::from("z"))).unwrap_err();
            assert!(matches!(err, BuilderError::FieldNotFound(id) if id.as_str() == "z"));
        }
    }
}
