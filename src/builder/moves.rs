//! Field relocation and row ordering
//!
//! Moves work on ids, not positions: the target row and anchor are resolved
//! before the field is detached, so deleting an emptied source row never
//! shifts the destination.

use tracing::debug;

use super::{insertion_index, FormBuilder, Side};
use crate::error::{BuilderError, LayoutFault};
use crate::state::{FieldId, FieldLocation, PageId, Row, RowId};

/// Where a dragged field is dropped relative to the target row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropZone {
    /// Into the target row, left of the anchor (or at the row start)
    Left,
    /// Into the target row, right of the anchor (or at the row end)
    Right,
    /// Into a new row directly below the target row
    Center,
}

impl From<Side> for DropZone {
    fn from(side: Side) -> Self {
        match side {
            Side::Left => Self::Left,
            Side::Right => Self::Right,
        }
    }
}

impl DropZone {
    fn side(self) -> Option<Side> {
        match self {
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
            Self::Center => None,
        }
    }
}

impl FormBuilder {
    /// Move a field to row `to_row_index` of the current page.
    ///
    /// See [`FormBuilder::move_field_to_page`].
    pub fn move_field(
        &mut self,
        id: &FieldId,
        to_row_index: usize,
        zone: DropZone,
        to_field: Option<&FieldId>,
    ) -> Result<FieldLocation, BuilderError> {
        let page = self.document.current_page.clone();
        self.move_field_to_page(id, &page, to_row_index, zone, to_field)
    }

    /// Move a field to row `to_row_index` of `page`.
    ///
    /// `to_row_index` is read against the layout before the move. A row index
    /// equal to the row count appends a new row. `Left`/`Right` drops join the
    /// target row when it has room and otherwise open a new row right below
    /// it; `Center` always opens a new row below the target. An anchor given
    /// with any zone must sit in the target row. A source row left empty is
    /// removed.
    pub fn move_field_to_page(
        &mut self,
        id: &FieldId,
        page: &PageId,
        to_row_index: usize,
        zone: DropZone,
        to_field: Option<&FieldId>,
    ) -> Result<FieldLocation, BuilderError> {
        let source = self
            .document
            .locate_field(id)
            .ok_or_else(|| BuilderError::FieldNotFound(id.clone()))?;

        let target_rows = &self.page_ref(page)?.rows;
        if to_row_index > target_rows.len() {
            return Err(BuilderError::IndexOutOfRange {
                index: to_row_index,
                len: target_rows.len(),
            });
        }
        let target = target_rows.get(to_row_index).cloned();

        if let Some(anchor) = to_field {
            let in_target = match &target {
                Some(row) => self.row_ref(row)?.position_of(anchor).is_some(),
                None => false,
            };
            if !in_target {
                return Err(BuilderError::FieldNotFound(anchor.clone()));
            }
        }

        if let Some(side) = zone.side() {
            if target.as_ref() == Some(&source.row_id) {
                match to_field {
                    Some(anchor) => self.reorder_within_row(&source, side, anchor)?,
                    None => {
                        let row = self.row_mut(&source.row_id)?;
                        row.fields.remove(source.field_index);
                        let position = insertion_index(&row.fields, side, None)?;
                        row.fields.insert(position, id.clone());
                    }
                }
                return self.settled(id);
            }
        }

        let new_row = self.factory.row_id();

        // Detach
        let source_row = self.row_mut(&source.row_id)?;
        source_row.fields.remove(source.field_index);
        let source_emptied = source_row.fields.is_empty();
        if source_emptied {
            self.document.rows.shift_remove(&source.row_id);
            self.page_mut(&source.page_id)?
                .rows
                .remove(source.row_index);
        }

        if let Some(field) = self.document.fields.get_mut(id) {
            field.page_id = page.clone();
        }

        // Attach
        match target {
            None => {
                let end = self.page_ref(page)?.rows.len();
                self.insert_row(page, end, new_row, id)?;
            }
            Some(target) if source_emptied && target == source.row_id => {
                // Dropped onto its own (now removed) row: keep the old slot
                self.insert_row(page, source.row_index, new_row, id)?;
            }
            Some(target) => {
                let target_index = self
                    .page_ref(page)?
                    .rows
                    .iter()
                    .position(|r| r == &target)
                    .ok_or_else(|| LayoutFault::MissingRow(target.clone()))?;
                let row = self.row_mut(&target)?;
                match zone.side() {
                    Some(side) if !row.is_full() => {
                        let position = insertion_index(&row.fields, side, to_field)?;
                        row.fields.insert(position, id.clone());
                    }
                    _ => self.insert_row(page, target_index + 1, new_row, id)?,
                }
            }
        }

        if self.document.selected_field.as_ref() == Some(id) && page != &self.document.current_page
        {
            self.document.selected_field = None;
        }

        let location = self.settled(id)?;
        debug!(
            "Moved field {id} to page {} row {} position {}",
            location.page_id, location.row_index, location.field_index
        );
        Ok(location)
    }

    /// Move a row within its page
    pub fn reorder_rows(
        &mut self,
        page: &PageId,
        from: usize,
        to: usize,
    ) -> Result<(), BuilderError> {
        let rows = &mut self.page_mut(page)?.rows;
        let len = rows.len();
        for index in [from, to] {
            if index >= len {
                return Err(BuilderError::IndexOutOfRange { index, len });
            }
        }
        if from != to {
            let row = rows.remove(from);
            rows.insert(to, row);
            debug!("Moved row {from} to {to} on page {page}");
        }
        Ok(())
    }

    /// Set the helper text shown above a row
    pub fn update_row_description(
        &mut self,
        page: &PageId,
        row_index: usize,
        description: &str,
    ) -> Result<(), BuilderError> {
        let row_id = self.row_id_at(page, row_index)?;
        self.row_mut(&row_id)?.description = description.to_string();
        Ok(())
    }

    /// Same-row reorder relative to an anchor in that row
    fn reorder_within_row(
        &mut self,
        source: &FieldLocation,
        side: Side,
        anchor: &FieldId,
    ) -> Result<(), BuilderError> {
        let row = self.row_mut(&source.row_id)?;
        let moved = row.fields.remove(source.field_index);
        let position = if anchor == &moved {
            source.field_index
        } else {
            insertion_index(&row.fields, side, Some(anchor))?
        };
        row.fields.insert(position, moved);
        Ok(())
    }

    fn insert_row(
        &mut self,
        page: &PageId,
        index: usize,
        row_id: RowId,
        field: &FieldId,
    ) -> Result<(), BuilderError> {
        self.page_mut(page)?.rows.insert(index, row_id.clone());
        self.document
            .rows
            .insert(row_id.clone(), Row::new(row_id, vec![field.clone()]));
        Ok(())
    }

    fn settled(&self, id: &FieldId) -> Result<FieldLocation, BuilderError> {
        self.document
            .locate_field(id)
            .ok_or_else(|| BuilderError::FieldNotFound(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use pretty_assertions::assert_eq;

    /// Rows: [a, b], [c], [d]
    fn three_rows() -> (FormBuilder, [FieldId; 4]) {
        let mut builder = builder();
        let a = builder.add_field("text", None).unwrap();
        let b = builder.add_field_to_row("text", 0, Side::Right, None).unwrap();
        let c = builder.add_field("text", None).unwrap();
        let d = builder.add_field("text", None).unwrap();
        (builder, [a, b, c, d])
    }

    fn names(ids: &[&FieldId]) -> Vec<String> {
        ids.iter().map(|id| id.to_string()).collect()
    }

    mod across_rows {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_center_drop_splits_pair() {
            let (mut builder, [a, b, c, d]) = three_rows();
            builder.move_field(&b, 0, DropZone::Center, None).unwrap();
            assert_eq!(
                layout(&builder),
                vec![names(&[&a]), names(&[&b]), names(&[&c]), names(&[&d])]
            );
            let doc = builder.document();
            assert_eq!(doc.column_width(&a), Some(12));
            assert_eq!(doc.column_width(&b), Some(12));
            assert_consistent(&builder);
        }

        #[test]
        fn test_join_row_with_capacity() {
            let (mut builder, [a, b, c, d]) = three_rows();
            let location = builder.move_field(&d, 1, DropZone::Left, Some(&c)).unwrap();
            assert_eq!(location.row_index, 1);
            assert_eq!(location.field_index, 0);
            assert_eq!(layout(&builder), vec![names(&[&a, &b]), names(&[&d, &c])]);
            assert_eq!(builder.document().column_width(&c), Some(6));
            assert_consistent(&builder);
        }

        #[test]
        fn test_emptied_source_row_before_target_is_removed() {
            let (mut builder, [a, b, c, d]) = three_rows();
            // c leaves row 1 (which disappears); row 2 is addressed by its pre-move index
            builder.move_field(&c, 2, DropZone::Right, Some(&d)).unwrap();
            assert_eq!(layout(&builder), vec![names(&[&a, &b]), names(&[&d, &c])]);
            assert_consistent(&builder);
        }

        #[test]
        fn test_center_after_emptied_source_row() {
            let (mut builder, [a, b, c, d]) = three_rows();
            builder.move_field(&c, 2, DropZone::Center, None).unwrap();
            assert_eq!(
                layout(&builder),
                vec![names(&[&a, &b]), names(&[&d]), names(&[&c])]
            );
            assert_consistent(&builder);
        }

        #[test]
        fn test_full_target_falls_back_to_new_row() {
            let (mut builder, [a, b, c, d]) = three_rows();
            builder.move_field(&d, 0, DropZone::Right, Some(&a)).unwrap();
            assert_eq!(
                layout(&builder),
                vec![names(&[&a, &b]), names(&[&d]), names(&[&c])]
            );
            assert_consistent(&builder);
        }

        #[test]
        fn test_move_up_into_earlier_row() {
            let (mut builder, [a, b, c, d]) = three_rows();
            builder.move_field(&a, 1, DropZone::Right, None).unwrap();
            assert_eq!(
                layout(&builder),
                vec![names(&[&b]), names(&[&c, &a]), names(&[&d])]
            );
            assert_consistent(&builder);
        }

        #[test]
        fn test_row_count_index_appends() {
            let (mut builder, [a, b, c, d]) = three_rows();
            builder.move_field(&a, 3, DropZone::Left, None).unwrap();
            assert_eq!(
                layout(&builder),
                vec![names(&[&b]), names(&[&c]), names(&[&d]), names(&[&a])]
            );
        }

        #[test]
        fn test_center_on_own_single_row_keeps_position() {
            let (mut builder, [a, b, c, d]) = three_rows();
            builder.move_field(&c, 1, DropZone::Center, None).unwrap();
            assert_eq!(
                layout(&builder),
                vec![names(&[&a, &b]), names(&[&c]), names(&[&d])]
            );
            assert_consistent(&builder);
        }

        #[test]
        fn test_move_keeps_selection() {
            let (mut builder, [a, _, _, d]) = three_rows();
            builder.select_field(&a).unwrap();
            builder.move_field(&a, 2, DropZone::Left, Some(&d)).unwrap();
            assert_eq!(builder.document().selected_field_id(), Some(&a));
        }
    }

    mod within_row {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_swap_pair() {
            let (mut builder, [a, b, c, d]) = three_rows();
            builder.move_field(&a, 0, DropZone::Right, Some(&b)).unwrap();
            assert_eq!(
                layout(&builder),
                vec![names(&[&b, &a]), names(&[&c]), names(&[&d])]
            );
            assert_consistent(&builder);
        }

        #[test]
        fn test_to_row_start_without_anchor() {
            let (mut builder, [a, b, _, _]) = three_rows();
            builder.move_field(&b, 0, DropZone::Left, None).unwrap();
            assert_eq!(layout(&builder)[0], names(&[&b, &a]));
        }

        #[test]
        fn test_anchor_on_itself_is_noop() {
            let (mut builder, _) = three_rows();
            let before = builder.document().clone();
            let b = FieldId::from(layout(&builder)[0][1].as_str());
            builder.move_field(&b, 0, DropZone::Left, Some(&b)).unwrap();
            assert_eq!(builder.document(), &before);
        }
    }

    mod across_pages {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_move_to_other_page_rewrites_page_id() {
            let (mut builder, [a, b, _, _]) = three_rows();
            let first_page = builder.document().current_page_id().clone();
            let second_page = builder.add_page();
            builder.select_page(&first_page).unwrap();

            builder
                .move_field_to_page(&b, &second_page, 0, DropZone::Center, None)
                .unwrap();

            let doc = builder.document();
            assert_eq!(doc.field(&b).unwrap().page_id, second_page);
            assert_eq!(doc.fields_on(&second_page).len(), 1);
            assert_eq!(doc.column_width(&a), Some(12));
            assert_consistent(&builder);
        }

        #[test]
        fn test_moving_selected_field_off_page_clears_selection() {
            let (mut builder, [a, _, _, _]) = three_rows();
            let first_page = builder.document().current_page_id().clone();
            let second_page = builder.add_page();
            builder.select_page(&first_page).unwrap();
            builder.select_field(&a).unwrap();

            builder
                .move_field_to_page(&a, &second_page, 0, DropZone::Left, None)
                .unwrap();
            assert!(builder.document().selected_field_id().is_none());
            assert_consistent(&builder);
        }
    }

    mod failures {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_unknown_field() {
            let (mut builder, _) = three_rows();
            let err = builder
                .move_field(&FieldId::from("ghost"), 0, DropZone::Center, None)
                .unwrap_err();
            assert!(matches!(err, BuilderError::FieldNotFound(_)));
        }

        #[test]
        fn test_row_index_past_end() {
            let (mut builder, [a, _, _, _]) = three_rows();
            let before = builder.document().clone();
            let err = builder.move_field(&a, 4, DropZone::Center, None).unwrap_err();
            assert!(matches!(err, BuilderError::IndexOutOfRange { index: 4, len: 3 }));
            assert_eq!(builder.document(), &before);
        }

        #[test]
        fn test_anchor_not_in_target_row() {
            let (mut builder, [a, _, c, _]) = three_rows();
            let before = builder.document().clone();
            let err = builder
                .move_field(&c, 2, DropZone::Left, Some(&a))
                .unwrap_err();
            assert!(matches!(err, BuilderError::FieldNotFound(id) if id == a));
            assert_eq!(builder.document(), &before);
        }

        #[test]
        fn test_center_anchor_must_be_in_target_row() {
            let (mut builder, [a, _, c, d]) = three_rows();
            let before = builder.document().clone();
            let err = builder
                .move_field(&d, 1, DropZone::Center, Some(&a))
                .unwrap_err();
            assert!(matches!(err, BuilderError::FieldNotFound(id) if id == a));
            assert_eq!(builder.document(), &before);

            let err = builder
                .move_field(&d, 3, DropZone::Center, Some(&c))
                .unwrap_err();
            assert!(matches!(err, BuilderError::FieldNotFound(id) if id == c));
            assert_eq!(builder.document(), &before);

            builder.move_field(&d, 1, DropZone::Center, Some(&c)).unwrap();
            assert_consistent(&builder);
        }

        #[test]
        fn test_unknown_page() {
            let (mut builder, [a, _, _, _]) = three_rows();
            let err = builder
                .move_field_to_page(&a, &PageId::from("nowhere"), 0, DropZone::Center, None)
                .unwrap_err();
            assert!(matches!(err, BuilderError::PageNotFound(_)));
        }
    }

    mod rows {
        use super::*;
        use pretty_assertions::assert_eq;

        #[test]
        fn test_reorder_rows() {
            let (mut builder, [a, b, c, d]) = three_rows();
            let page = builder.document().current_page_id().clone();
            builder.reorder_rows(&page, 2, 0).unwrap();
            assert_eq!(
                layout(&builder),
                vec![names(&[&d]), names(&[&a, &b]), names(&[&c])]
            );
        }

        #[test]
        fn test_reorder_rows_same_index_is_noop() {
            let (mut builder, _) = three_rows();
            let page = builder.document().current_page_id().clone();
            let before = builder.document().clone();
            builder.reorder_rows(&page, 1, 1).unwrap();
            assert_eq!(builder.document(), &before);
        }

        #[test]
        fn test_reorder_rows_out_of_range() {
            let (mut builder, _) = three_rows();
            let page = builder.document().current_page_id().clone();
            let err = builder.reorder_rows(&page, 0, 3).unwrap_err();
            assert!(matches!(err, BuilderError::IndexOutOfRange { index: 3, len: 3 }));
        }

        #[test]
        fn test_update_row_description() {
            let (mut builder, _) = three_rows();
            let page = builder.document().current_page_id().clone();
            builder
                .update_row_description(&page, 1, "Contact details")
                .unwrap();
            assert_eq!(builder.document().rows_of(&page)[1].description, "Contact details");
            let err = builder.update_row_description(&page, 9, "x").unwrap_err();
            assert!(matches!(err, BuilderError::IndexOutOfRange { .. }));
        }
    }

    #[test]
    fn test_random_walk_keeps_invariants() {
        let (mut builder, _) = three_rows();
        let first_page = builder.document().current_page_id().clone();
        let second_page = builder.add_page();
        builder.add_field("email", None).unwrap();
        let pages = [first_page, second_page];
        let zones = [DropZone::Left, DropZone::Right, DropZone::Center];

        for step in 0..90usize {
            let doc = builder.document();
            let ids: Vec<FieldId> = doc.fields().map(|f| f.id.clone()).collect();
            let id = ids[(step * 5) % ids.len()].clone();
            let page = pages[(step / 3) % 2].clone();
            let rows: Vec<Vec<FieldId>> = doc
                .rows_of(&page)
                .into_iter()
                .map(|row| row.fields.clone())
                .collect();
            let index = (step * 7) % (rows.len() + 1);
            let zone = zones[step % 3];

            // every fourth step anchors on a field from some other row
            let foreign = step % 4 == 2;
            let anchor = if foreign {
                rows.iter()
                    .enumerate()
                    .find(|(i, _)| *i != index)
                    .and_then(|(_, row)| row.first().cloned())
            } else if step % 4 == 3 {
                None
            } else {
                rows.get(index).and_then(|row| row.last().cloned())
            };

            let before = builder.document().clone();
            match builder.move_field_to_page(&id, &page, index, zone, anchor.as_ref()) {
                Ok(location) => {
                    assert!(!foreign || anchor.is_none(), "step {step}");
                    assert_eq!(location.page_id, page);
                    assert_eq!(builder.document().locate_field(&id), Some(location));
                    assert_eq!(builder.document().field(&id).unwrap().page_id, page);
                }
                Err(BuilderError::FieldNotFound(missing)) => {
                    assert!(foreign, "step {step}");
                    assert_eq!(Some(missing), anchor);
                    assert_eq!(builder.document(), &before);
                }
                Err(other) => panic!("step {step}: unexpected {other:?}"),
            }

            if step % 11 == 0 {
                builder.add_field("text", Some(step % 4)).unwrap();
            }
            assert_consistent(&builder);
        }
        assert_eq!(builder.document().field_count(), 5 + 9);
    }
}
