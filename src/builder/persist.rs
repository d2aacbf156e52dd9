//! Saving and loading forms through a [`FormStore`]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::{BuilderContext, FormBuilder};
use crate::error::{BuilderError, ValidationIssue};
use crate::state::{is_slug, Document};
use crate::store::{FormStore, StoredId};

/// What gets written to the store on save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub saved_at: DateTime<Utc>,
    pub document: Document,
}

impl FormBuilder {
    /// Every reason the form cannot be saved right now
    pub fn validate(&self) -> Vec<ValidationIssue> {
        let doc = &self.document;
        let mut issues = Vec::new();
        if doc.form_name.trim().is_empty() {
            issues.push(ValidationIssue::MissingFormName);
        }
        let slug = self.effective_slug();
        if slug.is_empty() {
            issues.push(ValidationIssue::MissingFormSlug);
        } else if !is_slug(&slug) {
            issues.push(ValidationIssue::InvalidFormSlug(slug));
        }
        issues.extend(
            doc.fields()
                .filter(|f| !f.has_label())
                .map(|f| ValidationIssue::MissingLabel {
                    field: f.id.clone(),
                    page: f.page_id.clone(),
                }),
        );
        issues
    }

    /// Validate and hand the serialized form to `store`.
    ///
    /// The document is only touched after the store accepted it (a derived
    /// slug is written back), so a failed save can simply be retried.
    pub async fn save_form<S>(&mut self, store: &mut S) -> Result<StoredId, BuilderError>
    where
        S: FormStore + ?Sized,
    {
        let issues = self.validate();
        if !issues.is_empty() {
            return Err(BuilderError::ValidationFailed(issues));
        }

        let slug = self.effective_slug();
        let mut document = self.document.clone();
        document.form_slug = slug.clone();
        document.selected_field = None;
        let snapshot = FormSnapshot {
            saved_at: Utc::now(),
            document,
        };
        let serialized = serde_json::to_string(&snapshot)
            .map_err(|e| BuilderError::PersistenceFailed(e.into()))?;

        match store.save(serialized).await {
            Ok(id) => {
                self.document.form_slug = slug;
                info!(
                    "Saved form '{}' as {} ({} fields)",
                    self.document.form_name,
                    id,
                    self.document.field_count()
                );
                Ok(id)
            }
            Err(e) => {
                warn!("Saving form '{}' failed: {e:#}", self.document.form_name);
                Err(BuilderError::PersistenceFailed(e))
            }
        }
    }

    /// Open a session on a stored form
    pub async fn load_form<S>(
        store: &mut S,
        id: &StoredId,
        context: BuilderContext,
    ) -> Result<Self, BuilderError>
    where
        S: FormStore + ?Sized,
    {
        let serialized = store
            .load(id)
            .await
            .map_err(BuilderError::PersistenceFailed)?;
        let snapshot: FormSnapshot = serde_json::from_str(&serialized)
            .map_err(|e| BuilderError::PersistenceFailed(e.into()))?;
        let builder = Self::open(context, snapshot.document)?;
        info!(
            "Loaded form '{}' ({}) saved at {}",
            builder.document.form_name, id, snapshot.saved_at
        );
        Ok(builder)
    }
}
