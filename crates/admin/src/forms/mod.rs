//! Create/edit forms for catalog entities.
//!
//! An [`EntityForm`] wraps a [`Draft`] and knows whether it is creating a new
//! row or editing an existing one. Submitting validates the draft, performs
//! exactly one insert (create mode) or one keyed update (edit mode), and on
//! success closes the form and invalidates the table's cached lists. On
//! failure the form stays open with the draft untouched.

mod category;
mod product;

pub use category::CategoryDraft;
pub use product::ProductDraft;

use serde_json::Value;
use thiserror::Error;
use tracing::{error, info};

use crate::assets::{UploadError, UploadedAsset};
use crate::models::Record;
use crate::store::{Collections, Row, RowKey, StoreError};

/// Produces keys for newly created rows.
pub type IdSource = fn() -> i64;

/// Default key source: milliseconds since the Unix epoch.
#[must_use]
pub fn unix_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Errors raised while submitting a form.
#[derive(Debug, Error)]
pub enum FormError {
    /// A required field is blank.
    #[error("{0} is required")]
    Required(&'static str),

    /// A field holds an unacceptable value.
    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// The form was already submitted successfully.
    #[error("form is closed")]
    Closed,

    /// The store rejected the write.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl FormError {
    /// Whether the error was caught before reaching the store.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Required(_) | Self::Invalid { .. })
    }
}

/// Editable field values for one entity.
pub trait Draft: Clone + Default + Send + Sync {
    type Record: Record;

    /// Seed a draft from an existing row.
    fn from_record(record: &Self::Record) -> Self;

    /// Key of an existing row.
    fn record_key(record: &Self::Record) -> i64;

    /// Check the draft before any store call.
    ///
    /// # Errors
    ///
    /// Returns `FormError::Required` or `FormError::Invalid`.
    fn validate(&self) -> Result<(), FormError>;

    /// Column values to write, without the key.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Parse` if a value cannot be encoded.
    fn to_row(&self) -> Result<Row, StoreError>;

    /// Record an uploaded asset URL.
    fn attach_asset(&mut self, url: String);
}

/// Whether a form creates or edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(i64),
}

/// Result of a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Created(i64),
    Updated(i64),
}

impl SubmitOutcome {
    #[must_use]
    pub const fn id(self) -> i64 {
        match self {
            Self::Created(id) | Self::Updated(id) => id,
        }
    }
}

/// A create/edit form over one draft.
#[derive(Debug, Clone)]
pub struct EntityForm<D: Draft> {
    mode: FormMode,
    draft: D,
    open: bool,
    id_source: IdSource,
}

impl<D: Draft> EntityForm<D> {
    /// Blank form for a new row.
    #[must_use]
    pub fn create() -> Self {
        Self {
            mode: FormMode::Create,
            draft: D::default(),
            open: true,
            id_source: unix_millis,
        }
    }

    /// Form seeded from an existing row.
    #[must_use]
    pub fn edit(record: &D::Record) -> Self {
        Self::edit_key(D::record_key(record), D::from_record(record))
    }

    /// Form editing the row with `id`, with caller-supplied values.
    #[must_use]
    pub fn edit_key(id: i64, draft: D) -> Self {
        Self {
            mode: FormMode::Edit(id),
            draft,
            open: true,
            id_source: unix_millis,
        }
    }

    #[must_use]
    pub fn with_draft(mut self, draft: D) -> Self {
        self.draft = draft;
        self
    }

    #[must_use]
    pub fn with_id_source(mut self, id_source: IdSource) -> Self {
        self.id_source = id_source;
        self
    }

    #[must_use]
    pub const fn mode(&self) -> FormMode {
        self.mode
    }

    #[must_use]
    pub const fn draft(&self) -> &D {
        &self.draft
    }

    pub const fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Apply an upload result. A failed upload leaves the draft unchanged.
    ///
    /// # Errors
    ///
    /// Returns the upload error unchanged.
    pub fn attach_upload(
        &mut self,
        result: Result<UploadedAsset, UploadError>,
    ) -> Result<(), UploadError> {
        let asset = result.inspect_err(|e| error!(error = %e, "Asset upload failed"))?;
        self.draft.attach_asset(asset.secure_url);
        Ok(())
    }

    /// Validate and write the draft.
    ///
    /// # Errors
    ///
    /// Returns `FormError` on validation failure, when the form is already
    /// closed, or when the store rejects the write.
    pub async fn submit(&mut self, collections: &Collections) -> Result<SubmitOutcome, FormError> {
        if !self.open {
            return Err(FormError::Closed);
        }
        self.draft.validate()?;

        let table = <D::Record as Record>::TABLE;
        let key = <D::Record as Record>::KEY;
        let mut row = self.draft.to_row()?;

        let result = match self.mode {
            FormMode::Create => {
                let id = (self.id_source)();
                row.insert(key.to_string(), Value::from(id));
                collections
                    .insert(table, row)
                    .await
                    .map(|()| SubmitOutcome::Created(id))
            }
            FormMode::Edit(id) => collections
                .update(table, &RowKey::new(key, id), row)
                .await
                .map(|_| SubmitOutcome::Updated(id)),
        };

        match result {
            Ok(outcome) => {
                self.open = false;
                info!(%table, id = outcome.id(), ?outcome, "Form submitted");
                Ok(outcome)
            }
            Err(e) => {
                error!(%table, error = %e, "Form submit failed");
                Err(e.into())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::store::memory::StoreCall;
    use crate::store::{MemoryStore, Table};

    const FIXED_ID: i64 = 1_717_171_717_171;

    fn fixed_id() -> i64 {
        FIXED_ID
    }

    fn setup() -> (Arc<MemoryStore>, Collections) {
        let store = Arc::new(MemoryStore::new().with_rows(
            Table::Categories,
            [json!({"category_id": 5, "name": "Shoes", "iconPath": "https://cdn/old.png"})],
        ));
        let collections = Collections::new(store.clone(), Duration::from_secs(60));
        (store, collections)
    }

    fn draft(name: &str) -> CategoryDraft {
        CategoryDraft {
            name: name.to_string(),
            icon_path: None,
        }
    }

    #[tokio::test]
    async fn test_create_inserts_once_with_generated_key() {
        let (store, collections) = setup();
        let mut form = EntityForm::<CategoryDraft>::create()
            .with_id_source(fixed_id)
            .with_draft(draft("Hats"));

        let outcome = form.submit(&collections).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Created(FIXED_ID));
        assert!(!form.is_open());

        let calls = store.calls();
        assert_eq!(calls.len(), 1);
        let StoreCall::Insert { table, row } = &calls[0] else {
            panic!("expected insert, got {calls:?}");
        };
        assert_eq!(*table, Table::Categories);
        assert_eq!(row["category_id"], json!(FIXED_ID));
        assert_eq!(row["name"], json!("Hats"));
    }

    #[tokio::test]
    async fn test_edit_updates_by_key_and_never_inserts() {
        let (store, collections) = setup();
        let mut form = EntityForm::edit_key(5, draft("Sneakers"));

        let outcome = form.submit(&collections).await.unwrap();
        assert_eq!(outcome, SubmitOutcome::Updated(5));
        assert_eq!(store.count_calls(|c| matches!(c, StoreCall::Insert { .. })), 0);
        assert_eq!(
            store.count_calls(|c| matches!(
                c,
                StoreCall::Update { key, .. } if key.value == "5" && key.column == "category_id"
            )),
            1
        );
        assert_eq!(store.rows(Table::Categories).await[0]["name"], json!("Sneakers"));
    }

    #[tokio::test]
    async fn test_validation_failure_makes_no_store_call() {
        let (store, collections) = setup();
        let mut form = EntityForm::<CategoryDraft>::create().with_draft(draft("   "));

        let err = form.submit(&collections).await.unwrap_err();
        assert!(matches!(err, FormError::Required("name")));
        assert!(err.is_validation());
        assert!(store.calls().is_empty());
        assert!(form.is_open());
    }

    #[tokio::test]
    async fn test_store_failure_keeps_form_open_with_draft() {
        let (store, collections) = setup();
        store.fail_writes(true);
        let mut form = EntityForm::<CategoryDraft>::create().with_draft(draft("Hats"));

        let err = form.submit(&collections).await.unwrap_err();
        assert!(matches!(err, FormError::Store(_)));
        assert!(form.is_open());
        assert_eq!(form.draft().name, "Hats");
    }

    #[tokio::test]
    async fn test_edit_of_missing_row_fails() {
        let (_, collections) = setup();
        let mut form = EntityForm::edit_key(404, draft("Ghost"));
        let err = form.submit(&collections).await.unwrap_err();
        assert!(matches!(err, FormError::Store(StoreError::NotFound(_))));
        assert!(form.is_open());
    }

    #[tokio::test]
    async fn test_closed_form_rejects_resubmit() {
        let (store, collections) = setup();
        let mut form = EntityForm::<CategoryDraft>::create().with_draft(draft("Hats"));
        form.submit(&collections).await.unwrap();
        assert!(matches!(
            form.submit(&collections).await,
            Err(FormError::Closed)
        ));
        assert_eq!(store.calls().len(), 1);
    }

    #[test]
    fn test_failed_upload_leaves_draft_unchanged() {
        let mut form = EntityForm::<CategoryDraft>::create().with_draft(CategoryDraft {
            name: "Hats".to_string(),
            icon_path: Some("https://cdn/a.png".to_string()),
        });
        let before = form.draft().clone();
        assert!(form.attach_upload(Err(UploadError::MissingUrl)).is_err());
        assert_eq!(*form.draft(), before);
    }
}
