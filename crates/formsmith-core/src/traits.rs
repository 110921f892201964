//! Collaborator traits for storage and link generation.
//!
//! These are implemented by the `formsmith-store` crate. The service only
//! ever talks to them through `Arc<dyn ...>`.

use async_trait::async_trait;

use crate::model::{Form, Response};

// ---------------------------------------------------------------------------
// Form store trait
// ---------------------------------------------------------------------------

/// Persistence for forms and their responses.
///
/// Failures are `anyhow::Error`. A rejected shareable link must surface as
/// [`StoreError::DuplicateLink`](crate::error::StoreError::DuplicateLink)
/// inside that error so the service can retry with a fresh link.
#[async_trait]
pub trait FormStore: Send + Sync {
    /// Human-readable store name (e.g. "memory").
    fn name(&self) -> &str;

    /// Store a new form. Rejects a shareable link that is already taken.
    async fn insert_form(&self, form: Form) -> anyhow::Result<()>;

    /// Replace an existing form, matched by id.
    async fn update_form(&self, form: Form) -> anyhow::Result<()>;

    async fn load_form(&self, id: &str) -> anyhow::Result<Option<Form>>;

    /// Load a form only if it is published.
    async fn load_published_form(&self, id: &str) -> anyhow::Result<Option<Form>> {
        Ok(self.load_form(id).await?.filter(|form| form.is_published))
    }

    async fn find_by_link(&self, link: &str) -> anyhow::Result<Option<Form>>;

    /// All forms created by `owner`, in any order.
    async fn forms_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Form>>;

    /// Append a response. Returns its id.
    async fn save_response(&self, response: Response) -> anyhow::Result<String>;

    /// All responses to a form, in any order.
    async fn responses_for(&self, form_id: &str) -> anyhow::Result<Vec<Response>>;

    async fn count_responses(&self, form_id: &str) -> anyhow::Result<usize> {
        Ok(self.responses_for(form_id).await?.len())
    }
}

// ---------------------------------------------------------------------------
// Link generator trait
// ---------------------------------------------------------------------------

/// Source of shareable link tokens.
pub trait LinkGenerator: Send + Sync {
    /// A fresh opaque ASCII token. Uniqueness is checked by the store.
    fn generate(&self) -> String;
}
