//! Form service orchestrator.
//!
//! Owns the authoring, publishing, submission and review flows. All I/O goes
//! through the injected [`FormStore`] and [`LinkGenerator`]; everything in
//! between is the pure code of this crate.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

use crate::coerce::normalize_answers;
use crate::content::ContentPatch;
use crate::error::{is_link_conflict, ContentError, FormError};
use crate::model::{Form, FormDraft, FormSummary, Response, SubmissionMeta};
use crate::review::{review_responses, ReviewedResponse};
use crate::traits::{FormStore, LinkGenerator};

/// Attempts at finding an unused shareable link before giving up.
pub const MAX_LINK_ATTEMPTS: u32 = 3;

pub struct FormService {
    store: Arc<dyn FormStore>,
    links: Arc<dyn LinkGenerator>,
}

impl FormService {
    pub fn new(store: Arc<dyn FormStore>, links: Arc<dyn LinkGenerator>) -> Self {
        Self { store, links }
    }

    pub fn store(&self) -> &Arc<dyn FormStore> {
        &self.store
    }

    /// Create a form for `owner` with a fresh id and shareable link.
    pub async fn create_form(&self, owner: &str, draft: FormDraft) -> Result<Form, FormError> {
        let draft = draft.normalized()?;
        let now = Utc::now();
        let mut form = Form {
            id: Uuid::new_v4().to_string(),
            title: draft.title,
            description: draft.description,
            header_image: draft.header_image,
            questions: draft.questions,
            created_by: owner.to_string(),
            is_published: draft.is_published,
            shareable_link: String::new(),
            created_at: now,
            updated_at: now,
        };

        for attempt in 1..=MAX_LINK_ATTEMPTS {
            form.shareable_link = self.links.generate();
            match self.store.insert_form(form.clone()).await {
                Ok(()) => {
                    tracing::info!(
                        "created form {} for {} (link {})",
                        form.id,
                        owner,
                        form.shareable_link
                    );
                    return Ok(form);
                }
                Err(e) if is_link_conflict(&e) => {
                    tracing::warn!(
                        "shareable link collision on attempt {attempt}/{MAX_LINK_ATTEMPTS}: {e}"
                    );
                }
                Err(e) => return Err(e.context("failed to store form").into()),
            }
        }

        Err(FormError::Store(anyhow::anyhow!(
            "no unused shareable link after {MAX_LINK_ATTEMPTS} attempts"
        )))
    }

    /// Replace a form's editable fields. Id, link, owner and creation time
    /// are kept.
    ///
    /// Questions may be added or removed, but a question id already on the
    /// form keeps its type.
    pub async fn update_form(
        &self,
        owner: &str,
        id: &str,
        draft: FormDraft,
    ) -> Result<Form, FormError> {
        let draft = draft.normalized()?;
        let existing = self.owned_form(owner, id).await?;
        for question in &draft.questions {
            if let Some(current) = existing.question(&question.id) {
                if current.question_type() != question.question_type() {
                    return Err(ContentError::TypeChanged {
                        id: question.id.clone(),
                        from: current.question_type(),
                        to: question.question_type(),
                    }
                    .into());
                }
            }
        }
        let form = Form {
            title: draft.title,
            description: draft.description,
            header_image: draft.header_image,
            questions: draft.questions,
            is_published: draft.is_published,
            updated_at: Utc::now(),
            ..existing
        };
        self.save(&form).await?;
        Ok(form)
    }

    /// Apply a content patch to one question of an owned form.
    pub async fn edit_question(
        &self,
        owner: &str,
        form_id: &str,
        question_id: &str,
        patch: ContentPatch,
    ) -> Result<Form, FormError> {
        let mut form = self.owned_form(owner, form_id).await?;
        let question = form
            .questions
            .iter_mut()
            .find(|q| q.id == question_id)
            .ok_or_else(|| FormError::InvalidForm(format!("no question with id {question_id}")))?;
        question.apply_patch(patch)?;
        form.updated_at = Utc::now();
        self.save(&form).await?;
        Ok(form)
    }

    pub async fn set_published(
        &self,
        owner: &str,
        id: &str,
        published: bool,
    ) -> Result<Form, FormError> {
        let mut form = self.owned_form(owner, id).await?;
        if form.is_published != published {
            form.is_published = published;
            form.updated_at = Utc::now();
            self.save(&form).await?;
            tracing::info!(
                "form {} is now {}",
                form.id,
                if published { "published" } else { "a draft" }
            );
        }
        Ok(form)
    }

    /// A form as seen by its owner. Someone else's form is not found.
    pub async fn owned_form(&self, owner: &str, id: &str) -> Result<Form, FormError> {
        self.store
            .load_form(id)
            .await
            .with_context(|| format!("failed to load form {id}"))?
            .filter(|form| form.created_by == owner)
            .ok_or(FormError::NotFound)
    }

    /// A form as seen by a respondent. Drafts are not found.
    pub async fn published_form(&self, id: &str) -> Result<Form, FormError> {
        self.store
            .load_published_form(id)
            .await
            .with_context(|| format!("failed to load form {id}"))?
            .ok_or(FormError::NotFound)
    }

    pub async fn published_form_by_link(&self, link: &str) -> Result<Form, FormError> {
        self.store
            .find_by_link(link)
            .await
            .context("failed to look up shareable link")?
            .filter(|form| form.is_published)
            .ok_or(FormError::NotFound)
    }

    /// The owner's forms, newest first, with response counts.
    pub async fn list_forms(&self, owner: &str) -> Result<Vec<FormSummary>, FormError> {
        let mut forms = self
            .store
            .forms_by_owner(owner)
            .await
            .with_context(|| format!("failed to list forms of {owner}"))?;
        forms.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let mut summaries = Vec::with_capacity(forms.len());
        for form in forms {
            let responses = self
                .store
                .count_responses(&form.id)
                .await
                .with_context(|| format!("failed to count responses of {}", form.id))?;
            summaries.push(FormSummary {
                id: form.id,
                title: form.title,
                description: form.description,
                is_published: form.is_published,
                shareable_link: form.shareable_link,
                created_at: form.created_at,
                responses,
            });
        }
        Ok(summaries)
    }

    /// Record a respondent's answers against a published form.
    ///
    /// `raw_answers` is untrusted; it is normalized against the form's
    /// questions before anything is stored. Returns the response id.
    pub async fn submit_response(
        &self,
        form_id: &str,
        raw_answers: &Value,
        meta: SubmissionMeta,
    ) -> Result<String, FormError> {
        let form = self.published_form(form_id).await?;
        let answers = normalize_answers(&form.questions, raw_answers);
        tracing::debug!(
            "normalized {} of {} answers for form {}",
            answers.len(),
            form.questions.len(),
            form.id
        );

        let response = Response {
            id: Uuid::new_v4().to_string(),
            form_id: form.id.clone(),
            answers,
            submitted_at: Utc::now(),
            ip_address: meta.ip_address,
            user_agent: meta.user_agent,
        };
        let id = self
            .store
            .save_response(response)
            .await
            .with_context(|| format!("failed to save response to form {}", form.id))?;
        tracing::info!("stored response {id} for form {}", form.id);
        Ok(id)
    }

    /// Responses to an owned form, newest first.
    pub async fn responses(&self, owner: &str, form_id: &str) -> Result<Vec<Response>, FormError> {
        let form = self.owned_form(owner, form_id).await?;
        self.sorted_responses(&form).await
    }

    /// Responses joined with the form's current questions, newest first.
    pub async fn review(
        &self,
        owner: &str,
        form_id: &str,
    ) -> Result<Vec<ReviewedResponse>, FormError> {
        let form = self.owned_form(owner, form_id).await?;
        let responses = self.sorted_responses(&form).await?;
        Ok(review_responses(&form, &responses))
    }

    async fn sorted_responses(&self, form: &Form) -> Result<Vec<Response>, FormError> {
        let mut responses = self
            .store
            .responses_for(&form.id)
            .await
            .with_context(|| format!("failed to load responses of {}", form.id))?;
        responses.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
        Ok(responses)
    }

    async fn save(&self, form: &Form) -> Result<(), FormError> {
        self.store
            .update_form(form.clone())
            .await
            .with_context(|| format!("failed to save form {}", form.id))?;
        Ok(())
    }
}
