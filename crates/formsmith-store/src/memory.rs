//! In-memory store for tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use formsmith_core::error::StoreError;
use formsmith_core::model::{Form, Response};
use formsmith_core::traits::FormStore;

/// Keeps every form and response in process memory.
#[derive(Default)]
pub struct InMemoryStore {
    forms: Mutex<HashMap<String, Form>>,
    responses: Mutex<HashMap<String, Vec<Response>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of stored responses across all forms.
    pub fn response_total(&self) -> usize {
        self.responses
            .lock()
            .map(|r| r.values().map(Vec::len).sum())
            .unwrap_or(0)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> anyhow::Result<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| anyhow::anyhow!("in-memory store lock poisoned"))
}

#[async_trait]
impl FormStore for InMemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn insert_form(&self, form: Form) -> anyhow::Result<()> {
        let mut forms = lock(&self.forms)?;
        if forms
            .values()
            .any(|f| f.shareable_link == form.shareable_link)
        {
            return Err(StoreError::DuplicateLink(form.shareable_link).into());
        }
        if forms.contains_key(&form.id) {
            anyhow::bail!("form {} already exists", form.id);
        }
        forms.insert(form.id.clone(), form);
        Ok(())
    }

    async fn update_form(&self, form: Form) -> anyhow::Result<()> {
        let mut forms = lock(&self.forms)?;
        match forms.get_mut(&form.id) {
            Some(existing) => {
                *existing = form;
                Ok(())
            }
            None => Err(StoreError::MissingForm(form.id).into()),
        }
    }

    async fn load_form(&self, id: &str) -> anyhow::Result<Option<Form>> {
        Ok(lock(&self.forms)?.get(id).cloned())
    }

    async fn find_by_link(&self, link: &str) -> anyhow::Result<Option<Form>> {
        Ok(lock(&self.forms)?
            .values()
            .find(|f| f.shareable_link == link)
            .cloned())
    }

    async fn forms_by_owner(&self, owner: &str) -> anyhow::Result<Vec<Form>> {
        Ok(lock(&self.forms)?
            .values()
            .filter(|f| f.created_by == owner)
            .cloned()
            .collect())
    }

    async fn save_response(&self, response: Response) -> anyhow::Result<String> {
        if !lock(&self.forms)?.contains_key(&response.form_id) {
            return Err(StoreError::MissingForm(response.form_id).into());
        }
        let id = response.id.clone();
        lock(&self.responses)?
            .entry(response.form_id.clone())
            .or_default()
            .push(response);
        Ok(id)
    }

    async fn responses_for(&self, form_id: &str) -> anyhow::Result<Vec<Response>> {
        Ok(lock(&self.responses)?
            .get(form_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn count_responses(&self, form_id: &str) -> anyhow::Result<usize> {
        Ok(lock(&self.responses)?.get(form_id).map_or(0, Vec::len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use formsmith_core::error::is_link_conflict;
    use std::collections::BTreeMap;

    fn form(id: &str, owner: &str, link: &str) -> Form {
        let now = Utc::now();
        Form {
            id: id.into(),
            title: format!("Form {id}"),
            description: None,
            header_image: None,
            questions: vec![],
            created_by: owner.into(),
            is_published: false,
            shareable_link: link.into(),
            created_at: now,
            updated_at: now,
        }
    }

    fn response(id: &str, form_id: &str) -> Response {
        Response {
            id: id.into(),
            form_id: form_id.into(),
            answers: BTreeMap::new(),
            submitted_at: Utc::now(),
            ip_address: None,
            user_agent: None,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_links() {
        let store = InMemoryStore::new();
        store.insert_form(form("a", "alice", "l1")).await.unwrap();
        let err = store.insert_form(form("b", "bob", "l1")).await.unwrap_err();
        assert!(is_link_conflict(&err));
        assert!(store.load_form("b").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_requires_existing_form() {
        let store = InMemoryStore::new();
        let err = store.update_form(form("a", "alice", "l1")).await.unwrap_err();
        assert!(err.to_string().contains("no stored form"));

        store.insert_form(form("a", "alice", "l1")).await.unwrap();
        let mut changed = form("a", "alice", "l1");
        changed.is_published = true;
        store.update_form(changed).await.unwrap();
        assert!(store.load_published_form("a").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn lookups_by_link_and_owner() {
        let store = InMemoryStore::new();
        store.insert_form(form("a", "alice", "l1")).await.unwrap();
        store.insert_form(form("b", "bob", "l2")).await.unwrap();
        store.insert_form(form("c", "alice", "l3")).await.unwrap();

        assert_eq!(store.find_by_link("l2").await.unwrap().unwrap().id, "b");
        assert!(store.find_by_link("nope").await.unwrap().is_none());
        assert_eq!(store.forms_by_owner("alice").await.unwrap().len(), 2);
        assert!(store.load_published_form("a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn responses_are_appended_per_form() {
        let store = InMemoryStore::new();
        store.insert_form(form("a", "alice", "l1")).await.unwrap();
        store.save_response(response("r1", "a")).await.unwrap();
        store.save_response(response("r2", "a")).await.unwrap();
        assert_eq!(store.count_responses("a").await.unwrap(), 2);
        assert_eq!(store.responses_for("a").await.unwrap().len(), 2);
        assert_eq!(store.count_responses("missing").await.unwrap(), 0);
        assert_eq!(store.response_total(), 2);

        assert!(store.save_response(response("r3", "ghost")).await.is_err());
    }
}
