//! JSON-directory store.
//!
//! Layout under the root directory:
//!
//! ```text
//! forms/<form id>.json
//! responses/<form id>/<response id>.json
//! ```
//!
//! Each record is one pretty-printed JSON file. Unreadable records are
//! skipped with a warning rather than failing the whole listing.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;

use formsmith_core::error::StoreError;
use formsmith_core::model::{Form, Response};
use formsmith_core::traits::FormStore;

pub struct JsonDirStore {
    root: PathBuf,
}

impl JsonDirStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn forms_dir(&self) -> PathBuf {
        self.root.join("forms")
    }

    fn responses_dir(&self, form_id: &str) -> PathBuf {
        self.root.join("responses").join(form_id)
    }

    fn form_path(&self, id: &str) -> PathBuf {
        self.forms_dir().join(format!("{id}.json"))
    }

    async fn all_forms(&self) -> Result<Vec<Form>> {
        read_records(&self.forms_dir()).await
    }
}

/// Ids end up in file names, so only a conservative character set is allowed.
fn is_safe_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

fn check_id(id: &str) -> Result<()> {
    if is_safe_id(id) {
        Ok(())
    } else {
        anyhow::bail!("invalid record id: {id:?}")
    }
}

async fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(record).context("failed to serialize record")?;
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(path, json)
        .await
        .with_context(|| format!("failed to write {}", path.display()))
}

async fn read_record<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
}

async fn read_records<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    if !tokio::fs::try_exists(dir).await.unwrap_or(false) {
        return Ok(Vec::new());
    }

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("failed to read directory: {}", dir.display()))?;
    let mut records = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        match read_record(&path).await {
            Ok(record) => records.push(record),
            Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
        }
    }
    Ok(records)
}

#[async_trait]
impl FormStore for JsonDirStore {
    fn name(&self) -> &str {
        "json-dir"
    }

    async fn insert_form(&self, form: Form) -> Result<()> {
        check_id(&form.id)?;
        if self.find_by_link(&form.shareable_link).await?.is_some() {
            return Err(StoreError::DuplicateLink(form.shareable_link).into());
        }
        let path = self.form_path(&form.id);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            anyhow::bail!("form {} already exists", form.id);
        }
        write_record(&path, &form).await?;
        tracing::debug!("wrote {}", path.display());
        Ok(())
    }

    async fn update_form(&self, form: Form) -> Result<()> {
        check_id(&form.id)?;
        let path = self.form_path(&form.id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Err(StoreError::MissingForm(form.id).into());
        }
        write_record(&path, &form).await
    }

    async fn load_form(&self, id: &str) -> Result<Option<Form>> {
        if !is_safe_id(id) {
            return Ok(None);
        }
        let path = self.form_path(id);
        if !tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return Ok(None);
        }
        read_record(&path).await.map(Some)
    }

    async fn find_by_link(&self, link: &str) -> Result<Option<Form>> {
        Ok(self
            .all_forms()
            .await?
            .into_iter()
            .find(|f| f.shareable_link == link))
    }

    async fn forms_by_owner(&self, owner: &str) -> Result<Vec<Form>> {
        Ok(self
            .all_forms()
            .await?
            .into_iter()
            .filter(|f| f.created_by == owner)
            .collect())
    }

    async fn save_response(&self, response: Response) -> Result<String> {
        check_id(&response.form_id)?;
        check_id(&response.id)?;
        if !tokio::fs::try_exists(self.form_path(&response.form_id))
            .await
            .unwrap_or(false)
        {
            return Err(StoreError::MissingForm(response.form_id).into());
        }
        let path = self
            .responses_dir(&response.form_id)
            .join(format!("{}.json", response.id));
        write_record(&path, &response).await?;
        Ok(response.id)
    }

    async fn responses_for(&self, form_id: &str) -> Result<Vec<Response>> {
        if !is_safe_id(form_id) {
            return Ok(Vec::new());
        }
        read_records(&self.responses_dir(form_id)).await
    }
}
