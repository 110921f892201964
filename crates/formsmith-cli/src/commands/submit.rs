//! The `formsmith submit` command.

use std::path::PathBuf;

use anyhow::Result;
use serde_json::Map;

use formsmith_core::model::SubmissionMeta;
use formsmith_core::progress::unanswered;
use formsmith_core::review::question_label;

use super::{read_answers, service};

pub async fn execute(
    form_id: Option<String>,
    link: Option<String>,
    answers_arg: String,
    yes: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (service, _) = service(config_path.as_deref())?;
    let raw = read_answers(&answers_arg)?;

    let form = match (form_id, link) {
        (Some(id), _) => service.published_form(&id).await?,
        (None, Some(link)) => service.published_form_by_link(&link).await?,
        (None, None) => anyhow::bail!("either --form-id or --link is required"),
    };

    let empty = Map::new();
    let missing = unanswered(&form.questions, raw.as_object().unwrap_or(&empty));
    if !missing.is_empty() {
        let labels: Vec<String> = missing
            .iter()
            .map(|q| question_label(Some(*q), &q.id))
            .collect();
        if !yes {
            anyhow::bail!(
                "{} question(s) unanswered: {}. Pass --yes to submit anyway.",
                missing.len(),
                labels.join(", ")
            );
        }
        eprintln!("Submitting with unanswered questions: {}", labels.join(", "));
    }

    let meta = SubmissionMeta {
        ip_address: None,
        user_agent: Some(format!("formsmith-cli/{}", env!("CARGO_PKG_VERSION"))),
    };
    let id = service.submit_response(&form.id, &raw, meta).await?;
    println!("Submitted response {id} to \"{}\"", form.title);

    Ok(())
}
