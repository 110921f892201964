//! The `formsmith responses` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use formsmith_core::review::ReviewedResponse;

use super::service;

pub async fn execute(
    form_id: String,
    owner: Option<String>,
    format: String,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (service, config) = service(config_path.as_deref())?;
    let owner = owner.unwrap_or(config.default_owner);

    let form = service.owned_form(&owner, &form_id).await?;
    let reviewed = service.review(&owner, &form_id).await?;

    match format.as_str() {
        "json" => {
            let json = serde_json::to_string_pretty(&reviewed)
                .context("failed to serialize responses")?;
            println!("{json}");
        }
        "text" => {
            println!("{}: {} response(s)", form.title, reviewed.len());
            for response in &reviewed {
                print_response(response)?;
            }
        }
        other => anyhow::bail!("unknown format: {other} (expected text or json)"),
    }

    Ok(())
}

fn print_response(response: &ReviewedResponse) -> Result<()> {
    println!();
    println!(
        "Response {} ({})",
        response.response_id,
        response.submitted_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    if response.answers.is_empty() {
        println!("  (no answers)");
    }
    for answer in &response.answers {
        let value = serde_json::to_string(&answer.answer).context("failed to render answer")?;
        let note = if answer.orphaned {
            " (question removed)"
        } else {
            ""
        };
        println!("  {}: {value}{note}", answer.label);
    }
    Ok(())
}
