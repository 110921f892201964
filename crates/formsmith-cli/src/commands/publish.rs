//! The `formsmith publish` command.

use std::path::PathBuf;

use anyhow::Result;

use formsmith_core::parser;

use super::service;

pub async fn execute(
    form_path: Option<PathBuf>,
    form_id: Option<String>,
    draft: bool,
    owner: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (service, config) = service(config_path.as_deref())?;
    let owner = owner.unwrap_or(config.default_owner);

    let form = match (form_path, form_id) {
        (Some(path), _) => {
            let mut definition = parser::parse_form(&path)?;
            let warnings = parser::validate_form(&definition);
            for w in &warnings {
                eprintln!("Warning: {w}");
            }
            definition.is_published = !draft;
            service.create_form(&owner, definition).await?
        }
        (None, Some(id)) => service.set_published(&owner, &id, !draft).await?,
        (None, None) => anyhow::bail!("either --form or --form-id is required"),
    };

    println!("Form: {}", form.title);
    println!("ID: {}", form.id);
    println!("Link: {}", form.shareable_link);
    println!(
        "Status: {}",
        if form.is_published { "published" } else { "draft" }
    );

    Ok(())
}
