//! The `formsmith forms` command.

use std::path::PathBuf;

use anyhow::Result;
use comfy_table::{Cell, Table};

use super::service;

pub async fn execute(owner: Option<String>, config_path: Option<PathBuf>) -> Result<()> {
    let (service, config) = service(config_path.as_deref())?;
    let owner = owner.unwrap_or(config.default_owner);

    let summaries = service.list_forms(&owner).await?;
    if summaries.is_empty() {
        println!("No forms for {owner}. Run `formsmith publish --form <file>` to add one.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["ID", "Title", "Status", "Link", "Responses", "Created"]);

    for summary in &summaries {
        table.add_row(vec![
            Cell::new(&summary.id),
            Cell::new(&summary.title),
            Cell::new(if summary.is_published {
                "published"
            } else {
                "draft"
            }),
            Cell::new(&summary.shareable_link),
            Cell::new(summary.responses),
            Cell::new(summary.created_at.format("%Y-%m-%d %H:%M")),
        ]);
    }

    println!("{table}");
    Ok(())
}
