pub mod check;
pub mod forms;
pub mod init;
pub mod preview;
pub mod publish;
pub mod responses;
pub mod submit;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use formsmith_core::FormService;
use formsmith_store::{load_config_from, open_service, FormsmithConfig};

/// Parse an `--answers` argument: inline JSON, or `@path` naming a JSON file.
pub fn read_answers(arg: &str) -> Result<Value> {
    let (content, source) = match arg.strip_prefix('@') {
        Some(path) => (
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read answers file: {path}"))?,
            path,
        ),
        None => (arg.to_string(), "--answers"),
    };
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {source}"))
}

/// Load config and open the configured store.
pub fn service(config_path: Option<&Path>) -> Result<(FormService, FormsmithConfig)> {
    let config = load_config_from(config_path)?;
    let service = open_service(&config);
    Ok((service, config))
}
