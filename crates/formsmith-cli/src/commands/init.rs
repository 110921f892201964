//! The `formsmith init` command.

use std::path::Path;

use anyhow::{Context, Result};

pub fn execute() -> Result<()> {
    write_if_missing(Path::new("formsmith.toml"), SAMPLE_CONFIG)?;

    std::fs::create_dir_all("forms").context("failed to create forms/")?;
    write_if_missing(Path::new("forms/example.toml"), EXAMPLE_FORM)?;

    println!("\nNext steps:");
    println!("  1. Run: formsmith preview --form forms/example.toml");
    println!("  2. Run: formsmith publish --form forms/example.toml");
    println!("  3. Share the printed link and collect responses");

    Ok(())
}

fn write_if_missing(path: &Path, contents: &str) -> Result<()> {
    if path.exists() {
        println!("{} already exists, skipping.", path.display());
        return Ok(());
    }
    std::fs::write(path, contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Created {}", path.display());
    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# formsmith configuration

# Where stored forms and responses live. ${VAR} references are expanded.
data_dir = "./formsmith-data"

# Owner recorded on forms when --owner is not given
default_owner = "local"

# Length of generated shareable links (8 to 32)
link_length = 26
"#;

const EXAMPLE_FORM: &str = r#"[form]
title = "Example form"
description = "One question of each kind"
published = true

[[questions]]
id = "sort"
type = "categorize"
title = "Sort the animals"
[questions.content]
items = ["Salmon", "Eagle", "Shark", "Sparrow"]
categories = ["Fish", "Bird"]

[[questions]]
id = "blanks"
type = "cloze"
title = "Fill in the blanks"
[questions.content]
text = "The quick brown fox jumps over the <u>lazy</u> dog and runs through the <u>forest</u>."

[[questions]]
id = "reading"
type = "comprehension"
title = "Read and answer"
[questions.content]
passage = "Foxes are small omnivores. They hunt mostly at dusk and at night."

[[questions.content.questions]]
question = "When do foxes mostly hunt?"
options = ["At noon", "At dusk and at night", "Never"]
correct = 1

[[questions]]
id = "capital"
type = "multiple-choice"
title = "Geography"
[questions.content]
question = "What is the capital of France?"
options = ["Berlin", "Paris", "Madrid"]
correct = 1
"#;
