//! formsmith CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "formsmith", version, about = "Quiz-style form builder")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create starter config and example form
    Init,

    /// Validate form TOML files
    Validate {
        /// Path to form file or directory
        #[arg(long)]
        form: PathBuf,
    },

    /// Show a form question by question, with answer keys
    Preview {
        /// Path to form file
        #[arg(long)]
        form: PathBuf,
    },

    /// Normalize answers against a form and report progress, without storing
    Check {
        /// Path to form file
        #[arg(long)]
        form: PathBuf,

        /// Answers as inline JSON, or @path to a JSON file
        #[arg(long)]
        answers: String,
    },

    /// Store a form file, or change whether a stored form is published
    Publish {
        /// Path to form file to store
        #[arg(long, required_unless_present = "form_id", conflicts_with = "form_id")]
        form: Option<PathBuf>,

        /// Id of an already stored form
        #[arg(long)]
        form_id: Option<String>,

        /// Keep the form unpublished
        #[arg(long)]
        draft: bool,

        /// Owner (defaults to `default_owner` from config)
        #[arg(long)]
        owner: Option<String>,
    },

    /// List stored forms with response counts
    Forms {
        /// Owner (defaults to `default_owner` from config)
        #[arg(long)]
        owner: Option<String>,
    },

    /// Submit answers to a published form
    Submit {
        /// Form id
        #[arg(long, required_unless_present = "link", conflicts_with = "link")]
        form_id: Option<String>,

        /// Shareable link token
        #[arg(long)]
        link: Option<String>,

        /// Answers as inline JSON, or @path to a JSON file
        #[arg(long)]
        answers: String,

        /// Submit even if some questions are unanswered
        #[arg(long, short = 'y')]
        yes: bool,
    },

    /// Review responses to a form
    Responses {
        /// Form id
        #[arg(long)]
        form_id: String,

        /// Owner (defaults to `default_owner` from config)
        #[arg(long)]
        owner: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("formsmith=info".parse().expect("static directive")),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Validate { form } => commands::validate::execute(form),
        Commands::Preview { form } => commands::preview::execute(form),
        Commands::Check { form, answers } => commands::check::execute(form, answers),
        Commands::Publish {
            form,
            form_id,
            draft,
            owner,
        } => commands::publish::execute(form, form_id, draft, owner, config).await,
        Commands::Forms { owner } => commands::forms::execute(owner, config).await,
        Commands::Submit {
            form_id,
            link,
            answers,
            yes,
        } => commands::submit::execute(form_id, link, answers, yes, config).await,
        Commands::Responses {
            form_id,
            owner,
            format,
        } => commands::responses::execute(form_id, owner, format, config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
