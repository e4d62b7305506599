//! Run artifact consistency checker.
//!
//! `runcheck validate <artifact>` checks a run artifact and prints every
//! violation in one pass. `runcheck derive` prints the branch name and commit
//! message a task should use so deliveries pass the checker.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::debug;

use runcheck::core::naming::{DeriveRequest, derive};
use runcheck::core::types::ValidateOptions;
use runcheck::exit_codes;
use runcheck::io::config::{CheckerConfig, DEFAULT_CONFIG_FILE, DeriveConfig, load_config};
use runcheck::logging;
use runcheck::report::{exit_code, render, render_abort};
use runcheck::validate::validate_path;

#[derive(Parser)]
#[command(
    name = "runcheck",
    version,
    about = "Consistency checker for multi-task run artifacts"
)]
struct Cli {
    /// Config file (missing file means defaults).
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate a run artifact JSON file.
    Validate {
        /// Path to the run artifact.
        artifact: PathBuf,
        /// Allow a non-empty `escalations` section.
        #[arg(long)]
        allow_escalations: bool,
    },
    /// Print the branch name and commit message for a task as JSON.
    Derive(DeriveArgs),
}

#[derive(Args)]
struct DeriveArgs {
    #[arg(long)]
    task_id: String,
    #[arg(long)]
    title: String,
    /// Summary for the commit message and branch slug (defaults to the title).
    #[arg(long)]
    commit_summary: Option<String>,
    #[arg(long)]
    commit_type: Option<String>,
    /// Feature/component scope; `auto` picks a default for the commit type.
    #[arg(long)]
    commit_scope: Option<String>,
    /// Branch prefix; `auto` uses the commit type.
    #[arg(long)]
    branch_prefix: Option<String>,
    #[arg(long)]
    max_branch_length: Option<usize>,
}

impl DeriveArgs {
    fn into_request(self, defaults: DeriveConfig) -> DeriveRequest {
        DeriveRequest {
            task_id: self.task_id,
            title: self.title,
            commit_summary: self.commit_summary,
            commit_type: self.commit_type.unwrap_or(defaults.commit_type),
            commit_scope: Some(self.commit_scope.unwrap_or(defaults.commit_scope)),
            branch_prefix: self.branch_prefix.unwrap_or(defaults.branch_prefix),
            max_branch_length: self.max_branch_length.unwrap_or(defaults.max_branch_length),
        }
    }
}

fn main() {
    logging::init();
    match run() {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            print!("{}", render_abort(&format!("{err:#}")));
            std::process::exit(exit_codes::INVALID);
        }
    }
}

fn run() -> Result<i32> {
    let cli = Cli::parse();
    let config = load_config(&cli.config).context("load config")?;
    match cli.command {
        Command::Validate {
            artifact,
            allow_escalations,
        } => cmd_validate(&artifact, allow_escalations, &config),
        Command::Derive(args) => cmd_derive(args, &config),
    }
}

fn cmd_validate(artifact: &Path, allow_escalations: bool, config: &CheckerConfig) -> Result<i32> {
    let options = ValidateOptions {
        allow_escalations: allow_escalations || config.validate.allow_escalations,
    };
    // Load failures are reported on stdout like violations, not as CLI errors.
    match validate_path(artifact, options) {
        Ok(report) => {
            print!("{}", render(&report));
            Ok(exit_code(&report))
        }
        Err(err) => {
            debug!(error = ?err, "artifact could not be loaded");
            print!("{}", render_abort(&err));
            Ok(exit_codes::INVALID)
        }
    }
}

fn cmd_derive(args: DeriveArgs, config: &CheckerConfig) -> Result<i32> {
    let request = args.into_request(config.derive.clone());
    let derivation = derive(&request)?;
    let payload = serde_json::to_string_pretty(&derivation).context("serialize derivation")?;
    println!("{payload}");
    Ok(exit_codes::OK)
}
