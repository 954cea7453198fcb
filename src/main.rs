//! chronicle - CLI entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use chronicle::config::{self, CliOptions};
use chronicle::format::{present, summary_line};
use chronicle::github::{GitHubClient, GitHubSummarizer};
use chronicle::release::{create_description, write_version_file};
use chronicle::{LocalGit, OutputFormat, logging};

/// Generate a changelog from GitHub issues and git tags.
#[derive(Parser, Debug)]
#[command(name = "chronicle")]
#[command(about = "Generate a changelog from labeled GitHub issues between git tags")]
#[command(version)]
struct Cli {
    /// Path to the git repository
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Tag to start the changelog from (defaults to the latest release)
    #[arg(short = 's', long)]
    since_tag: Option<String>,

    /// Tag to end the changelog at (defaults to unreleased changes)
    #[arg(short = 'u', long)]
    until_tag: Option<String>,

    /// Guess the next version from the changes
    #[arg(short = 'n', long)]
    speculate_next_version: bool,

    /// Keep 0.x versions below 1.0 (major bumps become minor bumps)
    #[arg(long)]
    enforce_v0: bool,

    /// Write the release version to this file
    #[arg(long)]
    version_file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, value_enum)]
    output: Option<OutputFormat>,

    /// Title of the changelog
    #[arg(short = 't', long)]
    title: Option<String>,

    /// Application config file
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Suppress all logging
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Increase verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbosity: u8,
}

impl Cli {
    fn options(&self) -> CliOptions {
        CliOptions {
            config_path: self.config.clone(),
            verbosity: self.verbosity,
            quiet: self.quiet,
            output: self.output,
            title: self.title.clone(),
            since_tag: self.since_tag.clone(),
            until_tag: self.until_tag.clone(),
            speculate_next_version: self.speculate_next_version,
            enforce_v0: self.enforce_v0,
            version_file: self.version_file.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let app = config::load(&cli.options()).context("Invalid application config")?;
    logging::init(&app.log).context("Failed to set up logging")?;

    match &app.config_path {
        Some(path) => debug!(path = %path.display(), "Loaded application config"),
        None => debug!("No application config found, using defaults"),
    }
    debug!("Application config:\n{}", app.to_yaml());

    let client = GitHubClient::from_environment()
        .context("Failed to create GitHub client")?
        .with_retry(app.github.retry_policy());
    let change_types = app.github.change_type_table();

    let summarizer = GitHubSummarizer::new(&cli.path, client, LocalGit, change_types.clone())
        .with_context(|| format!("Unable to summarize {}", cli.path.display()))?
        .with_exclude_labels(app.github.exclude_labels.clone());

    let description = create_description(&summarizer, &change_types, &app.description_options())
        .await
        .context("Failed to build the release description")?;

    info!(
        version = %description.release.version,
        "{}",
        summary_line(&description)
    );

    if let Some(path) = &app.version_file {
        write_version_file(path, &description.release.version)?;
        info!(path = %path.display(), "Wrote release version");
    }

    let rendered = present(&description, &app.title, app.output)?;
    print!("{}", rendered);

    Ok(())
}
