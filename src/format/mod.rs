//! Render a release description as a changelog.

pub mod json;
pub mod markdown;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::OutputError;
use crate::release::Description;

pub use markdown::{DEFAULT_TITLE, render_markdown, summary_line};

/// Output formats for the rendered changelog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown
    #[default]
    #[serde(alias = "markdown")]
    #[value(alias = "markdown")]
    Md,
    /// The full release description as JSON
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Md),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Render `description` in the requested format.
pub fn present(
    description: &Description,
    title: &str,
    format: OutputFormat,
) -> Result<String, OutputError> {
    match format {
        OutputFormat::Md => Ok(render_markdown(description, title)),
        OutputFormat::Json => json::render_json(description),
    }
}
