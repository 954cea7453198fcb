//! Application configuration.
//!
//! Values are layered: built-in defaults, then a YAML config file, then
//! `CHRONICLE_*` environment variables, then command line flags.
//!
//! Without an explicit `--config`, the first of these that exists is used:
//! `./.chronicle.yaml`, `./.chronicle/config.yaml`, `~/.chronicle.yaml`,
//! `<config dir>/chronicle/config.yaml`. Having no config file at all is fine.

pub mod github;
pub mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::format::{DEFAULT_TITLE, OutputFormat};
use crate::release::DescriptionOptions;

pub use github::GitHubConfig;
pub use logging::LoggingConfig;

pub const APPLICATION_NAME: &str = "chronicle";

const ENV_PREFIX: &str = "CHRONICLE_";

/// A nested section of the application config.
///
/// Sections are listed explicitly by [`Application::sections_mut`] and settled
/// in that order once every layer has been applied.
pub trait ConfigSection {
    /// Key of the section in the config file.
    fn name(&self) -> &'static str;

    /// Fill in or normalize values that layering left blank.
    fn apply_defaults(&mut self) {}

    fn validate(&self) -> Result<(), ConfigError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Application {
    /// Where the config was read from, if anywhere.
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
    pub output: OutputFormat,
    pub quiet: bool,
    pub log: LoggingConfig,
    pub speculate_next_version: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version_file: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since_tag: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until_tag: Option<String>,
    pub enforce_v0: bool,
    pub title: String,
    pub github: GitHubConfig,
}

impl Default for Application {
    fn default() -> Self {
        Self {
            config_path: None,
            output: OutputFormat::default(),
            quiet: false,
            log: LoggingConfig::default(),
            speculate_next_version: false,
            version_file: None,
            since_tag: None,
            until_tag: None,
            enforce_v0: false,
            title: DEFAULT_TITLE.to_string(),
            github: GitHubConfig::default(),
        }
    }
}

/// Options given on the command line. Unset values leave the config alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliOptions {
    pub config_path: Option<PathBuf>,
    /// Number of `-v` flags.
    pub verbosity: u8,
    pub quiet: bool,
    pub output: Option<OutputFormat>,
    pub title: Option<String>,
    pub since_tag: Option<String>,
    pub until_tag: Option<String>,
    pub speculate_next_version: bool,
    pub enforce_v0: bool,
    pub version_file: Option<PathBuf>,
}

/// Config file locations to try, in order.
pub fn candidate_paths(
    cwd: Option<&Path>,
    home: Option<&Path>,
    config_dir: Option<&Path>,
) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(cwd) = cwd {
        paths.push(cwd.join(format!(".{}.yaml", APPLICATION_NAME)));
        paths.push(cwd.join(format!(".{}", APPLICATION_NAME)).join("config.yaml"));
    }
    if let Some(home) = home {
        paths.push(home.join(format!(".{}.yaml", APPLICATION_NAME)));
    }
    if let Some(dir) = config_dir {
        paths.push(dir.join(APPLICATION_NAME).join("config.yaml"));
    }
    paths
}

/// Load the application config from the usual places.
pub fn load(cli: &CliOptions) -> Result<Application, ConfigError> {
    let cwd = std::env::current_dir().ok();
    let candidates = candidate_paths(
        cwd.as_deref(),
        dirs::home_dir().as_deref(),
        dirs::config_dir().as_deref(),
    );
    load_from(cli, &candidates, |key| std::env::var(key).ok())
}

/// Load the application config, discovering the file among `candidates` and
/// reading environment overrides through `env`.
pub fn load_from<F>(
    cli: &CliOptions,
    candidates: &[PathBuf],
    env: F,
) -> Result<Application, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let path = match &cli.config_path {
        Some(path) => Some(path.clone()),
        None => candidates.iter().find(|p| p.is_file()).cloned(),
    };

    let mut app = match &path {
        Some(path) => read_config(path)?,
        None => Application::default(),
    };
    app.config_path = path;

    app.apply_env(env)?;
    app.apply_cli(cli);
    app.finalize(cli.verbosity)?;

    Ok(app)
}

fn read_config(path: &Path) -> Result<Application, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    // An empty file is a valid (if pointless) config.
    if contents.trim().is_empty() {
        return Ok(Application::default());
    }

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("expected a boolean, got {:?}", value),
        }),
    }
}

impl Application {
    /// Apply `CHRONICLE_*` environment overrides.
    pub fn apply_env<F>(&mut self, env: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            let key = format!("{}{}", ENV_PREFIX, name);
            env(&key).map(|value| (key, value))
        };

        if let Some((key, value)) = var("OUTPUT") {
            self.output = value
                .parse()
                .map_err(|message| ConfigError::InvalidValue { key, message })?;
        }
        if let Some((_, value)) = var("TITLE") {
            self.title = value;
        }
        if let Some((_, value)) = var("SINCE_TAG") {
            self.since_tag = Some(value);
        }
        if let Some((_, value)) = var("UNTIL_TAG") {
            self.until_tag = Some(value);
        }
        if let Some((_, value)) = var("VERSION_FILE") {
            self.version_file = Some(PathBuf::from(value));
        }
        if let Some((key, value)) = var("SPECULATE_NEXT_VERSION") {
            self.speculate_next_version = parse_bool(&key, &value)?;
        }
        if let Some((key, value)) = var("ENFORCE_V0") {
            self.enforce_v0 = parse_bool(&key, &value)?;
        }
        if let Some((key, value)) = var("QUIET") {
            self.quiet = parse_bool(&key, &value)?;
        }
        if let Some((_, value)) = var("LOG_LEVEL") {
            self.log.level = value;
        }
        if let Some((key, value)) = var("LOG_STRUCTURED") {
            self.log.structured = parse_bool(&key, &value)?;
        }
        if let Some((_, value)) = var("LOG_FILE") {
            self.log.file = Some(PathBuf::from(value));
        }

        Ok(())
    }

    /// Apply command line overrides. Flags that were not given leave the
    /// config untouched.
    pub fn apply_cli(&mut self, cli: &CliOptions) {
        if let Some(output) = cli.output {
            self.output = output;
        }
        if let Some(title) = &cli.title {
            self.title = title.clone();
        }
        if let Some(tag) = &cli.since_tag {
            self.since_tag = Some(tag.clone());
        }
        if let Some(tag) = &cli.until_tag {
            self.until_tag = Some(tag.clone());
        }
        if let Some(path) = &cli.version_file {
            self.version_file = Some(path.clone());
        }
        self.speculate_next_version |= cli.speculate_next_version;
        self.enforce_v0 |= cli.enforce_v0;
        self.quiet |= cli.quiet;
    }

    /// Every config section, in the order they are settled.
    pub fn sections_mut(&mut self) -> [&mut dyn ConfigSection; 2] {
        [&mut self.log, &mut self.github]
    }

    /// Normalize and validate the merged config.
    pub fn finalize(&mut self, verbosity: u8) -> Result<(), ConfigError> {
        for section in self.sections_mut() {
            section.apply_defaults();
        }

        for tag in [&mut self.since_tag, &mut self.until_tag] {
            if tag.as_deref().is_some_and(|t| t.trim().is_empty()) {
                *tag = None;
            }
        }
        if self.title.trim().is_empty() {
            self.title = DEFAULT_TITLE.to_string();
        }

        if self.speculate_next_version && self.until_tag.is_some() {
            return Err(ConfigError::ConflictingOptions);
        }

        self.log.resolve_level(self.quiet, verbosity)?;

        for section in self.sections_mut() {
            section.validate()?;
        }
        Ok(())
    }

    pub fn description_options(&self) -> DescriptionOptions {
        DescriptionOptions {
            since_tag: self.since_tag.clone(),
            until_tag: self.until_tag.clone(),
            speculate_next_version: self.speculate_next_version,
            enforce_v0: self.enforce_v0,
        }
    }

    /// The effective config as YAML, for debug logging.
    pub fn to_yaml(&self) -> String {
        serde_yaml::to_string(self).unwrap_or_else(|e| e.to_string())
    }
}
