use std::{
    fs,
    path::{Path, PathBuf},
};

use color_eyre::eyre::{Result, WrapErr};
use serde::Deserialize;

use crate::calendar::{EventSource, FixtureSource, RemoteSource, SyntheticSource};
use crate::cli::{Cli, SourceKind, StartView};
use crate::theme::ThemeConfig;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceConfig,
    pub display: DisplayConfig,
    pub theme: ThemeConfig,
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,
    pub url: String,
    pub timeout_secs: u64,
    pub lookahead_days: i64,
    pub fixture: Option<PathBuf>,
    pub synthetic_count: usize,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            kind: SourceKind::Synthetic,
            url: "http://localhost:4567".to_string(),
            timeout_secs: 10,
            lookahead_days: 365,
            fixture: None,
            synthetic_count: 200,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub hour_height: u16,
    pub day_height: u16,
    pub start_view: StartView,
    pub tick_ms: u64,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            hour_height: 4,
            day_height: 8,
            start_view: StartView::Day,
            tick_ms: 100,
        }
    }
}

impl AppConfig {
    /// Load the config from `path`, or from the default location when it
    /// exists, then apply command-line overrides.
    pub fn load(cli: &Cli) -> Result<Self> {
        let mut config = match cli.config.as_deref() {
            Some(path) => Self::from_file(path)?,
            None => match default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };
        config.apply_cli(cli);
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&contents)
            .wrap_err_with(|| format!("failed to parse config file {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    fn apply_cli(&mut self, cli: &Cli) {
        if let Some(kind) = cli.source {
            self.source.kind = kind;
        }
        if let Some(url) = &cli.url {
            self.source.url = url.clone();
            self.source.kind = SourceKind::Remote;
        }
        if let Some(fixture) = &cli.fixture {
            self.source.fixture = Some(fixture.clone());
            self.source.kind = SourceKind::Fixture;
        }
        if let Some(view) = cli.view {
            self.display.start_view = view;
        }
    }

    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file
            .clone()
            .or_else(|| dirs::cache_dir().map(|d| d.join("calgrid").join("calgrid.log")))
    }

    pub fn build_source(&self) -> Result<Box<dyn EventSource>> {
        let source = &self.source;
        let built: Box<dyn EventSource> = match source.kind {
            SourceKind::Synthetic => Box::new(SyntheticSource::new(source.synthetic_count)),
            SourceKind::Remote => Box::new(RemoteSource::new(
                source.url.clone(),
                source.timeout_secs,
                source.lookahead_days,
            )),
            SourceKind::Fixture => {
                let path = source
                    .fixture
                    .clone()
                    .ok_or_else(|| color_eyre::eyre::eyre!("fixture source needs a `fixture` path"))?;
                Box::new(FixtureSource::new(path))
            }
        };
        Ok(built)
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("calgrid").join("config.toml"))
}
