use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line overrides for the config file.
#[derive(Debug, Default, Parser)]
#[command(author, version, about = "Terminal calendar with scrollable hour and weekday panes", long_about = None)]
pub struct Cli {
    /// Path to a TOML configuration file (defaults to <config dir>/calgrid/config.toml).
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Where events come from.
    #[arg(long, value_enum)]
    pub source: Option<SourceKind>,
    /// Base URL of the calendar server (implies --source remote).
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,
    /// JSON file of event records (implies --source fixture).
    #[arg(long, value_name = "FILE")]
    pub fixture: Option<PathBuf>,
    /// View shown at startup.
    #[arg(long, value_enum)]
    pub view: Option<StartView>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    Synthetic,
    Remote,
    Fixture,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StartView {
    #[default]
    Day,
    Week,
}
