pub mod cli;
pub mod yaml_config;

#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use std::path::PathBuf;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "pricealert", version)]
#[command(about = "Monitor products for price reductions")]
pub struct CliConfig {
    /// Path to the YAML configuration file
    #[arg(short = 'c', long = "config", default_value = "config.yml")]
    pub config: String,

    /// Repeat the check every N seconds instead of running once
    #[arg(long)]
    pub interval: Option<u64>,

    /// Stop after this many periodic runs
    #[arg(long, requires = "interval")]
    pub max_runs: Option<usize>,

    /// Load and validate the config, then list what would be checked
    #[arg(long)]
    pub dry_run: bool,

    /// Print the report but do not send alerts
    #[arg(long)]
    pub no_alerts: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// 相對路徑（例如 history_file）以設定檔所在目錄為基準
    pub fn base_dir(&self) -> PathBuf {
        match std::path::Path::new(&self.config).parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("--config", &self.config)?;
        if let Some(interval) = self.interval {
            validation::validate_positive_number("--interval", interval as usize, 1)?;
        }
        if let Some(max_runs) = self.max_runs {
            validation::validate_positive_number("--max-runs", max_runs, 1)?;
        }
        Ok(())
    }
}
