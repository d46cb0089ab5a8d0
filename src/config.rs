//! Application configuration.
//!
//! Built-in defaults, overridden by an optional JSON file (`--config`),
//! overridden by command line flags.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};

use crate::core::DEFAULT_SAVE_PATH;
use crate::input::DEFAULT_SOFT_DROP_RELEASE_MS;
use crate::types::FRAME_MS;

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "term-tetris")]
#[command(about = "Falling-block puzzle game for the terminal")]
pub struct Args {
    /// JSON config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Seed for the piece sequence (random when omitted)
    #[arg(long)]
    pub seed: Option<u32>,

    /// File used by save (G) and load (C)
    #[arg(long)]
    pub save_path: Option<PathBuf>,

    /// Milliseconds per frame
    #[arg(long)]
    pub frame_ms: Option<u64>,

    /// Soft drop release timeout for terminals without key release events
    #[arg(long)]
    pub soft_drop_release_ms: Option<u64>,

    /// Write logs to this file (nothing is logged otherwise)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub seed: Option<u32>,
    pub save_path: PathBuf,
    pub frame_ms: u64,
    pub soft_drop_release_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            seed: None,
            save_path: PathBuf::from(DEFAULT_SAVE_PATH),
            frame_ms: FRAME_MS as u64,
            soft_drop_release_ms: DEFAULT_SOFT_DROP_RELEASE_MS,
        }
    }
}

impl AppConfig {
    /// Read a JSON config file; missing keys keep their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, then `--config`, then the individual flags
    pub fn resolve(args: &Args) -> Result<Self> {
        let mut config = match &args.config {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_args(args);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_args(&mut self, args: &Args) {
        if let Some(seed) = args.seed {
            self.seed = Some(seed);
        }
        if let Some(path) = &args.save_path {
            self.save_path = path.clone();
        }
        if let Some(ms) = args.frame_ms {
            self.frame_ms = ms;
        }
        if let Some(ms) = args.soft_drop_release_ms {
            self.soft_drop_release_ms = ms;
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_ms == 0 {
            bail!("frame_ms must be at least 1");
        }
        if self.save_path.as_os_str().is_empty() {
            bail!("save_path must not be empty");
        }
        Ok(())
    }
}
