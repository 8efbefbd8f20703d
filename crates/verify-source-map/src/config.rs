//! Run configuration.

use crate::cli::{Args, Mode, OutputFormat};
use camino::{Utf8Path, Utf8PathBuf};
use fixtures::Variant;
use thiserror::Error;

const SKIP_BUILD_ENV: &str = "VERIFY_SOURCE_MAP_SKIP_BUILD";

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A `--variant` value names no fixture.
    #[error("{0}")]
    UnknownVariant(String),
}

/// Resolved settings for one verification run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Explicit build tool binary, if given.
    pub tool: Option<Utf8PathBuf>,
    /// The build tool's checkout.
    pub tool_root: Utf8PathBuf,
    /// Skip the one-time `make`.
    pub skip_build: bool,
    /// Parent of every scratch directory.
    pub scratch_root: Utf8PathBuf,
    pub keep_scratch: bool,
    /// Variants to verify, in launch order.
    pub variants: Vec<Variant>,
    /// Modes to verify, in launch order.
    pub modes: Vec<Mode>,
    pub output: OutputFormat,
}

impl Config {
    /// Resolves CLI arguments and environment fallbacks.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let tool_root = absolute(&args.tool_root);
        let scratch_root = args
            .scratch_root
            .as_deref()
            .map(absolute)
            .unwrap_or_else(|| tool_root.clone());

        let variants = if args.variants.is_empty() {
            Variant::ALL.to_vec()
        } else {
            let mut variants = Vec::new();
            for name in &args.variants {
                let variant: Variant = name.parse().map_err(ConfigError::UnknownVariant)?;
                if !variants.contains(&variant) {
                    variants.push(variant);
                }
            }
            variants
        };

        let modes = if args.modes.is_empty() {
            Mode::ALL.to_vec()
        } else {
            let mut modes = Vec::new();
            for mode in &args.modes {
                if !modes.contains(mode) {
                    modes.push(*mode);
                }
            }
            modes
        };

        Ok(Self {
            tool: args.tool.as_deref().map(absolute),
            tool_root,
            skip_build: args.skip_build || read_env_bool(SKIP_BUILD_ENV).unwrap_or(false),
            scratch_root,
            keep_scratch: args.keep_scratch,
            variants,
            modes,
            output: args.output,
        })
    }

    /// Number of verification tasks the run launches.
    pub fn task_count(&self) -> usize {
        self.variants.len() * self.modes.len()
    }
}

fn absolute(path: &Utf8Path) -> Utf8PathBuf {
    if path.is_relative() {
        std::env::current_dir()
            .map(|p| Utf8PathBuf::try_from(p).unwrap_or_default())
            .unwrap_or_default()
            .join(path)
    } else {
        path.to_path_buf()
    }
}

fn read_env_bool(name: &str) -> Option<bool> {
    let value = std::env::var(name).ok()?;
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
