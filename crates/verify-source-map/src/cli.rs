//! CLI argument parsing.

use camino::Utf8PathBuf;
use clap::{Parser, ValueEnum};

/// Verifies a bundler's source maps against multi-file fixtures.
#[derive(Debug, Parser)]
#[command(name = "verify-source-map")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the build tool binary
    #[arg(long, env = "VERIFY_SOURCE_MAP_TOOL")]
    pub tool: Option<Utf8PathBuf>,

    /// The build tool's checkout, where `make` runs
    #[arg(long = "tool-root", default_value = ".")]
    pub tool_root: Utf8PathBuf,

    /// Don't run `make` before verifying (the tool is prebuilt)
    #[arg(long = "skip-build")]
    pub skip_build: bool,

    /// Directory to create scratch directories in (defaults to the tool root)
    #[arg(long = "scratch-root")]
    pub scratch_root: Option<Utf8PathBuf>,

    /// Leave scratch directories on disk
    #[arg(long = "keep-scratch")]
    pub keep_scratch: bool,

    /// Fixture variants to verify (commonjs, es6, ts); all when omitted
    #[arg(long = "variant")]
    pub variants: Vec<String>,

    /// Build modes to verify; both when omitted
    #[arg(long = "mode", value_enum)]
    pub modes: Vec<Mode>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub output: OutputFormat,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Output format options.
#[derive(Debug, Clone, Copy, ValueEnum, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One line per task plus a summary (default)
    #[default]
    Human,
    /// A single JSON document
    Json,
}

/// Build mode.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, Hash)]
pub enum Mode {
    /// No minification
    Plain,
    /// `--minify`
    Minified,
}

impl Mode {
    /// Every mode, in the order tasks are launched.
    pub const ALL: [Mode; 2] = [Mode::Plain, Mode::Minified];

    pub fn minify(self) -> bool {
        matches!(self, Mode::Minified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let args = Args::parse_from(["verify-source-map"]);
        assert_eq!(args.tool_root.as_str(), ".");
        assert!(args.tool.is_none() || std::env::var_os("VERIFY_SOURCE_MAP_TOOL").is_some());
        assert!(!args.skip_build);
        assert!(!args.keep_scratch);
        assert!(args.variants.is_empty());
        assert!(args.modes.is_empty());
        assert_eq!(args.output, OutputFormat::Human);
    }

    #[test]
    fn test_repeated_filters() {
        let args = Args::parse_from([
            "verify-source-map",
            "--variant",
            "es6",
            "--variant",
            "ts",
            "--mode",
            "minified",
        ]);
        assert_eq!(args.variants, vec!["es6", "ts"]);
        assert_eq!(args.modes, vec![Mode::Minified]);
    }

    #[test]
    fn test_tool_paths() {
        let args = Args::parse_from([
            "verify-source-map",
            "--tool",
            "/opt/esbuild/esbuild",
            "--tool-root",
            "/opt/esbuild",
            "--scratch-root",
            "/tmp",
            "--skip-build",
            "--keep-scratch",
        ]);
        assert_eq!(args.tool.as_deref().map(|p| p.as_str()), Some("/opt/esbuild/esbuild"));
        assert_eq!(args.tool_root.as_str(), "/opt/esbuild");
        assert_eq!(args.scratch_root.as_deref().map(|p| p.as_str()), Some("/tmp"));
        assert!(args.skip_build);
        assert!(args.keep_scratch);
    }

    #[test]
    fn test_output_formats() {
        let args = Args::parse_from(["verify-source-map", "--output", "json"]);
        assert_eq!(args.output, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_mode_is_rejected() {
        assert!(Args::try_parse_from(["verify-source-map", "--mode", "tiny"]).is_err());
    }

    #[test]
    fn test_minify() {
        assert!(!Mode::Plain.minify());
        assert!(Mode::Minified.minify());
    }
}
