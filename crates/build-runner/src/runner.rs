//! Bundler process runner.

use crate::ScratchDir;
use camino::{Utf8Path, Utf8PathBuf};
use fixtures::Fixture;
use std::io;
use std::process::Stdio;
use thiserror::Error;
use tokio::process::Command;
use tracing::debug;

/// The output file every build writes, relative to the scratch directory.
pub const OUTPUT_FILE: &str = "out.js";

/// The companion map of [`OUTPUT_FILE`].
pub const MAP_FILE: &str = "out.js.map";

const TOOL_NAME: &str = "esbuild";

/// Error types for the build driver.
///
/// Every variant is fatal for the run that hit it; nothing here is retried.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The bundler binary could not be located.
    #[error("build tool not found at: {0}")]
    NotFound(Utf8PathBuf),

    /// A process could not be started.
    #[error("failed to spawn {program}: {source}")]
    SpawnFailed {
        program: Utf8PathBuf,
        #[source]
        source: io::Error,
    },

    /// The bundler exited with a non-zero status.
    #[error("build tool exited with code {code}: {stderr}")]
    ProcessFailed { code: i32, stderr: String },

    /// The one-time tool build (`make`) failed.
    #[error("building the tool in {root} failed with code {code}: {stderr}")]
    PrepareFailed {
        root: Utf8PathBuf,
        code: i32,
        stderr: String,
    },

    /// The fixture has no entry file to build.
    #[error("fixture {0} has no entry file")]
    NoEntry(String),

    /// The bundler exited cleanly but did not write an expected file.
    #[error("build tool did not write {0}")]
    MissingOutput(Utf8PathBuf),

    /// A scratch file could not be written, read or removed.
    #[error("i/o error on {path}: {source}")]
    Io {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
}

impl BuildError {
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Optional bundler flags for one build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BuildFlags {
    /// Follow imports and emit a single bundle.
    pub bundle: bool,
    /// Minify the output.
    pub minify: bool,
}

impl BuildFlags {
    /// The full argument list for an entry file, in a fixed order.
    pub fn args(&self, entry: &str) -> Vec<String> {
        let mut args = vec![
            entry.to_string(),
            "--sourcemap".to_string(),
            format!("--outfile={OUTPUT_FILE}"),
        ];
        if self.bundle {
            args.push("--bundle".to_string());
        }
        if self.minify {
            args.push("--minify".to_string());
        }
        args
    }

    /// Suffix appended to a variant name to label a run.
    pub fn suffix(&self) -> &'static str {
        if self.minify {
            "-min"
        } else {
            ""
        }
    }
}

/// The generated output of one build, read back from disk.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Contents of [`OUTPUT_FILE`].
    pub output: String,
    /// Contents of [`MAP_FILE`].
    pub map: String,
}

/// Runs the bundler over fixtures.
#[derive(Debug, Clone)]
pub struct BuildRunner {
    tool_path: Utf8PathBuf,
}

impl BuildRunner {
    /// Creates a runner for an already built tool binary.
    pub fn new(tool_path: Utf8PathBuf) -> Self {
        Self { tool_path }
    }

    /// Resolves the bundler binary.
    /// 1. `explicit`, if given (it must exist)
    /// 2. `<root>/esbuild`
    /// 3. PATH
    pub fn find_tool(
        explicit: Option<&Utf8Path>,
        root: &Utf8Path,
    ) -> Result<Utf8PathBuf, BuildError> {
        if let Some(path) = explicit {
            return if path.exists() {
                Ok(path.to_path_buf())
            } else {
                Err(BuildError::NotFound(path.to_path_buf()))
            };
        }

        let candidates: &[&str] = if cfg!(windows) {
            &["esbuild.exe", "esbuild"]
        } else {
            &[TOOL_NAME]
        };
        for candidate in candidates {
            let path = root.join(candidate);
            if path.is_file() {
                return Ok(path);
            }
        }

        if let Ok(path) = which::which(TOOL_NAME) {
            if let Ok(utf8_path) = Utf8PathBuf::try_from(path) {
                return Ok(utf8_path);
            }
        }

        Err(BuildError::NotFound(root.join(TOOL_NAME)))
    }

    /// Builds the tool from source by running `make` in its checkout.
    ///
    /// Must finish before any fixture is built.
    pub async fn prepare(root: &Utf8Path) -> Result<(), BuildError> {
        debug!(%root, "building tool");

        let output = Command::new("make")
            .current_dir(root)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| BuildError::SpawnFailed {
                program: "make".into(),
                source,
            })?;

        if !output.status.success() {
            return Err(BuildError::PrepareFailed {
                root: root.to_path_buf(),
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(())
    }

    /// Writes `fixture` into `scratch`, bundles its entry file, and reads the
    /// output and map back.
    pub async fn build(
        &self,
        fixture: &Fixture,
        flags: BuildFlags,
        scratch: &ScratchDir,
    ) -> Result<BuildOutput, BuildError> {
        let dir = scratch.path();

        for file in fixture.files() {
            let path = dir.join(file.path);
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(|e| BuildError::io(parent, e))?;
            }
            tokio::fs::write(&path, file.source)
                .await
                .map_err(|e| BuildError::io(&path, e))?;
        }

        let entry = fixture
            .entry()
            .ok_or_else(|| BuildError::NoEntry(fixture.variant().to_string()))?;
        let args = flags.args(entry.path);
        debug!(tool = %self.tool_path, cwd = %dir, ?args, "running build tool");

        let output = Command::new(&self.tool_path)
            .args(&args)
            .current_dir(dir)
            .kill_on_drop(true)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|source| BuildError::SpawnFailed {
                program: self.tool_path.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BuildError::ProcessFailed {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        Ok(BuildOutput {
            output: read_artifact(&dir.join(OUTPUT_FILE)).await?,
            map: read_artifact(&dir.join(MAP_FILE)).await?,
        })
    }
}

async fn read_artifact(path: &Utf8Path) -> Result<String, BuildError> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            Err(BuildError::MissingOutput(path.to_path_buf()))
        }
        Err(e) => Err(BuildError::io(path, e)),
    }
}
