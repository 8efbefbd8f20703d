//! Main orchestration logic.

use crate::cli::Mode;
use crate::config::Config;
use crate::output::RunSummary;
use build_runner::{BuildError, BuildFlags, BuildRunner, ScratchDir};
use camino::Utf8PathBuf;
use fixtures::{Fixture, Variant};
use map_verifier::{HarnessFault, Reporter, VerifyReport};
use std::sync::Arc;
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{debug, info};

/// Orchestration errors. Any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum RunError {
    /// The build tool could not be built, found or run.
    #[error(transparent)]
    Build(#[from] BuildError),

    /// The harness itself is broken.
    #[error(transparent)]
    Harness(#[from] HarnessFault),

    /// A verification task panicked or was cancelled.
    #[error("verification task failed: {0}")]
    Join(String),
}

/// One cell of the verification matrix.
#[derive(Debug, Clone, Copy)]
struct Task {
    variant: Variant,
    flags: BuildFlags,
}

impl Task {
    fn new(variant: Variant, mode: Mode) -> Self {
        Self {
            variant,
            flags: BuildFlags {
                bundle: variant.bundles(),
                minify: mode.minify(),
            },
        }
    }

    /// The label used in diagnostics, e.g. `commonjs-min`.
    fn kind(&self) -> String {
        format!("{}{}", self.variant.name(), self.flags.suffix())
    }
}

/// Runs every configured variant × mode combination.
pub async fn run(config: &Config, reporter: Arc<dyn Reporter>) -> Result<RunSummary, RunError> {
    if !config.skip_build {
        BuildRunner::prepare(&config.tool_root).await?;
    }

    let tool = BuildRunner::find_tool(config.tool.as_deref(), &config.tool_root)?;
    debug!(%tool, "using build tool");
    let runner = Arc::new(BuildRunner::new(tool));

    debug!(tasks = config.task_count(), "launching verification tasks");
    let mut tasks = JoinSet::new();
    let mut index = 0usize;
    for &mode in &config.modes {
        for &variant in &config.variants {
            let task = Task::new(variant, mode);
            let runner = Arc::clone(&runner);
            let reporter = Arc::clone(&reporter);
            let scratch_root = config.scratch_root.clone();
            let keep = config.keep_scratch;
            let slot = index;
            tasks.spawn(async move {
                let report = run_task(task, &runner, scratch_root, keep, reporter.as_ref()).await;
                (slot, report)
            });
            index += 1;
        }
    }

    let mut reports: Vec<Option<VerifyReport>> = vec![None; index];
    while let Some(joined) = tasks.join_next().await {
        let outcome = match joined {
            Ok((slot, Ok(report))) => Ok((slot, report)),
            Ok((_, Err(e))) => Err(e),
            Err(e) => Err(RunError::Join(e.to_string())),
        };
        match outcome {
            Ok((slot, report)) => reports[slot] = Some(report),
            Err(e) => {
                // Wait for the aborted tasks to be dropped so their scratch
                // directories and bundler processes are gone before returning.
                tasks.shutdown().await;
                return Err(e);
            }
        }
    }

    Ok(RunSummary {
        tasks: reports.into_iter().flatten().collect(),
    })
}

/// Builds one fixture in its own scratch directory and verifies the result.
async fn run_task(
    task: Task,
    runner: &BuildRunner,
    scratch_root: Utf8PathBuf,
    keep: bool,
    reporter: &dyn Reporter,
) -> Result<VerifyReport, RunError> {
    let kind = task.kind();
    let fixture = Fixture::for_variant(task.variant);
    fixture.validate().map_err(HarnessFault::from)?;

    let scratch = ScratchDir::create(&scratch_root).await?.keep(keep);
    let result = verify_in(&kind, &fixture, task.flags, runner, &scratch, reporter).await;
    let cleanup = scratch.remove().await;

    let report = result?;
    cleanup?;
    info!(kind = %kind, passed = report.passed, failed = report.failed, "task finished");
    Ok(report)
}

async fn verify_in(
    kind: &str,
    fixture: &Fixture,
    flags: BuildFlags,
    runner: &BuildRunner,
    scratch: &ScratchDir,
    reporter: &dyn Reporter,
) -> Result<VerifyReport, RunError> {
    let built = runner.build(fixture, flags, scratch).await?;
    let report = map_verifier::verify_report(kind, fixture, &built.output, &built.map, reporter)?;
    Ok(report)
}
