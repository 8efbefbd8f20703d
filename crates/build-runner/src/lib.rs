//! Build driver for source map verification.
//!
//! Materializes a fixture into a fresh scratch directory, runs the bundler
//! over it with a fixed flag set, and reads back the generated output and its
//! map.

mod runner;
mod scratch;

pub use runner::{BuildError, BuildFlags, BuildOutput, BuildRunner, MAP_FILE, OUTPUT_FILE};
pub use scratch::ScratchDir;
