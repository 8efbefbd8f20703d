//! Source map verification.
//!
//! Given a fixture, the bundle generated from it and the bundle's source map,
//! [`verify`] checks that the bundle links its map and that every probe's
//! quoted literal maps back to the exact line and column it was written at.
//!
//! Two kinds of problems are kept apart. A [`HarnessFault`] means the fixture
//! or the build contract is broken and the run must stop. A failed
//! [`CheckResult`] means the bundler emitted a wrong mapping; those are
//! counted and reported, and the remaining checks still run.

mod check;
mod error;
mod verify;

pub use check::{CheckRecorder, CheckResult, NullReporter, Reporter};
pub use error::{HarnessFault, SearchLocation};
pub use verify::{verify, verify_report, VerifyReport, MAP_LINK_TRAILER};
