//! Probe-by-probe mapping verification.

use crate::{CheckRecorder, CheckResult, HarnessFault, Reporter, SearchLocation};
use fixtures::{Fixture, Probe};
use serde::Serialize;
use source_map::{Coordinate, LineIndex, OriginalPosition, OriginalPositionFor, ParsedMap};
use text_size::TextSize;
use tracing::debug;

/// The line a generated bundle must contain to link its map.
pub const MAP_LINK_TRAILER: &str = "//# sourceMappingURL=out.js.map\n";

/// Every check of one verification run.
#[derive(Debug, Clone, Serialize)]
pub struct VerifyReport {
    /// The run label, e.g. `es6-min`.
    pub kind: String,
    pub passed: usize,
    pub failed: usize,
    pub checks: Vec<CheckResult>,
}

/// Verifies a bundle and its map against the fixture it was built from.
///
/// Returns the number of failed checks; `0` means every probe mapped back
/// exactly.
pub fn verify(
    kind: &str,
    fixture: &Fixture,
    output: &str,
    map: &str,
    reporter: &dyn Reporter,
) -> Result<usize, HarnessFault> {
    verify_report(kind, fixture, output, map, reporter).map(|report| report.failed)
}

/// Like [`verify`], but keeps every check for structured output.
pub fn verify_report(
    kind: &str,
    fixture: &Fixture,
    output: &str,
    map: &str,
    reporter: &dyn Reporter,
) -> Result<VerifyReport, HarnessFault> {
    let map = ParsedMap::parse(map)?;
    debug!(
        kind,
        sources = ?map.sources().collect::<Vec<_>>(),
        tokens = map.token_count(),
        "parsed source map"
    );
    let output_index = LineIndex::new(output);
    let mut recorder = CheckRecorder::new(kind, reporter);

    recorder.record(
        output.contains(MAP_LINK_TRAILER),
        ".js file links to .js.map",
    );

    for probe in fixture.probes() {
        let (expected, generated) = probe_positions(fixture, probe, output, &output_index)?;
        let observed = map.original_position_for(generated);
        if expected != observed {
            debug!(
                kind,
                probe = probe.id,
                %generated,
                line = output_index.line_text(generated.line).unwrap_or_default(),
                "probe did not map back exactly"
            );
        }

        recorder.record(
            expected == observed,
            format!(
                "expected: {} observed: {}",
                expected.to_json(),
                observed.to_json()
            ),
        );
    }

    Ok(VerifyReport {
        kind: kind.to_string(),
        passed: recorder.passed(),
        failed: recorder.failed(),
        checks: recorder.into_checks(),
    })
}

/// Returns where `probe` was written and where its literal landed in the
/// output.
fn probe_positions(
    fixture: &Fixture,
    probe: &Probe,
    output: &str,
    output_index: &LineIndex<'_>,
) -> Result<(OriginalPosition, Coordinate), HarnessFault> {
    let origin = fixture
        .file(probe.origin)
        .ok_or_else(|| HarnessFault::MissingOrigin {
            id: probe.id.to_string(),
            origin: probe.origin.to_string(),
        })?;
    let literal = probe.literal();

    let not_found = |location| HarnessFault::ProbeNotFound {
        id: probe.id.to_string(),
        location,
    };
    let input_at = locate(origin.source, &LineIndex::new(origin.source), &literal)
        .ok_or_else(|| not_found(SearchLocation::Input))?;
    let output_at =
        locate(output, output_index, &literal).ok_or_else(|| not_found(SearchLocation::Output))?;

    Ok((OriginalPosition::new(origin.path, input_at), output_at))
}

/// Finds the first occurrence of `needle` and converts it to a coordinate.
fn locate(text: &str, index: &LineIndex<'_>, needle: &str) -> Option<Coordinate> {
    let offset = u32::try_from(text.find(needle)?).ok()?;
    index.coordinate(TextSize::from(offset))
}
