//! The built-in fixture set.

use crate::{Fixture, Probe, Variant};

const ES6_FILES: &[(&str, &str)] = &[
    (
        "a.js",
        r#"
    import {b0} from './b'
    function a0() { a1("a0") }
    function a1() { a2("a1") }
    function a2() { b0("a2") }
    a0()
  "#,
    ),
    (
        "b.js",
        r#"
    import {c0} from './c'
    export function b0() { b1("b0") }
    function b1() { b2("b1") }
    function b2() { c0("b2") }
  "#,
    ),
    (
        "c.js",
        r#"
    export function c0() { c1("c0") }
    function c1() { c2("c1") }
    function c2() { throw new Error("c2") }
  "#,
    ),
];

const COMMONJS_FILES: &[(&str, &str)] = &[
    (
        "a.js",
        r#"
    const {b0} = require('./b')
    function a0() { a1("a0") }
    function a1() { a2("a1") }
    function a2() { b0("a2") }
    a0()
  "#,
    ),
    (
        "b.js",
        r#"
    const {c0} = require('./c')
    exports.b0 = function() { b1("b0") }
    function b1() { b2("b1") }
    function b2() { c0("b2") }
  "#,
    ),
    (
        "c.js",
        r#"
    exports.c0 = function() { c1("c0") }
    function c1() { c2("c1") }
    function c2() { throw new Error("c2") }
  "#,
    ),
];

// The exported object-rest pattern forces the bundler to emit a `__rest`
// style helper ahead of the original statements.
const TS_RUNTIME_FILES: &[(&str, &str)] = &[(
    "a.ts",
    r#"
    namespace Foo {
      export var {a, ...b} = foo()
      console.log(a, b)
    }
    function a0() { a1("a0") }
    function a1() { a2("a1") }
    function a2() { throw new Error("a2") }
    a0()
  "#,
)];

/// The full chain, spanning all three files of a bundled fixture.
const BUNDLE_PROBES: [Probe; 9] = [
    Probe::new("a0", "a.js"),
    Probe::new("a1", "a.js"),
    Probe::new("a2", "a.js"),
    Probe::new("b0", "b.js"),
    Probe::new("b1", "b.js"),
    Probe::new("b2", "b.js"),
    Probe::new("c0", "c.js"),
    Probe::new("c1", "c.js"),
    Probe::new("c2", "c.js"),
];

/// Unbundled output only contains the entry file.
const NO_BUNDLE_PROBES: [Probe; 3] = [
    Probe::new("a0", "a.ts"),
    Probe::new("a1", "a.ts"),
    Probe::new("a2", "a.ts"),
];

pub(crate) fn fixture(variant: Variant) -> Fixture {
    match variant {
        Variant::CommonJs => Fixture::new(variant, COMMONJS_FILES, BUNDLE_PROBES.to_vec()),
        Variant::Es6 => Fixture::new(variant, ES6_FILES, BUNDLE_PROBES.to_vec()),
        Variant::TsRuntime => Fixture::new(variant, TS_RUNTIME_FILES, NO_BUNDLE_PROBES.to_vec()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_builtin_fixtures_are_valid() {
        for fixture in Fixture::all() {
            fixture
                .validate()
                .unwrap_or_else(|e| panic!("{} fixture is malformed: {e}", fixture.variant()));
        }
    }

    #[test]
    fn test_probe_counts() {
        assert_eq!(Fixture::for_variant(Variant::CommonJs).probes().len(), 9);
        assert_eq!(Fixture::for_variant(Variant::Es6).probes().len(), 9);
        assert_eq!(Fixture::for_variant(Variant::TsRuntime).probes().len(), 3);
    }

    #[test]
    fn test_entry_points() {
        assert_eq!(Fixture::for_variant(Variant::Es6).entry().map(|f| f.path), Some("a.js"));
        assert_eq!(
            Fixture::for_variant(Variant::TsRuntime).entry().map(|f| f.path),
            Some("a.ts")
        );
    }

    #[test]
    fn test_explicit_origins_match_naming_convention() {
        for fixture in Fixture::all() {
            let paths: Vec<&'static str> = fixture.files().map(|f| f.path).collect();
            for probe in fixture.probes() {
                assert_eq!(Probe::inferred(probe.id, &paths).as_ref(), Ok(probe));
            }
        }
    }

    #[test]
    fn test_probes_sit_at_distinct_positions() {
        // Each probe's literal starts at a different (line, column) within its file.
        for fixture in Fixture::all() {
            let mut positions = std::collections::HashSet::new();
            for probe in fixture.probes() {
                let source = fixture.file(probe.origin).unwrap().source;
                let offset = source.find(&probe.literal()).unwrap();
                let line = source[..offset].matches('\n').count();
                let column = offset - source[..offset].rfind('\n').map_or(0, |nl| nl + 1);
                assert!(
                    positions.insert((probe.origin, line, column)),
                    "{} shares a position",
                    probe.id
                );
            }
        }
    }
}
