//! Fixture and probe types.

use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A malformed fixture. Always a harness bug, never a bundler regression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// The fixture has no files, so there is no entry point.
    #[error("fixture {0} has no files")]
    Empty(Variant),

    /// Two probes share an id.
    #[error("probe {0:?} is listed twice")]
    DuplicateProbe(String),

    /// A probe names an origin file the fixture does not contain.
    #[error("probe {id:?} originates from {origin}, which is not a fixture file")]
    MissingOrigin { id: String, origin: String },

    /// No fixture file matches a probe's first character.
    #[error("no fixture file starts with the first character of probe {0:?}")]
    NoOriginMatch(String),

    /// More than one fixture file matches a probe's first character.
    #[error("probe {id:?} could originate from any of {candidates:?}")]
    AmbiguousOrigin { id: String, candidates: Vec<String> },

    /// The quoted probe literal must occur exactly once in its origin file.
    #[error("expected exactly one \"{id}\" in {file}, found {count}")]
    LiteralCount {
        id: String,
        file: String,
        count: usize,
    },
}

/// The fixture variants the verifier builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// `require`/`exports` linkage across three files.
    CommonJs,
    /// `import`/`export` linkage across three files.
    Es6,
    /// A single TypeScript file whose syntax needs an injected runtime helper.
    TsRuntime,
}

impl Variant {
    /// Every variant, in the order runs are launched.
    pub const ALL: [Variant; 3] = [Variant::CommonJs, Variant::Es6, Variant::TsRuntime];

    /// The short name used in task labels and on the command line.
    pub fn name(self) -> &'static str {
        match self {
            Variant::CommonJs => "commonjs",
            Variant::Es6 => "es6",
            Variant::TsRuntime => "ts",
        }
    }

    /// Whether the variant is built with bundling, which is what exercises
    /// cross-file resolution.
    pub fn bundles(self) -> bool {
        !matches!(self, Variant::TsRuntime)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Variant::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let names: Vec<_> = Variant::ALL.iter().map(|v| v.name()).collect();
                format!("unknown variant {s:?} (expected one of {})", names.join(", "))
            })
    }
}

/// One input file of a fixture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixtureFile {
    /// Path relative to the scratch directory.
    pub path: &'static str,
    /// Literal source text, written verbatim.
    pub source: &'static str,
}

/// A marker identifier whose quoted literal must survive the build with an
/// exact mapping back to its origin file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Probe {
    /// The identifier, searched for as `"id"`.
    pub id: &'static str,
    /// The fixture file the literal is written in.
    pub origin: &'static str,
}

impl Probe {
    /// Creates a probe with an explicit origin file.
    pub const fn new(id: &'static str, origin: &'static str) -> Self {
        Self { id, origin }
    }

    /// Creates a probe whose origin is the single file whose path starts with
    /// the probe's first character.
    pub fn inferred(id: &'static str, paths: &[&'static str]) -> Result<Self, FixtureError> {
        let Some(first) = id.chars().next() else {
            return Err(FixtureError::NoOriginMatch(id.to_string()));
        };

        let candidates: Vec<&'static str> = paths
            .iter()
            .copied()
            .filter(|path| path.starts_with(first))
            .collect();

        match candidates.as_slice() {
            [origin] => Ok(Self::new(id, origin)),
            [] => Err(FixtureError::NoOriginMatch(id.to_string())),
            _ => Err(FixtureError::AmbiguousOrigin {
                id: id.to_string(),
                candidates: candidates.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }

    /// The quoted form searched for in input and output text.
    pub fn literal(&self) -> String {
        format!("\"{}\"", self.id)
    }
}

/// A named group of input files plus the probes checked against them.
#[derive(Debug, Clone)]
pub struct Fixture {
    variant: Variant,
    /// Insertion order is significant: the first file is the entry point.
    files: IndexMap<&'static str, &'static str>,
    probes: Vec<Probe>,
}

impl Fixture {
    /// Creates a fixture from ordered `(path, source)` pairs.
    pub fn new(
        variant: Variant,
        files: &[(&'static str, &'static str)],
        probes: Vec<Probe>,
    ) -> Self {
        Self {
            variant,
            files: files.iter().copied().collect(),
            probes,
        }
    }

    /// Returns the built-in fixture for a variant.
    pub fn for_variant(variant: Variant) -> Self {
        crate::catalog::fixture(variant)
    }

    /// Returns every built-in fixture.
    pub fn all() -> Vec<Self> {
        Variant::ALL.into_iter().map(Self::for_variant).collect()
    }

    #[inline]
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// The build entry point: the first file.
    pub fn entry(&self) -> Option<FixtureFile> {
        self.files.first().map(|(&path, &source)| FixtureFile { path, source })
    }

    /// Looks up a file by its relative path.
    pub fn file(&self, path: &str) -> Option<FixtureFile> {
        self.files
            .get_key_value(path)
            .map(|(&path, &source)| FixtureFile { path, source })
    }

    /// Iterates the files in entry-first order.
    pub fn files(&self) -> impl Iterator<Item = FixtureFile> + '_ {
        self.files
            .iter()
            .map(|(&path, &source)| FixtureFile { path, source })
    }

    #[inline]
    pub fn probes(&self) -> &[Probe] {
        &self.probes
    }

    /// Checks the invariants the verifier's text search depends on.
    pub fn validate(&self) -> Result<(), FixtureError> {
        if self.files.is_empty() {
            return Err(FixtureError::Empty(self.variant));
        }

        let mut seen = HashSet::new();
        for probe in &self.probes {
            if !seen.insert(probe.id) {
                return Err(FixtureError::DuplicateProbe(probe.id.to_string()));
            }

            let file = self.file(probe.origin).ok_or_else(|| FixtureError::MissingOrigin {
                id: probe.id.to_string(),
                origin: probe.origin.to_string(),
            })?;

            let count = file.source.matches(probe.literal().as_str()).count();
            if count != 1 {
                return Err(FixtureError::LiteralCount {
                    id: probe.id.to_string(),
                    file: file.path.to_string(),
                    count,
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_variant_names_round_trip() {
        for variant in Variant::ALL {
            assert_eq!(variant.name().parse::<Variant>(), Ok(variant));
        }
        assert_eq!("ES6".parse::<Variant>(), Ok(Variant::Es6));
        assert!("esm".parse::<Variant>().is_err());
    }

    #[test]
    fn test_only_multi_file_variants_bundle() {
        assert!(Variant::CommonJs.bundles());
        assert!(Variant::Es6.bundles());
        assert!(!Variant::TsRuntime.bundles());
    }

    #[test]
    fn test_inferred_origin() {
        let paths = ["a.js", "b.js", "c.js"];
        assert_eq!(Probe::inferred("b1", &paths), Ok(Probe::new("b1", "b.js")));
        assert_eq!(
            Probe::inferred("d0", &paths),
            Err(FixtureError::NoOriginMatch("d0".into()))
        );
    }

    #[test]
    fn test_inferred_origin_rejects_ambiguity() {
        let paths = ["a.js", "app.js"];
        assert_eq!(
            Probe::inferred("a0", &paths),
            Err(FixtureError::AmbiguousOrigin {
                id: "a0".into(),
                candidates: vec!["a.js".into(), "app.js".into()],
            })
        );
    }

    #[test]
    fn test_entry_is_first_file() {
        let fixture = Fixture::new(
            Variant::Es6,
            &[("z.js", "\"z0\""), ("a.js", "")],
            vec![Probe::new("z0", "z.js")],
        );
        assert_eq!(fixture.entry().map(|f| f.path), Some("z.js"));
        assert_eq!(fixture.files().count(), 2);
        assert!(fixture.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_missing_origin() {
        let fixture = Fixture::new(
            Variant::Es6,
            &[("a.js", "\"a0\"")],
            vec![Probe::new("a0", "b.js")],
        );
        assert_eq!(
            fixture.validate(),
            Err(FixtureError::MissingOrigin {
                id: "a0".into(),
                origin: "b.js".into(),
            })
        );
    }

    #[test]
    fn test_validate_rejects_repeated_literal() {
        let fixture = Fixture::new(
            Variant::Es6,
            &[("a.js", "f(\"a0\"); g(\"a0\")")],
            vec![Probe::new("a0", "a.js")],
        );
        assert_eq!(
            fixture.validate(),
            Err(FixtureError::LiteralCount {
                id: "a0".into(),
                file: "a.js".into(),
                count: 2,
            })
        );
    }

    #[test]
    fn test_validate_ignores_bare_identifier() {
        // Only the quoted form counts; `function a0` is not an occurrence.
        let fixture = Fixture::new(
            Variant::Es6,
            &[("a.js", "function a0() { a1(\"a0\") }")],
            vec![Probe::new("a0", "a.js")],
        );
        assert!(fixture.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_duplicate_probe() {
        let fixture = Fixture::new(
            Variant::Es6,
            &[("a.js", "\"a0\"")],
            vec![Probe::new("a0", "a.js"), Probe::new("a0", "a.js")],
        );
        assert_eq!(fixture.validate(), Err(FixtureError::DuplicateProbe("a0".into())));
    }

    #[test]
    fn test_validate_rejects_empty() {
        let fixture = Fixture::new(Variant::TsRuntime, &[], Vec::new());
        assert_eq!(fixture.validate(), Err(FixtureError::Empty(Variant::TsRuntime)));
    }
}
