//! Harness faults.

use fixtures::FixtureError;
use source_map::MapError;
use std::fmt;
use thiserror::Error;

/// Where a probe literal was searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchLocation {
    /// The probe's origin fixture file.
    Input,
    /// The generated bundle.
    Output,
}

impl fmt::Display for SearchLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchLocation::Input => f.write_str("input"),
            SearchLocation::Output => f.write_str("output"),
        }
    }
}

/// A fatal error in the verification harness itself.
///
/// None of these say anything about the bundler's mappings; they mean the
/// fixture is malformed or the build did not honor its contract.
#[derive(Debug, Error)]
pub enum HarnessFault {
    /// The fixture failed validation.
    #[error(transparent)]
    Fixture(#[from] FixtureError),

    /// The generated map is not a source map.
    #[error(transparent)]
    Map(#[from] MapError),

    /// A probe's origin file is not part of the fixture.
    #[error("probe {id:?} originates from {origin}, which is not in the fixture")]
    MissingOrigin { id: String, origin: String },

    /// A probe's quoted literal could not be found.
    #[error("failed to find \"{id}\" in {location}")]
    ProbeNotFound {
        id: String,
        location: SearchLocation,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_not_found_message() {
        let fault = HarnessFault::ProbeNotFound {
            id: "b1".into(),
            location: SearchLocation::Output,
        };
        assert_eq!(fault.to_string(), "failed to find \"b1\" in output");
    }
}
