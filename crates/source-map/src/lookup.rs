//! Original-position queries over a parsed source map.

use crate::Coordinate;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while loading a source map.
#[derive(Debug, Error)]
pub enum MapError {
    /// The map text is not a valid source map document.
    #[error("invalid source map: {0}")]
    Invalid(#[from] sourcemap::Error),
}

/// The original position a generated position maps back to.
///
/// Every field is `None` when the map has no mapping for the queried output
/// line, mirroring the all-`null` answer of JavaScript source-map consumers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize)]
pub struct OriginalPosition {
    /// The source file, as listed in the map's `sources`.
    pub source: Option<String>,
    /// 1-indexed line in the source file.
    pub line: Option<u32>,
    /// 0-indexed column in the source file.
    pub column: Option<u32>,
}

impl OriginalPosition {
    /// Creates a fully resolved original position.
    pub fn new(source: impl Into<String>, at: Coordinate) -> Self {
        Self {
            source: Some(source.into()),
            line: Some(at.line),
            column: Some(at.column),
        }
    }

    /// Renders the position as a compact JSON object for diagnostics.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// The one query the verifier asks of a source map.
pub trait OriginalPositionFor {
    /// Returns the original position for a generated coordinate.
    ///
    /// When no mapping starts exactly at `generated.column`, the nearest
    /// mapping before it on the same line answers.
    fn original_position_for(&self, generated: Coordinate) -> OriginalPosition;
}

/// A source map parsed from its JSON text.
#[derive(Debug, Clone)]
pub struct ParsedMap {
    inner: sourcemap::SourceMap,
}

impl ParsedMap {
    /// Parses a source map document.
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let inner = sourcemap::SourceMap::from_slice(text.as_bytes())?;
        Ok(Self { inner })
    }

    /// Wraps an already built map.
    pub fn from_sourcemap(inner: sourcemap::SourceMap) -> Self {
        Self { inner }
    }

    /// Returns the sources listed by the map.
    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.inner.sources()
    }

    /// Returns the number of mapping tokens in the map.
    pub fn token_count(&self) -> u32 {
        self.inner.get_token_count()
    }
}

impl OriginalPositionFor for ParsedMap {
    fn original_position_for(&self, generated: Coordinate) -> OriginalPosition {
        let Some(dst_line) = generated.line.checked_sub(1) else {
            return OriginalPosition::default();
        };

        // `lookup_token` falls back to tokens on earlier lines; those are not
        // mappings for this line.
        let Some(token) = self
            .inner
            .lookup_token(dst_line, generated.column)
            .filter(|token| token.get_dst_line() == dst_line)
        else {
            return OriginalPosition::default();
        };

        match token.get_source() {
            Some(source) => OriginalPosition {
                source: Some(source.to_string()),
                line: Some(token.get_src_line() + 1),
                column: Some(token.get_src_col()),
            },
            None => OriginalPosition::default(),
        }
    }
}
