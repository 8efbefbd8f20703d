//! Position tracking for verify-source-map.
//!
//! This crate turns byte offsets in generated and original text into the
//! `(line, column)` coordinates that source maps speak, and wraps a parsed
//! source map behind the single query the verifier needs: "which original
//! position does this generated position come from?".

mod line_index;
mod lookup;

pub use line_index::{ByteOffset, Coordinate, LineIndex};
pub use lookup::{MapError, OriginalPosition, OriginalPositionFor, ParsedMap};
