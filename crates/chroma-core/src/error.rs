// SPDX-License-Identifier: MIT
//
// Error types for chroma-core.
//
// The color engine itself never fails. The only fallible surface is parsing
// a mode name (from a command-line flag, for instance) into a mode enum.

use thiserror::Error;

/// A mode name that does not match any variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown {kind} {value:?} (expected one of: {expected})")]
pub struct ParseModeError {
    /// Which mode was being parsed (`"axis mode"`, `"notation"`).
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
    /// Comma-separated list of accepted names.
    pub expected: &'static str,
}
