//! Key acceptance rules and output key derivation.
//!
//! Only keys under `input/` ending in `.png` (any case) are processed.
//! The result of `input/<dirs>/<name>` is written to `output/fft-<name>`;
//! keys sharing a base filename map to the same output key.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Prefix a key must start with to be processed.
pub const INPUT_PREFIX: &str = "input/";
/// Prefix results are written under.
pub const OUTPUT_PREFIX: &str = "output/";
/// Prefix added to the base filename of results.
pub const RESULT_PREFIX: &str = "fft-";
/// Required key suffix, compared case-insensitively.
pub const PNG_SUFFIX: &str = ".png";

/// Why a notification was not processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotInInputPrefix,
    NotPng,
}

impl SkipReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkipReason::NotInInputPrefix => "not in input/ prefix",
            SkipReason::NotPng => "not a PNG file",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Check whether `key` should be processed.
///
/// The prefix rule is checked first, so a key failing both rules reports
/// [`SkipReason::NotInInputPrefix`].
pub fn accept_key(key: &str) -> Result<(), SkipReason> {
    if !key.starts_with(INPUT_PREFIX) {
        return Err(SkipReason::NotInInputPrefix);
    }
    if !key.to_lowercase().ends_with(PNG_SUFFIX) {
        return Err(SkipReason::NotPng);
    }
    Ok(())
}

/// The key with any directory prefix stripped.
pub fn base_filename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Local/remote filename of the result for a source base filename.
pub fn result_filename(basename: &str) -> String {
    format!("{}{}", RESULT_PREFIX, basename)
}

/// Output key for a source key: `output/fft-<basename>`.
pub fn output_key(key: &str) -> String {
    format!("{}{}", OUTPUT_PREFIX, result_filename(base_filename(key)))
}
