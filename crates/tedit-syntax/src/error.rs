//! Error types for tedit-syntax.
//!
//! Only profile loading can fail. Lexing, coloring, and bracket matching never
//! return errors: bad positions fall back to safe defaults and are logged.

use std::path::PathBuf;

use thiserror::Error;

/// Failure while loading or registering language profiles.
#[derive(Debug, Error)]
pub enum ProfileError {
    /// The profile file could not be read.
    #[error("cannot read language profiles from '{}': {source}", path.display())]
    Read {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The TOML document is malformed or has wrongly-typed fields.
    #[error("invalid language profile document: {0}")]
    Parse(#[from] toml::de::Error),

    /// A file mask could not be compiled into a matcher.
    #[error("invalid file mask '{mask}' in profile '{profile}': {source}")]
    Mask {
        /// Profile that owns the mask.
        profile: String,
        /// The offending mask.
        mask: String,
        /// Regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// A profile was registered without a name.
    #[error("language profile has an empty name")]
    EmptyName,
}
