//! Error types for image URL extraction.

use thiserror::Error;

/// Errors raised while building an extractor from a [`crate::config::SitePolicy`].
///
/// Extraction itself never fails: markup that yields nothing produces an
/// empty list.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    /// The image tag selector is not valid CSS.
    #[error("invalid image tag selector '{selector}': {reason}")]
    InvalidSelector {
        /// The selector text from the policy.
        selector: String,
        /// Parser message.
        reason: String,
    },

    /// A pattern derived from the policy failed to compile.
    #[error("invalid {what} pattern: {reason}")]
    InvalidPattern {
        /// Which pattern failed (`cdn url`, `extension`).
        what: &'static str,
        /// Compiler message.
        reason: String,
    },

    /// The policy lists no image extensions, so nothing could ever match.
    #[error("site policy has no image extensions")]
    NoExtensions,
}

impl ExtractError {
    /// Creates an `InvalidPattern` error from a regex compile failure.
    #[must_use]
    pub fn pattern(what: &'static str, source: &regex::Error) -> Self {
        Self::InvalidPattern {
            what,
            reason: source.to_string(),
        }
    }
}
