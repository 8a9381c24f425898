//! Structural parse errors

use thiserror::Error;

/// Error from a direct structural parse of a type signature.
///
/// The lenient parse path never surfaces this; it degrades to an opaque
/// fallback node instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// A nested or argument block was opened but never closed.
    #[error("unterminated block in `{text}`")]
    UnterminatedBlock {
        /// Verbatim text of the tokens the block was parsed from.
        text: String,
    },
}
