//! Soft diagnostics collected during ingestion, parsing, and resolution
//!
//! Bad input degrades the result instead of failing the batch. Every
//! degradation is recorded as a [`Warning`] value so callers can inspect or
//! report them after the fact.

use thiserror::Error;

use crate::store::StoreError;

/// A non-fatal issue found while building the symbol model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Warning {
    /// A hyperlink span had an empty display text and produced no token.
    #[error("hyperlink span for `{refid}` has no text")]
    EmptyLinkSpan {
        /// Identifier the empty span pointed at.
        refid: String,
    },

    /// A separator token had no enclosing bracket to attribute it to.
    #[error("cannot attribute separator at token {index} in `{context}`")]
    StraySeparator {
        /// Position of the separator in the token stream.
        index: usize,
        /// Concatenated text of the whole stream.
        context: String,
    },

    /// Tokens were left over after a type was fully assembled.
    #[error("trailing tokens `{text}` after type `{name}`")]
    TrailingTokens {
        /// Concatenated text of the leftover tokens.
        text: String,
        /// Name of the type that was parsed before them.
        name: String,
    },

    /// No name token could be found, so the signature is kept verbatim.
    #[error("no type name in `{text}`, keeping it unparsed")]
    UnparsedSignature {
        /// Original signature text.
        text: String,
    },

    /// A nested or argument block was malformed, so the signature is kept
    /// verbatim.
    #[error("malformed signature `{text}`: {reason}")]
    MalformedSignature {
        /// Original signature text.
        text: String,
        /// What went wrong inside the block.
        reason: String,
    },

    /// The partial-name fallback matched more than one stored element.
    #[error("multiple partial matches for `{name}`, reference left unresolved")]
    MultiplePartialMatches {
        /// Name that was looked up.
        name: String,
    },

    /// A record carried a language tag no grammar is registered for.
    #[error("unknown language `{tag}`, record skipped")]
    UnknownLanguage {
        /// Tag as it appeared on the record.
        tag: String,
    },

    /// A converted element could not be added to the symbol store.
    #[error("cannot register `{name}`: {source}")]
    UnregistrableElement {
        /// Name of the element, as far as it is known.
        name: String,
        /// Why the store rejected it.
        source: StoreError,
    },
}
