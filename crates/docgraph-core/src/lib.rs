//! Docgraph Core - Symbol model engine for documentation extracts
//!
//! This crate provides the core functionality:
//! - Grammar: per-language token tables and naming rules
//! - Parser: tokenization and structural parsing of type signatures
//! - Model: type trees and documented elements
//! - Store: symbol arena with id and name lookup
//! - Resolver: batch resolution of cross-references
//! - Ingest: record conversion driver

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Soft diagnostics collected while building the model
pub mod diag;

/// Language grammars - token tables, naming, and token adaptation
pub mod grammar;

/// Record ingestion driver
pub mod ingest;

/// Model types - type trees, parameters, documented elements
pub mod model;

/// Parser module - tokenizer and structural type parser
pub mod parser;

/// Resolver module - queued cross-reference resolution
pub mod resolver;

/// Symbol store - element arena and lookup
pub mod store;

pub use diag::Warning;
pub use ingest::{ElementRecord, Ingestor, InnerTypeRecord, ParameterRecord, ThrowsRecord};
pub use model::{
    DocumentedElement, ElementId, Parameter, PathStep, ReturnValue, SignatureSpan, ThrowsClause,
    TypeNode, TypeSlot,
};
pub use parser::{ParsedType, SignatureError, TypeParser, UnresolvedMark};
pub use resolver::{QueuedInnerRef, QueuedRef, ResolveReport, Resolver};
pub use store::{AmbiguousMatch, Query, StoreError, SymbolStore};
