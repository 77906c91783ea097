//! # Core Type Definitions
//!
//! This module contains the graph node model of the engine:
//! - Tagged values (`Value`) and ordered predicate maps (`Properties`)
//! - IRI-identified nodes (`Thing`) and their builder (`ThingBuilder`)
//! - Error types (`GraphError`)
//!
//! ## Ownership
//!
//! A `ThingBuilder` exclusively owns its accumulating map until it is
//! finalized. A finalized `Thing` is immutable and is shared read-only,
//! typically as `Arc<Thing>`. Values never hold pointers to other things:
//! a `Value::Link` is an IRI resolved through a repository lookup, and a
//! `Value::Struct` is an owned, embedded anonymous node.

mod thing;
mod value;

pub use thing::{Thing, ThingBuilder};
pub use value::{Properties, Value};

use thiserror::Error;

// =============================================================================
// ERROR TYPES
// =============================================================================

/// Errors that can occur in the thinggraph engine.
///
/// - No silent failures
/// - Use `Result<T, GraphError>` for fallible operations
/// - Every failure kind is its own variant so callers can tell them apart
#[derive(Debug, Error)]
pub enum GraphError {
    /// An RDF construct the converters deliberately do not handle
    /// (RDF-star triples, unclassified resources, `List` values on export).
    #[error("Unsupported RDF construct: {0}")]
    UnsupportedRdfConstruct(String),

    /// A blank node was referenced as an object but never defined as a subject.
    #[error("Dangling blank node: _:{0}")]
    DanglingBlankNode(String),

    /// A blank node (transitively) embeds itself.
    #[error("Blank node cycle through _:{0}")]
    BlankNodeCycle(String),

    /// A statement failed input validation.
    #[error("Invalid statement: {0}")]
    InvalidStatement(String),

    /// The requested id was never interned.
    #[error("Unknown symbol id: {0}")]
    UnknownId(u64),

    /// The requested symbol was never interned.
    #[error("Unknown symbol: {0}")]
    UnknownSymbol(String),

    /// A symbol table reached its capacity bound.
    #[error("Symbol table capacity of {0} symbols exceeded")]
    SymbolCapacityExceeded(u64),

    /// A symbol cannot be written to the newline-delimited file format.
    #[error("Symbol contains a line terminator: {0:?}")]
    UnrepresentableSymbol(String),

    /// A symbol file is malformed.
    #[error("Symbol file error: {0}")]
    SymbolFormat(String),

    /// `breakdown()` was handed a template instead of a concrete IRI.
    #[error("IRI is a template, not concrete: {0}")]
    TemplateIsNotConcrete(String),

    /// No registered template is known under this string.
    #[error("No template matches: {0}")]
    NoTemplateMatch(String),

    /// An IRI template could not be parsed.
    #[error("Invalid IRI template {template}: {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// A template was expanded without a binding for one of its variables.
    #[error("IRI template {template} has no binding for variable {variable}")]
    MissingTemplateVariable { template: String, variable: String },

    /// The same template was registered twice.
    #[error("IRI template already registered: {0}")]
    DuplicateTemplate(String),

    /// A thing failed the shape check of one of its declared kinds.
    #[error("Shape validation failed for {iri}: {reason}")]
    ShapeValidationFailure { iri: String, reason: String },

    /// A builder was finalized into a root thing without an IRI.
    #[error("Thing has no IRI")]
    MissingIri,

    /// A single store fanned out into too many trigger-induced stores.
    #[error("Trigger cascade exceeded {0} secondary stores")]
    TriggerCascadeExceeded(usize),

    /// The configuration could not be parsed or resolved.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    IoError(String),
}

// =============================================================================
// TESTS
// =============================================================================
