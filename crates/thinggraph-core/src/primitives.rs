//! # Innate Primitives
//!
//! Hardcoded vocabulary and bounds for the thinggraph engine.
//!
//! The engine starts with an empty graph but a fixed vocabulary. These IRIs are
//! the defaults of [`crate::config::Vocabulary`]; callers can override any of them
//! through a `GraphConfig`. Only `RDF_LANG_STRING` is read directly, by
//! [`crate::rdf::Literal::lang`], since its value is fixed by RDF itself.
//!
//! ## Primitives
//!
//! 1. **Vocabulary**: the RDF/RDFS/XSD terms the converters and triggers react to.
//! 2. **Template syntax**: the `{VAR}` placeholder markers.
//! 3. **Bounds**: cascade and capacity limits keeping every operation bounded.

// =============================================================================
// NAMESPACES
// =============================================================================

pub const RDF_NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
pub const RDFS_NS: &str = "http://www.w3.org/2000/01/rdf-schema#";
pub const XSD_NS: &str = "http://www.w3.org/2001/XMLSchema#";
pub const ENOLA_NS: &str = "https://enola.dev/";
pub const SCHEMA_NS: &str = "https://schema.org/";

// =============================================================================
// VOCABULARY
// =============================================================================

/// `rdf:type`, the predicate that declares a thing's kind.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

/// `rdf:Property`.
pub const RDF_PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";

/// `rdf:langString`, the datatype of every language-tagged literal.
pub const RDF_LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

/// `rdfs:Class`.
pub const RDFS_CLASS: &str = "http://www.w3.org/2000/01/rdf-schema#Class";

/// `rdfs:domain`.
pub const RDFS_DOMAIN: &str = "http://www.w3.org/2000/01/rdf-schema#domain";

/// `xsd:string`, the canonical plain string datatype.
pub const XSD_STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

/// Inverse of `rdfs:domain`: the properties a class is the domain of.
pub const CLASS_PROPERTIES: &str = "https://enola.dev/properties";

/// Predicate on a class carrying the IRI template of its instances.
pub const IRI_TEMPLATE_PROPERTY: &str = "https://enola.dev/iriTemplate";

/// Datatype marking a literal value as an IRI template.
pub const IRI_TEMPLATE_DATATYPE: &str = "https://enola.dev/IRITemplate";

// =============================================================================
// TEMPLATE SYNTAX
// =============================================================================

/// Opens a template variable.
pub const TEMPLATE_VAR_OPEN: char = '{';

/// Closes a template variable.
pub const TEMPLATE_VAR_CLOSE: char = '}';

// =============================================================================
// BOUNDS
// =============================================================================

/// Maximum number of secondary stores a single `store()` may fan out into.
///
/// Triggers are idempotent, so a well-behaved trigger set converges long
/// before this; hitting it means two triggers keep rewriting each other.
pub const MAX_TRIGGER_CASCADE: usize = 10_000;

/// Capacity of the single-writer symbol table (32-bit signed maximum).
pub const MAX_IMMUTABLE_SYMBOLS: u64 = i32::MAX as u64;

/// Capacity of the concurrent symbol table (64-bit unsigned maximum).
pub const MAX_CONCURRENT_SYMBOLS: u64 = u64::MAX;
