//! # thinggraph-core
//!
//! The in-memory Thing Graph Engine.
//!
//! An IRI-addressed property graph of immutable *things*, together with:
//! - conversion from an RDF statement stream into things (`ingestor`) and
//!   back (`export`)
//! - a repository that runs reactive inference triggers on every store
//!   (`repository`, `inference`)
//! - resolution of templated IRIs into synthesized things (`template`)
//! - string interning for compact IRI storage (`symbols`, `formats`)
//!
//! ## Architectural Constraints
//!
//! - Pure Rust: no async, no network, no I/O inside the engine except the
//!   explicit file helpers (`formats::symbols`, `GraphConfig::load`)
//! - Synchronous: every operation runs to completion on the caller's thread
//! - Single writer per repository: stores take `&mut self`, finalized things
//!   are shared read-only as `Arc<Thing>`
//! - Explicit configuration: vocabulary IRIs come from a `GraphConfig`,
//!   never from ambient global state
//! - Logging goes through `tracing`; installing a subscriber is the caller's job

// =============================================================================
// MODULES
// =============================================================================

pub mod config;
pub mod export;
pub mod formats;
pub mod inference;
pub mod ingestor;
pub mod kinds;
pub mod primitives;
pub mod rdf;
pub mod repository;
pub mod symbols;
pub mod template;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{GraphError, Properties, Thing, ThingBuilder, Value};

// =============================================================================
// RE-EXPORTS: Conversion
// =============================================================================

pub use export::Exporter;
pub use ingestor::{Ingestor, Things};
pub use rdf::{BlankId, Literal, Object, Statement, StatementSink, Subject};

// =============================================================================
// RE-EXPORTS: Repository & Inference
// =============================================================================

pub use config::{GraphConfig, Namespaces, Vocabulary};
pub use inference::RdfsPropertyTrigger;
pub use kinds::{KindTable, ThingKind};
pub use repository::{MemoryRepository, ThingRepository, ThingStore, Trigger, TriggerContext};
pub use template::{Bindings, IriTemplate, TemplateChain, TemplateRepository};

// =============================================================================
// RE-EXPORTS: Symbols
// =============================================================================

pub use symbols::{ConcurrentSymbolTable, ImmutableSymbolTable, SymbolTable, SymbolTableBuilder};
