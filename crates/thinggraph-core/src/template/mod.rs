//! # Templated Identifiers
//!
//! IRIs with `{VAR}` placeholders, resolvable to and from concrete IRIs.
//!
//! - [`IriTemplate`]: parses one template, matches concrete IRIs against it
//!   and expands it with variable bindings
//! - [`TemplateChain`]: picks the template to use when several could match
//! - [`TemplateRepository`]: wraps a repository and synthesizes the instances
//!   of every class that declares an IRI template

mod chain;
mod repository;
mod splitter;

pub use chain::TemplateChain;
pub use repository::TemplateRepository;
pub use splitter::IriTemplate;

use std::collections::BTreeMap;

/// Variable name → value.
pub type Bindings = BTreeMap<String, String>;
