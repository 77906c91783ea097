//! # Thing Kinds
//!
//! A closed set of node kinds, resolved from `rdf:type` values through a plain
//! lookup table. The table decides which triggers apply to a stored thing and
//! which shape checks it has to pass.

use crate::config::Vocabulary;
use crate::{GraphError, Thing, ThingBuilder, Value};
use std::collections::BTreeMap;

/// The kinds of things the engine gives special treatment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ThingKind {
    /// An `rdfs:Class`.
    Class,
    /// An `rdf:Property`.
    Property,
}

/// Type IRI → kind lookup table, plus the vocabulary the shape checks read.
#[derive(Debug, Clone)]
pub struct KindTable {
    kinds: BTreeMap<String, ThingKind>,
    vocabulary: Vocabulary,
}

impl Default for KindTable {
    fn default() -> Self {
        Self::new(&Vocabulary::default())
    }
}

impl KindTable {
    /// Build the table for a vocabulary.
    #[must_use]
    pub fn new(vocabulary: &Vocabulary) -> Self {
        let mut kinds = BTreeMap::new();
        kinds.insert(vocabulary.rdfs_class.clone(), ThingKind::Class);
        kinds.insert(vocabulary.rdf_property.clone(), ThingKind::Property);
        Self {
            kinds,
            vocabulary: vocabulary.clone(),
        }
    }

    /// Map an additional type IRI onto a kind (e.g. `owl:Class` → `Class`).
    #[must_use]
    pub fn with_type(mut self, type_iri: impl Into<String>, kind: ThingKind) -> Self {
        self.kinds.insert(type_iri.into(), kind);
        self
    }

    #[must_use]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// The kind a type IRI maps to.
    #[must_use]
    pub fn kind(&self, type_iri: &str) -> Option<ThingKind> {
        self.kinds.get(type_iri).copied()
    }

    /// All kinds declared by the thing's `rdf:type` values, deduplicated.
    #[must_use]
    pub fn kinds_of(&self, thing: &Thing) -> Vec<ThingKind> {
        let mut kinds: Vec<ThingKind> = thing
            .links(&self.vocabulary.rdf_type)
            .into_iter()
            .filter_map(|type_iri| self.kind(type_iri))
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    #[must_use]
    pub fn has_kind(&self, thing: &Thing, kind: ThingKind) -> bool {
        self.kinds_of(thing).contains(&kind)
    }

    /// A builder for `iri` with `rdf:type` already set to `type_iri`.
    #[must_use]
    pub fn builder(&self, iri: impl Into<String>, type_iri: impl Into<String>) -> ThingBuilder {
        Thing::builder(iri).with(self.vocabulary.rdf_type.clone(), Value::Link(type_iri.into()))
    }

    /// Check the thing against the shape of every kind it declares.
    ///
    /// - `Property`: every `rdfs:domain` value is a link.
    /// - `Class`: every class-properties value is a link; an IRI template, if
    ///   present, is a string or literal.
    pub fn validate(&self, thing: &Thing) -> Result<(), GraphError> {
        let vocabulary = &self.vocabulary;
        for kind in self.kinds_of(thing) {
            match kind {
                ThingKind::Property => {
                    Self::require_links(thing, &vocabulary.rdfs_domain)?;
                }
                ThingKind::Class => {
                    Self::require_links(thing, &vocabulary.class_properties)?;
                    if let Some(value) = thing.get(&vocabulary.iri_template_property) {
                        match value {
                            Value::PlainString(_) | Value::Literal { .. } => {}
                            other => {
                                return Err(GraphError::ShapeValidationFailure {
                                    iri: thing.iri().to_string(),
                                    reason: format!(
                                        "{} must be a single string, found {}",
                                        vocabulary.iri_template_property,
                                        other.kind_name()
                                    ),
                                });
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn require_links(thing: &Thing, predicate: &str) -> Result<(), GraphError> {
        let bad = match thing.get(predicate) {
            None | Some(Value::Link(_)) => None,
            Some(Value::List(items)) => items.iter().find(|item| item.as_link().is_none()),
            Some(other) => Some(other),
        };
        match bad {
            None => Ok(()),
            Some(value) => Err(GraphError::ShapeValidationFailure {
                iri: thing.iri().to_string(),
                reason: format!(
                    "{} must only link to things, found {}",
                    predicate,
                    value.kind_name()
                ),
            }),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
