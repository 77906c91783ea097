//! IRI-identified nodes and their builder.

use super::{GraphError, Properties, Value};
use serde::{Deserialize, Serialize};

// =============================================================================
// THING
// =============================================================================

/// A node in the graph, identified by a non-empty IRI.
///
/// Things are immutable; use [`Thing::to_builder`] for read-modify-write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ThingBuilder")]
pub struct Thing {
    iri: String,
    properties: Properties,
}

impl Thing {
    /// Start building a thing with the given IRI.
    pub fn builder(iri: impl Into<String>) -> ThingBuilder {
        ThingBuilder::new().with_iri(iri)
    }

    /// The IRI identifying this thing.
    #[must_use]
    pub fn iri(&self) -> &str {
        &self.iri
    }

    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Get the value of a predicate.
    #[must_use]
    pub fn get(&self, predicate: &str) -> Option<&Value> {
        self.properties.get(predicate)
    }

    /// All IRIs the predicate links to.
    #[must_use]
    pub fn links(&self, predicate: &str) -> Vec<&str> {
        self.properties.links(predicate)
    }

    /// Whether the predicate links to `iri`.
    #[must_use]
    pub fn has_link(&self, predicate: &str, iri: &str) -> bool {
        self.properties.has_link(predicate, iri)
    }

    /// Copy this thing into a new builder.
    #[must_use]
    pub fn to_builder(&self) -> ThingBuilder {
        self.clone().into_builder()
    }

    /// Turn this thing back into a builder without copying.
    #[must_use]
    pub fn into_builder(self) -> ThingBuilder {
        ThingBuilder {
            iri: Some(self.iri),
            properties: self.properties,
        }
    }
}

// =============================================================================
// THING BUILDER
// =============================================================================

/// Accumulates predicate/value pairs until finalized into a [`Thing`]
/// (or, for anonymous nodes, into the [`Properties`] of a `Value::Struct`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ThingBuilder {
    iri: Option<String>,
    #[serde(default)]
    properties: Properties,
}

impl ThingBuilder {
    /// Create an empty builder without an IRI.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the IRI, consuming and returning the builder.
    #[must_use]
    pub fn with_iri(mut self, iri: impl Into<String>) -> Self {
        self.iri = Some(iri.into());
        self
    }

    /// Set a predicate, consuming and returning the builder.
    #[must_use]
    pub fn with(mut self, predicate: impl Into<String>, value: Value) -> Self {
        self.properties.set(predicate, value);
        self
    }

    /// The IRI set so far, if any.
    #[must_use]
    pub fn iri(&self) -> Option<&str> {
        self.iri.as_deref()
    }

    #[must_use]
    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Set a predicate, replacing any previous value.
    pub fn set(&mut self, predicate: impl Into<String>, value: Value) -> &mut Self {
        self.properties.set(predicate, value);
        self
    }

    /// Add a value, accumulating repeated predicates into a `List`.
    /// Returns the slot the value landed in.
    pub fn add(&mut self, predicate: impl Into<String>, value: Value) -> usize {
        self.properties.add(predicate, value)
    }

    /// Add a link unless it is already present. Returns `true` if added.
    pub fn add_link(&mut self, predicate: impl Into<String>, iri: &str) -> bool {
        self.properties.add_link(predicate, iri)
    }

    pub(crate) fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    /// Finalize into an immutable thing.
    ///
    /// Returns `GraphError::MissingIri` if no (non-empty) IRI was set.
    pub fn build(self) -> Result<Thing, GraphError> {
        match self.iri {
            Some(iri) if !iri.is_empty() => Ok(Thing {
                iri,
                properties: self.properties,
            }),
            _ => Err(GraphError::MissingIri),
        }
    }

    /// Finalize into the properties of an embedded anonymous node.
    /// Any IRI set on the builder is discarded.
    #[must_use]
    pub fn build_struct(self) -> Properties {
        self.properties
    }
}

impl TryFrom<ThingBuilder> for Thing {
    type Error = GraphError;

    fn try_from(builder: ThingBuilder) -> Result<Self, Self::Error> {
        builder.build()
    }
}

// =============================================================================
// TESTS
// =============================================================================
