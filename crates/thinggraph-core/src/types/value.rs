//! Tagged values and insertion-ordered predicate maps.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

// =============================================================================
// VALUE
// =============================================================================

/// The value of one predicate on a thing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Value {
    /// Reference to another thing, by IRI. Resolved through a repository,
    /// never embedded.
    Link(String),

    /// A string with the canonical `xsd:string` datatype.
    PlainString(String),

    /// A language-tagged string.
    LangString { text: String, lang: String },

    /// Any other literal, with its datatype IRI.
    Literal { value: String, datatype: String },

    /// An owned, embedded anonymous node (an RDF blank node).
    Struct(Properties),

    /// An ordered sequence of values.
    List(Vec<Value>),
}

impl Value {
    /// Create a link to the thing with the given IRI.
    pub fn link(iri: impl Into<String>) -> Self {
        Self::Link(iri.into())
    }

    /// Create a plain string value.
    pub fn string(text: impl Into<String>) -> Self {
        Self::PlainString(text.into())
    }

    /// Create a language-tagged string value.
    pub fn lang_string(text: impl Into<String>, lang: impl Into<String>) -> Self {
        Self::LangString {
            text: text.into(),
            lang: lang.into(),
        }
    }

    /// Create a typed literal value.
    pub fn literal(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self::Literal {
            value: value.into(),
            datatype: datatype.into(),
        }
    }

    /// The linked IRI, if this is a `Link`.
    #[must_use]
    pub fn as_link(&self) -> Option<&str> {
        match self {
            Self::Link(iri) => Some(iri),
            _ => None,
        }
    }

    /// The embedded node, if this is a `Struct`.
    #[must_use]
    pub fn as_struct(&self) -> Option<&Properties> {
        match self {
            Self::Struct(properties) => Some(properties),
            _ => None,
        }
    }

    /// All IRIs this value links to: itself if a `Link`, the `Link` items
    /// if a `List`, nothing otherwise.
    #[must_use]
    pub fn links(&self) -> Vec<&str> {
        match self {
            Self::Link(iri) => vec![iri.as_str()],
            Self::List(items) => items.iter().filter_map(Value::as_link).collect(),
            _ => Vec::new(),
        }
    }

    /// Whether this value is, or contains at top level, `other`.
    #[must_use]
    pub fn contains(&self, other: &Value) -> bool {
        match self {
            Self::List(items) => items.contains(other),
            _ => self == other,
        }
    }

    /// Short name of the variant, for diagnostics.
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Link(_) => "Link",
            Self::PlainString(_) => "PlainString",
            Self::LangString { .. } => "LangString",
            Self::Literal { .. } => "Literal",
            Self::Struct(_) => "Struct",
            Self::List(_) => "List",
        }
    }
}

// =============================================================================
// PROPERTIES
// =============================================================================

/// Insertion-ordered map of predicate IRI → value.
///
/// Predicates are unique; setting an existing predicate replaces its value
/// and keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(IndexMap<String, Value>);

impl Properties {
    /// Create an empty property map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the value of a predicate.
    #[must_use]
    pub fn get(&self, predicate: &str) -> Option<&Value> {
        self.0.get(predicate)
    }

    /// Set a predicate, replacing any previous value.
    pub fn set(&mut self, predicate: impl Into<String>, value: Value) {
        self.0.insert(predicate.into(), value);
    }

    /// Add a value to a predicate, accumulating multiple values into a `List`.
    ///
    /// The first value is stored as-is; a second one turns the predicate into
    /// a `List` of both. Returns the slot index of the added value.
    pub fn add(&mut self, predicate: impl Into<String>, value: Value) -> usize {
        let entry = self.0.entry(predicate.into());
        match entry {
            indexmap::map::Entry::Vacant(vacant) => {
                vacant.insert(value);
                0
            }
            indexmap::map::Entry::Occupied(mut occupied) => match occupied.get_mut() {
                Value::List(items) => {
                    items.push(value);
                    items.len() - 1
                }
                existing => {
                    let first = std::mem::replace(existing, Value::List(Vec::new()));
                    *existing = Value::List(vec![first, value]);
                    1
                }
            },
        }
    }

    /// Add a link unless the predicate already links to `iri`.
    ///
    /// Returns `true` if the link was added.
    pub fn add_link(&mut self, predicate: impl Into<String>, iri: &str) -> bool {
        let predicate = predicate.into();
        if self.has_link(&predicate, iri) {
            return false;
        }
        self.add(predicate, Value::link(iri));
        true
    }

    /// Replace the value in `slot` of a predicate filled earlier by [`Properties::add`].
    ///
    /// Returns `false` if there is no such slot.
    pub(crate) fn patch(&mut self, predicate: &str, slot: usize, value: Value) -> bool {
        match self.0.get_mut(predicate) {
            Some(Value::List(items)) => match items.get_mut(slot) {
                Some(item) => {
                    *item = value;
                    true
                }
                None => false,
            },
            Some(existing) if slot == 0 => {
                *existing = value;
                true
            }
            _ => false,
        }
    }

    /// All IRIs the predicate links to.
    #[must_use]
    pub fn links(&self, predicate: &str) -> Vec<&str> {
        self.0.get(predicate).map(Value::links).unwrap_or_default()
    }

    /// Whether the predicate links to `iri`.
    #[must_use]
    pub fn has_link(&self, predicate: &str, iri: &str) -> bool {
        self.links(predicate).contains(&iri)
    }

    /// Predicate IRIs in insertion order.
    pub fn predicate_iris(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Predicate/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Properties {
    fn from_iter<T: IntoIterator<Item = (K, Value)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

// =============================================================================
// TESTS
// =============================================================================
