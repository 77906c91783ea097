//! # Graph Configuration
//!
//! An explicit, constructed configuration object handed to converters and
//! repositories. There is no process-wide prefix table: every component that
//! needs a vocabulary IRI reads it from the `GraphConfig` it was built with.
//!
//! ```toml
//! [namespaces]
//! ex = "https://example.org/"
//!
//! [vocabulary]
//! class_properties = "ex:properties"
//! ```
//!
//! Missing tables fall back to [`GraphConfig::default`]. File namespaces are
//! merged over the defaults, and vocabulary values may be CURIEs which are
//! expanded with the merged table.

use crate::GraphError;
use crate::primitives;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// =============================================================================
// NAMESPACES
// =============================================================================

/// Prefix → namespace IRI table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespaces(BTreeMap<String, String>);

impl Default for Namespaces {
    fn default() -> Self {
        let mut map = BTreeMap::new();
        map.insert("rdf".to_string(), primitives::RDF_NS.to_string());
        map.insert("rdfs".to_string(), primitives::RDFS_NS.to_string());
        map.insert("xsd".to_string(), primitives::XSD_NS.to_string());
        map.insert("enola".to_string(), primitives::ENOLA_NS.to_string());
        map.insert("schema".to_string(), primitives::SCHEMA_NS.to_string());
        Self(map)
    }
}

impl Namespaces {
    /// An empty table.
    #[must_use]
    pub fn empty() -> Self {
        Self(BTreeMap::new())
    }

    /// Register (or replace) a prefix.
    pub fn insert(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.0.insert(prefix.into(), namespace.into());
    }

    /// The namespace IRI bound to `prefix`.
    #[must_use]
    pub fn get(&self, prefix: &str) -> Option<&str> {
        self.0.get(prefix).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Expand `prefix:local` into a full IRI.
    ///
    /// Strings whose prefix is unknown, or whose local part starts with `//`
    /// (absolute IRIs such as `https://...`), are returned unchanged.
    #[must_use]
    pub fn expand(&self, curie: &str) -> String {
        match curie.split_once(':') {
            Some((prefix, local)) if !local.starts_with("//") => match self.0.get(prefix) {
                Some(namespace) => format!("{}{}", namespace, local),
                None => curie.to_string(),
            },
            _ => curie.to_string(),
        }
    }

    /// Compact a full IRI into `prefix:local`, using the longest matching
    /// namespace. Returns `None` if no namespace matches.
    #[must_use]
    pub fn compact(&self, iri: &str) -> Option<String> {
        self.0
            .iter()
            .filter(|(_, namespace)| !namespace.is_empty())
            .filter_map(|(prefix, namespace)| {
                iri.strip_prefix(namespace.as_str())
                    .map(|local| (prefix, namespace.len(), local))
            })
            .max_by_key(|(_, len, _)| *len)
            .map(|(prefix, _, local)| format!("{}:{}", prefix, local))
    }
}

// =============================================================================
// VOCABULARY
// =============================================================================

/// The IRIs the engine reacts to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Declares a thing's kind (`rdf:type`).
    pub rdf_type: String,
    /// Kind of class things (`rdfs:Class`).
    pub rdfs_class: String,
    /// Kind of property things (`rdf:Property`).
    pub rdf_property: String,
    /// Links a property to its domain class (`rdfs:domain`).
    pub rdfs_domain: String,
    /// Inverse of `rdfs_domain`, maintained on classes by inference.
    pub class_properties: String,
    /// Class predicate carrying the IRI template of its instances.
    pub iri_template_property: String,
    /// Datatype of literal values that are IRI templates.
    pub iri_template_datatype: String,
    /// Literals of this datatype become `Value::PlainString`.
    pub string_datatype: String,
    /// Datatype written for `Value::LangString` on export.
    pub lang_string_datatype: String,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            rdf_type: primitives::RDF_TYPE.to_string(),
            rdfs_class: primitives::RDFS_CLASS.to_string(),
            rdf_property: primitives::RDF_PROPERTY.to_string(),
            rdfs_domain: primitives::RDFS_DOMAIN.to_string(),
            class_properties: primitives::CLASS_PROPERTIES.to_string(),
            iri_template_property: primitives::IRI_TEMPLATE_PROPERTY.to_string(),
            iri_template_datatype: primitives::IRI_TEMPLATE_DATATYPE.to_string(),
            string_datatype: primitives::XSD_STRING.to_string(),
            lang_string_datatype: primitives::RDF_LANG_STRING.to_string(),
        }
    }
}

impl Vocabulary {
    fn entries_mut(&mut self) -> [(&'static str, &mut String); 9] {
        [
            ("rdf_type", &mut self.rdf_type),
            ("rdfs_class", &mut self.rdfs_class),
            ("rdf_property", &mut self.rdf_property),
            ("rdfs_domain", &mut self.rdfs_domain),
            ("class_properties", &mut self.class_properties),
            ("iri_template_property", &mut self.iri_template_property),
            ("iri_template_datatype", &mut self.iri_template_datatype),
            ("string_datatype", &mut self.string_datatype),
            ("lang_string_datatype", &mut self.lang_string_datatype),
        ]
    }

    /// Expand CURIE entries through `namespaces` and reject empty ones.
    fn resolve(mut self, namespaces: &Namespaces) -> Result<Self, GraphError> {
        for (name, entry) in self.entries_mut() {
            if entry.is_empty() {
                return Err(GraphError::ConfigError(format!(
                    "vocabulary.{} must not be empty",
                    name
                )));
            }
            *entry = namespaces.expand(entry);
        }
        Ok(self)
    }
}

// =============================================================================
// GRAPH CONFIG
// =============================================================================

/// Namespaces plus vocabulary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GraphConfig {
    pub namespaces: Namespaces,
    pub vocabulary: Vocabulary,
}

/// On-disk shape, before merging and CURIE expansion.
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    namespaces: BTreeMap<String, String>,
    vocabulary: Vocabulary,
}

impl GraphConfig {
    /// Parse a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, GraphError> {
        let raw: RawConfig =
            toml::from_str(text).map_err(|e| GraphError::ConfigError(e.to_string()))?;

        let mut namespaces = Namespaces::default();
        for (prefix, namespace) in raw.namespaces {
            if prefix.is_empty() || namespace.is_empty() {
                return Err(GraphError::ConfigError(format!(
                    "namespace binding {:?} = {:?} must not be empty",
                    prefix, namespace
                )));
            }
            namespaces.insert(prefix, namespace);
        }

        let vocabulary = raw.vocabulary.resolve(&namespaces)?;
        Ok(Self {
            namespaces,
            vocabulary,
        })
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GraphError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| GraphError::IoError(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&text)
    }
}

// =============================================================================
// TESTS
// =============================================================================
