//! # Ingestor Module
//!
//! Converts an RDF statement stream into things.
//!
//! - Validate statements before they touch a builder
//! - Group statements by subject: IRI subjects become root things, blank
//!   subjects become embedded `Struct` values
//! - Collect repeated predicates into a `List`, skipping duplicates
//! - Reject RDF-star triples and unclassified resources
//!
//! Statements arrive in arbitrary order, so a blank node may be used as an
//! object before any of its own statements are seen. Every such use leaves a
//! placeholder on the owning builder and a deferred patch. Once the stream is
//! exhausted the patches run in dependency order (a blank node is embedded
//! only after everything embedded *into* it is in place), then the root
//! builders are finalized.

use crate::config::{GraphConfig, Vocabulary};
use crate::rdf::{Literal, Object, Statement, Subject};
use crate::repository::ThingStore;
use crate::{GraphError, Properties, Thing, ThingBuilder, Value};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};

// =============================================================================
// DEFERRED PATCHES
// =============================================================================

/// The builder a deferred patch writes into.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Owner {
    Root(String),
    Blank(String),
}

/// "Embed blank node `key` into `owner.predicate[slot]`."
#[derive(Debug)]
struct Deferred {
    key: String,
    owner: Owner,
    predicate: String,
    slot: usize,
}

// =============================================================================
// THINGS
// =============================================================================

/// The root things produced by one ingestion run.
///
/// Finite and consumed once; iterate again by ingesting again.
#[derive(Debug)]
pub struct Things {
    inner: std::vec::IntoIter<Thing>,
}

impl Iterator for Things {
    type Item = Thing;

    fn next(&mut self) -> Option<Thing> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Things {}

// =============================================================================
// INGESTOR
// =============================================================================

/// Converts statements into things.
#[derive(Debug, Clone, Default)]
pub struct Ingestor {
    vocabulary: Vocabulary,
}

impl Ingestor {
    #[must_use]
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            vocabulary: config.vocabulary.clone(),
        }
    }

    /// Validate a statement.
    ///
    /// A statement is valid if its subject, predicate and (IRI or blank)
    /// object are non-empty. Returns `GraphError::InvalidStatement` otherwise.
    pub fn validate(statement: &Statement) -> Result<(), GraphError> {
        let subject_empty = match &statement.subject {
            Subject::Iri(iri) => iri.is_empty(),
            Subject::Blank(id) => id.as_str().is_empty(),
        };
        if subject_empty {
            return Err(GraphError::InvalidStatement(format!(
                "empty subject in {}",
                statement
            )));
        }

        if statement.predicate.is_empty() {
            return Err(GraphError::InvalidStatement(format!(
                "empty predicate in {}",
                statement
            )));
        }

        let object_empty = match &statement.object {
            Object::Iri(iri) => iri.is_empty(),
            Object::Blank(id) => id.as_str().is_empty(),
            _ => false,
        };
        if object_empty {
            return Err(GraphError::InvalidStatement(format!(
                "empty object in {}",
                statement
            )));
        }

        Ok(())
    }

    /// Convert a statement stream into root things, in first-seen order.
    ///
    /// # Errors
    /// - `InvalidStatement` for a malformed statement
    /// - `UnsupportedRdfConstruct` for RDF-star or unclassified objects
    /// - `DanglingBlankNode` if a blank node is used but never described
    /// - `BlankNodeCycle` if a blank node (transitively) embeds itself
    pub fn ingest<I>(&self, statements: I) -> Result<Things, GraphError>
    where
        I: IntoIterator<Item = Statement>,
    {
        let mut roots: IndexMap<String, ThingBuilder> = IndexMap::new();
        let mut structs: IndexMap<String, ThingBuilder> = IndexMap::new();
        let mut deferred: Vec<Deferred> = Vec::new();
        let mut seen_blank_uses: HashSet<(Owner, String, String)> = HashSet::new();

        for statement in statements {
            Self::validate(&statement)?;
            let Statement {
                subject,
                predicate,
                object,
            } = statement;

            let (owner, builder) = match subject {
                Subject::Iri(iri) => {
                    let builder = roots
                        .entry(iri.clone())
                        .or_insert_with(|| Thing::builder(iri.clone()));
                    (Owner::Root(iri), builder)
                }
                Subject::Blank(id) => {
                    let key = id.as_str().to_string();
                    let builder = structs.entry(key.clone()).or_default();
                    (Owner::Blank(key), builder)
                }
            };

            match object {
                Object::Blank(id) => {
                    let key = id.as_str().to_string();
                    if !seen_blank_uses.insert((owner.clone(), predicate.clone(), key.clone())) {
                        continue;
                    }
                    // placeholder, patched once the struct is complete
                    let slot = builder.add(predicate.clone(), Value::Struct(Properties::new()));
                    deferred.push(Deferred {
                        key,
                        owner,
                        predicate,
                        slot,
                    });
                }
                other => {
                    let value = self.object_value(other)?;
                    let duplicate = builder
                        .properties()
                        .get(&predicate)
                        .is_some_and(|existing| existing.contains(&value));
                    if !duplicate {
                        builder.add(predicate, value);
                    }
                }
            }
        }

        Self::warn_unreferenced(&structs, &deferred);
        Self::resolve_deferred(deferred, &mut roots, &mut structs)?;

        let things = roots
            .into_values()
            .map(ThingBuilder::build)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Things {
            inner: things.into_iter(),
        })
    }

    /// Ingest a statement stream and store every root thing.
    ///
    /// Returns the number of things stored. Stops at the first failing store;
    /// things stored before it stay stored.
    pub fn load_into<I, S>(&self, statements: I, store: &mut S) -> Result<usize, GraphError>
    where
        I: IntoIterator<Item = Statement>,
        S: ThingStore + ?Sized,
    {
        let mut stored = 0usize;
        for thing in self.ingest(statements)? {
            store.store(thing)?;
            stored += 1;
        }
        Ok(stored)
    }

    // =========================================================================
    // VALUE CONVERSION
    // =========================================================================

    fn object_value(&self, object: Object) -> Result<Value, GraphError> {
        match object {
            Object::Iri(iri) => Ok(Value::Link(iri)),
            Object::Literal(literal) => Ok(self.literal_value(literal)),
            Object::Triple(statement) => {
                tracing::debug!("rejecting RDF-star object << {} >>", statement);
                Err(GraphError::UnsupportedRdfConstruct(format!(
                    "triple-valued object << {} >>",
                    statement
                )))
            }
            Object::Resource(term) => {
                tracing::debug!("rejecting unclassified object {}", term);
                Err(GraphError::UnsupportedRdfConstruct(format!(
                    "unclassified resource {}",
                    term
                )))
            }
            // handled by the caller
            Object::Blank(id) => Err(GraphError::UnsupportedRdfConstruct(format!(
                "blank node {} in value position",
                id
            ))),
        }
    }

    /// The language tag wins over the datatype; the canonical string datatype
    /// (or none at all) yields a plain string.
    fn literal_value(&self, literal: Literal) -> Value {
        let Literal {
            lexical,
            datatype,
            language,
        } = literal;
        match language {
            Some(lang) if !lang.is_empty() => Value::LangString {
                text: lexical,
                lang,
            },
            _ if datatype.is_empty() || datatype == self.vocabulary.string_datatype => {
                Value::PlainString(lexical)
            }
            _ => Value::Literal {
                value: lexical,
                datatype,
            },
        }
    }

    // =========================================================================
    // BLANK NODE RESOLUTION
    // =========================================================================

    fn warn_unreferenced(structs: &IndexMap<String, ThingBuilder>, deferred: &[Deferred]) {
        let referenced: HashSet<&str> = deferred.iter().map(|d| d.key.as_str()).collect();
        for key in structs.keys() {
            if !referenced.contains(key.as_str()) {
                tracing::warn!("blank node _:{} is never referenced, dropping it", key);
            }
        }
    }

    /// Apply deferred patches so that every struct is complete when embedded.
    fn resolve_deferred(
        deferred: Vec<Deferred>,
        roots: &mut IndexMap<String, ThingBuilder>,
        structs: &mut IndexMap<String, ThingBuilder>,
    ) -> Result<(), GraphError> {
        // patches still to be written into each blank node
        let mut pending: HashMap<String, usize> = HashMap::new();
        for action in &deferred {
            if let Owner::Blank(owner) = &action.owner {
                *pending.entry(owner.clone()).or_default() += 1;
            }
        }

        let mut remaining = deferred;
        while !remaining.is_empty() {
            let before = remaining.len();
            let mut blocked = Vec::new();

            for action in remaining {
                if pending.get(&action.key).copied().unwrap_or(0) > 0 {
                    blocked.push(action);
                    continue;
                }

                let embedded = structs
                    .get(&action.key)
                    .ok_or_else(|| GraphError::DanglingBlankNode(action.key.clone()))?
                    .properties()
                    .clone();

                let target = match &action.owner {
                    Owner::Root(iri) => roots.get_mut(iri),
                    Owner::Blank(key) => structs.get_mut(key),
                };
                let patched = target.is_some_and(|builder| {
                    builder.properties_mut().patch(
                        &action.predicate,
                        action.slot,
                        Value::Struct(embedded),
                    )
                });
                if !patched {
                    return Err(GraphError::InvalidStatement(format!(
                        "lost placeholder for _:{} under {}",
                        action.key, action.predicate
                    )));
                }

                if let Owner::Blank(owner) = &action.owner {
                    if let Some(count) = pending.get_mut(owner) {
                        *count = count.saturating_sub(1);
                    }
                }
            }

            if blocked.len() == before {
                let key = blocked
                    .first()
                    .map(|action| action.key.clone())
                    .unwrap_or_default();
                return Err(GraphError::BlankNodeCycle(key));
            }
            remaining = blocked;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use crate::rdf::BlankId;

    const S: &str = "https://example.org/s";
    const P: &str = "https://example.org/p";
    const Q: &str = "https://example.org/q";

    fn blank(label: &str) -> Subject {
        Subject::Blank(BlankId::new(label))
    }

    fn blank_object(label: &str) -> Object {
        Object::Blank(BlankId::new(label))
    }

    fn string(text: &str) -> Object {
        Object::Literal(Literal::typed(text, crate::primitives::XSD_STRING))
    }

    fn ingest(statements: Vec<Statement>) -> Result<Vec<Thing>, GraphError> {
        Ingestor::default().ingest(statements).map(Iterator::collect)
    }

    #[test]
    fn validate_rejects_empty_parts() {
        let empty_subject = Statement::iri("", P, Object::Iri(S.to_string()));
        assert!(matches!(
            Ingestor::validate(&empty_subject),
            Err(GraphError::InvalidStatement(_))
        ));
        let empty_predicate = Statement::iri(S, "", Object::Iri(S.to_string()));
        assert!(Ingestor::validate(&empty_predicate).is_err());
        let empty_object = Statement::iri(S, P, Object::Iri(String::new()));
        assert!(Ingestor::validate(&empty_object).is_err());
        assert!(Ingestor::validate(&Statement::iri(S, P, string("ok"))).is_ok());
    }

    #[test]
    fn literal_conversion_rules() {
        let things = ingest(vec![
            Statement::iri(S, "https://example.org/plain", string("hi")),
            Statement::iri(
                S,
                "https://example.org/lang",
                Object::Literal(Literal::lang("Saluton", "eo")),
            ),
            Statement::iri(
                S,
                "https://example.org/int",
                Object::Literal(Literal::typed("42", "http://www.w3.org/2001/XMLSchema#int")),
            ),
        ])
        .expect("ingest");

        assert_eq!(things.len(), 1);
        let thing = &things[0];
        assert_eq!(
            thing.get("https://example.org/plain"),
            Some(&Value::string("hi"))
        );
        assert_eq!(
            thing.get("https://example.org/lang"),
            Some(&Value::lang_string("Saluton", "eo"))
        );
        assert_eq!(
            thing.get("https://example.org/int"),
            Some(&Value::literal("42", "http://www.w3.org/2001/XMLSchema#int"))
        );
    }

    #[test]
    fn repeated_predicates_become_list_without_duplicates() {
        let things = ingest(vec![
            Statement::iri(S, P, Object::Iri("https://example.org/a".to_string())),
            Statement::iri(S, P, Object::Iri("https://example.org/b".to_string())),
            Statement::iri(S, P, Object::Iri("https://example.org/a".to_string())),
        ])
        .expect("ingest");

        assert_eq!(
            things[0].links(P),
            vec!["https://example.org/a", "https://example.org/b"]
        );
    }

    #[test]
    fn blank_node_used_before_defined() {
        let things = ingest(vec![
            Statement::iri(S, P, blank_object("b1")),
            Statement::new(blank("b1"), Q, string("inner")),
        ])
        .expect("ingest");

        assert_eq!(things.len(), 1);
        let embedded = things[0].get(P).and_then(Value::as_struct).expect("struct");
        assert_eq!(embedded.get(Q), Some(&Value::string("inner")));
    }

    #[test]
    fn nested_blank_nodes_resolve_in_dependency_order() {
        // outer is embedded before inner is described
        let things = ingest(vec![
            Statement::iri(S, P, blank_object("outer")),
            Statement::new(blank("outer"), P, blank_object("inner")),
            Statement::new(blank("inner"), Q, string("deep")),
        ])
        .expect("ingest");

        let outer = things[0].get(P).and_then(Value::as_struct).expect("outer");
        let inner = outer.get(P).and_then(Value::as_struct).expect("inner");
        assert_eq!(inner.get(Q), Some(&Value::string("deep")));
    }

    #[test]
    fn blank_nodes_inside_lists_are_patched_in_place() {
        let things = ingest(vec![
            Statement::iri(S, P, blank_object("x")),
            Statement::iri(S, P, blank_object("y")),
            Statement::new(blank("x"), Q, string("first")),
            Statement::new(blank("y"), Q, string("second")),
        ])
        .expect("ingest");

        match things[0].get(P) {
            Some(Value::List(items)) => {
                assert_eq!(items.len(), 2);
                assert_eq!(
                    items[0].as_struct().and_then(|s| s.get(Q)),
                    Some(&Value::string("first"))
                );
                assert_eq!(
                    items[1].as_struct().and_then(|s| s.get(Q)),
                    Some(&Value::string("second"))
                );
            }
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn dangling_blank_node_is_fatal() {
        let result = ingest(vec![Statement::iri(S, P, blank_object("nowhere"))]);
        match result {
            Err(GraphError::DanglingBlankNode(key)) => assert_eq!(key, "nowhere"),
            other => panic!("expected DanglingBlankNode, got {:?}", other),
        }
    }

    #[test]
    fn blank_node_cycle_is_detected() {
        let result = ingest(vec![
            Statement::iri(S, P, blank_object("a")),
            Statement::new(blank("a"), P, blank_object("b")),
            Statement::new(blank("b"), P, blank_object("a")),
        ]);
        assert!(matches!(result, Err(GraphError::BlankNodeCycle(_))));
    }

    #[test]
    fn unsupported_objects_are_fatal() {
        let nested = Statement::iri(S, P, string("x"));
        let result = ingest(vec![Statement::iri(S, Q, Object::Triple(Box::new(nested)))]);
        assert!(matches!(
            result,
            Err(GraphError::UnsupportedRdfConstruct(_))
        ));

        let result = ingest(vec![Statement::iri(
            S,
            Q,
            Object::Resource("?".to_string()),
        )]);
        assert!(matches!(
            result,
            Err(GraphError::UnsupportedRdfConstruct(_))
        ));
    }

    #[test]
    fn blank_subjects_never_become_roots() {
        let things = ingest(vec![
            Statement::new(blank("orphan"), Q, string("ignored")),
            Statement::iri(S, Q, string("kept")),
        ])
        .expect("ingest");
        let iris: Vec<&str> = things.iter().map(Thing::iri).collect();
        assert_eq!(iris, vec![S]);
    }

    #[test]
    fn load_into_stores_every_root() {
        let mut repository = crate::repository::MemoryRepository::new();
        let stored = Ingestor::default()
            .load_into(
                vec![
                    Statement::iri(S, Q, string("one")),
                    Statement::iri("https://example.org/t", Q, string("two")),
                ],
                &mut repository,
            )
            .expect("load");
        assert_eq!(stored, 2);
        assert!(crate::repository::ThingRepository::get(&repository, S).is_some());
    }
}
