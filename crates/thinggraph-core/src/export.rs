//! # Export Module
//!
//! Serializes things back into RDF statements.
//!
//! This is the inverse of the [`Ingestor`](crate::ingestor::Ingestor) for the
//! value kinds both directions support. Every `Struct` value becomes a freshly
//! minted blank node (`_:b0`, `_:b1`, ...). Its statements follow those of
//! the thing that owns it, so a thing's own fields always come first.
//!
//! `List` values are not expressible in this mapping and are rejected, like
//! the ingestion side rejects RDF-star objects.

use crate::config::{GraphConfig, Vocabulary};
use crate::rdf::{BlankId, Literal, Object, Statement, StatementSink, Subject};
use crate::repository::ThingRepository;
use crate::{GraphError, Properties, Thing, Value};

/// Converts things into statements.
///
/// One exporter mints unique blank-node labels for everything it exports, so
/// several things can share one sink.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    vocabulary: Vocabulary,
    next_blank: u64,
}

impl Exporter {
    #[must_use]
    pub fn new(config: &GraphConfig) -> Self {
        Self {
            vocabulary: config.vocabulary.clone(),
            next_blank: 0,
        }
    }

    /// Emit the statements of one thing.
    ///
    /// Nothing reaches the sink if the thing cannot be exported.
    pub fn export<S: StatementSink + ?Sized>(
        &mut self,
        thing: &Thing,
        sink: &mut S,
    ) -> Result<(), GraphError> {
        let mut statements = Vec::new();
        self.emit_properties(
            Subject::Iri(thing.iri().to_string()),
            thing.properties(),
            &mut statements,
        )?;
        for statement in statements {
            sink.emit(statement);
        }
        Ok(())
    }

    /// Emit every thing of a repository, in `list_iri` order.
    ///
    /// Stops at the first thing that cannot be exported; things before it
    /// have already been emitted.
    pub fn export_repository<R, S>(
        &mut self,
        repository: &R,
        sink: &mut S,
    ) -> Result<usize, GraphError>
    where
        R: ThingRepository + ?Sized,
        S: StatementSink + ?Sized,
    {
        let mut exported = 0usize;
        for thing in repository.list() {
            self.export(&thing, sink)?;
            exported += 1;
        }
        Ok(exported)
    }

    /// Convenience: collect the statements of one thing.
    pub fn to_statements(&mut self, thing: &Thing) -> Result<Vec<Statement>, GraphError> {
        let mut statements = Vec::new();
        self.export(thing, &mut statements)?;
        Ok(statements)
    }

    fn mint_blank(&mut self) -> BlankId {
        let id = BlankId::new(format!("b{}", self.next_blank));
        self.next_blank += 1;
        id
    }

    fn emit_properties(
        &mut self,
        subject: Subject,
        properties: &Properties,
        out: &mut Vec<Statement>,
    ) -> Result<(), GraphError> {
        // embedded nodes are written after the owner's own fields
        let mut embedded: Vec<(BlankId, &Properties)> = Vec::new();

        for (predicate, value) in properties.iter() {
            let object = match value {
                Value::Link(iri) => Object::Iri(iri.clone()),
                Value::PlainString(text) => Object::Literal(Literal::typed(
                    text.clone(),
                    self.vocabulary.string_datatype.clone(),
                )),
                Value::LangString { text, lang } => Object::Literal(Literal {
                    lexical: text.clone(),
                    datatype: self.vocabulary.lang_string_datatype.clone(),
                    language: Some(lang.clone()),
                }),
                Value::Literal { value, datatype } => {
                    Object::Literal(Literal::typed(value.clone(), datatype.clone()))
                }
                Value::Struct(inner) => {
                    if inner.is_empty() {
                        return Err(GraphError::UnsupportedRdfConstruct(format!(
                            "empty struct under {} of {}",
                            predicate, subject
                        )));
                    }
                    let id = self.mint_blank();
                    embedded.push((id.clone(), inner));
                    Object::Blank(id)
                }
                Value::List(_) => {
                    tracing::debug!("rejecting List value under {} of {}", predicate, subject);
                    return Err(GraphError::UnsupportedRdfConstruct(format!(
                        "List value under {} of {}",
                        predicate, subject
                    )));
                }
            };
            out.push(Statement::new(subject.clone(), predicate, object));
        }

        for (id, inner) in embedded {
            self.emit_properties(Subject::Blank(id), inner, out)?;
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
