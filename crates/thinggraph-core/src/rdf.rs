//! # RDF Statement Model
//!
//! The abstract `(subject, predicate, object)` shape the converters consume
//! and produce. Concrete syntaxes (Turtle, JSON-LD, ...) are parsed and
//! printed by external collaborators; the engine only sees these terms.
//!
//! `Display` renders terms in N-Triples syntax, which is what logs and simple
//! exporters use.

use std::fmt;
use std::sync::Arc;

// =============================================================================
// TERMS
// =============================================================================

/// Blank node identifier, scoped to one statement stream.
///
/// The label does NOT include the `_:` prefix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlankId(Arc<str>);

impl BlankId {
    /// Create a blank node ID from a label.
    pub fn new(label: impl AsRef<str>) -> Self {
        Self(Arc::from(label.as_ref()))
    }

    /// The label, without `_:` prefix.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlankId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "_:{}", self.0)
    }
}

/// A literal: lexical form, datatype IRI, and optional language tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Literal {
    pub lexical: String,
    pub datatype: String,
    pub language: Option<String>,
}

impl Literal {
    /// A literal with an explicit datatype.
    pub fn typed(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: datatype.into(),
            language: None,
        }
    }

    /// A language-tagged string (`rdf:langString`).
    pub fn lang(lexical: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            lexical: lexical.into(),
            datatype: crate::primitives::RDF_LANG_STRING.to_string(),
            language: Some(language.into()),
        }
    }
}

/// Subject position: an IRI or a blank node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    Iri(String),
    Blank(BlankId),
}

/// Object position.
///
/// `Triple` (RDF-star) and `Resource` (a term the source could not classify
/// as IRI, blank node or literal) exist so sources can hand them over; the
/// converters reject both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Object {
    Iri(String),
    Blank(BlankId),
    Literal(Literal),
    Triple(Box<Statement>),
    Resource(String),
}

/// One RDF statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Statement {
    pub subject: Subject,
    pub predicate: String,
    pub object: Object,
}

impl Statement {
    /// Create a new statement.
    pub fn new(subject: Subject, predicate: impl Into<String>, object: Object) -> Self {
        Self {
            subject,
            predicate: predicate.into(),
            object,
        }
    }

    /// Convenience for the common IRI-subject case.
    pub fn iri(subject: impl Into<String>, predicate: impl Into<String>, object: Object) -> Self {
        Self::new(Subject::Iri(subject.into()), predicate, object)
    }
}

// =============================================================================
// SINK
// =============================================================================

/// Receives statements emitted by the serializer.
pub trait StatementSink {
    fn emit(&mut self, statement: Statement);
}

impl StatementSink for Vec<Statement> {
    fn emit(&mut self, statement: Statement) {
        self.push(statement);
    }
}

// =============================================================================
// N-TRIPLES DISPLAY
// =============================================================================

fn write_escaped(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    for c in text.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\r' => f.write_str("\\r")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    Ok(())
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("\"")?;
        write_escaped(f, &self.lexical)?;
        f.write_str("\"")?;
        match &self.language {
            Some(lang) => write!(f, "@{}", lang),
            None => write!(f, "^^<{}>", self.datatype),
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::Blank(id) => write!(f, "{}", id),
        }
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Iri(iri) => write!(f, "<{}>", iri),
            Self::Blank(id) => write!(f, "{}", id),
            Self::Literal(literal) => write!(f, "{}", literal),
            Self::Triple(statement) => write!(
                f,
                "<< {} <{}> {} >>",
                statement.subject, statement.predicate, statement.object
            ),
            Self::Resource(term) => f.write_str(term),
        }
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
    }
}

// =============================================================================
// TESTS
// =============================================================================
