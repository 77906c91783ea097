//! A repository view that synthesizes the instances of templated classes.

use super::{Bindings, IriTemplate, TemplateChain};
use crate::kinds::{KindTable, ThingKind};
use crate::repository::ThingRepository;
use crate::{GraphError, Thing, Value};
use std::sync::Arc;

/// Builds the instance of one templated class.
#[derive(Debug, Clone)]
struct Generator {
    class_iri: String,
    template: IriTemplate,
    rdf_type: String,
    /// Class predicates whose value is itself an IRI template.
    predicates: Vec<(String, IriTemplate)>,
}

impl Generator {
    fn from_class(
        class: &Thing,
        template: IriTemplate,
        kinds: &KindTable,
    ) -> Result<Self, GraphError> {
        let vocabulary = kinds.vocabulary();
        let mut predicates = Vec::new();
        for (predicate, value) in class.properties().iter() {
            if predicate == vocabulary.iri_template_property {
                continue;
            }
            let Value::Literal { value, datatype } = value else {
                continue;
            };
            if *datatype != vocabulary.iri_template_datatype {
                continue;
            }

            let predicate_template = IriTemplate::parse(value.clone())?;
            if let Some(unknown) = predicate_template
                .variables()
                .iter()
                .find(|name| !template.variables().contains(*name))
            {
                return Err(GraphError::InvalidTemplate {
                    template: value.clone(),
                    reason: format!(
                        "variable {} is not bound by the class template {}",
                        unknown, template
                    ),
                });
            }
            predicates.push((predicate.to_string(), predicate_template));
        }

        Ok(Self {
            class_iri: class.iri().to_string(),
            template,
            rdf_type: vocabulary.rdf_type.clone(),
            predicates,
        })
    }

    fn generate(&self, bindings: &Bindings) -> Result<Thing, GraphError> {
        let mut builder = Thing::builder(self.template.expand(bindings)?);
        builder.set(self.rdf_type.clone(), Value::Link(self.class_iri.clone()));
        for (predicate, template) in &self.predicates {
            builder.set(predicate.clone(), Value::Link(template.expand(bindings)?));
        }
        builder.build()
    }
}

/// Wraps a repository and resolves templated IRIs.
///
/// At construction every stored class carrying an IRI template registers a
/// generator. `get` then answers any IRI matching one of those templates with
/// a synthesized thing typed as the class. Class predicates holding a value of
/// the IRI-template datatype are carried over as links, expanded with the same
/// bindings. Everything else is delegated.
///
/// Templates are fixed once built; rebuild the view to pick up new classes.
#[derive(Debug)]
pub struct TemplateRepository<R> {
    delegate: R,
    chain: TemplateChain<Generator>,
}

impl<R: ThingRepository> TemplateRepository<R> {
    /// Scan `delegate` for templated classes.
    ///
    /// Fails with `InvalidTemplate` or `DuplicateTemplate` if a class
    /// template cannot be registered.
    pub fn new(delegate: R, kinds: &KindTable) -> Result<Self, GraphError> {
        let vocabulary = kinds.vocabulary();
        let mut chain = TemplateChain::new();

        for thing in delegate.list() {
            if !kinds.has_kind(&thing, ThingKind::Class) {
                continue;
            }
            let raw = match thing.get(&vocabulary.iri_template_property) {
                Some(Value::PlainString(text)) => text,
                Some(Value::Literal { value, .. }) => value,
                _ => continue,
            };
            let template = IriTemplate::parse(raw.clone())?;
            let generator = Generator::from_class(&thing, template.clone(), kinds)?;
            chain.add(template, generator)?;
        }

        tracing::info!("template repository ready with {} templates", chain.len());
        Ok(Self { delegate, chain })
    }

    #[must_use]
    pub fn delegate(&self) -> &R {
        &self.delegate
    }

    #[must_use]
    pub fn into_inner(self) -> R {
        self.delegate
    }

    /// Registered templates, in matching order.
    pub fn templates(&self) -> impl Iterator<Item = &str> {
        self.chain.templates().map(IriTemplate::as_str)
    }

    /// Build the thing a registered template yields for `bindings`.
    ///
    /// Fails with `NoTemplateMatch` if `template` is not registered, or
    /// `MissingTemplateVariable` if a binding is missing.
    pub fn generate(&self, template: &str, bindings: &Bindings) -> Result<Thing, GraphError> {
        self.chain
            .get(template)
            .ok_or_else(|| GraphError::NoTemplateMatch(template.to_string()))?
            .generate(bindings)
    }

    /// Split a concrete IRI into the template it matches and the bindings.
    ///
    /// Returns `Ok(None)` if no template matches, and `TemplateIsNotConcrete`
    /// if `iri` itself contains variable markers.
    pub fn breakdown(&self, iri: &str) -> Result<Option<(String, Bindings)>, GraphError> {
        if IriTemplate::is_template(iri) {
            return Err(GraphError::TemplateIsNotConcrete(iri.to_string()));
        }
        Ok(self
            .chain
            .match_iri(iri)
            .map(|(template, _, bindings)| (template.as_str().to_string(), bindings)))
    }
}

impl<R: ThingRepository> ThingRepository for TemplateRepository<R> {
    /// Template strings first, then the delegate's IRIs.
    fn list_iri(&self) -> Vec<String> {
        self.templates()
            .map(str::to_string)
            .chain(self.delegate.list_iri())
            .collect()
    }

    fn get(&self, iri: &str) -> Option<Arc<Thing>> {
        match self.chain.match_iri(iri) {
            Some((template, generator, bindings)) => match generator.generate(&bindings) {
                Ok(thing) => Some(Arc::new(thing)),
                Err(e) => {
                    tracing::warn!("template {} failed for {}: {}", template, iri, e);
                    None
                }
            },
            None => self.delegate.get(iri),
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
