//! Priority-ordered template matching.

use super::{Bindings, IriTemplate};
use crate::GraphError;

/// Templates with associated values, tried longest first.
///
/// Templates are ordered by [`IriTemplate::length`], descending; templates of
/// equal length keep their registration order. The first template matching an
/// IRI wins.
#[derive(Debug, Clone)]
pub struct TemplateChain<T> {
    entries: Vec<(IriTemplate, T)>,
}

impl<T> Default for TemplateChain<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<T> TemplateChain<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a template. Fails with `DuplicateTemplate` if the same
    /// template string is already registered.
    pub fn add(&mut self, template: IriTemplate, value: T) -> Result<(), GraphError> {
        if self.get(template.as_str()).is_some() {
            return Err(GraphError::DuplicateTemplate(template.as_str().to_string()));
        }
        let position = self
            .entries
            .iter()
            .position(|(existing, _)| existing.length() < template.length())
            .unwrap_or(self.entries.len());
        self.entries.insert(position, (template, value));
        Ok(())
    }

    /// Builder-style [`TemplateChain::add`].
    pub fn with(mut self, template: IriTemplate, value: T) -> Result<Self, GraphError> {
        self.add(template, value)?;
        Ok(self)
    }

    /// The first template matching `iri`, its value and the bindings.
    #[must_use]
    pub fn match_iri(&self, iri: &str) -> Option<(&IriTemplate, &T, Bindings)> {
        self.entries.iter().find_map(|(template, value)| {
            template
                .matches(iri)
                .map(|bindings| (template, value, bindings))
        })
    }

    /// The value registered under exactly this template string.
    #[must_use]
    pub fn get(&self, template: &str) -> Option<&T> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.as_str() == template)
            .map(|(_, value)| value)
    }

    /// Registered templates, in matching order.
    pub fn templates(&self) -> impl Iterator<Item = &IriTemplate> {
        self.entries.iter().map(|(template, _)| template)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn template(text: &str) -> IriTemplate {
        IriTemplate::parse(text).expect("parse")
    }

    fn value_for(chain: &TemplateChain<u32>, iri: &str) -> Option<u32> {
        chain.match_iri(iri).map(|(_, value, _)| *value)
    }

    #[test]
    fn empty_chain_matches_nothing() {
        let chain: TemplateChain<u32> = TemplateChain::new();
        assert!(chain.match_iri("").is_none());
        assert!(chain.match_iri("another/something").is_none());
    }

    #[test]
    fn longest_template_is_listed_first() {
        let chain = TemplateChain::new()
            .with(template("thing/{name}"), 1)
            .and_then(|c| c.with(template("people/{firstName}-{lastName}/overview"), 2))
            .expect("chain");

        let order: Vec<&str> = chain.templates().map(IriTemplate::as_str).collect();
        assert_eq!(
            order,
            vec!["people/{firstName}-{lastName}/overview", "thing/{name}"]
        );
        assert_eq!(value_for(&chain, "thing/hello"), Some(1));
        assert_eq!(value_for(&chain, "people/donald-duck/overview"), Some(2));
        assert_eq!(value_for(&chain, "thing/"), None);
    }

    #[test]
    fn does_not_match_contained() {
        let chain = TemplateChain::new()
            .with(template("thing"), 1)
            .and_then(|c| c.with(template("thing/{name}"), 1))
            .expect("chain");
        for iri in [
            "thingxoxo",
            "xoxothingxoxo",
            "xoxothing",
            "thingxoxo/hello",
            "xoxothingxoxo/hello",
            "xoxothing/hello",
        ] {
            assert_eq!(value_for(&chain, iri), None, "{}", iri);
        }
    }

    #[test]
    fn match_longest_in_any_registration_order() {
        let forward = TemplateChain::new()
            .with(template("aNS.kind"), 1)
            .and_then(|c| c.with(template("aNS.kind/{foo}/{name}"), 2))
            .and_then(|c| c.with(template("aNS.kind/{x}/{y}/{z}"), 3))
            .expect("chain");
        let backward = TemplateChain::new()
            .with(template("aNS.kind/{foo}/{name}"), 2)
            .and_then(|c| c.with(template("aNS.kind"), 1))
            .expect("chain");

        for chain in [&forward, &backward] {
            assert_eq!(value_for(chain, "somethingelse"), None);
            assert_eq!(value_for(chain, "aNS.kind"), Some(1));
            let (_, value, bindings) = chain.match_iri("aNS.kind/hello/world").expect("match");
            assert_eq!(*value, 2);
            assert_eq!(bindings.get("foo").map(String::as_str), Some("hello"));
            assert_eq!(bindings.get("name").map(String::as_str), Some("world"));
        }
        assert_eq!(value_for(&forward, "aNS.kind/a/b/c"), Some(3));
    }

    #[test]
    fn equal_length_keeps_registration_order() {
        // both "x/*" and "*/y" are 3 long and both match "x/y"
        let chain = TemplateChain::new()
            .with(template("x/{a}"), 1)
            .and_then(|c| c.with(template("{b}/y"), 2))
            .expect("chain");
        assert_eq!(value_for(&chain, "x/y"), Some(1));
    }

    #[test]
    fn duplicate_registration_is_rejected() {
        let mut chain = TemplateChain::new();
        chain.add(template("thing/{name}"), 1).expect("first");
        assert!(matches!(
            chain.add(template("thing/{name}"), 2),
            Err(GraphError::DuplicateTemplate(_))
        ));
        assert_eq!(chain.len(), 1);
    }
}
