//! Parsing, matching and expanding a single IRI template.

use super::Bindings;
use crate::GraphError;
use crate::primitives::{TEMPLATE_VAR_CLOSE, TEMPLATE_VAR_OPEN};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use regex::Regex;
use std::fmt;

/// Everything except RFC 3986 unreserved characters.
const BINDING_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Literal(String),
    Variable(String),
}

/// An IRI with `{VAR}` placeholders.
///
/// Matching compiles the template into an anchored regex. A variable captures
/// one or more characters (or percent-encoded bytes) up to the next raw
/// occurrence of the literal character following it, or the rest of the IRI
/// if it ends the template.
#[derive(Debug, Clone)]
pub struct IriTemplate {
    template: String,
    parts: Vec<Part>,
    variables: Vec<String>,
    pattern: Regex,
    length: usize,
}

impl IriTemplate {
    /// Parse a template.
    ///
    /// Fails with `InvalidTemplate` on unbalanced or nested braces, empty or
    /// repeated variable names.
    pub fn parse(template: impl Into<String>) -> Result<Self, GraphError> {
        let template = template.into();
        let invalid = |reason: &str| GraphError::InvalidTemplate {
            template: template.clone(),
            reason: reason.to_string(),
        };

        let mut parts = Vec::new();
        let mut literal = String::new();
        let mut variable: Option<String> = None;

        for c in template.chars() {
            match c {
                TEMPLATE_VAR_OPEN => {
                    if variable.is_some() {
                        return Err(invalid("nested '{'"));
                    }
                    if !literal.is_empty() {
                        parts.push(Part::Literal(std::mem::take(&mut literal)));
                    }
                    variable = Some(String::new());
                }
                TEMPLATE_VAR_CLOSE => match variable.take() {
                    None => return Err(invalid("unmatched '}'")),
                    Some(name) if name.is_empty() => return Err(invalid("empty variable name")),
                    Some(name) => parts.push(Part::Variable(name)),
                },
                c => match variable.as_mut() {
                    Some(name) => name.push(c),
                    None => literal.push(c),
                },
            }
        }
        if variable.is_some() {
            return Err(invalid("unclosed '{'"));
        }
        if !literal.is_empty() {
            parts.push(Part::Literal(literal));
        }

        let mut variables: Vec<String> = Vec::new();
        for part in &parts {
            if let Part::Variable(name) = part {
                if variables.contains(name) {
                    return Err(invalid(&format!("variable {} appears twice", name)));
                }
                variables.push(name.clone());
            }
        }

        let pattern =
            Regex::new(&Self::regex_source(&parts)).map_err(|e| invalid(&e.to_string()))?;
        let length = parts
            .iter()
            .map(|part| match part {
                Part::Literal(text) => text.chars().count(),
                Part::Variable(_) => 1,
            })
            .sum();

        Ok(Self {
            template,
            parts,
            variables,
            pattern,
            length,
        })
    }

    fn regex_source(parts: &[Part]) -> String {
        let mut source = String::from("^");
        for (index, part) in parts.iter().enumerate() {
            match part {
                Part::Literal(text) => source.push_str(&regex::escape(text)),
                Part::Variable(_) => {
                    match Self::stop_char(parts, index) {
                        // percent triples are taken whole, so an encoded byte
                        // never ends the capture
                        Some(c) => {
                            source.push_str("((?:%[0-9A-Fa-f]{2}|[^%");
                            source.push_str(&regex::escape(&c.to_string()));
                            source.push_str("])+)");
                        }
                        None => source.push_str("(.+)"),
                    }
                }
            }
        }
        source.push('$');
        source
    }

    /// The literal character that ends the variable at `index`, if any.
    fn stop_char(parts: &[Part], index: usize) -> Option<char> {
        match parts.get(index + 1) {
            Some(Part::Literal(next)) => next.chars().next(),
            _ => None,
        }
    }

    /// Percent-encode one bound value. `{` and `}` stay raw, and `stop` is
    /// always encoded so the value cannot end its own capture early.
    fn encode_value(value: &str, stop: Option<char>, out: &mut String) {
        let mut buf = [0u8; 4];
        for c in value.chars() {
            if c == TEMPLATE_VAR_OPEN || c == TEMPLATE_VAR_CLOSE {
                out.push(c);
            } else if Some(c) == stop {
                for byte in c.encode_utf8(&mut buf).bytes() {
                    out.push_str(&format!("%{:02X}", byte));
                }
            } else {
                out.extend(utf8_percent_encode(c.encode_utf8(&mut buf), BINDING_ENCODE_SET));
            }
        }
    }

    /// Whether `iri` contains a variable marker.
    #[must_use]
    pub fn is_template(iri: &str) -> bool {
        iri.contains(TEMPLATE_VAR_OPEN)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.template
    }

    /// Variable names, in template order.
    #[must_use]
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Length of the template with every variable counted as one character.
    /// Longer templates are more specific and are matched first.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Bind the variables against a concrete IRI.
    ///
    /// Captured values are percent-decoded.
    #[must_use]
    pub fn matches(&self, iri: &str) -> Option<Bindings> {
        let captures = self.pattern.captures(iri)?;
        let mut bindings = Bindings::new();
        for (index, name) in self.variables.iter().enumerate() {
            let raw = captures.get(index + 1)?.as_str();
            let value = percent_decode_str(raw).decode_utf8_lossy().into_owned();
            bindings.insert(name.clone(), value);
        }
        Some(bindings)
    }

    /// Substitute bindings into the template.
    ///
    /// Values are percent-encoded, except `{` and `}`, so that expanding a
    /// template with its own variable names (`NAME` → `"{NAME}"`) reproduces it.
    /// The literal character following a variable is encoded as well, so
    /// [`IriTemplate::matches`] recovers every binding without braces.
    pub fn expand(&self, bindings: &Bindings) -> Result<String, GraphError> {
        let mut out = String::with_capacity(self.template.len());
        for (index, part) in self.parts.iter().enumerate() {
            match part {
                Part::Literal(text) => out.push_str(text),
                Part::Variable(name) => {
                    let value = bindings.get(name).ok_or_else(|| {
                        GraphError::MissingTemplateVariable {
                            template: self.template.clone(),
                            variable: name.clone(),
                        }
                    })?;
                    Self::encode_value(value, Self::stop_char(&self.parts, index), &mut out);
                }
            }
        }
        Ok(out)
    }

    /// Bindings mapping every variable to `{itself}`.
    #[must_use]
    pub fn self_bindings(&self) -> Bindings {
        self.variables
            .iter()
            .map(|name| {
                (
                    name.clone(),
                    format!("{}{}{}", TEMPLATE_VAR_OPEN, name, TEMPLATE_VAR_CLOSE),
                )
            })
            .collect()
    }
}

impl PartialEq for IriTemplate {
    fn eq(&self, other: &Self) -> bool {
        self.template == other.template
    }
}

impl Eq for IriTemplate {}

impl fmt::Display for IriTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parse_splits_variables() {
        let template = IriTemplate::parse("people/{firstName}-{lastName}/overview").expect("parse");
        assert_eq!(template.variables(), &["firstName", "lastName"]);
        // "people/*-*/overview"
        assert_eq!(template.length(), 19);
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["a/{", "a/}", "a/{}", "a/{x{y}}", "{x}/{x}"] {
            assert!(
                matches!(IriTemplate::parse(bad), Err(GraphError::InvalidTemplate { .. })),
                "{} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn variable_stops_at_next_literal_char() {
        let template = IriTemplate::parse("people/{firstName}-{lastName}/overview").expect("parse");
        assert_eq!(
            template.matches("people/donald-duck/overview"),
            Some(bindings(&[("firstName", "donald"), ("lastName", "duck")]))
        );
        assert_eq!(template.matches("people/donald/overview"), None);
    }

    #[test]
    fn matching_is_anchored() {
        let template = IriTemplate::parse("thing/{name}").expect("parse");
        assert_eq!(template.matches("thing/"), None);
        assert_eq!(template.matches("xoxothing/hello"), None);
        assert_eq!(
            template.matches("thing/hello"),
            Some(bindings(&[("name", "hello")]))
        );
    }

    #[test]
    fn regex_metacharacters_are_literal() {
        let template = IriTemplate::parse("aNS.kind/{x}").expect("parse");
        assert_eq!(template.matches("aNSxkind/1"), None);
        assert!(template.matches("aNS.kind/1").is_some());
    }

    #[test]
    fn expand_encodes_values() {
        let template = IriTemplate::parse("https://example.org/q/{term}").expect("parse");
        assert_eq!(
            template.expand(&bindings(&[("term", "a b/c")])).expect("expand"),
            "https://example.org/q/a%20b%2Fc"
        );
        assert_eq!(
            template
                .matches("https://example.org/q/a%20b%2Fc")
                .and_then(|b| b.get("term").cloned()),
            Some("a b/c".to_string())
        );
    }

    #[test]
    fn values_containing_the_stop_char_round_trip() {
        let template =
            IriTemplate::parse("https://example.org/people/{first}-{last}/overview").expect("parse");
        let names = bindings(&[("first", "Mary-Jane"), ("last", "Watson")]);

        let iri = template.expand(&names).expect("expand");
        assert_eq!(iri, "https://example.org/people/Mary%2DJane-Watson/overview");
        assert_eq!(template.matches(&iri), Some(names));
    }

    #[test]
    fn alphanumeric_stop_char_is_encoded() {
        let template = IriTemplate::parse("x/{id}A{rest}").expect("parse");
        let values = bindings(&[("id", "BANANA"), ("rest", "A/B")]);

        let iri = template.expand(&values).expect("expand");
        assert_eq!(iri, "x/B%41N%41N%41AA%2FB");
        assert_eq!(template.matches(&iri), Some(values));
    }

    #[test]
    fn hex_digit_stop_char_does_not_split_encoded_bytes() {
        let template = IriTemplate::parse("x/{path}F{rest}").expect("parse");
        let values = bindings(&[("path", "a/b"), ("rest", "1")]);

        let iri = template.expand(&values).expect("expand");
        assert_eq!(iri, "x/a%2FbF1");
        assert_eq!(template.matches(&iri), Some(values));
    }

    #[test]
    fn expand_with_self_bindings_reproduces_template() {
        let template = IriTemplate::parse("https://example.org/greet/{NUMBER}").expect("parse");
        assert_eq!(
            template.expand(&template.self_bindings()).expect("expand"),
            "https://example.org/greet/{NUMBER}"
        );
    }

    #[test]
    fn expand_requires_every_variable() {
        let template = IriTemplate::parse("x/{a}/{b}").expect("parse");
        match template.expand(&bindings(&[("a", "1")])) {
            Err(GraphError::MissingTemplateVariable { variable, .. }) => assert_eq!(variable, "b"),
            other => panic!("expected MissingTemplateVariable, got {:?}", other),
        }
    }

    #[test]
    fn template_detection() {
        assert!(IriTemplate::is_template("x/{a}"));
        assert!(!IriTemplate::is_template("x/a"));
    }
}
