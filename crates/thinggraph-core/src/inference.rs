//! # RDFS Inference
//!
//! Triggers deriving facts from RDFS declarations.

use crate::kinds::{KindTable, ThingKind};
use crate::repository::{Trigger, TriggerContext};
use crate::{GraphError, Thing};

/// Maintains the inverse of `rdfs:domain` on classes.
///
/// When a property with exactly one domain is stored, the property's IRI is
/// added to the domain class's class-properties, creating the class if it is
/// not stored yet. The link is only added if missing, so re-storing the same
/// property is a no-op.
///
/// A property with two or more domains is intersection-typed. No single class
/// owns it, so it is skipped and a warning is logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct RdfsPropertyTrigger;

impl RdfsPropertyTrigger {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Trigger for RdfsPropertyTrigger {
    fn name(&self) -> &str {
        "rdfs-property-domain"
    }

    fn applies_to(&self, thing: &Thing, kinds: &KindTable) -> bool {
        kinds.has_kind(thing, ThingKind::Property)
    }

    fn on_store(
        &self,
        _previous: Option<&Thing>,
        current: &Thing,
        ctx: &mut TriggerContext<'_>,
    ) -> Result<(), GraphError> {
        let vocabulary = ctx.kinds().vocabulary().clone();
        let domains = current.links(&vocabulary.rdfs_domain);

        let class_iri = match domains.as_slice() {
            [] => return Ok(()),
            [single] => *single,
            several => {
                tracing::warn!(
                    "AmbiguousDomain: {} has {} domains ({}), not adding it to any class",
                    current.iri(),
                    several.len(),
                    several.join(", ")
                );
                return Ok(());
            }
        };

        let mut class = match ctx.get(class_iri) {
            Some(existing) => {
                if existing.has_link(&vocabulary.class_properties, current.iri()) {
                    return Ok(());
                }
                existing.to_builder()
            }
            None => ctx.kinds().builder(class_iri, vocabulary.rdfs_class.clone()),
        };

        class.add_link(vocabulary.class_properties.clone(), current.iri());
        ctx.store(class.build()?)
    }
}

// =============================================================================
// TESTS
// =============================================================================
