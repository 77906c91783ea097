//! # Thing Repository
//!
//! IRI-keyed storage for things, with reactive triggers.
//!
//! This module defines the `ThingRepository` (read) and `ThingStore` (write)
//! traits, the `Trigger` extension point, and `MemoryRepository`, the
//! in-memory implementation.
//!
//! ## Store protocol
//!
//! `store(thing)` validates the thing against the shapes of its kinds, then
//! replaces whatever was stored under its IRI. Every registered trigger that
//! applies to the thing then runs, in registration order, before `store`
//! returns.
//!
//! Triggers never call `store` re-entrantly. They write through a
//! [`TriggerContext`], which validates and inserts immediately (so later reads,
//! including the trigger's own, see the new version) and queues the secondary
//! update. The outer `store` drains that queue, running the triggers for each
//! secondary update in turn. A thing whose own relation points at itself is
//! therefore just one more queued update, never a nested map mutation.
//!
//! Triggers must check before they add: a trigger that stores on every
//! invocation never lets the queue drain, and is cut off after
//! `MAX_TRIGGER_CASCADE` secondary stores.

use crate::kinds::KindTable;
use crate::primitives::MAX_TRIGGER_CASCADE;
use crate::{GraphError, Thing};
use indexmap::IndexMap;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

// =============================================================================
// TRAITS
// =============================================================================

/// Read access to things by IRI.
pub trait ThingRepository {
    /// All stored IRIs, in insertion order.
    fn list_iri(&self) -> Vec<String>;

    /// The thing stored under `iri`. Absence is not an error.
    fn get(&self, iri: &str) -> Option<Arc<Thing>>;

    /// Every thing, in `list_iri` order.
    fn list(&self) -> Vec<Arc<Thing>> {
        self.list_iri()
            .iter()
            .filter_map(|iri| self.get(iri))
            .collect()
    }
}

/// Write access. `&mut self` makes every store single-writer.
pub trait ThingStore: ThingRepository {
    /// Insert or replace the thing under its IRI, then run the triggers.
    fn store(&mut self, thing: Thing) -> Result<(), GraphError>;
}

impl<R: ThingRepository + ?Sized> ThingRepository for &R {
    fn list_iri(&self) -> Vec<String> {
        (**self).list_iri()
    }

    fn get(&self, iri: &str) -> Option<Arc<Thing>> {
        (**self).get(iri)
    }
}

// =============================================================================
// TRIGGERS
// =============================================================================

/// A reactive function run on every matching store.
pub trait Trigger: Send + Sync {
    /// Name used in diagnostics.
    fn name(&self) -> &str;

    /// Whether this trigger reacts to `thing`.
    fn applies_to(&self, thing: &Thing, kinds: &KindTable) -> bool;

    /// React to `current` having replaced `previous` (absent on first store).
    fn on_store(
        &self,
        previous: Option<&Thing>,
        current: &Thing,
        ctx: &mut TriggerContext<'_>,
    ) -> Result<(), GraphError>;
}

/// One applied store, waiting for its triggers to run.
#[derive(Debug)]
struct Update {
    previous: Option<Arc<Thing>>,
    current: Arc<Thing>,
}

/// The repository view handed to a running trigger.
pub struct TriggerContext<'a> {
    things: &'a mut IndexMap<String, Arc<Thing>>,
    kinds: &'a KindTable,
    pending: &'a mut VecDeque<Update>,
    secondary_stores: &'a mut usize,
}

impl TriggerContext<'_> {
    /// The current version of the thing under `iri`.
    #[must_use]
    pub fn get(&self, iri: &str) -> Option<Arc<Thing>> {
        self.things.get(iri).cloned()
    }

    #[must_use]
    pub fn kinds(&self) -> &KindTable {
        self.kinds
    }

    /// Store a derived thing.
    ///
    /// The thing is validated and visible to `get` immediately; its own
    /// triggers run after the current trigger returns.
    pub fn store(&mut self, thing: Thing) -> Result<(), GraphError> {
        if *self.secondary_stores >= MAX_TRIGGER_CASCADE {
            return Err(GraphError::TriggerCascadeExceeded(MAX_TRIGGER_CASCADE));
        }
        self.kinds.validate(&thing)?;

        let current = Arc::new(thing);
        let previous = self
            .things
            .insert(current.iri().to_string(), Arc::clone(&current));
        tracing::debug!("secondary store of {}", current.iri());

        *self.secondary_stores += 1;
        self.pending.push_back(Update { previous, current });
        Ok(())
    }
}

// =============================================================================
// MEMORY REPOSITORY
// =============================================================================

/// In-memory repository.
///
/// Safe for concurrent readers (`&self` is `Sync`); writers need `&mut self`,
/// so concurrent stores must be serialized by the caller (e.g. a `RwLock`).
#[derive(Default)]
pub struct MemoryRepository {
    things: IndexMap<String, Arc<Thing>>,
    triggers: Vec<Box<dyn Trigger>>,
    kinds: KindTable,
}

impl MemoryRepository {
    /// An empty repository with the default kind table and no triggers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty repository using `kinds` for trigger matching and validation.
    #[must_use]
    pub fn with_kinds(kinds: KindTable) -> Self {
        Self {
            kinds,
            ..Self::default()
        }
    }

    /// Register a trigger. Triggers run in registration order.
    #[must_use]
    pub fn with_trigger(mut self, trigger: impl Trigger + 'static) -> Self {
        self.triggers.push(Box::new(trigger));
        self
    }

    #[must_use]
    pub fn kinds(&self) -> &KindTable {
        &self.kinds
    }

    /// Registered trigger names, in registration order.
    #[must_use]
    pub fn trigger_names(&self) -> Vec<&str> {
        self.triggers.iter().map(|t| t.name()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.things.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.things.is_empty()
    }
}

impl fmt::Debug for MemoryRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryRepository")
            .field("things", &self.things.len())
            .field("triggers", &self.trigger_names())
            .finish()
    }
}

impl ThingRepository for MemoryRepository {
    fn list_iri(&self) -> Vec<String> {
        self.things.keys().cloned().collect()
    }

    fn get(&self, iri: &str) -> Option<Arc<Thing>> {
        self.things.get(iri).cloned()
    }
}

impl ThingStore for MemoryRepository {
    fn store(&mut self, thing: Thing) -> Result<(), GraphError> {
        // rejected before anything is written
        self.kinds.validate(&thing)?;

        let current = Arc::new(thing);
        let previous = self
            .things
            .insert(current.iri().to_string(), Arc::clone(&current));
        tracing::debug!(
            "stored {} ({})",
            current.iri(),
            if previous.is_some() { "replaced" } else { "new" }
        );

        let mut pending = VecDeque::new();
        pending.push_back(Update { previous, current });
        let mut secondary_stores = 0usize;

        while let Some(update) = pending.pop_front() {
            for trigger in &self.triggers {
                if !trigger.applies_to(&update.current, &self.kinds) {
                    continue;
                }
                tracing::debug!("trigger {} on {}", trigger.name(), update.current.iri());

                let mut ctx = TriggerContext {
                    things: &mut self.things,
                    kinds: &self.kinds,
                    pending: &mut pending,
                    secondary_stores: &mut secondary_stores,
                };
                trigger.on_store(update.previous.as_deref(), &update.current, &mut ctx)?;
            }
        }
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;
    use crate::primitives::{RDF_PROPERTY, RDFS_DOMAIN};
    use std::sync::Mutex;

    const P: &str = "https://example.org/p";

    fn thing(iri: &str, text: &str) -> Thing {
        Thing::builder(iri)
            .with(P, Value::string(text))
            .build()
            .expect("build")
    }

    /// Records every invocation.
    struct Recorder {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Trigger for Recorder {
        fn name(&self) -> &str {
            self.name
        }

        fn applies_to(&self, _thing: &Thing, _kinds: &KindTable) -> bool {
            true
        }

        fn on_store(
            &self,
            previous: Option<&Thing>,
            current: &Thing,
            _ctx: &mut TriggerContext<'_>,
        ) -> Result<(), GraphError> {
            let entry = format!(
                "{}:{}:{}",
                self.name,
                current.iri(),
                previous.is_some()
            );
            self.log.lock().expect("lock").push(entry);
            Ok(())
        }
    }

    /// Stores a fresh version of the thing every time: never converges.
    struct Echo;

    impl Trigger for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn applies_to(&self, _thing: &Thing, _kinds: &KindTable) -> bool {
            true
        }

        fn on_store(
            &self,
            _previous: Option<&Thing>,
            current: &Thing,
            ctx: &mut TriggerContext<'_>,
        ) -> Result<(), GraphError> {
            ctx.store(current.clone())
        }
    }

    #[test]
    fn get_absent_is_none() {
        let repo = MemoryRepository::new();
        assert!(repo.get("https://example.org/missing").is_none());
        assert!(repo.is_empty());
    }

    #[test]
    fn store_replaces_and_keeps_insertion_order() {
        let mut repo = MemoryRepository::new();
        repo.store(thing("https://example.org/a", "1")).expect("store");
        repo.store(thing("https://example.org/b", "2")).expect("store");
        repo.store(thing("https://example.org/a", "3")).expect("store");

        assert_eq!(
            repo.list_iri(),
            vec!["https://example.org/a", "https://example.org/b"]
        );
        let a = repo.get("https://example.org/a").expect("a");
        assert_eq!(a.get(P), Some(&Value::string("3")));
        assert_eq!(repo.list().len(), 2);
    }

    #[test]
    fn triggers_run_in_registration_order_with_previous() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut repo = MemoryRepository::new()
            .with_trigger(Recorder {
                name: "first",
                log: Arc::clone(&log),
            })
            .with_trigger(Recorder {
                name: "second",
                log: Arc::clone(&log),
            });
        assert_eq!(repo.trigger_names(), vec!["first", "second"]);

        repo.store(thing("https://example.org/a", "1")).expect("store");
        repo.store(thing("https://example.org/a", "2")).expect("store");

        let log = log.lock().expect("lock");
        assert_eq!(
            *log,
            vec![
                "first:https://example.org/a:false",
                "second:https://example.org/a:false",
                "first:https://example.org/a:true",
                "second:https://example.org/a:true",
            ]
        );
    }

    #[test]
    fn invalid_shape_is_rejected_atomically() {
        let mut repo = MemoryRepository::new();
        let kinds = KindTable::default();
        let bad = kinds
            .builder("https://example.org/p", RDF_PROPERTY)
            .with(RDFS_DOMAIN, Value::string("not a link"))
            .build()
            .expect("build");

        assert!(matches!(
            repo.store(bad),
            Err(GraphError::ShapeValidationFailure { .. })
        ));
        assert!(repo.get("https://example.org/p").is_none());
    }

    #[test]
    fn runaway_trigger_is_bounded() {
        let mut repo = MemoryRepository::new().with_trigger(Echo);
        let result = repo.store(thing("https://example.org/a", "1"));
        assert!(matches!(
            result,
            Err(GraphError::TriggerCascadeExceeded(MAX_TRIGGER_CASCADE))
        ));
        // the base insert stays applied
        assert!(repo.get("https://example.org/a").is_some());
    }

    #[test]
    fn repository_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryRepository>();
        assert_send_sync::<Arc<Thing>>();
    }
}
