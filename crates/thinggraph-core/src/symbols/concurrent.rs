//! Symbol table safe for many concurrent writers.

use super::{ImmutableSymbolTable, SymbolTable, SymbolTableBuilder};
use crate::GraphError;
use crate::primitives::MAX_CONCURRENT_SYMBOLS;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Symbol table for concurrent `put` and lookups.
///
/// `put` first tries a shared read of the forward map. On a miss it takes the
/// entry lock for that symbol (so two threads interning the same symbol agree
/// on one id), reserves the next id with a compare-and-swap loop on the shared
/// counter, publishes the reverse mapping, and only then the forward one.
///
/// # Visibility
///
/// An id is reserved before its reverse mapping exists. Any id returned by
/// `put` resolves with `get_symbol`, but while other threads are still inside
/// `put`, `len` may count ids whose symbols are not visible yet, and
/// `symbols` stops at the first such gap. Once all writers are done the table
/// is consistent.
#[derive(Debug, Default)]
pub struct ConcurrentSymbolTable {
    ids: DashMap<Arc<str>, u64>,
    symbols: DashMap<u64, Arc<str>>,
    next_id: AtomicU64,
}

impl ConcurrentSymbolTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `symbol`, returning its existing id or the next free one.
    pub fn put(&self, symbol: &str) -> Result<u64, GraphError> {
        let known = self.ids.get(symbol).map(|id| *id);
        if let Some(id) = known {
            return Ok(id);
        }

        match self.ids.entry(Arc::from(symbol)) {
            // another thread won the race for this symbol
            Entry::Occupied(entry) => Ok(*entry.get()),
            Entry::Vacant(entry) => {
                let id = self.reserve_id()?;
                self.symbols.insert(id, Arc::clone(entry.key()));
                entry.insert(id);
                Ok(id)
            }
        }
    }

    fn reserve_id(&self) -> Result<u64, GraphError> {
        let mut current = self.next_id.load(Ordering::Acquire);
        loop {
            if current == MAX_CONCURRENT_SYMBOLS {
                return Err(GraphError::SymbolCapacityExceeded(MAX_CONCURRENT_SYMBOLS));
            }
            match self.next_id.compare_exchange_weak(
                current,
                current + 1,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(reserved) => return Ok(reserved),
                Err(actual) => {
                    current = actual;
                    std::hint::spin_loop();
                }
            }
        }
    }

    /// Snapshot into an immutable table.
    ///
    /// Fails with `SymbolCapacityExceeded` if the table holds more symbols
    /// than an immutable table can.
    pub fn freeze(&self) -> Result<ImmutableSymbolTable, GraphError> {
        let mut builder = SymbolTableBuilder::new();
        for symbol in self.symbols() {
            builder.put(&symbol)?;
        }
        Ok(builder.build())
    }
}

impl SymbolTable for ConcurrentSymbolTable {
    fn lookup(&self, symbol: &str) -> Option<u64> {
        self.ids.get(symbol).map(|id| *id)
    }

    fn get_symbol(&self, id: u64) -> Result<String, GraphError> {
        self.symbols
            .get(&id)
            .map(|symbol| symbol.to_string())
            .ok_or(GraphError::UnknownId(id))
    }

    fn len(&self) -> u64 {
        self.next_id.load(Ordering::Acquire)
    }

    fn symbols(&self) -> Vec<String> {
        (0..self.len())
            .map_while(|id| self.symbols.get(&id).map(|symbol| symbol.to_string()))
            .collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
