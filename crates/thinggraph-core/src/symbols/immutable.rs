//! Single-writer symbol table, frozen for concurrent readers.

use super::SymbolTable;
use crate::GraphError;
use crate::primitives::MAX_IMMUTABLE_SYMBOLS;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Accumulates symbols; not safe for concurrent writers.
#[derive(Debug, Clone)]
pub struct SymbolTableBuilder {
    symbols: Vec<Arc<str>>,
    ids: BTreeMap<Arc<str>, u32>,
    limit: u64,
}

impl Default for SymbolTableBuilder {
    fn default() -> Self {
        Self {
            symbols: Vec::new(),
            ids: BTreeMap::new(),
            limit: MAX_IMMUTABLE_SYMBOLS,
        }
    }
}

impl SymbolTableBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn with_limit(limit: u64) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Intern `symbol`, returning its existing id or the next free one.
    ///
    /// Fails with `SymbolCapacityExceeded` once `i32::MAX` symbols are held.
    pub fn put(&mut self, symbol: &str) -> Result<u64, GraphError> {
        if let Some(id) = self.ids.get(symbol) {
            return Ok(u64::from(*id));
        }

        let next = u64::try_from(self.symbols.len()).unwrap_or(u64::MAX);
        if next >= self.limit {
            return Err(GraphError::SymbolCapacityExceeded(self.limit));
        }
        let id =
            u32::try_from(next).map_err(|_| GraphError::SymbolCapacityExceeded(self.limit))?;

        let symbol: Arc<str> = Arc::from(symbol);
        self.symbols.push(Arc::clone(&symbol));
        self.ids.insert(symbol, id);
        Ok(u64::from(id))
    }

    /// The id of `symbol`, if already interned.
    #[must_use]
    pub fn lookup(&self, symbol: &str) -> Option<u64> {
        self.ids.get(symbol).map(|id| u64::from(*id))
    }

    #[must_use]
    pub fn len(&self) -> u64 {
        u64::try_from(self.symbols.len()).unwrap_or(u64::MAX)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Freeze into a read-only table.
    #[must_use]
    pub fn build(self) -> ImmutableSymbolTable {
        ImmutableSymbolTable {
            symbols: self.symbols,
            ids: self.ids,
        }
    }
}

/// Read-only symbol table. `Sync`, so any number of threads may read it.
#[derive(Debug, Clone, Default)]
pub struct ImmutableSymbolTable {
    symbols: Vec<Arc<str>>,
    ids: BTreeMap<Arc<str>, u32>,
}

impl ImmutableSymbolTable {
    /// Build a table from symbols in id order, skipping repeats.
    pub fn from_symbols<I, S>(symbols: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut builder = SymbolTableBuilder::new();
        for symbol in symbols {
            builder.put(symbol.as_ref())?;
        }
        Ok(builder.build())
    }
}

impl SymbolTable for ImmutableSymbolTable {
    fn lookup(&self, symbol: &str) -> Option<u64> {
        self.ids.get(symbol).map(|id| u64::from(*id))
    }

    fn get_symbol(&self, id: u64) -> Result<String, GraphError> {
        usize::try_from(id)
            .ok()
            .and_then(|index| self.symbols.get(index))
            .map(|symbol| symbol.to_string())
            .ok_or(GraphError::UnknownId(id))
    }

    fn len(&self) -> u64 {
        u64::try_from(self.symbols.len()).unwrap_or(u64::MAX)
    }

    fn symbols(&self) -> Vec<String> {
        self.symbols.iter().map(|s| s.to_string()).collect()
    }
}

// =============================================================================
// TESTS
// =============================================================================
