//! # Symbol Interning
//!
//! Bidirectional string ↔ dense integer mapping, for compact storage of
//! high-cardinality strings such as IRIs and language tags.
//!
//! Ids are zero-based and dense: the `n`th distinct symbol gets id `n - 1`.
//! Entries are never removed.
//!
//! | Implementation | Writers | Readers | Capacity |
//! |---|---|---|---|
//! | [`SymbolTableBuilder`] → [`ImmutableSymbolTable`] | one, then frozen | unlimited | `i32::MAX` |
//! | [`ConcurrentSymbolTable`] | many | many | `u64::MAX` |

mod concurrent;
mod immutable;

pub use concurrent::ConcurrentSymbolTable;
pub use immutable::{ImmutableSymbolTable, SymbolTableBuilder};

use crate::GraphError;

/// Read access shared by every symbol table.
pub trait SymbolTable {
    /// The id of `symbol`, if interned.
    fn lookup(&self, symbol: &str) -> Option<u64>;

    /// The symbol with `id`. Fails with `UnknownId`.
    fn get_symbol(&self, id: u64) -> Result<String, GraphError>;

    /// Number of interned symbols.
    fn len(&self) -> u64;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every symbol, ordered by id.
    fn symbols(&self) -> Vec<String>;

    /// The id of `symbol`. Fails with `UnknownSymbol`.
    fn get_id(&self, symbol: &str) -> Result<u64, GraphError> {
        self.lookup(symbol)
            .ok_or_else(|| GraphError::UnknownSymbol(symbol.to_string()))
    }

    /// Dispatch to `on_known(id)` or `on_unknown(symbol)` with one lookup.
    fn visit<R>(
        &self,
        symbol: &str,
        on_known: impl FnOnce(u64) -> R,
        on_unknown: impl FnOnce(&str) -> R,
    ) -> R
    where
        Self: Sized,
    {
        match self.lookup(symbol) {
            Some(id) => on_known(id),
            None => on_unknown(symbol),
        }
    }
}
