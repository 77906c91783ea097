//! # Formats
//!
//! On-disk formats. Parsing and printing of RDF syntaxes is left to external
//! loaders; the only format owned by the engine is the symbol table file.

pub mod symbols;

pub use symbols::{load, read_symbols, save, write_symbols};
