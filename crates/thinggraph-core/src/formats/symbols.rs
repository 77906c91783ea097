//! # Symbol Table File Format
//!
//! Newline-delimited UTF-8, one symbol per line. A symbol's id is its
//! 0-based line number.
//!
//! A symbol containing a line terminator cannot be represented: writing such
//! a table fails with `UnrepresentableSymbol` before anything is written.
//! Reading rejects a file that repeats a symbol (`SymbolFormat`), since its
//! ids would no longer be line numbers.

use crate::GraphError;
use crate::symbols::{ImmutableSymbolTable, SymbolTable, SymbolTableBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

fn io_error(context: &str, e: &std::io::Error) -> GraphError {
    GraphError::IoError(format!("{}: {}", context, e))
}

/// Write every symbol of `table`, in id order.
pub fn write_symbols<T, W>(table: &T, writer: W) -> Result<(), GraphError>
where
    T: SymbolTable + ?Sized,
    W: Write,
{
    let symbols = table.symbols();
    if let Some(bad) = symbols.iter().find(|s| s.contains(['\n', '\r'])) {
        return Err(GraphError::UnrepresentableSymbol(bad.clone()));
    }

    let mut writer = BufWriter::new(writer);
    for symbol in &symbols {
        writeln!(writer, "{}", symbol).map_err(|e| io_error("write symbol", &e))?;
    }
    writer.flush().map_err(|e| io_error("flush symbols", &e))
}

/// Read a symbol table written by [`write_symbols`].
pub fn read_symbols<R: BufRead>(reader: R) -> Result<ImmutableSymbolTable, GraphError> {
    let mut builder = SymbolTableBuilder::new();
    for (line_number, line) in reader.lines().enumerate() {
        let symbol = line.map_err(|e| io_error("read symbol", &e))?;
        if builder.lookup(&symbol).is_some() {
            return Err(GraphError::SymbolFormat(format!(
                "line {} repeats symbol {:?}",
                line_number + 1,
                symbol
            )));
        }
        builder.put(&symbol)?;
    }
    Ok(builder.build())
}

/// Write `table` to a file, replacing it.
pub fn save<T>(table: &T, path: impl AsRef<Path>) -> Result<(), GraphError>
where
    T: SymbolTable + ?Sized,
{
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| io_error(&path.display().to_string(), &e))?;
    write_symbols(table, file)
}

/// Read a symbol table file.
pub fn load(path: impl AsRef<Path>) -> Result<ImmutableSymbolTable, GraphError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| io_error(&path.display().to_string(), &e))?;
    read_symbols(BufReader::new(file))
}

// =============================================================================
// TESTS
// =============================================================================
