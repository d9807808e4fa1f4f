//! Column selection, by flag or by prompting on a terminal.

use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;

use crate::loader::{load_csv, DataTable, LoadError};

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("no column named or numbered `{0}`")]
    UnknownColumn(String),

    #[error("the same column was chosen twice")]
    SameColumn,

    #[error("the data file has {found} column(s); at least 2 are needed")]
    TooFewColumns { found: usize },

    #[error("input closed before a choice was made")]
    InputClosed,

    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Finds a column by exact header name, falling back to a 1-based index.
pub fn resolve_column(table: &DataTable, key: &str) -> Result<usize, SelectionError> {
    if let Some(index) = table.headers().position(|h| h == key) {
        return Ok(index);
    }
    match key.trim().parse::<usize>() {
        Ok(number) if (1..=table.columns.len()).contains(&number) => Ok(number - 1),
        _ => Err(SelectionError::UnknownColumn(key.to_string())),
    }
}

/// Resolves two distinct columns.
pub fn resolve_pair(table: &DataTable, first: &str, second: &str) -> Result<(usize, usize), SelectionError> {
    ensure_two_columns(table)?;
    let pair = (resolve_column(table, first)?, resolve_column(table, second)?);
    if pair.0 == pair.1 {
        return Err(SelectionError::SameColumn);
    }
    Ok(pair)
}

fn ensure_two_columns(table: &DataTable) -> Result<(), SelectionError> {
    match table.columns.len() {
        found @ (0 | 1) => Err(SelectionError::TooFewColumns { found }),
        _ => Ok(()),
    }
}

/// Writes `1: name` for every column.
pub fn list_columns<W: Write>(out: &mut W, table: &DataTable) -> io::Result<()> {
    for (i, header) in table.headers().enumerate() {
        writeln!(out, "{}: {}", i + 1, header)?;
    }
    Ok(())
}

/// Line-oriented dialogue; invalid answers are reported and asked again.
pub struct ColumnPrompt<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ColumnPrompt<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Asks for a data file until one loads. Content errors end the dialogue.
    pub fn ask_table(&mut self) -> Result<DataTable, SelectionError> {
        loop {
            writeln!(self.output, "Please enter the file path of your data file.")?;
            let answer = self.read_answer()?;
            match load_csv(Path::new(&answer)) {
                Ok(table) => return Ok(table),
                Err(e) if e.is_path_error() => {
                    writeln!(self.output, "{e}. Please try again.")?;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Asks for two different column numbers.
    pub fn select_pair(&mut self, table: &DataTable) -> Result<(usize, usize), SelectionError> {
        ensure_two_columns(table)?;
        writeln!(self.output, "The data file contains these columns:")?;
        list_columns(&mut self.output, table)?;

        let first = self.choose(table, "first", None)?;
        let second = self.choose(table, "second", Some(first))?;
        Ok((first, second))
    }

    fn choose(&mut self, table: &DataTable, ordinal: &str, taken: Option<usize>) -> Result<usize, SelectionError> {
        let count = table.columns.len();
        loop {
            writeln!(self.output, "Enter the number of the {ordinal} column (1-{count}):")?;
            let answer = self.read_answer()?;
            match answer.parse::<usize>() {
                Ok(number) if (1..=count).contains(&number) => {
                    if taken == Some(number - 1) {
                        writeln!(self.output, "That column is already selected. Please choose another.")?;
                    } else {
                        return Ok(number - 1);
                    }
                }
                _ => writeln!(self.output, "Please enter a number between 1 and {count}.")?,
            }
        }
    }

    fn read_answer(&mut self) -> Result<String, SelectionError> {
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(SelectionError::InputClosed);
        }
        Ok(line.trim().to_string())
    }
}
