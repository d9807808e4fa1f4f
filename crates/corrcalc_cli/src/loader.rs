//! CSV loading.
//!
//! The first record names the columns; every following record must carry one
//! decimal number per column. Anything else is rejected with the line number
//! so the file can be fixed and loaded again.

use corrcalc_core::Number;
use std::fs::File;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("there is no file at {}", .0.display())]
    NotFound(PathBuf),

    #[error("file {} cannot be read: {source}", path.display())]
    Unreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid file type {}; expected a .csv file", .0.display())]
    WrongExtension(PathBuf),

    #[error("file is empty; expected a header line")]
    MissingHeader,

    #[error("header line contains numerical data ({field:?})")]
    NumericHeader { field: String },

    #[error("line {line} has {found} fields but the header has {expected}")]
    FieldCountMismatch {
        line: u64,
        expected: usize,
        found: usize,
    },

    #[error("line {line}, column `{column}`: cannot parse {value:?} as a number ({reason})")]
    NonNumericDatum {
        line: u64,
        column: String,
        value: String,
        reason: String,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl LoadError {
    /// Path problems can be fixed by choosing another file; content problems
    /// need the file itself corrected.
    pub fn is_path_error(&self) -> bool {
        matches!(
            self,
            LoadError::NotFound(_) | LoadError::Unreadable { .. } | LoadError::WrongExtension(_)
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataColumn {
    pub header: String,
    pub data: Vec<Number>,
}

impl DataColumn {
    fn new(header: &str) -> Self {
        Self {
            header: header.to_string(),
            data: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    pub columns: Vec<DataColumn>,
}

impl DataTable {
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.header.as_str())
    }

    pub fn rows(&self) -> usize {
        self.columns.first().map_or(0, |c| c.data.len())
    }
}

/// Validates `path` and loads it as a table.
pub fn load_csv(path: &Path) -> Result<DataTable, LoadError> {
    if !path.is_file() {
        return Err(LoadError::NotFound(path.to_path_buf()));
    }
    if path.extension().and_then(|e| e.to_str()) != Some("csv") {
        return Err(LoadError::WrongExtension(path.to_path_buf()));
    }

    let file = File::open(path).map_err(|source| LoadError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_table(file)?;
    debug!(
        path = %path.display(),
        columns = table.columns.len(),
        rows = table.rows(),
        "Loaded CSV"
    );
    Ok(table)
}

/// Parses CSV text from any reader.
pub fn parse_table<R: Read>(reader: R) -> Result<DataTable, LoadError> {
    let mut csv = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = csv.records();

    let header = records.next().ok_or(LoadError::MissingHeader)??;
    let mut columns = Vec::with_capacity(header.len());
    for field in header.iter() {
        if field.parse::<f64>().is_ok_and(f64::is_finite) {
            return Err(LoadError::NumericHeader {
                field: field.to_string(),
            });
        }
        columns.push(DataColumn::new(field));
    }

    for record in records {
        let record = record?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != columns.len() {
            return Err(LoadError::FieldCountMismatch {
                line,
                expected: columns.len(),
                found: record.len(),
            });
        }
        for (column, field) in columns.iter_mut().zip(record.iter()) {
            let datum = field
                .parse::<Number>()
                .map_err(|e| LoadError::NonNumericDatum {
                    line,
                    column: column.header.clone(),
                    value: field.to_string(),
                    reason: e.to_string(),
                })?;
            column.data.push(datum);
        }
    }

    Ok(DataTable { columns })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<DataTable, LoadError> {
        parse_table(text.as_bytes())
    }

    fn fixture(name: &str) -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("testdata").join(name)
    }

    #[test]
    fn test_parse_columns() {
        let table = parse("height, weight\n1.5, 60\n1.75,72.5\n").unwrap();
        assert_eq!(table.headers().collect::<Vec<_>>(), vec!["height", "weight"]);
        assert_eq!(table.rows(), 2);
        assert_eq!(table.columns[0].data, vec![Number::from_num(1.5), Number::from_num(1.75)]);
        assert_eq!(table.columns[1].data, vec![Number::from_num(60), Number::from_num(72.5)]);
    }

    #[test]
    fn test_negative_values() {
        let table = parse("a,b\n-3.25,0\n").unwrap();
        assert_eq!(table.columns[0].data, vec![Number::from_num(-3.25)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(matches!(parse(""), Err(LoadError::MissingHeader)));
    }

    #[test]
    fn test_numeric_header_rejected() {
        let err = parse("a,42\n1,2\n").unwrap_err();
        assert!(matches!(err, LoadError::NumericHeader { ref field } if field == "42"));
    }

    #[test]
    fn test_header_named_nan_is_allowed() {
        assert!(parse("NaN,b\n1,2\n").is_ok());
    }

    #[test]
    fn test_field_count_mismatch() {
        let err = parse("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(
            err,
            LoadError::FieldCountMismatch {
                line: 3,
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn test_non_numeric_datum() {
        let err = parse("a,b\n1,2\n3,abc\n").unwrap_err();
        match err {
            LoadError::NonNumericDatum {
                line,
                column,
                value,
                ..
            } => {
                assert_eq!(line, 3);
                assert_eq!(column, "b");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_load_fixture() {
        let table = load_csv(&fixture("study_hours.csv")).unwrap();
        assert_eq!(
            table.headers().collect::<Vec<_>>(),
            vec!["hours_studied", "exam_score", "sleep_hours"]
        );
        assert_eq!(table.rows(), 12);
    }

    #[test]
    fn test_missing_file() {
        let err = load_csv(&fixture("does_not_exist.csv")).unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
        assert!(err.is_path_error());
    }

    #[test]
    fn test_wrong_extension() {
        let manifest = Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml");
        let err = load_csv(&manifest).unwrap_err();
        assert!(matches!(err, LoadError::WrongExtension(_)));
        assert!(err.is_path_error());
    }

    #[test]
    fn test_content_errors_are_not_path_errors() {
        assert!(!LoadError::MissingHeader.is_path_error());
    }
}
