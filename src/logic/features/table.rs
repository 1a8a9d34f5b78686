//! Record Table - Uploaded CSV data
//!
//! Parses the raw request buffer into an ordered table of cells.
//! Cells keep the shape they had in the upload (integer, float or text)
//! so the response can echo the original values back.

use std::collections::HashSet;

use serde::{Serialize, Serializer};

use crate::error::{ScoringError, ScoringResult};

// ============================================================================
// CELL
// ============================================================================

/// One parsed CSV value
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Int(i64),
    Float(f64),
    Text(String),
}

impl Cell {
    /// Parse a raw field. Integers win over floats so "3" stays 3.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Cell::Int(i);
        }
        if let Ok(f) = trimmed.parse::<f64>() {
            return Cell::Float(f);
        }
        Cell::Text(trimmed.to_string())
    }

    /// Numeric value, if the cell holds a finite number
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Cell::Int(i) => Some(*i as f64),
            Cell::Float(f) if f.is_finite() => Some(*f),
            _ => None,
        }
    }

    /// Integer value, accepting floats with no fractional part (e.g. "1.0")
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Cell::Int(i) => Some(*i),
            Cell::Float(f) if f.is_finite() && f.fract() == 0.0 => Some(*f as i64),
            _ => None,
        }
    }

    pub fn to_field(&self) -> String {
        match self {
            Cell::Int(i) => i.to_string(),
            Cell::Float(f) => f.to_string(),
            Cell::Text(s) => s.clone(),
        }
    }
}

impl Serialize for Cell {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Cell::Int(i) => serializer.serialize_i64(*i),
            Cell::Float(f) => serializer.serialize_f64(*f),
            Cell::Text(s) => serializer.serialize_str(s),
        }
    }
}

impl std::fmt::Display for Cell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_field())
    }
}

// ============================================================================
// RECORD TABLE
// ============================================================================

/// Ordered rows under a header
#[derive(Debug, Clone, PartialEq)]
pub struct RecordTable {
    columns: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

impl RecordTable {
    /// Build a table from already-parsed rows
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Cell>>) -> ScoringResult<Self> {
        check_unique(&columns)?;
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(ScoringError::invalid_table(format!(
                    "row {} has {} fields, header has {}",
                    i + 1,
                    row.len(),
                    columns.len()
                )));
            }
        }
        Ok(Self { columns, rows })
    }

    /// Parse a comma-separated buffer with a header row
    pub fn from_csv_bytes(content: &[u8]) -> ScoringResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(content);

        let columns: Vec<String> = reader.headers()?.iter().map(String::from).collect();
        if columns.is_empty() || columns.iter().all(|c| c.is_empty()) {
            return Err(ScoringError::invalid_table("missing header row"));
        }

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(Cell::parse).collect());
        }

        log::debug!("Parsed table: {} columns, {} rows", columns.len(), rows.len());
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }
}

fn check_unique(columns: &[String]) -> ScoringResult<()> {
    let mut seen = HashSet::new();
    for name in columns {
        if !seen.insert(name.as_str()) {
            return Err(ScoringError::invalid_table(format!("duplicate column: {}", name)));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_parse() {
        assert_eq!(Cell::parse("3"), Cell::Int(3));
        assert_eq!(Cell::parse("-0.5"), Cell::Float(-0.5));
        assert_eq!(Cell::parse(" 7 "), Cell::Int(7));
        assert_eq!(Cell::parse("tcp"), Cell::Text("tcp".to_string()));
        assert_eq!(Cell::parse(""), Cell::Text(String::new()));
    }

    #[test]
    fn test_cell_numeric_views() {
        assert_eq!(Cell::Int(2).as_f64(), Some(2.0));
        assert_eq!(Cell::Float(f64::NAN).as_f64(), None);
        assert_eq!(Cell::Text("x".into()).as_f64(), None);
        assert_eq!(Cell::Float(1.0).as_integer(), Some(1));
        assert_eq!(Cell::Float(0.5).as_integer(), None);
    }

    #[test]
    fn test_cell_serialize() {
        let cells = vec![Cell::Int(1), Cell::Float(0.25), Cell::Text("a".into())];
        assert_eq!(serde_json::to_string(&cells).unwrap(), r#"[1,0.25,"a"]"#);
    }

    #[test]
    fn test_from_csv_bytes() {
        let table = RecordTable::from_csv_bytes(b"dur,sbytes,label\n0.1,200,0\n2.5,10,1\n").unwrap();
        assert_eq!(table.columns(), &["dur", "sbytes", "label"]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[1][0], Cell::Float(2.5));
        assert_eq!(table.rows()[1][2], Cell::Int(1));
        assert!(table.has_column("label"));
        assert_eq!(table.column_index("sbytes"), Some(1));
    }

    #[test]
    fn test_header_only_is_empty() {
        let table = RecordTable::from_csv_bytes(b"a,b\n").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_ragged_rows_rejected() {
        let result = RecordTable::from_csv_bytes(b"a,b\n1,2\n3\n");
        assert!(matches!(result, Err(ScoringError::InvalidTable(_))));
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let result = RecordTable::from_csv_bytes(b"a,a\n1,2\n");
        assert!(matches!(result, Err(ScoringError::InvalidTable(_))));
    }

    #[test]
    fn test_empty_buffer_rejected() {
        assert!(RecordTable::from_csv_bytes(b"").is_err());
    }
}
