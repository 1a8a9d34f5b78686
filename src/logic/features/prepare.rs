//! Feature Preparer
//!
//! Splits an uploaded table into the feature matrix a scaler expects
//! and, when present, the ground-truth label vector.

use ndarray::Array2;

use super::layout::FeatureSchema;
use super::table::{Cell, RecordTable};
use crate::constants::LABEL_COLUMN;
use crate::error::{ScoringError, ScoringResult};

/// Feature matrix plus optional labels, row-aligned with the source table
#[derive(Debug, Clone)]
pub struct PreparedFeatures {
    /// Shape `(rows, schema.len())`
    pub matrix: Array2<f64>,
    /// Ground truth (0 = normal, 1 = anomaly)
    pub labels: Option<Vec<u8>>,
}

impl PreparedFeatures {
    pub fn has_label(&self) -> bool {
        self.labels.is_some()
    }

    pub fn n_rows(&self) -> usize {
        self.matrix.nrows()
    }
}

/// Drop the label column, check the remaining columns against `schema`
/// and collect the numeric matrix.
pub fn prepare_features(table: &RecordTable, schema: &FeatureSchema) -> ScoringResult<PreparedFeatures> {
    if table.is_empty() {
        return Err(ScoringError::invalid_table("table has no records"));
    }

    let label_idx = table.column_index(LABEL_COLUMN);

    let feature_idx: Vec<usize> = (0..table.columns().len())
        .filter(|i| Some(*i) != label_idx)
        .collect();
    let feature_names: Vec<String> = feature_idx
        .iter()
        .map(|&i| table.columns()[i].clone())
        .collect();

    schema.validate(&feature_names)?;

    let mut data = Vec::with_capacity(table.len() * feature_idx.len());
    for (r, row) in table.rows().iter().enumerate() {
        for &c in &feature_idx {
            let value = row[c].as_f64().ok_or_else(|| {
                ScoringError::invalid_table(format!(
                    "non-numeric value {:?} in column {} at row {}",
                    row[c].to_field(),
                    table.columns()[c],
                    r + 1
                ))
            })?;
            data.push(value);
        }
    }

    let matrix = Array2::from_shape_vec((table.len(), feature_idx.len()), data)
        .map_err(|e| ScoringError::invalid_table(format!("matrix shape error: {}", e)))?;

    let labels = match label_idx {
        Some(idx) => Some(extract_labels(table, idx)?),
        None => None,
    };

    Ok(PreparedFeatures { matrix, labels })
}

/// Read the label column as 0/1
fn extract_labels(table: &RecordTable, idx: usize) -> ScoringResult<Vec<u8>> {
    table
        .rows()
        .iter()
        .enumerate()
        .map(|(r, row)| parse_label(&row[idx]).ok_or_else(|| ScoringError::MalformedLabel {
            row: r + 1,
            value: row[idx].to_field(),
        }))
        .collect()
}

fn parse_label(cell: &Cell) -> Option<u8> {
    match cell.as_integer()? {
        0 => Some(0),
        1 => Some(1),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> FeatureSchema {
        FeatureSchema::new(["dur", "sbytes"])
    }

    #[test]
    fn test_strips_label() {
        let table = RecordTable::from_csv_bytes(b"dur,sbytes,label\n0.5,10,0\n1.5,20,1\n").unwrap();
        let prepared = prepare_features(&table, &schema()).unwrap();

        assert!(prepared.has_label());
        assert_eq!(prepared.labels, Some(vec![0, 1]));
        assert_eq!(prepared.matrix.shape(), &[2, 2]);
        assert_eq!(prepared.matrix[[1, 0]], 1.5);
        assert_eq!(prepared.matrix[[1, 1]], 20.0);
    }

    #[test]
    fn test_label_in_any_position() {
        let table = RecordTable::from_csv_bytes(b"label,dur,sbytes\n1,0.5,10\n").unwrap();
        let prepared = prepare_features(&table, &schema()).unwrap();
        assert_eq!(prepared.labels, Some(vec![1]));
        assert_eq!(prepared.matrix[[0, 0]], 0.5);
    }

    #[test]
    fn test_unlabeled_table() {
        let table = RecordTable::from_csv_bytes(b"dur,sbytes\n0.5,10\n").unwrap();
        let prepared = prepare_features(&table, &schema()).unwrap();
        assert!(!prepared.has_label());
        assert_eq!(prepared.n_rows(), 1);
    }

    #[test]
    fn test_float_labels_coerced() {
        let table = RecordTable::from_csv_bytes(b"dur,sbytes,label\n0.5,10,1.0\n").unwrap();
        let prepared = prepare_features(&table, &schema()).unwrap();
        assert_eq!(prepared.labels, Some(vec![1]));
    }

    #[test]
    fn test_out_of_range_label() {
        let table = RecordTable::from_csv_bytes(b"dur,sbytes,label\n0.5,10,0\n0.5,10,2\n").unwrap();
        match prepare_features(&table, &schema()) {
            Err(ScoringError::MalformedLabel { row, value }) => {
                assert_eq!(row, 2);
                assert_eq!(value, "2");
            }
            other => panic!("Expected MalformedLabel, got {:?}", other),
        }
    }

    #[test]
    fn test_text_label() {
        let table = RecordTable::from_csv_bytes(b"dur,sbytes,label\n0.5,10,attack\n").unwrap();
        assert!(matches!(
            prepare_features(&table, &schema()),
            Err(ScoringError::MalformedLabel { .. })
        ));
    }

    #[test]
    fn test_column_order_mismatch() {
        let table = RecordTable::from_csv_bytes(b"sbytes,dur\n10,0.5\n").unwrap();
        assert!(matches!(
            prepare_features(&table, &schema()),
            Err(ScoringError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_non_numeric_feature() {
        let table = RecordTable::from_csv_bytes(b"dur,sbytes\n0.5,\n").unwrap();
        assert!(matches!(
            prepare_features(&table, &schema()),
            Err(ScoringError::InvalidTable(_))
        ));
    }

    #[test]
    fn test_empty_table() {
        let table = RecordTable::from_csv_bytes(b"dur,sbytes\n").unwrap();
        assert!(matches!(
            prepare_features(&table, &schema()),
            Err(ScoringError::InvalidTable(_))
        ));
    }
}
