#![forbid(unsafe_code)]

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ta_index::{Index, IndexError, IndexLabel};
use ta_types::{DType, Scalar, TypeError, infer_dtype};
use thiserror::Error;

pub mod testing;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FrameError {
    #[error("index length ({index_len}) does not match column length ({column_len})")]
    LengthMismatch { index_len: usize, column_len: usize },
    #[error("column '{name}' not found")]
    ColumnNotFound { name: String },
    #[error("new index has {new_len} labels but frame has {rows} rows")]
    IndexLengthMismatch { new_len: usize, rows: usize },
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// Dtype-tagged value buffer. Every value is validated against the column
/// dtype at construction; missing values are admitted under any dtype.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    dtype: DType,
    values: Vec<Scalar>,
}

impl Column {
    pub fn new(dtype: DType, values: Vec<Scalar>) -> Result<Self, TypeError> {
        for value in &values {
            if !value.is_missing() && value.dtype() != dtype {
                return Err(TypeError::DtypeMismatch {
                    value: value.to_string(),
                    expected: dtype,
                    actual: value.dtype(),
                });
            }
        }
        Ok(Self { dtype, values })
    }

    /// Column with dtype inferred from the values.
    pub fn from_values(values: Vec<Scalar>) -> Result<Self, TypeError> {
        let dtype = infer_dtype(&values)?;
        Column::new(dtype, values)
    }

    #[must_use]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[must_use]
    pub fn values(&self) -> &[Scalar] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    #[must_use]
    pub fn semantic_eq(&self, other: &Self) -> bool {
        self.values.len() == other.values.len()
            && self
                .values
                .iter()
                .zip(other.values.iter())
                .all(|(a, b)| a.semantic_eq(b))
    }
}

/// Named column with a row index. Index and column lengths must agree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    name: String,
    index: Index,
    column: Column,
}

impl Series {
    pub fn new(name: impl Into<String>, index: Index, column: Column) -> Result<Self, FrameError> {
        if index.len() != column.len() {
            return Err(FrameError::LengthMismatch {
                index_len: index.len(),
                column_len: column.len(),
            });
        }
        Ok(Self {
            name: name.into(),
            index,
            column,
        })
    }

    pub fn from_values(
        name: impl Into<String>,
        labels: Vec<IndexLabel>,
        values: Vec<Scalar>,
    ) -> Result<Self, FrameError> {
        let column = Column::from_values(values)?;
        Self::new(name, Index::new(labels), column)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }

    #[must_use]
    pub fn column(&self) -> &Column {
        &self.column
    }

    #[must_use]
    pub fn values(&self) -> &[Scalar] {
        self.column.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.column.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.column.is_empty()
    }
}

/// Row index plus equal-length named columns. Column order is tracked
/// separately from the name-keyed storage so comparisons can be
/// order-sensitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    index: Index,
    columns: BTreeMap<String, Column>,
    column_order: Vec<String>,
}

impl DataFrame {
    fn validate_column_lengths(
        index: &Index,
        columns: &BTreeMap<String, Column>,
    ) -> Result<(), FrameError> {
        for column in columns.values() {
            if column.len() != index.len() {
                return Err(FrameError::LengthMismatch {
                    index_len: index.len(),
                    column_len: column.len(),
                });
            }
        }
        Ok(())
    }

    pub fn new(index: Index, columns: BTreeMap<String, Column>) -> Result<Self, FrameError> {
        Self::validate_column_lengths(&index, &columns)?;
        let column_order = columns.keys().cloned().collect();
        Ok(Self {
            index,
            columns,
            column_order,
        })
    }

    pub fn new_with_column_order(
        index: Index,
        columns: BTreeMap<String, Column>,
        column_order: Vec<String>,
    ) -> Result<Self, FrameError> {
        Self::validate_column_lengths(&index, &columns)?;
        for name in &column_order {
            if !columns.contains_key(name) {
                return Err(FrameError::ColumnNotFound { name: name.clone() });
            }
        }
        Ok(Self {
            index,
            columns,
            column_order,
        })
    }

    /// Build from (name, values) pairs with a default 0..n index. Column
    /// order follows the pair order.
    pub fn from_pairs(pairs: Vec<(String, Vec<Scalar>)>) -> Result<Self, FrameError> {
        let rows = pairs.first().map_or(0, |(_, values)| values.len());
        Self::from_pairs_with_index(pairs, Index::default_range(rows))
    }

    pub fn from_pairs_with_index(
        pairs: Vec<(String, Vec<Scalar>)>,
        index: Index,
    ) -> Result<Self, FrameError> {
        let mut columns = BTreeMap::new();
        let mut column_order = Vec::with_capacity(pairs.len());
        for (name, values) in pairs {
            let column = Column::from_values(values)?;
            column_order.push(name.clone());
            columns.insert(name, column);
        }
        Self::new_with_column_order(index, columns, column_order)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// (rows, columns).
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.index.len(), self.column_order.len())
    }

    #[must_use]
    pub fn index(&self) -> &Index {
        &self.index
    }

    #[must_use]
    pub fn columns(&self) -> &BTreeMap<String, Column> {
        &self.columns
    }

    #[must_use]
    pub fn column_order(&self) -> &[String] {
        &self.column_order
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Rows selected by label, every occurrence of each requested label, as
    /// an independent copy. Column structure is preserved.
    pub fn loc(&self, labels: &[IndexLabel]) -> Result<Self, FrameError> {
        let mut positions = Vec::new();
        for requested in labels {
            let mut found = false;
            for (position, actual) in self.index.labels().iter().enumerate() {
                if actual == requested {
                    positions.push(position);
                    found = true;
                }
            }
            if !found {
                return Err(FrameError::Index(IndexError::LabelNotFound {
                    label: requested.clone(),
                }));
            }
        }
        self.take_rows_by_positions(&positions)
    }

    fn take_rows_by_positions(&self, positions: &[usize]) -> Result<Self, FrameError> {
        let labels = positions
            .iter()
            .map(|&position| self.index.labels()[position].clone())
            .collect::<Vec<_>>();
        let mut columns = BTreeMap::new();
        for name in &self.column_order {
            let column = self
                .columns
                .get(name)
                .expect("column name listed in order must exist");
            let values = positions
                .iter()
                .map(|&position| column.values()[position].clone())
                .collect::<Vec<_>>();
            columns.insert(name.clone(), Column::new(column.dtype(), values)?);
        }
        Self::new_with_column_order(Index::new(labels), columns, self.column_order.clone())
    }

    /// Copy of the frame with the row labels replaced. Cell values and column
    /// structure are untouched; the label count must match the row count.
    pub fn with_index(&self, labels: Vec<IndexLabel>) -> Result<Self, FrameError> {
        if labels.len() != self.len() {
            return Err(FrameError::IndexLengthMismatch {
                new_len: labels.len(),
                rows: self.len(),
            });
        }
        Ok(Self {
            index: Index::new(labels),
            columns: self.columns.clone(),
            column_order: self.column_order.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Column, DataFrame, FrameError, Series};
    use ta_index::{Index, IndexLabel};
    use ta_types::{DType, Scalar, TypeError};

    fn small_frame() -> DataFrame {
        DataFrame::from_pairs(vec![
            (
                "a".to_owned(),
                vec![Scalar::Int64(1), Scalar::Int64(2), Scalar::Int64(3)],
            ),
            (
                "b".to_owned(),
                vec![Scalar::from("x"), Scalar::from("y"), Scalar::from("z")],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn column_rejects_value_of_wrong_dtype() {
        let err = Column::new(DType::Int64, vec![Scalar::Int64(1), Scalar::from("x")]).unwrap_err();
        assert!(matches!(err, TypeError::DtypeMismatch { .. }));
    }

    #[test]
    fn column_admits_missing_under_any_dtype() {
        let column = Column::new(
            DType::Int64,
            vec![Scalar::Int64(1), Scalar::Null(ta_types::NullKind::Null)],
        )
        .unwrap();
        assert_eq!(column.len(), 2);
    }

    #[test]
    fn series_length_invariant_enforced() {
        let index = Index::default_range(2);
        let column = Column::from_values(vec![Scalar::Int64(1)]).unwrap();
        let err = Series::new("s", index, column).unwrap_err();
        assert!(matches!(err, FrameError::LengthMismatch { .. }));
    }

    #[test]
    fn from_pairs_preserves_column_order() {
        let frame = DataFrame::from_pairs(vec![
            ("z".to_owned(), vec![Scalar::Int64(1)]),
            ("a".to_owned(), vec![Scalar::Int64(2)]),
        ])
        .unwrap();
        assert_eq!(frame.column_order(), &["z".to_owned(), "a".to_owned()]);
    }

    #[test]
    fn loc_copies_requested_rows() {
        let frame = small_frame();
        let row = frame.loc(&[IndexLabel::Int64(1)]).unwrap();
        assert_eq!(row.shape(), (1, 2));
        assert_eq!(row.index().labels(), &[IndexLabel::Int64(1)]);
        assert_eq!(row.column("a").unwrap().values(), &[Scalar::Int64(2)]);
        // original untouched
        assert_eq!(frame.shape(), (3, 2));
    }

    #[test]
    fn loc_reports_unknown_label() {
        let frame = small_frame();
        let err = frame.loc(&[IndexLabel::Int64(99)]).unwrap_err();
        assert!(matches!(err, FrameError::Index(_)));
    }

    #[test]
    fn with_index_replaces_labels_only() {
        let frame = small_frame();
        let relabeled = frame.with_index(vec![10.into(), 20.into(), 30.into()]).unwrap();
        assert_eq!(relabeled.index().labels(), &[
            IndexLabel::Int64(10),
            IndexLabel::Int64(20),
            IndexLabel::Int64(30),
        ]);
        assert_eq!(
            relabeled.column("a").unwrap().values(),
            frame.column("a").unwrap().values()
        );
    }

    #[test]
    fn with_index_rejects_wrong_length() {
        let frame = small_frame();
        let err = frame.with_index(vec![1.into()]).unwrap_err();
        assert!(matches!(err, FrameError::IndexLengthMismatch { .. }));
    }

    #[test]
    fn frame_serde_round_trip() {
        let frame = small_frame();
        let encoded = serde_json::to_string(&frame).unwrap();
        let decoded: DataFrame = serde_json::from_str(&encoded).unwrap();
        assert_eq!(frame.index(), decoded.index());
        assert_eq!(frame.columns(), decoded.columns());
    }
}
