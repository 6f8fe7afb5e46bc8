//! Frame, series and index equality assertions with descriptive failures,
//! the facility test suites reach for instead of `==`.
//!
//! Checks run in a fixed order and stop at the first divergence: shape,
//! column names (and optionally order), index labels, per-column dtype
//! (optional), then per-cell NaN-aware equality.

use ta_index::{Index, IndexLabel};
use ta_types::{DType, Scalar};
use thiserror::Error;

use crate::{DataFrame, Series};

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TestingError {
    #[error("row count mismatch: expected {expected}, actual {actual}")]
    RowCountMismatch { expected: usize, actual: usize },
    #[error("column set mismatch: expected {expected:?}, actual {actual:?}")]
    ColumnSetMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("column order mismatch: expected {expected:?}, actual {actual:?}")]
    ColumnOrderMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },
    #[error("index mismatch at position {position}: expected {expected}, actual {actual}")]
    IndexLabelMismatch {
        position: usize,
        expected: IndexLabel,
        actual: IndexLabel,
    },
    #[error("index length mismatch: expected {expected}, actual {actual}")]
    IndexLengthMismatch { expected: usize, actual: usize },
    #[error("dtype mismatch in column '{column}': expected {expected:?}, actual {actual:?}")]
    DtypeMismatch {
        column: String,
        expected: DType,
        actual: DType,
    },
    #[error(
        "value mismatch in column '{column}' at row {row}: expected {expected}, actual {actual}"
    )]
    CellMismatch {
        column: String,
        row: IndexLabel,
        expected: Scalar,
        actual: Scalar,
    },
    #[error("series name mismatch: expected '{expected}', actual '{actual}'")]
    NameMismatch { expected: String, actual: String },
}

/// Strictness knobs for frame and series comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameCompareOptions {
    pub check_column_order: bool,
    pub check_dtype: bool,
}

impl Default for FrameCompareOptions {
    fn default() -> Self {
        Self {
            check_column_order: true,
            check_dtype: true,
        }
    }
}

pub fn assert_index_equal(expected: &Index, actual: &Index) -> Result<(), TestingError> {
    if expected.len() != actual.len() {
        return Err(TestingError::IndexLengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    if let Some(position) = expected.first_divergence(actual) {
        return Err(TestingError::IndexLabelMismatch {
            position,
            expected: expected.labels()[position].clone(),
            actual: actual.labels()[position].clone(),
        });
    }
    Ok(())
}

fn assert_cells_equal(
    column_name: &str,
    index: &Index,
    expected: &[Scalar],
    actual: &[Scalar],
) -> Result<(), TestingError> {
    for (position, (e, a)) in expected.iter().zip(actual.iter()).enumerate() {
        if !e.semantic_eq(a) {
            return Err(TestingError::CellMismatch {
                column: column_name.to_owned(),
                row: index.labels()[position].clone(),
                expected: e.clone(),
                actual: a.clone(),
            });
        }
    }
    Ok(())
}

pub fn assert_series_equal(
    expected: &Series,
    actual: &Series,
    options: &FrameCompareOptions,
) -> Result<(), TestingError> {
    if expected.name() != actual.name() {
        return Err(TestingError::NameMismatch {
            expected: expected.name().to_owned(),
            actual: actual.name().to_owned(),
        });
    }
    assert_index_equal(expected.index(), actual.index())?;
    if options.check_dtype && expected.column().dtype() != actual.column().dtype() {
        return Err(TestingError::DtypeMismatch {
            column: expected.name().to_owned(),
            expected: expected.column().dtype(),
            actual: actual.column().dtype(),
        });
    }
    assert_cells_equal(
        expected.name(),
        expected.index(),
        expected.values(),
        actual.values(),
    )
}

pub fn assert_frame_equal(
    expected: &DataFrame,
    actual: &DataFrame,
    options: &FrameCompareOptions,
) -> Result<(), TestingError> {
    if expected.len() != actual.len() {
        return Err(TestingError::RowCountMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }

    let expected_names = expected.column_order().to_vec();
    let actual_names = actual.column_order().to_vec();
    if options.check_column_order {
        if expected_names != actual_names {
            return Err(TestingError::ColumnOrderMismatch {
                expected: expected_names,
                actual: actual_names,
            });
        }
    } else {
        // BTreeMap keys are sorted, so name-set comparison is order-free.
        let expected_keys: Vec<&String> = expected.columns().keys().collect();
        let actual_keys: Vec<&String> = actual.columns().keys().collect();
        if expected_keys != actual_keys {
            return Err(TestingError::ColumnSetMismatch {
                expected: expected_names,
                actual: actual_names,
            });
        }
    }

    assert_index_equal(expected.index(), actual.index())?;

    for name in expected.column_order() {
        let expected_column = expected
            .column(name)
            .expect("column name listed in order must exist");
        let Some(actual_column) = actual.column(name) else {
            return Err(TestingError::ColumnSetMismatch {
                expected: expected.column_order().to_vec(),
                actual: actual.column_order().to_vec(),
            });
        };
        if options.check_dtype && expected_column.dtype() != actual_column.dtype() {
            return Err(TestingError::DtypeMismatch {
                column: name.clone(),
                expected: expected_column.dtype(),
                actual: actual_column.dtype(),
            });
        }
        assert_cells_equal(
            name,
            expected.index(),
            expected_column.values(),
            actual_column.values(),
        )?;
    }

    Ok(())
}
