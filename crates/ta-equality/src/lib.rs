#![forbid(unsafe_code)]

//! Deep-equality assertions for values whose natural `==` is unusable or
//! uninformative: dataframes, series, label indexes, numeric arrays, NaN
//! sentinels, and arbitrary nestings of lists, tuples and maps over all of
//! these.
//!
//! The engine dispatches each (expected, actual) pair to a comparison
//! strategy by runtime kind, in a fixed precedence: variant-identity gate,
//! frame, series, index, NaN sentinel, array, list/tuple, map, plain `==`.
//! The precedence is rendered as match-arm order in [`compare`]; the NaN
//! guard arm sits above the generic scalar fallback because the sentinel is
//! itself a valid float. On the first divergence the engine fails with a
//! diagnostic naming the caller's label plus every index and key crossed on
//! the way down, so a mismatch deep inside a nested structure is locatable
//! from the message alone.
//!
//! Tabular and array support are capability features (`tabular`, `array`,
//! both default-on). With a feature off the corresponding `Value` variants
//! and dispatch arms do not exist; sequence, map and scalar comparison is
//! unaffected.

use std::collections::BTreeMap;
use std::fmt;
use std::mem::discriminant;

use ta_index::IndexLabel;
use thiserror::Error;

#[cfg(feature = "array")]
use ta_array::NumArray;
#[cfg(feature = "tabular")]
use ta_frame::{
    DataFrame, Series,
    testing::{assert_frame_equal, assert_index_equal, assert_series_equal},
};
#[cfg(feature = "tabular")]
pub use ta_frame::testing::FrameCompareOptions;
#[cfg(feature = "tabular")]
use ta_index::Index;

/// A value the engine knows how to compare. Closed set; nesting is arbitrary.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    #[cfg(feature = "tabular")]
    Frame(DataFrame),
    #[cfg(feature = "tabular")]
    Series(Series),
    #[cfg(feature = "tabular")]
    Index(Index),
    #[cfg(feature = "array")]
    Array(NumArray),
    Float(f64),
    Int(i64),
    Bool(bool),
    Str(String),
    Unit,
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Map(BTreeMap<IndexLabel, Value>),
}

impl Value {
    /// Variant name used in type-mismatch diagnostics. A NaN reports as
    /// `float`: the sentinel shares the float variant and the identity gate
    /// must let it through to the sentinel comparator.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        match self {
            #[cfg(feature = "tabular")]
            Self::Frame(_) => "frame",
            #[cfg(feature = "tabular")]
            Self::Series(_) => "series",
            #[cfg(feature = "tabular")]
            Self::Index(_) => "index",
            #[cfg(feature = "array")]
            Self::Array(_) => "array",
            Self::Float(_) => "float",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
            Self::Str(_) => "str",
            Self::Unit => "unit",
            Self::List(_) => "list",
            Self::Tuple(_) => "tuple",
            Self::Map(_) => "map",
        }
    }

    #[must_use]
    pub fn tuple(items: Vec<Value>) -> Self {
        Self::Tuple(items)
    }

    #[must_use]
    pub fn map<K: Into<IndexLabel>>(entries: Vec<(K, Value)>) -> Self {
        Self::Map(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    fn render_leaf(&self) -> String {
        match self {
            Self::Float(v) => v.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Bool(v) => v.to_string(),
            Self::Str(v) => v.clone(),
            Self::Unit => "()".to_owned(),
            other => format!("{other:?}"),
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Self::List(items)
    }
}

#[cfg(feature = "tabular")]
impl From<DataFrame> for Value {
    fn from(frame: DataFrame) -> Self {
        Self::Frame(frame)
    }
}

#[cfg(feature = "tabular")]
impl From<Series> for Value {
    fn from(series: Series) -> Self {
        Self::Series(series)
    }
}

#[cfg(feature = "tabular")]
impl From<Index> for Value {
    fn from(index: Index) -> Self {
        Self::Index(index)
    }
}

#[cfg(feature = "array")]
impl From<NumArray> for Value {
    fn from(array: NumArray) -> Self {
        Self::Array(array)
    }
}

/// One level of descent into a nested structure.
#[derive(Debug, Clone, PartialEq)]
pub enum PathSegment {
    Index(usize),
    Key(IndexLabel),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "index {i}"),
            Self::Key(k) => write!(f, "key {k}"),
        }
    }
}

/// Label plus accumulated path, rendered only when a comparison fails.
fn render_label(label: &str, path: &[PathSegment]) -> String {
    let mut out = label.to_owned();
    for segment in path {
        out.push(' ');
        out.push_str(&segment.to_string());
    }
    out
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum EqualityError {
    #[error("{label} - expected ({expected}) and actual ({actual}) type mismatch")]
    TypeMismatch {
        label: String,
        expected: &'static str,
        actual: &'static str,
    },
    #[error("{label} - unequal lengths -\n  Expected: {expected}\n  Actual: {actual}")]
    LengthMismatch {
        label: String,
        expected: usize,
        actual: usize,
    },
    #[error(
        "{label} - keys in expected not in actual: {missing_from_actual:?}, \
         keys in actual not in expected: {missing_from_expected:?}"
    )]
    KeySetMismatch {
        label: String,
        missing_from_actual: Vec<IndexLabel>,
        missing_from_expected: Vec<IndexLabel>,
    },
    #[error("{label}{detail}")]
    ValueMismatch { label: String, detail: String },
}

impl EqualityError {
    /// The rendered label/path chain, for callers that want to assert on the
    /// divergence location without parsing the full message.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::TypeMismatch { label, .. }
            | Self::LengthMismatch { label, .. }
            | Self::KeySetMismatch { label, .. }
            | Self::ValueMismatch { label, .. } => label,
        }
    }
}

/// Caller-facing knobs. `render_values` embeds full renderings of both sides
/// in frame/series/index/array mismatch messages, off by default to keep
/// failure output readable.
#[derive(Debug, Clone, Default)]
pub struct EqualityOptions {
    pub render_values: bool,
    #[cfg(feature = "tabular")]
    pub frame: FrameCompareOptions,
}

pub fn assert_equal(expected: &Value, actual: &Value, label: &str) -> Result<(), EqualityError> {
    assert_equal_with(expected, actual, label, &EqualityOptions::default())
}

pub fn assert_equal_with(
    expected: &Value,
    actual: &Value,
    label: &str,
    options: &EqualityOptions,
) -> Result<(), EqualityError> {
    let mut path = Vec::new();
    compare(expected, actual, label, &mut path, options)
}

/// The dispatch table of the engine. Arm order is the strategy precedence;
/// the variant-identity gate runs first and unconditionally.
fn compare(
    expected: &Value,
    actual: &Value,
    label: &str,
    path: &mut Vec<PathSegment>,
    options: &EqualityOptions,
) -> Result<(), EqualityError> {
    if discriminant(expected) != discriminant(actual) {
        return Err(EqualityError::TypeMismatch {
            label: render_label(label, path),
            expected: expected.type_name(),
            actual: actual.type_name(),
        });
    }

    match (expected, actual) {
        #[cfg(feature = "tabular")]
        (Value::Frame(e), Value::Frame(a)) => {
            assert_frame_equal(e, a, &options.frame).map_err(|err| {
                delegated_mismatch(label, path, &err, options.render_values, e, a)
            })
        }
        #[cfg(feature = "tabular")]
        (Value::Series(e), Value::Series(a)) => {
            assert_series_equal(e, a, &options.frame).map_err(|err| {
                delegated_mismatch(label, path, &err, options.render_values, e, a)
            })
        }
        #[cfg(feature = "tabular")]
        (Value::Index(e), Value::Index(a)) => assert_index_equal(e, a).map_err(|err| {
            delegated_mismatch(label, path, &err, options.render_values, e, a)
        }),
        (Value::Float(e), Value::Float(a)) if e.is_nan() || a.is_nan() => {
            if e.is_nan() && a.is_nan() {
                Ok(())
            } else {
                Err(EqualityError::ValueMismatch {
                    label: render_label(label, path),
                    detail: format!(
                        " - both values are not NaN -\n  Expected: {e}\n  Actual: {a}"
                    ),
                })
            }
        }
        #[cfg(feature = "array")]
        (Value::Array(e), Value::Array(a)) => compare_arrays(e, a, label, path, options),
        (Value::List(e), Value::List(a)) | (Value::Tuple(e), Value::Tuple(a)) => {
            compare_sequences(e, a, label, path, options)
        }
        (Value::Map(e), Value::Map(a)) => compare_maps(e, a, label, path, options),
        (e, a) => {
            if e == a {
                Ok(())
            } else {
                Err(EqualityError::ValueMismatch {
                    label: render_label(label, path),
                    detail: format!(
                        " -\n  Expected: {}\n  Actual: {}",
                        e.render_leaf(),
                        a.render_leaf()
                    ),
                })
            }
        }
    }
}

#[cfg(any(feature = "tabular", feature = "array"))]
fn delegated_mismatch<E: fmt::Display, V: fmt::Debug>(
    label: &str,
    path: &[PathSegment],
    source: &E,
    render_values: bool,
    expected: &V,
    actual: &V,
) -> EqualityError {
    let detail = if render_values {
        format!(" - {source}\nexpected:\n{expected:#?}\nactual:\n{actual:#?}")
    } else {
        format!(" - {source}")
    };
    EqualityError::ValueMismatch {
        label: render_label(label, path),
        detail,
    }
}

#[cfg(feature = "array")]
fn compare_arrays(
    expected: &NumArray,
    actual: &NumArray,
    label: &str,
    path: &[PathSegment],
    options: &EqualityOptions,
) -> Result<(), EqualityError> {
    // Shape first: elementwise comparison must never see mismatched extents,
    // and a would-be scalar has already been rejected by the variant gate.
    if expected.shape() != actual.shape() {
        return Err(delegated_mismatch(
            label,
            path,
            &format!(
                "array shape mismatch: expected {:?}, actual {:?}",
                expected.shape(),
                actual.shape()
            ),
            options.render_values,
            expected,
            actual,
        ));
    }
    if let Some(position) = expected.first_divergence(actual) {
        return Err(delegated_mismatch(
            label,
            path,
            &format!(
                "arrays unequal at flat position {position}: expected {}, actual {}",
                expected.data()[position],
                actual.data()[position]
            ),
            options.render_values,
            expected,
            actual,
        ));
    }
    Ok(())
}

fn compare_sequences(
    expected: &[Value],
    actual: &[Value],
    label: &str,
    path: &mut Vec<PathSegment>,
    options: &EqualityOptions,
) -> Result<(), EqualityError> {
    if expected.len() != actual.len() {
        return Err(EqualityError::LengthMismatch {
            label: render_label(label, path),
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    for (position, (e, a)) in expected.iter().zip(actual.iter()).enumerate() {
        path.push(PathSegment::Index(position));
        compare(e, a, label, path, options)?;
        path.pop();
    }
    Ok(())
}

fn compare_maps(
    expected: &BTreeMap<IndexLabel, Value>,
    actual: &BTreeMap<IndexLabel, Value>,
    label: &str,
    path: &mut Vec<PathSegment>,
    options: &EqualityOptions,
) -> Result<(), EqualityError> {
    let missing_from_actual: Vec<IndexLabel> = expected
        .keys()
        .filter(|key| !actual.contains_key(*key))
        .cloned()
        .collect();
    let missing_from_expected: Vec<IndexLabel> = actual
        .keys()
        .filter(|key| !expected.contains_key(*key))
        .cloned()
        .collect();
    if !missing_from_actual.is_empty() || !missing_from_expected.is_empty() {
        return Err(EqualityError::KeySetMismatch {
            label: render_label(label, path),
            missing_from_actual,
            missing_from_expected,
        });
    }
    // BTreeMap iteration is key-sorted, so diagnostics are deterministic.
    for (key, e) in expected {
        let a = &actual[key];
        path.push(PathSegment::Key(key.clone()));
        compare(e, a, label, path, options)?;
        path.pop();
    }
    Ok(())
}


#[cfg(all(test, feature = "tabular"))]
mod tabular_tests {
    use super::{EqualityError, EqualityOptions, Value, assert_equal, assert_equal_with};
    use ta_frame::DataFrame;
    use ta_index::Index;
    use ta_types::Scalar;

    fn frame(values: Vec<i64>) -> DataFrame {
        DataFrame::from_pairs(vec![(
            "a".to_owned(),
            values.into_iter().map(Scalar::Int64).collect(),
        )])
        .unwrap()
    }

    #[test]
    fn equal_frames_pass_through_delegate() {
        let value = Value::from(frame(vec![1, 2, 3]));
        assert_equal(&value, &value.clone(), "case").unwrap();
    }

    #[test]
    fn frame_mismatch_wraps_delegate_diagnostic() {
        let expected = Value::from(frame(vec![1, 2, 3]));
        let actual = Value::from(frame(vec![1, 9, 3]));
        let err = assert_equal(&expected, &actual, "case").unwrap_err();
        assert!(matches!(err, EqualityError::ValueMismatch { .. }));
        let message = err.to_string();
        assert!(message.starts_with("case -"), "message: {message}");
        assert!(message.contains("column 'a'"), "message: {message}");
    }

    #[test]
    fn frame_vs_scalar_is_a_type_mismatch() {
        let err = assert_equal(&Value::from(frame(vec![1])), &Value::Int(1), "case").unwrap_err();
        assert!(matches!(err, EqualityError::TypeMismatch { .. }));
    }

    #[test]
    fn render_values_embeds_both_sides() {
        let expected = Value::from(frame(vec![1]));
        let actual = Value::from(frame(vec![2]));
        let options = EqualityOptions {
            render_values: true,
            ..EqualityOptions::default()
        };
        let err = assert_equal_with(&expected, &actual, "case", &options).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("expected:"), "message: {message}");
        assert!(message.contains("actual:"), "message: {message}");
    }

    #[test]
    fn index_comparison_is_order_sensitive() {
        let expected = Value::from(Index::from_i64(vec![1, 2, 3]));
        let actual = Value::from(Index::from_i64(vec![3, 2, 1]));
        let err = assert_equal(&expected, &actual, "case").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("position 0"), "message: {message}");
    }

    #[test]
    fn frame_inside_list_reports_path() {
        let expected = Value::List(vec![Value::Int(0), Value::from(frame(vec![1]))]);
        let actual = Value::List(vec![Value::Int(0), Value::from(frame(vec![2]))]);
        let err = assert_equal(&expected, &actual, "case").unwrap_err();
        assert_eq!(err.label(), "case index 1");
    }
}
