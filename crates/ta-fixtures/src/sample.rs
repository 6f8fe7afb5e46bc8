//! Fixed sample datasets for consuming test suites.

use ta_frame::DataFrame;
use ta_types::Scalar;

/// Six-row frame: integer column `a` = 1..=6, text column `b` = "a".."f",
/// default 0..6 index, no missing values.
#[must_use]
pub fn sample_frame() -> DataFrame {
    DataFrame::from_pairs(vec![
        (
            "a".to_owned(),
            (1..=6).map(Scalar::Int64).collect(),
        ),
        (
            "b".to_owned(),
            ["a", "b", "c", "d", "e", "f"]
                .into_iter()
                .map(Scalar::from)
                .collect(),
        ),
    ])
    .expect("sample frame construction is infallible")
}

/// An aligned pair of the sample frame, for exercising the permuter.
#[must_use]
pub fn sample_pair() -> (DataFrame, DataFrame) {
    (sample_frame(), sample_frame())
}
