#![forbid(unsafe_code)]

//! Parameterized test-case variants of paired dataframes.
//!
//! Data-transformation test suites typically hold an input frame and its
//! expected output. The generators here derive labeled sub-cases from such a
//! pair — one case per row, and copies with perturbed indexes — so the same
//! transformation test runs across single-row inputs, multi-row inputs and
//! frames whose index is random, decreasing or increasing. Inputs are never
//! mutated; every case carries independent copies.
//!
//! Index perturbation draws from one explicitly seeded generator per call,
//! consumed in a fixed order, so a seed pins the derived indexes bit-for-bit
//! across runs.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ta_frame::{DataFrame, FrameError};
use ta_index::{Index, IndexLabel};
use thiserror::Error;

pub mod sample;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum FixtureError {
    #[error(
        "expecting left and right frames to have equal row counts but got {left_rows} and {right_rows}"
    )]
    ShapeMismatch { left_rows: usize, right_rows: usize },
    #[error("expecting left and right frames to share an index but got {left} and {right}")]
    IndexMismatch { left: Index, right: Index },
    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// One labeled variant of a fixture pair, immutable once produced.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureCase {
    pub id: String,
    pub left: DataFrame,
    pub right: DataFrame,
}

const INDEX_DRAW_LOW: i64 = -99_999_999;
const INDEX_DRAW_HIGH: i64 = 100_000_000;

/// Row counts must be equal and the ordered label sequences identical;
/// checked once before any variant is derived.
pub fn validate_pair(left: &DataFrame, right: &DataFrame) -> Result<(), FixtureError> {
    if left.len() != right.len() {
        return Err(FixtureError::ShapeMismatch {
            left_rows: left.len(),
            right_rows: right.len(),
        });
    }
    if left.index() != right.index() {
        return Err(FixtureError::IndexMismatch {
            left: left.index().clone(),
            right: right.index().clone(),
        });
    }
    Ok(())
}

fn split_cases(left: &DataFrame, right: &DataFrame) -> Result<Vec<FixtureCase>, FixtureError> {
    let mut cases = Vec::with_capacity(left.len() + 1);
    for label in left.index().labels() {
        let selector = std::slice::from_ref(label);
        cases.push(FixtureCase {
            id: format!("index {label}"),
            left: left.loc(selector)?,
            right: right.loc(selector)?,
        });
    }
    cases.push(FixtureCase {
        id: format!("all rows ({})", left.len()),
        left: left.clone(),
        right: right.clone(),
    });
    Ok(cases)
}

/// One case per row label in `left`'s order, each restricting both frames to
/// that row as independent copies, followed by the untouched full pair.
pub fn split_by_row(left: &DataFrame, right: &DataFrame) -> Result<Vec<FixtureCase>, FixtureError> {
    validate_pair(left, right)?;
    split_cases(left, right)
}

fn permute_cases(
    left: &DataFrame,
    right: &DataFrame,
    seed: u64,
) -> Result<Vec<FixtureCase>, FixtureError> {
    let rows = left.len();
    let mut rng = StdRng::seed_from_u64(seed);

    // Draw order is part of the determinism contract: the random label
    // vector, then the decreasing start, then the increasing start.
    let random: Vec<i64> = (0..rows)
        .map(|_| rng.gen_range(INDEX_DRAW_LOW..INDEX_DRAW_HIGH))
        .collect();
    let decreasing_start = rng.gen_range(INDEX_DRAW_LOW..INDEX_DRAW_HIGH);
    let increasing_start = rng.gen_range(INDEX_DRAW_LOW..INDEX_DRAW_HIGH);
    let decreasing: Vec<i64> = (0..rows as i64).map(|step| decreasing_start - step).collect();
    let increasing: Vec<i64> = (0..rows as i64).map(|step| increasing_start + step).collect();

    let named = [
        ("random index", random),
        ("decreasing index", decreasing),
        ("increasing index", increasing),
    ];

    let mut cases = Vec::with_capacity(named.len() + 1);
    for (name, values) in named {
        let labels: Vec<IndexLabel> = values.into_iter().map(IndexLabel::Int64).collect();
        cases.push(FixtureCase {
            id: name.to_owned(),
            left: left.with_index(labels.clone())?,
            right: right.with_index(labels)?,
        });
    }
    cases.push(FixtureCase {
        id: "original index".to_owned(),
        left: left.clone(),
        right: right.clone(),
    });
    Ok(cases)
}

/// Copies of the pair with the row labels replaced by seed-derived sequences
/// (random, strictly decreasing, strictly increasing — in that order), cell
/// values untouched, followed by the untouched full pair.
pub fn permute_index(
    left: &DataFrame,
    right: &DataFrame,
    seed: u64,
) -> Result<Vec<FixtureCase>, FixtureError> {
    validate_pair(left, right)?;
    permute_cases(left, right, seed)
}

/// Per-row splits followed by the index permutations. The split list's
/// trailing full pair is dropped so the combined output carries exactly one
/// full-pair entry, the permutation list's "original index".
pub fn combined_variants(
    left: &DataFrame,
    right: &DataFrame,
    seed: u64,
) -> Result<Vec<FixtureCase>, FixtureError> {
    validate_pair(left, right)?;
    let mut cases = split_cases(left, right)?;
    cases.pop();
    cases.extend(permute_cases(left, right, seed)?);
    Ok(cases)
}
