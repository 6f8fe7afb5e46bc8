#![forbid(unsafe_code)]

//! Property suite for the deep-equality engine. Strategies generate
//! arbitrarily nested values; properties verify invariants that must hold
//! for all inputs, not just hand-picked fixtures.

use proptest::prelude::*;

use ta_equality::{EqualityError, Value, assert_equal};
use ta_index::IndexLabel;

fn arb_key() -> impl Strategy<Value = IndexLabel> {
    prop_oneof![
        3 => (0i64..100).prop_map(IndexLabel::Int64),
        1 => "[a-e]{1,3}".prop_map(IndexLabel::Utf8),
    ]
}

fn arb_leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        3 => (-1_000_000i64..1_000_000).prop_map(Value::Int),
        3 => (-1e6f64..1e6).prop_map(Value::Float),
        1 => Just(Value::Float(f64::NAN)),
        1 => any::<bool>().prop_map(Value::Bool),
        2 => "[a-z]{0,8}".prop_map(Value::from),
        1 => Just(Value::Unit),
    ]
}

fn arb_value() -> impl Strategy<Value = Value> {
    arb_leaf().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::List),
            proptest::collection::vec(inner.clone(), 0..4).prop_map(Value::Tuple),
            proptest::collection::btree_map(arb_key(), inner, 0..4).prop_map(Value::Map),
        ]
    })
}

proptest! {
    /// assert_equal(v, v) succeeds for every supported kind, NaN included.
    #[test]
    fn prop_assert_equal_is_reflexive(value in arb_value()) {
        prop_assert!(assert_equal(&value, &value.clone(), "prop").is_ok());
    }

    /// Success is symmetric: if expected equals actual, swapping sides
    /// cannot introduce a failure.
    #[test]
    fn prop_success_is_symmetric(a in arb_value(), b in arb_value()) {
        if assert_equal(&a, &b, "prop").is_ok() {
            prop_assert!(assert_equal(&b, &a, "prop").is_ok());
        }
    }

    /// Different variants always fail the identity gate, regardless of
    /// content.
    #[test]
    fn prop_variant_mismatch_is_type_mismatch(a in arb_value(), b in arb_value()) {
        if a.type_name() != b.type_name() {
            let err = assert_equal(&a, &b, "prop").unwrap_err();
            let is_type_mismatch = matches!(err, EqualityError::TypeMismatch { .. });
            prop_assert!(is_type_mismatch);
        }
    }

    /// Length differences are reported before any element is compared.
    #[test]
    fn prop_length_gate_fires_on_unequal_lengths(
        items in proptest::collection::vec(arb_leaf(), 0..6),
        extra in arb_leaf(),
    ) {
        let mut longer = items.clone();
        longer.push(extra);
        let err = assert_equal(
            &Value::List(items.clone()),
            &Value::List(longer),
            "prop",
        ).unwrap_err();
        prop_assert_eq!(err, EqualityError::LengthMismatch {
            label: "prop".to_owned(),
            expected: items.len(),
            actual: items.len() + 1,
        });
    }

    /// Every failure message starts with the caller-supplied label.
    #[test]
    fn prop_failure_messages_carry_the_label(a in arb_value(), b in arb_value()) {
        if let Err(err) = assert_equal(&a, &b, "tag-xyz") {
            prop_assert!(err.to_string().starts_with("tag-xyz"));
        }
    }
}
