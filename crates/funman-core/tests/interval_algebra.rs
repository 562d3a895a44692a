use funman_core::errors::FunmanError;
use funman_core::{BigRational, Bound, Interval, BIG_NUMBER};
use num_bigint::BigInt;

fn iv(lb: i64, ub: i64) -> Interval {
    Interval::half_open(Bound::from(lb), Bound::from(ub)).unwrap()
}

fn rat(value: i64) -> BigRational {
    BigRational::from_integer(BigInt::from(value))
}

#[test]
fn open_point_interval_is_closed_on_construction() {
    let point = Interval::new(Bound::from(5), Bound::from(5), false).unwrap();
    assert!(point.closed_upper_bound());
    assert!(point.is_point());
    assert_eq!(point.width(None), Bound::zero());
}

#[test]
fn inverted_bounds_are_rejected() {
    let err = Interval::half_open(Bound::from(3), Bound::from(1)).unwrap_err();
    assert!(matches!(err, FunmanError::Interval(info) if info.code == "inverted-bounds"));
}

#[test]
fn width_with_non_positive_normalizer_is_zero() {
    let interval = iv(0, 4);
    assert_eq!(interval.width(Some(&rat(0))), Bound::zero());
    assert_eq!(interval.width(Some(&rat(-1))), Bound::zero());
    assert_eq!(interval.width(Some(&rat(2))), Bound::from(2));
    assert_eq!(interval.width(None), Bound::from(4));
}

#[test]
fn infinite_width_survives_normalization() {
    let half = Interval::half_open(Bound::from(0), Bound::PosInf).unwrap();
    assert_eq!(half.width(None), Bound::PosInf);
    assert_eq!(half.width(Some(&rat(10))), Bound::PosInf);
}

#[test]
fn unbounded_contains_finite_but_not_conversely() {
    let whole = Interval::half_open(Bound::NegInf, Bound::PosInf).unwrap();
    let unit = iv(0, 1);
    assert!(whole.is_unbound());
    assert!(!whole.finite());
    assert!(whole.contains(&unit));
    assert!(!unit.contains(&whole));
    assert!(whole.contains_value(&Bound::from(i64::MAX)));
    assert!(whole.contains_value(&Bound::from(i64::MIN)));
}

#[test]
fn contains_value_respects_closedness() {
    let open = iv(0, 1);
    let closed = Interval::closed(Bound::from(0), Bound::from(1)).unwrap();
    assert!(open.contains_value(&Bound::from(0)));
    assert!(!open.contains_value(&Bound::from(1)));
    assert!(closed.contains_value(&Bound::from(1)));
    assert!(!closed.contains_value(&Bound::from(-1)));
}

#[test]
fn midpoint_handles_sentinels() {
    let whole = Interval::unbounded();
    assert_eq!(whole.midpoint(None), rat(0));

    let upper = Interval::half_open(Bound::from(3), Bound::PosInf).unwrap();
    assert_eq!(upper.midpoint(None), rat(3 + BIG_NUMBER));

    let lower = Interval::half_open(Bound::NegInf, Bound::from(3)).unwrap();
    assert_eq!(lower.midpoint(None), rat(3 - BIG_NUMBER));

    assert_eq!(iv(2, 6).midpoint(None), rat(4));
}

#[test]
fn midpoint_follows_sampled_groups() {
    let interval = iv(0, 100);
    let groups = vec![vec![rat(1), rat(3)], vec![rat(5)], vec![]];
    let expected = BigRational::new(BigInt::from(7), BigInt::from(2));
    assert_eq!(interval.midpoint(Some(&groups)), expected);

    let empty: Vec<Vec<BigRational>> = vec![vec![]];
    assert_eq!(interval.midpoint(Some(&empty)), rat(50));
}

#[test]
fn intersection_of_overlapping_intervals() {
    assert_eq!(iv(0, 5).intersection(&iv(3, 8)), Some(iv(3, 5)));
    assert_eq!(iv(3, 8).intersection(&iv(0, 5)), Some(iv(3, 5)));
    assert_eq!(iv(0, 10).intersection(&iv(2, 4)), Some(iv(2, 4)));
    assert_eq!(iv(0, 5).intersection(&iv(0, 5)), Some(iv(0, 5)));
}

#[test]
fn intersection_is_absent_for_separate_or_touching_intervals() {
    assert_eq!(iv(0, 1).intersection(&iv(2, 3)), None);
    assert_eq!(iv(0, 1).intersection(&iv(1, 2)), None);
}

#[test]
fn intersection_keeps_closedness_of_selected_bound() {
    let closed = Interval::closed(Bound::from(0), Bound::from(5)).unwrap();
    let result = closed.intersection(&iv(3, 8)).unwrap();
    assert!(result.closed_upper_bound());
    let result = iv(3, 8).intersection(&closed).unwrap();
    assert!(result.closed_upper_bound());
}

#[test]
fn point_on_a_shared_edge_intersects_when_included() {
    let point = Interval::from_value(Bound::from(3));
    assert_eq!(iv(3, 5).intersection(&point), Some(point.clone()));
    assert_eq!(point.intersection(&iv(3, 5)), Some(point.clone()));
    assert!(iv(3, 5).intersects(&point));

    let closed = Interval::closed(Bound::from(0), Bound::from(5)).unwrap();
    let end = Interval::from_value(Bound::from(5));
    assert!(closed.contains(&end));
    assert_eq!(closed.intersection(&end), Some(end.clone()));

    assert!(!iv(0, 5).contains(&end));
    assert!(!iv(0, 5).intersects(&end));
    assert_eq!(iv(0, 5).intersection(&end), None);
}

#[test]
fn containment_respects_upper_closedness() {
    let closed = Interval::closed(Bound::from(0), Bound::from(5)).unwrap();
    assert!(closed.contains(&iv(0, 5)));
    assert!(!iv(0, 5).contains(&closed));
    let common = iv(0, 5).intersection(&closed).unwrap();
    assert!(!common.closed_upper_bound());
}

#[test]
fn subtract_is_directional() {
    assert_eq!(iv(0, 5).subtract(&iv(3, 8)), Some(iv(0, 3)));
    assert_eq!(iv(3, 8).subtract(&iv(0, 5)), Some(iv(5, 8)));
    assert_eq!(iv(0, 5).subtract(&iv(0, 2)), None);
    // Only the lower remainder survives for a strictly nested subtrahend.
    assert_eq!(iv(0, 10).subtract(&iv(2, 4)), Some(iv(0, 2)));
}

#[test]
fn subtract_returns_none_when_nothing_remains() {
    assert_eq!(iv(2, 3).subtract(&iv(1, 5)), None);
    assert_eq!(iv(2, 3).subtract(&iv(1, 3)), None);
}

#[test]
fn subtract_keeps_non_overlapping_self() {
    assert_eq!(iv(0, 1).subtract(&iv(4, 6)), Some(iv(0, 1)));
    assert_eq!(iv(5, 9).subtract(&iv(0, 2)), Some(iv(5, 9)));
}

#[test]
fn union_merges_or_keeps_both() {
    assert_eq!(iv(0, 5).union(&iv(3, 8)), vec![iv(0, 8)]);
    assert_eq!(iv(0, 1).union(&iv(1, 2)), vec![iv(0, 2)]);
    assert_eq!(iv(4, 6).union(&iv(0, 1)), vec![iv(0, 1), iv(4, 6)]);
    assert_eq!(iv(0, 10).union(&iv(2, 4)), vec![iv(0, 10)]);
    assert_eq!(iv(0, 3).union(&iv(0, 3)), vec![iv(0, 3)]);
}

#[test]
fn disjoint_meets_and_intersects() {
    assert!(iv(0, 1).disjoint(&iv(1, 2)));
    assert!(iv(0, 1).meets(&iv(1, 2)));
    assert!(!iv(0, 1).intersects(&iv(1, 2)));
    assert!(iv(0, 2).intersects(&iv(1, 3)));
    assert!(!iv(0, 2).disjoint(&iv(1, 3)));
    assert!(!iv(0, 2).meets(&iv(1, 3)));
}

#[test]
fn normalize_divides_both_bounds() {
    let scaled = iv(2, 8).normalize(&rat(2));
    assert_eq!(scaled, iv(1, 4));
    let collapsed = iv(2, 8).normalize(&rat(0));
    assert!(collapsed.is_point());
}

#[test]
fn width_ordering() {
    assert!(iv(0, 1).narrower_than(&iv(0, 2)));
    assert!(!iv(0, 2).narrower_than(&iv(5, 7)));
    let whole = Interval::unbounded();
    assert!(iv(-1000, 1000).narrower_than(&whole));
}

#[test]
fn equality_ignores_closedness() {
    let open = iv(0, 1);
    let closed = Interval::closed(Bound::from(0), Bound::from(1)).unwrap();
    assert_eq!(open, closed);
}

#[test]
fn display_uses_five_decimals() {
    assert_eq!(iv(0, 1).to_string(), "[0.00000, 1.00000)");
    let closed = Interval::closed(Bound::NegInf, Bound::from(2)).unwrap();
    assert_eq!(closed.to_string(), "[-inf, 2.00000]");
}

#[test]
fn serde_normalizes_and_accepts_sentinels() {
    let interval: Interval = serde_json::from_str(r#"{"lb": "-inf", "ub": 3}"#).unwrap();
    assert_eq!(interval.lb(), &Bound::NegInf);
    assert_eq!(interval.ub(), &Bound::from(3));

    let point: Interval = serde_json::from_str(r#"{"lb": 5, "ub": 5}"#).unwrap();
    assert!(point.closed_upper_bound());

    let defaulted: Interval = serde_json::from_str("{}").unwrap();
    assert!(defaulted.is_unbound());

    let inverted = serde_json::from_str::<Interval>(r#"{"lb": 5, "ub": 1}"#);
    assert!(inverted.is_err());

    let value = serde_json::to_value(iv(0, 1)).unwrap();
    assert_eq!(value["lb"], serde_json::json!(0.0));
    assert_eq!(value["ub"], serde_json::json!(1.0));
    assert_eq!(value["closed_upper_bound"], serde_json::json!(false));
}

#[test]
fn decimal_strings_are_exact() {
    let interval: Interval = serde_json::from_str(r#"{"lb": "0.1", "ub": "0.3"}"#).unwrap();
    let expected = BigRational::new(BigInt::from(1), BigInt::from(5));
    assert_eq!(interval.width(None), Bound::Finite(expected));
}
