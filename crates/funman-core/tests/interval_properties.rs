use funman_core::{Bound, Interval};
use proptest::prelude::*;

fn bound_strategy() -> impl Strategy<Value = Bound> {
    prop_oneof![
        1 => Just(Bound::NegInf),
        1 => Just(Bound::PosInf),
        8 => (-50i64..50).prop_map(Bound::from),
    ]
}

fn interval_strategy() -> impl Strategy<Value = Interval> {
    (bound_strategy(), bound_strategy(), any::<bool>()).prop_filter_map(
        "bounds must differ",
        |(a, b, closed)| {
            let (lb, ub) = if a <= b { (a, b) } else { (b, a) };
            if lb == ub {
                None
            } else {
                Interval::new(lb, ub, closed).ok()
            }
        },
    )
}

fn any_interval_strategy() -> impl Strategy<Value = Interval> {
    (bound_strategy(), bound_strategy(), any::<bool>()).prop_filter_map(
        "ordered bounds",
        |(a, b, closed)| {
            let (lb, ub) = if a <= b { (a, b) } else { (b, a) };
            Interval::new(lb, ub, closed).ok()
        },
    )
}

fn point_strategy() -> impl Strategy<Value = Interval> {
    bound_strategy().prop_map(Interval::from_value)
}

proptest! {
    #[test]
    fn disjoint_is_symmetric(a in interval_strategy(), b in interval_strategy()) {
        prop_assert_eq!(a.disjoint(&b), b.disjoint(&a));
    }

    #[test]
    fn union_merges_exactly_when_overlapping_or_touching(a in interval_strategy(), b in interval_strategy()) {
        let merged = a.union(&b).len() == 1;
        prop_assert_eq!(merged, !a.disjoint(&b) || a.meets(&b));
    }

    #[test]
    fn containment_implies_intersection_is_contained(a in any_interval_strategy(), b in any_interval_strategy()) {
        if a.contains(&b) {
            prop_assert_eq!(a.intersection(&b), Some(b.clone()));
        }
    }

    #[test]
    fn contained_points_intersect_to_themselves(a in any_interval_strategy(), p in point_strategy()) {
        if a.contains(&p) {
            prop_assert_eq!(a.intersection(&p), Some(p.clone()));
            prop_assert_eq!(p.intersection(&a), Some(p.clone()));
            prop_assert!(a.intersects(&p));
        }
    }

    #[test]
    fn intersection_is_commutative_and_inside_both(a in any_interval_strategy(), b in any_interval_strategy()) {
        let ab = a.intersection(&b);
        prop_assert_eq!(&ab, &b.intersection(&a));
        if let Some(common) = ab {
            prop_assert!(a.contains(&common));
            prop_assert!(b.contains(&common));
        }
    }

    #[test]
    fn width_is_never_negative(a in interval_strategy()) {
        prop_assert!(a.width(None) >= Bound::zero());
    }

    #[test]
    fn finite_midpoint_lies_inside(a in interval_strategy()) {
        if a.finite() {
            let mid = Bound::Finite(a.midpoint(None));
            prop_assert!(a.contains_value(&mid));
        }
    }
}
