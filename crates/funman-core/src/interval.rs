//! Half-open intervals over [`Bound`] values.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::bound::{self, Bound};
use crate::errors::{ErrorInfo, FunmanError};

/// Offset used to pick a finite midpoint for intervals with one infinite side.
pub const BIG_NUMBER: i64 = 1_000_000;

/// The interval `[lb, ub)`, or `[lb, ub]` when `closed_upper_bound` is set.
///
/// Construction enforces `lb <= ub` and closes point intervals, so a value of
/// this type always satisfies the invariants. The width is computed once at
/// construction; the bounds cannot be mutated afterwards.
///
/// Equality and hashing only consider `(lb, ub)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "IntervalRepr", into = "IntervalRepr")]
pub struct Interval {
    lb: Bound,
    ub: Bound,
    closed_upper_bound: bool,
    width: Bound,
}

#[derive(Serialize, Deserialize)]
struct IntervalRepr {
    #[serde(default = "Bound::neg_inf")]
    lb: Bound,
    #[serde(default = "Bound::pos_inf")]
    ub: Bound,
    #[serde(default)]
    closed_upper_bound: bool,
}

impl TryFrom<IntervalRepr> for Interval {
    type Error = FunmanError;

    fn try_from(repr: IntervalRepr) -> Result<Self, Self::Error> {
        Interval::new(repr.lb, repr.ub, repr.closed_upper_bound)
    }
}

impl From<Interval> for IntervalRepr {
    fn from(interval: Interval) -> Self {
        Self {
            lb: interval.lb,
            ub: interval.ub,
            closed_upper_bound: interval.closed_upper_bound,
        }
    }
}

impl Interval {
    /// Builds an interval, rejecting inverted bounds.
    ///
    /// An open interval with `lb == ub` would be empty; it is closed instead
    /// and a warning is emitted.
    pub fn new(lb: Bound, ub: Bound, closed_upper_bound: bool) -> Result<Self, FunmanError> {
        if lb > ub {
            return Err(FunmanError::Interval(
                ErrorInfo::new("inverted-bounds", "lower bound exceeds upper bound")
                    .with_context("lb", lb.to_string())
                    .with_context("ub", ub.to_string()),
            ));
        }
        Ok(Self::from_ordered(lb, ub, closed_upper_bound))
    }

    /// Shorthand for the half-open interval `[lb, ub)`.
    pub fn half_open(lb: Bound, ub: Bound) -> Result<Self, FunmanError> {
        Self::new(lb, ub, false)
    }

    /// Shorthand for the closed interval `[lb, ub]`.
    pub fn closed(lb: Bound, ub: Bound) -> Result<Self, FunmanError> {
        Self::new(lb, ub, true)
    }

    /// The whole line `[-inf, inf)`.
    pub fn unbounded() -> Self {
        Self::from_ordered(Bound::NegInf, Bound::PosInf, false)
    }

    /// The degenerate interval `[value, value]`.
    pub fn from_value(value: Bound) -> Self {
        Self::from_ordered(value.clone(), value, true)
    }

    fn from_ordered(lb: Bound, ub: Bound, closed_upper_bound: bool) -> Self {
        debug_assert!(lb <= ub);
        let closed_upper_bound = if lb == ub && !closed_upper_bound {
            warn!(
                lb = %lb,
                ub = %ub,
                "interval has equal bounds, treating the upper bound as closed"
            );
            true
        } else {
            closed_upper_bound
        };
        let width = bound::minus(&ub, &lb);
        Self {
            lb,
            ub,
            closed_upper_bound,
            width,
        }
    }

    /// Lower bound (always included).
    pub fn lb(&self) -> &Bound {
        &self.lb
    }

    /// Upper bound (included only when closed).
    pub fn ub(&self) -> &Bound {
        &self.ub
    }

    /// Whether the upper bound belongs to the interval.
    pub fn closed_upper_bound(&self) -> bool {
        self.closed_upper_bound
    }

    /// `[v, v]`.
    pub fn is_point(&self) -> bool {
        self.lb == self.ub && self.closed_upper_bound
    }

    /// Neither bound is a sentinel.
    pub fn finite(&self) -> bool {
        self.lb.is_finite() && self.ub.is_finite()
    }

    /// `[-inf, inf]`.
    pub fn is_unbound(&self) -> bool {
        self.lb == Bound::NegInf && self.ub == Bound::PosInf
    }

    /// `ub - lb`, optionally divided by a normalizer. A normalizer that is
    /// zero or negative yields zero.
    pub fn width(&self, normalize: Option<&BigRational>) -> Bound {
        match normalize {
            Some(normalizer) => bound::div(&self.width, normalizer),
            None => self.width.clone(),
        }
    }

    /// Orders two intervals by width.
    pub fn cmp_width(&self, other: &Interval) -> Ordering {
        self.width.cmp(&other.width)
    }

    /// `self` is strictly narrower than `other`.
    pub fn narrower_than(&self, other: &Interval) -> bool {
        self.cmp_width(other) == Ordering::Less
    }

    /// Does the interval include `value`?
    pub fn contains_value(&self, value: &Bound) -> bool {
        let lb_sat = bound::gte(value, &self.lb);
        let ub_sat = if self.closed_upper_bound {
            bound::lte(value, &self.ub)
        } else {
            bound::lt(value, &self.ub)
        };
        lb_sat && ub_sat
    }

    /// Is `other` a subset of `self`? On a shared upper bound, a closed
    /// `other` needs a closed `self`.
    pub fn contains(&self, other: &Interval) -> bool {
        let ub_sat = match other.ub.cmp(&self.ub) {
            Ordering::Less => true,
            Ordering::Equal => self.closed_upper_bound || !other.closed_upper_bound,
            Ordering::Greater => false,
        };
        bound::lte(&self.lb, &other.lb) && ub_sat
    }

    /// No overlap, treating a shared edge as non-overlapping.
    pub fn disjoint(&self, other: &Interval) -> bool {
        bound::lte(&self.ub, &other.lb) || bound::gte(&self.lb, &other.ub)
    }

    /// Either interval holds a bound of the other.
    pub fn intersects(&self, other: &Interval) -> bool {
        self.contains_value(&other.lb)
            || other.contains_value(&self.lb)
            || (self.contains_value(&other.ub) && bound::gt(&other.ub, &self.lb))
            || (other.contains_value(&self.ub) && bound::gt(&self.ub, &other.lb))
    }

    /// The two intervals share exactly one boundary value.
    pub fn meets(&self, other: &Interval) -> bool {
        self.ub == other.lb || self.lb == other.ub
    }

    /// Orders the pair by lower bound, breaking ties with the smaller upper bound.
    fn ordered_pair<'a>(&'a self, other: &'a Interval) -> (&'a Interval, &'a Interval) {
        match self.lb.cmp(&other.lb).then_with(|| self.ub.cmp(&other.ub)) {
            Ordering::Greater => (other, self),
            _ => (self, other),
        }
    }

    /// Overlap of the two intervals, or `None` when they do not overlap.
    ///
    /// Intervals that only share an edge do not overlap, unless one of them
    /// is a point on that edge that the other includes.
    pub fn intersection(&self, other: &Interval) -> Option<Interval> {
        if self == other {
            return Some(Self::from_ordered(
                self.lb.clone(),
                self.ub.clone(),
                self.closed_upper_bound && other.closed_upper_bound,
            ));
        }
        let (first, second) = self.ordered_pair(other);
        match first.ub.cmp(&second.lb) {
            Ordering::Less => return None,
            Ordering::Equal => {
                let shared_point = (first.is_point() || second.is_point())
                    && first.contains_value(&second.lb);
                return shared_point.then(|| Self::from_value(second.lb.clone()));
            }
            Ordering::Greater => {}
        }
        let (ub, closed) = match first.ub.cmp(&second.ub) {
            Ordering::Less => (first.ub.clone(), first.closed_upper_bound),
            Ordering::Greater => (second.ub.clone(), second.closed_upper_bound),
            Ordering::Equal => (
                first.ub.clone(),
                first.closed_upper_bound && second.closed_upper_bound,
            ),
        };
        Some(Self::from_ordered(second.lb.clone(), ub, closed))
    }

    /// Clips the interval to `domain`; `None` when it lies outside.
    pub fn clamp_to(&self, domain: &Interval) -> Option<Interval> {
        self.intersection(domain)
    }

    /// Directional difference keyed on the lower bounds.
    ///
    /// When `self` starts first, the part of `self` below `other.lb` is kept.
    /// When `other` starts first, the part of `self` above `other.ub` is kept.
    /// Only one side is ever removed, so subtracting an interval nested strictly
    /// inside `self` drops the upper remainder. Equal lower bounds and empty
    /// remainders give `None`.
    pub fn subtract(&self, other: &Interval) -> Option<Interval> {
        match self.lb.cmp(&other.lb) {
            Ordering::Less => {
                if bound::lt(&self.ub, &other.lb) {
                    Some(self.clone())
                } else {
                    Some(Self::from_ordered(self.lb.clone(), other.lb.clone(), false))
                }
            }
            Ordering::Greater => match other.ub.cmp(&self.ub) {
                Ordering::Greater => None,
                Ordering::Equal if other.closed_upper_bound || !self.closed_upper_bound => None,
                _ => {
                    let lb = std::cmp::max(&other.ub, &self.lb).clone();
                    Some(Self::from_ordered(
                        lb,
                        self.ub.clone(),
                        self.closed_upper_bound,
                    ))
                }
            },
            Ordering::Equal => None,
        }
    }

    /// Union as a sorted list: one merged interval when the pair overlaps or
    /// touches, otherwise both intervals unchanged.
    pub fn union(&self, other: &Interval) -> Vec<Interval> {
        if self == other {
            return vec![self.clone()];
        }
        let (lower, higher) = self.ordered_pair(other);
        if bound::gte(&lower.ub, &higher.lb) {
            let (ub, closed) = match lower.ub.cmp(&higher.ub) {
                Ordering::Greater => (lower.ub.clone(), lower.closed_upper_bound),
                Ordering::Less => (higher.ub.clone(), higher.closed_upper_bound),
                Ordering::Equal => (
                    lower.ub.clone(),
                    lower.closed_upper_bound || higher.closed_upper_bound,
                ),
            };
            vec![Self::from_ordered(lower.lb.clone(), ub, closed)]
        } else {
            vec![lower.clone(), higher.clone()]
        }
    }

    /// Bisection point.
    ///
    /// With sampled coordinates, the mean of the per-group means is used so the
    /// split follows observed data. Otherwise the arithmetic mean of finite
    /// bounds, `0` for the whole line, and [`BIG_NUMBER`] away from the finite
    /// side of a half-infinite interval.
    pub fn midpoint(&self, points: Option<&[Vec<BigRational>]>) -> BigRational {
        if let Some(groups) = points {
            let means: Vec<BigRational> = groups
                .iter()
                .filter(|group| !group.is_empty())
                .map(|group| mean(group))
                .collect();
            if !means.is_empty() {
                return mean(&means);
            }
        }
        let big = BigRational::from_integer(BigInt::from(BIG_NUMBER));
        match (&self.lb, &self.ub) {
            (Bound::Finite(lb), Bound::Finite(ub)) => {
                (ub - lb) / BigRational::from_integer(BigInt::from(2)) + lb
            }
            (Bound::Finite(lb), _) => lb + big,
            (_, Bound::Finite(ub)) => ub - big,
            _ => BigRational::zero(),
        }
    }

    /// Rescales both bounds by `1 / factor`.
    pub fn normalize(&self, factor: &BigRational) -> Interval {
        Self::from_ordered(
            bound::div(&self.lb, factor),
            bound::div(&self.ub, factor),
            self.closed_upper_bound,
        )
    }
}

fn mean(values: &[BigRational]) -> BigRational {
    let total = values
        .iter()
        .fold(BigRational::zero(), |acc, value| acc + value);
    total / BigRational::from_integer(BigInt::from(values.len()))
}

impl Default for Interval {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.lb == other.lb && self.ub == other.ub
    }
}

impl Eq for Interval {}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.lb.hash(state);
        self.ub.hash(state);
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let close = if self.closed_upper_bound { "]" } else { ")" };
        write!(f, "[{:.5}, {:.5}{close}", self.lb, self.ub)
    }
}
