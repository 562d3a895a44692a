use std::collections::BTreeMap;
use std::fmt;

use funman_core::{Bound, Interval};
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};
use serde::{Deserialize, Serialize};

use crate::point::{Label, Point};

/// Why a region received its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoxReason {
    /// A named query constraint decided the region.
    Constraint {
        /// Constraint name.
        name: String,
    },
    /// The region touches the admissible boundary of a parameter.
    Boundary {
        /// Parameter whose boundary was hit.
        parameter: String,
    },
    /// The region became narrower than the search tolerance.
    Tolerance {
        /// Widest normalized side at the time the search stopped.
        width: Bound,
    },
    /// The region was never handed to the oracle.
    Unchecked,
}

/// A labeled axis-aligned region: one interval per parameter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterBox {
    /// Per-parameter sides.
    pub bounds: BTreeMap<String, Interval>,
    /// Verdict for the region.
    #[serde(default)]
    pub label: Label,
    /// Optional provenance of the verdict.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<BoxReason>,
}

impl ParameterBox {
    /// A region without provenance.
    pub fn new(bounds: BTreeMap<String, Interval>, label: Label) -> Self {
        Self {
            bounds,
            label,
            reason: None,
        }
    }

    /// Attaches a provenance record.
    pub fn with_reason(mut self, reason: BoxReason) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Degenerate region at a point, restricted to `parameters`. Parameters
    /// the point does not assign are left out.
    pub fn from_point<'a>(point: &Point, parameters: impl IntoIterator<Item = &'a str>) -> Self {
        let bounds = parameters
            .into_iter()
            .filter_map(|name| {
                point
                    .value(name)
                    .map(|value| (name.to_string(), Interval::from_value(value.clone())))
            })
            .collect();
        Self::new(bounds, point.label)
    }

    /// Does the point fall inside every side of the region?
    pub fn contains_point(&self, point: &Point) -> bool {
        self.bounds.iter().all(|(name, side)| {
            point
                .value(name)
                .map_or(false, |value| side.contains_value(value))
        })
    }

    /// Fraction of the product of `domains` covered by the region.
    ///
    /// Each side is clipped to its domain and divided by the domain width.
    /// A dimension the region leaves unconstrained covers its whole domain.
    /// An empty domain map has no volume to cover.
    pub fn normalized_volume(&self, domains: &BTreeMap<String, Interval>) -> BigRational {
        if domains.is_empty() {
            return BigRational::zero();
        }
        domains
            .iter()
            .map(|(name, domain)| self.normalized_side(name, domain))
            .fold(BigRational::one(), |acc, factor| acc * factor)
    }

    /// Largest normalized side over `domains`.
    pub fn max_normalized_width(&self, domains: &BTreeMap<String, Interval>) -> BigRational {
        domains
            .iter()
            .map(|(name, domain)| self.normalized_side(name, domain))
            .max()
            .unwrap_or_else(BigRational::zero)
    }

    /// Every normalized side is at most `tolerance`.
    pub fn is_below_tolerance(&self, domains: &BTreeMap<String, Interval>, tolerance: f64) -> bool {
        let widest = self.max_normalized_width(domains);
        widest.to_f64().map_or(false, |width| width <= tolerance)
    }

    fn normalized_side(&self, name: &str, domain: &Interval) -> BigRational {
        let Some(domain_width) = domain.width(None).as_finite().cloned() else {
            return BigRational::zero();
        };
        let side = match self.bounds.get(name) {
            Some(side) => side.clamp_to(domain),
            None => Some(domain.clone()),
        };
        side.and_then(|side| side.width(Some(&domain_width)).as_finite().cloned())
            .unwrap_or_else(BigRational::zero)
    }
}

impl fmt::Display for ParameterBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (idx, (name, side)) in self.bounds.iter().enumerate() {
            if idx > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}: {side}")?;
        }
        write!(f, "}}")
    }
}
