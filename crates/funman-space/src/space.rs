use std::collections::BTreeMap;

use funman_core::{ErrorInfo, FunmanError, Interval};
use num_rational::BigRational;
use num_traits::{Signed, Zero};
use serde::{Deserialize, Serialize};

use crate::boxes::ParameterBox;
use crate::explain::{Explanation, ExplanationEntry, LabelCounts};
use crate::point::{Label, Point};

/// Labeled partition of the synthesized parameters' domain.
///
/// Boxes and sample points are kept per label. `domains` records the region
/// the boxes are meant to cover; it normalizes [`ParameterSpace::labeled_volume`].
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterSpace {
    /// Regions where the query holds.
    #[serde(default)]
    pub true_boxes: Vec<ParameterBox>,
    /// Regions where the query fails.
    #[serde(default)]
    pub false_boxes: Vec<ParameterBox>,
    /// Regions without a verdict.
    #[serde(default)]
    pub unknown_boxes: Vec<ParameterBox>,
    /// Samples where the query holds.
    #[serde(default)]
    pub true_points: Vec<Point>,
    /// Samples where the query fails.
    #[serde(default)]
    pub false_points: Vec<Point>,
    /// Samples without a verdict.
    #[serde(default)]
    pub unknown_points: Vec<Point>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    domains: BTreeMap<String, Interval>,
}

impl ParameterSpace {
    /// An empty space with no domain.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty space covering `domains`. Every domain must be finite and
    /// of positive width.
    pub fn with_domains(domains: BTreeMap<String, Interval>) -> Result<Self, FunmanError> {
        for (name, domain) in &domains {
            let positive = domain
                .width(None)
                .as_finite()
                .map_or(false, |width| width.is_positive());
            if !domain.finite() || !positive {
                return Err(FunmanError::Space(
                    ErrorInfo::new("unbounded-domain", "domain must be finite and non-degenerate")
                        .with_context("parameter", name.clone())
                        .with_context("domain", domain.to_string()),
                ));
            }
        }
        Ok(Self {
            domains,
            ..Self::default()
        })
    }

    /// The region the boxes are normalized against.
    pub fn domains(&self) -> &BTreeMap<String, Interval> {
        &self.domains
    }

    /// Files a box under its label.
    pub fn add_box(&mut self, region: ParameterBox) {
        match region.label {
            Label::True => self.true_boxes.push(region),
            Label::False => self.false_boxes.push(region),
            Label::Unknown => self.unknown_boxes.push(region),
        }
    }

    /// Files a point under its label.
    pub fn add_point(&mut self, point: Point) {
        match point.label {
            Label::True => self.true_points.push(point),
            Label::False => self.false_points.push(point),
            Label::Unknown => self.unknown_points.push(point),
        }
    }

    /// Moves every box and point of `other` into `self`. Domains of `other`
    /// fill in names `self` does not already cover.
    pub fn append(&mut self, other: ParameterSpace) {
        let ParameterSpace {
            true_boxes,
            false_boxes,
            unknown_boxes,
            true_points,
            false_points,
            unknown_points,
            domains,
        } = other;
        self.true_boxes.extend(true_boxes);
        self.false_boxes.extend(false_boxes);
        self.unknown_boxes.extend(unknown_boxes);
        self.true_points.extend(true_points);
        self.false_points.extend(false_points);
        self.unknown_points.extend(unknown_points);
        for (name, domain) in domains {
            self.domains.entry(name).or_insert(domain);
        }
    }

    /// Fraction of the domain covered by true boxes. Sample points are
    /// degenerate and add nothing. Zero when no domain is recorded.
    pub fn labeled_volume(&self) -> BigRational {
        self.true_boxes
            .iter()
            .map(|region| region.normalized_volume(&self.domains))
            .fold(BigRational::zero(), |acc, volume| acc + volume)
    }

    /// All sample points: true, then false, then unknown.
    pub fn points(&self) -> Vec<Point> {
        self.true_points
            .iter()
            .chain(&self.false_points)
            .chain(&self.unknown_points)
            .cloned()
            .collect()
    }

    /// All boxes: true, then false, then unknown.
    pub fn boxes(&self) -> impl Iterator<Item = &ParameterBox> {
        self.true_boxes
            .iter()
            .chain(&self.false_boxes)
            .chain(&self.unknown_boxes)
    }

    /// Tally of boxes and points per label.
    pub fn counts(&self) -> LabelCounts {
        LabelCounts {
            true_boxes: self.true_boxes.len(),
            false_boxes: self.false_boxes.len(),
            unknown_boxes: self.unknown_boxes.len(),
            true_points: self.true_points.len(),
            false_points: self.false_points.len(),
            unknown_points: self.unknown_points.len(),
        }
    }

    /// No boxes and no points.
    pub fn is_empty(&self) -> bool {
        self.boxes().next().is_none()
            && self.true_points.is_empty()
            && self.false_points.is_empty()
            && self.unknown_points.is_empty()
    }

    /// Per-box account of the labeling.
    pub fn explain(&self) -> Explanation {
        Explanation {
            counts: self.counts(),
            entries: self.boxes().map(ExplanationEntry::for_box).collect(),
        }
    }
}
