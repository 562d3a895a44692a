use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boxes::{BoxReason, ParameterBox};
use crate::point::Label;

/// Number of labeled regions and samples in a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LabelCounts {
    /// Boxes labeled true.
    pub true_boxes: usize,
    /// Boxes labeled false.
    pub false_boxes: usize,
    /// Boxes without a verdict.
    pub unknown_boxes: usize,
    /// Points labeled true.
    pub true_points: usize,
    /// Points labeled false.
    pub false_points: usize,
    /// Points without a verdict.
    pub unknown_points: usize,
}

/// One region and the reason it carries its label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplanationEntry {
    /// Verdict of the region.
    pub label: Label,
    /// Rendered region.
    pub region: String,
    /// Rendered reason.
    pub reason: String,
}

impl ExplanationEntry {
    pub(crate) fn for_box(region: &ParameterBox) -> Self {
        Self {
            label: region.label,
            region: region.to_string(),
            reason: describe(region.label, region.reason.as_ref()),
        }
    }
}

/// Human readable account of how a space was labeled.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Explanation {
    /// Region counts.
    pub counts: LabelCounts,
    /// Per-box entries, true boxes first.
    pub entries: Vec<ExplanationEntry>,
}

impl Explanation {
    /// One-line tally.
    pub fn summary(&self) -> String {
        let c = &self.counts;
        format!(
            "{} true, {} false, {} unknown boxes; {} true, {} false, {} unknown points",
            c.true_boxes,
            c.false_boxes,
            c.unknown_boxes,
            c.true_points,
            c.false_points,
            c.unknown_points
        )
    }
}

impl fmt::Display for Explanation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for entry in &self.entries {
            writeln!(f, "  [{}] {}: {}", entry.label, entry.region, entry.reason)?;
        }
        Ok(())
    }
}

fn describe(label: Label, reason: Option<&BoxReason>) -> String {
    match reason {
        Some(BoxReason::Constraint { name }) => format!("decided by constraint `{name}`"),
        Some(BoxReason::Boundary { parameter }) => {
            format!("lies on the admissible boundary of `{parameter}`")
        }
        Some(BoxReason::Tolerance { width }) => {
            format!("narrower than tolerance (widest side {width:.5}), search stopped")
        }
        Some(BoxReason::Unchecked) => "never checked".to_string(),
        None => match label {
            Label::Unknown => "no verdict recorded".to_string(),
            _ => "oracle verdict".to_string(),
        },
    }
}
