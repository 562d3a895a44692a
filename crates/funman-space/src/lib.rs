#![deny(missing_docs)]
#![doc = "Parameters, labeled points and boxes, and the parameter space they partition."]

/// Labeled regions and their normalized volume.
pub mod boxes;
/// Human readable account of a labeled space.
pub mod explain;
/// Named parameters and their search roles.
pub mod parameter;
/// Oracle verdicts and concrete assignments.
pub mod point;
/// The labeled partition itself.
pub mod space;

pub use boxes::{BoxReason, ParameterBox};
pub use explain::{Explanation, ExplanationEntry, LabelCounts};
pub use parameter::{Parameter, ParameterKind, ParameterLabel};
pub use point::{Label, Point};
pub use space::ParameterSpace;
