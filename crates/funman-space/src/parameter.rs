use funman_core::{Bound, FunmanError, Interval};
use serde::{Deserialize, Serialize};

/// How a parameter takes part in the analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLabel {
    /// Existentially quantified: some value in range will do, the range is not searched.
    #[default]
    Any,
    /// Synthesized: the admissible sub-ranges are the search target.
    All,
}

/// Whether the parameter is a model quantity or governs model structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    /// Continuous model quantity (rate, initial condition).
    #[default]
    Model,
    /// Structural setting such as a step count.
    Structure,
}

/// A named parameter with its admissible range.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Parameter {
    /// Symbol name used in points and boxes.
    pub name: String,
    /// Lower end of the admissible range.
    #[serde(default = "Bound::neg_inf")]
    pub lb: Bound,
    /// Upper end of the admissible range.
    #[serde(default = "Bound::pos_inf")]
    pub ub: Bound,
    /// Search role.
    #[serde(default)]
    pub label: ParameterLabel,
    /// Model or structure parameter.
    #[serde(default)]
    pub kind: ParameterKind,
}

impl Parameter {
    /// A model parameter.
    pub fn new(name: impl Into<String>, lb: Bound, ub: Bound, label: ParameterLabel) -> Self {
        Self {
            name: name.into(),
            lb,
            ub,
            label,
            kind: ParameterKind::Model,
        }
    }

    /// A structure parameter.
    pub fn structure(name: impl Into<String>, lb: Bound, ub: Bound, label: ParameterLabel) -> Self {
        Self {
            kind: ParameterKind::Structure,
            ..Self::new(name, lb, ub, label)
        }
    }

    /// The same parameter with a different kind.
    pub fn with_kind(mut self, kind: ParameterKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether the parameter's range is searched.
    pub fn is_synthesized(&self) -> bool {
        self.label == ParameterLabel::All
    }

    /// The admissible range as `[lb, ub)`.
    pub fn interval(&self) -> Result<Interval, FunmanError> {
        Interval::half_open(self.lb.clone(), self.ub.clone())
    }
}
