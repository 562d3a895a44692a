use std::collections::BTreeMap;
use std::fmt;

use funman_core::{Bound, FunmanError};
use serde::{Deserialize, Serialize};

/// Verdict of the oracle for a point or region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    /// The query holds.
    True,
    /// The query is violated.
    False,
    /// No verdict.
    #[default]
    Unknown,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Label::True => "true",
            Label::False => "false",
            Label::Unknown => "unknown",
        })
    }
}

/// One concrete assignment returned by the oracle.
///
/// Keys are symbol names; time-indexed state symbols follow
/// `<variable>_<timepoint>`, parameters use their plain name.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Symbol name to assigned value.
    #[serde(default)]
    pub values: BTreeMap<String, Bound>,
    /// Verdict for the assignment.
    #[serde(default)]
    pub label: Label,
}

impl Point {
    /// Builds a point from exact values.
    pub fn new(values: BTreeMap<String, Bound>, label: Label) -> Self {
        Self { values, label }
    }

    /// Builds a point from a float assignment.
    pub fn from_assignment<'a, I>(assignment: I, label: Label) -> Result<Self, FunmanError>
    where
        I: IntoIterator<Item = (&'a String, &'a f64)>,
    {
        let values = assignment
            .into_iter()
            .map(|(symbol, value)| Ok((symbol.clone(), Bound::from_f64(*value)?)))
            .collect::<Result<BTreeMap<_, _>, FunmanError>>()?;
        Ok(Self { values, label })
    }

    /// Value assigned to `symbol`.
    pub fn value(&self, symbol: &str) -> Option<&Bound> {
        self.values.get(symbol)
    }

    /// The same assignment with another verdict.
    pub fn relabel(mut self, label: Label) -> Self {
        self.label = label;
        self
    }
}
