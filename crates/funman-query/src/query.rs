use funman_core::{Bound, Interval};
use serde::{Deserialize, Serialize};

/// Property checked against the model's trajectories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Query {
    /// Always satisfied; reduces a check to model consistency.
    #[default]
    True,
    /// `variable <= ub` at every step, or only at the last one.
    Le {
        /// State variable.
        variable: String,
        /// Upper bound.
        ub: Bound,
        /// Check only the final timepoint.
        #[serde(default)]
        at_end: bool,
    },
    /// Conjunction.
    And {
        /// Conjuncts.
        queries: Vec<Query>,
    },
    /// Opaque predicate evaluated by the encoder.
    Function {
        /// Predicate source.
        function: String,
    },
}

impl Query {
    /// State variables named anywhere in the query, in first-mention order.
    pub fn variables(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_variables(&mut names);
        names
    }

    fn collect_variables<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Query::Le { variable, .. } => {
                if !names.contains(&variable.as_str()) {
                    names.push(variable);
                }
            }
            Query::And { queries } => {
                for query in queries {
                    query.collect_variables(names);
                }
            }
            Query::True | Query::Function { .. } => {}
        }
    }
}

/// Bound on a state variable over the whole trajectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateVariableConstraint {
    /// Constraint name, reported in explanations.
    pub name: String,
    /// Constrained state variable.
    pub variable: String,
    /// Admissible values.
    #[serde(default)]
    pub interval: Interval,
    /// Soft constraints may be relaxed by the search.
    #[serde(default)]
    pub soft: bool,
}
