use std::collections::BTreeMap;

use funman_core::{Bound, FunmanConfig, FunmanError, Interval, LogContext};
use funman_space::{Label, Parameter, ParameterSpace, Point};
use num_rational::BigRational;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};

use crate::encoder::{Encoder, OracleAnswer, SatisfiabilityOracle};
use crate::model::Model;
use crate::query::{Query, StateVariableConstraint};

/// Single satisfiability check: does any assignment satisfy the query?
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsistencyScenario {
    /// Model under analysis.
    pub model: Model,
    /// Property checked.
    pub query: Query,
    /// Model parameters followed by structure parameters.
    pub parameters: Vec<Parameter>,
    /// Extra state constraints.
    #[serde(default)]
    pub constraints: Vec<StateVariableConstraint>,
}

/// Search over the admissible ranges of the synthesized parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSynthesisScenario {
    /// Model under analysis.
    pub model: Model,
    /// Property checked.
    pub query: Query,
    /// Model parameters followed by structure parameters.
    pub parameters: Vec<Parameter>,
    /// Extra state constraints.
    #[serde(default)]
    pub constraints: Vec<StateVariableConstraint>,
    /// Half-width of each synthesized parameter's representable domain.
    pub big_number: i64,
}

/// Scenario built from a work unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum AnalysisScenario {
    /// Consistency check.
    Consistency(ConsistencyScenario),
    /// Parameter synthesis.
    ParameterSynthesis(ParameterSynthesisScenario),
}

impl AnalysisScenario {
    /// Model under analysis.
    pub fn model(&self) -> &Model {
        match self {
            AnalysisScenario::Consistency(scenario) => &scenario.model,
            AnalysisScenario::ParameterSynthesis(scenario) => &scenario.model,
        }
    }

    /// Property checked.
    pub fn query(&self) -> &Query {
        match self {
            AnalysisScenario::Consistency(scenario) => &scenario.query,
            AnalysisScenario::ParameterSynthesis(scenario) => &scenario.query,
        }
    }

    /// All parameters, model parameters first.
    pub fn parameters(&self) -> &[Parameter] {
        match self {
            AnalysisScenario::Consistency(scenario) => &scenario.parameters,
            AnalysisScenario::ParameterSynthesis(scenario) => &scenario.parameters,
        }
    }

    /// Extra state constraints.
    pub fn constraints(&self) -> &[StateVariableConstraint] {
        match self {
            AnalysisScenario::Consistency(scenario) => &scenario.constraints,
            AnalysisScenario::ParameterSynthesis(scenario) => &scenario.constraints,
        }
    }

    /// Whether this is a consistency check.
    pub fn is_consistency(&self) -> bool {
        matches!(self, AnalysisScenario::Consistency(_))
    }

    /// Parameters whose range is searched. Consistency checks search none.
    pub fn synthesized_parameters(&self) -> Vec<&Parameter> {
        match self {
            AnalysisScenario::Consistency(_) => Vec::new(),
            AnalysisScenario::ParameterSynthesis(scenario) => scenario
                .parameters
                .iter()
                .filter(|parameter| parameter.is_synthesized())
                .collect(),
        }
    }

    /// `[-big_number, big_number]` for every synthesized parameter.
    pub fn representable_domains(&self) -> BTreeMap<String, Interval> {
        let AnalysisScenario::ParameterSynthesis(scenario) = self else {
            return BTreeMap::new();
        };
        let big = Bound::from(scenario.big_number);
        self.synthesized_parameters()
            .into_iter()
            .filter_map(|parameter| {
                Interval::closed(big.neg(), big.clone())
                    .ok()
                    .map(|domain| (parameter.name.clone(), domain))
            })
            .collect()
    }

    /// Volume of the synthesized parameters' ranges as a fraction of their
    /// representable domains. Zero when nothing is searched.
    pub fn search_space_volume(&self) -> Result<BigRational, FunmanError> {
        let domains = self.representable_domains();
        if domains.is_empty() {
            return Ok(BigRational::zero());
        }
        let mut volume = BigRational::one();
        for parameter in self.synthesized_parameters() {
            let Some(domain) = domains.get(&parameter.name) else {
                continue;
            };
            let domain_width = domain.width(None);
            let factor = parameter
                .interval()?
                .clamp_to(domain)
                .and_then(|side| {
                    domain_width
                        .as_finite()
                        .and_then(|width| side.width(Some(width)).as_finite().cloned())
                })
                .unwrap_or_else(BigRational::zero);
            volume *= factor;
        }
        Ok(volume)
    }

    /// Volume of the representable domains in the same normalized units:
    /// one when anything is searched, zero otherwise.
    pub fn representable_space_volume(&self) -> BigRational {
        if self.representable_domains().is_empty() {
            BigRational::zero()
        } else {
            BigRational::one()
        }
    }

    /// Empty space whose domains are the representable domains.
    pub fn new_parameter_space(&self) -> Result<ParameterSpace, FunmanError> {
        ParameterSpace::with_domains(self.representable_domains())
    }
}

impl ConsistencyScenario {
    /// Runs the single check: encode, ask the oracle, record the witness.
    pub fn check(
        &self,
        encoder: &dyn Encoder,
        oracle: &dyn SatisfiabilityOracle,
        config: &FunmanConfig,
        log: &LogContext,
    ) -> Result<ScenarioResult, FunmanError> {
        let scenario = AnalysisScenario::Consistency(self.clone());
        let encoding = encoder.encode_model_timed(&scenario, config.num_steps, config.step_size)?;
        log.debug(format!(
            "checking consistency over {} layers, {} free symbols",
            encoding.layers.len(),
            encoding.free_variables().len()
        ));
        let mut parameter_space = scenario.new_parameter_space()?;
        let consistent = match oracle.check(&encoding, config.num_steps)? {
            OracleAnswer::Sat(assignment) => {
                let point = Point::from_assignment(&assignment, Label::True)?;
                parameter_space.add_point(point.clone());
                log.info("model is consistent with the query");
                Some(point)
            }
            OracleAnswer::Unsat => {
                log.info("model is inconsistent with the query");
                None
            }
        };
        Ok(ScenarioResult::Consistency(ConsistencyScenarioResult {
            consistent,
            parameter_space: Some(parameter_space),
        }))
    }
}

/// Outcome of a consistency check.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConsistencyScenarioResult {
    /// Witness assignment when consistent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistent: Option<Point>,
    /// Space holding the witness.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_space: Option<ParameterSpace>,
}

/// Outcome of a parameter synthesis search.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ParameterSynthesisScenarioResult {
    /// The labeled space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_space: Option<ParameterSpace>,
}

/// Outcome of either scenario kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scenario", rename_all = "snake_case")]
pub enum ScenarioResult {
    /// Consistency outcome.
    Consistency(ConsistencyScenarioResult),
    /// Synthesis outcome.
    ParameterSynthesis(ParameterSynthesisScenarioResult),
}

impl ScenarioResult {
    /// The labeled space carried by the result, if any.
    pub fn into_parameter_space(self) -> Option<ParameterSpace> {
        match self {
            ScenarioResult::Consistency(result) => result.parameter_space,
            ScenarioResult::ParameterSynthesis(result) => result.parameter_space,
        }
    }
}
