//! Interfaces to the model encoder and the satisfiability oracle.
//!
//! Both collaborators live outside this crate. The only encoder provided here
//! is the pass-through for models that already arrive as formulas.

use std::collections::BTreeMap;

use funman_core::{ErrorInfo, FunmanError};
use serde::{Deserialize, Serialize};

use crate::model::Model;
use crate::scenario::AnalysisScenario;

/// One layer of an encoding: formula text and its free symbols.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodingLayer {
    /// Formula text.
    pub formula: String,
    /// Free symbols, sorted and unique.
    pub free_variables: Vec<String>,
}

/// Layered encoding of a model, one layer per unrolled step.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Encoding {
    /// Layers in step order.
    pub layers: Vec<EncodingLayer>,
}

impl Encoding {
    /// Free symbols over all layers, sorted and unique.
    pub fn free_variables(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .layers
            .iter()
            .flat_map(|layer| layer.free_variables.iter().cloned())
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

/// Translates models into formulas the oracle can check.
pub trait Encoder: Send + Sync {
    /// Encodes the untimed model.
    fn encode_model(&self, model: &Model) -> Result<Encoding, FunmanError>;

    /// Encodes the scenario's model unrolled for `num_steps` steps of `step_size`.
    fn encode_model_timed(
        &self,
        scenario: &AnalysisScenario,
        num_steps: usize,
        step_size: usize,
    ) -> Result<Encoding, FunmanError>;
}

/// Pass-through encoder for [`Model::Encoded`].
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodedEncoder;

impl Encoder for EncodedEncoder {
    fn encode_model(&self, model: &Model) -> Result<Encoding, FunmanError> {
        match model {
            Model::Encoded(encoded) => {
                let mut free_variables = encoded.free_variables.clone();
                free_variables.sort();
                free_variables.dedup();
                Ok(Encoding {
                    layers: vec![EncodingLayer {
                        formula: encoded.formula.clone(),
                        free_variables,
                    }],
                })
            }
            other => Err(FunmanError::Dispatch(
                ErrorInfo::new(
                    "unencodable-model",
                    "pass-through encoder only accepts encoded models",
                )
                .with_context("model", other.kind()),
            )),
        }
    }

    /// Timing is already baked into the formula.
    fn encode_model_timed(
        &self,
        scenario: &AnalysisScenario,
        _num_steps: usize,
        _step_size: usize,
    ) -> Result<Encoding, FunmanError> {
        self.encode_model(scenario.model())
    }
}

/// Verdict of one satisfiability check.
#[derive(Debug, Clone, PartialEq)]
pub enum OracleAnswer {
    /// Satisfiable, with a witness assignment.
    Sat(BTreeMap<String, f64>),
    /// Unsatisfiable.
    Unsat,
}

/// External satisfiability procedure.
pub trait SatisfiabilityOracle: Send + Sync {
    /// Checks `encoding` up to `step_bound` steps. May block for a long time.
    fn check(&self, encoding: &Encoding, step_bound: usize) -> Result<OracleAnswer, FunmanError>;
}
