use funman_core::{ErrorInfo, FunmanError, LogContext};
use funman_space::{Parameter, ParameterKind, ParameterLabel};

use crate::request::FunmanWorkUnit;
use crate::scenario::{AnalysisScenario, ConsistencyScenario, ParameterSynthesisScenario};

impl FunmanWorkUnit {
    /// Classifies the request and builds its scenario.
    ///
    /// Without request parameters, or when every request parameter is
    /// labeled `any`, nothing is synthesized and a consistency check is
    /// built. Otherwise a parameter synthesis scenario is built, which
    /// ensembles do not support.
    ///
    /// The request's settings are validated first; invalid settings fail
    /// with their `Config` error.
    pub fn to_scenario(&self, log: &LogContext) -> Result<AnalysisScenario, FunmanError> {
        let request = &self.request;
        let config = request.config();
        if let Err(err) = config.validate() {
            log.error(format!("request {} carries invalid settings: {err}", self.id));
            return Err(err);
        }
        let query = request.query.clone().unwrap_or_default();
        let constraints = request.constraints.clone().unwrap_or_default();

        let model_parameters = request
            .parameters
            .iter()
            .flatten()
            .map(|parameter| parameter.clone().with_kind(ParameterKind::Model));
        let structure_parameters = request
            .structure_parameters
            .iter()
            .flatten()
            .map(|parameter| parameter.clone().with_kind(ParameterKind::Structure));
        let parameters: Vec<Parameter> = model_parameters.chain(structure_parameters).collect();

        let nothing_synthesized = request.parameters.as_ref().map_or(true, |requested| {
            requested
                .iter()
                .all(|parameter| parameter.label == ParameterLabel::Any)
        });
        if nothing_synthesized {
            log.debug(format!(
                "request {} dispatched to consistency with {} parameters",
                self.id,
                parameters.len()
            ));
            return Ok(AnalysisScenario::Consistency(ConsistencyScenario {
                model: self.model.clone(),
                query,
                parameters,
                constraints,
            }));
        }

        if self.model.is_ensemble() {
            log.error(format!(
                "request {} asks for parameter synthesis over an ensemble",
                self.id
            ));
            return Err(FunmanError::Dispatch(
                ErrorInfo::new(
                    "unsupported-model-kind",
                    "parameter synthesis is not implemented for this model kind",
                )
                .with_context("id", self.id.clone())
                .with_context("model", self.model.kind())
                .with_hint("label every parameter `any` to run a consistency check"),
            ));
        }

        log.debug(format!(
            "request {} dispatched to parameter synthesis with {} parameters",
            self.id,
            parameters.len()
        ));
        Ok(AnalysisScenario::ParameterSynthesis(
            ParameterSynthesisScenario {
                model: self.model.clone(),
                query,
                parameters,
                constraints,
                big_number: config.big_number,
            },
        ))
    }
}
