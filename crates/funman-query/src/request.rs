use funman_core::{FunmanConfig, Verbosity};
use funman_space::Parameter;
use serde::{Deserialize, Serialize};

use crate::model::Model;
use crate::query::{Query, StateVariableConstraint};

/// What the caller asks of a model. Every field is optional.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FunmanWorkRequest {
    /// Property to check; `Query::True` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query: Option<Query>,
    /// Additional state variable constraints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<StateVariableConstraint>>,
    /// Model parameters and their search roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Vec<Parameter>>,
    /// Analysis settings.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<FunmanConfig>,
    /// Structure parameters such as step counts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub structure_parameters: Option<Vec<Parameter>>,
}

impl FunmanWorkRequest {
    /// The request's settings, or the defaults.
    pub fn config(&self) -> FunmanConfig {
        self.config.clone().unwrap_or_default()
    }

    /// Logging threshold requested for this work.
    pub fn verbosity(&self) -> Verbosity {
        self.config
            .as_ref()
            .map(|config| config.verbosity)
            .unwrap_or_default()
    }
}

/// Coverage reported while a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FunmanProgress {
    /// Fraction of the work done, `1.0` once terminal.
    #[serde(default)]
    pub progress: f64,
    /// Labeled volume over search volume.
    #[serde(default)]
    pub coverage_of_search_space: f64,
    /// Search volume over representable volume.
    #[serde(default)]
    pub coverage_of_representable_space: f64,
}

/// A request bound to its model and identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunmanWorkUnit {
    /// Identifier assigned at intake.
    pub id: String,
    /// Progress at the time the unit was queued.
    #[serde(default)]
    pub progress: FunmanProgress,
    /// Model under analysis.
    pub model: Model,
    /// The request.
    pub request: FunmanWorkRequest,
}

impl FunmanWorkUnit {
    /// Binds a request to a model.
    pub fn new(id: impl Into<String>, model: Model, request: FunmanWorkRequest) -> Self {
        Self {
            id: id.into(),
            progress: FunmanProgress::default(),
            model,
            request,
        }
    }
}
