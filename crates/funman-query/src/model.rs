//! Closed set of model kinds a request can carry.
//!
//! Only the capabilities the engine consumes are modeled: the names of the
//! state variables exported as series, and the optional time variable whose
//! series becomes the index of exported frames.

use serde::{Deserialize, Serialize};

/// Transition of a Petri net.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Transition identifier.
    pub id: String,
    /// Consumed states.
    #[serde(default)]
    pub input: Vec<String>,
    /// Produced states.
    #[serde(default)]
    pub output: Vec<String>,
}

/// Stock and flow Petri net.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PetrinetModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// State (stock) names.
    pub states: Vec<String>,
    /// Transitions between states.
    #[serde(default)]
    pub transitions: Vec<Transition>,
    /// Explicit time variable, if the encoding tracks one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Signed edge of a regulatory network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegulatoryEdge {
    /// Regulating vertex.
    pub source: String,
    /// Regulated vertex.
    pub target: String,
    /// Activation (`true`) or inhibition.
    #[serde(default = "default_sign")]
    pub sign: bool,
}

fn default_sign() -> bool {
    true
}

/// Regulatory network.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegnetModel {
    /// Model name.
    #[serde(default)]
    pub name: String,
    /// Vertex names; each vertex is a state variable.
    pub vertices: Vec<String>,
    /// Regulations between vertices.
    #[serde(default)]
    pub edges: Vec<RegulatoryEdge>,
    /// Explicit time variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Bilayer network of state and flux variables.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BilayerModel {
    /// State variables.
    pub state_vars: Vec<String>,
    /// Flux variables.
    #[serde(default)]
    pub flux_vars: Vec<String>,
    /// Explicit time variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Discrete exterior calculus diagram.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecapodeModel {
    /// Diagram variables.
    pub variables: Vec<String>,
    /// Explicit time variable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
}

/// Model supplied directly as a formula.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EncodedModel {
    /// Formula text, opaque to this crate.
    pub formula: String,
    /// Free symbols of the formula.
    #[serde(default)]
    pub free_variables: Vec<String>,
    /// Symbols to export as state series.
    #[serde(default)]
    pub state_variables: Vec<String>,
}

/// Set of models analysed together.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EnsembleModel {
    /// Member models.
    pub models: Vec<Model>,
}

/// Model carried by a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Model {
    /// Petri net.
    Petrinet(PetrinetModel),
    /// Regulatory network.
    Regnet(RegnetModel),
    /// Bilayer network.
    Bilayer(BilayerModel),
    /// Decapode diagram.
    Decapode(DecapodeModel),
    /// Petri net produced by a model generator.
    GeneratedPetrinet(PetrinetModel),
    /// Regulatory network produced by a model generator.
    GeneratedRegnet(RegnetModel),
    /// Pre-encoded formula.
    Encoded(EncodedModel),
    /// Ensemble of member models.
    Ensemble(EnsembleModel),
}

impl Model {
    /// Names of the state variables, in model order. Ensemble members
    /// contribute in turn, without duplicates.
    pub fn state_var_names(&self) -> Vec<String> {
        match self {
            Model::Petrinet(model) | Model::GeneratedPetrinet(model) => model.states.clone(),
            Model::Regnet(model) | Model::GeneratedRegnet(model) => model.vertices.clone(),
            Model::Bilayer(model) => model.state_vars.clone(),
            Model::Decapode(model) => model.variables.clone(),
            Model::Encoded(model) => model.state_variables.clone(),
            Model::Ensemble(ensemble) => {
                let mut names: Vec<String> = Vec::new();
                for name in ensemble.models.iter().flat_map(Model::state_var_names) {
                    if !names.contains(&name) {
                        names.push(name);
                    }
                }
                names
            }
        }
    }

    /// The time variable, if the model tracks one.
    pub fn time_var(&self) -> Option<&str> {
        match self {
            Model::Petrinet(model) | Model::GeneratedPetrinet(model) => model.time.as_deref(),
            Model::Regnet(model) | Model::GeneratedRegnet(model) => model.time.as_deref(),
            Model::Bilayer(model) => model.time.as_deref(),
            Model::Decapode(model) => model.time.as_deref(),
            Model::Encoded(_) => None,
            Model::Ensemble(ensemble) => ensemble.models.iter().find_map(Model::time_var),
        }
    }

    /// Whether the model is an ensemble.
    pub fn is_ensemble(&self) -> bool {
        matches!(self, Model::Ensemble(_))
    }

    /// Short kind name used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Model::Petrinet(_) => "petrinet",
            Model::Regnet(_) => "regnet",
            Model::Bilayer(_) => "bilayer",
            Model::Decapode(_) => "decapode",
            Model::GeneratedPetrinet(_) => "generated_petrinet",
            Model::GeneratedRegnet(_) => "generated_regnet",
            Model::Encoded(_) => "encoded",
            Model::Ensemble(_) => "ensemble",
        }
    }
}
