#![deny(missing_docs)]
#![doc = "Requests, scenarios and result aggregation for the funman engine."]

/// Request classification into scenarios.
pub mod dispatch;
/// Encoder and oracle interfaces.
pub mod encoder;
/// Column store for exported trajectories.
pub mod frame;
/// Model kinds.
pub mod model;
/// Queries and state constraints.
pub mod query;
/// Work requests, units and progress.
pub mod request;
/// Result lifecycle and export.
pub mod results;
/// Consistency and synthesis scenarios.
pub mod scenario;
/// Symbol extraction into series.
pub mod timeseries;

pub use encoder::{EncodedEncoder, Encoder, Encoding, EncodingLayer, OracleAnswer, SatisfiabilityOracle};
pub use frame::{Column, DataFrame};
pub use model::{
    BilayerModel, DecapodeModel, EncodedModel, EnsembleModel, Model, PetrinetModel, RegnetModel,
    RegulatoryEdge, Transition,
};
pub use query::{Query, StateVariableConstraint};
pub use request::{FunmanProgress, FunmanWorkRequest, FunmanWorkUnit};
pub use results::{FunmanResults, FunmanResultsSnapshot, TrajectorySamples};
pub use scenario::{
    AnalysisScenario, ConsistencyScenario, ConsistencyScenarioResult, ParameterSynthesisScenario,
    ParameterSynthesisScenarioResult, ScenarioResult,
};
pub use timeseries::{
    symbol_timeseries, symbol_values, SymbolValues, Timeseries, MAX_TIMEPOINT,
};
