//! Lifecycle and export of one request's results.
//!
//! [`FunmanResults`] is written by a single scenario runner and read by any
//! number of status pollers. All mutable state sits in one record behind a
//! read-write lock: writers hold the write lock for a whole update or
//! finalization, readers copy out what they need under the read lock.

use std::collections::BTreeMap;
use std::sync::Arc;

use funman_core::serde::{from_json_slice, to_canonical_json_bytes};
use funman_core::{Bound, ErrorInfo, FunmanError, Interpolation, LogContext, SampleStream};
use funman_space::{Explanation, ParameterSpace, Point};
use num_rational::BigRational;
use num_traits::{ToPrimitive, Zero};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize, Serializer};

use crate::frame::DataFrame;
use crate::model::Model;
use crate::request::{FunmanProgress, FunmanWorkRequest, FunmanWorkUnit};
use crate::scenario::{AnalysisScenario, ScenarioResult};
use crate::timeseries::{self, SymbolValues, Timeseries, MAX_TIMEPOINT};

/// Series name of the model clock.
pub const TIMER_VARIABLE: &str = "timer_t";
/// Index name used when the model clock is exported.
pub const TIME_INDEX: &str = "time";

#[derive(Debug, Clone, Default)]
struct ResultsState {
    progress: FunmanProgress,
    done: bool,
    error: bool,
    parameter_space: Option<Arc<ParameterSpace>>,
    finalized: bool,
}

/// Point-in-time copy of a [`FunmanResults`], in the published result shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunmanResultsSnapshot {
    /// Request identifier.
    pub id: String,
    /// Model under analysis.
    pub model: Model,
    /// The request.
    pub request: FunmanWorkRequest,
    /// Coverage and progress.
    pub progress: FunmanProgress,
    /// Terminal state reached.
    pub done: bool,
    /// Terminal state was a failure.
    pub error: bool,
    /// Latest labeled space.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_space: Option<ParameterSpace>,
}

impl FunmanResultsSnapshot {
    /// Reads a snapshot published with [`FunmanResults::to_json_bytes`].
    pub fn from_json_slice(data: &[u8]) -> Result<Self, FunmanError> {
        from_json_slice(data)
    }
}

/// Sampled TRUE and FALSE trajectories of one variable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrajectorySamples {
    /// Frame of sampled TRUE points, restricted to `id`, `label` and the variable.
    pub true_trajectories: Option<DataFrame>,
    /// Frame of sampled FALSE points, same columns.
    pub false_trajectories: Option<DataFrame>,
}

/// Aggregated state of one request.
#[derive(Debug)]
pub struct FunmanResults {
    id: String,
    model: Model,
    request: FunmanWorkRequest,
    state: RwLock<ResultsState>,
    log: LogContext,
}

impl FunmanResults {
    /// Fresh results: no progress, not done, no space.
    pub fn new(id: impl Into<String>, model: Model, request: FunmanWorkRequest) -> Self {
        let id = id.into();
        let log = LogContext::for_request("results", &id, request.verbosity());
        Self {
            id,
            model,
            request,
            state: RwLock::new(ResultsState::default()),
            log,
        }
    }

    /// Fresh results for a queued work unit.
    pub fn from_work_unit(unit: &FunmanWorkUnit) -> Self {
        Self::new(unit.id.clone(), unit.model.clone(), unit.request.clone())
    }

    /// Request identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Model under analysis.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// The request.
    pub fn request(&self) -> &FunmanWorkRequest {
        &self.request
    }

    /// Current progress.
    pub fn progress(&self) -> FunmanProgress {
        self.state.read().progress
    }

    /// Terminal state reached.
    pub fn is_done(&self) -> bool {
        self.state.read().done
    }

    /// Terminal state was a failure.
    pub fn is_error(&self) -> bool {
        self.state.read().error
    }

    /// A finalize call has succeeded.
    pub fn is_final(&self) -> bool {
        self.state.read().finalized
    }

    /// Latest labeled space, shared.
    pub fn parameter_space(&self) -> Option<Arc<ParameterSpace>> {
        self.state.read().parameter_space.clone()
    }

    /// Consistent copy of everything published.
    pub fn snapshot(&self) -> FunmanResultsSnapshot {
        let state = self.state.read().clone();
        FunmanResultsSnapshot {
            id: self.id.clone(),
            model: self.model.clone(),
            request: self.request.clone(),
            progress: state.progress,
            done: state.done,
            error: state.error,
            parameter_space: state
                .parameter_space
                .map(|space| ParameterSpace::clone(&space)),
        }
    }

    /// The snapshot as JSON with sorted keys, so equal states publish equal
    /// bytes.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, FunmanError> {
        to_canonical_json_bytes(&self.snapshot())
    }

    /// Publishes a new labeled space and recomputes coverage.
    ///
    /// `coverage_of_search_space` is the labeled volume over the search
    /// volume, `coverage_of_representable_space` the search volume over the
    /// representable volume; a zero denominator gives `0.0`. Progress tracks
    /// search coverage. Rejected once the results are final.
    pub fn update_parameter_space(
        &self,
        scenario: &AnalysisScenario,
        space: ParameterSpace,
    ) -> Result<FunmanProgress, FunmanError> {
        let mut state = self.state.write();
        if state.finalized {
            return Err(self.already_finalized());
        }
        let progress = self
            .log
            .in_scope(|| apply_update(&mut state, scenario, space))?;
        self.log.debug(format!(
            "coverage {:.4} of search space, {:.4} of representable space",
            progress.coverage_of_search_space, progress.coverage_of_representable_space
        ));
        Ok(progress)
    }

    /// Terminal success: publishes the result's space and marks the results
    /// done with progress `1.0`. Fails when already final or when the result
    /// carries no space; neither failure changes the state.
    pub fn finalize_result(
        &self,
        scenario: &AnalysisScenario,
        result: ScenarioResult,
    ) -> Result<(), FunmanError> {
        let mut state = self.state.write();
        if state.finalized {
            return Err(self.already_finalized());
        }
        let Some(space) = result.into_parameter_space() else {
            self.log.error("scenario result carries no parameter space");
            return Err(FunmanError::Results(
                ErrorInfo::new("missing-parameter-space", "no parameter space for result")
                    .with_context("id", self.id.clone()),
            ));
        };
        self.log
            .in_scope(|| apply_update(&mut state, scenario, space))?;
        state.done = true;
        state.progress.progress = 1.0;
        state.finalized = true;
        self.log.info("results finalized");
        Ok(())
    }

    /// Terminal failure: marks the results done and errored with progress `1.0`.
    pub fn finalize_result_as_error(&self) -> Result<(), FunmanError> {
        let mut state = self.state.write();
        if state.finalized {
            return Err(self.already_finalized());
        }
        state.error = true;
        state.done = true;
        state.progress.progress = 1.0;
        state.finalized = true;
        self.log.warn("results finalized as error");
        Ok(())
    }

    fn already_finalized(&self) -> FunmanError {
        self.log.error("results were already finalized");
        FunmanError::Results(
            ErrorInfo::new("already-finalized", "results were already finalized")
                .with_context("id", self.id.clone()),
        )
    }

    /// Rebuilds the scenario of the request.
    pub fn scenario(&self) -> Result<AnalysisScenario, FunmanError> {
        FunmanWorkUnit::new(self.id.clone(), self.model.clone(), self.request.clone())
            .to_scenario(&self.log.child("dispatch"))
    }

    /// Values the point assigns to each scenario parameter.
    pub fn point_parameters(
        &self,
        point: &Point,
        scenario: Option<&AnalysisScenario>,
    ) -> Result<BTreeMap<String, Bound>, FunmanError> {
        let rebuilt;
        let scenario = match scenario {
            Some(scenario) => scenario,
            None => {
                rebuilt = self.scenario()?;
                &rebuilt
            }
        };
        scenario
            .parameters()
            .iter()
            .map(|parameter| {
                point
                    .value(&parameter.name)
                    .map(|value| (parameter.name.clone(), value.clone()))
                    .ok_or_else(|| {
                        FunmanError::Export(
                            ErrorInfo::new("missing-parameter-value", "point lacks a parameter")
                                .with_context("id", self.id.clone())
                                .with_context("parameter", parameter.name.clone()),
                        )
                    })
            })
            .collect()
    }

    /// All points of the latest space; empty before the first update.
    pub fn points(&self) -> Vec<Point> {
        self.parameter_space()
            .map(|space| space.points())
            .unwrap_or_default()
    }

    /// Explanation of the latest space.
    pub fn explain(&self) -> Explanation {
        self.parameter_space()
            .map(|space| space.explain())
            .unwrap_or_default()
    }

    /// See [`timeseries::symbol_values`].
    pub fn symbol_values(&self, point: &Point, variables: &[&str]) -> SymbolValues {
        timeseries::symbol_values(point, variables, &self.log)
    }

    /// See [`timeseries::symbol_timeseries`].
    pub fn symbol_timeseries(&self, point: &Point, variables: &[&str]) -> Timeseries {
        timeseries::symbol_timeseries(point, variables, &self.log)
    }

    /// One frame per point, concatenated.
    ///
    /// Each frame holds the series of the model's state variables (plus the
    /// clock when the model has a time variable), the point's parameter
    /// values, its label and its position in `points` as `id`. With
    /// `max_time` every frame is reindexed to `0..=max_time` before gaps are
    /// filled. The clock, when exported, replaces the row index as `time`.
    pub fn dataframe(
        &self,
        points: &[Point],
        interpolate: Interpolation,
        max_time: Option<usize>,
    ) -> Result<DataFrame, FunmanError> {
        let scenario = self.scenario()?;
        let model = scenario.model();
        let mut variables = model.state_var_names();
        let timed = model.time_var().is_some();
        if timed {
            variables.push(TIMER_VARIABLE.to_string());
        }
        let variables: Vec<&str> = variables.iter().map(String::as_str).collect();
        if max_time.is_some_and(|max_time| max_time > MAX_TIMEPOINT) {
            self.log
                .warn(format!("max_time is capped at {MAX_TIMEPOINT} timepoints"));
        }

        let mut frames = Vec::with_capacity(points.len());
        let mut untimed = 0;
        for (id, point) in points.iter().enumerate() {
            let mut frame = DataFrame::from_timeseries(&self.symbol_timeseries(point, &variables));
            if let Some(max_time) = max_time {
                frame.reindex_to(max_time);
            }
            frame.fill_numeric("id", Some(id as f64));
            for (name, value) in self.point_parameters(point, Some(&scenario))? {
                frame.fill_numeric(name, value.to_f64());
            }
            frame.fill_text("label", point.label.to_string());
            if interpolate == Interpolation::Linear {
                frame.interpolate_linear();
            }
            if timed && !frame.set_index(TIMER_VARIABLE, TIME_INDEX) {
                untimed += 1;
            }
            frames.push(frame);
        }
        if untimed > 0 && untimed < frames.len() {
            self.log.warn(format!(
                "{untimed} of {} points have no `{TIMER_VARIABLE}` series and keep their step index",
                frames.len()
            ));
        }
        Ok(DataFrame::concat(frames))
    }

    /// Up to `num` TRUE and `num` FALSE points of the latest space, drawn
    /// reproducibly from `seed`, exported as frames of `variable`.
    pub fn trajectory_samples(
        &self,
        variable: &str,
        num: usize,
        seed: u64,
    ) -> Result<TrajectorySamples, FunmanError> {
        let Some(space) = self.parameter_space() else {
            return Ok(TrajectorySamples::default());
        };
        let interpolate = self.request.config().interpolate;
        let export = |points: Vec<Point>| -> Result<Option<DataFrame>, FunmanError> {
            if points.is_empty() {
                return Ok(None);
            }
            let frame = self.dataframe(&points, interpolate, None)?;
            Ok(Some(frame.select(&["id", "label", variable])))
        };
        let true_points = SampleStream::for_substream(seed, 0).sample(&space.true_points, num);
        let false_points = SampleStream::for_substream(seed, 1).sample(&space.false_points, num);
        Ok(TrajectorySamples {
            true_trajectories: export(true_points)?,
            false_trajectories: export(false_points)?,
        })
    }
}

impl Serialize for FunmanResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

fn apply_update(
    state: &mut ResultsState,
    scenario: &AnalysisScenario,
    space: ParameterSpace,
) -> Result<FunmanProgress, FunmanError> {
    let labeled_volume = space.labeled_volume();
    let search_volume = scenario.search_space_volume()?;
    let representable_volume = scenario.representable_space_volume();
    let coverage_of_search_space = ratio(&labeled_volume, &search_volume);
    state.parameter_space = Some(Arc::new(space));
    state.progress = FunmanProgress {
        progress: coverage_of_search_space,
        coverage_of_search_space,
        coverage_of_representable_space: ratio(&search_volume, &representable_volume),
    };
    Ok(state.progress)
}

fn ratio(numerator: &BigRational, denominator: &BigRational) -> f64 {
    if denominator.is_zero() {
        return 0.0;
    }
    (numerator / denominator).to_f64().unwrap_or(0.0)
}
