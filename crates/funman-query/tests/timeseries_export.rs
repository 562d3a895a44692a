use std::collections::BTreeMap;

use funman_core::{Bound, Interpolation, LogContext, Verbosity};
use funman_query::frame::INDEX;
use funman_query::{
    symbol_timeseries, symbol_values, DataFrame, FunmanResults, FunmanWorkRequest, Model,
    ParameterSynthesisScenarioResult, PetrinetModel, ScenarioResult, MAX_TIMEPOINT,
};
use funman_space::{Label, Parameter, ParameterLabel, Point};
use num_bigint::BigInt;
use num_rational::BigRational;

fn log() -> LogContext {
    LogContext::new("export-test", Verbosity::Error)
}

fn point(values: &[(&str, i64)], label: Label) -> Point {
    Point::new(
        values
            .iter()
            .map(|(name, value)| (name.to_string(), Bound::from(*value)))
            .collect(),
        label,
    )
}

fn results(time: Option<&str>) -> FunmanResults {
    let model = Model::Petrinet(PetrinetModel {
        name: "si".to_string(),
        states: vec!["S".to_string(), "I".to_string()],
        transitions: Vec::new(),
        time: time.map(str::to_string),
    });
    let request = FunmanWorkRequest {
        parameters: Some(vec![Parameter::new(
            "beta",
            Bound::from(0),
            Bound::from(10),
            ParameterLabel::All,
        )]),
        ..FunmanWorkRequest::default()
    };
    FunmanResults::new("req-1", model, request)
}

#[test]
fn digit_suffixed_symbols_form_the_series() {
    let mut values = BTreeMap::new();
    values.insert("x_0".to_string(), Bound::from_f64(1.0).unwrap());
    values.insert("x_1".to_string(), Bound::from_f64(2.0).unwrap());
    values.insert("y_bad".to_string(), Bound::from_f64(9.0).unwrap());
    let point = Point::new(values, Label::True);

    let series = symbol_timeseries(&point, &["x"], &log());
    assert_eq!(series.index, vec![0, 1]);
    assert_eq!(series.series.len(), 1);
    assert_eq!(series.series["x"], vec![Some(1.0), Some(2.0)]);

    let json = serde_json::to_value(&series).unwrap();
    assert_eq!(json, serde_json::json!({"index": [0, 1], "x": [1.0, 2.0]}));

    let with_y = symbol_timeseries(&point, &["x", "y"], &log());
    assert!(!with_y.series.contains_key("y"));
}

#[test]
fn unobserved_slots_are_empty() {
    let point = point(&[("S_0", 10), ("S_3", 7), ("I_1", 1), ("beta", 2)], Label::True);
    let series = symbol_timeseries(&point, &["S", "I"], &log());
    assert_eq!(series.index, vec![0, 1, 2, 3]);
    assert_eq!(series.series["S"], vec![Some(10.0), None, None, Some(7.0)]);
    assert_eq!(series.series["I"], vec![None, Some(1.0), None, None]);
}

#[test]
fn overflowing_values_are_skipped() {
    let huge = BigRational::from_integer(BigInt::from(10).pow(400));
    let mut values = BTreeMap::new();
    values.insert("x_0".to_string(), Bound::from(1));
    values.insert("x_1".to_string(), Bound::Finite(huge));
    values.insert("x_2".to_string(), Bound::from(3));
    let point = Point::new(values, Label::True);

    let collected = symbol_values(&point, &["x"], &log());
    assert_eq!(collected["x"].len(), 2);
    let series = symbol_timeseries(&point, &["x"], &log());
    assert_eq!(series.series["x"], vec![Some(1.0), None, Some(3.0)]);
}

#[test]
fn out_of_range_timepoints_are_skipped() {
    let mut values = BTreeMap::new();
    values.insert("x_0".to_string(), Bound::from(1));
    values.insert(format!("x_{}", usize::MAX), Bound::from(2));
    values.insert("x_100000000000000000000000".to_string(), Bound::from(3));
    values.insert(format!("x_{}", MAX_TIMEPOINT + 1), Bound::from(4));
    let point = Point::new(values, Label::True);

    let collected = symbol_values(&point, &["x"], &log());
    assert_eq!(collected["x"].len(), 1);
    let series = symbol_timeseries(&point, &["x"], &log());
    assert_eq!(series.index, vec![0]);
    assert_eq!(series.series["x"], vec![Some(1.0)]);
}

#[test]
fn reindex_is_capped() {
    let mut frame = DataFrame::from_timeseries(&symbol_timeseries(
        &point(&[("S_0", 1)], Label::True),
        &["S"],
        &log(),
    ));
    frame.reindex_to(usize::MAX);
    assert_eq!(frame.len(), MAX_TIMEPOINT + 1);
    assert_eq!(frame.numeric("S").unwrap().len(), MAX_TIMEPOINT + 1);
    assert_eq!(frame.index()[MAX_TIMEPOINT], Some(MAX_TIMEPOINT as f64));
}

#[test]
fn empty_point_yields_single_index() {
    let series = symbol_timeseries(&Point::default(), &["x"], &log());
    assert_eq!(series.index, vec![0]);
    assert!(series.series.is_empty());
}

#[test]
fn dataframe_stacks_points_with_parameters_and_labels() {
    let results = results(None);
    let points = vec![
        point(&[("S_0", 10), ("S_2", 6), ("I_0", 0), ("beta", 2)], Label::True),
        point(&[("S_0", 9), ("I_0", 1), ("I_1", 3), ("beta", 4)], Label::False),
    ];
    let frame = results
        .dataframe(&points, Interpolation::Linear, None)
        .unwrap();
    assert_eq!(frame.index_name(), INDEX);
    assert_eq!(frame.column_names(), vec!["I", "S", "beta", "id", "label"]);
    assert_eq!(frame.len(), 5);
    assert_eq!(
        frame.numeric("S").unwrap(),
        &[Some(10.0), Some(8.0), Some(6.0), Some(9.0), Some(9.0)]
    );
    assert_eq!(
        frame.numeric("I").unwrap(),
        &[Some(0.0), Some(0.0), Some(0.0), Some(1.0), Some(3.0)]
    );
    assert_eq!(frame.numeric("id").unwrap()[3], Some(1.0));
    assert_eq!(frame.numeric("beta").unwrap()[0], Some(2.0));
    assert_eq!(frame.text("label").unwrap()[4].as_deref(), Some("false"));
}

#[test]
fn dataframe_without_interpolation_keeps_gaps() {
    let results = results(None);
    let points = vec![point(&[("S_0", 10), ("S_2", 6), ("beta", 2)], Label::True)];
    let frame = results.dataframe(&points, Interpolation::None, None).unwrap();
    assert_eq!(frame.numeric("S").unwrap(), &[Some(10.0), None, Some(6.0)]);
}

#[test]
fn max_time_reindexes_each_point() {
    let results = results(None);
    let points = vec![point(&[("S_0", 10), ("S_1", 8), ("beta", 2)], Label::True)];
    let frame = results
        .dataframe(&points, Interpolation::Linear, Some(3))
        .unwrap();
    assert_eq!(frame.len(), 4);
    assert_eq!(frame.index()[3], Some(3.0));
    assert_eq!(
        frame.numeric("S").unwrap(),
        &[Some(10.0), Some(8.0), Some(8.0), Some(8.0)]
    );
    let truncated = results
        .dataframe(&points, Interpolation::None, Some(0))
        .unwrap();
    assert_eq!(truncated.len(), 1);
}

#[test]
fn timer_becomes_the_time_index() {
    let results = results(Some("t"));
    let points = vec![point(
        &[("S_0", 10), ("S_1", 8), ("timer_t_0", 0), ("timer_t_1", 5), ("beta", 2)],
        Label::True,
    )];
    let frame = results
        .dataframe(&points, Interpolation::Linear, None)
        .unwrap();
    assert_eq!(frame.index_name(), "time");
    assert_eq!(frame.index(), &[Some(0.0), Some(5.0)]);
    assert!(frame.column("timer_t").is_none());
    assert!(frame.column(INDEX).is_none());
}

#[test]
fn points_without_timer_keep_the_step_index() {
    let results = results(Some("t"));
    let points = vec![
        point(&[("S_0", 10), ("S_1", 8), ("beta", 2)], Label::True),
        point(
            &[("S_0", 4), ("timer_t_0", 0), ("timer_t_1", 5), ("beta", 3)],
            Label::False,
        ),
    ];
    let frame = results
        .dataframe(&points, Interpolation::None, None)
        .unwrap();
    assert_eq!(frame.index_name(), INDEX);
    assert_eq!(frame.len(), 4);
    assert_eq!(frame.index(), &[Some(0.0), Some(1.0), Some(0.0), Some(5.0)]);
    assert!(frame.column("timer_t").is_none());
}

#[test]
fn dataframe_requires_parameter_values() {
    let results = results(None);
    let err = results
        .dataframe(&[point(&[("S_0", 1)], Label::True)], Interpolation::None, None)
        .unwrap_err();
    assert_eq!(err.code(), "missing-parameter-value");
}

#[test]
fn concat_pads_missing_columns() {
    let left = {
        let mut frame = DataFrame::from_timeseries(&symbol_timeseries(
            &point(&[("S_0", 1)], Label::True),
            &["S"],
            &log(),
        ));
        frame.fill_text("label", "true");
        frame
    };
    let right = DataFrame::from_timeseries(&symbol_timeseries(
        &point(&[("I_0", 2), ("I_1", 3)], Label::True),
        &["I"],
        &log(),
    ));
    let combined = DataFrame::concat(vec![left, right]);
    assert_eq!(combined.len(), 3);
    assert_eq!(combined.numeric("S").unwrap(), &[Some(1.0), None, None]);
    assert_eq!(combined.numeric("I").unwrap(), &[None, Some(2.0), Some(3.0)]);
    assert_eq!(combined.text("label").unwrap()[2], None);
    assert!(DataFrame::concat(Vec::new()).is_empty());
}

#[test]
fn trajectory_samples_are_reproducible() {
    let results = results(None);
    let scenario = results.scenario().unwrap();
    let mut space = scenario.new_parameter_space().unwrap();
    for idx in 0..6 {
        space.add_point(point(&[("S_0", idx), ("I_0", 1), ("beta", idx)], Label::True));
    }
    space.add_point(point(&[("S_0", 50), ("I_0", 1), ("beta", 9)], Label::False));
    results
        .finalize_result(
            &scenario,
            ScenarioResult::ParameterSynthesis(ParameterSynthesisScenarioResult {
                parameter_space: Some(space),
            }),
        )
        .unwrap();

    let first = results.trajectory_samples("S", 3, 7).unwrap();
    let again = results.trajectory_samples("S", 3, 7).unwrap();
    assert_eq!(first, again);
    let trues = first.true_trajectories.unwrap();
    assert_eq!(trues.column_names(), vec!["S", "id", "label"]);
    assert_eq!(trues.len(), 3);
    let falses = first.false_trajectories.unwrap();
    assert_eq!(falses.numeric("S").unwrap(), &[Some(50.0)]);

    let empty = FunmanResults::new("req-2", results.model().clone(), FunmanWorkRequest::default());
    let none = empty.trajectory_samples("S", 3, 7).unwrap();
    assert!(none.true_trajectories.is_none());
}
