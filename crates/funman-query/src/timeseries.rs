//! Extraction of `<variable>_<timepoint>` symbols into dense series.

use std::collections::BTreeMap;

use funman_core::LogContext;
use funman_space::Point;
use serde::{Deserialize, Serialize};

/// Largest timepoint a series may hold.
pub const MAX_TIMEPOINT: usize = 100_000;

/// Variable name to timepoint to value.
pub type SymbolValues = BTreeMap<String, BTreeMap<usize, f64>>;

/// Dense series over `0..=max_timepoint`; unobserved slots are `None`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Timeseries {
    /// Timepoints.
    pub index: Vec<usize>,
    /// One series per variable, aligned with `index`.
    #[serde(flatten)]
    pub series: BTreeMap<String, Vec<Option<f64>>>,
}

/// Splits at the last underscore. Only digit timepoints are accepted.
fn split_symbol(symbol: &str) -> Option<(&str, &str)> {
    let (name, timepoint) = symbol.rsplit_once('_')?;
    if timepoint.is_empty() || !timepoint.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    Some((name, timepoint))
}

/// Collects the values of every symbol containing `<variable>_` for one of
/// `variables`. Symbols without a digit timepoint are skipped. Timepoints
/// above [`MAX_TIMEPOINT`] and values that do not fit an `f64` are logged
/// and left out.
pub fn symbol_values(point: &Point, variables: &[&str], log: &LogContext) -> SymbolValues {
    let mut values = SymbolValues::new();
    for (symbol, value) in &point.values {
        let requested = variables
            .iter()
            .any(|variable| symbol.contains(&format!("{variable}_")));
        if !requested {
            continue;
        }
        let Some((name, timepoint)) = split_symbol(symbol) else {
            continue;
        };
        let timepoint = match timepoint.parse::<usize>() {
            Ok(timepoint) if timepoint <= MAX_TIMEPOINT => timepoint,
            _ => {
                log.warn(format!("timepoint of `{symbol}` is out of range, skipped"));
                continue;
            }
        };
        let slots = values.entry(name.to_string()).or_default();
        match value.to_f64() {
            Some(converted) => {
                slots.insert(timepoint, converted);
            }
            None => log.warn(format!("value of `{symbol}` overflows f64, skipped")),
        }
    }
    values
}

/// Dense series for `variables`, indexed from 0 to the largest timepoint
/// observed across all of them.
pub fn symbol_timeseries(point: &Point, variables: &[&str], log: &LogContext) -> Timeseries {
    let values = symbol_values(point, variables, log);
    let max_timepoint = values
        .values()
        .filter_map(|slots| slots.keys().next_back().copied())
        .max()
        .unwrap_or(0);
    let series = values
        .into_iter()
        .map(|(name, slots)| {
            let mut dense = vec![None; max_timepoint + 1];
            for (timepoint, value) in slots {
                dense[timepoint] = Some(value);
            }
            (name, dense)
        })
        .collect();
    Timeseries {
        index: (0..=max_timepoint).collect(),
        series,
    }
}
