//! Small column store for exported trajectories.
//!
//! A frame has one index column and any number of named columns, kept in
//! name order. Missing cells are `None`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::timeseries::{Timeseries, MAX_TIMEPOINT};

/// Default index name.
pub const INDEX: &str = "index";

/// Typed column of a [`DataFrame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "lowercase")]
pub enum Column {
    /// Floating point cells.
    Numeric(Vec<Option<f64>>),
    /// Text cells.
    Text(Vec<Option<String>>),
}

impl Column {
    /// Number of cells.
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(cells) => cells.len(),
            Column::Text(cells) => cells.len(),
        }
    }

    /// No cells.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Numeric cells, if numeric.
    pub fn as_numeric(&self) -> Option<&[Option<f64>]> {
        match self {
            Column::Numeric(cells) => Some(cells),
            Column::Text(_) => None,
        }
    }

    /// Text cells, if text.
    pub fn as_text(&self) -> Option<&[Option<String>]> {
        match self {
            Column::Text(cells) => Some(cells),
            Column::Numeric(_) => None,
        }
    }

    fn resize(&mut self, len: usize) {
        match self {
            Column::Numeric(cells) => cells.resize(len, None),
            Column::Text(cells) => cells.resize(len, None),
        }
    }

    fn empty_like(&self, len: usize) -> Column {
        match self {
            Column::Numeric(_) => Column::Numeric(vec![None; len]),
            Column::Text(_) => Column::Text(vec![None; len]),
        }
    }

    fn append(&mut self, other: Column) {
        match (self, other) {
            (Column::Numeric(cells), Column::Numeric(more)) => cells.extend(more),
            (Column::Text(cells), Column::Text(more)) => cells.extend(more),
            (Column::Numeric(cells), Column::Text(more)) => {
                cells.extend(more.iter().map(|_| None));
            }
            (Column::Text(cells), Column::Numeric(more)) => {
                cells.extend(more.iter().map(|value| value.map(|v| v.to_string())));
            }
        }
    }
}

/// Indexed table of columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFrame {
    index_name: String,
    index: Vec<Option<f64>>,
    columns: BTreeMap<String, Column>,
}

impl Default for DataFrame {
    fn default() -> Self {
        Self {
            index_name: INDEX.to_string(),
            index: Vec::new(),
            columns: BTreeMap::new(),
        }
    }
}

impl DataFrame {
    /// Frame with the series as numeric columns and timepoints as index.
    pub fn from_timeseries(timeseries: &Timeseries) -> Self {
        Self {
            index_name: INDEX.to_string(),
            index: timeseries
                .index
                .iter()
                .map(|timepoint| Some(*timepoint as f64))
                .collect(),
            columns: timeseries
                .series
                .iter()
                .map(|(name, cells)| (name.clone(), Column::Numeric(cells.clone())))
                .collect(),
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// No rows.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Name of the index column.
    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Index values.
    pub fn index(&self) -> &[Option<f64>] {
        &self.index
    }

    /// Column names in sorted order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    /// Column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    /// Numeric column by name.
    pub fn numeric(&self, name: &str) -> Option<&[Option<f64>]> {
        self.column(name).and_then(Column::as_numeric)
    }

    /// Text column by name.
    pub fn text(&self, name: &str) -> Option<&[Option<String>]> {
        self.column(name).and_then(Column::as_text)
    }

    /// Sets a numeric column to `value` on every row.
    pub fn fill_numeric(&mut self, name: impl Into<String>, value: Option<f64>) {
        self.columns
            .insert(name.into(), Column::Numeric(vec![value; self.len()]));
    }

    /// Sets a text column to `value` on every row.
    pub fn fill_text(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        self.columns
            .insert(name.into(), Column::Text(vec![Some(value); self.len()]));
    }

    /// Truncates or pads to `0..=max_index` rows, with `max_index` capped at
    /// [`MAX_TIMEPOINT`]. Padded rows are empty.
    pub fn reindex_to(&mut self, max_index: usize) {
        let len = max_index.min(MAX_TIMEPOINT) + 1;
        let current = self.index.len();
        self.index.truncate(len);
        self.index
            .extend((current..len).map(|position| Some(position as f64)));
        for column in self.columns.values_mut() {
            column.resize(len);
        }
    }

    /// Fills numeric gaps: interior gaps linearly by row position, trailing
    /// gaps with the last observed value. Leading gaps stay empty.
    pub fn interpolate_linear(&mut self) {
        for column in self.columns.values_mut() {
            if let Column::Numeric(cells) = column {
                interpolate_cells(cells);
            }
        }
    }

    /// Promotes a numeric column to the index under `index_name`, dropping
    /// the previous index. Returns whether the column existed.
    pub fn set_index(&mut self, column: &str, index_name: &str) -> bool {
        if !matches!(self.columns.get(column), Some(Column::Numeric(_))) {
            return false;
        }
        if let Some(Column::Numeric(cells)) = self.columns.remove(column) {
            self.index = cells;
            self.index_name = index_name.to_string();
        }
        true
    }

    /// Frame restricted to the named columns that exist.
    pub fn select(&self, names: &[&str]) -> DataFrame {
        DataFrame {
            index_name: self.index_name.clone(),
            index: self.index.clone(),
            columns: self
                .columns
                .iter()
                .filter(|(name, _)| names.contains(&name.as_str()))
                .map(|(name, column)| (name.clone(), column.clone()))
                .collect(),
        }
    }

    /// Stacks frames row-wise. A column missing from some frame is empty on
    /// that frame's rows. The index name is taken from the first frame.
    pub fn concat(frames: Vec<DataFrame>) -> DataFrame {
        let mut frames = frames.into_iter();
        let Some(mut combined) = frames.next() else {
            return DataFrame::default();
        };
        for frame in frames {
            let rows = frame.len();
            let before = combined.len();
            let DataFrame {
                index, mut columns, ..
            } = frame;
            let names: BTreeSet<String> = combined
                .columns
                .keys()
                .chain(columns.keys())
                .cloned()
                .collect();
            for name in names {
                let incoming = columns.remove(&name);
                match combined.columns.get_mut(&name) {
                    Some(existing) => {
                        let incoming = incoming.unwrap_or_else(|| existing.empty_like(rows));
                        existing.append(incoming);
                    }
                    None => {
                        if let Some(incoming) = incoming {
                            let mut padded = incoming.empty_like(before);
                            padded.append(incoming);
                            combined.columns.insert(name, padded);
                        }
                    }
                }
            }
            combined.index.extend(index);
        }
        combined
    }
}

fn interpolate_cells(cells: &mut [Option<f64>]) {
    let mut last_seen: Option<(usize, f64)> = None;
    for position in 0..cells.len() {
        let Some(value) = cells[position] else {
            continue;
        };
        if let Some((start, from)) = last_seen {
            let span = (position - start) as f64;
            for gap in start + 1..position {
                let fraction = (gap - start) as f64 / span;
                cells[gap] = Some(from + (value - from) * fraction);
            }
        }
        last_seen = Some((position, value));
    }
    if let Some((start, value)) = last_seen {
        for cell in cells.iter_mut().skip(start + 1) {
            *cell = Some(value);
        }
    }
}
