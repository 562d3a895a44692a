use std::collections::BTreeMap;

use funman_query::{DataFrame, Timeseries};
use proptest::prelude::*;

fn frame(cells: Vec<Option<f64>>) -> DataFrame {
    let mut series = BTreeMap::new();
    let index = (0..cells.len()).collect();
    series.insert("x".to_string(), cells);
    DataFrame::from_timeseries(&Timeseries { index, series })
}

proptest! {
    #[test]
    fn interpolation_keeps_observations(cells in prop::collection::vec(prop::option::of(-1e6f64..1e6), 1..40)) {
        let mut filled = frame(cells.clone());
        filled.interpolate_linear();
        let after = filled.numeric("x").unwrap();
        let first_seen = cells.iter().position(Option::is_some);
        for (position, (before, after)) in cells.iter().zip(after).enumerate() {
            match before {
                Some(value) => prop_assert_eq!(Some(*value), *after),
                None => match first_seen {
                    Some(first) if position > first => prop_assert!(after.is_some()),
                    _ => prop_assert!(after.is_none()),
                },
            }
        }
    }

    #[test]
    fn interior_fill_stays_between_neighbours(lo in -1e3f64..1e3, hi in -1e3f64..1e3, gap in 1usize..10) {
        let mut cells = vec![None; gap + 2];
        cells[0] = Some(lo);
        cells[gap + 1] = Some(hi);
        let mut filled = frame(cells);
        filled.interpolate_linear();
        let (min, max) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        for cell in filled.numeric("x").unwrap() {
            let value = cell.unwrap();
            prop_assert!(value >= min - 1e-9 && value <= max + 1e-9);
        }
    }
}
