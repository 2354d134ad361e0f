use std::collections::HashMap;

use polars::prelude::*;
use tracing::{info, warn};

use crate::error::Result;
use crate::filters::{date_days, entity_keys, float_values};

/// Fills gaps in every numeric column by linear interpolation over each entity's
/// date-ordered rows. Integer columns come back as `Float64`. Values never cross entity boundaries and nothing is filled before an
/// entity's first observation. Gaps after the last observation carry that value forward.
///
/// The result is grouped by entity (first-appearance order) and date-sorted within each
/// group; rows sharing a date keep their source order. Rows with neither a location nor an
/// ISO code belong to no entity and are dropped.
pub fn interpolate_numeric(df: &DataFrame) -> Result<DataFrame> {
    let groups = entity_row_groups(df)?;
    let grouped_rows: usize = groups.iter().map(Vec::len).sum();
    if grouped_rows < df.height() {
        warn!(
            rows = df.height() - grouped_rows,
            "dropping rows without location or iso_code"
        );
    }
    let order: Vec<IdxSize> = groups
        .iter()
        .flatten()
        .map(|&idx| idx as IdxSize)
        .collect();
    let idx = IdxCa::from_vec("idx".into(), order);
    let mut sorted = df.take(&idx)?;

    let numeric_columns: Vec<PlSmallStr> = sorted
        .get_columns()
        .iter()
        .filter(|column| column.dtype().is_primitive_numeric())
        .map(|column| column.name().clone())
        .collect();

    let mut filled_cells = 0usize;
    for name in &numeric_columns {
        let values = float_values(&sorted, name.as_str())?;
        let mut filled = Vec::with_capacity(values.len());
        let mut start = 0usize;
        for group in &groups {
            let end = start + group.len();
            filled.extend(interpolate_forward(&values[start..end]));
            start = end;
        }
        filled_cells += filled.iter().filter(|v| v.is_some()).count()
            - values.iter().filter(|v| v.is_some()).count();
        sorted.with_column(Series::new(name.clone(), filled))?;
    }

    info!(
        rows = sorted.height(),
        entities = groups.len(),
        filled_cells,
        "interpolated numeric gaps per entity"
    );
    Ok(sorted)
}

/// Row indices per entity in first-appearance order, each group stably sorted by date.
fn entity_row_groups(df: &DataFrame) -> Result<Vec<Vec<usize>>> {
    let keys = entity_keys(df)?;
    let days = date_days(df)?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, Vec<usize>> = HashMap::new();
    for (idx, key) in keys.into_iter().enumerate() {
        let Some(key) = key else {
            continue;
        };
        if !groups.contains_key(&key) {
            order.push(key.clone());
        }
        groups.entry(key).or_default().push(idx);
    }

    Ok(order
        .into_iter()
        .filter_map(|key| groups.remove(&key))
        .map(|mut rows| {
            rows.sort_by_key(|&idx| days[idx]);
            rows
        })
        .collect())
}

/// Linear interpolation by position. Leading gaps stay `None`; trailing gaps take the last
/// observed value.
pub fn interpolate_forward(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = values.to_vec();
    let mut last_seen: Option<(usize, f64)> = None;

    for (idx, value) in values.iter().enumerate() {
        let Some(current) = *value else {
            continue;
        };
        if let Some((prev_idx, prev)) = last_seen {
            let span = (idx - prev_idx) as f64;
            for (step, slot) in out[prev_idx + 1..idx].iter_mut().enumerate() {
                let fraction = (step + 1) as f64 / span;
                *slot = Some(prev + (current - prev) * fraction);
            }
        }
        last_seen = Some((idx, current));
    }

    if let Some((last_idx, last)) = last_seen {
        for slot in out[last_idx + 1..].iter_mut() {
            *slot = Some(last);
        }
    }

    out
}
