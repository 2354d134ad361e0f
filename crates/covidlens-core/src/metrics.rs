use std::collections::hash_map::Entry;
use std::collections::HashMap;

use polars::prelude::*;
use tracing::info;

use crate::error::Result;
use crate::filters::{date_days, entity_keys, float_values};
use crate::schema::{
    CASES_PER_100K, DEATH_RATE, PCT_VACCINATED, PEOPLE_UNVACCINATED, PEOPLE_VACCINATED,
    POPULATION, TOTAL_CASES, TOTAL_DEATHS, VACCINATION_RATE,
};

const PERCENT: f64 = 100.0;
const PER_100K: f64 = 100_000.0;

/// `numerator / denominator`, or `None` when either side is missing, the denominator is
/// zero, or the quotient is not finite.
pub fn safe_ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d).filter(|v| v.is_finite()),
        _ => None,
    }
}

/// Adds `death_rate = total_deaths / total_cases`. Zero or missing case counts give null.
/// Integer counts are accepted.
pub fn derive_death_rate(df: &DataFrame) -> Result<DataFrame> {
    let deaths = float_values(df, TOTAL_DEATHS)?;
    let cases = float_values(df, TOTAL_CASES)?;

    let death_rate: Vec<Option<f64>> = deaths
        .into_iter()
        .zip(cases)
        .map(|(d, c)| safe_ratio(d, c))
        .collect();

    let mut output = df.clone();
    output.with_column(Series::new(DEATH_RATE.into(), death_rate))?;
    Ok(output)
}

/// One row per entity: the row with the greatest date, the later source row winning ties.
/// Entities appear in first-appearance order. Rows with neither a location nor an ISO code
/// are skipped. Vaccination and incidence ratios are appended.
pub fn latest_per_entity(df: &DataFrame) -> Result<DataFrame> {
    let keys = entity_keys(df)?;
    let days = date_days(df)?;

    let mut order: Vec<String> = Vec::new();
    let mut latest: HashMap<String, usize> = HashMap::new();
    for (idx, key) in keys.into_iter().enumerate() {
        let Some(key) = key else {
            continue;
        };
        match latest.entry(key) {
            Entry::Occupied(mut best) => {
                if days[idx] >= days[*best.get()] {
                    best.insert(idx);
                }
            }
            Entry::Vacant(slot) => {
                order.push(slot.key().clone());
                slot.insert(idx);
            }
        }
    }

    let picked: Vec<IdxSize> = order
        .iter()
        .filter_map(|key| latest.get(key))
        .map(|&idx| idx as IdxSize)
        .collect();
    let snapshot = df.take(&IdxCa::from_vec("idx".into(), picked))?;
    let snapshot = append_population_ratios(&snapshot)?;

    info!(entities = snapshot.height(), "selected latest row per entity");
    Ok(snapshot)
}

fn append_population_ratios(df: &DataFrame) -> Result<DataFrame> {
    let vaccinated = float_values(df, PEOPLE_VACCINATED)?;
    let population = float_values(df, POPULATION)?;
    let cases = float_values(df, TOTAL_CASES)?;

    let len = df.height();
    let mut pct_vaccinated = Vec::with_capacity(len);
    let mut cases_per_100k = Vec::with_capacity(len);
    let mut vaccination_rate = Vec::with_capacity(len);
    let mut unvaccinated = Vec::with_capacity(len);

    for idx in 0..len {
        let vax = vaccinated[idx];
        let pop = population[idx];

        let share = safe_ratio(vax, pop).map(|v| v * PERCENT);
        pct_vaccinated.push(share);
        vaccination_rate.push(share);
        cases_per_100k.push(safe_ratio(cases[idx], pop).map(|v| v * PER_100K));
        unvaccinated.push(match (pop, vax) {
            (Some(p), Some(v)) => Some(p - v),
            _ => None,
        });
    }

    let mut output = df.clone();
    output.with_column(Series::new(PCT_VACCINATED.into(), pct_vaccinated))?;
    output.with_column(Series::new(CASES_PER_100K.into(), cases_per_100k))?;
    output.with_column(Series::new(VACCINATION_RATE.into(), vaccination_rate))?;
    output.with_column(Series::new(PEOPLE_UNVACCINATED.into(), unvaccinated))?;
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::safe_ratio;

    #[test]
    fn ratio_is_undefined_for_zero_or_missing_denominator() {
        assert_eq!(safe_ratio(Some(3.0), Some(4.0)), Some(0.75));
        assert_eq!(safe_ratio(Some(0.0), Some(0.0)), None);
        assert_eq!(safe_ratio(Some(5.0), Some(0.0)), None);
        assert_eq!(safe_ratio(Some(5.0), None), None);
        assert_eq!(safe_ratio(None, Some(2.0)), None);
    }
}
