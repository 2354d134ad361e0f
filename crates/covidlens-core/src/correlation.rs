use polars::prelude::*;
use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Square Pearson matrix; `values[i][j]` pairs `labels[i]` with `labels[j]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub labels: Vec<String>,
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.labels.iter().position(|label| label == row)?;
        let j = self.labels.iter().position(|label| label == column)?;
        self.values[i][j]
    }

    /// First column `metric` holds the row labels, then one column per label.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::with_capacity(self.labels.len() + 1);
        columns.push(Series::new("metric".into(), self.labels.clone()).into());
        for (j, label) in self.labels.iter().enumerate() {
            let values: Vec<Option<f64>> = self.values.iter().map(|row| row[j]).collect();
            columns.push(Series::new(label.as_str().into(), values).into());
        }
        Ok(DataFrame::new(columns)?)
    }
}

/// Pairwise-complete Pearson correlation between the named columns. A pair with fewer than
/// two joint observations, or with zero variance on either side, is null.
pub fn correlation(df: &DataFrame, columns: &[String]) -> Result<CorrelationMatrix> {
    let mut data: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for name in columns {
        let column = df
            .column(name)
            .map_err(|_| PipelineError::UnknownColumn(name.clone()))?;
        let as_f64 = column.cast(&DataType::Float64)?;
        data.push(as_f64.f64()?.into_iter().collect());
    }

    let n = columns.len();
    let mut values = vec![vec![None; n]; n];
    for i in 0..n {
        for j in i..n {
            let r = pearson(&data[i], &data[j]).map(|r| if i == j { 1.0 } else { r });
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        labels: columns.to_vec(),
        values,
    })
}

pub fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| match (a, b) {
            (Some(a), Some(b)) if a.is_finite() && b.is_finite() => Some((*a, *b)),
            _ => None,
        })
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let count = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(a, _)| a).sum::<f64>() / count;
    let mean_y = pairs.iter().map(|(_, b)| b).sum::<f64>() / count;

    let (mut cov, mut var_x, mut var_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let dx = a - mean_x;
        let dy = b - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some((cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::pearson;

    #[test]
    fn perfect_linear_relationships() {
        let x = [Some(1.0), Some(2.0), Some(3.0)];
        let up = [Some(10.0), Some(20.0), Some(30.0)];
        let down = [Some(3.0), Some(2.0), Some(1.0)];
        assert!((pearson(&x, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&x, &down).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn skips_rows_missing_either_side() {
        let x = [Some(1.0), None, Some(2.0), Some(3.0)];
        let y = [Some(2.0), Some(100.0), Some(4.0), Some(6.0)];
        assert!((pearson(&x, &y).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn degenerate_inputs_are_undefined() {
        assert_eq!(pearson(&[Some(1.0)], &[Some(2.0)]), None);
        assert_eq!(
            pearson(&[Some(1.0), Some(1.0)], &[Some(2.0), Some(3.0)]),
            None
        );
    }
}
