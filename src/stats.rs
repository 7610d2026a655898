//! Descriptive statistics over the `value` series.
//!
//! Stored statistics are unrounded; rounding only happens when a caller asks
//! for a display copy via [`SummaryStatistics::rounded`] or [`format_metric`].

use serde::Serialize;

use crate::data::model::CleanedDataset;

/// Row labels of the summary table, in display order.
pub const STAT_LABELS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStatistics {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (N-1); NaN when `count == 1`.
    pub std: f64,
    pub min: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub max: f64,
}

impl SummaryStatistics {
    /// Compute statistics for a slice of values. An empty slice yields a
    /// zero count and NaN everywhere else.
    pub fn from_values(values: &[f64]) -> Self {
        let n = values.len();
        if n == 0 {
            return SummaryStatistics {
                count: 0,
                mean: f64::NAN,
                std: f64::NAN,
                min: f64::NAN,
                p25: f64::NAN,
                median: f64::NAN,
                p75: f64::NAN,
                max: f64::NAN,
            };
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mean = values.iter().sum::<f64>() / n as f64;
        let std = if n > 1 {
            let variance =
                values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
            variance.sqrt()
        } else {
            f64::NAN
        };

        SummaryStatistics {
            count: n,
            mean,
            std,
            min: sorted[0],
            p25: percentile(&sorted, 25.0),
            median: percentile(&sorted, 50.0),
            p75: percentile(&sorted, 75.0),
            max: sorted[n - 1],
        }
    }

    /// A display copy with every real-valued field rounded to `decimals`.
    pub fn rounded(&self, decimals: u32) -> Self {
        let r = |v: f64| round_to(v, decimals);
        SummaryStatistics {
            count: self.count,
            mean: r(self.mean),
            std: r(self.std),
            min: r(self.min),
            p25: r(self.p25),
            median: r(self.median),
            p75: r(self.p75),
            max: r(self.max),
        }
    }

    /// `(label, value)` pairs in [`STAT_LABELS`] order.
    pub fn rows(&self) -> [(&'static str, f64); 8] {
        [
            (STAT_LABELS[0], self.count as f64),
            (STAT_LABELS[1], self.mean),
            (STAT_LABELS[2], self.std),
            (STAT_LABELS[3], self.min),
            (STAT_LABELS[4], self.p25),
            (STAT_LABELS[5], self.median),
            (STAT_LABELS[6], self.p75),
            (STAT_LABELS[7], self.max),
        ]
    }
}

/// Statistics over a dataset's values. Pure; the dataset is not touched.
pub fn describe(dataset: &CleanedDataset) -> SummaryStatistics {
    SummaryStatistics::from_values(&dataset.values())
}

/// Percentile with linear interpolation between order statistics
/// (NumPy's default). `sorted_values` must be ascending and non-empty.
pub fn percentile(sorted_values: &[f64], p: f64) -> f64 {
    let n = sorted_values.len();
    if n == 0 {
        return f64::NAN;
    }
    if n == 1 {
        return sorted_values[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    if lower == upper {
        sorted_values[lower]
    } else {
        sorted_values[lower] * (1.0 - frac) + sorted_values[upper] * frac
    }
}

/// Round half away from zero to `decimals` places. NaN stays NaN.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    if !value.is_finite() {
        return value;
    }
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}

/// Fixed decimals with thousands separators: `1234.567` -> `1,234.57`.
pub fn format_metric(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let negative = value < 0.0 && formatted.chars().any(|c| c.is_ascii_digit() && c != '0');
    let mut out = String::new();
    if negative {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}
