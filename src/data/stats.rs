use std::collections::BTreeMap;

use super::model::{ClassId, Roster, Status};

// ---------------------------------------------------------------------------
// Aggregate statistics
// ---------------------------------------------------------------------------

/// Descriptive statistics over a non-empty view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RosterStats {
    pub count: usize,
    pub mean_score: f64,
    pub max_score: u8,
    /// Share of passing records, in `[0, 1]`.
    pub pass_rate: f64,
}

/// Mean, max and pass rate of `view`. `None` when the view is empty: there
/// is no meaningful zero to report.
pub fn compute_stats(roster: &Roster, view: &[usize]) -> Option<RosterStats> {
    if view.is_empty() {
        return None;
    }
    let records = roster.records();
    let mut sum = 0u64;
    let mut max = 0u8;
    let mut passed = 0usize;
    for &i in view {
        let r = &records[i];
        let score = r.score.get();
        sum += u64::from(score);
        max = max.max(score);
        if r.status() == Status::Pass {
            passed += 1;
        }
    }
    let n = view.len() as f64;
    Some(RosterStats {
        count: view.len(),
        mean_score: sum as f64 / n,
        max_score: max,
        pass_rate: passed as f64 / n,
    })
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

impl HistogramBin {
    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Split the score range of `view` into `bins` equal-width bins. The last
/// bin is closed on the right so the maximum score is counted.
pub fn histogram(roster: &Roster, view: &[usize], bins: usize) -> Vec<HistogramBin> {
    let scores: Vec<f64> = view
        .iter()
        .map(|&i| f64::from(roster.records()[i].score.get()))
        .collect();
    let (Some(min), Some(max)) = (
        scores.iter().copied().reduce(f64::min),
        scores.iter().copied().reduce(f64::max),
    ) else {
        return Vec::new();
    };

    // Degenerate range: one unit-wide bin around the single value.
    if bins == 0 || (max - min).abs() < f64::EPSILON {
        return vec![HistogramBin {
            start: min - 0.5,
            end: max + 0.5,
            count: scores.len(),
        }];
    }

    let width = (max - min) / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|b| HistogramBin {
            start: min + width * b as f64,
            end: min + width * (b + 1) as f64,
            count: 0,
        })
        .collect();
    for s in scores {
        let idx = (((s - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Kernel density estimate
// ---------------------------------------------------------------------------

/// Gaussian KDE of the view's scores, sampled at `samples` evenly spaced
/// points from three bandwidths below the lowest score to three above the
/// highest. Bandwidth follows Scott's rule on the sample standard deviation.
/// Empty when there are fewer than two scores or they are all equal.
pub fn kde_curve(roster: &Roster, view: &[usize], samples: usize) -> Vec<[f64; 2]> {
    let scores: Vec<f64> = view
        .iter()
        .map(|&i| f64::from(roster.records()[i].score.get()))
        .collect();
    let n = scores.len();
    if n < 2 || samples < 2 {
        return Vec::new();
    }

    let nf = n as f64;
    let mean = scores.iter().sum::<f64>() / nf;
    let var = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / (nf - 1.0);
    let bandwidth = var.sqrt() * nf.powf(-0.2);
    if bandwidth < f64::EPSILON {
        return Vec::new();
    }

    let min = scores.iter().copied().fold(f64::INFINITY, f64::min);
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let (lo, hi) = (min - 3.0 * bandwidth, max + 3.0 * bandwidth);
    let norm = nf * bandwidth * (2.0 * std::f64::consts::PI).sqrt();

    (0..samples)
        .map(|k| {
            let x = lo + (hi - lo) * k as f64 / (samples - 1) as f64;
            let density = scores
                .iter()
                .map(|s| (-0.5 * ((x - s) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                / norm;
            [x, density]
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Box-plot summaries
// ---------------------------------------------------------------------------

/// Five-number summary of one class, whiskers at 1.5 × IQR.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxSummary {
    pub class_id: ClassId,
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

/// Linear-interpolated quantile of sorted data.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// One summary per class present in `view`, ordered by class.
pub fn box_summaries(roster: &Roster, view: &[usize]) -> Vec<BoxSummary> {
    let mut by_class: BTreeMap<ClassId, Vec<f64>> = BTreeMap::new();
    for &i in view {
        let r = &roster.records()[i];
        by_class
            .entry(r.class_id)
            .or_default()
            .push(f64::from(r.score.get()));
    }

    by_class
        .into_iter()
        .map(|(class_id, mut scores)| {
            scores.sort_by(f64::total_cmp);
            let q1 = quantile(&scores, 0.25);
            let median = quantile(&scores, 0.5);
            let q3 = quantile(&scores, 0.75);
            let reach = 1.5 * (q3 - q1);
            let (lo_fence, hi_fence) = (q1 - reach, q3 + reach);

            let (inside, outliers): (Vec<f64>, Vec<f64>) = scores
                .iter()
                .partition(|&&s| s >= lo_fence && s <= hi_fence);
            let lower_whisker = inside.first().copied().unwrap_or(q1);
            let upper_whisker = inside.last().copied().unwrap_or(q3);

            BoxSummary {
                class_id,
                lower_whisker,
                q1,
                median,
                q3,
                upper_whisker,
                outliers,
            }
        })
        .collect()
}
