/// Cumulative weight tables for transform selection.
///
/// Row `None` is the plain proportional draw over the transform weights; row `Some(i)` is biased
/// by transform `i`'s relative weights. Rows whose relative weights are all default share the
/// plain row, and so do rows whose relative weights leave no positive total.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectionTable {
    base: Vec<f64>,
    biased: Vec<Option<Vec<f64>>>,
}

impl SelectionTable {
    /// Build from transform weights and each transform's relative-weight vector.
    ///
    /// Negative and non-finite weights count as zero; missing relative weights default to `1`.
    pub fn build(weights: &[f64], modified: &[&[f64]]) -> Self {
        let w: Vec<f64> = weights.iter().map(|&v| sanitize(v)).collect();
        let base = cumulative(w.iter().copied());
        let biased = modified
            .iter()
            .map(|m| {
                if m.iter().take(w.len()).all(|&r| r == 1.0) {
                    return None;
                }
                let row = cumulative(w.iter().enumerate().map(|(i, &wi)| {
                    wi * m.get(i).copied().map(sanitize).unwrap_or(1.0)
                }));
                (row.last().copied().unwrap_or(0.0) > 0.0).then_some(row)
            })
            .collect();
        Self { base, biased }
    }

    /// Number of selectable transforms.
    pub fn len(&self) -> usize {
        self.base.len()
    }

    /// Whether there is nothing to select from.
    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
    }

    /// Total weight of the row used after `prev`.
    pub fn total(&self, prev: Option<usize>) -> f64 {
        self.row(prev).last().copied().unwrap_or(0.0)
    }

    /// Map a uniform draw `u` in `[0, 1)` to a transform index.
    ///
    /// Returns `None` when the row's total weight is zero.
    pub fn pick(&self, prev: Option<usize>, u: f64) -> Option<usize> {
        let row = self.row(prev);
        let total = row.last().copied().unwrap_or(0.0);
        if total <= 0.0 {
            return None;
        }
        let target = u.clamp(0.0, 1.0) * total;
        let idx = row.partition_point(|&c| c <= target);
        if idx < row.len() {
            return Some(idx);
        }
        // `u` rounded up to the total: fall back to the last transform with weight.
        (0..row.len()).rev().find(|&i| {
            let lo = if i == 0 { 0.0 } else { row[i - 1] };
            row[i] > lo
        })
    }

    fn row(&self, prev: Option<usize>) -> &[f64] {
        match prev.and_then(|p| self.biased.get(p)) {
            Some(Some(row)) => row,
            _ => &self.base,
        }
    }
}

fn sanitize(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn cumulative(weights: impl Iterator<Item = f64>) -> Vec<f64> {
    let mut acc = 0.0;
    weights
        .map(|w| {
            acc += w;
            acc
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/flame/selection.rs"]
mod tests;
