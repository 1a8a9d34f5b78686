//! ROC curve and area under it.
//!
//! Higher scores must mean "more likely positive". Tied scores are
//! grouped into a single curve point, so the area equals the rank
//! statistic with ties counted as half.

use std::cmp::Ordering;

/// Area under the ROC curve for `labels` (1 = positive).
///
/// Returns `None` when the lengths differ or only one class is present;
/// the curve is undefined there.
pub fn roc_auc(scores: &[f64], labels: &[u8]) -> Option<f64> {
    if scores.is_empty() || scores.len() != labels.len() {
        return None;
    }

    let total_pos = labels.iter().filter(|&&l| l == 1).count();
    let total_neg = labels.len() - total_pos;
    if total_pos == 0 || total_neg == 0 {
        return None;
    }

    // Descending score
    let mut indices: Vec<usize> = (0..scores.len()).collect();
    indices.sort_by(|&a, &b| scores[b].partial_cmp(&scores[a]).unwrap_or(Ordering::Equal));

    let p = total_pos as f64;
    let n = total_neg as f64;

    let (mut tp, mut fp) = (0usize, 0usize);
    let (mut prev_fpr, mut prev_tpr) = (0.0, 0.0);
    let mut auc = 0.0;

    let mut i = 0;
    while i < indices.len() {
        let current = scores[indices[i]];
        while i < indices.len() && scores[indices[i]] == current {
            if labels[indices[i]] == 1 {
                tp += 1;
            } else {
                fp += 1;
            }
            i += 1;
        }

        let (fpr, tpr) = (fp as f64 / n, tp as f64 / p);
        auc += (fpr - prev_fpr) * (tpr + prev_tpr) / 2.0;
        prev_fpr = fpr;
        prev_tpr = tpr;
    }

    Some(auc)
}
