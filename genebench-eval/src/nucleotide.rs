//! Base-level comparison of coding masks.
//!
//! For every scored region a coding/non-coding mask is built for the
//! reference and for the prediction over the same span, and each position
//! lands in exactly one confusion bucket:
//!
//! | reference  | prediction | bucket |
//! |------------|------------|--------|
//! | coding     | coding     | TP     |
//! | non-coding | non-coding | TN     |
//! | non-coding | coding     | FP     |
//! | coding     | non-coding | FN     |

use serde::{Deserialize, Serialize};

use genebench_core::models::{GeneModel, GenomicInterval};

use crate::config::EvaluationConfig;
use crate::utils::ratio;

///
/// Build a coding mask over `span`: position `span.start() + i` is coding iff
/// it falls inside any of `exons`. Exon bases outside the span are ignored.
///
pub fn coding_mask(exons: &[GenomicInterval], span: &GenomicInterval) -> Vec<bool> {
    let mut mask = vec![false; span.len() as usize];
    for exon in exons {
        let start = exon.start().max(span.start());
        let end = exon.end().min(span.end());
        if start >= end {
            continue;
        }
        let from = (start - span.start()) as usize;
        let to = (end - span.start()) as usize;
        mask[from..to].fill(true);
    }
    mask
}

///
/// Derive the span to mask for a region: the union of both models' extents,
/// grown by `flank` on each side. `None` when neither model has exons.
///
pub fn derive_span(
    reference: Option<&GeneModel>,
    predicted: Option<&GeneModel>,
    flank: u32,
) -> Option<GenomicInterval> {
    let extents = [reference, predicted]
        .into_iter()
        .flatten()
        .filter_map(|g| g.extent());

    extents
        .reduce(|a, b| a.hull(&b))
        .map(|span| span.expand(flank))
}

/// Confusion matrix tallies accumulated over every scored base of a dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionCounts {
    pub tp: u64,
    pub tn: u64,
    pub fp: u64,
    #[serde(rename = "fn")]
    pub fn_: u64,
}

impl ConfusionCounts {
    pub fn record(&mut self, reference: bool, predicted: bool) {
        match (reference, predicted) {
            (true, true) => self.tp += 1,
            (false, false) => self.tn += 1,
            (false, true) => self.fp += 1,
            (true, false) => self.fn_ += 1,
        }
    }

    ///
    /// Walk two masks of equal length position by position.
    ///
    pub fn accumulate_masks(&mut self, reference: &[bool], predicted: &[bool]) {
        debug_assert_eq!(reference.len(), predicted.len());
        for (&r, &p) in reference.iter().zip(predicted.iter()) {
            self.record(r, p);
        }
    }

    ///
    /// Score one region and add its bases to the running counts.
    ///
    /// When the prediction lies on the other strand its coding bases can not
    /// support the reference: they count as FP where the reference is
    /// non-coding, and reference coding bases are FN regardless.
    ///
    pub fn accumulate_region(
        &mut self,
        reference: &[GenomicInterval],
        predicted: &[GenomicInterval],
        span: &GenomicInterval,
        strands_match: bool,
    ) {
        let ref_mask = coding_mask(reference, span);
        let mut pred_mask = coding_mask(predicted, span);
        if !strands_match {
            for (p, r) in pred_mask.iter_mut().zip(ref_mask.iter()) {
                *p = *p && !*r;
            }
        }
        self.accumulate_masks(&ref_mask, &pred_mask);
    }

    pub fn merge(&mut self, other: &ConfusionCounts) {
        self.tp += other.tp;
        self.tn += other.tn;
        self.fp += other.fp;
        self.fn_ += other.fn_;
    }

    pub fn total(&self) -> u64 {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// TP / (TP + FN), 0 when there are no reference coding bases.
    pub fn sensitivity(&self) -> f64 {
        ratio(self.tp, self.tp + self.fn_)
    }

    /// TN / (TN + FP), 0 when there are no reference non-coding bases.
    pub fn specificity(&self) -> f64 {
        ratio(self.tn, self.tn + self.fp)
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.tp + self.tn, self.total())
    }

    ///
    /// Matthews correlation coefficient.
    ///
    /// Any empty row or column of the matrix makes the denominator zero; the
    /// coefficient is then defined as 0. Products are taken in `f64` so large
    /// genomes can not overflow.
    ///
    pub fn mcc(&self) -> f64 {
        let (tp, tn, fp, fn_) = (
            self.tp as f64,
            self.tn as f64,
            self.fp as f64,
            self.fn_ as f64,
        );
        let left = (tp + fp) * (tp + fn_);
        let right = (tn + fp) * (tn + fn_);
        if left == 0.0 || right == 0.0 {
            return 0.0;
        }
        let value = (tp * tn - fp * fn_) / (left.sqrt() * right.sqrt());
        value.clamp(-1.0, 1.0)
    }
}

///
/// Confusion counts for one reference gene and its paired prediction.
///
/// `span` overrides the derived span (extents of both models plus the
/// configured flank).
///
pub fn score_gene_bases(
    reference: &GeneModel,
    predicted: Option<&GeneModel>,
    span: Option<GenomicInterval>,
    config: &EvaluationConfig,
) -> ConfusionCounts {
    let mut counts = ConfusionCounts::default();
    let span = match span.or_else(|| derive_span(Some(reference), predicted, config.flank)) {
        Some(span) => span,
        None => return counts,
    };

    let strands_match =
        !config.strand_aware || predicted.is_none_or(|p| p.strand() == reference.strand());
    let predicted_exons = predicted.map(|p| p.exons()).unwrap_or(&[]);
    counts.accumulate_region(reference.exons(), predicted_exons, &span, strands_match);
    counts
}

///
/// Confusion counts for a prediction with no reference partner, over its
/// own extent plus flank. Every coding base is a false positive.
///
/// Positions inside `scored` (the spans already scored for reference genes)
/// are skipped, so no base is counted twice.
///
pub fn score_unpaired_bases(
    predicted: &GeneModel,
    scored: &[GenomicInterval],
    config: &EvaluationConfig,
) -> ConfusionCounts {
    let mut counts = ConfusionCounts::default();
    if let Some(span) = derive_span(None, Some(predicted), config.flank) {
        let pred_mask = coding_mask(predicted.exons(), &span);
        let already_scored = coding_mask(scored, &span);
        for (&p, &seen) in pred_mask.iter().zip(already_scored.iter()) {
            if !seen {
                counts.record(false, p);
            }
        }
    }
    counts
}
