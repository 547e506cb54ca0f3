//! Per-gene verdicts and the exon/gene level accumulators built from them.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use genebench_core::models::{Complexity, GeneModel};

use crate::config::EvaluationConfig;
use crate::matching::{ExonMatching, MatchPolicy, match_exact, match_overlap};
use crate::utils::{harmonic_mean, ratio};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneVerdict {
    /// Every reference exon matched exactly and no extra exons were predicted.
    Perfect,
    /// At least one reference exon matched, exactly or by overlap.
    Partial,
    /// No reference exon matched.
    Missed,
}

/// How the predicted side of a comparison was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pairing {
    Paired,
    /// The prediction sits on the other strand. Nothing matches and all its
    /// exons are false positives.
    StrandMismatch,
    /// The tool produced no model for this gene.
    NoPrediction,
}

/// Outcome of comparing one reference gene with its paired prediction.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneComparison {
    pub gene_id: String,
    pub complexity: Complexity,
    pub pairing: Pairing,
    pub exact: ExonMatching,
    pub overlap: ExonMatching,
    pub verdict: GeneVerdict,
}

impl GeneComparison {
    pub fn matching(&self, policy: MatchPolicy) -> &ExonMatching {
        match policy {
            MatchPolicy::Exact => &self.exact,
            MatchPolicy::Overlap => &self.overlap,
        }
    }

    pub fn reference_exons(&self) -> usize {
        self.exact.reference_count()
    }

    pub fn predicted_exons(&self) -> usize {
        self.exact.predicted_count()
    }
}

///
/// Classify a gene from its two matchings.
///
/// A reference gene without exons has nothing to find and is always `Missed`.
///
pub fn classify(exact: &ExonMatching, overlap: &ExonMatching) -> GeneVerdict {
    let n_reference = exact.reference_count();
    if n_reference > 0
        && exact.all_reference_matched()
        && n_reference == exact.predicted_count()
    {
        GeneVerdict::Perfect
    } else if exact.matched_count() > 0 || overlap.matched_count() > 0 {
        GeneVerdict::Partial
    } else {
        GeneVerdict::Missed
    }
}

///
/// Compare a reference gene with the prediction paired to it.
///
/// Selecting which prediction belongs to which reference gene happens
/// upstream; `predicted` is `None` when the tool produced nothing. With
/// `strand_aware` set, a prediction on the opposite strand is never matched.
///
pub fn compare_genes(
    reference: &GeneModel,
    predicted: Option<&GeneModel>,
    config: &EvaluationConfig,
) -> GeneComparison {
    let ref_exons = reference.exons();

    let (pairing, exact, overlap) = match predicted {
        None => (
            Pairing::NoPrediction,
            ExonMatching::unmatched(MatchPolicy::Exact, ref_exons.len(), 0),
            ExonMatching::unmatched(MatchPolicy::Overlap, ref_exons.len(), 0),
        ),
        Some(pred) if config.strand_aware && pred.strand() != reference.strand() => {
            warn!(
                "Prediction for {} is on strand {} but the reference is on {}; scoring as unmatched",
                reference.id(),
                pred.strand(),
                reference.strand()
            );
            (
                Pairing::StrandMismatch,
                ExonMatching::unmatched(MatchPolicy::Exact, ref_exons.len(), pred.exon_count()),
                ExonMatching::unmatched(MatchPolicy::Overlap, ref_exons.len(), pred.exon_count()),
            )
        }
        Some(pred) => (
            Pairing::Paired,
            match_exact(ref_exons, pred.exons()),
            match_overlap(ref_exons, pred.exons(), config.iou_threshold),
        ),
    };

    let verdict = classify(&exact, &overlap);
    debug!(
        "{}: {:?} ({} exact, {} overlap of {} reference exons)",
        reference.id(),
        verdict,
        exact.matched_count(),
        overlap.matched_count(),
        ref_exons.len()
    );

    GeneComparison {
        gene_id: reference.id().to_string(),
        complexity: reference.complexity(),
        pairing,
        exact,
        overlap,
        verdict,
    }
}

/// Running exon-level tallies for one tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExonCounts {
    pub matched_reference: u64,
    pub total_reference: u64,
    pub matched_predicted: u64,
    pub total_predicted: u64,
}

impl ExonCounts {
    pub fn add_matching(&mut self, matching: &ExonMatching) {
        let matched = matching.matched_count() as u64;
        self.matched_reference += matched;
        self.matched_predicted += matched;
        self.total_reference += matching.reference_count() as u64;
        self.total_predicted += matching.predicted_count() as u64;
    }

    /// Exons of a prediction with no reference partner; all false positives.
    pub fn add_unpaired_prediction(&mut self, n_exons: usize) {
        self.total_predicted += n_exons as u64;
    }

    pub fn merge(&mut self, other: &ExonCounts) {
        self.matched_reference += other.matched_reference;
        self.total_reference += other.total_reference;
        self.matched_predicted += other.matched_predicted;
        self.total_predicted += other.total_predicted;
    }

    pub fn sensitivity(&self) -> f64 {
        ratio(self.matched_reference, self.total_reference)
    }

    pub fn precision(&self) -> f64 {
        ratio(self.matched_predicted, self.total_predicted)
    }

    pub fn f1(&self) -> f64 {
        harmonic_mean(self.sensitivity(), self.precision())
    }
}

/// Running gene-level tallies for one tool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneCounts {
    pub perfect: u64,
    pub partial: u64,
    pub missed: u64,
}

impl GeneCounts {
    pub fn record(&mut self, verdict: GeneVerdict) {
        match verdict {
            GeneVerdict::Perfect => self.perfect += 1,
            GeneVerdict::Partial => self.partial += 1,
            GeneVerdict::Missed => self.missed += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.perfect + self.partial + self.missed
    }

    pub fn perfect_rate(&self) -> f64 {
        ratio(self.perfect, self.total())
    }

    pub fn detection_rate(&self) -> f64 {
        ratio(self.perfect + self.partial, self.total())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genebench_core::models::Strand;
    use pretty_assertions::assert_eq;
    use rstest::*;

    use crate::matching::MatchKind;

    fn gene(id: &str, strand: Strand, coords: &[(u32, u32)]) -> GeneModel {
        GeneModel::from_coords(id, strand, coords).unwrap()
    }

    #[fixture]
    fn config() -> EvaluationConfig {
        EvaluationConfig::default()
    }

    #[rstest]
    fn test_shifted_second_exon_is_partial(config: EvaluationConfig) {
        let reference = gene("g1", Strand::Plus, &[(100, 200), (300, 400)]);
        let predicted = gene("g1", Strand::Plus, &[(100, 200), (305, 405)]);

        let cmp = compare_genes(&reference, Some(&predicted), &config);
        assert_eq!(cmp.pairing, Pairing::Paired);
        assert_eq!(cmp.exact.results[0].kind, MatchKind::ExactMatch);
        assert_eq!(cmp.exact.results[1].kind, MatchKind::NoMatch);
        assert_eq!(cmp.overlap.results[1].kind, MatchKind::OverlapMatch);
        assert_eq!(cmp.verdict, GeneVerdict::Partial);
    }

    #[rstest]
    fn test_identical_structure_is_perfect(config: EvaluationConfig) {
        let reference = gene("g1", Strand::Minus, &[(100, 200), (300, 400)]);
        let predicted = gene("g1", Strand::Minus, &[(100, 200), (300, 400)]);
        let cmp = compare_genes(&reference, Some(&predicted), &config);
        assert_eq!(cmp.verdict, GeneVerdict::Perfect);
    }

    #[rstest]
    fn test_extra_predicted_exon_is_not_perfect(config: EvaluationConfig) {
        let reference = gene("g1", Strand::Plus, &[(100, 200), (300, 400)]);
        let predicted = gene("g1", Strand::Plus, &[(100, 200), (300, 400), (600, 700)]);
        let cmp = compare_genes(&reference, Some(&predicted), &config);
        assert_eq!(cmp.verdict, GeneVerdict::Partial);
        assert_eq!(cmp.overlap.false_positives(), 1);
    }

    #[rstest]
    fn test_empty_prediction_is_missed(config: EvaluationConfig) {
        let reference = gene("g1", Strand::Plus, &[(100, 200)]);
        let predicted = gene("g1", Strand::Plus, &[]);
        let cmp = compare_genes(&reference, Some(&predicted), &config);
        assert_eq!(cmp.verdict, GeneVerdict::Missed);

        let mut counts = ExonCounts::default();
        counts.add_matching(cmp.matching(MatchPolicy::Overlap));
        assert_eq!(counts.sensitivity(), 0.0);
        assert_eq!(counts.precision(), 0.0);
        assert_eq!(counts.f1(), 0.0);
    }

    #[rstest]
    fn test_missing_prediction(config: EvaluationConfig) {
        let reference = gene("g1", Strand::Plus, &[(100, 200), (300, 400)]);
        let cmp = compare_genes(&reference, None, &config);
        assert_eq!(cmp.pairing, Pairing::NoPrediction);
        assert_eq!(cmp.verdict, GeneVerdict::Missed);
        assert_eq!(cmp.predicted_exons(), 0);
    }

    #[rstest]
    fn test_opposite_strand_never_matches(config: EvaluationConfig) {
        let reference = gene("g1", Strand::Plus, &[(100, 200), (300, 400)]);
        let predicted = gene("g1", Strand::Minus, &[(100, 200), (300, 400)]);
        let cmp = compare_genes(&reference, Some(&predicted), &config);
        assert_eq!(cmp.pairing, Pairing::StrandMismatch);
        assert_eq!(cmp.verdict, GeneVerdict::Missed);
        assert_eq!(cmp.overlap.false_positives(), 2);
        assert_eq!(cmp.exact.false_positives(), 2);
    }

    #[rstest]
    fn test_strand_ignored_when_not_strand_aware() {
        let config = EvaluationConfig {
            strand_aware: false,
            ..EvaluationConfig::default()
        };
        let reference = gene("g1", Strand::Plus, &[(100, 200), (300, 400)]);
        let predicted = gene("g1", Strand::Minus, &[(100, 200), (300, 400)]);
        let cmp = compare_genes(&reference, Some(&predicted), &config);
        assert_eq!(cmp.pairing, Pairing::Paired);
        assert_eq!(cmp.verdict, GeneVerdict::Perfect);
    }

    #[rstest]
    fn test_empty_reference_gene_is_missed(config: EvaluationConfig) {
        let reference = gene("g1", Strand::Plus, &[]);
        let predicted = gene("g1", Strand::Plus, &[]);
        let cmp = compare_genes(&reference, Some(&predicted), &config);
        assert_eq!(cmp.verdict, GeneVerdict::Missed);
    }

    #[rstest]
    fn test_exon_counts_rates() {
        let mut counts = ExonCounts {
            matched_reference: 3,
            total_reference: 4,
            matched_predicted: 3,
            total_predicted: 6,
        };
        assert_eq!(counts.sensitivity(), 0.75);
        assert_eq!(counts.precision(), 0.5);
        assert!((counts.f1() - 0.6).abs() < 1e-12);

        counts.add_unpaired_prediction(2);
        assert_eq!(counts.total_predicted, 8);
        assert!((0.0..=1.0).contains(&counts.precision()));
    }

    #[rstest]
    fn test_gene_counts_rates() {
        let mut counts = GeneCounts::default();
        assert_eq!(counts.perfect_rate(), 0.0);
        assert_eq!(counts.detection_rate(), 0.0);

        counts.record(GeneVerdict::Perfect);
        counts.record(GeneVerdict::Partial);
        counts.record(GeneVerdict::Missed);
        counts.record(GeneVerdict::Missed);
        assert_eq!(counts.total(), 4);
        assert_eq!(counts.perfect_rate(), 0.25);
        assert_eq!(counts.detection_rate(), 0.5);
    }
}
