//! One-to-one matching of reference exons against predicted exons.
//!
//! Two policies are supported:
//!
//! - **exact**: a reference exon matches a predicted exon only when both
//!   coordinates are equal. Duplicates are paired in encounter order.
//! - **overlap**: a reference exon matches the unused predicted exon with
//!   the highest IoU, provided it reaches the threshold. Reference exons are
//!   visited by ascending start, and IoU ties go to the predicted exon with
//!   the lowest start coordinate.
//!
//! Under both policies a predicted exon is consumed by at most one
//! reference exon. Predicted exons left unused are exon-level false positives.

use std::collections::{HashMap, VecDeque};
use std::fmt::{self, Display};
use std::str::FromStr;

use genebench_core::models::GenomicInterval;
use serde::{Deserialize, Serialize};

/// Classification of one reference exon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    ExactMatch,
    OverlapMatch,
    NoMatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPolicy {
    Exact,
    #[default]
    Overlap,
}

impl Display for MatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchPolicy::Exact => write!(f, "exact"),
            MatchPolicy::Overlap => write!(f, "overlap"),
        }
    }
}

impl FromStr for MatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "exact" => Ok(MatchPolicy::Exact),
            "overlap" => Ok(MatchPolicy::Overlap),
            other => Err(format!("unknown match policy: {}", other)),
        }
    }
}

/// Result for a single reference exon.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchResult {
    pub kind: MatchKind,
    /// Index into the predicted exon list of the exon this one was matched to.
    pub predicted: Option<usize>,
    /// IoU with the matched predicted exon, 0 when unmatched.
    pub iou: f64,
}

impl MatchResult {
    pub fn no_match() -> Self {
        MatchResult {
            kind: MatchKind::NoMatch,
            predicted: None,
            iou: 0.0,
        }
    }

    pub fn is_match(&self) -> bool {
        self.kind != MatchKind::NoMatch
    }
}

/// Matching between one reference exon list and one predicted exon list.
#[derive(Debug, Clone, PartialEq)]
pub struct ExonMatching {
    pub policy: MatchPolicy,
    /// One entry per reference exon, in reference order.
    pub results: Vec<MatchResult>,
    /// Indices of predicted exons no reference exon claimed, ascending.
    pub unmatched_predicted: Vec<usize>,
}

impl ExonMatching {
    ///
    /// A matching in which nothing matched: every reference exon is
    /// `NoMatch` and every predicted exon is a false positive.
    ///
    pub fn unmatched(policy: MatchPolicy, n_reference: usize, n_predicted: usize) -> Self {
        ExonMatching {
            policy,
            results: vec![MatchResult::no_match(); n_reference],
            unmatched_predicted: (0..n_predicted).collect(),
        }
    }

    pub fn reference_count(&self) -> usize {
        self.results.len()
    }

    pub fn predicted_count(&self) -> usize {
        self.matched_count() + self.unmatched_predicted.len()
    }

    /// Number of matched pairs. Matching is one-to-one, so this is both the
    /// number of matched reference exons and of matched predicted exons.
    pub fn matched_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_match()).count()
    }

    pub fn false_positives(&self) -> usize {
        self.unmatched_predicted.len()
    }

    pub fn all_reference_matched(&self) -> bool {
        self.results.iter().all(|r| r.is_match())
    }

    pub fn count_kind(&self, kind: MatchKind) -> usize {
        self.results.iter().filter(|r| r.kind == kind).count()
    }
}

fn unused_indices(used: &[bool]) -> Vec<usize> {
    used.iter()
        .enumerate()
        .filter(|(_, u)| !**u)
        .map(|(i, _)| i)
        .collect()
}

///
/// Match exons by exact coordinate equality.
///
pub fn match_exact(reference: &[GenomicInterval], predicted: &[GenomicInterval]) -> ExonMatching {
    let mut by_coords: HashMap<GenomicInterval, VecDeque<usize>> = HashMap::new();
    for (i, exon) in predicted.iter().enumerate() {
        by_coords.entry(*exon).or_default().push_back(i);
    }

    let mut used = vec![false; predicted.len()];
    let results = reference
        .iter()
        .map(|exon| match by_coords.get_mut(exon).and_then(|q| q.pop_front()) {
            Some(i) => {
                used[i] = true;
                MatchResult {
                    kind: MatchKind::ExactMatch,
                    predicted: Some(i),
                    iou: 1.0,
                }
            }
            None => MatchResult::no_match(),
        })
        .collect();

    ExonMatching {
        policy: MatchPolicy::Exact,
        results,
        unmatched_predicted: unused_indices(&used),
    }
}

///
/// Match exons by intersection-over-union, greedily and one-to-one.
///
/// A pair qualifies when `iou >= threshold`. Pairs with identical
/// coordinates are reported as `ExactMatch`, all others as `OverlapMatch`.
///
pub fn match_overlap(
    reference: &[GenomicInterval],
    predicted: &[GenomicInterval],
    threshold: f64,
) -> ExonMatching {
    let mut order: Vec<usize> = (0..reference.len()).collect();
    order.sort_by_key(|&i| (reference[i].start(), i));

    let mut used = vec![false; predicted.len()];
    let mut results = vec![MatchResult::no_match(); reference.len()];

    for ri in order {
        let r = &reference[ri];
        let mut best: Option<(usize, f64)> = None;

        for (pi, p) in predicted.iter().enumerate() {
            if used[pi] || !r.overlaps(p) {
                continue;
            }
            let score = r.iou(p);
            if score < threshold {
                continue;
            }
            let better = match best {
                None => true,
                Some((bi, best_score)) => {
                    score > best_score
                        || (score == best_score
                            && (p.start(), pi) < (predicted[bi].start(), bi))
                }
            };
            if better {
                best = Some((pi, score));
            }
        }

        if let Some((pi, score)) = best {
            used[pi] = true;
            let kind = if *r == predicted[pi] {
                MatchKind::ExactMatch
            } else {
                MatchKind::OverlapMatch
            };
            results[ri] = MatchResult {
                kind,
                predicted: Some(pi),
                iou: score,
            };
        }
    }

    ExonMatching {
        policy: MatchPolicy::Overlap,
        results,
        unmatched_predicted: unused_indices(&used),
    }
}

/// Dispatch to [`match_exact`] or [`match_overlap`].
pub fn match_exons(
    reference: &[GenomicInterval],
    predicted: &[GenomicInterval],
    policy: MatchPolicy,
    iou_threshold: f64,
) -> ExonMatching {
    match policy {
        MatchPolicy::Exact => match_exact(reference, predicted),
        MatchPolicy::Overlap => match_overlap(reference, predicted, iou_threshold),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn exons(coords: &[(u32, u32)]) -> Vec<GenomicInterval> {
        coords
            .iter()
            .map(|&(s, e)| GenomicInterval::new(s, e).unwrap())
            .collect()
    }

    #[rstest]
    fn test_exact_and_shifted_exon() {
        let reference = exons(&[(100, 200), (300, 400)]);
        let predicted = exons(&[(100, 200), (305, 405)]);

        let exact = match_exact(&reference, &predicted);
        assert_eq!(exact.results[0].kind, MatchKind::ExactMatch);
        assert_eq!(exact.results[1].kind, MatchKind::NoMatch);
        assert_eq!(exact.unmatched_predicted, vec![1]);

        let overlap = match_overlap(&reference, &predicted, 0.5);
        assert_eq!(overlap.results[0].kind, MatchKind::ExactMatch);
        assert_eq!(overlap.results[1].kind, MatchKind::OverlapMatch);
        assert_eq!(overlap.results[1].predicted, Some(1));
        assert!((overlap.results[1].iou - 95.0 / 105.0).abs() < 1e-12);
        assert!(overlap.unmatched_predicted.is_empty());
    }

    #[rstest]
    fn test_empty_prediction() {
        let reference = exons(&[(100, 200), (300, 400)]);
        for policy in [MatchPolicy::Exact, MatchPolicy::Overlap] {
            let m = match_exons(&reference, &[], policy, 0.5);
            assert_eq!(m.matched_count(), 0);
            assert_eq!(m.false_positives(), 0);
            assert!(m.results.iter().all(|r| r.kind == MatchKind::NoMatch));
        }
    }

    #[rstest]
    fn test_empty_reference() {
        let predicted = exons(&[(100, 200), (300, 400)]);
        for policy in [MatchPolicy::Exact, MatchPolicy::Overlap] {
            let m = match_exons(&[], &predicted, policy, 0.5);
            assert_eq!(m.matched_count(), 0);
            assert_eq!(m.unmatched_predicted, vec![0, 1]);
            assert_eq!(m.predicted_count(), 2);
        }
    }

    #[rstest]
    fn test_large_prediction_consumed_once() {
        // one long predicted exon covering two short reference exons:
        // it may satisfy at most one of them
        let reference = exons(&[(100, 160), (170, 200)]);
        let predicted = exons(&[(100, 200)]);

        let m = match_overlap(&reference, &predicted, 0.25);
        assert_eq!(m.matched_count(), 1);
        assert_eq!(m.results[0].predicted, Some(0));
        assert_eq!(m.results[1].kind, MatchKind::NoMatch);
    }

    #[rstest]
    fn test_threshold_is_inclusive() {
        // overlap 50, union 100
        let reference = exons(&[(100, 175)]);
        let predicted = exons(&[(125, 200)]);
        let m = match_overlap(&reference, &predicted, 0.5);
        assert_eq!(m.results[0].kind, MatchKind::OverlapMatch);

        let m = match_overlap(&reference, &predicted, 0.51);
        assert_eq!(m.results[0].kind, MatchKind::NoMatch);
    }

    #[rstest]
    fn test_best_iou_wins() {
        let reference = exons(&[(100, 200)]);
        let predicted = exons(&[(90, 190), (100, 195)]);
        let m = match_overlap(&reference, &predicted, 0.5);
        assert_eq!(m.results[0].predicted, Some(1));
        assert_eq!(m.unmatched_predicted, vec![0]);
    }

    #[rstest]
    fn test_tie_broken_by_lowest_start() {
        // both candidates share 90 of a 110 base union; listed out of order
        let reference = exons(&[(100, 200)]);
        let predicted = exons(&[(110, 210), (90, 190)]);
        let m = match_overlap(&reference, &predicted, 0.5);
        assert_eq!(m.results[0].predicted, Some(1));
    }

    #[rstest]
    fn test_exact_duplicates_paired_in_order() {
        let reference = exons(&[(100, 200), (100, 200)]);
        let predicted = exons(&[(100, 200)]);
        let m = match_exact(&reference, &predicted);
        assert_eq!(m.results[0].predicted, Some(0));
        assert_eq!(m.results[1].kind, MatchKind::NoMatch);
    }

    #[rstest]
    fn test_exact_matches_are_subset_of_overlap_matches() {
        let reference = exons(&[(100, 200), (300, 400), (500, 650), (700, 720)]);
        let predicted = exons(&[(100, 200), (310, 400), (500, 650), (800, 900)]);
        let exact = match_exact(&reference, &predicted);
        let overlap = match_overlap(&reference, &predicted, 0.5);

        for (e, o) in exact.results.iter().zip(overlap.results.iter()) {
            if e.kind == MatchKind::ExactMatch {
                assert_eq!(o.kind, MatchKind::ExactMatch);
                assert_eq!(o.predicted, e.predicted);
            }
        }
        assert_eq!(exact.matched_count(), 2);
        assert_eq!(overlap.matched_count(), 3);
    }

    #[rstest]
    fn test_matching_is_deterministic() {
        let reference = exons(&[(100, 200), (300, 400), (500, 600)]);
        let predicted = exons(&[(95, 195), (105, 205), (300, 380), (590, 700)]);
        let first = match_overlap(&reference, &predicted, 0.5);
        let second = match_overlap(&reference, &predicted, 0.5);
        assert_eq!(first, second);
    }

    #[rstest]
    #[case("exact", MatchPolicy::Exact)]
    #[case("overlap", MatchPolicy::Overlap)]
    fn test_policy_from_str(#[case] raw: &str, #[case] expected: MatchPolicy) {
        assert_eq!(raw.parse::<MatchPolicy>().unwrap(), expected);
        assert_eq!(expected.to_string(), raw);
    }
}
