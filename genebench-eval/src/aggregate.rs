//! Per-tool evaluation reports and cross-tool ranking.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::str::FromStr;

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use genebench_core::models::{Complexity, GeneSet, GenomicInterval};

use crate::config::EvaluationConfig;
use crate::errors::EvaluationError;
use crate::gene_scoring::{ExonCounts, GeneCounts, GeneVerdict, Pairing, compare_genes};
use crate::matching::{MatchKind, MatchPolicy};
use crate::nucleotide::{ConfusionCounts, derive_span, score_gene_bases, score_unpaired_bases};
use crate::utils::ratio;

/// Caller-supplied nucleotide spans, keyed by reference gene id.
pub type RegionSpans = BTreeMap<String, GenomicInterval>;

/// Exon-level results restricted to one complexity class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplexityBreakdown {
    pub genes: u64,
    pub exon_counts: ExonCounts,
    pub exon_sensitivity: f64,
    pub exon_precision: f64,
    pub exon_f1: f64,
}

impl From<(u64, ExonCounts)> for ComplexityBreakdown {
    fn from((genes, exon_counts): (u64, ExonCounts)) -> Self {
        ComplexityBreakdown {
            genes,
            exon_counts,
            exon_sensitivity: exon_counts.sensitivity(),
            exon_precision: exon_counts.precision(),
            exon_f1: exon_counts.f1(),
        }
    }
}

/// One row of the per-gene breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneReport {
    pub gene_id: String,
    pub complexity: Complexity,
    pub pairing: Pairing,
    pub verdict: GeneVerdict,
    pub reference_exons: usize,
    pub predicted_exons: usize,
    pub exact_matches: usize,
    pub overlap_matches: usize,
    pub false_positive_exons: usize,
    pub confusion: ConfusionCounts,
}

/// Everything measured for one tool on one dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub tool: String,
    pub exon_policy: MatchPolicy,
    pub exon_sensitivity: f64,
    pub exon_precision: f64,
    pub exon_f1: f64,
    pub gene_perfect_rate: f64,
    pub gene_detection_rate: f64,
    pub nucleotide_sensitivity: f64,
    pub nucleotide_specificity: f64,
    pub nucleotide_accuracy: f64,
    pub mcc: f64,
    pub exon_counts: ExonCounts,
    pub gene_counts: GeneCounts,
    pub confusion: ConfusionCounts,
    pub by_complexity: BTreeMap<Complexity, ComplexityBreakdown>,
    /// Predicted genes whose id has no reference partner.
    pub unpaired_predictions: Vec<String>,
    pub genes: Vec<GeneReport>,
}

///
/// Evaluate one tool's predictions against the reference set.
///
/// Predictions are paired with reference genes by identifier. Reference
/// genes without a prediction are scored as missed; predictions without a
/// reference gene add false positive exons and bases. Bases of such a
/// prediction that fall inside a span already scored for a reference gene
/// are not counted again. An empty reference set yields a report with every
/// rate at its zero fallback.
///
/// The confusion counts are local to this call, so concurrent calls for
/// different tools share nothing.
///
pub fn evaluate_tool(
    tool: &str,
    reference: &GeneSet,
    predicted: &GeneSet,
    spans: Option<&RegionSpans>,
    config: &EvaluationConfig,
) -> Result<EvaluationReport, EvaluationError> {
    config.validate()?;

    if reference.is_empty() {
        warn!("{}: reference set is empty, report will hold fallback values", tool);
    }
    if predicted.is_empty() {
        warn!("{}: prediction set is empty", tool);
    }

    let policy = config.exon_policy;
    let mut exon_counts = ExonCounts::default();
    let mut gene_counts = GeneCounts::default();
    let mut confusion = ConfusionCounts::default();
    let mut by_complexity: BTreeMap<Complexity, (u64, ExonCounts)> = Complexity::ALL
        .iter()
        .map(|c| (*c, (0, ExonCounts::default())))
        .collect();
    let mut genes = Vec::with_capacity(reference.len());
    let mut scored_spans = Vec::with_capacity(reference.len());

    for ref_gene in reference {
        let pred_gene = predicted.get(ref_gene.id());
        let comparison = compare_genes(ref_gene, pred_gene, config);
        let matching = comparison.matching(policy);

        exon_counts.add_matching(matching);
        gene_counts.record(comparison.verdict);

        let class = by_complexity.entry(comparison.complexity).or_default();
        class.0 += 1;
        class.1.add_matching(matching);

        let span = spans
            .and_then(|s| s.get(ref_gene.id()).copied())
            .or_else(|| derive_span(Some(ref_gene), pred_gene, config.flank));
        scored_spans.extend(span);
        let gene_confusion = score_gene_bases(ref_gene, pred_gene, span, config);
        confusion.merge(&gene_confusion);

        genes.push(GeneReport {
            gene_id: comparison.gene_id.clone(),
            complexity: comparison.complexity,
            pairing: comparison.pairing,
            verdict: comparison.verdict,
            reference_exons: comparison.reference_exons(),
            predicted_exons: comparison.predicted_exons(),
            exact_matches: comparison.exact.count_kind(MatchKind::ExactMatch),
            overlap_matches: comparison.overlap.matched_count(),
            false_positive_exons: matching.false_positives(),
            confusion: gene_confusion,
        });
    }

    let mut unpaired_predictions = Vec::new();
    for pred_gene in predicted.iter().filter(|g| !reference.contains(g.id())) {
        warn!(
            "{}: predicted gene {} has no reference partner; counting its exons as false positives",
            tool,
            pred_gene.id()
        );
        exon_counts.add_unpaired_prediction(pred_gene.exon_count());
        confusion.merge(&score_unpaired_bases(pred_gene, &scored_spans, config));
        unpaired_predictions.push(pred_gene.id().to_string());
    }

    let report = EvaluationReport {
        tool: tool.to_string(),
        exon_policy: policy,
        exon_sensitivity: exon_counts.sensitivity(),
        exon_precision: exon_counts.precision(),
        exon_f1: exon_counts.f1(),
        gene_perfect_rate: gene_counts.perfect_rate(),
        gene_detection_rate: gene_counts.detection_rate(),
        nucleotide_sensitivity: confusion.sensitivity(),
        nucleotide_specificity: confusion.specificity(),
        nucleotide_accuracy: confusion.accuracy(),
        mcc: confusion.mcc(),
        exon_counts,
        gene_counts,
        confusion,
        by_complexity: by_complexity
            .into_iter()
            .map(|(class, counts)| (class, ComplexityBreakdown::from(counts)))
            .collect(),
        unpaired_predictions,
        genes,
    };

    info!(
        "{}: exon F1 {:.4}, perfect genes {:.4}, MCC {:.4}",
        tool, report.exon_f1, report.gene_perfect_rate, report.mcc
    );

    Ok(report)
}

///
/// Evaluate several tools independently and in parallel.
///
/// Reports come back in tool-name order regardless of scheduling.
///
pub fn evaluate_tools(
    reference: &GeneSet,
    predictions: &BTreeMap<String, GeneSet>,
    spans: Option<&RegionSpans>,
    config: &EvaluationConfig,
) -> Result<Vec<EvaluationReport>, EvaluationError> {
    predictions
        .par_iter()
        .map(|(tool, predicted)| evaluate_tool(tool, reference, predicted, spans, config))
        .collect()
}

/// Metric used to order tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    #[default]
    ExonF1,
    ExonSensitivity,
    ExonPrecision,
    GenePerfectRate,
    GeneDetectionRate,
    NucleotideSensitivity,
    NucleotideSpecificity,
    NucleotideAccuracy,
    Mcc,
}

impl RankingMetric {
    pub const ALL: [RankingMetric; 9] = [
        RankingMetric::ExonF1,
        RankingMetric::ExonSensitivity,
        RankingMetric::ExonPrecision,
        RankingMetric::GenePerfectRate,
        RankingMetric::GeneDetectionRate,
        RankingMetric::NucleotideSensitivity,
        RankingMetric::NucleotideSpecificity,
        RankingMetric::NucleotideAccuracy,
        RankingMetric::Mcc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RankingMetric::ExonF1 => "exon_f1",
            RankingMetric::ExonSensitivity => "exon_sensitivity",
            RankingMetric::ExonPrecision => "exon_precision",
            RankingMetric::GenePerfectRate => "gene_perfect_rate",
            RankingMetric::GeneDetectionRate => "gene_detection_rate",
            RankingMetric::NucleotideSensitivity => "nucleotide_sensitivity",
            RankingMetric::NucleotideSpecificity => "nucleotide_specificity",
            RankingMetric::NucleotideAccuracy => "nucleotide_accuracy",
            RankingMetric::Mcc => "mcc",
        }
    }

    pub fn value(&self, report: &EvaluationReport) -> f64 {
        match self {
            RankingMetric::ExonF1 => report.exon_f1,
            RankingMetric::ExonSensitivity => report.exon_sensitivity,
            RankingMetric::ExonPrecision => report.exon_precision,
            RankingMetric::GenePerfectRate => report.gene_perfect_rate,
            RankingMetric::GeneDetectionRate => report.gene_detection_rate,
            RankingMetric::NucleotideSensitivity => report.nucleotide_sensitivity,
            RankingMetric::NucleotideSpecificity => report.nucleotide_specificity,
            RankingMetric::NucleotideAccuracy => report.nucleotide_accuracy,
            RankingMetric::Mcc => report.mcc,
        }
    }
}

impl Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RankingMetric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RankingMetric::ALL
            .iter()
            .find(|m| m.as_str() == s)
            .copied()
            .ok_or_else(|| format!("unknown ranking metric: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTool {
    /// 1-based position.
    pub rank: usize,
    pub tool: String,
    pub metric: RankingMetric,
    pub score: f64,
    pub gene_perfect_rate: f64,
}

///
/// Order tools by `metric`, best first.
///
/// Ties are broken by `gene_perfect_rate` (descending), then by tool name
/// (ascending), so the ordering is a pure function of the reports.
///
pub fn rank_reports(reports: &[EvaluationReport], metric: RankingMetric) -> Vec<RankedTool> {
    let mut ordered: Vec<&EvaluationReport> = reports.iter().collect();
    ordered.sort_by(|a, b| {
        metric
            .value(b)
            .total_cmp(&metric.value(a))
            .then_with(|| b.gene_perfect_rate.total_cmp(&a.gene_perfect_rate))
            .then_with(|| a.tool.cmp(&b.tool))
    });

    ordered
        .into_iter()
        .enumerate()
        .map(|(i, report)| RankedTool {
            rank: i + 1,
            tool: report.tool.clone(),
            metric,
            score: metric.value(report),
            gene_perfect_rate: report.gene_perfect_rate,
        })
        .collect()
}

/// Descriptive statistics of a reference set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSummary {
    pub total_genes: usize,
    pub total_exons: usize,
    pub mean_exons_per_gene: f64,
    /// Sum of gene extents (first exon start to last exon end).
    pub total_span_bases: u64,
    pub mean_gene_length: f64,
    pub by_complexity: BTreeMap<Complexity, usize>,
}

pub fn summarize_dataset(reference: &GeneSet) -> DatasetSummary {
    let total_genes = reference.len();
    let total_exons = reference.exon_count();
    let total_span_bases: u64 = reference
        .iter()
        .filter_map(|g| g.extent())
        .map(|e| e.len() as u64)
        .sum();

    DatasetSummary {
        total_genes,
        total_exons,
        mean_exons_per_gene: ratio(total_exons as u64, total_genes as u64),
        total_span_bases,
        mean_gene_length: ratio(total_span_bases, total_genes as u64),
        by_complexity: reference.complexity_counts(),
    }
}
