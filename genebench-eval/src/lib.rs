//! Scoring engine for comparing predicted gene structures against a reference.
//!
//! Agreement is measured at three levels:
//!
//! - Exon level: each reference exon is matched exactly or by overlap (IoU)
//!   against the predicted exons, giving sensitivity, precision and F1
//! - Gene level: each reference gene is classified as perfect, partial or missed
//! - Nucleotide level: coding masks are compared base by base, giving a
//!   confusion matrix and the Matthews correlation coefficient
//!
//! # Example
//!
//! ```
//! use genebench_core::models::{GeneModel, GeneSet, Strand};
//! use genebench_eval::{EvaluationConfig, evaluate_tool};
//!
//! let reference = GeneSet::new(vec![
//!     GeneModel::from_coords("g1", Strand::Plus, &[(100, 200), (300, 400)]).unwrap(),
//! ])
//! .unwrap();
//! let predicted = GeneSet::new(vec![
//!     GeneModel::from_coords("g1", Strand::Plus, &[(100, 200), (305, 405)]).unwrap(),
//! ])
//! .unwrap();
//!
//! let config = EvaluationConfig::default();
//! let report = evaluate_tool("tool", &reference, &predicted, None, &config).unwrap();
//! assert_eq!(report.exon_sensitivity, 1.0);
//! assert_eq!(report.gene_perfect_rate, 0.0);
//! ```

pub mod aggregate;
pub mod config;
pub mod errors;
pub mod gene_scoring;
pub mod matching;
pub mod nucleotide;
pub mod utils;

// re-exports
pub use aggregate::{
    DatasetSummary, EvaluationReport, RankedTool, RankingMetric, RegionSpans, evaluate_tool,
    evaluate_tools, rank_reports, summarize_dataset,
};
pub use config::EvaluationConfig;
pub use errors::EvaluationError;
pub use gene_scoring::{GeneVerdict, Pairing, compare_genes};
pub use matching::{MatchKind, MatchPolicy, match_exons};
