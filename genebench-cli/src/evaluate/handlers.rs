use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use serde::{Deserialize, Serialize};

use genebench_core::models::GeneSet;
use genebench_eval::{
    DatasetSummary, EvaluationConfig, EvaluationReport, RankedTool, RankingMetric, RegionSpans,
    evaluate_tools, rank_reports, summarize_dataset,
};

use crate::utils::{read_json, write_json};

/// Everything `evaluate` writes; `rank` reads the same document back.
#[derive(Serialize, Deserialize)]
pub struct EvaluationOutput {
    pub dataset: DatasetSummary,
    pub config: EvaluationConfig,
    pub ranking: Vec<RankedTool>,
    pub reports: Vec<EvaluationReport>,
}

///
/// Split a `TOOL=PATH` argument.
///
pub fn parse_prediction_arg(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((tool, path)) if !tool.is_empty() && !path.is_empty() => {
            Ok((tool.to_string(), path.to_string()))
        }
        _ => bail!("Predictions must be given as TOOL=PATH, got: {}", raw),
    }
}

pub fn load_predictions<'a>(
    args: impl ExactSizeIterator<Item = &'a String>,
) -> Result<BTreeMap<String, GeneSet>> {
    let pb = ProgressBar::new(args.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?,
    );

    let mut predictions = BTreeMap::new();
    for raw in args {
        let (tool, path) = parse_prediction_arg(raw)?;
        pb.set_message(tool.clone());
        if predictions.contains_key(&tool) {
            bail!("Tool {} was given more than once", tool);
        }
        let genes: GeneSet = read_json(&path)?;
        info!("{}: loaded {} predicted genes from {}", tool, genes.len(), path);
        predictions.insert(tool, genes);
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(predictions)
}

pub fn run_evaluate(matches: &ArgMatches) -> Result<()> {
    let reference_path = matches
        .get_one::<String>("reference")
        .context("--reference is required")?;
    let prediction_args = matches
        .get_many::<String>("prediction")
        .context("at least one --prediction is required")?;
    let spans_path = matches.get_one::<String>("spans");
    let config_path = matches.get_one::<String>("config");
    let output_path = matches.get_one::<String>("output");
    let metric: RankingMetric = match matches.get_one::<String>("metric") {
        Some(raw) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => RankingMetric::default(),
    };

    let config = match config_path {
        Some(p) => EvaluationConfig::try_from(Path::new(p))
            .with_context(|| format!("Failed to load config: {}", p))?,
        None => EvaluationConfig::default(),
    };

    let reference: GeneSet = read_json(reference_path)?;
    info!(
        "Loaded {} reference genes ({} exons) from {}",
        reference.len(),
        reference.exon_count(),
        reference_path
    );

    let spans: Option<RegionSpans> = spans_path.map(|p| read_json(p)).transpose()?;
    let predictions = load_predictions(prediction_args)?;

    let reports = evaluate_tools(&reference, &predictions, spans.as_ref(), &config)?;
    let ranking = rank_reports(&reports, metric);

    let output = EvaluationOutput {
        dataset: summarize_dataset(&reference),
        config,
        ranking,
        reports,
    };

    write_json(&output, output_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_parser;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    #[case("augustus=preds/a.json", "augustus", "preds/a.json")]
    #[case("snap=x=y.json", "snap", "x=y.json")]
    fn test_parse_prediction_arg(#[case] raw: &str, #[case] tool: &str, #[case] path: &str) {
        let (t, p) = parse_prediction_arg(raw).unwrap();
        assert_eq!(t, tool);
        assert_eq!(p, path);
    }

    #[rstest]
    #[case("no_separator.json")]
    #[case("=a.json")]
    #[case("tool=")]
    fn test_parse_prediction_arg_rejects(#[case] raw: &str) {
        assert!(parse_prediction_arg(raw).is_err());
    }

    #[rstest]
    fn test_duplicate_tool_rejected() {
        let args = vec![
            "a=../tests/data/genes/tool_a.json".to_string(),
            "a=../tests/data/genes/tool_b.json".to_string(),
        ];
        assert!(load_predictions(args.iter()).is_err());
    }

    #[rstest]
    fn test_run_evaluate_writes_report() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("eval.json");
        let out_str = out.to_string_lossy().to_string();

        let matches = build_parser()
            .try_get_matches_from([
                "genebench",
                "evaluate",
                "--reference",
                "../tests/data/genes/reference.json",
                "--prediction",
                "tool_b=../tests/data/genes/tool_b.json",
                "--prediction",
                "tool_a=../tests/data/genes/tool_a.json",
                "--spans",
                "../tests/data/genes/spans.json",
                "--output",
                out_str.as_str(),
            ])
            .unwrap();
        let (_, sub) = matches.subcommand().unwrap();
        run_evaluate(sub).unwrap();

        let output: EvaluationOutput = read_json(&out_str).unwrap();
        assert_eq!(output.dataset.total_genes, 4);
        assert_eq!(output.reports.len(), 2);
        assert_eq!(output.reports[0].tool, "tool_a");
        assert_eq!(output.reports[1].tool, "tool_b");
        assert_eq!(output.reports[0].gene_perfect_rate, 1.0);
        assert_eq!(output.reports[0].mcc, 1.0);
        assert_eq!(output.ranking[0].tool, "tool_a");
        assert_eq!(output.reports[1].unpaired_predictions, vec!["gX".to_string()]);
    }
}
