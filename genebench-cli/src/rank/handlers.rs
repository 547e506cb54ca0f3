use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use genebench_eval::{RankingMetric, rank_reports};

use crate::evaluate::handlers::EvaluationOutput;
use crate::utils::{read_json, write_json};

pub fn run_rank(matches: &ArgMatches) -> Result<()> {
    let reports_path = matches
        .get_one::<String>("reports")
        .context("--reports is required")?;
    let output_path = matches.get_one::<String>("output");
    let metric: RankingMetric = match matches.get_one::<String>("metric") {
        Some(raw) => raw.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => RankingMetric::default(),
    };

    let evaluation: EvaluationOutput = read_json(reports_path)?;
    let ranking = rank_reports(&evaluation.reports, metric);

    for entry in &ranking {
        info!("{}. {} ({} = {:.4})", entry.rank, entry.tool, metric, entry.score);
    }

    write_json(&ranking, output_path)
}
