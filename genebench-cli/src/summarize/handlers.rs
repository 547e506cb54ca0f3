use anyhow::{Context, Result};
use clap::ArgMatches;

use genebench_core::models::GeneSet;
use genebench_eval::summarize_dataset;

use crate::utils::{read_json, write_json};

pub fn run_summarize(matches: &ArgMatches) -> Result<()> {
    let reference_path = matches
        .get_one::<String>("reference")
        .context("--reference is required")?;
    let output_path = matches.get_one::<String>("output");

    let reference: GeneSet = read_json(reference_path)?;
    write_json(&summarize_dataset(&reference), output_path)
}
