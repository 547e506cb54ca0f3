use clap::{ArgAction, Command, arg};

pub const EVALUATE_CMD: &str = "evaluate";

pub fn create_evaluate_cli() -> Command {
    Command::new(EVALUATE_CMD)
        .about("Score one or more tools' gene predictions against a reference gene set.")
        .arg(
            arg!(--reference <REFERENCE>)
                .required(true)
                .help("Path to the reference gene set (JSON)"),
        )
        .arg(
            arg!(--prediction <PREDICTION>)
                .required(true)
                .action(ArgAction::Append)
                .help("Predictions of one tool as TOOL=PATH (JSON); repeat once per tool"),
        )
        .arg(
            arg!(--spans <SPANS>)
                .required(false)
                .help("JSON object mapping reference gene id to a [start, end] nucleotide span"),
        )
        .arg(
            arg!(--config <CONFIG>)
                .required(false)
                .help("Path to an evaluation config (TOML)"),
        )
        .arg(
            arg!(--metric <METRIC>)
                .required(false)
                .default_value("exon_f1")
                .help("Metric used to rank the tools"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: stdout)"),
        )
}
