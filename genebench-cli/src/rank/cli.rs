use clap::{Command, arg};

pub const RANK_CMD: &str = "rank";

pub fn create_rank_cli() -> Command {
    Command::new(RANK_CMD)
        .about("Re-rank the tools of an `evaluate` output by another metric.")
        .arg(
            arg!(--reports <REPORTS>)
                .required(true)
                .help("Path to the JSON written by `genebench evaluate`"),
        )
        .arg(
            arg!(--metric <METRIC>)
                .required(false)
                .default_value("exon_f1")
                .help("exon_f1, exon_sensitivity, exon_precision, gene_perfect_rate, gene_detection_rate, nucleotide_sensitivity, nucleotide_specificity, nucleotide_accuracy or mcc"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: stdout)"),
        )
}
