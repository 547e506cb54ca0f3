use clap::{Command, arg};

pub const SUMMARIZE_CMD: &str = "summarize";

pub fn create_summarize_cli() -> Command {
    Command::new(SUMMARIZE_CMD)
        .about("Describe a reference gene set: gene and exon counts, spans and complexity classes.")
        .arg(
            arg!(--reference <REFERENCE>)
                .required(true)
                .help("Path to the reference gene set (JSON)"),
        )
        .arg(
            arg!(--output <OUTPUT>)
                .required(false)
                .help("Output JSON path (default: stdout)"),
        )
}
