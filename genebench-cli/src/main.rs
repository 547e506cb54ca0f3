mod evaluate;
mod rank;
mod summarize;
mod utils;

use anyhow::Result;
use clap::{Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const BIN_NAME: &str = "genebench";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Benchmark ab initio gene predictions against a reference annotation at the exon, gene and nucleotide level.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose)
                .global(true)
                .help("Log per-gene details"),
        )
        .subcommand(evaluate::cli::create_evaluate_cli())
        .subcommand(rank::cli::create_rank_cli())
        .subcommand(summarize::cli::create_summarize_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    match matches.subcommand() {
        //
        // EVALUATE
        //
        Some((evaluate::cli::EVALUATE_CMD, matches)) => {
            utils::init_logging(matches.get_flag("verbose"))?;
            evaluate::handlers::run_evaluate(matches)?;
        }

        //
        // RANK
        //
        Some((rank::cli::RANK_CMD, matches)) => {
            utils::init_logging(matches.get_flag("verbose"))?;
            rank::handlers::run_rank(matches)?;
        }

        //
        // SUMMARIZE
        //
        Some((summarize::cli::SUMMARIZE_CMD, matches)) => {
            utils::init_logging(matches.get_flag("verbose"))?;
            summarize::handlers::run_summarize(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_verbose_flag_reaches_subcommand() {
        let matches = build_parser()
            .try_get_matches_from([
                "genebench",
                "summarize",
                "--reference",
                "ref.json",
                "--verbose",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, summarize::cli::SUMMARIZE_CMD);
        assert!(sub.get_flag("verbose"));
    }
}
