use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, ValueEnum};
use ipcheck::{addr::to_ipv4, Algorithm, CidrPolicy, Options, ParseOptions, Verdict};
use ipcheck_cli::{Config, DEFAULT_DESIRED, DEFAULT_TOTAL};
use tracing_subscriber::EnvFilter;

/// Checks whether every address listed in one file is covered by the entries of another.
///
/// Each line of a file is a single address (10.0.0.1), a dashed range (10.0.0.1-10.0.0.9) or a
/// CIDR block (10.0.0.0/24).
#[derive(Parser, Debug)]
#[command(name = "ipcheck", version, about)]
struct Args {
    /// File listing the addresses which must be covered
    #[arg(default_value = DEFAULT_DESIRED)]
    desired: PathBuf,

    /// File listing the covering addresses
    #[arg(default_value = DEFAULT_TOTAL)]
    total: PathBuf,

    /// Containment algorithm
    #[arg(long, value_enum, default_value_t = AlgorithmArg::Merge)]
    algorithm: AlgorithmArg,

    /// Mask off host bits of CIDR blocks such as 10.0.0.5/24 instead of rejecting them
    #[arg(long)]
    normalize_cidr: bool,

    /// Report every malformed entry instead of only the first
    #[arg(long)]
    all_errors: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum AlgorithmArg {
    Merge,
    Direct,
}

impl From<AlgorithmArg> for Algorithm {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Merge => Algorithm::Merge,
            AlgorithmArg::Direct => Algorithm::Direct,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        let cidr = if args.normalize_cidr {
            CidrPolicy::Normalize
        } else {
            CidrPolicy::Strict
        };

        Config {
            desired: args.desired,
            total: args.total,
            options: Options {
                parse: ParseOptions { cidr },
                algorithm: args.algorithm.into(),
            },
            all_errors: args.all_errors,
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from(Args::parse());

    match ipcheck_cli::run(&config) {
        Ok(Verdict::Match) => {
            println!("match");
            ExitCode::SUCCESS
        }
        Ok(Verdict::NoMatch(uncovered)) => {
            println!("no match");
            println!(
                "first uncovered address: {} ({})",
                to_ipv4(uncovered.address),
                uncovered.address
            );
            ExitCode::from(1)
        }
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
