use clap::Parser;
use std::{io::stdout, path::PathBuf};
use tracing_subscriber::EnvFilter;

use lisp::{error::LispError, repl, Interpreter};

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Files to run line by line, in order, sharing one environment
    files: Vec<PathBuf>,
    /// Do not print the startup banner
    #[arg(long)]
    no_banner: bool,
    /// Log tokens and trees of every line to stderr
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), LispError> {
    let interpreter = Interpreter::new();

    if !cli.files.is_empty() {
        let mut out = stdout().lock();
        for file in &cli.files {
            interpreter.run_file(file, &mut out)?;
        }
        return Ok(());
    }

    if !cli.no_banner {
        println!("{}", repl::banner());
    }
    repl::start(&interpreter)?;
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
