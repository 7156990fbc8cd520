use std::path::PathBuf;
use std::process::exit;

use clap::{ArgGroup, Parser};
use tracing_subscriber::EnvFilter;

use knight::{run, run_file, Halt};

#[derive(Parser)]
#[command(group(ArgGroup::new("program").required(true).args(["expr", "file"])))]
struct Cli {
    /// Program text to run
    #[arg(short = 'e')]
    expr: Option<String>,

    /// File containing the program to run
    #[arg(short = 'f')]
    file: Option<PathBuf>,
}

/// Log to stderr, filtered by `RUST_LOG`. Silent when it is unset.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn main() {
    init_tracing();
    let args = Cli::parse();

    let result = if let Some(path) = args.file {
        run_file(&path)
    } else if let Some(code) = args.expr {
        run(&code)
    } else {
        eprintln!("Error: no program or path to file given");
        exit(1);
    };

    match result {
        Ok(_) => {}
        Err(Halt::Exit(code)) => exit(code),
        Err(Halt::Error(error)) => {
            eprintln!("Invalid program: {}", error);
            exit(1);
        }
    }
}
