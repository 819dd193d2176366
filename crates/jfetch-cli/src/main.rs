use std::{
    fs,
    io::{self, Read, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use jfetch::J;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "jfetch", version)]
#[command(about = "Query a JSON document with a jq-like path pattern", long_about = None)]
struct Cli {
    /// Path pattern, e.g. `.tags[0].name`
    pattern: String,

    /// JSON file to read. Reads standard input when omitted
    file: Option<PathBuf>,

    /// Print the result as JSON instead of plain text
    #[arg(long)]
    json: bool,

    /// Exit with status 1 when the pattern does not resolve
    #[arg(short, long)]
    exit_status: bool,

    /// Enable debug logs on standard error
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "jfetch=debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(fmt::layer().with_writer(io::stderr))
        .init();
}

fn read_input(file: Option<&PathBuf>) -> io::Result<String> {
    match file {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let text = read_input(cli.file.as_ref())?;
    let document: J = jfetch::unmarshal(&text)?;
    tracing::debug!(pattern = %cli.pattern, "Evaluating pattern");
    let result = document.q(&cli.pattern);
    if let Some(err) = result.query_error() {
        return Err(err.clone().into());
    }

    let mut stdout = io::stdout().lock();
    if cli.json {
        writeln!(stdout, "{}", jfetch::marshal(&result)?)?;
    } else {
        writeln!(stdout, "{result}")?;
    }

    if cli.exit_status && result.is_nil() {
        Ok(ExitCode::from(1))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            let _ = writeln!(io::stderr(), "Error: {err}");
            ExitCode::from(2)
        }
    }
}
