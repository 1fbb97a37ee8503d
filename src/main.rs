use std::io;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use rowql::Repl;

/// An in-memory tabular engine with a line-oriented command language.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Suppress row output of print and join; status lines still carry the
    /// exact counts.
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rowql=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging();

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    Repl::new(stdin, stdout, args.quiet).run()?;
    Ok(())
}
