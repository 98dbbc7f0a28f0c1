use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use case_ledger::cli::Cli;
use case_ledger::commands::import::{self, ImportSettings};
use case_ledger::error::ImportError;

fn main() {
    init_tracing();

    if let Err(err) = run() {
        if let Some(import_error) = err.downcast_ref::<ImportError>() {
            println!("{}", import_error.to_payload());
            std::process::exit(1);
        }

        error!(error = %err, "import failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    import::run(&ImportSettings::from_cli(&cli))?;
    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
