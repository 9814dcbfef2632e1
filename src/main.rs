use clap::Parser;
use fieldmap::cli::{self, CliArgs};
use fieldmap::init_logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging()?;

    let summary = cli::run(&args).await?;
    tracing::info!(
        "{} features imported, {} skipped",
        summary.imported,
        summary.skipped
    );
    println!("{}", summary.report.display());
    Ok(())
}
