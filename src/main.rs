use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    catalogue_scraper::logging::init().context("init logging")?;

    let cli = catalogue_scraper::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        None => {
            catalogue_scraper::schedule::run(cli.schedule)
                .await
                .context("schedule")?;
        }
        Some(catalogue_scraper::cli::Command::Schedule(args)) => {
            catalogue_scraper::schedule::run(args)
                .await
                .context("schedule")?;
        }
        Some(catalogue_scraper::cli::Command::Crawl(args)) => {
            catalogue_scraper::crawl::run(args).await.context("crawl")?;
        }
    }

    Ok(())
}
