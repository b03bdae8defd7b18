use chrono::NaiveTime;
use clap::{Args, Parser, Subcommand};

/// Scrapes the book catalogue once a day and writes the results to a file.
///
/// Without a subcommand the process waits for the daily trigger and runs
/// forever.
#[derive(Debug, Parser)]
#[command(author, version, about, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub schedule: ScheduleArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Wait for the daily trigger time and crawl (default).
    Schedule(ScheduleArgs),
    /// Crawl the catalogue once, right now.
    Crawl(CrawlOnceArgs),
}

#[derive(Debug, Clone, Args)]
pub struct CrawlArgs {
    /// Site root URL; listing pages live under `<root>catalogue/`.
    #[arg(long, default_value = "http://books.toscrape.com/")]
    pub site_root: String,

    /// Number of listing pages to walk, starting at page 1.
    #[arg(long, default_value_t = 50)]
    pub pages: u32,

    /// Delay after each item request (politeness).
    #[arg(long, default_value_t = 500)]
    pub delay_ms: u64,

    /// Per-request timeout.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Output file, replaced on every run.
    #[arg(long, default_value = "books_data.txt")]
    pub out: String,
}

#[derive(Debug, Clone, Args)]
pub struct ScheduleArgs {
    #[command(flatten)]
    pub crawl: CrawlArgs,

    /// Local wall-clock time of the daily crawl (HH:MM).
    #[arg(long, default_value = "19:00", value_parser = parse_time_of_day)]
    pub at: NaiveTime,

    /// How often to check whether the crawl is due.
    #[arg(long, default_value_t = 30)]
    pub poll_secs: u64,
}

#[derive(Debug, Clone, Args)]
pub struct CrawlOnceArgs {
    #[command(flatten)]
    pub crawl: CrawlArgs,

    /// Skip writing the output file.
    #[arg(long)]
    pub no_save: bool,
}

pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|err| format!("expected HH:MM or HH:MM:SS: {err}"))
}
