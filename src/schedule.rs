//! Once-a-day trigger for the crawl.
//!
//! [`Scheduler`] owns a single job: a wall-clock time and the task to run.
//! It wakes every poll interval, runs the task to completion when due, and
//! only then goes back to polling, so two runs never overlap.

use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use chrono::{Local, NaiveDateTime, NaiveTime, TimeDelta};

use crate::cli::ScheduleArgs;
use crate::crawl::{CrawlConfig, Crawler};
use crate::fetch::{HttpFetcher, PageFetcher};

pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

#[async_trait]
pub trait Task: Send + Sync {
    async fn run(&self) -> anyhow::Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledJob {
    pub at: NaiveTime,
    pub next_run: NaiveDateTime,
}

pub struct Scheduler<C> {
    clock: C,
    poll_interval: Duration,
    job: ScheduledJob,
    task: Box<dyn Task>,
}

impl<C: Clock> Scheduler<C> {
    pub fn daily(
        at: NaiveTime,
        task: impl Task + 'static,
        clock: C,
        poll_interval: Duration,
    ) -> Self {
        let next_run = next_run_after(clock.now(), at);
        Self {
            clock,
            poll_interval,
            job: ScheduledJob { at, next_run },
            task: Box::new(task),
        }
    }

    pub fn job(&self) -> ScheduledJob {
        self.job
    }

    /// Runs the task if it is due. Returns whether it ran.
    ///
    /// The next run is computed from the time the task finished, even when the
    /// task failed; the failure is then returned to the caller.
    pub async fn run_pending(&mut self) -> anyhow::Result<bool> {
        if self.clock.now() < self.job.next_run {
            return Ok(false);
        }

        tracing::info!(due = %self.job.next_run, "running scheduled task");
        let outcome = self.task.run().await;
        self.job.next_run = next_run_after(self.clock.now(), self.job.at);
        tracing::info!(next_run = %self.job.next_run, "scheduled task rescheduled");

        outcome.context("scheduled task")?;
        Ok(true)
    }

    /// Polls until `shutdown` resolves. Shutdown is only observed between
    /// polls; a task that is running always completes.
    pub async fn run_until<S>(&mut self, shutdown: S) -> anyhow::Result<()>
    where
        S: Future<Output = ()>,
    {
        tokio::pin!(shutdown);
        loop {
            self.run_pending().await?;
            tokio::select! {
                () = &mut shutdown => {
                    tracing::info!("scheduler stopped");
                    return Ok(());
                }
                () = tokio::time::sleep(self.poll_interval) => {}
            }
        }
    }
}

/// Today at `at` when that is still ahead of `now`, otherwise tomorrow at `at`.
pub fn next_run_after(now: NaiveDateTime, at: NaiveTime) -> NaiveDateTime {
    let today = now.date().and_time(at);
    if today > now {
        today
    } else {
        today + TimeDelta::days(1)
    }
}

/// Crawls with persistence and logs when the output was refreshed.
pub struct DailyCrawl<F> {
    crawler: Crawler<F>,
    out: PathBuf,
}

impl<F> DailyCrawl<F> {
    pub fn new(crawler: Crawler<F>, out: impl Into<PathBuf>) -> Self {
        Self {
            crawler,
            out: out.into(),
        }
    }
}

#[async_trait]
impl<F: PageFetcher> Task for DailyCrawl<F> {
    async fn run(&self) -> anyhow::Result<()> {
        self.crawler
            .crawl_and_persist(Some(&self.out))
            .await
            .context("daily crawl")?;
        let finished_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
        tracing::info!(%finished_at, out = %self.out.display(), "catalogue data updated");
        Ok(())
    }
}

pub async fn run(args: ScheduleArgs) -> anyhow::Result<()> {
    let config = CrawlConfig::from_args(&args.crawl).context("build crawl config")?;
    let fetcher = HttpFetcher::new(config.timeout)?;
    let task = DailyCrawl::new(Crawler::new(config, fetcher), &args.crawl.out);

    let poll_interval = Duration::from_secs(args.poll_secs.max(1));
    let mut scheduler = Scheduler::daily(args.at, task, LocalClock, poll_interval);
    tracing::info!(
        at = %args.at.format("%H:%M"),
        next_run = %scheduler.job().next_run,
        "waiting for scheduled crawl"
    );

    scheduler.run_until(shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(?err, "listen for ctrl-c; running until killed");
        std::future::pending::<()>().await;
    }
}
