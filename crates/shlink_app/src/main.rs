mod config;
mod logging;
mod report;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand};
use shlink_core::{
    first_page_route, interval_to_date_range, DateInterval, DateRange, DateRangeOrInterval, Msg,
    OrphanVisitType, ShortUrlsQuery, VisitCategory, VisitsQuery,
};
use shlink_engine::{EngineEvent, EngineHandle, LoadOutcome, ReqwestVisitsApi, Store};
use shlink_logging::{shlink_info, shlink_warn};

use crate::config::{AppConfig, LogConfig, DEFAULT_CONFIG_PATH};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Parser)]
#[command(name = "shlink", version, about = "Inspect visit statistics of a Shlink server")]
struct Cli {
    /// Path to the RON configuration file.
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Load every page of visits and print a summary.
    Visits(VisitsArgs),
    /// Print the first-page listing route after changing filters.
    Route(RouteArgs),
}

#[derive(Debug, Args)]
struct RangeArgs {
    #[arg(long, value_parser = parse_interval, conflicts_with_all = ["start_date", "end_date"])]
    interval: Option<DateInterval>,
    /// RFC 3339 timestamp or `YYYY-MM-DD`.
    #[arg(long, value_parser = parse_date)]
    start_date: Option<DateTime<Utc>>,
    #[arg(long, value_parser = parse_date)]
    end_date: Option<DateTime<Utc>>,
}

impl RangeArgs {
    fn selection(&self) -> Option<DateRangeOrInterval> {
        match self.interval {
            Some(interval) => Some(interval.into()),
            None if self.start_date.is_some() || self.end_date.is_some() => {
                Some(DateRange::new(self.start_date, self.end_date).into())
            }
            None => None,
        }
    }

    fn range(&self) -> DateRange {
        match self.interval {
            Some(interval) => interval_to_date_range(interval),
            None => DateRange::new(self.start_date, self.end_date),
        }
    }
}

#[derive(Debug, Args)]
struct VisitsArgs {
    /// Load orphan visits instead of visits to short URLs.
    #[arg(long)]
    orphan: bool,
    #[arg(long = "type", value_parser = parse_orphan_type, requires = "orphan")]
    orphan_type: Option<OrphanVisitType>,
    #[arg(long)]
    exclude_bots: bool,
    /// Request cancellation once this many seconds have passed.
    #[arg(long)]
    cancel_after_secs: Option<u64>,
    #[command(flatten)]
    range: RangeArgs,
}

#[derive(Debug, Args)]
struct RouteArgs {
    #[arg(long)]
    server_id: String,
    /// Current query string of the listing.
    #[arg(long, default_value = "")]
    query: String,
    #[arg(long)]
    search: Option<String>,
    #[arg(long)]
    remove_tag: Vec<String>,
    #[command(flatten)]
    range: RangeArgs,
}

fn parse_interval(value: &str) -> Result<DateInterval, String> {
    value.parse()
}

fn parse_orphan_type(value: &str) -> Result<OrphanVisitType, String> {
    value.parse()
}

fn parse_date(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(date) = DateTime::parse_from_rfc3339(value) {
        return Ok(date.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|date| date.and_time(NaiveTime::MIN).and_utc())
        .map_err(|err| format!("invalid date `{value}`: {err}"))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::Visits(args) => {
            let config = AppConfig::load(&cli.config)
                .with_context(|| format!("loading {}", cli.config.display()))?;
            logging::initialize(&config.log);
            run_visits(&config, args)
        }
        Command::Route(args) => {
            logging::initialize(&LogConfig::default());
            run_route(args);
            Ok(())
        }
    }
}

fn run_visits(config: &AppConfig, args: VisitsArgs) -> anyhow::Result<()> {
    let api = ReqwestVisitsApi::new(config.api_settings())?;
    let engine = EngineHandle::new(Arc::new(api), config.loader_settings(), Store::default())?;

    let category = if args.orphan {
        VisitCategory::Orphan
    } else {
        VisitCategory::NonOrphan
    };
    let query = VisitsQuery {
        exclude_bots: args.exclude_bots,
        ..VisitsQuery::from_date_range(&args.range.range())
    };
    engine.dispatch(Msg::LoadVisitsRequested {
        category,
        query,
        orphan_type: args.orphan_type,
    });

    let started = Instant::now();
    let cancel_at = args.cancel_after_secs.map(Duration::from_secs);
    let mut cancel_sent = false;
    let outcome = loop {
        if let Some(EngineEvent::LoadCompleted {
            category: done,
            outcome,
        }) = engine.recv_timeout(POLL_INTERVAL)
        {
            if done == category {
                break outcome;
            }
        }
        if engine.store().consume_dirty() {
            let info = engine.store().visits(category);
            if info.loading {
                eprintln!("{}", report::progress_line(category, &info));
            }
        }
        if !cancel_sent && cancel_at.is_some_and(|at| started.elapsed() >= at) {
            shlink_info!("Cancelling {} visits load", category);
            engine.dispatch(Msg::CancelLoadRequested(category));
            cancel_sent = true;
        }
    };

    let info = engine.store().visits(category);
    match outcome {
        LoadOutcome::Finished { .. } => {
            print!("{}", report::render(category, args.range.selection(), &info));
            Ok(())
        }
        LoadOutcome::Cancelled { pages_loaded } => {
            println!(
                "Load cancelled after {pages_loaded} pages ({}% of pages fetched)",
                info.progress
            );
            Ok(())
        }
        LoadOutcome::Failed(err) => {
            shlink_warn!("{} visits load failed: {}", category, err);
            print!("{}", report::render(category, args.range.selection(), &info));
            bail!("loading {category} visits failed: {err}")
        }
    }
}

fn run_route(args: RouteArgs) {
    let mut query = ShortUrlsQuery::parse(&args.query);
    if let Some(search) = args.search {
        query = query.with_search(Some(search));
    }
    for tag in &args.remove_tag {
        query = query.without_tag(tag);
    }
    if args.range.selection().is_some() {
        query = query.with_date_range(args.range.range());
    }
    println!("{}", first_page_route(&args.server_id, &query));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn dates_accept_rfc3339_and_plain_days() {
        assert_eq!(
            parse_date("2024-03-15"),
            Ok(Utc.with_ymd_and_hms(2024, 3, 15, 0, 0, 0).unwrap())
        );
        assert_eq!(
            parse_date("2024-03-15T10:00:00+02:00"),
            Ok(Utc.with_ymd_and_hms(2024, 3, 15, 8, 0, 0).unwrap())
        );
        assert!(parse_date("15/03/2024").is_err());
    }

    #[test]
    fn cli_parses_visits_arguments() {
        let cli = Cli::try_parse_from([
            "shlink",
            "visits",
            "--orphan",
            "--type",
            "base_url",
            "--interval",
            "last7Days",
        ])
        .unwrap();

        let Command::Visits(args) = cli.command else {
            panic!("expected visits command");
        };
        assert!(args.orphan);
        assert_eq!(args.orphan_type, Some(OrphanVisitType::BaseUrl));
        assert_eq!(
            args.range.selection(),
            Some(DateInterval::Last7Days.into())
        );
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
    }

    #[test]
    fn interval_conflicts_with_explicit_dates() {
        let result = Cli::try_parse_from([
            "shlink",
            "visits",
            "--interval",
            "today",
            "--start-date",
            "2024-01-01",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn orphan_type_requires_orphan_flag() {
        assert!(Cli::try_parse_from(["shlink", "visits", "--type", "base_url"]).is_err());
    }

    #[test]
    fn explicit_dates_form_a_range_selection() {
        let cli = Cli::try_parse_from([
            "shlink",
            "route",
            "--server-id",
            "1",
            "--start-date",
            "2024-01-01",
        ])
        .unwrap();
        let Command::Route(args) = cli.command else {
            panic!("expected route command");
        };
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        assert_eq!(
            args.range.selection(),
            Some(DateRange::new(Some(start), None).into())
        );
        assert_eq!(args.range.range(), DateRange::new(Some(start), None));
    }
}
