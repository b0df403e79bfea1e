// ==========================================
// 团队排练排期系统 - 命令行入口
// ==========================================
// 输出: stdout 为 JSON, 日志写 stderr
// ==========================================

use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use rehearsal_planner::app::{get_default_db_path, AppState};
use rehearsal_planner::domain::{AvailabilityStatus, DateRange, Period};
use rehearsal_planner::i18n::{self, t, t_with_args};
use rehearsal_planner::importer::AvailabilityCsvImporter;
use rehearsal_planner::logging;

#[derive(Parser)]
#[command(name = "rehearsal-planner")]
#[command(about = "Team availability aggregation and rehearsal date suggestions", long_about = None)]
#[command(version)]
struct Cli {
    /// SQLite database path (defaults to the user data directory)
    #[arg(long, global = true, value_name = "PATH")]
    db: Option<PathBuf>,

    /// Message language: zh-CN or en
    #[arg(long, global = true, default_value = "zh-CN")]
    lang: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the database schema
    Init,

    /// Import members from a CSV file (id,name,status)
    ImportRoster { csv: PathBuf },

    /// Import availability from a CSV file (member_id,date,morning,evening)
    ImportAvailability { csv: PathBuf },

    /// Show the availability summary of one day
    Summary { date: NaiveDate },

    /// Rank candidate rehearsal dates
    Suggest(SuggestArgs),

    /// Show the tier of every day in a month
    Calendar(CalendarArgs),

    /// Set one member's availability for a day or a range of days
    Set(SetArgs),

    /// Show or change scheduling configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Args)]
struct SuggestArgs {
    /// First day of the window (defaults to today)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last day of the window (defaults to the configured window)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Minimum available members (defaults to the configured value)
    #[arg(long = "min")]
    min_required: Option<u32>,
}

#[derive(Args)]
struct CalendarArgs {
    year: i32,
    month: u32,

    /// Selectable window start (defaults to today)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Selectable window end (defaults to the configured window)
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[derive(Args)]
struct SetArgs {
    member: String,
    date: NaiveDate,
    #[arg(value_parser = parse_period)]
    period: Period,
    #[arg(value_parser = parse_status)]
    status: AvailabilityStatus,

    /// Apply the same status to every day up to this date
    #[arg(long)]
    until: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Print stored values and the effective configuration
    Show,

    /// Store a value in the global scope
    Set { key: String, value: String },
}

fn parse_period(s: &str) -> Result<Period, String> {
    Period::parse(s).ok_or_else(|| format!("invalid period '{}', expected morning or evening", s))
}

fn parse_status(s: &str) -> Result<AvailabilityStatus, String> {
    AvailabilityStatus::parse(s).ok_or_else(|| {
        format!(
            "invalid status '{}', expected available, maybe, unavailable or unknown",
            s
        )
    })
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// 未显式指定的窗口端点按配置补齐
fn resolve_window(
    state: &AppState,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<DateRange> {
    let start = start.unwrap_or_else(|| Local::now().date_naive());
    let end = match end {
        Some(end) => end,
        None => state.availability_api.default_suggestion_window(start)?.end,
    };
    Ok(DateRange::new(start, end))
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let cli = Cli::parse();
    let locale = i18n::set_locale(&cli.lang);
    tracing::debug!(locale, "界面语言");

    let db_path = match cli.db {
        Some(path) => path.to_string_lossy().to_string(),
        None => get_default_db_path(),
    };
    tracing::debug!(db_path = %db_path, "使用数据库");

    let state = AppState::new(db_path.clone())
        .await
        .map_err(|e| anyhow!(e))
        .context("无法初始化AppState")?;

    match cli.command {
        Commands::Init => {
            print_json(&json!({
                "db_path": db_path,
                "message": t_with_args("cli.db_initialized", &[("path", db_path.as_str())]),
            }))?;
        }

        Commands::ImportRoster { csv } => {
            let count = AvailabilityCsvImporter::import_roster(&csv, &state.member_repo)?;
            let count_text = count.to_string();
            print_json(&json!({
                "members": count,
                "message": t_with_args("import.roster_done", &[("count", count_text.as_str())]),
            }))?;
        }

        Commands::ImportAvailability { csv } => {
            let summary =
                AvailabilityCsvImporter::import_availability(&csv, state.availability_repo.as_ref())?;
            let members_text = summary.members.to_string();
            let entries_text = summary.entries.to_string();
            print_json(&json!({
                "members": summary.members,
                "entries": summary.entries,
                "message": t_with_args(
                    "import.availability_done",
                    &[
                        ("members", members_text.as_str()),
                        ("entries", entries_text.as_str()),
                    ],
                ),
            }))?;
        }

        Commands::Summary { date } => {
            let summary = state.availability_api.get_day_summary(date)?;
            print_json(&summary)?;
        }

        Commands::Suggest(args) => {
            let window = resolve_window(&state, args.start, args.end)?;
            let response = state.availability_api.get_rehearsal_suggestions(
                window.start,
                window.end,
                args.min_required,
            )?;

            let message = match &response.best {
                Some(best) => {
                    let date = best.date.to_string();
                    let count = best.summary.available_count().to_string();
                    t_with_args("suggest.best", &[("date", date.as_str()), ("count", count.as_str())])
                }
                None => t("suggest.none"),
            };
            tracing::info!("{}", message);
            print_json(&response)?;
        }

        Commands::Calendar(args) => {
            let view = DateRange::month(args.year, args.month)
                .ok_or_else(|| anyhow!("invalid month: {}-{}", args.year, args.month))?;
            let active = resolve_window(&state, args.start, args.end)?;
            let cells = state.availability_api.get_calendar_tiers(&active, &view)?;
            print_json(&cells)?;
        }

        Commands::Set(args) => {
            let range = DateRange::new(args.date, args.until.unwrap_or(args.date));
            let written = state.availability_api.apply_selection(
                &args.member,
                &range,
                args.period,
                args.status,
            )?;
            let range_text = range.to_string();
            let period_text = args.period.label();
            let status_text = args.status.label();
            print_json(&json!({
                "member_id": args.member,
                "range": range,
                "period": args.period,
                "status": args.status,
                "written": written,
                "message": t_with_args(
                    "cli.availability_updated",
                    &[
                        ("member", args.member.as_str()),
                        ("date", range_text.as_str()),
                        ("period", period_text.as_str()),
                        ("status", status_text.as_str()),
                    ],
                ),
            }))?;
        }

        Commands::Config(ConfigCommand::Show) => {
            let stored: serde_json::Value = serde_json::from_str(
                &state
                    .config_manager
                    .get_config_snapshot()
                    .map_err(|e| anyhow!("{}", e))?,
            )?;
            print_json(&json!({
                "stored": stored,
                "effective": state.config,
            }))?;
        }

        Commands::Config(ConfigCommand::Set { key, value }) => {
            state
                .config_manager
                .set_config_value(&key, &value)
                .map_err(|e| anyhow!("{}", e))?;
            print_json(&json!({ "key": key, "value": value, "message": t("common.success") }))?;
        }
    }

    Ok(())
}
