// ==========================================
// 高校排课系统 - 运维命令行
// ==========================================
// 子命令: generate / resolve / detect / import-courses / deliver-mail
// 结果以 JSON 输出到 stdout，日志输出到 stderr
// ==========================================

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;

use edu_scheduler::app::{get_default_db_path, ENV_DB_PATH};
use edu_scheduler::config::{ConfigManager, PlannerConfig, SmtpConfig};
use edu_scheduler::db::{init_schema, open_sqlite_connection};
use edu_scheduler::domain::{ConflictResolutionRequest, ScheduleRequest, Timetable};
use edu_scheduler::engine::{ConflictDetector, ConflictResolver, GenerativePlanner, ScheduleOrchestrator};
use edu_scheduler::importer::CourseImporter;
use edu_scheduler::notify::{deliver_pending, SmtpMailTransport};
use edu_scheduler::repository::MailOutboxRepository;
use edu_scheduler::{logging, APP_NAME, VERSION};

#[derive(Parser)]
#[command(name = "edu-scheduler")]
#[command(about = "University timetable generation and conflict handling")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// SQLite database path (settings are read from it)
    #[arg(long, env = ENV_DB_PATH)]
    db: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate candidate timetables from a schedule request (JSON).
    Generate {
        request: PathBuf,
        /// Print the source and fallback reason alongside the options
        #[arg(long)]
        report: bool,
    },

    /// Suggest adjustments for reported conflicts (JSON).
    Resolve { conflicts: PathBuf },

    /// Detect overlapping slots in a timetable document (JSON).
    Detect { timetable: PathBuf },

    /// Import a course catalogue (.csv / .xlsx / .xls).
    ImportCourses { file: PathBuf },

    /// Send queued feedback mail through SMTP (SMTP_HOST/USER/PASS required).
    DeliverMail,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn open_shared(db: Option<PathBuf>) -> Result<Arc<Mutex<rusqlite::Connection>>> {
    let db_path = db
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(get_default_db_path);
    let conn = open_sqlite_connection(&db_path)
        .with_context(|| format!("cannot open database {}", db_path))?;
    init_schema(&conn)?;
    Ok(Arc::new(Mutex::new(conn)))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    let cli = Cli::parse();
    info!("{} v{}", APP_NAME, VERSION);

    match cli.command {
        Commands::Generate { request, report } => {
            let req: ScheduleRequest = read_json(&request)?;

            let config = Arc::new(
                ConfigManager::from_connection(open_shared(cli.db)?)
                    .map_err(|e| anyhow::anyhow!("config init failed: {}", e))?,
            );

            let planner_config = PlannerConfig::from_env();
            let planner = GenerativePlanner::from_config(&planner_config)?;
            let orchestrator = ScheduleOrchestrator::new(config, planner, planner_config.timeout);

            let generated = orchestrator.generate_with_report(&req).await;
            info!(
                source = ?generated.source,
                fallback = ?generated.fallback_reason,
                options = generated.options.len(),
                "排课完成"
            );
            if report {
                print_json(&serde_json::json!({
                    "options": generated.options,
                    "source": generated.source,
                    "fallbackReason": generated.fallback_reason,
                }))?;
            } else {
                print_json(&serde_json::json!({ "options": generated.options }))?;
            }
        }
        Commands::Resolve { conflicts } => {
            let req: ConflictResolutionRequest = read_json(&conflicts)?;
            print_json(&ConflictResolver::new().resolve_request(&req))?;
        }
        Commands::Detect { timetable } => {
            let mut tt: Timetable = read_json(&timetable)?;
            tt.refresh_indexes();
            print_json(&ConflictDetector::new().detect(&tt))?;
        }
        Commands::ImportCourses { file } => {
            let outcome = CourseImporter::new().import_file(&file)?;
            let errors: Vec<String> = outcome.errors.iter().map(|e| e.to_string()).collect();
            print_json(&serde_json::json!({
                "courses": outcome.courses,
                "errors": errors,
            }))?;
        }
        Commands::DeliverMail => {
            let smtp = SmtpConfig::from_env()
                .context("SMTP is not configured (set SMTP_HOST, SMTP_USER and SMTP_PASS)")?;
            let transport = SmtpMailTransport::new(&smtp)?;
            let outbox = MailOutboxRepository::from_connection(open_shared(cli.db)?);
            let delivered = deliver_pending(&outbox, &transport).await?;
            let pending = outbox.list_pending()?.len();
            print_json(&serde_json::json!({
                "delivered": delivered,
                "pending": pending,
            }))?;
        }
    }

    Ok(())
}
