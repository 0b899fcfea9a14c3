use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use bancarizacion::archive::{ArchiveFilter, ArchiveRequest};
use bancarizacion::config::{
    AppConfig, DEFAULT_ARCHIVE, DEFAULT_CONFIG_FILE, DEFAULT_OUTPUT_DIR, DEFAULT_TEMPLATES_DIR,
    PathsConfig,
};
use bancarizacion::gateway::MySqlConnector;
use bancarizacion::pipeline::{
    CompositeObserver, JsonlObserver, PipelineKind, PipelineObserver, PipelineOutcome,
    PipelineSeverity, ReportPeriod, Runner, Settings, TracingObserver, USAGE_EXIT_CODE, exit_code,
};
use chrono::{Local, NaiveDate};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt};

/// Build the bancarización reports.
///
/// Without a pipeline name every pipeline runs in sequence.
#[derive(Debug, Parser)]
#[command(name = "bancarizacion", version)]
struct Cli {
    /// One of `contratos`, `auxventas`, `zipcontratos`.
    pipeline: Option<String>,

    /// INI file with the [mysql] section.
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// First day of the period (YYYY-MM-DD). Defaults to the start of last month.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Last day of the period (YYYY-MM-DD). Defaults to the end of last month.
    #[arg(long)]
    to: Option<NaiveDate>,

    #[arg(long)]
    templates_dir: Option<PathBuf>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Contracts zip for `zipcontratos`.
    #[arg(long)]
    archive: Option<PathBuf>,

    /// Sheet to read inside the contracts archive.
    #[arg(long)]
    sheet: Option<String>,

    /// Append one JSON line per pipeline outcome to this file.
    #[arg(long)]
    run_log: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();

    let cli = Cli::parse();

    let selected = match cli.pipeline.as_deref() {
        None => None,
        Some(token) => match PipelineKind::from_token(token) {
            Some(kind) => Some(kind),
            None => {
                let names: Vec<&str> = PipelineKind::ALL.iter().map(|k| k.token()).collect();
                eprintln!("unknown pipeline '{token}'");
                eprintln!("usage: bancarizacion [{}] [OPTIONS]", names.join("|"));
                return Ok(ExitCode::from(USAGE_EXIT_CODE));
            }
        },
    };

    // `[mysql]` is only required when a database pipeline will run.
    let needs_database = selected.is_none_or(PipelineKind::uses_database);
    let (db, paths) = if needs_database {
        let config = AppConfig::load(&cli.config)
            .with_context(|| format!("loading configuration from {}", cli.config.display()))?;
        info!(config = %config.source.display(), "configuration loaded");
        (Some(config.db), config.paths)
    } else {
        let paths = PathsConfig::load(&cli.config)
            .with_context(|| format!("loading paths from {}", cli.config.display()))?;
        (None, paths)
    };

    let period = ReportPeriod::resolve(cli.from, cli.to, Local::now().date_naive())
        .context("resolving the report period")?;

    let settings = Settings {
        templates_dir: cli
            .templates_dir
            .or(paths.templates)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TEMPLATES_DIR)),
        output_dir: cli
            .output_dir
            .or(paths.output)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR)),
        archive: cli
            .archive
            .or(paths.archive)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ARCHIVE)),
        period,
        template_sheet: None,
        archive_request: ArchiveRequest {
            sheet: cli.sheet,
            filter: ArchiveFilter::default(),
            ..ArchiveRequest::default()
        },
        alert_at_or_above: PipelineSeverity::Critical,
    };

    let mut observers: Vec<Arc<dyn PipelineObserver>> = vec![Arc::new(TracingObserver)];
    if let Some(path) = &cli.run_log {
        observers.push(Arc::new(JsonlObserver::new(path)));
    }

    let runner = match db {
        Some(db) => Runner::new(MySqlConnector::new(db), settings),
        None => Runner::without_database(settings),
    }
    .with_observer(Arc::new(CompositeObserver::new(observers)));

    let outcomes = match selected {
        Some(kind) => vec![(kind, runner.run(kind))],
        None => runner.run_all(),
    };

    for (kind, outcome) in &outcomes {
        match outcome {
            PipelineOutcome::Completed { output, rows } => {
                println!("{kind}: {rows} rows -> {}", output.display());
            }
            PipelineOutcome::Skipped { reason } => println!("{kind}: skipped ({reason})"),
            PipelineOutcome::Failed { error } => println!("{kind}: FAILED ({error})"),
        }
    }

    let code = exit_code(&outcomes);
    if code != 0 {
        error!("one or more pipelines failed");
    }
    Ok(ExitCode::from(code))
}
