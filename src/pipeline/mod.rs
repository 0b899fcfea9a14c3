//! Named report pipelines.
//!
//! | token          | what it does                                                        |
//! |----------------|---------------------------------------------------------------------|
//! | `contratos`    | contracts query → [`ContractMapper`] → `Contratos.xlsx` template     |
//! | `auxventas`    | sales/payments query → [`SalesMapper`] → `AuxVentas.xlsx` template   |
//! | `zipcontratos` | contracts archive → pending rows → generic workbook                 |
//!
//! [`Runner::run`] contains every failure of a pipeline: the error is reported to the observer
//! (see [`TracingObserver`] for log output) and turned into a [`PipelineOutcome`], so
//! [`Runner::run_all`] always gets to the next pipeline.
//!
//! [`ContractMapper`]: crate::mapping::ContractMapper
//! [`SalesMapper`]: crate::mapping::SalesMapper

mod observer;
mod period;
pub mod reports;

use std::fmt;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use serde::Serialize;
use tracing::{debug, info, info_span};

use crate::archive::{ArchiveRequest, extract_pending_contracts};
use crate::error::{ReportError, ReportResult};
use crate::gateway::{Connector, fetch_once};
use crate::mapping::map_records;
use crate::report::{
    populate_template, report_output_name, template_output_name, unique_path, write_records,
};

pub use observer::{
    CompositeObserver, JsonlObserver, PipelineContext, PipelineObserver, PipelineSeverity,
    PipelineStats, TracingObserver,
};
pub use period::ReportPeriod;
pub use reports::{ARCHIVE_REPORT_NAME, ARCHIVE_REPORT_SHEET, CONTRACTS_REPORT, SALES_REPORT, TemplateReport};

/// The pipelines the command line can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineKind {
    Contratos,
    AuxVentas,
    ZipContratos,
}

impl PipelineKind {
    /// Every pipeline, in the order a full run executes them.
    pub const ALL: [PipelineKind; 3] = [Self::Contratos, Self::AuxVentas, Self::ZipContratos];

    pub fn token(self) -> &'static str {
        match self {
            Self::Contratos => "contratos",
            Self::AuxVentas => "auxventas",
            Self::ZipContratos => "zipcontratos",
        }
    }

    /// Whether the pipeline queries the database.
    pub fn uses_database(self) -> bool {
        !matches!(self, Self::ZipContratos)
    }

    /// Parse a command-line token (case-insensitive).
    pub fn from_token(token: &str) -> Option<Self> {
        let token = token.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.token().eq_ignore_ascii_case(token))
    }
}

impl fmt::Display for PipelineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Result of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// A report was written.
    Completed { output: PathBuf, rows: usize },
    /// Nothing to report (empty query result or no pending rows).
    Skipped { reason: String },
    Failed { error: String },
}

impl PipelineOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Process exit code for an unrecognized pipeline name; no pipeline runs.
pub const USAGE_EXIT_CODE: u8 = 2;

/// Process exit code for a finished run: `1` if any pipeline failed, `0` otherwise.
pub fn exit_code(outcomes: &[(PipelineKind, PipelineOutcome)]) -> u8 {
    u8::from(outcomes.iter().any(|(_, o)| o.is_failure()))
}

/// Paths and parameters shared by every pipeline.
#[derive(Debug, Clone)]
pub struct Settings {
    pub templates_dir: PathBuf,
    pub output_dir: PathBuf,
    pub archive: PathBuf,
    pub period: ReportPeriod,
    /// Template sheet receiving rows; `None` uses the first sheet.
    pub template_sheet: Option<String>,
    pub archive_request: ArchiveRequest,
    /// Failures at or above this severity go to [`PipelineObserver::on_alert`].
    pub alert_at_or_above: PipelineSeverity,
}

/// Runs pipelines against a [`Connector`].
///
/// A runner built with [`Runner::without_database`] can only run pipelines for which
/// [`PipelineKind::uses_database`] is false; database pipelines fail with a configuration error.
pub struct Runner<C: Connector> {
    connector: Option<C>,
    settings: Settings,
    observer: Option<Arc<dyn PipelineObserver>>,
}

impl<C: Connector> fmt::Debug for Runner<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runner")
            .field("connector", &self.connector.as_ref().map(Connector::describe))
            .field("settings", &self.settings)
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

struct RunStats {
    output: PathBuf,
    rows: usize,
}

impl<C: Connector> Runner<C> {
    pub fn new(connector: C, settings: Settings) -> Self {
        Self {
            connector: Some(connector),
            settings,
            observer: None,
        }
    }

    /// A runner with no database configured.
    pub fn without_database(settings: Settings) -> Self {
        Self {
            connector: None,
            settings,
            observer: None,
        }
    }

    /// Attach an observer for pipeline outcomes.
    pub fn with_observer(mut self, observer: Arc<dyn PipelineObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Run every pipeline in order, continuing after failures.
    pub fn run_all(&self) -> Vec<(PipelineKind, PipelineOutcome)> {
        PipelineKind::ALL
            .into_iter()
            .map(|kind| (kind, self.run(kind)))
            .collect()
    }

    /// Run one pipeline. Never panics on pipeline errors and never propagates them.
    pub fn run(&self, kind: PipelineKind) -> PipelineOutcome {
        let span = info_span!("pipeline", name = kind.token());
        let _entered = span.enter();
        let ctx = PipelineContext::new(kind);
        info!(
            from = %self.settings.period.from,
            to = %self.settings.period.to,
            "pipeline started"
        );

        match self.try_run(kind) {
            Ok(stats) => {
                if let Some(o) = &self.observer {
                    o.on_success(
                        &ctx,
                        &PipelineStats {
                            rows: stats.rows,
                            output: stats.output.clone(),
                        },
                    );
                }
                info!(output = %stats.output.display(), rows = stats.rows, "pipeline finished");
                PipelineOutcome::Completed {
                    output: stats.output,
                    rows: stats.rows,
                }
            }
            Err(ReportError::EmptyResult { context }) => {
                debug!(reason = %context, "pipeline skipped");
                if let Some(o) = &self.observer {
                    o.on_skipped(&ctx, &context);
                }
                PipelineOutcome::Skipped { reason: context }
            }
            Err(err) => {
                let severity = PipelineSeverity::of(&err);
                debug!(?severity, error = %err, "pipeline failed");
                if let Some(o) = &self.observer {
                    if severity >= self.settings.alert_at_or_above {
                        o.on_alert(&ctx, severity, &err);
                    } else {
                        o.on_failure(&ctx, severity, &err);
                    }
                }
                PipelineOutcome::Failed {
                    error: err.to_string(),
                }
            }
        }
    }

    fn try_run(&self, kind: PipelineKind) -> ReportResult<RunStats> {
        match kind {
            PipelineKind::Contratos => self.run_template_report(&CONTRACTS_REPORT),
            PipelineKind::AuxVentas => self.run_template_report(&SALES_REPORT),
            PipelineKind::ZipContratos => self.run_archive_report(),
        }
    }

    fn run_template_report(&self, report: &TemplateReport) -> ReportResult<RunStats> {
        let template = self.settings.templates_dir.join(report.template_file);
        if !template.is_file() {
            return Err(ReportError::Io(io::Error::new(
                io::ErrorKind::NotFound,
                format!("template {} not found", template.display()),
            )));
        }

        let connector = self.connector.as_ref().ok_or_else(|| {
            ReportError::config(format!(
                "{} needs the [mysql] configuration, but no database is configured",
                report.mapper.name()
            ))
        })?;

        // The session is released inside `fetch_once`, before any file work starts.
        let records = fetch_once(connector, report.query, &self.settings.period.params())?;
        if records.is_empty() {
            return Err(ReportError::EmptyResult {
                context: format!(
                    "{} query returned no rows for {} to {}",
                    report.mapper.name(),
                    self.settings.period.from,
                    self.settings.period.to
                ),
            });
        }

        let rows = map_records(report.mapper, &records)?;
        let name = template_output_name(&template, Local::now().naive_local());
        let destination = unique_path(&self.settings.output_dir, &name);
        let summary = populate_template(
            &rows,
            &template,
            &destination,
            &report.mapper.column_order(),
            self.settings.template_sheet.as_deref(),
        )?;

        Ok(RunStats {
            output: summary.destination,
            rows: summary.appended_rows,
        })
    }

    fn run_archive_report(&self) -> ReportResult<RunStats> {
        let records = extract_pending_contracts(&self.settings.archive, &self.settings.archive_request)?;
        if records.is_empty() {
            return Err(ReportError::EmptyResult {
                context: format!("no pending contracts in {}", self.settings.archive.display()),
            });
        }

        let name = report_output_name(ARCHIVE_REPORT_NAME, Local::now().naive_local());
        let destination = unique_path(&self.settings.output_dir, &name);
        let summary = write_records(&records, &destination, ARCHIVE_REPORT_SHEET)?;

        Ok(RunStats {
            output: summary.destination,
            rows: summary.rows,
        })
    }
}
