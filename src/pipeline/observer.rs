use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{Local, NaiveDateTime};
use serde::Serialize;
use tracing::{error, info, warn};

use crate::error::ReportError;

use super::PipelineKind;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PipelineSeverity {
    /// Informational event.
    Info,
    /// Non-fatal: e.g. nothing to report for the period.
    Warning,
    /// The pipeline failed on its data or on an external system.
    Error,
    /// Local infrastructure failure (configuration, filesystem).
    Critical,
}

impl PipelineSeverity {
    /// Severity of a pipeline that failed with `err`.
    pub fn of(err: &ReportError) -> Self {
        match err {
            ReportError::Io(_) | ReportError::Config { .. } | ReportError::Persist { .. } => {
                Self::Critical
            }
            ReportError::EmptyResult { .. } => Self::Warning,
            _ => Self::Error,
        }
    }
}

/// Context about a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineContext {
    pub kind: PipelineKind,
    pub started_at: NaiveDateTime,
}

impl PipelineContext {
    pub fn new(kind: PipelineKind) -> Self {
        Self {
            kind,
            started_at: Local::now().naive_local(),
        }
    }
}

/// Reported on success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineStats {
    /// Rows written below the header.
    pub rows: usize,
    pub output: PathBuf,
}

/// Observer interface for pipeline outcomes.
pub trait PipelineObserver: Send + Sync {
    /// Called when the pipeline wrote its report.
    fn on_success(&self, _ctx: &PipelineContext, _stats: &PipelineStats) {}

    /// Called when there was nothing to report.
    fn on_skipped(&self, _ctx: &PipelineContext, _reason: &str) {}

    /// Called when the pipeline failed.
    fn on_failure(&self, _ctx: &PipelineContext, _severity: PipelineSeverity, _error: &ReportError) {}

    /// Called when a failure meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_failure`].
    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &ReportError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Fans callbacks out to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: &PipelineStats) {
        for o in &self.observers {
            o.on_success(ctx, stats);
        }
    }

    fn on_skipped(&self, ctx: &PipelineContext, reason: &str) {
        for o in &self.observers {
            o.on_skipped(ctx, reason);
        }
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &ReportError) {
        for o in &self.observers {
            o.on_failure(ctx, severity, error);
        }
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &ReportError) {
        for o in &self.observers {
            o.on_alert(ctx, severity, error);
        }
    }
}

/// Emits one `tracing` event per outcome.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: &PipelineStats) {
        info!(
            pipeline = ctx.kind.token(),
            rows = stats.rows,
            output = %stats.output.display(),
            "report written"
        );
    }

    fn on_skipped(&self, ctx: &PipelineContext, reason: &str) {
        warn!(pipeline = ctx.kind.token(), reason, "nothing to report");
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &ReportError) {
        error!(pipeline = ctx.kind.token(), ?severity, %error, "pipeline failed");
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &ReportError) {
        error!(pipeline = ctx.kind.token(), ?severity, %error, alert = true, "pipeline failed");
    }
}

#[derive(Serialize)]
struct RunLogLine<'a> {
    ts: String,
    pipeline: PipelineKind,
    status: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    severity: Option<PipelineSeverity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    rows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl<'a> RunLogLine<'a> {
    fn new(ctx: &PipelineContext, status: &'a str) -> Self {
        Self {
            ts: ctx.started_at.format("%Y-%m-%dT%H:%M:%S").to_string(),
            pipeline: ctx.kind,
            status,
            severity: None,
            rows: None,
            output: None,
            message: None,
        }
    }
}

/// Appends one JSON object per outcome to a run log.
#[derive(Debug)]
pub struct JsonlObserver {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonlObserver {
    /// Create an observer that appends events to `path`.
    ///
    /// Writes are best-effort; failures to open/write the log file are ignored.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, line: &RunLogLine<'_>) {
        let Ok(json) = serde_json::to_string(line) else {
            return;
        };
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.path) {
            let _ = writeln!(f, "{json}");
        }
    }
}

impl PipelineObserver for JsonlObserver {
    fn on_success(&self, ctx: &PipelineContext, stats: &PipelineStats) {
        let mut line = RunLogLine::new(ctx, "ok");
        line.rows = Some(stats.rows);
        line.output = Some(stats.output.display().to_string());
        self.append(&line);
    }

    fn on_skipped(&self, ctx: &PipelineContext, reason: &str) {
        let mut line = RunLogLine::new(ctx, "skipped");
        line.message = Some(reason.to_string());
        self.append(&line);
    }

    fn on_failure(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &ReportError) {
        let mut line = RunLogLine::new(ctx, "failed");
        line.severity = Some(severity);
        line.message = Some(error.to_string());
        self.append(&line);
    }

    fn on_alert(&self, ctx: &PipelineContext, severity: PipelineSeverity, error: &ReportError) {
        let mut line = RunLogLine::new(ctx, "alert");
        line.severity = Some(severity);
        line.message = Some(error.to_string());
        self.append(&line);
    }
}
