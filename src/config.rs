//! INI configuration.
//!
//! ```ini
//! [mysql]
//! host = 127.0.0.1
//! user = reportes
//! password = secreto
//! database = contabilidad
//! port = 3306
//!
//! [paths]            ; optional
//! templates = plantillas
//! output = salida
//! archive = entrada/Contratos.zip
//! ```
//!
//! The `[mysql]` section and all five of its keys are required by [`AppConfig::load`]; anything
//! missing is a [`ReportError::Config`]. Runs that never query the database read only `[paths]`
//! through [`PathsConfig::load`].

use std::fmt;
use std::path::{Path, PathBuf};

use ini::{Ini, Properties};
use tracing::debug;

use crate::error::{ReportError, ReportResult};

pub const DEFAULT_CONFIG_FILE: &str = "db_config.ini";
pub const DEFAULT_TEMPLATES_DIR: &str = "plantillas";
pub const DEFAULT_OUTPUT_DIR: &str = "salida";
pub const DEFAULT_ARCHIVE: &str = "entrada/Contratos.zip";

const MYSQL_SECTION: &str = "mysql";
const PATHS_SECTION: &str = "paths";

/// Connection parameters from the `[mysql]` section.
#[derive(Clone, PartialEq, Eq)]
pub struct DbConfig {
    pub host: String,
    pub user: String,
    pub password: String,
    pub database: String,
    pub port: u16,
}

impl fmt::Debug for DbConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConfig")
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("port", &self.port)
            .finish()
    }
}

/// Optional path overrides from the `[paths]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathsConfig {
    pub templates: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub archive: Option<PathBuf>,
}

/// Everything read from the configuration file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// The file the configuration was actually read from.
    pub source: PathBuf,
    pub db: DbConfig,
    pub paths: PathsConfig,
}

impl AppConfig {
    /// Load configuration from `path`.
    ///
    /// A relative `path` that does not exist in the working directory is also looked up next to
    /// the running executable.
    pub fn load(path: impl AsRef<Path>) -> ReportResult<Self> {
        let source = resolve_config_path(path.as_ref())?;
        let ini = Ini::load_from_file(&source).map_err(|e| {
            ReportError::config(format!("cannot read '{}': {e}", source.display()))
        })?;
        let cfg = Self::from_ini(&ini, source)?;
        debug!(config = ?cfg, "configuration loaded");
        Ok(cfg)
    }

    /// Parse configuration from INI text.
    pub fn parse(text: &str) -> ReportResult<Self> {
        let ini = Ini::load_from_str(text)
            .map_err(|e| ReportError::config(format!("invalid configuration: {e}")))?;
        Self::from_ini(&ini, PathBuf::new())
    }

    fn from_ini(ini: &Ini, source: PathBuf) -> ReportResult<Self> {
        let section = ini.section(Some(MYSQL_SECTION)).ok_or_else(|| {
            ReportError::config(format!(
                "[{MYSQL_SECTION}] section not found in '{}'",
                source.display()
            ))
        })?;

        let port_raw = required(section, "port")?;
        let port = port_raw.trim().parse::<u16>().map_err(|e| {
            ReportError::config(format!("[{MYSQL_SECTION}] port '{port_raw}' is not a valid port: {e}"))
        })?;

        let db = DbConfig {
            host: required(section, "host")?.to_string(),
            user: required(section, "user")?.to_string(),
            password: required(section, "password")?.to_string(),
            database: required(section, "database")?.to_string(),
            port,
        };

        let paths = PathsConfig::from_ini(ini);
        Ok(Self { source, db, paths })
    }
}

impl PathsConfig {
    /// Read only the `[paths]` section of `path`, for runs that never touch the database.
    ///
    /// `[mysql]` is not required here, and a configuration file that cannot be found yields the
    /// defaults. A file that exists but does not parse is still an error.
    pub fn load(path: impl AsRef<Path>) -> ReportResult<Self> {
        let Ok(source) = resolve_config_path(path.as_ref()) else {
            debug!(config = %path.as_ref().display(), "no configuration file; default paths");
            return Ok(Self::default());
        };
        let ini = Ini::load_from_file(&source).map_err(|e| {
            ReportError::config(format!("cannot read '{}': {e}", source.display()))
        })?;
        Ok(Self::from_ini(&ini))
    }

    fn from_ini(ini: &Ini) -> Self {
        match ini.section(Some(PATHS_SECTION)) {
            Some(p) => Self {
                templates: optional_path(p, "templates"),
                output: optional_path(p, "output"),
                archive: optional_path(p, "archive"),
            },
            None => Self::default(),
        }
    }
}

fn required<'a>(section: &'a Properties, key: &str) -> ReportResult<&'a str> {
    section
        .get(key)
        .ok_or_else(|| ReportError::config(format!("missing option '{key}' in [{MYSQL_SECTION}] section")))
}

fn optional_path(section: &Properties, key: &str) -> Option<PathBuf> {
    section
        .get(key)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn resolve_config_path(path: &Path) -> ReportResult<PathBuf> {
    if path.exists() {
        return Ok(path.to_path_buf());
    }
    if path.is_relative() {
        let beside_exe = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(path)));
        if let Some(candidate) = beside_exe.filter(|p| p.exists()) {
            return Ok(candidate);
        }
    }
    Err(ReportError::config(format!(
        "configuration file '{}' not found",
        path.display()
    )))
}
