//! Purpose: Logger contract carried by every host session, plus stock implementations.
//! Exports: `LoggerInterface`, `Severity`, `TracingLogger`, `SeverityFilter`.
//! Role: Managers and the façade report through the session logger, never directly to stderr.
//! Invariants: Severity ordering is `DebugApi < Debug < Info < Progress < Warning < Error < Critical`.
//! Invariants: `SeverityFilter` never forwards a message its upstream would not log.
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

pub const LOGGING_SEVERITY_ENV_VAR: &str = "ASSETIO_LOGGING_SEVERITY";

#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
#[repr(u8)]
pub enum Severity {
    DebugApi = 0,
    Debug = 1,
    Info = 2,
    Progress = 3,
    Warning = 4,
    Error = 5,
    Critical = 6,
}

impl Severity {
    pub fn name(self) -> &'static str {
        match self {
            Severity::DebugApi => "debugApi",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Progress => "progress",
            Severity::Warning => "warning",
            Severity::Error => "error",
            Severity::Critical => "critical",
        }
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Severity::DebugApi),
            1 => Some(Severity::Debug),
            2 => Some(Severity::Info),
            3 => Some(Severity::Progress),
            4 => Some(Severity::Warning),
            5 => Some(Severity::Error),
            6 => Some(Severity::Critical),
            _ => None,
        }
    }
}

pub trait LoggerInterface: Send + Sync {
    fn log(&self, severity: Severity, message: &str);

    fn is_severity_logged(&self, _severity: Severity) -> bool {
        true
    }
}

pub type LoggerInterfacePtr = Arc<dyn LoggerInterface>;

/// Routes messages into the process-wide `tracing` subscriber.
#[derive(Clone, Debug, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl LoggerInterface for TracingLogger {
    fn log(&self, severity: Severity, message: &str) {
        match severity {
            Severity::DebugApi => tracing::trace!(severity = severity.name(), "{message}"),
            Severity::Debug => tracing::debug!("{message}"),
            Severity::Info | Severity::Progress => {
                tracing::info!(severity = severity.name(), "{message}")
            }
            Severity::Warning => tracing::warn!("{message}"),
            Severity::Error | Severity::Critical => {
                tracing::error!(severity = severity.name(), "{message}")
            }
        }
    }
}

pub struct SeverityFilter {
    upstream: LoggerInterfacePtr,
    min_severity: AtomicU8,
}

impl SeverityFilter {
    /// Wrap `upstream`, taking the initial threshold from `ASSETIO_LOGGING_SEVERITY` if valid.
    pub fn new(upstream: LoggerInterfacePtr) -> Self {
        let env_value = std::env::var(LOGGING_SEVERITY_ENV_VAR).ok();
        Self::with_env_value(upstream, env_value.as_deref())
    }

    pub fn with_env_value(upstream: LoggerInterfacePtr, env_value: Option<&str>) -> Self {
        let filter = Self {
            upstream,
            min_severity: AtomicU8::new(Severity::Warning as u8),
        };
        if let Some(raw) = env_value {
            match raw.parse::<u8>().ok().and_then(Severity::from_u8) {
                Some(severity) if severity_text_is_exact(raw) => filter.set_severity(severity),
                _ => filter.upstream.log(
                    Severity::Error,
                    &format!(
                        "SeverityFilter: Invalid {LOGGING_SEVERITY_ENV_VAR} value '{raw}' - ignoring."
                    ),
                ),
            }
        }
        filter
    }

    pub fn set_severity(&self, severity: Severity) {
        self.min_severity.store(severity as u8, Ordering::Relaxed);
    }

    pub fn severity(&self) -> Severity {
        Severity::from_u8(self.min_severity.load(Ordering::Relaxed)).unwrap_or(Severity::Warning)
    }

    pub fn upstream(&self) -> &LoggerInterfacePtr {
        &self.upstream
    }
}

fn severity_text_is_exact(raw: &str) -> bool {
    raw.parse::<u8>()
        .map(|value| value.to_string() == raw)
        .unwrap_or(false)
}

impl LoggerInterface for SeverityFilter {
    fn log(&self, severity: Severity, message: &str) {
        if !self.is_severity_logged(severity) {
            return;
        }
        self.upstream.log(severity, message);
    }

    fn is_severity_logged(&self, severity: Severity) -> bool {
        severity >= self.severity() && self.upstream.is_severity_logged(severity)
    }
}
