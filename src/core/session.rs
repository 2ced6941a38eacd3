//! Purpose: Host identity and the session bundle passed to managers.
//! Exports: `HostInterface`, `Host`, `HostSession`, `HostSessionPtr`.
//! Role: One session is shared by every operation issued through a façade.
//! Invariants: Sessions are immutable; the logger is always present.
use crate::core::value::InfoDictionary;
use crate::log::{LoggerInterfacePtr, Severity};
use std::sync::Arc;

pub trait HostInterface: Send + Sync {
    fn identifier(&self) -> String;
    fn display_name(&self) -> String;

    fn info(&self) -> InfoDictionary {
        InfoDictionary::new()
    }
}

/// Manager-facing view of the host; hides the host's full interface.
#[derive(Clone)]
pub struct Host {
    host_interface: Arc<dyn HostInterface>,
}

impl Host {
    pub fn new(host_interface: Arc<dyn HostInterface>) -> Self {
        Self { host_interface }
    }

    pub fn identifier(&self) -> String {
        self.host_interface.identifier()
    }

    pub fn display_name(&self) -> String {
        self.host_interface.display_name()
    }

    pub fn info(&self) -> InfoDictionary {
        self.host_interface.info()
    }
}

#[derive(Clone)]
pub struct HostSession {
    host: Arc<Host>,
    logger: LoggerInterfacePtr,
}

pub type HostSessionPtr = Arc<HostSession>;

impl HostSession {
    pub fn new(host: Arc<Host>, logger: LoggerInterfacePtr) -> Self {
        Self { host, logger }
    }

    pub fn make(
        host_interface: Arc<dyn HostInterface>,
        logger: LoggerInterfacePtr,
    ) -> HostSessionPtr {
        Arc::new(Self::new(Arc::new(Host::new(host_interface)), logger))
    }

    pub fn host(&self) -> &Arc<Host> {
        &self.host
    }

    pub fn logger(&self) -> &LoggerInterfacePtr {
        &self.logger
    }

    pub fn log(&self, severity: Severity, message: &str) {
        if self.logger.is_severity_logged(severity) {
            self.logger.log(severity, message);
        }
    }
}
