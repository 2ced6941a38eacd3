//! Purpose: Discover and instantiate managers, including the configured default.
//! Exports: `ManagerFactory`, `ManagerImplementationFactoryInterface`, `ManagerRegistry`,
//!          `ManagerDetail`, `ManagerConstructor`.
//! Role: Hosts obtain `Manager` façades here rather than wiring interfaces by hand.
//! Invariants: A missing default-config env var yields `Ok(None)`, not an error.
//! Invariants: Default managers are initialized with the configured settings before return.
use crate::config::{DEFAULT_CONFIG_ENV_VAR, load_default_manager_config};
use crate::core::error::{Error, Result};
use crate::core::session::{HostInterface, HostSession};
use crate::core::value::InfoDictionary;
use crate::host_api::Manager;
use crate::log::{LoggerInterfacePtr, Severity};
use crate::manager_api::ManagerInterface;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub trait ManagerImplementationFactoryInterface: Send + Sync {
    fn identifiers(&self) -> Result<Vec<String>>;

    fn instantiate(&self, identifier: &str) -> Result<Arc<dyn ManagerInterface>>;
}

pub type ManagerImplementationFactoryInterfacePtr = Arc<dyn ManagerImplementationFactoryInterface>;

#[derive(Clone, Debug, PartialEq)]
pub struct ManagerDetail {
    pub identifier: String,
    pub display_name: String,
    pub info: InfoDictionary,
}

pub type ManagerConstructor = Arc<dyn Fn() -> Arc<dyn ManagerInterface> + Send + Sync>;

/// In-process implementation factory keyed by manager identifier.
#[derive(Clone, Default)]
pub struct ManagerRegistry {
    constructors: BTreeMap<String, ManagerConstructor>,
}

impl ManagerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the managers shipped in this crate.
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register(
            crate::simple_manager::IDENTIFIER,
            Arc::new(|| {
                Arc::new(crate::simple_manager::SimpleManager::new()) as Arc<dyn ManagerInterface>
            }),
        );
        registry
    }

    pub fn register(&mut self, identifier: impl Into<String>, constructor: ManagerConstructor) {
        self.constructors.insert(identifier.into(), constructor);
    }
}

impl ManagerImplementationFactoryInterface for ManagerRegistry {
    fn identifiers(&self) -> Result<Vec<String>> {
        Ok(self.constructors.keys().cloned().collect())
    }

    fn instantiate(&self, identifier: &str) -> Result<Arc<dyn ManagerInterface>> {
        let constructor = self.constructors.get(identifier).ok_or_else(|| {
            Error::input_validation(format!(
                "No manager implementation registered for identifier '{identifier}'."
            ))
        })?;
        Ok(constructor())
    }
}

pub struct ManagerFactory {
    host_interface: Arc<dyn HostInterface>,
    implementation_factory: ManagerImplementationFactoryInterfacePtr,
    logger: LoggerInterfacePtr,
}

impl ManagerFactory {
    pub fn new(
        host_interface: Arc<dyn HostInterface>,
        implementation_factory: ManagerImplementationFactoryInterfacePtr,
        logger: LoggerInterfacePtr,
    ) -> Self {
        Self {
            host_interface,
            implementation_factory,
            logger,
        }
    }

    pub fn identifiers(&self) -> Result<Vec<String>> {
        self.implementation_factory.identifiers()
    }

    /// Instantiates each manager once to query its identity.
    pub fn available_managers(&self) -> Result<BTreeMap<String, ManagerDetail>> {
        let mut details = BTreeMap::new();
        for identifier in self.identifiers()? {
            let manager = self.implementation_factory.instantiate(&identifier)?;
            let detail = ManagerDetail {
                identifier: manager.identifier()?,
                display_name: manager.display_name()?,
                info: manager.info()?,
            };
            details.insert(identifier, detail);
        }
        Ok(details)
    }

    pub fn create_manager(&self, identifier: &str) -> Result<Manager> {
        Self::create_manager_for_interface(
            identifier,
            &self.host_interface,
            &self.implementation_factory,
            &self.logger,
        )
    }

    pub fn create_manager_for_interface(
        identifier: &str,
        host_interface: &Arc<dyn HostInterface>,
        implementation_factory: &ManagerImplementationFactoryInterfacePtr,
        logger: &LoggerInterfacePtr,
    ) -> Result<Manager> {
        let manager_interface = implementation_factory.instantiate(identifier)?;
        let host_session = HostSession::make(Arc::clone(host_interface), Arc::clone(logger));
        Ok(Manager::new(manager_interface, host_session))
    }

    /// Build the manager named by `ASSETIO_DEFAULT_CONFIG`, or `None` when it is unset.
    pub fn default_manager_for_interface(
        host_interface: &Arc<dyn HostInterface>,
        implementation_factory: &ManagerImplementationFactoryInterfacePtr,
        logger: &LoggerInterfacePtr,
    ) -> Result<Option<Manager>> {
        let Some(config_path) = std::env::var_os(DEFAULT_CONFIG_ENV_VAR) else {
            logger.log(
                Severity::Debug,
                &format!("{DEFAULT_CONFIG_ENV_VAR} not set, unable to instantiate default manager."),
            );
            return Ok(None);
        };
        logger.log(
            Severity::Debug,
            &format!("Retrieved default manager config file path from '{DEFAULT_CONFIG_ENV_VAR}'"),
        );
        Self::default_manager_for_interface_from_path(
            Path::new(&config_path),
            host_interface,
            implementation_factory,
            logger,
        )
        .map(Some)
    }

    pub fn default_manager_for_interface_from_path(
        config_path: &Path,
        host_interface: &Arc<dyn HostInterface>,
        implementation_factory: &ManagerImplementationFactoryInterfacePtr,
        logger: &LoggerInterfacePtr,
    ) -> Result<Manager> {
        logger.log(
            Severity::Debug,
            &format!("Loading default manager config at '{}'", config_path.display()),
        );
        let config = load_default_manager_config(config_path)?;
        let manager = Self::create_manager_for_interface(
            &config.identifier,
            host_interface,
            implementation_factory,
            logger,
        )?;
        manager.initialize(config.settings)?;
        Ok(manager)
    }
}
