// Host-facing API: the batch façade, its error policies, and manager discovery.
pub mod factory;
pub mod manager;
pub mod policy;

pub use factory::{
    ManagerDetail, ManagerFactory, ManagerImplementationFactoryInterface, ManagerRegistry,
};
pub use manager::Manager;
