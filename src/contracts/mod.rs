// Contract integration module for the ModredIP registry
pub mod config;
pub mod service;

pub use config::{ContractAddresses, ContractConfig};
pub use service::{ContractError, ContractService};
