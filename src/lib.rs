pub mod cli;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::DeployError;
pub use models::ResourceListing;
pub use services::{
    deploy, package, DeployConfig, DeployReport, PackageReport, ProcessOutcome, ScormConfig,
};
