pub mod deploy;
pub mod process;
pub mod scorm;

pub use deploy::{deploy, DeployConfig, DeployReport};
pub use process::{run_program, run_shell_command, ProcessOutcome};
pub use scorm::{package, PackageReport, ScormConfig};
