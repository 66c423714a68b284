use anyhow::Result;
use tracing::info;
use vonsim_deploy::cli::{build_command, initialize_logging, CliArgs};
use vonsim_deploy::utils::env::load_dotenv;
use vonsim_deploy::{package, PackageReport, ScormConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_command(
        "scorm",
        "Deploy the web app and package it as a SCORM module",
        "path where the scorm app is deployed to",
    )
    .get_matches();

    let args = CliArgs::from_matches(&matches)?;
    initialize_logging(&args.log_level)?;
    load_dotenv();

    let config = ScormConfig::from_env();
    info!("Configuration: {:#?}", config);

    let report = package(&args.output, &config).await?;
    print_package_report(&report);

    Ok(())
}

fn print_package_report(report: &PackageReport) {
    info!("=== SCORM PACKAGE REPORT ===");
    info!(
        "Deploy command: {} (success: {}, code: {:?})",
        report.deploy.command, report.deploy.success, report.deploy.code
    );
    info!("Resources listed: {}", report.resources.len());
    info!("Manifest written to: {}", report.manifest_path.display());
    info!("Placeholders replaced: {}", report.replacements);
}
