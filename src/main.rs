use anyhow::Result;
use tracing::info;
use vonsim_deploy::cli::{build_command, initialize_logging, CliArgs};
use vonsim_deploy::utils::env::load_dotenv;
use vonsim_deploy::{deploy, DeployConfig, DeployReport};

#[tokio::main]
async fn main() -> Result<()> {
    let matches = build_command(
        "deploy",
        "Compile the web app and copy its deployable files to an output folder",
        "path where the app is deployed to",
    )
    .get_matches();

    let args = CliArgs::from_matches(&matches)?;
    initialize_logging(&args.log_level)?;
    load_dotenv();

    let config = DeployConfig::from_env();
    info!("Configuration: {:#?}", config);

    let report = deploy(&args.output, &config).await?;
    print_deploy_report(&report);

    Ok(())
}

fn print_deploy_report(report: &DeployReport) {
    info!("=== DEPLOY REPORT ===");
    info!(
        "Build command: {} (success: {}, code: {:?})",
        report.build.command, report.build.success, report.build.code
    );
    info!("Asset files copied: {}", report.assets_copied);
    info!("Compiled artifacts copied: {}", report.artifacts_copied);
    info!("Script references replaced: {}", report.replacements);
    info!("Elapsed: {:.2}s", report.elapsed.num_milliseconds() as f64 / 1000.0);
}
