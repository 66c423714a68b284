use crate::models::ResourceListing;
use crate::services::process::{run_program, ProcessOutcome};
use crate::utils::env::{lookup_var, parse_flag};
use crate::utils::{copy_file_safe, ensure_output_dir, list_files_recursive, replace_in_file};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Configuration for the SCORM packaging tool
#[derive(Debug, Clone)]
pub struct ScormConfig {
    pub project_root: PathBuf,
    /// Program invoked with the output path as its only argument
    pub deploy_program: PathBuf,
    pub manifest_template: PathBuf,
    pub manifest_name: String,
    pub placeholder: String,
    /// Fail when the deploy program exits with a non-zero status
    pub strict: bool,
}

impl Default for ScormConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            deploy_program: default_deploy_program(),
            manifest_template: PathBuf::from("scorm/imsmanifest.xml"),
            manifest_name: "imsmanifest.xml".to_string(),
            placeholder: "XXRESOURCESXX".to_string(),
            strict: false,
        }
    }
}

impl ScormConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(lookup_var)
    }

    /// Build the configuration from a variable lookup, falling back to defaults
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            project_root: lookup("SCORM_PROJECT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.project_root),
            deploy_program: lookup("SCORM_DEPLOY_PROGRAM")
                .map(PathBuf::from)
                .unwrap_or(defaults.deploy_program),
            manifest_template: lookup("SCORM_MANIFEST_TEMPLATE")
                .map(PathBuf::from)
                .unwrap_or(defaults.manifest_template),
            manifest_name: lookup("SCORM_MANIFEST_NAME").unwrap_or(defaults.manifest_name),
            placeholder: lookup("SCORM_PLACEHOLDER").unwrap_or(defaults.placeholder),
            strict: lookup("SCORM_STRICT")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.strict),
        }
    }
}

/// The `deploy` binary installed next to the running executable
fn default_deploy_program() -> PathBuf {
    let name = format!("deploy{}", std::env::consts::EXE_SUFFIX);
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(&name)))
        .unwrap_or_else(|| PathBuf::from(name))
}

/// Deploy into `output` and package the result as a SCORM module
pub async fn package(output: &Path, config: &ScormConfig) -> Result<PackageReport> {
    ensure_output_dir(output)?;
    info!("Output path set to: '{}'", output.display());

    // the child runs from the project root, so hand it an absolute path
    let output_abs = output
        .canonicalize()
        .with_context(|| format!("Failed to resolve output path: {:?}", output))?;

    info!("#1# Calling deploy program");
    let deploy = run_program(&config.deploy_program, [&output_abs], &config.project_root)
        .await?
        .check(config.strict)?;

    let resources =
        ResourceListing::new(list_files_recursive(output)?).without(&config.manifest_name);
    let fragment = resources.to_xml_fragment();
    info!("Found {} resources", resources.len());
    debug!("Resource listing:\n{}", fragment);

    info!("#2# Generating SCORM files");
    let manifest_path = output.join(&config.manifest_name);
    copy_file_safe(config.project_root.join(&config.manifest_template), &manifest_path)?;

    let replacements = replace_in_file(&manifest_path, &config.placeholder, &fragment)?;
    if replacements == 0 {
        warn!(
            "Placeholder {} not found in {}",
            config.placeholder,
            manifest_path.display()
        );
    }

    Ok(PackageReport {
        deploy,
        manifest_path,
        resources,
        replacements,
    })
}

/// Report structure for a packaging run
#[derive(Debug, Clone)]
pub struct PackageReport {
    pub deploy: ProcessOutcome,
    pub manifest_path: PathBuf,
    pub resources: ResourceListing,
    pub replacements: usize,
}
