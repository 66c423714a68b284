use crate::error::DeployError;
use crate::services::process::{run_shell_command, ProcessOutcome};
use crate::utils::env::{lookup_var, parse_flag};
use crate::utils::{copy_file_safe, copy_tree, ensure_output_dir, replace_in_file};
use anyhow::Result;
use chrono::{Duration, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration for the deploy tool
#[derive(Debug, Clone)]
pub struct DeployConfig {
    /// Root of the sbt project; every source path below is relative to it
    pub project_root: PathBuf,
    pub build_command: String,
    pub assets_dir: PathBuf,
    pub compiled_dir: PathBuf,
    pub compiled_script: String,
    /// HTML entry file, relative to the assets folder
    pub html_entry: String,
    pub debug_script: String,
    pub optimized_script: String,
    /// Fail when the build command exits with a non-zero status
    pub strict: bool,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            project_root: PathBuf::from("."),
            build_command: "sbt fullOptJS".to_string(),
            assets_dir: PathBuf::from("assets"),
            compiled_dir: PathBuf::from("target/scala-2.11"),
            compiled_script: "vonsim-opt.js".to_string(),
            html_entry: "index.html".to_string(),
            debug_script: "fastopt.js".to_string(),
            optimized_script: "opt.js".to_string(),
            strict: false,
        }
    }
}

impl DeployConfig {
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
            project_root: lookup("DEPLOY_PROJECT_ROOT")
                .map(PathBuf::from)
                .unwrap_or(defaults.project_root),
            build_command: lookup("DEPLOY_BUILD_COMMAND").unwrap_or(defaults.build_command),
            assets_dir: lookup("DEPLOY_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            compiled_dir: lookup("DEPLOY_COMPILED_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.compiled_dir),
            compiled_script: lookup("DEPLOY_COMPILED_SCRIPT").unwrap_or(defaults.compiled_script),
            html_entry: lookup("DEPLOY_HTML_ENTRY").unwrap_or(defaults.html_entry),
            debug_script: lookup("DEPLOY_DEBUG_SCRIPT").unwrap_or(defaults.debug_script),
            optimized_script: lookup("DEPLOY_OPTIMIZED_SCRIPT")
                .unwrap_or(defaults.optimized_script),
            strict: lookup("DEPLOY_STRICT")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.strict),
        }
    }

    /// Source folders are mirrored under the output, so they must be relative
    pub fn validate(&self) -> Result<()> {
        for (name, path) in [
            ("DEPLOY_ASSETS_DIR", &self.assets_dir),
            ("DEPLOY_COMPILED_DIR", &self.compiled_dir),
        ] {
            if path.is_absolute() {
                return Err(DeployError::AbsoluteSourcePath {
                    name,
                    path: path.clone(),
                }
                .into());
            }
        }
        Ok(())
    }

    fn compiled_script_path(&self) -> PathBuf {
        self.compiled_dir.join(&self.compiled_script)
    }

    fn source_map_path(&self) -> PathBuf {
        self.compiled_dir.join(format!("{}.map", self.compiled_script))
    }
}

/// Compile the project and copy the deployable files into `output`
pub async fn deploy(output: &Path, config: &DeployConfig) -> Result<DeployReport> {
    let started = Utc::now();

    ensure_output_dir(output)?;
    config.validate()?;
    info!("Note: this command must be executed from the root of the sbt project");
    info!("Deploying to '{}'", output.display());

    info!("Compiling with `{}`...", config.build_command);
    let build = run_shell_command(&config.build_command, &config.project_root)
        .await?
        .check(config.strict)?;

    info!("Moving files to {}...", output.display());
    let assets_copied = copy_assets(output, config)?;
    let artifacts_copied = copy_compiled_artifacts(output, config)?;
    let replacements = swap_debug_script(output, config)?;

    let report = DeployReport {
        build,
        assets_copied,
        artifacts_copied,
        replacements,
        elapsed: Utc::now() - started,
    };

    info!(
        "Deploy completed. Files copied: {}, Replacements: {}",
        report.total_copied(),
        report.replacements
    );

    Ok(report)
}

fn copy_assets(output: &Path, config: &DeployConfig) -> Result<usize> {
    let source = config.project_root.join(&config.assets_dir);
    let destination = output.join(&config.assets_dir);
    ensure_output_dir(&destination)?;

    info!(
        "Moving assets folder from '{}' to '{}'...",
        source.display(),
        destination.display()
    );
    Ok(copy_tree(&source, &destination)?.len())
}

fn copy_compiled_artifacts(output: &Path, config: &DeployConfig) -> Result<usize> {
    ensure_output_dir(output.join(&config.compiled_dir))?;

    let script = config.compiled_script_path();
    let source_map = config.source_map_path();
    info!(
        "Moving compiled js file to '{}' and source map to '{}'...",
        script.display(),
        source_map.display()
    );

    let artifacts = [script, source_map];
    for artifact in &artifacts {
        copy_file_safe(config.project_root.join(artifact), output.join(artifact))?;
    }

    Ok(artifacts.len())
}

fn swap_debug_script(output: &Path, config: &DeployConfig) -> Result<usize> {
    let index_path = output.join(&config.assets_dir).join(&config.html_entry);
    info!(
        "Replacing {} for {} in {}",
        config.debug_script,
        config.optimized_script,
        index_path.display()
    );

    let replaced = replace_in_file(&index_path, &config.debug_script, &config.optimized_script)?;
    if replaced == 0 {
        warn!(
            "No reference to {} found in {}",
            config.debug_script,
            index_path.display()
        );
    }

    Ok(replaced)
}

/// Report structure for a deploy run
#[derive(Debug, Clone)]
pub struct DeployReport {
    pub build: ProcessOutcome,
    pub assets_copied: usize,
    pub artifacts_copied: usize,
    pub replacements: usize,
    pub elapsed: Duration,
}

impl DeployReport {
    pub fn total_copied(&self) -> usize {
        self.assets_copied + self.artifacts_copied
    }
}
