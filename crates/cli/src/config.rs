// crates/cli/src/config.rs
//! Layering of scan settings: built-in defaults, then the config file, then
//! command-line flags.
use crate::args::Args;
use crate::error::{AppError, Result};
use crate::options::ConfigFormat;
use project_scan_engine::{ScanConfig, ScanConfigBuilder, ScanError};
use std::path::Path;

/// Resolves the effective [`ScanConfig`] for one invocation.
///
/// # Errors
/// Fails if the config file cannot be read or parsed, or if the merged
/// configuration does not validate.
pub fn resolve_config(args: &Args) -> Result<ScanConfig> {
    let base = match &args.config {
        Some(path) => load_config_file(path)?,
        None => ScanConfig::default(),
    };

    let config = merge_args(base, args)?;
    config.validate()?;
    Ok(config)
}

/// Reads a JSON or YAML config file. A relative `root` inside the file is
/// taken relative to the file's directory.
///
/// # Errors
/// See [`resolve_config`].
pub fn load_config_file(path: &Path) -> Result<ScanConfig> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| AppError::ConfigFile {
        path: path.to_path_buf(),
        reason: "expected a .json, .yaml or .yml file".to_string(),
    })?;

    let text = std::fs::read_to_string(path)?;
    let mut config: ScanConfig = match format {
        ConfigFormat::Json => serde_json::from_str(&text)?,
        ConfigFormat::Yaml => serde_yaml::from_str(&text)?,
    };

    if config.root.is_relative()
        && let Some(dir) = path.parent()
    {
        config.root = dir.join(&config.root);
    }

    log::debug!("loaded config file {}", path.display());
    Ok(config)
}

fn merge_args(base: ScanConfig, args: &Args) -> Result<ScanConfig> {
    let scan = &args.scan;

    let root = args.root.clone().unwrap_or(base.root);
    let root = std::fs::canonicalize(&root).unwrap_or(root);

    let mut excluded = if scan.no_default_excludes {
        Vec::new()
    } else {
        base.excluded_folders
    };
    excluded.extend(scan.exclude.iter().cloned());

    let targets = pick(&scan.ext, base.target_extensions);
    let scenes = pick(&scan.scene_ext, base.scene_extensions);

    ScanConfigBuilder::default()
        .root(root)
        .excluded_folders(excluded)
        .target_extensions(targets)
        .scene_extensions(scenes)
        .ignored_file_suffixes(base.ignored_file_suffixes)
        .ignored_file_names(base.ignored_file_names)
        .comment_prefixes(base.comment_prefixes)
        .follow_links(scan.follow || base.follow_links)
        .max_depth(scan.max_depth.or(base.max_depth))
        .build()
        .map_err(|e| ScanError::from(e).into())
}

fn pick(flag: &[String], fallback: Vec<String>) -> Vec<String> {
    if flag.is_empty() {
        fallback
    } else {
        flag.to_vec()
    }
}
