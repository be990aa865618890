use crate::error::{Result, ScanError};
use crate::language::{LineClassifier, builtin_comment_prefixes};
use derive_builder::Builder;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Folder names skipped together with their whole subtree (case-insensitive).
pub const DEFAULT_EXCLUDED_FOLDERS: &[&str] = &[
    ".git",
    ".godot",
    ".mono",
    "bin",
    "obj",
    "shader_cache",
    "temp",
    "metadata",
    "Debug",
    "ref",
    "refint",
    "builds",
];

/// Extensions whose files are line-counted.
pub const DEFAULT_TARGET_EXTENSIONS: &[&str] = &[".gd", ".cs", ".gdshader"];

pub const DEFAULT_SCENE_EXTENSIONS: &[&str] = &[".tscn"];

/// Noise files: never counted, not even toward the file total.
pub const DEFAULT_IGNORED_FILE_SUFFIXES: &[&str] = &[".import", ".tmp"];
pub const DEFAULT_IGNORED_FILE_NAMES: &[&str] = &[".DS_Store"];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| (*v).to_string()).collect()
}

/// Input of a single scan.
///
/// Every field has a default, so a config file or builder only needs to name
/// the fields it overrides.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
#[builder(setter(into))]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    #[builder(default = "PathBuf::from(\".\")")]
    pub root: PathBuf,
    #[builder(default = "owned(DEFAULT_EXCLUDED_FOLDERS)")]
    pub excluded_folders: Vec<String>,
    #[builder(default = "owned(DEFAULT_TARGET_EXTENSIONS)")]
    pub target_extensions: Vec<String>,
    #[builder(default = "owned(DEFAULT_SCENE_EXTENSIONS)")]
    pub scene_extensions: Vec<String>,
    #[builder(default = "owned(DEFAULT_IGNORED_FILE_SUFFIXES)")]
    pub ignored_file_suffixes: Vec<String>,
    #[builder(default = "owned(DEFAULT_IGNORED_FILE_NAMES)")]
    pub ignored_file_names: Vec<String>,
    /// Per-extension comment prefixes. An entry replaces the built-in markers
    /// for that extension.
    #[builder(default)]
    pub comment_prefixes: BTreeMap<String, Vec<String>>,
    #[builder(default)]
    pub follow_links: bool,
    #[builder(default)]
    pub max_depth: Option<usize>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            excluded_folders: owned(DEFAULT_EXCLUDED_FOLDERS),
            target_extensions: owned(DEFAULT_TARGET_EXTENSIONS),
            scene_extensions: owned(DEFAULT_SCENE_EXTENSIONS),
            ignored_file_suffixes: owned(DEFAULT_IGNORED_FILE_SUFFIXES),
            ignored_file_names: owned(DEFAULT_IGNORED_FILE_NAMES),
            comment_prefixes: BTreeMap::new(),
            follow_links: false,
            max_depth: None,
        }
    }
}

impl ScanConfig {
    /// Default configuration rooted at `root`.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Rejects entries that could never match anything.
    ///
    /// # Errors
    /// Returns [`ScanError::Config`] naming the first offending entry.
    pub fn validate(&self) -> Result<()> {
        if let Some(name) = self.excluded_folders.iter().find(|n| n.trim().is_empty()) {
            return Err(ScanError::Config(format!(
                "excluded folder name must not be blank: {name:?}"
            )));
        }

        let extensions = self
            .target_extensions
            .iter()
            .chain(&self.scene_extensions)
            .chain(self.comment_prefixes.keys());
        for ext in extensions {
            if normalize_extension(ext) == "." {
                return Err(ScanError::Config(format!(
                    "extension must not be blank: {ext:?}"
                )));
            }
        }

        if let Some(suffix) = self.ignored_file_suffixes.iter().find(|s| s.is_empty()) {
            return Err(ScanError::Config(format!(
                "ignored file suffix must not be empty: {suffix:?}"
            )));
        }

        for (ext, prefixes) in &self.comment_prefixes {
            if prefixes.iter().any(|p| p.trim().is_empty()) {
                return Err(ScanError::Config(format!(
                    "comment prefix for {ext} must not be blank"
                )));
            }
        }

        Ok(())
    }
}

impl From<ScanConfigBuilderError> for ScanError {
    fn from(err: ScanConfigBuilderError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Lower-cases an extension and makes sure it carries a leading dot.
pub fn normalize_extension(ext: &str) -> String {
    let ext = ext.trim().to_lowercase();
    if ext.starts_with('.') {
        ext
    } else {
        format!(".{ext}")
    }
}

/// Lookup tables derived from a [`ScanConfig`] once per scan.
#[derive(Debug, Clone)]
pub struct ScanRules {
    excluded_folders: HashSet<String>,
    scene_extensions: HashSet<String>,
    ignored_file_suffixes: Vec<String>,
    ignored_file_names: HashSet<String>,
    classifiers: HashMap<String, LineClassifier>,
    follow_links: bool,
    max_depth: Option<usize>,
}

impl ScanRules {
    pub fn from_config(config: &ScanConfig) -> Self {
        let overrides: HashMap<String, &Vec<String>> = config
            .comment_prefixes
            .iter()
            .map(|(ext, prefixes)| (normalize_extension(ext), prefixes))
            .collect();

        let classifiers = config
            .target_extensions
            .iter()
            .map(|ext| normalize_extension(ext))
            .map(|ext| {
                let classifier = match overrides.get(&ext) {
                    Some(prefixes) => LineClassifier::new(prefixes.iter()),
                    None => LineClassifier::new(builtin_comment_prefixes(&ext).iter()),
                };
                (ext, classifier)
            })
            .collect();

        Self {
            excluded_folders: config
                .excluded_folders
                .iter()
                .map(|name| name.to_lowercase())
                .collect(),
            scene_extensions: config
                .scene_extensions
                .iter()
                .map(|ext| normalize_extension(ext))
                .collect(),
            ignored_file_suffixes: config.ignored_file_suffixes.clone(),
            ignored_file_names: config.ignored_file_names.iter().cloned().collect(),
            classifiers,
            follow_links: config.follow_links,
            max_depth: config.max_depth,
        }
    }

    pub fn is_excluded_folder(&self, name: &str) -> bool {
        self.excluded_folders.contains(&name.to_lowercase())
    }

    pub fn excluded_folders(&self) -> &HashSet<String> {
        &self.excluded_folders
    }

    pub fn is_noise_file(&self, name: &str) -> bool {
        self.ignored_file_names.contains(name)
            || self
                .ignored_file_suffixes
                .iter()
                .any(|suffix| name.ends_with(suffix.as_str()))
    }

    /// `ext` must already be lower-cased.
    pub fn is_scene_extension(&self, ext: &str) -> bool {
        self.scene_extensions.contains(ext)
    }

    /// Classifier for a lower-cased target extension, `None` for anything else.
    pub fn classifier_for(&self, ext: &str) -> Option<&LineClassifier> {
        self.classifiers.get(ext)
    }

    pub const fn follow_links(&self) -> bool {
        self.follow_links
    }

    pub const fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}
