// crates/engine/src/lib.rs
use log::{debug, info};
use std::time::Instant;

pub mod config;
pub mod error;
pub mod filesystem;
pub mod language;
pub mod processor;
pub mod stats;

pub use crate::config::{ScanConfig, ScanConfigBuilder, ScanRules};
pub use crate::error::{Result, ScanError};
pub use crate::stats::{FileSize, ScanReport, ScanResult, SceneStats, ScriptCounts, TreeCounts};

use crate::filesystem::WalkEvent;
use crate::stats::{IssueLog, ScanAccumulator};

/// Scan the tree below `config.root`.
///
/// Never fails: unreadable files and directories are logged, collected in
/// [`ScanReport::issues`] and left out of the counts. If the root itself
/// cannot be opened the result is all zeros and [`ScanReport::root_error`]
/// is set.
pub fn scan(config: &ScanConfig) -> ScanReport {
    let started = Instant::now();
    let root = &config.root;
    info!("scanning {}", root.display());

    if let Err(source) = std::fs::read_dir(root) {
        let err = ScanError::RootUnreadable {
            path: root.clone(),
            source,
        };
        log::error!("{err}");
        return ScanReport {
            result: ScanResult::default(),
            issues: Vec::new(),
            root_error: Some(err),
            elapsed: started.elapsed(),
        };
    }

    let rules = ScanRules::from_config(config);
    let mut acc = ScanAccumulator::new();
    let mut issues = IssueLog::default();

    filesystem::walk(root, &rules, |event| match event {
        WalkEvent::Folder(path) => {
            debug!("folder {}", path.display());
            acc.record_folder();
        }
        WalkEvent::File(file) => processor::process_file(file, &rules, &mut acc, &mut issues),
        WalkEvent::Failed(err) => issues.record(err),
    });

    let result = acc.finish();
    let elapsed = started.elapsed();
    info!(
        "scanned {}: {} folders, {} files, {} script lines, {} issues in {:?}",
        root.display(),
        result.tree.folders,
        result.tree.files,
        result.scripts.lines,
        issues.len(),
        elapsed
    );

    ScanReport {
        result,
        issues: issues.into_inner(),
        root_error: None,
        elapsed,
    }
}
