use crate::error::ScanError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[must_use]
#[repr(transparent)]
#[serde(transparent)]
pub struct FileSize(u64);

impl FileSize {
    #[inline]
    pub const fn new(bytes: u64) -> Self {
        Self(bytes)
    }

    #[inline]
    pub const fn bytes(self) -> u64 {
        self.0
    }

    /// Base-2 rendering for `--human`: bytes below 1 KiB, otherwise one
    /// decimal in the largest unit up to GiB.
    pub fn to_human(self) -> String {
        const UNITS: [&str; 3] = ["KiB", "MiB", "GiB"];
        if self.0 < 1024 {
            return format!("{} B", self.0);
        }

        let mut value = self.0 as f64 / 1024.0;
        let mut unit = 0;
        while value >= 1024.0 && unit + 1 < UNITS.len() {
            value /= 1024.0;
            unit += 1;
        }
        format!("{value:.1} {}", UNITS[unit])
    }
}

impl From<u64> for FileSize {
    fn from(bytes: u64) -> Self {
        Self::new(bytes)
    }
}

impl From<FileSize> for u64 {
    fn from(size: FileSize) -> Self {
        size.bytes()
    }
}

impl fmt::Display for FileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", self.to_human())
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Folder and file totals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TreeCounts {
    pub folders: usize,
    pub files: usize,
}

/// Target-extension files with at least one valid line, and the valid lines
/// summed over all target-extension files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScriptCounts {
    pub files: usize,
    pub lines: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SceneStats {
    pub scenes: usize,
    #[serde(rename = "project_size_bytes")]
    pub project_size: FileSize,
}

/// Aggregate of one scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScanResult {
    pub tree: TreeCounts,
    pub scripts: ScriptCounts,
    pub scenes: SceneStats,
}

impl ScanResult {
    /// The three groups as plain tuples:
    /// `(folders, files)`, `(script files, script lines)`, `(scenes, size in bytes)`.
    pub const fn as_tuples(&self) -> ((usize, usize), (usize, usize), (usize, u64)) {
        (
            (self.tree.folders, self.tree.files),
            (self.scripts.files, self.scripts.lines),
            (self.scenes.scenes, self.scenes.project_size.bytes()),
        )
    }
}

/// Mutable counters owned by a single scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanAccumulator {
    total_folders: usize,
    total_files: usize,
    script_file_count: usize,
    script_line_count: usize,
    scene_file_count: usize,
    total_project_size_bytes: u64,
}

impl ScanAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_folder(&mut self) {
        self.total_folders += 1;
    }

    pub fn record_file(&mut self) {
        self.total_files += 1;
    }

    pub fn add_size(&mut self, bytes: u64) {
        self.total_project_size_bytes = self.total_project_size_bytes.saturating_add(bytes);
    }

    pub fn record_scene(&mut self) {
        self.scene_file_count += 1;
    }

    /// Adds one target-extension file with `valid_lines` counted lines.
    pub fn record_script(&mut self, valid_lines: usize) {
        self.script_line_count += valid_lines;
        if valid_lines > 0 {
            self.script_file_count += 1;
        }
    }

    pub fn finish(self) -> ScanResult {
        ScanResult {
            tree: TreeCounts {
                folders: self.total_folders,
                files: self.total_files,
            },
            scripts: ScriptCounts {
                files: self.script_file_count,
                lines: self.script_line_count,
            },
            scenes: SceneStats {
                scenes: self.scene_file_count,
                project_size: FileSize::new(self.total_project_size_bytes),
            },
        }
    }
}

/// Collects non-fatal failures and writes each one to the log.
#[derive(Debug, Default)]
pub struct IssueLog {
    issues: Vec<ScanError>,
}

impl IssueLog {
    pub fn record(&mut self, err: ScanError) {
        warn!("{err}");
        self.issues.push(err);
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn into_inner(self) -> Vec<ScanError> {
        self.issues
    }
}

/// Outcome of [`crate::scan`]: the counts plus every item that had to be skipped.
#[derive(Debug)]
pub struct ScanReport {
    pub result: ScanResult,
    pub issues: Vec<ScanError>,
    /// Set when the root could not be opened; `result` is then all zeros.
    pub root_error: Option<ScanError>,
    pub elapsed: Duration,
}

impl ScanReport {
    pub const fn is_root_readable(&self) -> bool {
        self.root_error.is_none()
    }

    /// True when nothing was skipped because of an error.
    pub fn is_complete(&self) -> bool {
        self.root_error.is_none() && self.issues.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn human_boundaries() {
        assert_eq!(FileSize::from(1023).to_human(), "1023 B");
        assert_eq!(FileSize::from(1024).to_human(), "1.0 KiB");
        assert_eq!(FileSize::from(1536).to_human(), "1.5 KiB");
        assert_eq!(FileSize::from(1024 * 1024).to_human(), "1.0 MiB");
        assert_eq!(FileSize::from(5_u64 << 40).to_human(), "5120.0 GiB");
        assert_eq!(format!("{:#}", FileSize::new(2048)), "2.0 KiB");
        assert_eq!(format!("{}", FileSize::new(2048)), "2048");
    }

    #[test]
    fn script_without_valid_lines_is_not_a_script_file() {
        let mut acc = ScanAccumulator::new();
        acc.record_file();
        acc.record_script(0);
        acc.record_file();
        acc.record_script(4);

        let result = acc.finish();
        assert_eq!(result.tree.files, 2);
        assert_eq!(result.scripts, ScriptCounts { files: 1, lines: 4 });
    }

    #[test]
    fn finish_maps_every_counter() {
        let mut acc = ScanAccumulator::new();
        acc.record_folder();
        acc.record_folder();
        acc.record_file();
        acc.record_scene();
        acc.add_size(10);
        acc.add_size(32);

        assert_eq!(acc.finish().as_tuples(), ((2, 1), (0, 0), (1, 42)));
    }

    #[test]
    fn size_saturates_instead_of_overflowing() {
        let mut acc = ScanAccumulator::new();
        acc.add_size(u64::MAX);
        acc.add_size(1);
        assert_eq!(acc.finish().scenes.project_size.bytes(), u64::MAX);
    }

    #[test]
    fn report_completeness() {
        let report = ScanReport {
            result: ScanResult::default(),
            issues: vec![ScanError::Config("x".into())],
            root_error: None,
            elapsed: Duration::ZERO,
        };
        assert!(report.is_root_readable());
        assert!(!report.is_complete());
    }
}
