// crates/cli/src/presentation.rs
use crate::error::Result;
use crate::options::OutputFormat;
use chrono::{DateTime, Local};
use project_scan_engine::{ScanReport, ScanResult, SceneStats, ScriptCounts, TreeCounts};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

/// Serialized form of a report for `--format json|yaml`.
#[derive(Debug, Serialize)]
pub struct ScanDocument<'a> {
    pub root: &'a Path,
    pub scanned_at: DateTime<Local>,
    pub elapsed_ms: u64,
    pub root_readable: bool,
    pub tree: TreeCounts,
    pub scripts: ScriptCounts,
    pub scenes: SceneStats,
    pub issues: Vec<IssueEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct IssueEntry<'a> {
    pub path: Option<&'a Path>,
    pub message: String,
}

impl<'a> ScanDocument<'a> {
    pub fn new(root: &'a Path, report: &'a ScanReport, scanned_at: DateTime<Local>) -> Self {
        let ScanResult {
            tree,
            scripts,
            scenes,
        } = report.result;

        let issues = report
            .root_error
            .iter()
            .chain(&report.issues)
            .map(|err| IssueEntry {
                path: err.path(),
                message: err.to_string(),
            })
            .collect();

        Self {
            root,
            scanned_at,
            elapsed_ms: u64::try_from(report.elapsed.as_millis()).unwrap_or(u64::MAX),
            root_readable: report.is_root_readable(),
            tree,
            scripts,
            scenes,
            issues,
        }
    }
}

/// Renders a report in the requested format.
///
/// # Errors
/// Returns an error if JSON or YAML serialization fails.
pub fn render(
    root: &Path,
    report: &ScanReport,
    format: OutputFormat,
    human: bool,
    scanned_at: DateTime<Local>,
) -> Result<String> {
    match format {
        OutputFormat::Table => Ok(render_table(root, report, human)),
        OutputFormat::Json => {
            let doc = ScanDocument::new(root, report, scanned_at);
            let mut out = serde_json::to_string_pretty(&doc)?;
            out.push('\n');
            Ok(out)
        }
        OutputFormat::Yaml => {
            let doc = ScanDocument::new(root, report, scanned_at);
            Ok(serde_yaml::to_string(&doc)?)
        }
    }
}

pub fn render_table(root: &Path, report: &ScanReport, human: bool) -> String {
    let ScanResult {
        tree,
        scripts,
        scenes,
    } = report.result;
    let size = if human {
        format!("{:#}", scenes.project_size)
    } else {
        scenes.project_size.to_string()
    };

    let mut out = String::new();
    let _ = writeln!(out, "project_scan v{} · {}", crate::VERSION, root.display());
    let _ = writeln!(out);
    let _ = writeln!(out, "{:>12}{:>16}", "FOLDERS", "FILES");
    let _ = writeln!(out, "{:>12}{:>16}", tree.folders, tree.files);
    let _ = writeln!(out, "----------------------------");
    let _ = writeln!(out, "{:>12}{:>16}", "SCRIPTS", "SCRIPT LINES");
    let _ = writeln!(out, "{:>12}{:>16}", scripts.files, scripts.lines);
    let _ = writeln!(out, "----------------------------");
    let _ = writeln!(out, "{:>12}{:>16}", "SCENES", "PROJECT SIZE");
    let _ = writeln!(out, "{:>12}{:>16}", scenes.scenes, size);
    let _ = writeln!(out);

    if report.is_root_readable() {
        let _ = writeln!(
            out,
            "[project_scan] Completed in {} ms ({} issues).",
            report.elapsed.as_millis(),
            report.issues.len()
        );
    } else {
        let _ = writeln!(out, "[project_scan] Root could not be read.");
    }
    out
}
