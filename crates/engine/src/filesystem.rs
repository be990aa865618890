use crate::config::ScanRules;
use crate::error::ScanError;
use ignore::WalkBuilder;
use log::debug;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// A counted file found by the walk.
#[derive(Debug)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub metadata: Result<Metadata, ignore::Error>,
}

#[derive(Debug)]
pub enum WalkEvent {
    /// A directory below the root that is not excluded.
    Folder(PathBuf),
    /// A regular file that is not noise, or an unfollowed link to one.
    File(FileEntry),
    /// A directory could not be read; its subtree is abandoned.
    Failed(ScanError),
}

/// Sequential depth-first walk below `root`.
///
/// Excluded folders are pruned before they are opened, noise files never
/// reach `visit`, and the root itself is not reported. Read failures arrive
/// as [`WalkEvent::Failed`] and the walk carries on with the next entry.
pub fn walk<F>(root: &Path, rules: &ScanRules, mut visit: F)
where
    F: FnMut(WalkEvent),
{
    let mut builder = WalkBuilder::new(root);

    // No .gitignore/.ignore/hidden handling: only the configured rules apply.
    builder
        .standard_filters(false)
        .follow_links(rules.follow_links())
        .max_depth(rules.max_depth());

    let excluded = rules.excluded_folders().clone();
    builder.filter_entry(move |entry| {
        if entry.depth() == 0 || !entry.file_type().is_some_and(|ft| ft.is_dir()) {
            return true;
        }
        let name = entry.file_name().to_string_lossy().to_lowercase();
        !excluded.contains(&name)
    });

    for result in builder.build() {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                visit(WalkEvent::Failed(ScanError::Walk(err)));
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }

        let Some(file_type) = entry.file_type() else {
            continue;
        };

        if file_type.is_dir() {
            visit(WalkEvent::Folder(entry.into_path()));
        } else if file_type.is_file() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if rules.is_noise_file(&name) {
                continue;
            }
            let metadata = entry.metadata();
            visit(WalkEvent::File(FileEntry {
                path: entry.into_path(),
                name,
                metadata,
            }));
        } else if file_type.is_symlink() {
            let name = entry.file_name().to_string_lossy().into_owned();
            visit_unfollowed_link(entry.into_path(), name, rules, &mut visit);
        } else {
            debug!("skipping non-regular entry {}", entry.path().display());
        }
    }
}

/// Counts a link the walker did not follow as whatever it points to.
///
/// A link to a directory is a folder whose contents are not walked. A link
/// that cannot be resolved is still a file; its metadata error travels with
/// it.
fn visit_unfollowed_link<F>(path: PathBuf, name: String, rules: &ScanRules, visit: &mut F)
where
    F: FnMut(WalkEvent),
{
    match std::fs::metadata(&path) {
        Ok(target) if target.is_dir() => {
            if rules.is_excluded_folder(&name) {
                return;
            }
            debug!("not descending into linked folder {}", path.display());
            visit(WalkEvent::Folder(path));
        }
        Ok(target) if target.is_file() => {
            if rules.is_noise_file(&name) {
                return;
            }
            visit(WalkEvent::File(FileEntry {
                path,
                name,
                metadata: Ok(target),
            }));
        }
        Ok(_) => debug!("skipping link to non-regular entry {}", path.display()),
        Err(err) => {
            if rules.is_noise_file(&name) {
                return;
            }
            visit(WalkEvent::File(FileEntry {
                path,
                name,
                metadata: Err(ignore::Error::from(err)),
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanConfig;
    use std::fs;
    use tempfile::TempDir;

    fn collect(root: &Path, config: &ScanConfig) -> (Vec<PathBuf>, Vec<String>) {
        let rules = ScanRules::from_config(config);
        let mut folders = Vec::new();
        let mut files = Vec::new();
        walk(root, &rules, |event| match event {
            WalkEvent::Folder(path) => folders.push(path.strip_prefix(root).unwrap().to_path_buf()),
            WalkEvent::File(file) => files.push(file.name),
            WalkEvent::Failed(err) => panic!("unexpected walk failure: {err}"),
        });
        folders.sort();
        files.sort();
        (folders, files)
    }

    #[test]
    fn prunes_excluded_folders_and_noise_files() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("scripts/obj/deep")).unwrap();
        fs::create_dir_all(root.join(".GODOT/imported")).unwrap();
        fs::write(root.join("scripts/player.gd"), "extends Node\n").unwrap();
        fs::write(root.join("scripts/obj/deep/cache.gd"), "var x\n").unwrap();
        fs::write(root.join(".GODOT/imported/icon.ctex"), "x").unwrap();
        fs::write(root.join("icon.svg"), "<svg/>").unwrap();
        fs::write(root.join("icon.svg.import"), "[remap]").unwrap();
        fs::write(root.join(".DS_Store"), "").unwrap();

        let (folders, files) = collect(root, &ScanConfig::for_root(root));

        assert_eq!(folders, vec![PathBuf::from("scripts")]);
        assert_eq!(files, vec!["icon.svg", "player.gd"]);
    }

    #[test]
    fn hidden_files_and_gitignored_files_are_walked() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join(".gitignore"), "*.cs\n").unwrap();
        fs::write(root.join("Main.cs"), "class Main {}\n").unwrap();
        fs::create_dir(root.join(".hidden")).unwrap();

        let (folders, files) = collect(root, &ScanConfig::for_root(root));

        assert_eq!(folders, vec![PathBuf::from(".hidden")]);
        assert_eq!(files, vec![".gitignore", "Main.cs"]);
    }

    #[test]
    fn file_named_like_excluded_folder_is_kept() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::write(root.join("bin"), "not a folder").unwrap();

        let (folders, files) = collect(root, &ScanConfig::for_root(root));

        assert!(folders.is_empty());
        assert_eq!(files, vec!["bin"]);
    }

    #[test]
    fn max_depth_limits_descent() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::write(root.join("a/b/deep.gd"), "pass\n").unwrap();
        fs::write(root.join("a/shallow.gd"), "pass\n").unwrap();

        let config = ScanConfig {
            max_depth: Some(2),
            ..ScanConfig::for_root(root)
        };
        let (folders, files) = collect(root, &config);

        assert_eq!(folders, vec![PathBuf::from("a"), PathBuf::from("a/b")]);
        assert_eq!(files, vec!["shallow.gd"]);
    }

    #[cfg(unix)]
    #[test]
    fn unfollowed_links_count_as_their_target_kind() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("real")).unwrap();
        fs::write(root.join("real/a.gd"), "pass\n").unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("linked")).unwrap();
        std::os::unix::fs::symlink(root.join("real/a.gd"), root.join("alias.gd")).unwrap();
        std::os::unix::fs::symlink(root.join("real"), root.join("OBJ")).unwrap();

        let (folders, files) = collect(root, &ScanConfig::for_root(root));

        assert_eq!(folders, vec![PathBuf::from("linked"), PathBuf::from("real")]);
        assert_eq!(files, vec!["a.gd", "alias.gd"]);
    }
}
