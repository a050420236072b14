use anyhow::Result;
use ignore::WalkBuilder;
use log::debug;
use std::path::{Path, PathBuf};

use crate::error::ScanError;

pub const ARCHIVE_EXTENSION: &str = ".jar";

/// One candidate archive directly inside the scanned directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Archive {
    pub path: PathBuf,
    pub name: String,
}

/// Lists the `.jar` files directly inside `dir`, in directory-listing order.
pub fn enumerate_archives(dir: &Path) -> Result<Vec<Archive>> {
    let meta = std::fs::metadata(dir).map_err(|source| ScanError::DirectoryAccess {
        path: dir.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(ScanError::NotADirectory {
            path: dir.to_path_buf(),
        }
        .into());
    }

    let walker = WalkBuilder::new(dir)
        .max_depth(Some(1))
        .follow_links(true)
        .hidden(false)
        .ignore(false)
        .parents(false)
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .build();

    let mut archives = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                if archives.is_empty() && is_root_error(&err, dir) {
                    return Err(ScanError::DirectoryAccess {
                        path: dir.to_path_buf(),
                        source: into_io_error(err),
                    }
                    .into());
                }
                // Dangling links and the like stay candidates; listing them reports the failure.
                match error_path(&err).and_then(archive_at) {
                    Some(archive) => {
                        debug!("unreadable candidate {}: {err}", archive.path.display());
                        archives.push(archive);
                    }
                    None => debug!("skipping unreadable entry in {}: {err}", dir.display()),
                }
                continue;
            }
        };

        if entry.depth() == 0 {
            continue;
        }
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        if let Some(archive) = archive_at(entry.path()) {
            archives.push(archive);
        }
    }

    debug!("found {} candidate archive(s) in {}", archives.len(), dir.display());
    Ok(archives)
}

/// Matches the extension on raw name bytes so non UTF-8 names are kept.
fn archive_at(path: &Path) -> Option<Archive> {
    let name = path.file_name()?;
    if !name.as_encoded_bytes().ends_with(ARCHIVE_EXTENSION.as_bytes()) {
        return None;
    }
    Some(Archive {
        name: name.to_string_lossy().into_owned(),
        path: path.to_path_buf(),
    })
}

fn error_path(err: &ignore::Error) -> Option<&Path> {
    match err {
        ignore::Error::WithPath { path, .. } => Some(path.as_path()),
        ignore::Error::WithDepth { err, .. } | ignore::Error::WithLineNumber { err, .. } => {
            error_path(err)
        }
        ignore::Error::Loop { child, .. } => Some(child.as_path()),
        _ => None,
    }
}

fn is_root_error(err: &ignore::Error, dir: &Path) -> bool {
    err.depth().is_none_or(|d| d == 0) && error_path(err).is_none_or(|p| p == dir)
}

fn into_io_error(err: ignore::Error) -> std::io::Error {
    match err.into_io_error() {
        Some(io) => io,
        None => std::io::Error::other("directory walk failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn temp_dir(prefix: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!(
            "{prefix}-{}-{}",
            std::process::id(),
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap()
                .as_nanos()
        ));
        p
    }

    fn names(archives: &[Archive]) -> Vec<String> {
        let mut names: Vec<String> = archives.iter().map(|a| a.name.clone()).collect();
        names.sort();
        names
    }

    #[test]
    fn picks_only_top_level_jar_files() {
        let base = temp_dir("class-scan-enum");
        fs::create_dir_all(base.join("nested")).unwrap();
        fs::write(base.join("a.jar"), b"").unwrap();
        fs::write(base.join("b.jar"), b"").unwrap();
        fs::write(base.join("notes.txt"), b"").unwrap();
        fs::write(base.join("upper.JAR"), b"").unwrap();
        fs::write(base.join("a.jar.bak"), b"").unwrap();
        fs::write(base.join("nested/deep.jar"), b"").unwrap();
        fs::create_dir_all(base.join("dir.jar")).unwrap();

        let archives = enumerate_archives(&base).unwrap();
        assert_eq!(names(&archives), vec!["a.jar", "b.jar"]);
        for a in &archives {
            assert_eq!(a.path, base.join(&a.name));
        }

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn hidden_jar_files_are_candidates() {
        let base = temp_dir("class-scan-hidden");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join(".shadow.jar"), b"").unwrap();

        let archives = enumerate_archives(&base).unwrap();
        assert_eq!(names(&archives), vec![".shadow.jar"]);

        let _ = fs::remove_dir_all(base);
    }

    #[cfg(unix)]
    #[test]
    fn dangling_jar_symlink_stays_a_candidate() {
        let base = temp_dir("class-scan-dangling");
        fs::create_dir_all(&base).unwrap();
        fs::write(base.join("good.jar"), b"").unwrap();
        std::os::unix::fs::symlink(base.join("missing-target"), base.join("x.jar")).unwrap();
        std::os::unix::fs::symlink(base.join("missing-other"), base.join("notes.txt")).unwrap();

        let archives = enumerate_archives(&base).unwrap();
        assert_eq!(names(&archives), vec!["good.jar", "x.jar"]);
        assert!(archives.iter().any(|a| a.path == base.join("x.jar")));

        let _ = fs::remove_dir_all(base);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_jar_name_stays_a_candidate() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let base = temp_dir("class-scan-non-utf8");
        fs::create_dir_all(&base).unwrap();
        let raw = OsStr::from_bytes(b"caf\xe9.jar");
        fs::write(base.join(raw), b"").unwrap();

        let archives = enumerate_archives(&base).unwrap();
        assert_eq!(archives.len(), 1);
        assert_eq!(archives[0].path, base.join(raw));
        assert_eq!(archives[0].name, "caf\u{FFFD}.jar");

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn empty_directory_yields_no_candidates() {
        let base = temp_dir("class-scan-empty");
        fs::create_dir_all(&base).unwrap();

        assert!(enumerate_archives(&base).unwrap().is_empty());

        let _ = fs::remove_dir_all(base);
    }

    #[test]
    fn missing_directory_is_fatal() {
        let base = temp_dir("class-scan-missing");
        let err = enumerate_archives(&base).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::DirectoryAccess { .. })
        ));
    }

    #[test]
    fn file_path_is_not_a_directory() {
        let base = temp_dir("class-scan-file");
        fs::create_dir_all(&base).unwrap();
        let file = base.join("lib.jar");
        fs::write(&file, b"").unwrap();

        let err = enumerate_archives(&file).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::NotADirectory { .. })
        ));

        let _ = fs::remove_dir_all(base);
    }
}
