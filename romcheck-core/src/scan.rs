use crate::error::VerifyError;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::ffi::OsStr;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Which directory entries take part in a scan.
#[derive(Clone, Debug)]
pub struct ScanPolicy {
    /// Treat symlinks to regular files as regular files. Dangling links are
    /// skipped. When false every symlink is skipped.
    pub follow_symlinks: bool,
    /// File names matching any of these globs are skipped.
    pub exclude: Vec<String>,
}

impl Default for ScanPolicy {
    fn default() -> Self {
        Self { follow_symlinks: true, exclude: Vec::new() }
    }
}

impl ScanPolicy {
    fn exclude_set(&self) -> Result<GlobSet, VerifyError> {
        let mut b = GlobSetBuilder::new();
        for g in &self.exclude {
            b.add(Glob::new(g)?);
        }
        Ok(b.build()?)
    }
}

/// A regular file directly under the scanned directory.
#[derive(Clone, Debug)]
pub struct Candidate {
    pub name: String,
    pub path: PathBuf,
}

/// An entry that was seen but could not be inspected.
#[derive(Clone, Debug)]
pub struct Unreadable {
    pub name: String,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct Scan {
    pub files: Vec<Candidate>,
    pub unreadable: Vec<Unreadable>,
}

/// Display name for an entry whose file name is not UTF-8. The quoted,
/// escaped form keeps names that differ only in invalid bytes apart.
fn escaped_name(name: &OsStr) -> String {
    format!("{name:?}")
}

/// List the direct children of `root` that are regular files.
/// Subdirectories are not descended into.
pub fn scan_dir(root: &Path, policy: &ScanPolicy) -> Result<Scan, VerifyError> {
    let exclude = policy.exclude_set()?;
    let mut out = Scan::default();
    let walker =
        WalkDir::new(root).min_depth(1).max_depth(1).follow_links(policy.follow_symlinks);
    for ent in walker {
        let ent = match ent {
            Ok(e) => e,
            Err(e) if e.depth() == 0 => {
                return Err(VerifyError::ScanDir { path: root.to_path_buf(), source: e });
            }
            Err(e) => {
                let Some(os_name) = e.path().and_then(Path::file_name) else {
                    warn!(error = %e, "cannot inspect directory entry");
                    continue;
                };
                if exclude.is_match(os_name) {
                    continue;
                }
                let name = os_name.to_str().map_or_else(|| escaped_name(os_name), str::to_owned);
                // A link whose target is gone is not a file.
                if e.io_error().map(io::Error::kind) == Some(io::ErrorKind::NotFound) {
                    debug!(file = %name, "skipping dangling symlink");
                    continue;
                }
                warn!(file = %name, error = %e, "cannot inspect directory entry");
                out.unreadable.push(Unreadable { name, reason: e.to_string() });
                continue;
            }
        };
        let os_name = ent.file_name();
        if !ent.file_type().is_file() {
            debug!(file = ?os_name, "skipping non-regular entry");
            continue;
        }
        if exclude.is_match(os_name) {
            debug!(file = ?os_name, "excluded by pattern");
            continue;
        }
        match os_name.to_str().map(str::to_owned) {
            Some(name) => out.files.push(Candidate { name, path: ent.into_path() }),
            None => {
                let name = escaped_name(ent.file_name());
                warn!(file = %name, "file name is not valid UTF-8");
                out.unreadable
                    .push(Unreadable { name, reason: "file name is not valid UTF-8".into() });
            }
        }
    }
    Ok(out)
}
