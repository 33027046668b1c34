use crate::error::VerifyError;
use crate::hash::{FileHasher, Sha256Hasher, DEFAULT_CHUNK};
use crate::manifest::{ManifestEntry, ManifestIndex};
use crate::progress::Progress;
use crate::scan::{scan_dir, Candidate, ScanPolicy};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::Path;
use tracing::{info, warn};

/// A file present on disk and in the manifest whose digest differs.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct BadDump {
    pub name: String,
    pub container_name: String,
    pub expected_digest: String,
    pub actual_digest: String,
}

/// A file that was found but could not be read to the end.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct FileError {
    pub name: String,
    pub reason: String,
}

/// Outcome of one verification pass. A name lands in exactly one collection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClassificationResult {
    pub verified: HashSet<String>,
    pub bad_dumps: Vec<BadDump>,
    pub missing: HashSet<String>,
    pub unknown: HashSet<String>,
    pub errored: Vec<FileError>,
}

fn sorted(set: &HashSet<String>) -> Vec<&str> {
    let mut v: Vec<&str> = set.iter().map(String::as_str).collect();
    v.sort_unstable();
    v
}

impl ClassificationResult {
    pub fn sorted_verified(&self) -> Vec<&str> {
        sorted(&self.verified)
    }
    pub fn sorted_missing(&self) -> Vec<&str> {
        sorted(&self.missing)
    }
    pub fn sorted_unknown(&self) -> Vec<&str> {
        sorted(&self.unknown)
    }
    pub fn sorted_bad_dumps(&self) -> Vec<&BadDump> {
        let mut v: Vec<&BadDump> = self.bad_dumps.iter().collect();
        v.sort_by(|a, b| a.name.cmp(&b.name));
        v
    }
    pub fn sorted_errored(&self) -> Vec<&FileError> {
        let mut v: Vec<&FileError> = self.errored.iter().collect();
        v.sort_by(|a, b| a.name.cmp(&b.name));
        v
    }

    /// True when every manifest entry verified and nothing else turned up.
    pub fn is_clean(&self) -> bool {
        self.bad_dumps.is_empty()
            && self.missing.is_empty()
            && self.unknown.is_empty()
            && self.errored.is_empty()
    }

    /// Number of classified names across all collections.
    pub fn total(&self) -> usize {
        self.verified.len()
            + self.bad_dumps.len()
            + self.missing.len()
            + self.unknown.len()
            + self.errored.len()
    }
}

/// Tunables for one run.
#[derive(Clone, Debug)]
pub struct VerifyOptions {
    pub chunk_size: usize,
    /// Hashing workers; `None` lets rayon pick from available parallelism.
    pub threads: Option<usize>,
    pub policy: ScanPolicy,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self { chunk_size: DEFAULT_CHUNK, threads: None, policy: ScanPolicy::default() }
    }
}

/// Check that both inputs exist before any work starts.
pub fn preflight(manifest_path: &Path, target_dir: &Path) -> Result<(), VerifyError> {
    if !manifest_path.exists() {
        return Err(VerifyError::Precondition(format!(
            "DAT file '{}' not found",
            manifest_path.display()
        )));
    }
    if !target_dir.exists() {
        return Err(VerifyError::Precondition(format!(
            "ROMs folder '{}' not found",
            target_dir.display()
        )));
    }
    if !target_dir.is_dir() {
        return Err(VerifyError::Precondition(format!(
            "ROMs folder '{}' is not a directory",
            target_dir.display()
        )));
    }
    Ok(())
}

enum Outcome {
    Match,
    Mismatch(String),
    Failed(String),
}

pub struct VerificationEngine<H = Sha256Hasher> {
    hasher: H,
    threads: Option<usize>,
    policy: ScanPolicy,
    progress: Progress,
}

impl VerificationEngine<Sha256Hasher> {
    pub fn new(opts: VerifyOptions) -> Self {
        Self::with_hasher(Sha256Hasher::new(opts.chunk_size), opts)
    }
}

impl<H: FileHasher + Sync> VerificationEngine<H> {
    /// Use a custom hasher; `opts.chunk_size` is ignored.
    pub fn with_hasher(hasher: H, opts: VerifyOptions) -> Self {
        Self { hasher, threads: opts.threads, policy: opts.policy, progress: Progress::disabled() }
    }

    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    /// Scan `target_dir` once and classify every regular file in it plus
    /// every manifest entry against `index`.
    pub fn verify(
        &self,
        index: &ManifestIndex,
        target_dir: &Path,
    ) -> Result<ClassificationResult, VerifyError> {
        let scan = scan_dir(target_dir, &self.policy)?;
        let mut result = ClassificationResult::default();
        let mut found: HashSet<String> = HashSet::with_capacity(scan.files.len());

        for u in scan.unreadable {
            found.insert(u.name.clone());
            result.errored.push(FileError { name: u.name, reason: u.reason });
        }

        let mut to_hash: Vec<(Candidate, &ManifestEntry)> = Vec::new();
        for c in scan.files {
            found.insert(c.name.clone());
            match index.get(&c.name) {
                Some(entry) => to_hash.push((c, entry)),
                None => {
                    result.unknown.insert(c.name);
                }
            }
        }
        info!(
            scanned = found.len(),
            to_hash = to_hash.len(),
            unknown = result.unknown.len(),
            "scan complete"
        );

        let mut pool = rayon::ThreadPoolBuilder::new();
        if let Some(n) = self.threads {
            pool = pool.num_threads(n);
        }
        let pool = pool.build()?;

        self.progress.set_stage("Hashing");
        self.progress.set_files_total(to_hash.len());
        self.progress.start();
        let outcomes: Vec<(Candidate, &ManifestEntry, Outcome)> = pool.install(|| {
            to_hash
                .into_par_iter()
                .map(|(c, entry)| {
                    let outcome = self.check(entry, &c);
                    self.progress.inc_file();
                    (c, entry, outcome)
                })
                .collect()
        });
        self.progress.stop();

        for (c, entry, outcome) in outcomes {
            match outcome {
                Outcome::Match => {
                    result.verified.insert(c.name);
                }
                Outcome::Mismatch(actual_digest) => {
                    result.bad_dumps.push(BadDump {
                        name: c.name,
                        container_name: entry.container_name.clone(),
                        expected_digest: entry.expected_digest.clone(),
                        actual_digest,
                    });
                }
                Outcome::Failed(reason) => {
                    result.errored.push(FileError { name: c.name, reason });
                }
            }
        }

        result.missing =
            index.names().filter(|n| !found.contains(*n)).map(str::to_string).collect();

        info!(
            verified = result.verified.len(),
            bad_dumps = result.bad_dumps.len(),
            missing = result.missing.len(),
            unknown = result.unknown.len(),
            errored = result.errored.len(),
            "verification complete"
        );
        Ok(result)
    }

    fn check(&self, entry: &ManifestEntry, c: &Candidate) -> Outcome {
        match self.hasher.digest(&c.path) {
            Ok(actual) if actual.eq_ignore_ascii_case(&entry.expected_digest) => Outcome::Match,
            Ok(actual) => Outcome::Mismatch(actual.to_lowercase()),
            Err(e) => {
                warn!(file = %c.name, error = %e, "failed to hash file");
                Outcome::Failed(e.to_string())
            }
        }
    }
}

/// Verify `target_dir` against `index` with default options.
pub fn verify(index: &ManifestIndex, target_dir: &Path) -> Result<ClassificationResult, VerifyError> {
    VerificationEngine::new(VerifyOptions::default()).verify(index, target_dir)
}
