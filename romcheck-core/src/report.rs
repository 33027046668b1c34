use crate::verify::{BadDump, ClassificationResult, FileError};
use serde::Serialize;
use std::fmt::Write as _;
use std::path::Path;

pub const DEFAULT_REPORT: &str = "verification_report.txt";

fn section(out: &mut String, title: &str) {
    let _ = writeln!(out, "{title}:");
    let _ = writeln!(out, "{}", "-".repeat(title.len()));
}

fn names(out: &mut String, names: &[&str], none: &str) {
    if names.is_empty() {
        let _ = writeln!(out, "{none}");
    } else {
        for n in names {
            let _ = writeln!(out, "{n}");
        }
    }
}

/// Render the plain-text report. Every list is sorted so identical results
/// always give identical text.
pub fn render(result: &ClassificationResult) -> String {
    let mut out = String::new();
    out.push_str("ROM Verification Report\n");
    out.push_str("=====================\n\n");

    section(&mut out, "Bad Dumps");
    let bad = result.sorted_bad_dumps();
    if bad.is_empty() {
        out.push_str("None found\n\n");
    } else {
        for b in bad {
            let _ = writeln!(out, "Game: {}", b.container_name);
            let _ = writeln!(out, "ROM: {}", b.name);
            let _ = writeln!(out, "Expected SHA256: {}", b.expected_digest);
            let _ = writeln!(out, "Actual SHA256: {}", b.actual_digest);
            out.push('\n');
        }
    }

    section(&mut out, "Missing ROMs");
    names(&mut out, &result.sorted_missing(), "None missing");
    out.push('\n');

    section(&mut out, "Unknown Files");
    names(&mut out, &result.sorted_unknown(), "None found");
    out.push('\n');

    section(&mut out, "Verified ROMs");
    names(&mut out, &result.sorted_verified(), "None verified");

    let errored = result.sorted_errored();
    if !errored.is_empty() {
        out.push('\n');
        section(&mut out, "Read Errors");
        for e in errored {
            let _ = writeln!(out, "{}: {}", e.name, e.reason);
        }
    }
    out
}

/// Write the text report to `path`, replacing any existing file.
pub fn write_report(result: &ClassificationResult, path: &Path) -> std::io::Result<()> {
    std::fs::write(path, render(result))
}

#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
pub struct Counts {
    pub verified: usize,
    pub bad_dumps: usize,
    pub missing: usize,
    pub unknown: usize,
    pub errored: usize,
}

impl From<&ClassificationResult> for Counts {
    fn from(r: &ClassificationResult) -> Self {
        Counts {
            verified: r.verified.len(),
            bad_dumps: r.bad_dumps.len(),
            missing: r.missing.len(),
            unknown: r.unknown.len(),
            errored: r.errored.len(),
        }
    }
}

/// Machine-readable view of a result with sorted lists.
#[derive(Serialize, Debug)]
pub struct JsonReport<'a> {
    pub counts: Counts,
    pub bad_dumps: Vec<&'a BadDump>,
    pub missing: Vec<&'a str>,
    pub unknown: Vec<&'a str>,
    pub verified: Vec<&'a str>,
    pub errored: Vec<&'a FileError>,
}

impl<'a> From<&'a ClassificationResult> for JsonReport<'a> {
    fn from(r: &'a ClassificationResult) -> Self {
        JsonReport {
            counts: Counts::from(r),
            bad_dumps: r.sorted_bad_dumps(),
            missing: r.sorted_missing(),
            unknown: r.sorted_unknown(),
            verified: r.sorted_verified(),
            errored: r.sorted_errored(),
        }
    }
}

pub fn render_json(result: &ClassificationResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport::from(result))
}
