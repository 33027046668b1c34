use std::path::PathBuf;
use thiserror::Error;

/// Problems with the content of a DAT document.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
    #[error("malformed XML")]
    Xml(#[from] roxmltree::Error),
    #[error("rom '{rom}' has invalid size attribute '{value}'")]
    InvalidSize { rom: String, value: String },
}

/// Errors that abort a verification run. Causes are exposed through
/// `source()`, not repeated in the message. Per-file read failures are not
/// represented here; they are recorded in the classification result.
#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("failed to read manifest {}", path.display())]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse manifest {}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: ManifestError,
    },
    #[error("{0}")]
    Precondition(String),
    #[error("failed to list directory {}", path.display())]
    ScanDir {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
    #[error("invalid exclude pattern")]
    Pattern(#[from] globset::Error),
    #[error("failed to start hashing pool")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
