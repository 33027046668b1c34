use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const DEFAULT_CHUNK: usize = 4096;

/// Computes the content digest the engine compares against the manifest.
pub trait FileHasher {
    /// Hex digest of the full content of `path`, lowercase.
    fn digest(&self, path: &Path) -> io::Result<String>;
}

/// Streaming SHA-256 over fixed-size reads.
#[derive(Clone, Copy, Debug)]
pub struct Sha256Hasher {
    chunk_size: usize,
}

impl Sha256Hasher {
    pub fn new(chunk_size: usize) -> Self {
        Self { chunk_size: chunk_size.max(1) }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK)
    }
}

impl FileHasher for Sha256Hasher {
    fn digest(&self, path: &Path) -> io::Result<String> {
        let mut f = File::open(path)?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let n = match f.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            hasher.update(&buf[..n]);
        }
        Ok(hex::encode(hasher.finalize()))
    }
}
