use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

use tracing::warn;

use crate::error::{DiskTesterError, Result};
use crate::hash::sha1::Sha1Digest;
use crate::naming::{self, BLOCK_QUANTUM};

/// Default read-buffer size for re-hashing. Deliberately unrelated to the
/// write block size: the digest must be a pure function of byte content.
pub const READ_BLOCK: usize = 64 * 1024;

/// Re-read a chunk from disk, recompute its digest, and compare against the
/// stored sidecar. Returns the verdict; a mismatch is `Ok(false)`, not an
/// error. Missing or malformed artifacts are typed errors so callers can
/// tell configuration damage apart from data corruption.
pub fn validate_chunk(path: &Path) -> Result<bool> {
    validate_chunk_with(path, READ_BLOCK)
}

pub fn validate_chunk_with(path: &Path, read_block: usize) -> Result<bool> {
    if !path.exists() {
        return Err(DiskTesterError::NotFound(path.to_path_buf()));
    }
    let digest_path = naming::digest_sibling(path);
    if !digest_path.exists() {
        return Err(DiskTesterError::NotFound(digest_path));
    }

    let raw = fs::read_to_string(&digest_path)?;
    let stored = raw.trim();
    if stored.is_empty() {
        return Err(DiskTesterError::EmptyDigest(digest_path));
    }
    if !is_sha1_hex(stored) {
        return Err(DiskTesterError::MalformedDigest {
            path: digest_path,
            value: stored.to_string(),
        });
    }

    let len = fs::metadata(path)?.len();
    if len % BLOCK_QUANTUM != 0 {
        // A size anomaly alone must not block verification; the digest
        // comparison below is the authoritative signal.
        warn!(
            path = %path.display(),
            len,
            "file length is not a multiple of {} bytes, continuing",
            BLOCK_QUANTUM
        );
    }

    let mut f = File::open(path)?;
    let mut digest = Sha1Digest::new();
    let mut buf = vec![0u8; read_block];
    loop {
        let n = f.read(&mut buf)?;
        if n == 0 {
            break;
        }
        digest.update(&buf[..n]);
    }

    Ok(digest.finalize_hex() == stored)
}

/// Exactly 40 lowercase hexadecimal characters.
pub fn is_sha1_hex(s: &str) -> bool {
    s.len() == 40 && s.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}
