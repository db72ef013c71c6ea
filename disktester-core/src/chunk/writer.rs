use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{DiskTesterError, Result};
use crate::hash::sha1::Sha1Digest;
use crate::naming::{self, BLOCK_QUANTUM};
use crate::util::digest_forward::DigestForward;

/// Fail with `InvalidSize` unless `size_bytes` is a positive multiple of
/// the block quantum.
pub fn ensure_block_aligned(size_bytes: u64) -> Result<()> {
    if size_bytes == 0 || size_bytes % BLOCK_QUANTUM != 0 {
        return Err(DiskTesterError::InvalidSize {
            size: size_bytes,
            quantum: BLOCK_QUANTUM,
        });
    }
    Ok(())
}

/// Stream `size_bytes` of OS-random data into a new file at `path`, hashing
/// the bytes as they are written, then persist the digest to the `.sha1`
/// sidecar. Returns the hex digest and the byte count written.
///
/// The sidecar is written only after the data file is fully flushed and
/// synced; a crash in between leaves a data file without a sidecar, which
/// later runs treat as not part of the set.
pub fn write_chunk(path: &Path, size_bytes: u64) -> Result<(String, u64)> {
    ensure_block_aligned(size_bytes)?;

    let mut digest = Sha1Digest::new();
    let file = File::create(path)?;
    let mut out = DigestForward::new(BufWriter::new(file), &mut digest);

    let mut block = [0u8; BLOCK_QUANTUM as usize];
    for _ in 0..size_bytes / BLOCK_QUANTUM {
        getrandom::getrandom(&mut block)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e.to_string()))?;
        out.write_all(&block)?;
    }

    let written = out.counted;
    let file = out.into_inner().into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;

    // Guard against external deletion between the write and the sidecar.
    if !path.exists() {
        return Err(DiskTesterError::NotFound(path.to_path_buf()));
    }

    let digest_hex = digest.finalize_hex();
    fs::write(naming::digest_sibling(path), &digest_hex)?;

    Ok((digest_hex, written))
}
