//! Chunk set lifecycle over one invocation: plan-and-write, validate-only,
//! and clean. All state lives on disk as files discovered by the naming
//! convention; nothing persists between runs.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use crate::chunk::validator::validate_chunk;
use crate::chunk::writer::{ensure_block_aligned, write_chunk};
use crate::error::{DiskTesterError, Result};
use crate::naming;
use crate::progress::{Phase, Progress};
use crate::volume::capacity;

/// Sizing for one test run, threaded in explicitly by the caller.
#[derive(Clone, Copy, Debug)]
pub struct SetConfig {
    pub total_bytes: u64,
    pub chunk_size: u64,
}

impl SetConfig {
    /// Remainder bytes past the last whole chunk are never written. A zero
    /// chunk size plans zero chunks; the write path rejects it as invalid.
    pub fn num_chunks(&self) -> u64 {
        if self.chunk_size == 0 {
            0
        } else {
            self.total_bytes / self.chunk_size
        }
    }
}

#[derive(Clone, Debug)]
pub struct TestReport {
    pub chunks: u64,
    pub bytes_written: u64,
}

#[derive(Clone, Debug)]
pub enum ValidateOutcome {
    /// Destination subdirectory absent; nothing to do.
    NoDirectory(PathBuf),
    /// Every discovered chunk re-hashed to its stored digest.
    Validated { chunks: u64 },
}

#[derive(Clone, Debug)]
pub struct CleanReport {
    pub dest: PathBuf,
    /// False when the destination did not exist and there was nothing to do.
    pub existed: bool,
    pub removed: u64,
    pub failed: u64,
    pub dir_removed: bool,
}

/// The tool-owned subdirectory holding all chunk artifacts under `root`.
pub fn dest_dir(root: &Path) -> PathBuf {
    root.join(naming::DEST_DIR_NAME)
}

/// Write the planned chunk set, then re-read and verify every chunk.
///
/// The capacity gate runs before any chunk is written; the first failure of
/// any kind afterwards aborts the run. A false verdict from the validator
/// surfaces as a `DigestMismatch` error naming the chunk.
pub fn run_test(root: &Path, cfg: &SetConfig, progress: &dyn Progress) -> Result<TestReport> {
    ensure_block_aligned(cfg.chunk_size)?;

    let dest = dest_dir(root);
    fs::create_dir_all(&dest)?;

    let available = capacity::available_bytes(&dest)?;
    info!(
        available,
        requested = cfg.total_bytes,
        dest = %dest.display(),
        "capacity check"
    );
    if available < cfg.total_bytes {
        return Err(DiskTesterError::InsufficientSpace {
            dest,
            requested: cfg.total_bytes,
            available,
        });
    }

    let num_chunks = cfg.num_chunks();
    let mut bytes_written = 0u64;

    progress.phase_started(Phase::Write, num_chunks);
    for i in 0..num_chunks {
        let path = dest.join(naming::data_file_name(i));
        let (_, written) = write_chunk(&path, cfg.chunk_size)?;
        bytes_written += written;
        progress.item_completed(Phase::Write, i);
    }
    progress.phase_finished(Phase::Write);

    progress.phase_started(Phase::Validate, num_chunks);
    for i in 0..num_chunks {
        let path = dest.join(naming::data_file_name(i));
        if !validate_chunk(&path)? {
            return Err(DiskTesterError::DigestMismatch(path));
        }
        progress.item_completed(Phase::Validate, i);
    }
    progress.phase_finished(Phase::Validate);

    Ok(TestReport {
        chunks: num_chunks,
        bytes_written,
    })
}

/// Re-verify whatever chunk set is already on disk.
///
/// Data files without a digest sidecar are not part of the set and are
/// skipped, not reported. The first mismatch or artifact error aborts.
pub fn run_validate(root: &Path, progress: &dyn Progress) -> Result<ValidateOutcome> {
    let dest = dest_dir(root);
    if !dest.exists() {
        info!(dest = %dest.display(), "destination folder absent, nothing to validate");
        return Ok(ValidateOutcome::NoDirectory(dest));
    }

    let chunks = discover_chunks(&dest)?;
    progress.phase_started(Phase::Validate, chunks.len() as u64);
    for (i, path) in chunks.iter().enumerate() {
        if !validate_chunk(path)? {
            return Err(DiskTesterError::DigestMismatch(path.clone()));
        }
        progress.item_completed(Phase::Validate, i as u64);
    }
    progress.phase_finished(Phase::Validate);

    Ok(ValidateOutcome::Validated {
        chunks: chunks.len() as u64,
    })
}

/// Data files under `dest` that have a digest sibling, ascending by index.
fn discover_chunks(dest: &Path) -> Result<Vec<PathBuf>> {
    let mut indexed: Vec<(u64, PathBuf)> = Vec::new();
    for entry in fs::read_dir(dest)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if let Some(index) = naming::data_chunk_index(name) {
            let path = entry.path();
            if naming::digest_sibling(&path).exists() {
                indexed.push((index, path));
            }
        }
    }
    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, path)| path).collect())
}

/// Remove every file under the destination whose name matches the chunk
/// naming pattern exactly, then remove the destination itself if only
/// ignorable platform metadata remains.
///
/// Cleanup is housekeeping: a single file that cannot be removed is warned
/// about and counted, and the pass continues.
pub fn clean(root: &Path, progress: &dyn Progress) -> Result<CleanReport> {
    let dest = dest_dir(root);
    if !dest.exists() {
        info!(dest = %dest.display(), "destination folder absent, nothing to clean");
        return Ok(CleanReport {
            dest,
            existed: false,
            removed: 0,
            failed: 0,
            dir_removed: false,
        });
    }

    info!(dest = %dest.display(), "cleaning folder");
    let mut removed = 0u64;
    let mut failed = 0u64;

    progress.phase_started(Phase::Clean, 0);
    for entry in WalkDir::new(&dest).follow_links(false) {
        let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(name) = entry.file_name().to_str() else {
            continue;
        };
        if !naming::is_chunk_artifact(name) {
            continue;
        }
        match fs::remove_file(entry.path()) {
            Ok(()) => {
                info!(path = %entry.path().display(), "removed");
                removed += 1;
                progress.item_completed(Phase::Clean, removed);
            }
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "could not remove");
                failed += 1;
            }
        }
    }
    progress.phase_finished(Phase::Clean);

    let dir_removed = if effectively_empty(&dest)? {
        fs::remove_dir_all(&dest)?;
        true
    } else {
        false
    };

    Ok(CleanReport {
        dest,
        existed: true,
        removed,
        failed,
        dir_removed,
    })
}

/// True when every file left under `dest` is OS-generated metadata.
fn effectively_empty(dest: &Path) -> Result<bool> {
    for entry in WalkDir::new(dest).follow_links(false) {
        let entry = entry.map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let ignorable = entry
            .file_name()
            .to_str()
            .map(|name| naming::IGNORED_METADATA.contains(&name))
            .unwrap_or(false);
        if !ignorable {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::NoProgress;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn run_small_test(root: &Path) -> TestReport {
        let cfg = SetConfig {
            total_bytes: 3000,
            chunk_size: 1000,
        };
        run_test(root, &cfg, &NoProgress).unwrap()
    }

    #[test]
    fn test_run_writes_and_validates_all_chunks() {
        let dir = TempDir::new().unwrap();
        let report = run_small_test(dir.path());

        assert_eq!(report.chunks, 3);
        assert_eq!(report.bytes_written, 3000);

        let dest = dest_dir(dir.path());
        for i in 0..3 {
            let data = dest.join(naming::data_file_name(i));
            assert_eq!(fs::metadata(&data).unwrap().len(), 1000);
            assert!(naming::digest_sibling(&data).exists());
        }
    }

    #[test]
    fn plan_truncates_remainder_bytes() {
        let dir = TempDir::new().unwrap();
        let cfg = SetConfig {
            total_bytes: 2500,
            chunk_size: 1000,
        };
        let report = run_test(dir.path(), &cfg, &NoProgress).unwrap();

        assert_eq!(report.chunks, 2);
        assert_eq!(report.bytes_written, 2000);
        assert!(!dest_dir(dir.path()).join(naming::data_file_name(2)).exists());
    }

    #[test]
    fn misaligned_chunk_size_fails_before_touching_disk() {
        let dir = TempDir::new().unwrap();
        let cfg = SetConfig {
            total_bytes: 3000,
            chunk_size: 1500,
        };
        let err = run_test(dir.path(), &cfg, &NoProgress).unwrap_err();
        assert!(matches!(err, DiskTesterError::InvalidSize { .. }));
        assert!(!dest_dir(dir.path()).exists());
    }

    #[test]
    fn capacity_gate_stops_the_run_before_any_write() {
        let dir = TempDir::new().unwrap();
        // Far beyond any test machine's free space.
        let cfg = SetConfig {
            total_bytes: 900_000_000_000_000_000,
            chunk_size: 1000,
        };
        let err = run_test(dir.path(), &cfg, &NoProgress).unwrap_err();
        assert!(matches!(err, DiskTesterError::InsufficientSpace { .. }));

        let dest = dest_dir(dir.path());
        assert!(dest.exists());
        assert!(!dest.join(naming::data_file_name(0)).exists());
    }

    #[test]
    fn validate_run_covers_the_written_set() {
        let dir = TempDir::new().unwrap();
        run_small_test(dir.path());

        match run_validate(dir.path(), &NoProgress).unwrap() {
            ValidateOutcome::Validated { chunks } => assert_eq!(chunks, 3),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn validate_run_aborts_at_the_corrupted_chunk() {
        let dir = TempDir::new().unwrap();
        run_small_test(dir.path());

        let target = dest_dir(dir.path()).join(naming::data_file_name(1));
        let mut data = fs::read(&target).unwrap();
        data[0] ^= 0xff;
        fs::write(&target, &data).unwrap();

        // Track how far the pass got before the abort.
        struct LastSeen(Mutex<Option<u64>>);
        impl Progress for LastSeen {
            fn item_completed(&self, _phase: Phase, index: u64) {
                *self.0.lock().unwrap() = Some(index);
            }
        }
        let seen = LastSeen(Mutex::new(None));

        let err = run_validate(dir.path(), &seen).unwrap_err();
        assert!(matches!(err, DiskTesterError::DigestMismatch(p) if p == target));
        // chunk_0 completed, chunk_1 failed, chunk_2 never reached.
        assert_eq!(*seen.0.lock().unwrap(), Some(0));
    }

    #[test]
    fn validate_run_skips_data_files_without_sidecars() {
        let dir = TempDir::new().unwrap();
        run_small_test(dir.path());

        // An orphaned data file is not part of the set, not an error.
        let orphan = dest_dir(dir.path()).join(naming::data_file_name(9));
        fs::write(&orphan, b"partial").unwrap();

        match run_validate(dir.path(), &NoProgress).unwrap() {
            ValidateOutcome::Validated { chunks } => assert_eq!(chunks, 3),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn validate_run_on_absent_folder_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            run_validate(dir.path(), &NoProgress).unwrap(),
            ValidateOutcome::NoDirectory(_)
        ));
    }

    #[test]
    fn clean_removes_artifacts_and_the_empty_folder() {
        let dir = TempDir::new().unwrap();
        run_small_test(dir.path());

        let report = clean(dir.path(), &NoProgress).unwrap();
        assert!(report.existed);
        assert_eq!(report.removed, 6);
        assert_eq!(report.failed, 0);
        assert!(report.dir_removed);
        assert!(!dest_dir(dir.path()).exists());
    }

    #[test]
    fn clean_preserves_stray_files_and_the_folder() {
        let dir = TempDir::new().unwrap();
        run_small_test(dir.path());

        let dest = dest_dir(dir.path());
        let stray = dest.join("notes.txt");
        fs::write(&stray, b"keep me").unwrap();

        let report = clean(dir.path(), &NoProgress).unwrap();
        assert_eq!(report.removed, 6);
        assert!(!report.dir_removed);
        assert!(stray.exists());
        assert!(dest.exists());
        assert!(!dest.join(naming::data_file_name(0)).exists());
    }

    #[test]
    fn clean_never_touches_near_miss_names() {
        let dir = TempDir::new().unwrap();
        run_small_test(dir.path());

        let dest = dest_dir(dir.path());
        let backup = dest.join("chunk_1.dat.bak");
        let alpha = dest.join("chunk_abc.dat");
        fs::write(&backup, b"x").unwrap();
        fs::write(&alpha, b"y").unwrap();

        let report = clean(dir.path(), &NoProgress).unwrap();
        assert_eq!(report.removed, 6);
        assert!(!report.dir_removed);
        assert!(backup.exists());
        assert!(alpha.exists());
    }

    #[test]
    fn clean_treats_platform_metadata_as_empty() {
        let dir = TempDir::new().unwrap();
        run_small_test(dir.path());

        let dest = dest_dir(dir.path());
        fs::write(dest.join(".DS_Store"), b"").unwrap();

        let report = clean(dir.path(), &NoProgress).unwrap();
        assert!(report.dir_removed);
        assert!(!dest.exists());
    }

    #[test]
    fn clean_reaches_nested_artifacts() {
        let dir = TempDir::new().unwrap();
        let dest = dest_dir(dir.path());
        let nested = dest.join("old-run");
        fs::create_dir_all(&nested).unwrap();
        fs::write(nested.join("chunk_0.dat"), b"z").unwrap();
        fs::write(nested.join("chunk_0.dat.sha1"), b"z").unwrap();

        let report = clean(dir.path(), &NoProgress).unwrap();
        assert_eq!(report.removed, 2);
        assert!(report.dir_removed);
    }

    #[test]
    fn clean_on_absent_folder_is_a_no_op() {
        let dir = TempDir::new().unwrap();
        let report = clean(dir.path(), &NoProgress).unwrap();
        assert!(!report.existed);
        assert_eq!(report.removed, 0);
        assert!(!report.dir_removed);
    }
}
