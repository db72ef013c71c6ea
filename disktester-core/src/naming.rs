//! Filename convention for chunk artifacts.
//!
//! There is no manifest: membership in a chunk set is decided purely by
//! these names, so the write, validate, and clean paths must all agree
//! through this module and nothing else.

use std::path::{Path, PathBuf};

/// Subdirectory under the target root that owns all chunk artifacts.
pub const DEST_DIR_NAME: &str = "disktester";

/// Write sizes must be an exact multiple of this many bytes.
pub const BLOCK_QUANTUM: u64 = 1000;

/// OS-generated metadata files that do not count against folder emptiness.
pub const IGNORED_METADATA: [&str; 2] = [".DS_Store", "Thumbs.db"];

const DATA_PREFIX: &str = "chunk_";
const DATA_EXT: &str = ".dat";
const DIGEST_EXT: &str = ".sha1";

pub fn data_file_name(index: u64) -> String {
    format!("{DATA_PREFIX}{index}{DATA_EXT}")
}

/// Digest sidecar path for a data file: `<path>.sha1`.
pub fn digest_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(DIGEST_EXT);
    PathBuf::from(name)
}

/// Index of a file named exactly `chunk_<N>.dat`, where `<N>` is a bare
/// non-negative integer. Anything else is None.
pub fn data_chunk_index(name: &str) -> Option<u64> {
    let digits = name.strip_prefix(DATA_PREFIX)?.strip_suffix(DATA_EXT)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// True for names matching the data or digest pattern in full. Near-misses
/// like `chunk_1.dat.bak` or `chunk_abc.dat` are not ours to touch.
pub fn is_chunk_artifact(name: &str) -> bool {
    let data_name = name.strip_suffix(DIGEST_EXT).unwrap_or(name);
    data_chunk_index(data_name).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_names_round_trip() {
        assert_eq!(data_file_name(0), "chunk_0.dat");
        assert_eq!(data_file_name(41), "chunk_41.dat");
        assert_eq!(data_chunk_index("chunk_0.dat"), Some(0));
        assert_eq!(data_chunk_index("chunk_41.dat"), Some(41));
    }

    #[test]
    fn index_parsing_is_exact() {
        assert_eq!(data_chunk_index("chunk_.dat"), None);
        assert_eq!(data_chunk_index("chunk_abc.dat"), None);
        assert_eq!(data_chunk_index("chunk_1.dat.bak"), None);
        assert_eq!(data_chunk_index("chunk_1x.dat"), None);
        assert_eq!(data_chunk_index("chunk_-1.dat"), None);
        assert_eq!(data_chunk_index("xchunk_1.dat"), None);
    }

    #[test]
    fn artifact_match_covers_both_extensions() {
        assert!(is_chunk_artifact("chunk_7.dat"));
        assert!(is_chunk_artifact("chunk_7.dat.sha1"));
        assert!(!is_chunk_artifact("chunk_7.dat.bak"));
        assert!(!is_chunk_artifact("chunk_abc.dat"));
        assert!(!is_chunk_artifact("chunk_abc.dat.sha1"));
        assert!(!is_chunk_artifact("notes.txt"));
    }

    #[test]
    fn digest_sibling_appends_extension() {
        let p = Path::new("/tmp/disktester/chunk_3.dat");
        assert_eq!(
            digest_sibling(p),
            PathBuf::from("/tmp/disktester/chunk_3.dat.sha1")
        );
    }
}
