use std::path::Path;

use crate::error::Result;

/// Free bytes available to an unprivileged writer on the filesystem
/// containing `path`.
///
/// Advisory only: nothing is reserved, so a concurrent writer can still
/// exhaust the volume after this returns.
#[cfg(unix)]
pub fn available_bytes(path: &Path) -> Result<u64> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let c_path = CString::new(path.as_os_str().as_bytes())
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

    // SAFETY: `c_path` is a valid null-terminated C string and `stat` is a
    // zero-initialized out-parameter; libc::statvfs only reads from `c_path`
    // and writes to `stat`, both valid for the duration of the call.
    unsafe {
        let mut stat: libc::statvfs = std::mem::zeroed();
        if libc::statvfs(c_path.as_ptr(), &mut stat) != 0 {
            return Err(std::io::Error::last_os_error().into());
        }
        // f_bfree includes blocks reserved for root; f_bavail is what an
        // unprivileged write can actually use.
        Ok(stat.f_bavail as u64 * stat.f_frsize as u64)
    }
}

/// No capacity probe on this platform; report unbounded space so the guard
/// never gates. A genuinely full volume still fails the write itself.
#[cfg(not(unix))]
pub fn available_bytes(_path: &Path) -> Result<u64> {
    Ok(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn reports_free_space_on_a_real_filesystem() {
        let dir = TempDir::new().unwrap();
        let avail = available_bytes(dir.path()).unwrap();
        assert!(avail > 0);
    }

    #[cfg(unix)]
    #[test]
    fn nonexistent_path_is_an_error() {
        assert!(available_bytes(Path::new("/definitely/not/a/mount")).is_err());
    }
}
