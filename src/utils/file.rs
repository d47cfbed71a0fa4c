//! File reading utilities

use crate::error::{CpustatError, Result};
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, warn};

/// Read a mandatory source in full. Absence is an error the caller must propagate.
pub fn read_source<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    fs::read(path)
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .map_err(|e| CpustatError::unavailable(e, path))
}

/// Read an optional source in full. Absence is a normal outcome, not an error.
pub fn read_optional<P: AsRef<Path>>(path: P) -> Option<String> {
    let path = path.as_ref();
    match fs::read(path) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "optional source unavailable");
            None
        }
    }
}

/// Read first line of a file, trimmed
/// Meant for single-value sysfs nodes like scaling_cur_freq
/// Uses direct syscalls, sysfs attributes fit in one page-sized read
pub fn read_first_line<P: AsRef<Path>>(path: P) -> Result<String> {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let path = path.as_ref();
    let path_cstr = CString::new(path.as_os_str().as_bytes())
        .map_err(|_| CpustatError::malformed(path, "path contains a NUL byte"))?;

    let mut buffer = [0u8; 256];

    // SAFETY: the fd is closed on every path and the buffer outlives the read
    let bytes_read = unsafe {
        let fd = libc::open(path_cstr.as_ptr(), libc::O_RDONLY | libc::O_CLOEXEC);
        if fd < 0 {
            return Err(CpustatError::unavailable(
                std::io::Error::last_os_error(),
                path,
            ));
        }

        let n = libc::read(fd, buffer.as_mut_ptr() as *mut libc::c_void, buffer.len());
        let read_error = std::io::Error::last_os_error();
        libc::close(fd);

        if n < 0 {
            return Err(CpustatError::unavailable(read_error, path));
        }
        n as usize
    };

    let content = String::from_utf8_lossy(&buffer[..bytes_read]);
    Ok(content.lines().next().unwrap_or("").trim().to_string())
}

/// Read a sysfs node holding a plain integer (kHz, ids). None when absent or not numeric.
/// Topology ids can be -1 on some platforms, so callers pick the integer type.
pub fn read_int<T: FromStr, P: AsRef<Path>>(path: P) -> Option<T> {
    let path = path.as_ref();
    let line = match read_first_line(path) {
        Ok(line) => line,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "optional node unavailable");
            return None;
        }
    };

    match line.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(path = %path.display(), value = %line, "ignoring non-numeric node");
            None
        }
    }
}
