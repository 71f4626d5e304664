//! Entry metadata
//!
//! Mode, size and times of one local file, ready for a `T` + `C` pair.
//! Only the named file is inspected; directories are never walked.

use std::fs::{self, File, Metadata};
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Result, ScpError};
use crate::protocol::{validate_name, MAX_MODE};
use crate::time::FileTime;

/// A regular file to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Where the body is read from
    pub path: PathBuf,

    /// Name announced to the sink
    pub name: String,

    /// Permission bits (at most `0o7777`)
    pub mode: u32,

    /// Body length in bytes
    pub length: u64,

    pub mtime: FileTime,
    pub atime: FileTime,
}

impl FileEntry {
    /// Read the metadata of a regular file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let metadata = fs::metadata(path).map_err(|e| source_error(path, e))?;

        if !metadata.is_file() {
            return Err(ScpError::Logic(format!(
                "not a regular file: {}",
                path.display()
            )));
        }

        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ScpError::Logic(format!("no usable file name in {}", path.display()))
            })?
            .to_string();
        validate_name(&name)?;

        let modified = metadata.modified().map_err(|e| source_error(path, e))?;
        let mtime = FileTime::from(modified);
        // Some filesystems do not record access times
        let atime = metadata.accessed().map(FileTime::from).unwrap_or(mtime);

        Ok(Self {
            path: path.to_path_buf(),
            name,
            mode: permission_bits(&metadata),
            length: metadata.len(),
            mtime,
            atime,
        })
    }

    /// Announce the file under a different name
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;
        self.name = name;
        Ok(self)
    }

    /// Open the body for reading
    pub fn open(&self) -> Result<File> {
        File::open(&self.path).map_err(|e| source_error(&self.path, e))
    }
}

fn source_error(path: &Path, source: io::Error) -> ScpError {
    ScpError::Source {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(unix)]
fn permission_bits(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode() & MAX_MODE
}

#[cfg(not(unix))]
fn permission_bits(metadata: &Metadata) -> u32 {
    let mode = if metadata.permissions().readonly() { 0o444 } else { 0o644 };
    mode & MAX_MODE
}
