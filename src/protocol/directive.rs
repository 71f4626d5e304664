//! Directive definitions
//!
//! Represents the lines the source sends to the sink.

use crate::error::{Result, ScpError};
use crate::time::FileTime;

/// Highest permission bitmask the mode field can carry
pub const MAX_MODE: u32 = 0o7777;

/// Directive types, keyed by their leading wire byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum DirectiveType {
    Time = b'T',
    File = b'C',
    StartDirectory = b'D',
    EndDirectory = b'E',
}

/// A directive to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Modification and access time of the next file or directory
    Time { mtime: FileTime, atime: FileTime },

    /// File header; `length` body bytes follow
    File { mode: u32, length: u64, name: String },

    /// Enter a directory
    StartDirectory { mode: u32, name: String },

    /// Leave the current directory
    EndDirectory,
}

impl Directive {
    /// Get the directive type
    pub fn directive_type(&self) -> DirectiveType {
        match self {
            Directive::Time { .. } => DirectiveType::Time,
            Directive::File { .. } => DirectiveType::File,
            Directive::StartDirectory { .. } => DirectiveType::StartDirectory,
            Directive::EndDirectory => DirectiveType::EndDirectory,
        }
    }

    /// Reject directives that cannot be framed or that every sink refuses
    pub fn validate(&self) -> Result<()> {
        match self {
            Directive::Time { mtime, atime } => {
                validate_time(mtime)?;
                validate_time(atime)
            }
            Directive::File { mode, name, .. } | Directive::StartDirectory { mode, name } => {
                validate_mode(*mode)?;
                validate_name(name)
            }
            Directive::EndDirectory => Ok(()),
        }
    }
}

fn validate_time(time: &FileTime) -> Result<()> {
    if time.micros >= 1_000_000 {
        return Err(ScpError::Logic(format!(
            "microseconds out of range: {}",
            time.micros
        )));
    }
    Ok(())
}

/// Modes above `0o7777` do not fit the four-digit field
pub fn validate_mode(mode: u32) -> Result<()> {
    if mode > MAX_MODE {
        return Err(ScpError::Logic(format!(
            "mode {:o} exceeds {:o}",
            mode, MAX_MODE
        )));
    }
    Ok(())
}

/// Entry names are a single path component on one line
pub fn validate_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(ScpError::Logic("entry name must not be empty".to_string()));
    }
    if name == "." || name == ".." {
        return Err(ScpError::Logic(format!("invalid entry name: {:?}", name)));
    }
    if name.contains('/') {
        return Err(ScpError::Logic(format!(
            "entry name must not contain '/': {:?}",
            name
        )));
    }
    if name.contains('\n') {
        return Err(ScpError::Logic(format!(
            "entry name must not contain a newline: {:?}",
            name
        )));
    }
    Ok(())
}
