//! Reply definitions
//!
//! Represents the sink's answer to each directive.

use crate::error::{Result, ScpError};

/// Reply status bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Status {
    Ok = 0x00,
    Error = 0x01,
    FatalError = 0x02,
}

impl Status {
    /// Map a wire byte to a status, `None` for anything unknown
    pub fn from_u8(b: u8) -> Option<Self> {
        match b {
            0x00 => Some(Status::Ok),
            0x01 => Some(Status::Error),
            0x02 => Some(Status::FatalError),
            _ => None,
        }
    }
}

/// A decoded reply
///
/// Messages keep their trailing `\n` exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    Ok,
    Error(String),
    FatalError(String),
}

impl Reply {
    /// Get the status of this reply
    pub fn status(&self) -> Status {
        match self {
            Reply::Ok => Status::Ok,
            Reply::Error(_) => Status::Error,
            Reply::FatalError(_) => Status::FatalError,
        }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Reply::Ok)
    }

    /// Turn a non-ok reply into the matching remote error
    pub fn into_result(self) -> Result<()> {
        match self {
            Reply::Ok => Ok(()),
            Reply::Error(msg) => Err(ScpError::Remote(msg)),
            Reply::FatalError(msg) => Err(ScpError::RemoteFatal(msg)),
        }
    }
}
