//! Protocol codec
//!
//! Encoding of directives and decoding of replies.
//!
//! ## Wire Format
//!
//! ### Directives (source → sink)
//! ```text
//! T<mtime sec> <mtime usec> <atime sec> <atime usec>\n
//! C<mode %04o> <length> <name>\n   followed by <length> body bytes
//! D<mode %04o> 0 <name>\n
//! E\n
//! ```
//!
//! ### Replies (sink → source)
//! ```text
//! ┌──────────┐
//! │ 0x00 (1) │                      OK
//! ├──────────┼────────────────────┐
//! │ 0x01 (1) │ message ... \n     │ ERROR
//! ├──────────┼────────────────────┤
//! │ 0x02 (1) │ message ... \n     │ FATAL ERROR
//! └──────────┴────────────────────┘
//! ```

use std::io::{self, BufRead, Read, Write};

use bytes::{BufMut, Bytes, BytesMut};

use super::{Directive, Reply, Status};
use crate::error::{Result, ScpError};

/// Default cap on an error message line (64 KB)
pub const DEFAULT_MAX_REPLY_LEN: usize = 64 * 1024;

// =============================================================================
// Directive Encoding
// =============================================================================

/// Render a permission bitmask as the four-digit octal mode field
pub fn encode_mode(mode: u32) -> String {
    format!("{:04o}", mode)
}

/// Encode a directive to bytes
///
/// Does not validate; see [`Directive::validate`].
pub fn encode_directive(directive: &Directive) -> Bytes {
    let cmd_type = directive.directive_type() as u8;

    let fields = match directive {
        Directive::Time { mtime, atime } => format!(
            "{} {} {} {}",
            mtime.seconds, mtime.micros, atime.seconds, atime.micros
        ),
        Directive::File { mode, length, name } => {
            format!("{} {} {}", encode_mode(*mode), length, name)
        }
        // The length field is unused for directories
        Directive::StartDirectory { mode, name } => {
            format!("{} 0 {}", encode_mode(*mode), name)
        }
        Directive::EndDirectory => String::new(),
    };

    let mut line = BytesMut::with_capacity(fields.len() + 2);
    line.put_u8(cmd_type);
    line.put_slice(fields.as_bytes());
    line.put_u8(b'\n');

    line.freeze()
}

/// Write a directive to a stream and flush it
pub fn write_directive<W: Write>(writer: &mut W, directive: &Directive) -> Result<()> {
    let bytes = encode_directive(directive);
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Write a single status byte and flush it
pub fn write_status<W: Write>(writer: &mut W, status: Status) -> Result<()> {
    writer.write_all(&[status as u8])?;
    writer.flush()?;
    Ok(())
}

// =============================================================================
// Reply Decoding
// =============================================================================

/// Read exactly one reply from a stream
///
/// Consumes the status byte and, for error replies, the message line up to
/// and including its `\n`. Nothing past the reply is consumed.
pub fn read_reply<R: BufRead>(reader: &mut R, max_message_len: usize) -> Result<Reply> {
    let mut status_byte = [0u8; 1];
    reader.read_exact(&mut status_byte)?;

    let status = match Status::from_u8(status_byte[0]) {
        Some(status) => status,
        None => {
            return Err(ScpError::ProtocolViolation(format!(
                "Unknown reply type: 0x{:02x}",
                status_byte[0]
            )))
        }
    };

    if status == Status::Ok {
        return Ok(Reply::Ok);
    }

    let limit = max_message_len as u64;
    let mut line = Vec::new();
    let read = reader.by_ref().take(limit).read_until(b'\n', &mut line)?;

    if line.last() != Some(&b'\n') {
        // A full-length read that stops at end of stream is truncation, not an overlong line
        if read as u64 >= limit && !reader.fill_buf()?.is_empty() {
            return Err(ScpError::ProtocolViolation(format!(
                "Reply message exceeds {} bytes",
                max_message_len
            )));
        }
        return Err(ScpError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            format!("stream ended inside reply message after {} bytes", read),
        )));
    }

    let message = String::from_utf8_lossy(&line).into_owned();
    match status {
        Status::Error => Ok(Reply::Error(message)),
        Status::FatalError => Ok(Reply::FatalError(message)),
        Status::Ok => Ok(Reply::Ok),
    }
}

/// Decode one reply from a byte slice
///
/// Returns the reply and the number of bytes it occupied.
pub fn decode_reply(bytes: &[u8]) -> Result<(Reply, usize)> {
    let mut cursor = io::Cursor::new(bytes);
    let reply = read_reply(&mut cursor, bytes.len().max(1))?;
    Ok((reply, cursor.position() as usize))
}
