//! Protocol Module
//!
//! Defines the SCP source/sink wire protocol.
//!
//! ## Directive Format
//! Every directive is one ASCII line: a type byte, space-separated fields,
//! and a `\n` terminator. A file directive is followed by its raw body.
//!
//! ### Directives
//! - `T`: times of the next entry - mtime sec, mtime usec, atime sec, atime usec
//! - `C`: file - mode, length, name
//! - `D`: start directory - mode, literal 0, name
//! - `E`: end directory - no fields
//!
//! ## Reply Format
//! A single status byte; error statuses carry a `\n`-terminated message.
//!
//! ### Status Codes
//! - 0x00: OK
//! - 0x01: ERROR (directive failed, sink still usable)
//! - 0x02: FATAL ERROR (sink abandons the session)

mod directive;
mod reply;
mod codec;

pub use directive::{validate_mode, validate_name, Directive, DirectiveType, MAX_MODE};
pub use reply::{Reply, Status};
pub use codec::{
    decode_reply, encode_directive, encode_mode, read_reply, write_directive, write_status,
    DEFAULT_MAX_REPLY_LEN,
};
