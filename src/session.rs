//! Session Module
//!
//! The source side of one SCP transfer.
//!
//! ## Responsibilities
//! - Encode and write each directive, then read exactly one reply
//! - Stream file bodies and the trailing acknowledgment byte
//! - Track directory nesting
//! - Refuse further directives once the session is faulted

use std::io::{self, BufReader, Read, Write};

use crate::config::Config;
use crate::entry::FileEntry;
use crate::error::{Result, ScpError};
use crate::protocol::{read_reply, write_directive, write_status, Directive, Reply, Status};
use crate::time::FileTime;

/// Lifecycle of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Handshake consumed; directives may be issued
    Ready,

    /// A fatal-class error was observed. Terminal.
    Faulted,
}

/// The source end of an SCP session
///
/// ## Concurrency Model: Lock-Step
///
/// Every directive is written and flushed, then exactly one reply is read
/// before the call returns. Replies are matched to directives by position
/// only, so nothing is ever pipelined. All operations take `&mut self`;
/// share a session only behind external serialization.
///
/// ## Failure Model
/// - `Remote` (0x01): surfaced, session stays `Ready`
/// - `RemoteFatal`, `ProtocolViolation`, `Io`: surfaced, session `Faulted`
/// - `Logic`: detected locally, nothing written, state unchanged
pub struct Session<W: Write, R: Read> {
    /// Outbound stream to the sink
    writer: W,

    /// Inbound stream from the sink (buffered for line reads)
    reader: BufReader<R>,

    /// Session configuration
    config: Config,

    /// Number of confirmed, not yet closed directories
    depth: usize,

    state: SessionState,
}

impl<W: Write, R: Read> Session<W, R> {
    /// Open a session with the default config
    ///
    /// The first byte on the inbound stream is the sink's reply to the
    /// implicit start of the session; it is consumed here.
    pub fn open(outbound: W, inbound: R) -> Result<Self> {
        Self::open_with_config(outbound, inbound, Config::default())
    }

    /// Open a session with the given config
    pub fn open_with_config(outbound: W, inbound: R, config: Config) -> Result<Self> {
        config.validate()?;

        let mut session = Self {
            writer: outbound,
            reader: BufReader::with_capacity(config.read_buffer_size, inbound),
            config,
            depth: 0,
            state: SessionState::Ready,
        };

        let reply = session.next_reply()?;
        if let Err(e) = reply.into_result() {
            tracing::warn!("Sink rejected the session: {}", e);
            return Err(e);
        }

        tracing::debug!("Session opened");
        Ok(session)
    }

    // =========================================================================
    // Directives
    // =========================================================================

    /// Send the times of the next file or directory directive
    pub fn set_time(&mut self, mtime: FileTime, atime: FileTime) -> Result<()> {
        self.send(&Directive::Time { mtime, atime })
    }

    /// Send times given as raw seconds and microseconds
    pub fn set_time_parts(
        &mut self,
        mtime_seconds: i64,
        mtime_micros: u32,
        atime_seconds: i64,
        atime_micros: u32,
    ) -> Result<()> {
        let mtime = FileTime::new(mtime_seconds, mtime_micros)?;
        let atime = FileTime::new(atime_seconds, atime_micros)?;
        self.set_time(mtime, atime)
    }

    /// Send one file: header, exactly `length` body bytes, acknowledgment
    ///
    /// An error reply to the header aborts before any body byte is sent.
    /// A body that ends early is an I/O failure and faults the session.
    ///
    /// Replies read: the header reply and the reply to the acknowledgment.
    /// With [`Config::body_status_reply`] a third reply is read between the
    /// body and the acknowledgment; the first error wins, but any fatal reply
    /// still faults the session.
    pub fn write_file<B: Read>(
        &mut self,
        mode: u32,
        length: u64,
        name: &str,
        body: B,
    ) -> Result<()> {
        let directive = Directive::File {
            mode,
            length,
            name: name.to_string(),
        };
        directive.validate()?;
        self.ensure_ready()?;

        tracing::debug!("Sending file {:?} ({} bytes, mode {:04o})", name, length, mode);

        let result = self.transfer_file(&directive, length, body);
        self.observe(result)
    }

    /// Enter a directory
    pub fn start_directory(&mut self, mode: u32, name: &str) -> Result<()> {
        self.send(&Directive::StartDirectory {
            mode,
            name: name.to_string(),
        })?;
        self.depth += 1;
        Ok(())
    }

    /// Leave the current directory
    ///
    /// Closing more directories than were opened fails without writing.
    pub fn end_directory(&mut self) -> Result<()> {
        if self.depth == 0 {
            return Err(ScpError::Logic(
                "end_directory called with no open directory".to_string(),
            ));
        }
        self.send(&Directive::EndDirectory)?;
        self.depth -= 1;
        Ok(())
    }

    /// Send a local file, preceded by its times when `preserve_times` is set
    ///
    /// Failing to open the file is a `Source` error raised before anything is
    /// written; the session stays usable.
    pub fn send_entry(&mut self, entry: &FileEntry, preserve_times: bool) -> Result<()> {
        let file = entry.open()?;
        if preserve_times {
            self.set_time(entry.mtime, entry.atime)?;
        }
        self.write_file(entry.mode, entry.length, &entry.name, file)
    }

    /// End the session and hand back the outbound stream
    ///
    /// Dropping the returned stream closes it, which the sink sees as the
    /// end of input. Open directories are a caller error; the stream is
    /// dropped in that case too.
    pub fn finish(mut self) -> Result<W> {
        if self.depth > 0 {
            return Err(ScpError::Logic(format!(
                "session finished with {} unterminated director{}",
                self.depth,
                if self.depth == 1 { "y" } else { "ies" }
            )));
        }
        if self.state == SessionState::Ready {
            self.writer.flush()?;
        }
        tracing::debug!("Session finished");
        Ok(self.writer)
    }

    // =========================================================================
    // State
    // =========================================================================

    /// Current directory nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_faulted(&self) -> bool {
        self.state == SessionState::Faulted
    }

    /// Borrow the outbound stream
    pub fn outbound_ref(&self) -> &W {
        &self.writer
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Write a single-line directive and check its reply
    fn send(&mut self, directive: &Directive) -> Result<()> {
        directive.validate()?;
        self.ensure_ready()?;

        tracing::debug!("Sending {:?}", directive);

        let result = write_directive(&mut self.writer, directive).and_then(|()| self.expect_ok());
        self.observe(result)
    }

    fn transfer_file<B: Read>(&mut self, directive: &Directive, length: u64, body: B) -> Result<()> {
        write_directive(&mut self.writer, directive)?;
        self.expect_ok()?;

        self.copy_body(length, body)?;

        let body_result = if self.config.body_status_reply {
            match self.next_reply()? {
                // No acknowledgment once the sink has given up
                Reply::FatalError(msg) => return Err(ScpError::RemoteFatal(msg)),
                reply => reply.into_result(),
            }
        } else {
            Ok(())
        };

        // The acknowledgment is always OK, even after a non-fatal body error
        let final_result =
            write_status(&mut self.writer, Status::Ok).and_then(|()| self.expect_ok());

        match body_result {
            Err(first) => {
                // The body error is reported, but a later fatal one still ends the session
                if let Err(later) = &final_result {
                    self.fault_if_fatal(later);
                }
                Err(first)
            }
            Ok(()) => final_result,
        }
    }

    fn copy_body<B: Read>(&mut self, length: u64, body: B) -> Result<()> {
        let copied = io::copy(&mut body.take(length), &mut self.writer)?;
        if copied < length {
            return Err(ScpError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!("file body ended after {} of {} bytes", copied, length),
            )));
        }
        self.writer.flush()?;
        Ok(())
    }

    fn next_reply(&mut self) -> Result<Reply> {
        let reply = read_reply(&mut self.reader, self.config.max_reply_len)?;
        tracing::trace!("Received reply {:?}", reply);
        Ok(reply)
    }

    fn expect_ok(&mut self) -> Result<()> {
        self.next_reply()?.into_result()
    }

    fn ensure_ready(&self) -> Result<()> {
        match self.state {
            SessionState::Ready => Ok(()),
            SessionState::Faulted => Err(ScpError::Faulted),
        }
    }

    /// Record the outcome of a wire exchange
    fn observe<T>(&mut self, result: Result<T>) -> Result<T> {
        match &result {
            Err(ScpError::Remote(msg)) => {
                tracing::warn!("Sink reported an error: {}", msg.trim_end());
            }
            Err(e) => self.fault_if_fatal(e),
            Ok(_) => {}
        }
        result
    }

    fn fault_if_fatal(&mut self, error: &ScpError) {
        if error.is_fatal() && self.state == SessionState::Ready {
            tracing::warn!("Session faulted: {}", error);
            self.state = SessionState::Faulted;
        }
    }
}
