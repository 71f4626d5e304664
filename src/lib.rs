//! # scpsource
//!
//! The source (sender) role of the legacy SCP wire protocol:
//! - Line-framed directives (`T`, `C`, `D`, `E`) with byte-counted file bodies
//! - Single-byte replies (ok / error / fatal error)
//! - Strict lock-step request/reply discipline
//! - Directory nesting checks
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Caller / Harness                          │
//! │        (Peer process, FileEntry metadata, binaries)          │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      Session                                 │
//! │        (Ready / Faulted, nesting depth, file bodies)         │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  Directive  │          │    Reply    │
//!   │   Encoder   │          │   Decoder   │
//!   └──────┬──────┘          └──────▲──────┘
//!          │                        │
//!          ▼                        │
//!     outbound stream         inbound stream
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod time;
pub mod protocol;
pub mod session;
pub mod entry;
pub mod peer;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{ScpError, Result};
pub use config::{Config, PeerConfig};
pub use entry::FileEntry;
pub use peer::Peer;
pub use protocol::{Directive, Reply};
pub use session::{Session, SessionState};
pub use time::FileTime;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of scpsource
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
