//! Configuration for scpsource
//!
//! Centralized configuration with sensible defaults.

use crate::error::{Result, ScpError};
use crate::protocol::DEFAULT_MAX_REPLY_LEN;

/// Session tuning
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Reply Configuration
    // -------------------------------------------------------------------------
    /// Longest error/fatal message (in bytes, terminator included) accepted
    /// from the peer before the reply is treated as a protocol violation
    pub max_reply_len: usize,

    /// Read a peer status between the file body and the acknowledgment byte.
    ///
    /// OpenSSH sinks only answer after the acknowledgment, so this stays off
    /// unless the peer is known to reply early.
    pub body_status_reply: bool,

    // -------------------------------------------------------------------------
    // I/O Configuration
    // -------------------------------------------------------------------------
    /// Capacity of the buffered reader wrapped around the inbound stream
    pub read_buffer_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_reply_len: DEFAULT_MAX_REPLY_LEN,
            body_status_reply: false,
            read_buffer_size: 8 * 1024,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Reject limits no session can work with
    pub fn validate(&self) -> Result<()> {
        // Even an empty message needs room for its terminator
        if self.max_reply_len == 0 {
            return Err(ScpError::Config("max_reply_len must be at least 1".to_string()));
        }
        if self.read_buffer_size == 0 {
            return Err(ScpError::Config("read_buffer_size must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the longest accepted reply message (in bytes)
    pub fn max_reply_len(mut self, len: usize) -> Self {
        self.config.max_reply_len = len;
        self
    }

    /// Read a peer status after each file body, before the acknowledgment
    pub fn body_status_reply(mut self, enabled: bool) -> Self {
        self.config.body_status_reply = enabled;
        self
    }

    /// Set the inbound read buffer capacity (in bytes)
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.config.read_buffer_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

/// How to launch the sink peer process
#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Sink program, run as `<program> -t ...`
    pub program: String,

    /// Destination path handed to the sink
    pub target: String,

    /// Remote host; the sink is launched through `ssh` when set
    pub host: Option<String>,

    /// SSH port (only used with `host`)
    pub port: Option<u16>,

    /// Ask the sink to apply `T` directives (`-p`)
    pub preserve_times: bool,

    /// Allow directory directives (`-r`)
    pub recursive: bool,

    /// Require the target to be a directory (`-d`)
    pub target_is_dir: bool,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self {
            program: "scp".to_string(),
            target: ".".to_string(),
            host: None,
            port: None,
            preserve_times: false,
            recursive: false,
            target_is_dir: false,
        }
    }
}

impl PeerConfig {
    /// Create a new peer config builder
    pub fn builder() -> PeerConfigBuilder {
        PeerConfigBuilder::default()
    }

    /// Check that the config can produce a runnable command line
    pub fn validate(&self) -> Result<()> {
        if self.program.trim().is_empty() {
            return Err(ScpError::Config("sink program must not be empty".to_string()));
        }
        if self.target.is_empty() {
            return Err(ScpError::Config("target path must not be empty".to_string()));
        }
        if let Some(host) = &self.host {
            if host.trim().is_empty() {
                return Err(ScpError::Config("host must not be empty".to_string()));
            }
        }
        if self.port.is_some() && self.host.is_none() {
            return Err(ScpError::Config("port given without a host".to_string()));
        }
        Ok(())
    }

    /// Arguments passed to the sink program itself
    pub fn sink_args(&self) -> Vec<String> {
        let mut args = vec!["-t".to_string()];
        if self.preserve_times {
            args.push("-p".to_string());
        }
        if self.recursive {
            args.push("-r".to_string());
        }
        if self.target_is_dir {
            args.push("-d".to_string());
        }
        args.push(self.target.clone());
        args
    }
}

/// Builder for PeerConfig
#[derive(Default)]
pub struct PeerConfigBuilder {
    config: PeerConfig,
}

impl PeerConfigBuilder {
    /// Set the sink program
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.config.program = program.into();
        self
    }

    /// Set the destination path
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.config.target = target.into();
        self
    }

    /// Launch the sink on a remote host through ssh
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = Some(host.into());
        self
    }

    /// Set the ssh port
    pub fn port(mut self, port: u16) -> Self {
        self.config.port = Some(port);
        self
    }

    /// Ask the sink to preserve times
    pub fn preserve_times(mut self, enabled: bool) -> Self {
        self.config.preserve_times = enabled;
        self
    }

    /// Allow directory directives
    pub fn recursive(mut self, enabled: bool) -> Self {
        self.config.recursive = enabled;
        self
    }

    /// Require the target to be a directory
    pub fn target_is_dir(mut self, enabled: bool) -> Self {
        self.config.target_is_dir = enabled;
        self
    }

    pub fn build(self) -> PeerConfig {
        self.config
    }
}
