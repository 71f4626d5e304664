//! Sink Peer Process
//!
//! Launches the receiving side and wires its pipes into a session.

use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

use crate::config::{Config, PeerConfig};
use crate::error::{Result, ScpError};
use crate::session::Session;

/// A running sink process
pub struct Peer {
    child: Child,

    /// Command line for logging
    description: String,
}

impl Peer {
    /// Build the command that launches the sink
    ///
    /// Locally this is `<program> -t [flags] <target>`; with a host it is
    /// `ssh [-p port] <host> <program> -t [flags] <target>`, the remote part
    /// quoted for the remote shell.
    pub fn command(config: &PeerConfig) -> Command {
        match &config.host {
            None => {
                let mut cmd = Command::new(&config.program);
                cmd.args(config.sink_args());
                cmd
            }
            Some(host) => {
                let mut cmd = Command::new("ssh");
                if let Some(port) = config.port {
                    cmd.arg("-p").arg(port.to_string());
                }
                cmd.arg(host);
                cmd.arg(shell_quote(&config.program));
                cmd.args(config.sink_args().iter().map(|a| shell_quote(a)));
                cmd
            }
        }
    }

    /// Launch the sink with piped stdin/stdout
    pub fn spawn(config: &PeerConfig) -> Result<Self> {
        config.validate()?;

        let mut cmd = Self::command(config);
        let description = describe(&cmd);

        let child = cmd
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| ScpError::Peer(format!("failed to launch `{}`: {}", description, e)))?;

        tracing::debug!("Launched sink `{}` (pid {})", description, child.id());

        Ok(Self { child, description })
    }

    /// Take the sink's pipes and open a session over them
    ///
    /// Can only be done once per process.
    pub fn open_session(&mut self, config: Config) -> Result<Session<ChildStdin, ChildStdout>> {
        let stdin = self.child.stdin.take();
        let stdout = self.child.stdout.take();

        match (stdin, stdout) {
            (Some(stdin), Some(stdout)) => Session::open_with_config(stdin, stdout, config),
            _ => Err(ScpError::Peer(format!(
                "pipes of `{}` were already taken",
                self.description
            ))),
        }
    }

    /// Close the sink's input (if still held) and wait for it to exit
    pub fn wait(mut self) -> Result<()> {
        drop(self.child.stdin.take());

        let status = self.child.wait()?;
        if !status.success() {
            return Err(ScpError::Peer(format!(
                "`{}` exited with {}",
                self.description, status
            )));
        }

        tracing::debug!("Sink `{}` exited cleanly", self.description);
        Ok(())
    }

    /// OS process id of the sink
    pub fn id(&self) -> u32 {
        self.child.id()
    }

    /// The command line the sink was launched with
    pub fn description(&self) -> &str {
        &self.description
    }
}

fn describe(cmd: &Command) -> String {
    let mut parts = vec![cmd.get_program().to_string_lossy().into_owned()];
    parts.extend(cmd.get_args().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}

/// Quote an argument for a POSIX shell
///
/// Plain words pass through unchanged.
pub fn shell_quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,+@%".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}
