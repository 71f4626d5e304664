//! scpsource Demo Binary
//!
//! Replays a fixed tree against a local `scp -t`:
//!
//! ```text
//! test1            0644  "content1\n"
//! test2/           0755
//! test2/sub/       0750
//! test2/sub/test2  0604  (empty)
//! ```

use std::io::Cursor;

use clap::Parser;
use scpsource::{Config, FileTime, Peer, PeerConfig, Session};
use tracing_subscriber::{fmt, EnvFilter};

/// Demo of the SCP source protocol
#[derive(Parser, Debug)]
#[command(name = "scpsource-demo")]
#[command(about = "Send a small fixed tree to a local SCP sink")]
#[command(version)]
struct Args {
    /// Destination directory
    #[arg(short, long, default_value = "/tmp")]
    target: String,

    /// Sink program
    #[arg(long, default_value = "scp")]
    program: String,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scpsource=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let peer_config = PeerConfig::builder()
        .program(&args.program)
        .target(&args.target)
        .preserve_times(true)
        .recursive(true)
        .build();

    let mut peer = match Peer::spawn(&peer_config) {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Failed to launch sink: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = peer
        .open_session(Config::default())
        .and_then(|mut session| {
            send_tree(&mut session)?;
            session.finish().map(drop)
        });
    let exit = peer.wait();

    if let Err(e) = outcome.and(exit) {
        tracing::error!("Demo failed: {}", e);
        std::process::exit(1);
    }

    tracing::info!("Demo tree sent to {}", args.target);
}

fn send_tree<W: std::io::Write, R: std::io::Read>(
    session: &mut Session<W, R>,
) -> scpsource::Result<()> {
    // 2006-01-02 15:04:05.678901 and 2018-08-31 23:59:58.999999 UTC
    session.set_time(
        FileTime::from_parts_nanos(1_136_214_245, 678_901_000),
        FileTime::from_parts_nanos(1_535_759_998, 999_999_000),
    )?;

    let content = b"content1\n";
    session.write_file(0o644, content.len() as u64, "test1", Cursor::new(content))?;

    session.start_directory(0o755, "test2")?;
    session.start_directory(0o750, "sub")?;
    session.write_file(0o604, 0, "test2", Cursor::new(b""))?;
    session.end_directory()?;
    session.end_directory()?;

    Ok(())
}
