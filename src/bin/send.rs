//! scpsource Send Binary
//!
//! Sends local files to an SCP sink.

use clap::Parser;
use scpsource::{Config, FileEntry, Peer, PeerConfig, ScpError};
use tracing_subscriber::{fmt, EnvFilter};

/// Send files with the SCP source protocol
#[derive(Parser, Debug)]
#[command(name = "scpsource-send")]
#[command(about = "Send regular files to an SCP sink (scp -t)")]
#[command(version)]
struct Args {
    /// Destination path on the sink side
    target: String,

    /// Regular files to send (directories are not walked)
    #[arg(required = true)]
    files: Vec<String>,

    /// Run the sink on this host through ssh
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// SSH port
    #[arg(short = 'P', long)]
    port: Option<u16>,

    /// Sink program
    #[arg(long, default_value = "scp")]
    program: String,

    /// Preserve modification and access times
    #[arg(short, long)]
    preserve: bool,

    /// Keep sending the remaining files after a non-fatal sink error
    #[arg(short = 'k', long)]
    keep_going: bool,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,scpsource=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    tracing::info!("scpsource v{}", scpsource::VERSION);

    if let Err(e) = run(&args) {
        tracing::error!("Transfer failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> scpsource::Result<()> {
    let mut builder = PeerConfig::builder()
        .program(&args.program)
        .target(&args.target)
        .preserve_times(args.preserve)
        .target_is_dir(args.files.len() > 1);
    if let Some(host) = &args.host {
        builder = builder.host(host);
    }
    if let Some(port) = args.port {
        builder = builder.port(port);
    }
    let peer_config = builder.build();

    let mut peer = Peer::spawn(&peer_config)?;
    let outcome = send_all(&mut peer, args);
    let exit = peer.wait();

    // The transfer error explains a failed exit better than the exit does
    outcome?;
    exit
}

fn send_all(peer: &mut Peer, args: &Args) -> scpsource::Result<()> {
    let mut session = peer.open_session(Config::default())?;
    let mut failures = 0usize;

    for path in &args.files {
        let result =
            FileEntry::from_path(path).and_then(|entry| session.send_entry(&entry, args.preserve));

        match result {
            Ok(()) => tracing::info!("Sent {}", path),
            Err(e) if !e.is_fatal() && args.keep_going => {
                tracing::warn!("Skipping {}: {}", path, e);
                failures += 1;
            }
            Err(e) => return Err(e),
        }
    }

    session.finish()?;

    if failures > 0 {
        return Err(ScpError::Logic(format!("{} file(s) were not sent", failures)));
    }
    Ok(())
}
