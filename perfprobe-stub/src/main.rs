use clap::Parser;
use perfprobe_stub::{init_logging, Server, StubConfig, DEFAULT_PORT};
use std::net::SocketAddr;
use std::num::NonZeroU64;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "perfprobe-stub", about = "Stub catalogue API for exercising perfprobe")]
struct Args {
    /// Port to listen on (127.0.0.1).
    #[arg(long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Fixed delay added to every request (ms)
    #[arg(long, default_value_t = 0)]
    latency_ms: u64,

    /// Upper bound of a random extra delay per request (ms)
    #[arg(long, default_value_t = 0)]
    jitter_ms: u64,

    /// Answer every N-th request with 503
    #[arg(long)]
    fail_every: Option<NonZeroU64>,

    /// Log every admitted request
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = StubConfig {
        address: SocketAddr::from(([127, 0, 0, 1], args.port)),
        latency: Duration::from_millis(args.latency_ms),
        jitter_ms: args.jitter_ms,
        fail_every: args.fail_every,
    };

    let (ready_tx, ready_rx) = tokio::sync::oneshot::channel();

    tokio::spawn(async move {
        if let Ok(addr) = ready_rx.await {
            tracing::info!(%addr, "listening");
        }
    });

    Server::new(config).run(ready_tx).await?;
    Ok(())
}
