mod game;
mod input;
mod network;
mod rendering;
mod sound;

use clap::Parser;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// WebSocket endpoint of the game server
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8080/game")]
    server: String,

    /// Simulation/render period in milliseconds
    #[arg(short = 't', long, default_value = "100")]
    tick_ms: u64,

    /// Canvas width in pixels
    #[arg(short = 'w', long, default_value = "800")]
    width: u32,

    /// Canvas height in pixels (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "600")]
    height: u32,

    /// Tile size in pixels; grid bounds are canvas size over tile size
    #[arg(long, default_value = "20")]
    tile_size: u32,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    info!("Tick period: {}ms", args.tick_ms);
    info!("Controls: arrow keys to steer");

    // A collision ends the session outright; each pass builds a fresh one
    // (new connection, new state) instead of patching up the old.
    loop {
        let mut client = network::Client::new(
            &args.server,
            args.tick_ms,
            args.width,
            args.height,
            args.tile_size,
        )
        .await?;

        client.run().await?;

        info!("Restarting session...");
    }
}
