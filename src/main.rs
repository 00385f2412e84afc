use std::sync::Arc;

use bulls_cows::{
    init_logging, BullsCowsEngine, BullsCowsService, BullsCowsStub, ConsoleIo, GameFlow,
    InMemoryTransport, SessionState, Skeleton, TcpTransport, Transport, DEFAULT_HOST,
    DEFAULT_PORT, MAX_INPUT_ATTEMPTS, SERVER_IDLE_TIMEOUT,
};
use clap::{Parser, Subcommand};
use log::{info, warn};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::time::Duration;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play against a remote game server.
    Connect {
        #[arg(long, default_value = DEFAULT_HOST)]
        host: String,
        #[arg(long, default_value_t = DEFAULT_PORT)]
        port: u16,
        #[arg(long, default_value_t = 30, help = "Network timeout per request, in seconds")]
        timeout_secs: u64,
        #[arg(
            long,
            default_value_t = MAX_INPUT_ATTEMPTS,
            help = "Invalid answers accepted before a prompt gives up"
        )]
        max_attempts: usize,
    },
    /// Play against a reference server running inside this process.
    Local {
        #[arg(long, help = "Fix RNG seed for reproducible hidden sequences (e.g., --seed 12345)")]
        seed: Option<u64>,
        #[arg(
            long,
            default_value_t = MAX_INPUT_ATTEMPTS,
            help = "Invalid answers accepted before a prompt gives up"
        )]
        max_attempts: usize,
    },
    /// Host the reference server over TCP.
    Serve {
        #[arg(long, default_value = "0.0.0.0:4000")]
        bind: String,
        #[arg(long, help = "Fix RNG seed for reproducible hidden sequences (e.g., --seed 12345)")]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Connect {
            host,
            port,
            timeout_secs,
            max_attempts,
        } => {
            println!("Connecting to {}:{}...", host, port);
            let transport = TcpTransport::connect_with_timeout(
                (host.as_str(), port),
                Duration::from_secs(timeout_secs),
            )
            .await?;
            play(BullsCowsStub::new(transport), ConsoleIo::new(max_attempts)).await
        }
        Commands::Local { seed, max_attempts } => {
            if let Some(s) = seed {
                println!("Using fixed seed: {} (hidden sequences will be reproducible)", s);
            }
            let (server_transport, client_transport) = InMemoryTransport::pair();
            let server = tokio::spawn(async move {
                let mut skeleton = Skeleton::new(BullsCowsEngine::new(seed), server_transport);
                skeleton.run().await
            });
            let stub = BullsCowsStub::new(client_transport);
            let outcome = play(stub, ConsoleIo::new(max_attempts)).await;
            server.await??;
            outcome
        }
        Commands::Serve { bind, seed } => serve(&bind, seed).await,
    }
}

/// Run one interactive session and close the connection however it ends.
async fn play<T: Transport>(mut stub: BullsCowsStub<T>, io: ConsoleIo) -> anyhow::Result<()> {
    let outcome = match stub.get_game_defaults().await {
        Ok(defaults) => {
            let mut flow = GameFlow::new(stub, io, SessionState::new(defaults));
            let outcome = flow.run().await;
            stub = flow.into_parts().0;
            outcome
        }
        Err(e) => Err(e.into()),
    };
    if let Err(e) = stub.close().await {
        warn!("closing connection: {}", e);
    }
    println!("Connection closed.");
    outcome
}

async fn serve(bind: &str, seed: Option<u64>) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    println!("Bulls and Cows server listening on {}", listener.local_addr()?);
    let engine = Arc::new(Mutex::new(BullsCowsEngine::new(seed)));
    loop {
        let (stream, addr) = listener.accept().await?;
        info!("gamer connected from {}", addr);
        let transport = TcpTransport::with_timeout(stream, SERVER_IDLE_TIMEOUT);
        let mut skeleton = Skeleton::shared(Arc::clone(&engine), transport);
        tokio::spawn(async move {
            if let Err(e) = skeleton.run().await {
                warn!("connection {} ended with an error: {}", addr, e);
            }
            info!("gamer from {} disconnected", addr);
        });
    }
}
