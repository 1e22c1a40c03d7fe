use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use wallet_persona::{
    analysis::{AnalysisEngine, NarrativeGenerator},
    chains::{ChainClient, EtherscanClient},
    server::{self, AppState},
    storage::{AnalysisStore, SqliteStore},
    Settings,
};

#[derive(Parser)]
#[clap(name = "wallet-persona")]
#[clap(about = "Analyze a wallet's on-chain activity into a persona report", long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a single wallet and print its report
    Analyze {
        /// Wallet address (0x... or ENS name)
        address: String,
    },

    /// Start the HTTP API server
    Serve {
        /// Port to listen on (overrides configuration)
        #[clap(short, long)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = Settings::new().unwrap_or_else(|e| {
        eprintln!("Using default settings ({})", e);
        Settings::default()
    });

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(settings.app.log_level.clone())),
        )
        .init();

    if let Err(e) = settings.validate() {
        error!("Invalid settings: {}", e);
        return Err(anyhow::anyhow!(e));
    }

    let store: Arc<dyn AnalysisStore> = Arc::new(SqliteStore::connect(&settings.database).await?);
    let chain: Arc<dyn ChainClient> = Arc::new(EtherscanClient::new(settings.explorer.clone())?);
    let narrative = NarrativeGenerator::new(settings.narrative.clone())?;
    let narrative_configured = narrative.is_configured();

    let engine = AnalysisEngine::new(
        chain.clone(),
        store.clone(),
        narrative,
        settings.freshness_window(),
    );

    match cli.command {
        Commands::Analyze { address } => {
            info!("Analyzing wallet: {}", address);

            match engine.analyze(&address).await {
                Ok(report) => {
                    println!("\n=== Wallet Persona Report ===");
                    println!("Persona: {}", report.persona);
                    println!("Risk score: {}/100", report.risk_score);
                    println!("Bio: {}", report.bio);
                    println!("\nMetrics:");
                    println!("  Total value: {}", report.metrics.total_value);
                    println!("  Transactions: {}", report.metrics.transactions);
                    println!("  Protocols: {}", report.metrics.protocols);

                    if !report.timeline.is_empty() {
                        println!("\nTimeline:");
                        for event in &report.timeline {
                            match &event.value {
                                Some(value) => {
                                    println!("  {}: {} ({})", event.date, event.event, value)
                                }
                                None => println!("  {}: {}", event.date, event.event),
                            }
                        }
                    }

                    if !report.badges.is_empty() {
                        println!("\nBadges:");
                        for badge in &report.badges {
                            println!("  {}: {}", badge.label, badge.description);
                        }
                    }
                }
                Err(e) => {
                    error!("Failed to analyze wallet: {}", e);
                    return Err(anyhow::anyhow!(e));
                }
            }
        }

        Commands::Serve { port } => {
            let state = Arc::new(AppState {
                engine,
                store,
                chain,
                narrative_configured,
                version: settings.app.version.clone(),
            });

            let host: std::net::IpAddr = settings.api.host.parse()?;
            let addr = SocketAddr::from((host, port.unwrap_or(settings.api.port)));
            server::serve(state, addr).await?;
        }
    }

    Ok(())
}
