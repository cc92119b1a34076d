// src/main.rs
// calcbook - arithmetic over HTTP with a MongoDB result history and audit log

use anyhow::Result;
use calcbook::{
    config::Config,
    db::{self, Catalog, MemoryCatalog, MongoCatalog},
    web::{self, state::AppState},
};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(name = "calcbook")]
#[command(about = "Arithmetic web app with a MongoDB-backed history")]
#[command(version)]
struct Cli {
    /// MongoDB connection string
    #[arg(long, env = "MONGODB_URI", global = true)]
    mongodb_uri: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the web server (default)
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// Recreate collections, validators and indexes before serving
        #[arg(long)]
        migrate: bool,

        /// Keep everything in process memory instead of MongoDB
        #[arg(long)]
        in_memory: bool,
    },

    /// Drop and recreate both collections with validators and indexes
    Migrate,
}

async fn mongo_catalog(config: &Config) -> Result<MongoCatalog> {
    let database = db::mongo::connect(
        &config.mongodb_uri,
        &config.db_name,
        config.connect_timeout(),
    )
    .await?;
    Ok(MongoCatalog::new(database, config.timeouts()))
}

async fn run_migrate(config: &Config) -> Result<()> {
    let catalog = mongo_catalog(config).await?;
    db::apply_migrations(&catalog).await?;
    info!("Migrations complete");
    Ok(())
}

async fn run_server(config: &Config, migrate: bool, in_memory: bool) -> Result<()> {
    let catalog: Box<dyn Catalog> = if in_memory {
        warn!("Using in-memory storage; results are lost on exit");
        Box::new(MemoryCatalog::new())
    } else {
        Box::new(mongo_catalog(config).await?)
    };

    if migrate || in_memory {
        db::apply_migrations(catalog.as_ref()).await?;
    }

    let state = AppState::from_catalog(catalog.as_ref());
    let app = web::create_router(state);

    let bind_address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    info!("Server listening on http://{}", bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = Config::from_env();
    if let Some(uri) = cli.mongodb_uri {
        config.mongodb_uri = uri;
    }

    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.tracing_level())
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command.unwrap_or(Commands::Serve {
        port: None,
        migrate: false,
        in_memory: false,
    }) {
        Commands::Serve {
            port,
            migrate,
            in_memory,
        } => {
            if let Some(port) = port {
                config.port = port;
            }
            run_server(&config, migrate, in_memory).await
        }
        Commands::Migrate => run_migrate(&config).await,
    }
}
