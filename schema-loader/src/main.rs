//! # Schema Loader CLI Entry Point
//!
//! The main executable for the schema loader. This file drives the application lifecycle:
//!
//! 1. **Initialization**: Parses command-line arguments using [`cli::Cli`] and sets up logging.
//! 2. **Serve**: Hosts a `DirectoryLoader` behind the gRPC `LoaderServer` until Ctrl-C.
//! 3. **Get**: Connects to a server, performs `GetSchemaBytes` and writes the bytes out.
//!
//! Errors are printed to stderr and turn into a non-zero exit code.

mod cli;
mod logging;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use schema_loader_core::{
    DirectoryLoader, LoaderClient, LoaderError, LoaderServer, SchemaRequest,
    tonic::transport::Server,
};
use std::{
    io::Write,
    net::SocketAddr,
    path::{Path, PathBuf},
    process,
    time::Duration,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let args = Cli::parse();
    logging::init(args.log_format);

    let result = match args.command {
        Commands::Serve { schema_dir, listen } => serve(&schema_dir, listen).await,
        Commands::Get {
            url,
            package,
            version,
            output,
            timeout,
        } => {
            let request = match version {
                Some(version) => package.with_version(version),
                None => package,
            };
            get(&url, request, output, timeout).await
        }
    };

    if let Err(err) = result {
        eprintln!("Error: {err:#}");
        process::exit(1);
    }
}

async fn serve(schema_dir: &Path, listen: SocketAddr) -> anyhow::Result<()> {
    let loader = DirectoryLoader::new(schema_dir)?;

    info!(addr = %listen, schema_dir = %schema_dir.display(), "serving schemas");

    Server::builder()
        .add_service(LoaderServer::new(loader))
        .serve_with_shutdown(listen, shutdown_signal())
        .await
        .with_context(|| format!("Loader server on {listen} failed"))?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "failed to listen for Ctrl-C, shutting down");
    }
}

async fn get(
    url: &str,
    request: SchemaRequest,
    output: Option<PathBuf>,
    timeout: Option<Duration>,
) -> anyhow::Result<()> {
    let client = LoaderClient::connect(url).await.map_err(LoaderError::from)?;

    let mut client = match timeout {
        Some(timeout) => client.with_timeout(timeout),
        None => client,
    };

    let schema = client
        .get_schema_bytes(request.clone())
        .await
        .with_context(|| format!("Failed to load schema '{request}' from {url}"))?
        .into_schema();

    match output {
        Some(path) => {
            tokio::fs::write(&path, &schema)
                .await
                .with_context(|| format!("Failed to write '{}'", path.display()))?;
            info!(
                schema = %request,
                path = %path.display(),
                size_bytes = schema.len(),
                "schema written"
            );
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout
                .write_all(&schema)
                .and_then(|_| stdout.flush())
                .context("Failed to write schema to stdout")?;
        }
    }

    Ok(())
}
