//! # CLI
//!
//! This module defines the command-line interface of `schema-loader` using `clap`.
//!
//! It is responsible for parsing user input and performing validation (e.g., rejecting an
//! empty schema identifier before any connection is attempted). Every option can also be
//! provided through a `SCHEMA_LOADER_*` environment variable.
use crate::logging::LogFormat;
use clap::{Parser, Subcommand};
use schema_loader_core::SchemaRequest;
use std::{net::SocketAddr, path::PathBuf, time::Duration};

#[derive(Parser)]
#[command(
    name = "schema-loader",
    version,
    about = "Serve and fetch schema bytes over gRPC"
)]
pub struct Cli {
    /// Log output format (logs go to stderr)
    #[arg(
        long,
        global = true,
        value_enum,
        env = "SCHEMA_LOADER_LOG_FORMAT",
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Serve the schemas of a directory through the Loader service
    ///
    /// An unversioned request for `aws` reads `<DIR>/aws.json`, a request for `aws` at
    /// version `6.0.0` reads `<DIR>/aws@6.0.0.json`.
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// schema-loader serve --schema-dir ./schemas --listen 127.0.0.1:50051
    /// ```
    Serve {
        /// Directory containing the schema files
        #[arg(long, env = "SCHEMA_LOADER_SCHEMA_DIR")]
        schema_dir: PathBuf,

        /// Address to listen on
        #[arg(long, env = "SCHEMA_LOADER_LISTEN", default_value = "127.0.0.1:50051")]
        listen: SocketAddr,
    },

    /// Fetch the bytes of a schema from a Loader server
    ///
    /// ## Examples:
    ///
    /// ```bash
    /// schema-loader get http://localhost:50051 aws --version 6.0.0 --output aws.json
    /// ```
    Get {
        /// The server URL to connect to (e.g. http://localhost:50051)
        url: String,

        /// Package identifier of the schema
        #[arg(value_parser = parse_request)]
        package: SchemaRequest,

        /// Version of the package
        #[arg(long)]
        version: Option<String>,

        /// Write the schema to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Give up after this many seconds
        #[arg(long, env = "SCHEMA_LOADER_TIMEOUT", value_parser = parse_timeout)]
        timeout: Option<Duration>,
    },
}

fn parse_request(value: &str) -> Result<SchemaRequest, String> {
    SchemaRequest::new(value).map_err(|e| e.to_string())
}

fn parse_timeout(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|e| format!("Invalid timeout '{value}': {e}"))?;

    if secs <= 0.0 {
        return Err("Timeout must be greater than zero".to_string());
    }

    Duration::try_from_secs_f64(secs).map_err(|e| format!("Invalid timeout '{value}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_get() {
        let cli = Cli::try_parse_from([
            "schema-loader",
            "get",
            "http://localhost:50051",
            "aws",
            "--version",
            "6.0.0",
            "--timeout",
            "1.5",
        ])
        .unwrap();

        match cli.command {
            Commands::Get {
                url,
                package,
                version,
                output,
                timeout,
            } => {
                assert_eq!(url, "http://localhost:50051");
                assert_eq!(package.package(), "aws");
                assert_eq!(version.as_deref(), Some("6.0.0"));
                assert_eq!(output, None);
                assert_eq!(timeout, Some(Duration::from_millis(1500)));
            }
            Commands::Serve { .. } => panic!("Parsed the wrong subcommand"),
        }
    }

    #[test]
    fn test_empty_package_is_rejected() {
        let result = Cli::try_parse_from(["schema-loader", "get", "http://localhost:50051", ""]);

        assert!(result.is_err());
    }

    #[test]
    fn test_parse_timeout() {
        assert_eq!(parse_timeout("2"), Ok(Duration::from_secs(2)));
        assert!(parse_timeout("0").is_err());
        assert!(parse_timeout("-1").is_err());
        assert!(parse_timeout("soon").is_err());
    }

    #[test]
    fn test_parse_serve() {
        let cli = Cli::try_parse_from([
            "schema-loader",
            "--log-format",
            "json",
            "serve",
            "--schema-dir",
            "schemas",
            "--listen",
            "0.0.0.0:6000",
        ])
        .unwrap();

        assert_eq!(cli.log_format, LogFormat::Json);

        match cli.command {
            Commands::Serve { schema_dir, listen } => {
                assert_eq!(schema_dir, PathBuf::from("schemas"));
                assert_eq!(listen, "0.0.0.0:6000".parse().unwrap());
            }
            Commands::Get { .. } => panic!("Parsed the wrong subcommand"),
        }
    }
}
