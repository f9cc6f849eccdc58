//! # Schema Loader Core
//!
//! `schema-loader-core` implements a small remote schema-loading protocol: a caller asks a
//! provider process for the serialized bytes of a schema, identified by package name (and
//! optionally a version), instead of reading the schema from a local file.
//!
//! ## Key Components
//!
//! * **[`wire`]:** The message types ([`SchemaRequest`], [`SchemaResponse`]) and the pure
//!   functions that turn them into tagged binary frames and back.
//! * **[`Loader`]:** The service contract. A single operation, `GetSchemaBytes`, described as
//!   an async trait instead of generated client/server stubs.
//! * **[`LoaderServer`] & [`LoaderClient`]:** The gRPC adapters. The server exposes any
//!   [`Loader`] under `schemaloader.v1.Loader`; the client calls it and maps gRPC statuses
//!   back into [`LoaderError`].
//! * **[`MemoryLoader`] & [`DirectoryLoader`]:** Two implementors of the contract. The former
//!   is an in-memory fake used for conformance testing, the latter serves `.json` files
//!   from a directory.
//!
//! ## Example
//!
//! ```rust,no_run
//! use schema_loader_core::{LoaderClient, SchemaRequest};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let mut client = LoaderClient::connect("http://localhost:50051").await?;
//! let request = SchemaRequest::new("aws")?.with_version("6.0.0");
//! let response = client.get_schema_bytes(request).await?;
//! println!("{} bytes", response.schema().len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports `bytes`, `prost` and `tonic` to ensure that consumers
//! use compatible versions of these underlying dependencies.
pub mod service;
pub mod source;
pub mod wire;

pub use service::{
    Loader, LoaderError, Side,
    client::{ClientConnectError, LoaderClient},
    server::LoaderServer,
};
pub use source::{DirectoryLoader, DirectoryLoaderError, MemoryLoader};
pub use wire::{InvalidRequest, MalformedMessage, SchemaRequest, SchemaResponse};

// Re-exports
pub use bytes;
pub use prost;
pub use tonic;

/// Type alias for the standard boxed error used in generic bounds.
type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;
