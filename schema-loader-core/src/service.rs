//! # Loader Service Contract
//!
//! The protocol defines exactly one operation:
//!
//! | Method           | Request           | Response           | Streaming |
//! |------------------|-------------------|--------------------|-----------|
//! | `GetSchemaBytes` | [`SchemaRequest`] | [`SchemaResponse`] | none      |
//!
//! The [`Loader`] trait describes the operation once. Whoever can produce schema bytes
//! implements it, [`server::LoaderServer`] exposes any implementor over gRPC, and
//! [`client::LoaderClient`] calls a remote one.
//!
//! Every call is independent: a `Pending` call ends either `Completed` with a
//! [`SchemaResponse`] or `Failed` with a [`LoaderError`], never both. Retrying is left to
//! the caller.
pub mod client;
pub mod codec;
pub mod server;

use crate::wire::{MalformedMessage, SchemaRequest, SchemaResponse};
use std::{fmt, sync::Arc};
use tonic::{Code, Status};

macro_rules! service_name {
    () => {
        "schemaloader.v1.Loader"
    };
}

/// Fully qualified name of the gRPC service.
pub const SERVICE_NAME: &str = service_name!();

/// HTTP/2 path of the `GetSchemaBytes` method.
pub const GET_SCHEMA_BYTES_PATH: &str = concat!("/", service_name!(), "/GetSchemaBytes");

/// The message that failed to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Request,
    Response,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Request => f.write_str("request"),
            Side::Response => f.write_str("response"),
        }
    }
}

/// Terminal outcomes of a failed `GetSchemaBytes` call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoaderError {
    #[error("Schema '{0}' not found")]
    NotFound(SchemaRequest),
    #[error("Malformed {side} message: '{source}'")]
    Malformed {
        side: Side,
        #[source]
        source: MalformedMessage,
    },
    #[error("Loader unavailable: '{0}'")]
    Unavailable(String),
    #[error("Internal loader error: '{0}'")]
    Internal(String),
}

impl LoaderError {
    pub fn malformed_request(source: MalformedMessage) -> Self {
        Self::Malformed {
            side: Side::Request,
            source,
        }
    }

    pub fn malformed_response(source: MalformedMessage) -> Self {
        Self::Malformed {
            side: Side::Response,
            source,
        }
    }

    /// Maps a gRPC status returned for `request` back into the error taxonomy.
    ///
    /// Transport level codes (`Unavailable`, `DeadlineExceeded`, `Cancelled`) become
    /// [`LoaderError::Unavailable`]. `InvalidArgument` means the server could not decode the
    /// request frame. Anything else the server did not expect is [`LoaderError::Internal`].
    pub fn from_status(status: Status, request: &SchemaRequest) -> Self {
        let message = status.message().to_string();

        match status.code() {
            Code::NotFound => Self::NotFound(request.clone()),
            Code::InvalidArgument => Self::malformed_request(MalformedMessage::Rejected(message)),
            Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => {
                Self::Unavailable(message)
            }
            _ => Self::Internal(message),
        }
    }
}

impl From<LoaderError> for Status {
    fn from(err: LoaderError) -> Self {
        let message = err.to_string();

        match err {
            LoaderError::NotFound(_) => Status::not_found(message),
            LoaderError::Malformed {
                side: Side::Request,
                ..
            } => Status::invalid_argument(message),
            // A server producing a response it cannot encode is its own fault.
            LoaderError::Malformed {
                side: Side::Response,
                ..
            } => Status::internal(message),
            LoaderError::Unavailable(_) => Status::unavailable(message),
            LoaderError::Internal(_) => Status::internal(message),
        }
    }
}

/// The `GetSchemaBytes` operation.
///
/// Implementors must tolerate concurrent invocations and keep no per-call state between
/// them. A call may be dropped mid-flight (timeout, cancelled RPC); that must not leave
/// anything shared in a broken state.
#[tonic::async_trait]
pub trait Loader: Send + Sync + 'static {
    /// Resolves `request` into the complete schema bytes.
    async fn get_schema_bytes(
        &self,
        request: SchemaRequest,
    ) -> Result<SchemaResponse, LoaderError>;
}

#[tonic::async_trait]
impl<L: Loader> Loader for Arc<L> {
    async fn get_schema_bytes(
        &self,
        request: SchemaRequest,
    ) -> Result<SchemaResponse, LoaderError> {
        (**self).get_schema_bytes(request).await
    }
}
