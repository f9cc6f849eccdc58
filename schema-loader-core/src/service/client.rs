//! # Loader Client
//!
//! Calls `GetSchemaBytes` on a remote [`super::Loader`].
//!
//! The client wraps a `tonic::client::Grpc` over any `GrpcService`: a real
//! `tonic::transport::Channel` in production, or a [`super::server::LoaderServer`] directly
//! when running in-process.
//!
//! ## How it works
//!
//! 1. The [`SchemaRequest`] is encoded into a frame with [`wire::encode`].
//! 2. The frame travels through the passthrough [`FrameCodec`].
//! 3. A non-OK status is mapped back through [`LoaderError::from_status`].
//! 4. The response frame is decoded with [`wire::decode`]; a failure there is a
//!    [`LoaderError::Malformed`] on the [`super::Side::Response`] side.
//!
//! Cloning a client is cheap and clones share the underlying channel, so concurrent calls
//! are made by cloning.
use super::{GET_SCHEMA_BYTES_PATH, LoaderError, codec::FrameCodec};
use crate::{
    BoxError,
    wire::{self, SchemaRequest, SchemaResponse},
};
use http::uri::PathAndQuery;
use http_body::Body as HttpBody;
use std::time::Duration;
use tonic::{
    client::{Grpc, GrpcService},
    transport::{Channel, Endpoint},
};
use tracing::debug;

/// Errors that can occur when connecting to a Loader server.
#[derive(Debug, thiserror::Error)]
pub enum ClientConnectError {
    #[error("Invalid URL '{0}': {1}")]
    InvalidUrl(String, #[source] tonic::transport::Error),
    #[error("Failed to connect to '{0}': {1}")]
    ConnectionFailed(String, #[source] tonic::transport::Error),
}

impl From<ClientConnectError> for LoaderError {
    fn from(err: ClientConnectError) -> Self {
        LoaderError::Unavailable(err.to_string())
    }
}

/// A client for the `schemaloader.v1.Loader` service.
#[derive(Debug, Clone)]
pub struct LoaderClient<S = Channel> {
    grpc: Grpc<S>,
    timeout: Option<Duration>,
}

impl LoaderClient<Channel> {
    /// Connects to a Loader server.
    ///
    /// # Arguments
    ///
    /// * `addr` - The server URI (e.g., `http://localhost:50051`).
    ///
    /// # Returns
    ///
    /// * `Ok(LoaderClient)` - The connected client.
    /// * `Err(ClientConnectError)` - If the URL is invalid or connection fails.
    pub async fn connect(addr: &str) -> Result<Self, ClientConnectError> {
        let endpoint = Endpoint::new(addr.to_string())
            .map_err(|e| ClientConnectError::InvalidUrl(addr.to_string(), e))?;

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| ClientConnectError::ConnectionFailed(addr.to_string(), e))?;

        Ok(Self::new(channel))
    }
}

impl<S> LoaderClient<S>
where
    S: GrpcService<tonic::body::Body>,
    S::Error: Into<BoxError>,
    S::ResponseBody: HttpBody<Data = tonic::codegen::Bytes> + Send + 'static,
    <S::ResponseBody as HttpBody>::Error: Into<BoxError> + Send,
{
    pub fn new(service: S) -> Self {
        Self {
            grpc: Grpc::new(service),
            timeout: None,
        }
    }

    /// Bounds every call made by this client. A call exceeding `timeout` fails with
    /// [`LoaderError::Unavailable`].
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Performs the unary `GetSchemaBytes` call.
    ///
    /// # Returns
    ///
    /// * `Ok(SchemaResponse)` - The complete schema bytes.
    /// * `Err(LoaderError)` - The call failed; see [`LoaderError`] for the possible reasons.
    pub async fn get_schema_bytes(
        &mut self,
        request: SchemaRequest,
    ) -> Result<SchemaResponse, LoaderError> {
        let Some(limit) = self.timeout else {
            return self.call(&request).await;
        };

        match tokio::time::timeout(limit, self.call(&request)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(schema = %request, timeout = ?limit, "GetSchemaBytes timed out");
                Err(LoaderError::Unavailable(format!(
                    "GetSchemaBytes for '{request}' timed out after {limit:?}"
                )))
            }
        }
    }

    async fn call(&mut self, request: &SchemaRequest) -> Result<SchemaResponse, LoaderError> {
        self.grpc.ready().await.map_err(|e| {
            let e: BoxError = e.into();
            LoaderError::Unavailable(format!("The client was not ready: '{e}'"))
        })?;

        let path = PathAndQuery::from_static(GET_SCHEMA_BYTES_PATH);
        let frame = wire::encode(request);

        let response = self
            .grpc
            .unary(tonic::Request::new(frame), path, FrameCodec)
            .await
            .map_err(|status| {
                debug!(
                    schema = %request,
                    code = ?status.code(),
                    "GetSchemaBytes returned an error status"
                );
                LoaderError::from_status(status, request)
            })?;

        wire::decode::<SchemaResponse>(&response.into_inner())
            .map_err(LoaderError::malformed_response)
    }
}
