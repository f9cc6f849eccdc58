//! # Loader Server
//!
//! Exposes any [`Loader`] as the `schemaloader.v1.Loader` gRPC service.
//!
//! [`LoaderServer`] is a plain `tower` service, so it can be mounted on a
//! `tonic::transport::Server` or handed directly to a [`super::client::LoaderClient`] to run
//! calls in-process (which is what the tests do).
//!
//! ## Request lifecycle
//!
//! 1. The gRPC layer reads the request frame through the passthrough [`FrameCodec`].
//! 2. The frame is decoded with [`wire::decode`]. A malformed frame ends the call with
//!    `InvalidArgument` before the loader is ever invoked.
//! 3. The loader resolves the request; its error (if any) is mapped to a gRPC status.
//! 4. The response is encoded with [`wire::encode`] and written back.
use super::{GET_SCHEMA_BYTES_PATH, Loader, LoaderError, SERVICE_NAME, codec::FrameCodec};
use crate::{
    BoxError,
    wire::{self, SchemaRequest},
};
use bytes::Bytes;
use http_body::Body as HttpBody;
use std::{
    convert::Infallible,
    sync::Arc,
    task::{Context, Poll},
};
use tonic::{
    Status,
    codegen::{BoxFuture, Service},
    server::{Grpc, NamedService, UnaryService},
};
use tracing::{debug, info, warn};

/// gRPC server adapter for a [`Loader`] implementor.
#[derive(Debug)]
pub struct LoaderServer<L> {
    inner: Arc<L>,
}

impl<L: Loader> LoaderServer<L> {
    pub fn new(loader: L) -> Self {
        Self::from_arc(Arc::new(loader))
    }

    /// Creates a server sharing an already reference-counted loader.
    pub fn from_arc(inner: Arc<L>) -> Self {
        Self { inner }
    }
}

impl<L> Clone for LoaderServer<L> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<L> NamedService for LoaderServer<L> {
    const NAME: &'static str = SERVICE_NAME;
}

impl<L, B> Service<http::Request<B>> for LoaderServer<L>
where
    L: Loader,
    B: HttpBody + Send + 'static,
    B::Error: Into<BoxError> + Send + 'static,
{
    type Response = http::Response<tonic::body::Body>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<B>) -> Self::Future {
        if req.uri().path() != GET_SCHEMA_BYTES_PATH {
            debug!(path = req.uri().path(), "unknown method");
            return Box::pin(async move { Ok(unimplemented()) });
        }

        let handler = GetSchemaBytes(Arc::clone(&self.inner));

        Box::pin(async move {
            let mut grpc = Grpc::new(FrameCodec);
            Ok(grpc.unary(handler, req).await)
        })
    }
}

/// Handler for a single `GetSchemaBytes` call.
struct GetSchemaBytes<L>(Arc<L>);

impl<L: Loader> UnaryService<Bytes> for GetSchemaBytes<L> {
    type Response = Bytes;
    type Future = BoxFuture<tonic::Response<Self::Response>, Status>;

    fn call(&mut self, request: tonic::Request<Bytes>) -> Self::Future {
        let loader = Arc::clone(&self.0);

        Box::pin(async move {
            let frame = request.into_inner();

            let request = wire::decode::<SchemaRequest>(&frame).map_err(|source| {
                warn!(error = %source, size_bytes = frame.len(), "rejected malformed request");
                Status::from(LoaderError::malformed_request(source))
            })?;

            debug!(schema = %request, "GetSchemaBytes");

            let schema = request.to_string();

            match loader.get_schema_bytes(request).await {
                Ok(response) => {
                    info!(
                        schema = %schema,
                        size_bytes = response.schema().len(),
                        "served schema"
                    );
                    Ok(tonic::Response::new(wire::encode(&response)))
                }
                Err(err) => {
                    warn!(schema = %schema, error = %err, "GetSchemaBytes failed");
                    Err(err.into())
                }
            }
        })
    }
}

fn unimplemented() -> http::Response<tonic::body::Body> {
    let mut response = http::Response::new(tonic::body::Body::default());
    let headers = response.headers_mut();
    headers.insert(
        tonic::Status::GRPC_STATUS,
        (tonic::Code::Unimplemented as i32).into(),
    );
    headers.insert(
        http::header::CONTENT_TYPE,
        tonic::metadata::GRPC_CONTENT_TYPE,
    );
    response
}
