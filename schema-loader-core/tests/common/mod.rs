#![allow(dead_code)]

use schema_loader_core::{
    Loader, LoaderError, MemoryLoader, SchemaRequest, SchemaResponse,
    bytes::Bytes,
    service::codec::FrameCodec,
    tonic::{
        self, Status,
        codegen::{BoxFuture, Service},
        server::{Grpc, UnaryService},
    },
};
use std::{
    convert::Infallible,
    future::{Ready, ready},
    io,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
    task::{Context, Poll},
    time::Duration,
};

/// The `{"a", "b"}` fixture used by most tests.
pub fn ab_loader() -> MemoryLoader {
    MemoryLoader::new()
        .with_schema("a", &br#"{"name":"a","resources":{}}"#[..])
        .with_schema("b", &br#"{"name":"b","functions":{}}"#[..])
}

pub fn request(package: &str) -> SchemaRequest {
    SchemaRequest::new(package).unwrap()
}

/// A loader that always fails with the given error.
pub struct FailingLoader(pub LoaderError);

#[tonic::async_trait]
impl Loader for FailingLoader {
    async fn get_schema_bytes(
        &self,
        _request: SchemaRequest,
    ) -> Result<SchemaResponse, LoaderError> {
        Err(self.0.clone())
    }
}

/// Delegates to the `{"a", "b"}` fixture and counts the calls that reach it.
#[derive(Clone, Default)]
pub struct CountingLoader {
    calls: Arc<AtomicUsize>,
}

impl CountingLoader {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[tonic::async_trait]
impl Loader for CountingLoader {
    async fn get_schema_bytes(
        &self,
        request: SchemaRequest,
    ) -> Result<SchemaResponse, LoaderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ab_loader().get_schema_bytes(request).await
    }
}

/// A loader that takes `delay` before answering.
pub struct SlowLoader {
    pub delay: Duration,
}

#[tonic::async_trait]
impl Loader for SlowLoader {
    async fn get_schema_bytes(
        &self,
        _request: SchemaRequest,
    ) -> Result<SchemaResponse, LoaderError> {
        tokio::time::sleep(self.delay).await;
        Ok(SchemaResponse::new(&b"late"[..]))
    }
}

/// A misbehaving server that sends back whatever frame it received.
#[derive(Clone)]
pub struct EchoFrameServer;

impl Service<http::Request<tonic::body::Body>> for EchoFrameServer {
    type Response = http::Response<tonic::body::Body>;
    type Error = Infallible;
    type Future = BoxFuture<Self::Response, Self::Error>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: http::Request<tonic::body::Body>) -> Self::Future {
        Box::pin(async move {
            let mut grpc = Grpc::new(FrameCodec);
            Ok(grpc.unary(EchoFrame, req).await)
        })
    }
}

struct EchoFrame;

impl UnaryService<Bytes> for EchoFrame {
    type Response = Bytes;
    type Future = Ready<Result<tonic::Response<Bytes>, Status>>;

    fn call(&mut self, request: tonic::Request<Bytes>) -> Self::Future {
        ready(Ok(tonic::Response::new(request.into_inner())))
    }
}

/// A transport whose connection is refused.
#[derive(Clone)]
pub struct RefusedTransport;

impl Service<http::Request<tonic::body::Body>> for RefusedTransport {
    type Response = http::Response<tonic::body::Body>;
    type Error = io::Error;
    type Future = Ready<Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Err(refused()))
    }

    fn call(&mut self, _req: http::Request<tonic::body::Body>) -> Self::Future {
        ready(Err(refused()))
    }
}

fn refused() -> io::Error {
    io::Error::new(io::ErrorKind::ConnectionRefused, "connection refused")
}
