use crate::{
    service::{Loader, LoaderError},
    wire::{SchemaRequest, SchemaResponse},
};
use bytes::Bytes;
use std::{collections::HashMap, sync::Arc};
use tracing::warn;

/// A [`Loader`] backed by a fixed in-memory map.
///
/// The map is frozen once the loader is shared: lookups only read it, so any number of calls
/// can run concurrently without coordination. Lookups match package and version exactly.
///
/// Entries are keyed the way requests are built: an empty version registers the unversioned
/// schema, and a schema registered under an empty package is dropped since no request could
/// ever reach it.
///
/// ```rust
/// use schema_loader_core::{Loader, MemoryLoader, SchemaRequest};
///
/// # async fn run() {
/// let loader = MemoryLoader::new()
///     .with_schema("a", &b"schema a"[..])
///     .with_versioned_schema("a", "2.0.0", &b"schema a v2"[..]);
///
/// let response = loader
///     .get_schema_bytes(SchemaRequest::new("a").unwrap())
///     .await
///     .unwrap();
///
/// assert_eq!(&response.schema()[..], b"schema a");
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    schemas: Arc<HashMap<SchemaRequest, Bytes>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the unversioned schema of `package`, replacing any previous one.
    pub fn with_schema(self, package: impl Into<String>, schema: impl Into<Bytes>) -> Self {
        self.insert(package.into(), None, schema.into())
    }

    /// Registers the schema of `package` at `version`, replacing any previous one.
    pub fn with_versioned_schema(
        self,
        package: impl Into<String>,
        version: impl Into<String>,
        schema: impl Into<Bytes>,
    ) -> Self {
        self.insert(package.into(), Some(version.into()), schema.into())
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    fn insert(mut self, package: String, version: Option<String>, schema: Bytes) -> Self {
        let key = match SchemaRequest::new(package) {
            Ok(request) => match version {
                Some(version) => request.with_version(version),
                None => request,
            },
            Err(err) => {
                warn!(error = %err, "ignoring schema registered without a package");
                return self;
            }
        };

        Arc::make_mut(&mut self.schemas).insert(key, schema);
        self
    }
}

#[tonic::async_trait]
impl Loader for MemoryLoader {
    async fn get_schema_bytes(
        &self,
        request: SchemaRequest,
    ) -> Result<SchemaResponse, LoaderError> {
        match self.schemas.get(&request) {
            // Cloning `Bytes` only bumps a reference count.
            Some(schema) => Ok(SchemaResponse::new(schema.clone())),
            None => Err(LoaderError::NotFound(request)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loader() -> MemoryLoader {
        MemoryLoader::new()
            .with_schema("a", &b"schema a"[..])
            .with_schema("b", &b"schema b"[..])
            .with_versioned_schema("a", "2.0.0", &b"schema a v2"[..])
    }

    #[tokio::test]
    async fn test_known_identifier_returns_registered_bytes() {
        let response = loader()
            .get_schema_bytes(SchemaRequest::new("b").unwrap())
            .await
            .unwrap();

        assert_eq!(&response.schema()[..], b"schema b");
    }

    #[tokio::test]
    async fn test_version_is_matched_exactly() {
        let loader = loader();

        let v2 = SchemaRequest::new("a").unwrap().with_version("2.0.0");
        let response = loader.get_schema_bytes(v2).await.unwrap();
        assert_eq!(&response.schema()[..], b"schema a v2");

        let v3 = SchemaRequest::new("a").unwrap().with_version("3.0.0");
        assert_eq!(
            loader.get_schema_bytes(v3.clone()).await,
            Err(LoaderError::NotFound(v3))
        );
    }

    #[tokio::test]
    async fn test_unknown_identifier_is_not_found() {
        let request = SchemaRequest::new("c").unwrap();

        assert_eq!(
            loader().get_schema_bytes(request.clone()).await,
            Err(LoaderError::NotFound(request))
        );
    }

    #[test]
    fn test_registering_twice_replaces() {
        let loader = MemoryLoader::new()
            .with_schema("a", &b"old"[..])
            .with_schema("a", &b"new"[..]);

        assert_eq!(loader.len(), 1);
    }

    #[tokio::test]
    async fn test_empty_version_registers_the_unversioned_schema() {
        let loader = MemoryLoader::new().with_versioned_schema("a", "", &b"schema a"[..]);

        let unversioned = SchemaRequest::new("a").unwrap();
        let response = loader.get_schema_bytes(unversioned).await.unwrap();
        assert_eq!(&response.schema()[..], b"schema a");

        let empty_version = SchemaRequest::new("a").unwrap().with_version("");
        let response = loader.get_schema_bytes(empty_version).await.unwrap();
        assert_eq!(&response.schema()[..], b"schema a");
    }

    #[test]
    fn test_empty_package_is_not_registered() {
        let loader = MemoryLoader::new()
            .with_schema("", &b"nothing"[..])
            .with_versioned_schema("  ", "1.0.0", &b"nothing"[..]);

        assert!(loader.is_empty());
    }
}
