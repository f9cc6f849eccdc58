use crate::{
    service::{Loader, LoaderError},
    wire::{SchemaRequest, SchemaResponse},
};
use std::{
    io,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Errors raised when opening a schema directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryLoaderError {
    #[error("Schema directory '{}' is not accessible: '{source}'", .path.display())]
    Inaccessible {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Schema path '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// A [`Loader`] serving schema files from a directory.
///
/// File layout:
///
/// * unversioned request for `aws` -> `<root>/aws.json`
/// * request for `aws` at `6.0.0` -> `<root>/aws@6.0.0.json`
///
/// `@` is reserved as the version separator, so no two requests share a file. Identifiers
/// containing it, or that could escape the root (path separators, `..`, NUL), are reported
/// as [`LoaderError::NotFound`] without touching the filesystem.
#[derive(Debug, Clone)]
pub struct DirectoryLoader {
    root: PathBuf,
}

impl DirectoryLoader {
    /// Opens `root`, which must be an existing directory.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, DirectoryLoaderError> {
        let root = root.into();

        let metadata = std::fs::metadata(&root).map_err(|source| {
            DirectoryLoaderError::Inaccessible {
                path: root.clone(),
                source,
            }
        })?;

        if !metadata.is_dir() {
            return Err(DirectoryLoaderError::NotADirectory(root));
        }

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the file a request resolves to, or `None` if the identifier is not a safe
    /// file name component.
    pub fn schema_path(&self, request: &SchemaRequest) -> Option<PathBuf> {
        let package = request.package();

        if !is_file_name_component(package) {
            return None;
        }

        let file_name = match request.version() {
            Some(version) if is_file_name_component(version) => {
                format!("{package}@{version}.json")
            }
            Some(_) => return None,
            None => format!("{package}.json"),
        };

        Some(self.root.join(file_name))
    }
}

#[tonic::async_trait]
impl Loader for DirectoryLoader {
    async fn get_schema_bytes(
        &self,
        request: SchemaRequest,
    ) -> Result<SchemaResponse, LoaderError> {
        let Some(path) = self.schema_path(&request) else {
            debug!(schema = %request, "identifier is not a valid file name");
            return Err(LoaderError::NotFound(request));
        };

        debug!(schema = %request, path = %path.display(), "reading schema file");

        match tokio::fs::read(&path).await {
            Ok(schema) => Ok(SchemaResponse::new(schema)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                Err(LoaderError::NotFound(request))
            }
            Err(err) => Err(LoaderError::Internal(format!(
                "Failed to read '{}': {err}",
                path.display()
            ))),
        }
    }
}

fn is_file_name_component(value: &str) -> bool {
    !value.is_empty() && !value.contains(['/', '\\', '\0', '@']) && !value.contains("..")
}
