use super::{MalformedMessage, REQUEST_TAG, RESPONSE_TAG, WireMessage};
use bytes::Bytes;
use std::fmt;

/// Protobuf bodies carried inside frames.
///
/// Written by hand with `prost` derives; there is no `.proto` compilation step.
pub mod pb {
    use bytes::Bytes;

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct GetSchemaBytesRequest {
        #[prost(string, tag = "1")]
        pub package: String,
        #[prost(string, optional, tag = "2")]
        pub version: Option<String>,
    }

    #[derive(Clone, PartialEq, prost::Message)]
    pub struct GetSchemaBytesResponse {
        #[prost(bytes = "bytes", tag = "1")]
        pub schema: Bytes,
    }
}

/// Errors raised while building a [`SchemaRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidRequest {
    #[error("The schema identifier cannot be empty")]
    EmptyIdentifier,
}

/// Identifies the schema to fetch.
///
/// The package identifier is guaranteed to be non-empty: the only way to obtain a value is
/// through [`SchemaRequest::new`] or by decoding a valid frame.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SchemaRequest {
    package: String,
    version: Option<String>,
}

impl SchemaRequest {
    /// Creates a request for the unversioned schema of `package`.
    ///
    /// # Returns
    ///
    /// * `Ok(SchemaRequest)` - The request, ready to be sent.
    /// * `Err(InvalidRequest::EmptyIdentifier)` - If `package` is empty or only whitespace.
    pub fn new(package: impl Into<String>) -> Result<Self, InvalidRequest> {
        let package = package.into();

        if package.trim().is_empty() {
            return Err(InvalidRequest::EmptyIdentifier);
        }

        Ok(Self {
            package,
            version: None,
        })
    }

    /// Pins the request to a specific version. An empty version means "no version".
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        let version = version.into();
        self.version = (!version.is_empty()).then_some(version);
        self
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }
}

impl fmt::Display for SchemaRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}@{}", self.package, version),
            None => f.write_str(&self.package),
        }
    }
}

impl WireMessage for SchemaRequest {
    const TAG: u8 = REQUEST_TAG;
    const NAME: &'static str = "SchemaRequest";

    type Body = pb::GetSchemaBytesRequest;

    fn to_body(&self) -> Self::Body {
        pb::GetSchemaBytesRequest {
            package: self.package.clone(),
            version: self.version.clone(),
        }
    }

    fn from_body(body: Self::Body) -> Result<Self, MalformedMessage> {
        let request =
            SchemaRequest::new(body.package).map_err(|_| MalformedMessage::EmptyIdentifier)?;

        Ok(match body.version {
            Some(version) => request.with_version(version),
            None => request,
        })
    }
}

/// The opaque, self-contained schema artifact returned by a successful call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaResponse {
    schema: Bytes,
}

impl SchemaResponse {
    pub fn new(schema: impl Into<Bytes>) -> Self {
        Self {
            schema: schema.into(),
        }
    }

    /// The schema bytes, exactly as produced by the loader.
    pub fn schema(&self) -> &Bytes {
        &self.schema
    }

    pub fn into_schema(self) -> Bytes {
        self.schema
    }
}

impl WireMessage for SchemaResponse {
    const TAG: u8 = RESPONSE_TAG;
    const NAME: &'static str = "SchemaResponse";

    type Body = pb::GetSchemaBytesResponse;

    fn to_body(&self) -> Self::Body {
        pb::GetSchemaBytesResponse {
            schema: self.schema.clone(),
        }
    }

    fn from_body(body: Self::Body) -> Result<Self, MalformedMessage> {
        Ok(Self::new(body.schema))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_identifier_is_rejected() {
        assert_eq!(SchemaRequest::new(""), Err(InvalidRequest::EmptyIdentifier));
        assert_eq!(SchemaRequest::new("  "), Err(InvalidRequest::EmptyIdentifier));
    }

    #[test]
    fn test_empty_version_means_unversioned() {
        let request = SchemaRequest::new("aws").unwrap().with_version("");

        assert_eq!(request.version(), None);
        assert_eq!(request.to_string(), "aws");
    }

    #[test]
    fn test_display_includes_version() {
        let request = SchemaRequest::new("aws").unwrap().with_version("6.0.0");

        assert_eq!(request.to_string(), "aws@6.0.0");
    }
}
