//! # Wire Codec
//!
//! Pure, side-effect free conversion of [`SchemaRequest`] and [`SchemaResponse`] to and from
//! bytes. Nothing in here knows about the transport, so every rule can be exercised on plain
//! byte slices.
//!
//! ## Frame layout
//!
//! ```text
//! +-----+----------------+------------------+
//! | tag | length(varint) | protobuf body    |
//! +-----+----------------+------------------+
//!   1 B      1..10 B         `length` bytes
//! ```
//!
//! * **tag**: [`REQUEST_TAG`] or [`RESPONSE_TAG`]. The decoder checks it before it looks at
//!   anything else, so a response frame is never interpreted as a request (and vice versa).
//! * **length**: the exact number of body bytes that follow. A frame cut short at a protobuf
//!   field boundary, or carrying trailing garbage, is rejected instead of being decoded into a
//!   partially populated message.
//! * **body**: the protobuf encoding of [`pb::GetSchemaBytesRequest`] or
//!   [`pb::GetSchemaBytesResponse`].
mod messages;

pub use messages::{InvalidRequest, SchemaRequest, SchemaResponse, pb};

use bytes::{Buf, BufMut, Bytes, BytesMut};
use prost::Message;

/// Type tag of a [`SchemaRequest`] frame.
pub const REQUEST_TAG: u8 = 0x01;
/// Type tag of a [`SchemaResponse`] frame.
pub const RESPONSE_TAG: u8 = 0x02;

/// Reasons a byte sequence could not be turned into a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedMessage {
    #[error("Empty frame, expected a {0} type tag")]
    Empty(&'static str),
    #[error("Unexpected type tag {found:#04x}, expected {expected:#04x} ({name})")]
    UnexpectedTag {
        name: &'static str,
        expected: u8,
        found: u8,
    },
    #[error("Frame length prefix is missing or truncated: '{0}'")]
    InvalidLength(#[source] prost::DecodeError),
    #[error("Frame declares {declared} body bytes but carries {actual}")]
    LengthMismatch { declared: u64, actual: usize },
    #[error("Invalid {name} body: '{source}'")]
    Body {
        name: &'static str,
        #[source]
        source: prost::DecodeError,
    },
    #[error("Schema request carries an empty package identifier")]
    EmptyIdentifier,
    /// The remote side could not decode what we sent; only the message survives the trip.
    #[error("Rejected by the remote side: '{0}'")]
    Rejected(String),
}

/// A message that can travel inside a frame.
pub trait WireMessage: Sized {
    /// Discriminant written in front of the body.
    const TAG: u8;
    /// Human readable name, used in error messages.
    const NAME: &'static str;
    /// Protobuf representation of the message body.
    type Body: Message + Default;

    fn to_body(&self) -> Self::Body;

    fn from_body(body: Self::Body) -> Result<Self, MalformedMessage>;
}

/// Encodes a message into a frame.
///
/// The output only depends on the message value: protobuf fields are always written in tag
/// order and absent optional fields are skipped.
pub fn encode<M: WireMessage>(message: &M) -> Bytes {
    let body = message.to_body().encode_length_delimited_to_vec();

    let mut frame = BytesMut::with_capacity(1 + body.len());
    frame.put_u8(M::TAG);
    frame.put_slice(&body);
    frame.freeze()
}

/// Decodes a frame into a message of type `M`.
///
/// # Returns
///
/// * `Ok(M)` - The frame carried a complete, valid `M`.
/// * `Err(MalformedMessage)` - The frame was empty, tagged for another message, truncated,
///   padded, or its body did not parse.
pub fn decode<M: WireMessage>(frame: &[u8]) -> Result<M, MalformedMessage> {
    let mut buf = frame;

    if !buf.has_remaining() {
        return Err(MalformedMessage::Empty(M::NAME));
    }

    let found = buf.get_u8();
    if found != M::TAG {
        return Err(MalformedMessage::UnexpectedTag {
            name: M::NAME,
            expected: M::TAG,
            found,
        });
    }

    let declared =
        prost::encoding::decode_varint(&mut buf).map_err(MalformedMessage::InvalidLength)?;
    if declared != buf.remaining() as u64 {
        return Err(MalformedMessage::LengthMismatch {
            declared,
            actual: buf.remaining(),
        });
    }

    let body = M::Body::decode(buf).map_err(|source| MalformedMessage::Body {
        name: M::NAME,
        source,
    })?;

    M::from_body(body)
}
