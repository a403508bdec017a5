use std::io;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort the decoding of a snapshot
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The outer header block or its boundary cannot be determined
    #[error("malformed envelope - {0}")]
    MalformedEnvelope(String),
    /// The underlying reader failed with something other than end of input
    #[error("snapshot stream read failure")]
    StreamRead(#[source] io::Error),
    /// The header block of a part cannot be parsed
    #[error("malformed part header - {0}")]
    MalformedPartHeader(String),
    /// A part body does not match its declared transfer encoding
    #[error("{0} - transfer encoding error")]
    Encoding(String, #[source] EncodingError),
}

/// Failures decoding a transfer encoded body
#[derive(thiserror::Error, Debug)]
pub enum EncodingError {
    #[error("bad base64 body")]
    Base64(#[from] base64::DecodeError),
    #[error("bad quoted-printable body at byte {offset}: {reason}")]
    QuotedPrintable { offset: usize, reason: &'static str },
}

/// Failures parsing a media type such as a Content-Type value
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MediaTypeError {
    #[error("bad media type - {0}")]
    Syntax(String),
    #[error("duplicate parameter '{0}'")]
    DuplicateParameter(String),
}

// Failures reading a header block, mapped onto Error by the caller
#[derive(thiserror::Error, Debug)]
pub(crate) enum HeaderError {
    #[error("header read failure")]
    Io(#[from] io::Error),
    #[error("{0}")]
    Syntax(String),
}
