//! Decode MHTML web-archive snapshots
//!
//! A browser snapshot is a `multipart/related` MIME document holding the
//! root HTML document and the resources it embeds. This crate splits the
//! document at its boundary lines and decodes each part's
//! Content-Transfer-Encoding.
//!
//! # Example
//! ```
//! use mhtml_decode::decode_bytes;
//!
//! let snapshot = b"Content-Type: multipart/related; boundary=\"X\"\r\n\
//! \r\n\
//! --X\r\n\
//! Content-Type: text/html\r\n\
//! Content-Location: http://a/\r\n\
//! \r\n\
//! <html></html>\r\n\
//! --X--\r\n";
//!
//! let parts = decode_bytes(snapshot)?;
//! assert_eq!(parts.len(), 1);
//! assert_eq!(parts[0].content_type, "text/html");
//! assert_eq!(parts[0].location, "http://a/");
//! assert_eq!(parts[0].data, b"<html></html>\n");
//! # Ok::<(), mhtml_decode::Error>(())
//! ```

mod debug;
mod encoding;
mod err;
mod header;
mod header_buffer;
mod line_parser;
mod parser;
mod part;
mod snapshot;

pub use crate::encoding::TransferEncoding;
pub use crate::err::{EncodingError, Error, MediaTypeError, Result};
pub use crate::header::MediaType;
pub use crate::parser::Parts;
pub use crate::part::DecodedPart;
pub use crate::snapshot::Snapshot;
use std::io::BufRead;

/// Decode all parts of a snapshot read from the given reader.
/// Any failure aborts the decode and no parts are returned.
pub fn decode<R: BufRead>(reader: R) -> Result<Vec<DecodedPart>> {
    Parts::new(reader)?.collect()
}

/// Decode a snapshot that is already in memory
pub fn decode_bytes(snapshot: &[u8]) -> Result<Vec<DecodedPart>> {
    decode(snapshot)
}
