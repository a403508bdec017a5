use crate::encoding::TransferEncoding;
use crate::err::{Error, Result};
use crate::header::{read_header_block, MediaType};
use log::debug;

/// A resource extracted from a snapshot
#[derive(Clone, Default, PartialEq, Eq)]
pub struct DecodedPart {
    /// The raw Content-Type header value, empty if absent
    pub content_type: String,
    /// The Content-Location header value, empty if absent
    pub location: String,
    /// The payload with any transfer encoding removed
    pub data: Vec<u8>,
}

impl DecodedPart {
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// True for a part with no headers and no payload, such as the one
    /// produced by a blank line before the first boundary
    pub fn is_blank(&self) -> bool {
        self.content_type.is_empty() && self.location.is_empty() && self.data.is_empty()
    }

    /// Parse the Content-Type, `None` if it is empty or malformed
    pub fn media_type(&self) -> Option<MediaType> {
        MediaType::parse(&self.content_type).ok()
    }

    /// The lower case mime type without parameters
    pub fn mime_type(&self) -> Option<String> {
        self.media_type().map(|m| m.mime_type().to_owned())
    }

    pub fn charset(&self) -> Option<String> {
        self.media_type()
            .and_then(|m| m.parameter("charset").map(str::to_owned))
    }
}

// Decode the raw bytes accumulated between two boundaries.
// The buffer holds a header block followed by the body.
pub(crate) fn decode_part(mut raw: Vec<u8>) -> Result<DecodedPart> {
    let mut reader = &raw[..];
    let headers = read_header_block(&mut reader)
        .map_err(|err| Error::MalformedPartHeader(err.to_string()))?;
    let body_start = raw.len() - reader.len();
    let body = raw.split_off(body_start);

    let location = headers.get("Content-Location").unwrap_or_default().to_owned();
    let content_type = headers.get("Content-Type").unwrap_or_default().to_owned();
    let encoding = TransferEncoding::from_header(headers.get("Content-Transfer-Encoding"));
    let data = encoding
        .decode(body)
        .map_err(|err| Error::Encoding(location.clone(), err))?;
    debug!(
        "Decoded part {} ({}, {:?}, {} bytes)",
        location,
        content_type,
        encoding,
        data.len()
    );
    Ok(DecodedPart {
        content_type,
        location,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn unencoded_part() {
        let raw = b"Content-Type: text/html\nContent-Location: http://a/\n\n<html>\n\n</html>\n";
        let part = decode_part(raw.to_vec()).unwrap();
        assert_eq!(part.content_type(), "text/html");
        assert_eq!(part.location(), "http://a/");
        assert_eq!(part.data(), b"<html>\n\n</html>\n");
    }

    #[test]
    fn base64_part() {
        let raw = b"Content-Type: image/png\n\
Content-Transfer-Encoding: base64\n\
Content-Location: http://a/dot.png\n\
\n\
iVBORw0K\n\
GgA=\n";
        let part = decode_part(raw.to_vec()).unwrap();
        assert_eq!(part.mime_type().as_deref(), Some("image/png"));
        assert_eq!(part.data(), b"\x89PNG\r\n\x1a\x00");
    }

    #[test]
    fn missing_headers_are_empty() {
        let part = decode_part(b"\nbody\n".to_vec()).unwrap();
        assert_eq!(part.content_type(), "");
        assert_eq!(part.location(), "");
        assert_eq!(part.mime_type(), None);
        assert_eq!(part.data(), b"body\n");
        assert!(!part.is_blank());
    }

    #[test]
    fn blank_part() {
        let part = decode_part(b"\n".to_vec()).unwrap();
        assert!(part.is_blank());
        assert_eq!(part, DecodedPart::default());
    }

    #[test]
    fn charset_parameter() {
        let part = DecodedPart {
            content_type: "text/html; charset=\"utf-8\"".to_owned(),
            ..DecodedPart::default()
        };
        assert_eq!(part.charset().as_deref(), Some("utf-8"));
        assert_eq!(part.mime_type().as_deref(), Some("text/html"));
    }

    #[test]
    fn malformed_header() {
        let res = decode_part(b"<html>\n\n".to_vec());
        assert!(matches!(res, Err(Error::MalformedPartHeader(_))));
    }

    #[test]
    fn header_without_body_separator() {
        let res = decode_part(b"Content-Type: text/html\n".to_vec());
        assert!(matches!(res, Err(Error::MalformedPartHeader(_))));
    }

    #[test]
    fn bad_encoding() {
        let raw = b"Content-Location: http://a/x.css\nContent-Transfer-Encoding: base64\n\n!!!!\n";
        match decode_part(raw.to_vec()) {
            Err(Error::Encoding(location, _)) => assert_eq!(location, "http://a/x.css"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
