use crate::err::{HeaderError, MediaTypeError};
use crate::header_buffer::HeaderBuffer;
use crate::line_parser::{self, HeaderLine};
use std::collections::HashMap;
use std::io;
use std::io::BufRead;

// The fields of a header block in order of appearance
#[derive(Debug, Default)]
pub(crate) struct HeaderMap {
    fields: Vec<(String, String)>,
}

impl HeaderMap {
    // Get the value of the first field with the given name, ignoring case
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn insert(&mut self, (name, value): (Vec<u8>, Vec<u8>)) {
        self.fields.push((
            String::from_utf8_lossy(&name).into_owned(),
            String::from_utf8_lossy(&value).into_owned(),
        ));
    }
}

/// A parsed media type such as a Content-Type value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    mime_type: String,
    parameters: HashMap<String, String>,
}

impl MediaType {
    /// Parse a media type with parameters e.g `text/html; charset=utf-8`
    pub fn parse(value: &str) -> Result<Self, MediaTypeError> {
        let (mime_type, params) =
            line_parser::media_type(value.as_bytes()).map_err(MediaTypeError::Syntax)?;
        let mut parameters = HashMap::new();
        for (attribute, value) in params {
            let value = String::from_utf8_lossy(&value).into_owned();
            if parameters.insert(attribute.clone(), value).is_some() {
                return Err(MediaTypeError::DuplicateParameter(attribute));
            }
        }
        Ok(Self {
            mime_type,
            parameters,
        })
    }

    /// The lower case `type/subtype`
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Get a parameter by its case insensitive name
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.parameters
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn parameters(&self) -> &HashMap<String, String> {
        &self.parameters
    }
}

// Read a single line into buf without its \n or \r\n terminator.
// Returns false at end of input.
pub(crate) fn read_line<R: BufRead>(reader: &mut R, buf: &mut Vec<u8>) -> io::Result<bool> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(false);
    }
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
    Ok(true)
}

// Read a header block up to and including its terminating blank line.
// The reader is left at the first byte after the blank line.
pub(crate) fn read_header_block<R: BufRead>(reader: &mut R) -> Result<HeaderMap, HeaderError> {
    let mut headers = HeaderMap::default();
    let mut buffer = HeaderBuffer::default();
    let mut line = Vec::new();
    loop {
        if !read_line(reader, &mut line)? {
            return Err(HeaderError::Syntax(
                "end of input before the end of the header block".to_owned(),
            ));
        }
        match line_parser::header_line(&line).map_err(HeaderError::Syntax)? {
            HeaderLine::End => break,
            HeaderLine::Field(name, value) => {
                if let Some(field) = buffer.next_field(name, value) {
                    headers.insert(field);
                }
            }
            HeaderLine::Continuation(value) => {
                if !buffer.continue_field(value) {
                    return Err(HeaderError::Syntax(
                        "header block starts with a continuation line".to_owned(),
                    ));
                }
            }
        }
    }
    if let Some(field) = buffer.take() {
        headers.insert(field);
    }
    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use maplit::hashmap;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_block_and_leaves_body() {
        let input = b"Content-Type: text/html\r\nContent-Location: http://a/\r\n\r\n<html>\r\n";
        let mut reader = &input[..];
        let headers = read_header_block(&mut reader).unwrap();
        assert_eq!(headers.fields.len(), 2);
        assert_eq!(headers.get("content-type"), Some("text/html"));
        assert_eq!(headers.get("CONTENT-LOCATION"), Some("http://a/"));
        assert_eq!(reader, b"<html>\r\n");
    }

    #[test]
    fn bare_newlines() {
        let input = b"Content-Type: image/png\n\nbody";
        let mut reader = &input[..];
        let headers = read_header_block(&mut reader).unwrap();
        assert_eq!(headers.get("Content-Type"), Some("image/png"));
        assert_eq!(reader, b"body");
    }

    #[test]
    fn folded_content_type() {
        let input = b"MIME-Version: 1.0\r\n\
Content-Type: multipart/related;\r\n\
\ttype=\"text/html\";\r\n\
\tboundary=\"----MultipartBoundary--abc----\"\r\n\
\r\n";
        let mut reader = &input[..];
        let headers = read_header_block(&mut reader).unwrap();
        assert_eq!(
            headers.get("Content-Type"),
            Some("multipart/related; type=\"text/html\"; boundary=\"----MultipartBoundary--abc----\"")
        );
        assert!(reader.is_empty());
    }

    #[test]
    fn first_value_wins() {
        let input = b"X-Tag: one\r\nx-tag: two\r\n\r\n";
        let mut reader = &input[..];
        let headers = read_header_block(&mut reader).unwrap();
        assert_eq!(headers.get("X-Tag"), Some("one"));
        assert_eq!(headers.fields.len(), 2);
        assert_eq!(headers.fields[1], ("x-tag".to_owned(), "two".to_owned()));
    }

    #[test]
    fn empty_block() {
        let mut reader = &b"\r\nrest"[..];
        let headers = read_header_block(&mut reader).unwrap();
        assert!(headers.fields.is_empty());
        assert_eq!(reader, b"rest");
    }

    #[test]
    fn unterminated_block() {
        let mut reader = &b"Content-Type: text/html\r\n"[..];
        let res = read_header_block(&mut reader);
        assert!(matches!(res, Err(HeaderError::Syntax(_))));
        let mut reader = &b""[..];
        let res = read_header_block(&mut reader);
        assert!(matches!(res, Err(HeaderError::Syntax(_))));
    }

    #[test]
    fn leading_continuation() {
        let mut reader = &b" folded\r\n\r\n"[..];
        let res = read_header_block(&mut reader);
        assert!(matches!(res, Err(HeaderError::Syntax(_))));
    }

    #[test]
    fn malformed_line() {
        let mut reader = &b"Content-Type: text/html\r\n<html>\r\n\r\n"[..];
        let res = read_header_block(&mut reader);
        assert!(matches!(res, Err(HeaderError::Syntax(_))));
    }

    #[test]
    fn read_line_terminators() {
        let mut reader = &b"a\r\nb\nc\r"[..];
        let mut line = Vec::new();
        assert!(read_line(&mut reader, &mut line).unwrap());
        assert_eq!(line, b"a");
        assert!(read_line(&mut reader, &mut line).unwrap());
        assert_eq!(line, b"b");
        assert!(read_line(&mut reader, &mut line).unwrap());
        assert_eq!(line, b"c\r");
        assert!(!read_line(&mut reader, &mut line).unwrap());
        assert!(line.is_empty());
    }

    #[test]
    fn media_type_parameters() {
        let media = MediaType::parse("text/html; Charset=\"UTF-8\"").unwrap();
        assert_eq!(media.mime_type(), "text/html");
        assert_eq!(media.parameter("charset"), Some("UTF-8"));
        assert_eq!(media.parameter("CHARSET"), Some("UTF-8"));
        let expected = hashmap! {
            "charset".to_owned() => "UTF-8".to_owned(),
        };
        assert_eq!(media.parameters(), &expected);
    }

    #[test]
    fn duplicate_parameter() {
        assert_eq!(
            MediaType::parse("multipart/related; boundary=a; Boundary=b"),
            Err(MediaTypeError::DuplicateParameter("boundary".to_owned()))
        );
    }

    #[test]
    fn media_type_syntax_error() {
        let res = MediaType::parse("multipart; boundary=a");
        assert!(matches!(res, Err(MediaTypeError::Syntax(_))));
    }
}
