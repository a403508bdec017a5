use crate::err::EncodingError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// The Content-Transfer-Encoding of a part body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    /// Body bytes are used as they are
    Identity,
    Base64,
    QuotedPrintable,
}

impl TransferEncoding {
    /// Select the encoding named by a Content-Transfer-Encoding header value.
    /// A missing or unrecognised value means the body is not encoded.
    pub fn from_header(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("base64") => TransferEncoding::Base64,
            Some(v) if v.eq_ignore_ascii_case("quoted-printable") => {
                TransferEncoding::QuotedPrintable
            }
            _ => TransferEncoding::Identity,
        }
    }

    /// Decode a complete body
    pub fn decode(self, body: Vec<u8>) -> Result<Vec<u8>, EncodingError> {
        match self {
            TransferEncoding::Identity => Ok(body),
            TransferEncoding::Base64 => decode_base64(&body),
            TransferEncoding::QuotedPrintable => decode_quoted_printable(&body),
        }
    }
}

// Line breaks are not part of the base64 alphabet
fn decode_base64(body: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let cleaned: Vec<u8> = body
        .iter()
        .copied()
        .filter(|c| *c != b'\r' && *c != b'\n')
        .collect();
    Ok(STANDARD.decode(cleaned)?)
}

fn decode_quoted_printable(body: &[u8]) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::with_capacity(body.len());
    let mut offset = 0;
    for line in body.split_inclusive(|c| *c == b'\n') {
        let hard_break: &[u8] = if line.ends_with(b"\r\n") {
            b"\r\n"
        } else if line.ends_with(b"\n") {
            b"\n"
        } else {
            b""
        };
        // Trailing whitespace is transport padding
        let content = trim_end(line);
        match content.strip_suffix(b"=") {
            Some(soft) => decode_qp_line(soft, offset, &mut out)?,
            None => {
                decode_qp_line(content, offset, &mut out)?;
                out.extend_from_slice(hard_break);
            }
        }
        offset += line.len();
    }
    Ok(out)
}

fn decode_qp_line(line: &[u8], offset: usize, out: &mut Vec<u8>) -> Result<(), EncodingError> {
    let mut i = 0;
    while i < line.len() {
        if line[i] != b'=' {
            out.push(line[i]);
            i += 1;
            continue;
        }
        let hex = line
            .get(i + 1..i + 3)
            .and_then(|pair| Some((hex_value(pair[0])? << 4) | hex_value(pair[1])?));
        match hex {
            Some(b) => {
                out.push(b);
                i += 3;
            }
            None => {
                return Err(EncodingError::QuotedPrintable {
                    offset: offset + i,
                    reason: "'=' is not followed by two hex digits",
                })
            }
        }
    }
    Ok(())
}

fn hex_value(c: u8) -> Option<u8> {
    (c as char).to_digit(16).map(|d| d as u8)
}

fn trim_end(line: &[u8]) -> &[u8] {
    let end = line
        .iter()
        .rposition(|c| !matches!(c, b' ' | b'\t' | b'\r' | b'\n'))
        .map_or(0, |p| p + 1);
    &line[..end]
}
