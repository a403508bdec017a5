use crate::err::{Error, HeaderError, Result};
use crate::header::{read_header_block, read_line, MediaType};
use crate::part::{decode_part, DecodedPart};
use log::{debug, trace};
use std::io::BufRead;
use std::iter::FusedIterator;
use std::mem;

#[derive(Clone, Copy, Debug, PartialEq)]
enum State {
    Parts,
    // The closing delimiter has been seen
    Epilogue,
    Failed,
}

/// Parts is a streaming iterator over the parts of a snapshot.
///
/// Creating a `Parts` reads the envelope header block. Each call to
/// `next()` reads up to the next boundary line and decodes the part
/// collected before it. After an error the iterator is finished.
pub struct Parts<R: BufRead> {
    reader: R,
    state: State,
    boundary: String,
    open_boundary: Vec<u8>,
    close_boundary: Vec<u8>,
    line: Vec<u8>,
    buffer: Vec<u8>,
}

impl<R: BufRead> Parts<R> {
    /// Read the envelope header block and prepare to iterate over the parts
    pub fn new(mut reader: R) -> Result<Self> {
        let boundary = read_envelope(&mut reader)?;
        debug!("Snapshot boundary is {}", boundary);
        let mut open_boundary = b"--".to_vec();
        open_boundary.extend_from_slice(boundary.as_bytes());
        let mut close_boundary = open_boundary.clone();
        close_boundary.extend_from_slice(b"--");
        Ok(Self {
            reader,
            state: State::Parts,
            boundary,
            open_boundary,
            close_boundary,
            line: Vec::new(),
            buffer: Vec::new(),
        })
    }

    /// The boundary parameter declared by the envelope
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    // Accumulate lines until a boundary completes a part
    fn next_part(&mut self) -> Result<Option<DecodedPart>> {
        loop {
            let has_line = read_line(&mut self.reader, &mut self.line).map_err(Error::StreamRead)?;
            if !has_line {
                if !self.buffer.is_empty() {
                    trace!(
                        "Discarding {} bytes after the last boundary",
                        self.buffer.len()
                    );
                }
                return Ok(None);
            }
            let is_close = self.line == self.close_boundary;
            if !is_close && self.line != self.open_boundary {
                // Blank lines are kept as a lone \n
                self.buffer.extend_from_slice(&self.line);
                self.buffer.push(b'\n');
                continue;
            }
            if is_close {
                self.state = State::Epilogue;
            }
            if self.buffer.is_empty() {
                if is_close {
                    return Ok(None);
                }
                continue;
            }
            let raw = mem::take(&mut self.buffer);
            return decode_part(raw).map(Some);
        }
    }
}

impl<R: BufRead> Iterator for Parts<R> {
    type Item = Result<DecodedPart>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state != State::Parts {
            return None;
        }
        match self.next_part() {
            Ok(Some(part)) => Some(Ok(part)),
            Ok(None) => {
                self.state = State::Epilogue;
                None
            }
            Err(err) => {
                self.state = State::Failed;
                Some(Err(err))
            }
        }
    }
}

impl<R: BufRead> FusedIterator for Parts<R> {}

// Read the envelope header block and return its boundary parameter
fn read_envelope<R: BufRead>(reader: &mut R) -> Result<String> {
    let headers = read_header_block(reader).map_err(|err| match err {
        HeaderError::Io(err) => Error::StreamRead(err),
        HeaderError::Syntax(msg) => Error::MalformedEnvelope(msg),
    })?;
    let content_type = headers
        .get("Content-Type")
        .ok_or_else(|| Error::MalformedEnvelope("no Content-Type header".to_owned()))?;
    let media_type = MediaType::parse(content_type)
        .map_err(|err| Error::MalformedEnvelope(err.to_string()))?;
    match media_type.parameter("boundary") {
        Some(boundary) if !boundary.is_empty() => Ok(boundary.to_owned()),
        _ => Err(Error::MalformedEnvelope(format!(
            "no boundary in Content-Type '{}'",
            content_type
        ))),
    }
}
