use display_bytes::display_bytes_string;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while1};
use nom::character::complete::space0;
use nom::combinator::{all_consuming, eof, map, opt, recognize, rest};
use nom::multi::many0;
use nom::sequence::{delimited, pair, preceded, separated_pair, terminated, tuple};
use nom::IResult;

/// A single line of a header block, with its line terminator removed
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum HeaderLine<'a> {
    /// A `name: value` header field
    Field(&'a [u8], &'a [u8]),
    /// A folded line that continues the previous field
    Continuation(&'a [u8]),
    /// The blank line that ends a header block
    End,
}

// Parse a header line that has already had its terminator stripped
pub(crate) fn header_line(line: &[u8]) -> Result<HeaderLine, String> {
    let res = all_consuming(alt((header_end, continuation, field)))(line);
    match res {
        Ok((_, header)) => Ok(header),
        Err(_) => Err(format!(
            "malformed header line '{}'",
            display_bytes_string(line)
        )),
    }
}

// Parse a Content-Type style value into a lower case mime type and
// its parameters in order of appearance
pub(crate) fn media_type(value: &[u8]) -> Result<(String, Vec<(String, Vec<u8>)>), String> {
    let res = all_consuming(media_type_with_params)(value);
    match res {
        Ok((_, (mime_type, params))) => {
            let mime_type = String::from_utf8_lossy(mime_type).to_ascii_lowercase();
            let params = params
                .into_iter()
                .map(|(k, v)| (String::from_utf8_lossy(k).to_ascii_lowercase(), v))
                .collect();
            Ok((mime_type, params))
        }
        Err(_) => Err(format!(
            "malformed media type '{}'",
            display_bytes_string(value)
        )),
    }
}

fn header_end(buf: &[u8]) -> IResult<&[u8], HeaderLine> {
    map(eof, |_| HeaderLine::End)(buf)
}

fn continuation(buf: &[u8]) -> IResult<&[u8], HeaderLine> {
    let folded = preceded(take_while1(wsp), rest);
    map(folded, |v| HeaderLine::Continuation(trim(v)))(buf)
}

fn field(buf: &[u8]) -> IResult<&[u8], HeaderLine> {
    let (i, (name, value)) = separated_pair(header_name, tag(b":"), rest)(buf)?;
    Ok((i, HeaderLine::Field(name, trim(value))))
}

fn header_name(buf: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(|c: u8| c > b' ' && c < 0x7f && c != b':')(buf)
}

fn media_type_with_params(buf: &[u8]) -> IResult<&[u8], (&[u8], Vec<(&[u8], Vec<u8>)>)> {
    let mime = recognize(separated_pair(token, tag(b"/"), token));
    let parser = pair(delimited(space0, mime, space0), many0(parameter));
    // A trailing ';' is tolerated
    terminated(parser, pair(opt(tag(b";")), space0))(buf)
}

fn parameter(buf: &[u8]) -> IResult<&[u8], (&[u8], Vec<u8>)> {
    let preamble = pair(tag(b";"), space0);
    let (i, attribute) = preceded(preamble, token)(buf)?;
    let equals = tuple((space0, tag(b"="), space0));
    let (i, value) = terminated(preceded(equals, parameter_value), space0)(i)?;
    Ok((i, (attribute, value)))
}

fn parameter_value(buf: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let token_vec = map(token, |b: &[u8]| b.to_vec());
    alt((token_vec, quoted_string))(buf)
}

fn token(buf: &[u8]) -> IResult<&[u8], &[u8]> {
    take_while1(|c: u8| c > b' ' && c < 0x7f && !tspecial(c))(buf)
}

fn quoted_string(buf: &[u8]) -> IResult<&[u8], Vec<u8>> {
    let (i, _) = tag(b"\"")(buf)?;
    let mut ret = Vec::new();
    let mut pos = 0;
    while pos < i.len() {
        match i[pos] {
            b'"' => return Ok((&i[pos + 1..], ret)),
            b'\\' if pos + 1 < i.len() => {
                ret.push(i[pos + 1]);
                pos += 2;
            }
            c => {
                ret.push(c);
                pos += 1;
            }
        }
    }
    // Unterminated
    Err(nom::Err::Error(nom::error::Error::new(
        buf,
        nom::error::ErrorKind::Tag,
    )))
}

fn wsp(c: u8) -> bool {
    c == b' ' || c == b'\t'
}

fn trim(value: &[u8]) -> &[u8] {
    let start = value.iter().position(|c| !wsp(*c)).unwrap_or(value.len());
    let end = value.iter().rposition(|c| !wsp(*c)).map_or(start, |p| p + 1);
    &value[start..end]
}

fn tspecial(c: u8) -> bool {
    c == b'('
        || c == b')'
        || c == b'<'
        || c == b'>'
        || c == b'@'
        || c == b','
        || c == b';'
        || c == b':'
        || c == b'\\'
        || c == b'"'
        || c == b'/'
        || c == b'['
        || c == b']'
        || c == b'?'
        || c == b'='
}
