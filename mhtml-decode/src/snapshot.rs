use crate::err::Result;
use crate::parser::Parts;
use crate::part::DecodedPart;
use std::io::BufRead;
use std::slice;

/// The decoded parts of a snapshot in document order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Snapshot {
    parts: Vec<DecodedPart>,
}

impl Snapshot {
    /// Decode a complete snapshot. Fails if any part fails.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let parts = Parts::new(reader)?.collect::<Result<Vec<_>>>()?;
        Ok(Self { parts })
    }

    /// The root document, which a browser writes as the first part.
    /// Leading blank parts (a blank line before the first boundary) are skipped.
    pub fn root(&self) -> Option<&DecodedPart> {
        self.parts.iter().find(|p| !p.is_blank())
    }

    /// Find the first part with the given Content-Location
    pub fn get(&self, location: &str) -> Option<&DecodedPart> {
        self.parts.iter().find(|p| p.location == location)
    }

    /// The parts that follow the root document
    pub fn resources(&self) -> impl Iterator<Item = &DecodedPart> {
        self.parts.iter().skip_while(|p| p.is_blank()).skip(1)
    }

    pub fn iter(&self) -> slice::Iter<'_, DecodedPart> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn into_parts(self) -> Vec<DecodedPart> {
        self.parts
    }
}

impl From<Vec<DecodedPart>> for Snapshot {
    fn from(parts: Vec<DecodedPart>) -> Self {
        Self { parts }
    }
}

impl IntoIterator for Snapshot {
    type Item = DecodedPart;
    type IntoIter = std::vec::IntoIter<DecodedPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a DecodedPart;
    type IntoIter = slice::Iter<'a, DecodedPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}
