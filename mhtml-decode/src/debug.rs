use crate::part::DecodedPart;
use display_bytes::display_bytes;
use std::fmt;

// Payloads longer than this are shortened in Debug output
const DEBUG_DATA_LIMIT: usize = 64;

// Debug a byte payload as text with escapes
pub(crate) struct DataDbg<'a>(pub(crate) &'a [u8]);

impl fmt::Debug for DataDbg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.len() > DEBUG_DATA_LIMIT {
            write!(
                f,
                "\"{}\"... ({} bytes)",
                display_bytes(&self.0[..DEBUG_DATA_LIMIT]),
                self.0.len()
            )
        } else {
            write!(f, "\"{}\"", display_bytes(self.0))
        }
    }
}

impl fmt::Debug for DecodedPart {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut d = f.debug_struct("DecodedPart");
        d.field("content_type", &self.content_type);
        d.field("location", &self.location);
        d.field("data", &DataDbg(&self.data));
        d.finish()
    }
}
