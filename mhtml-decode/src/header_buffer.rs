// Folds continuation lines into the header field they belong to
#[derive(Default)]
pub(crate) struct HeaderBuffer {
    field: Option<(Vec<u8>, Vec<u8>)>,
}

impl HeaderBuffer {
    // Start a new field and retrieve the previous, now complete, field
    pub(crate) fn next_field(&mut self, name: &[u8], value: &[u8]) -> Option<(Vec<u8>, Vec<u8>)> {
        self.field.replace((name.to_vec(), value.to_vec()))
    }

    // Append a continuation line to the current field.
    // Returns false if there is no field to continue.
    pub(crate) fn continue_field(&mut self, value: &[u8]) -> bool {
        match &mut self.field {
            Some((_, current)) => {
                if !value.is_empty() {
                    if !current.is_empty() {
                        current.push(b' ');
                    }
                    current.extend_from_slice(value);
                }
                true
            }
            None => false,
        }
    }

    // Get the remaining field and clear the buffer
    pub(crate) fn take(&mut self) -> Option<(Vec<u8>, Vec<u8>)> {
        self.field.take()
    }
}
