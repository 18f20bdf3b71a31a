/// Reference point for [`crate::buffer::editable::EditableBuffer::seek`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Whence {
    /// Offset is absolute.
    Start,
    /// Offset is relative to the cursor.
    Current,
    /// Offset is relative to the logical length.
    End,
}

/// Result of a successful read.
///
/// Reaching the logical length is a normal stream terminator, not a failure,
/// so it is reported here rather than through [`crate::errors::BlockError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    /// The destination was filled (or had no room left) before the end of data.
    Filled(usize),
    /// The read stopped at the logical length after copying this many bytes.
    EndOfData(usize),
}

impl ReadOutcome {
    /// Number of bytes copied, regardless of why the read stopped.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            ReadOutcome::Filled(n) | ReadOutcome::EndOfData(n) => *n,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    #[must_use]
    pub fn is_end_of_data(&self) -> bool {
        matches!(self, ReadOutcome::EndOfData(_))
    }
}
