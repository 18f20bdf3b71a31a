pub type BlockResult<T> = Result<T, BlockError>;

#[derive(Debug)]
pub enum BlockError {
    /// A seek resolved to a negative absolute offset.
    InvalidOffset(i64),
    /// A positioned read, write or edit referenced an offset past the logical length.
    OutOfRange { offset: u64, len: u64 },
    /// The store has been closed and its blocks released.
    ClosedStore,
    /// A raw block transfer landed nowhere; the store is corrupt.
    IndexOutOfBounds(usize),
    ConversionError(std::num::TryFromIntError),
    Overflow,
}

impl std::fmt::Display for BlockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BlockError::InvalidOffset(offset) => write!(f, "invalid offset {offset}"),
            BlockError::OutOfRange { offset, len } => {
                write!(f, "offset {offset} out of range (len={len})")
            }
            BlockError::ClosedStore => write!(f, "block store is closed"),
            BlockError::IndexOutOfBounds(block) => write!(f, "block index {block} out of bounds"),
            BlockError::ConversionError(e) => write!(f, "integer conversion failed: {e}"),
            BlockError::Overflow => write!(f, "arithmetic overflow"),
        }
    }
}

impl std::error::Error for BlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BlockError::ConversionError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::num::TryFromIntError> for BlockError {
    fn from(value: std::num::TryFromIntError) -> Self {
        BlockError::ConversionError(value)
    }
}

impl From<BlockError> for std::io::Error {
    fn from(value: BlockError) -> Self {
        let kind = match value {
            BlockError::InvalidOffset(_) => std::io::ErrorKind::InvalidInput,
            BlockError::OutOfRange { .. } => std::io::ErrorKind::UnexpectedEof,
            BlockError::ClosedStore => std::io::ErrorKind::NotConnected,
            BlockError::IndexOutOfBounds(_) | BlockError::ConversionError(_) => {
                std::io::ErrorKind::InvalidData
            }
            BlockError::Overflow => std::io::ErrorKind::InvalidInput,
        };

        std::io::Error::new(kind, value)
    }
}

#[cfg(test)]
mod block_error_tests {
    use super::*;

    #[test]
    fn test_conversion_error_from_try_into() {
        let err: BlockError = <u64 as TryInto<u8>>::try_into(300u64).unwrap_err().into();

        assert!(matches!(err, BlockError::ConversionError(_)));
        assert!(err.to_string().starts_with("integer conversion failed"));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_io_error_kinds() {
        let io: std::io::Error = BlockError::InvalidOffset(-1).into();
        assert_eq!(io.kind(), std::io::ErrorKind::InvalidInput);

        let io: std::io::Error = BlockError::OutOfRange { offset: 9, len: 3 }.into();
        assert_eq!(io.kind(), std::io::ErrorKind::UnexpectedEof);
        assert_eq!(io.to_string(), "offset 9 out of range (len=3)");

        let io: std::io::Error = BlockError::ClosedStore.into();
        assert_eq!(io.kind(), std::io::ErrorKind::NotConnected);
    }
}
