//! `std::io` adapters so an [`EditableBuffer`] plugs into `io::copy`, readers
//! and writers. End of data maps to `Ok(0)` on read.
use crate::block::store::BlockStore;
use crate::buffer::editable::EditableBuffer;

impl<S: BlockStore> std::io::Read for EditableBuffer<S> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        Ok(EditableBuffer::<S>::read(self, buf)?.len())
    }
}

impl<S: BlockStore> std::io::Write for EditableBuffer<S> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        Ok(EditableBuffer::<S>::write(self, buf)?)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<S: BlockStore> std::io::Seek for EditableBuffer<S> {
    fn seek(&mut self, pos: std::io::SeekFrom) -> std::io::Result<u64> {
        let (offset, whence) = match pos {
            std::io::SeekFrom::Start(offset) => (
                <u64 as TryInto<i64>>::try_into(offset)
                    .map_err(crate::errors::BlockError::from)?,
                crate::enums::Whence::Start,
            ),
            std::io::SeekFrom::Current(offset) => (offset, crate::enums::Whence::Current),
            std::io::SeekFrom::End(offset) => (offset, crate::enums::Whence::End),
        };

        Ok(EditableBuffer::<S>::seek(self, offset, whence)?)
    }
}
