/// Raw storage contract shared by every block backend.
///
/// Offsets are translated with [`crate::block::address::Address::of`]
/// (`block = offset / BLOCK_SIZE`, `offset = offset % BLOCK_SIZE`); the
/// buffer and every decorator rely on exactly that mapping.
///
/// Raw transfers never cross a block boundary. Callers issue one call per
/// block and must [`BlockStore::ensure`] capacity before writing.
pub trait BlockStore {
    #[inline]
    fn address(
        &self,
        offset: u64,
    ) -> crate::errors::BlockResult<crate::block::address::Address> {
        crate::block::address::Address::of(offset)
    }

    /// Grows capacity to at least `min_bytes`. Existing blocks keep their
    /// index; a call with `min_bytes <= capacity` does nothing.
    fn ensure(&mut self, min_bytes: u64) -> crate::errors::BlockResult<()>;

    /// Copies `min(dst.len(), BLOCK_SIZE - offset)` bytes out of `block`.
    /// Returns `Ok(0)` when `block` was never allocated.
    fn read_raw(
        &self,
        dst: &mut [u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize>;

    /// Copies `min(src.len(), BLOCK_SIZE - offset)` bytes into `block`.
    /// Returns `Ok(0)` when `block` was never allocated.
    fn write_raw(
        &mut self,
        src: &[u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize>;

    /// Sets the logical length. Never grows or validates; call `ensure` first.
    fn set_len(&mut self, len: u64);

    /// Logical length in bytes.
    fn len(&self) -> u64;

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of allocated blocks.
    fn block_count(&self) -> usize;

    /// Allocated bytes, always `>= len()` while open.
    #[inline]
    fn capacity(&self) -> u64 {
        (self.block_count() as u64).saturating_mul(crate::block::BLOCK_SIZE as u64)
    }

    fn is_closed(&self) -> bool;

    /// Releases every block. Further transfers fail with `ClosedStore`.
    fn close(&mut self) -> crate::errors::BlockResult<()>;

    /// Human-readable state listing for debugging.
    fn dump(&self) -> String {
        format!(
            "len: {}\ncapacity: {}\nblocks: {}\n",
            self.len(),
            self.capacity(),
            self.block_count()
        )
    }
}

/*

======================================
========= FORWARDING IMPLS  ==========
======================================

*/

impl<S: BlockStore + ?Sized> BlockStore for &mut S {
    #[inline]
    fn address(
        &self,
        offset: u64,
    ) -> crate::errors::BlockResult<crate::block::address::Address> {
        (**self).address(offset)
    }

    #[inline]
    fn ensure(&mut self, min_bytes: u64) -> crate::errors::BlockResult<()> {
        (**self).ensure(min_bytes)
    }

    #[inline]
    fn read_raw(
        &self,
        dst: &mut [u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize> {
        (**self).read_raw(dst, block, offset)
    }

    #[inline]
    fn write_raw(
        &mut self,
        src: &[u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize> {
        (**self).write_raw(src, block, offset)
    }

    #[inline]
    fn set_len(&mut self, len: u64) {
        (**self).set_len(len);
    }

    #[inline]
    fn len(&self) -> u64 {
        (**self).len()
    }

    #[inline]
    fn block_count(&self) -> usize {
        (**self).block_count()
    }

    #[inline]
    fn capacity(&self) -> u64 {
        (**self).capacity()
    }

    #[inline]
    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    #[inline]
    fn close(&mut self) -> crate::errors::BlockResult<()> {
        (**self).close()
    }

    fn dump(&self) -> String {
        (**self).dump()
    }
}

impl<S: BlockStore + ?Sized> BlockStore for Box<S> {
    #[inline]
    fn address(
        &self,
        offset: u64,
    ) -> crate::errors::BlockResult<crate::block::address::Address> {
        (**self).address(offset)
    }

    #[inline]
    fn ensure(&mut self, min_bytes: u64) -> crate::errors::BlockResult<()> {
        (**self).ensure(min_bytes)
    }

    #[inline]
    fn read_raw(
        &self,
        dst: &mut [u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize> {
        (**self).read_raw(dst, block, offset)
    }

    #[inline]
    fn write_raw(
        &mut self,
        src: &[u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize> {
        (**self).write_raw(src, block, offset)
    }

    #[inline]
    fn set_len(&mut self, len: u64) {
        (**self).set_len(len);
    }

    #[inline]
    fn len(&self) -> u64 {
        (**self).len()
    }

    #[inline]
    fn block_count(&self) -> usize {
        (**self).block_count()
    }

    #[inline]
    fn capacity(&self) -> u64 {
        (**self).capacity()
    }

    #[inline]
    fn is_closed(&self) -> bool {
        (**self).is_closed()
    }

    #[inline]
    fn close(&mut self) -> crate::errors::BlockResult<()> {
        (**self).close()
    }

    fn dump(&self) -> String {
        (**self).dump()
    }
}
