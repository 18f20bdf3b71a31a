use crate::block::store::BlockStore;

/// Wraps a store and records, per block, how many `'\n'` bytes the most
/// recent raw write into that block was handed.
///
/// The count covers the whole slice passed to `write_raw`, including any
/// bytes the caller will carry into later blocks, and it replaces the
/// previous value rather than accumulating. Counts therefore drift from the
/// block's real content; [`LineCounter::recount`] resynchronises a block.
#[derive(Debug, Default)]
pub struct LineCounter<S = crate::block::fixed::FixedStore> {
    inner: S,
    /// One entry per allocated block, zero until the block is written.
    lines: Vec<usize>,
}

impl LineCounter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<S: BlockStore> LineCounter<S> {
    pub fn with_store(inner: S) -> Self {
        let lines = vec![0; inner.block_count()];

        Self { inner, lines }
    }

    /// Newline count recorded for `block`.
    ///
    /// # Panics
    ///
    /// Panics if `block` was never allocated.
    #[inline]
    #[must_use]
    pub fn lines(&self, block: usize) -> usize {
        self.lines[block]
    }

    #[inline]
    #[must_use]
    pub fn get_lines(&self, block: usize) -> Option<usize> {
        self.lines.get(block).copied()
    }

    /// Sum of the recorded counts over all blocks.
    #[inline]
    #[must_use]
    pub fn total_lines(&self) -> usize {
        self.lines.iter().sum()
    }

    /// Rescans the live bytes of `block` (those below the logical length)
    /// and stores the exact newline count.
    ///
    /// # Errors
    ///
    /// `IndexOutOfBounds` if `block` was never allocated.
    pub fn recount(&mut self, block: usize) -> crate::errors::BlockResult<usize> {
        if block >= self.inner.block_count() {
            return Err(crate::errors::BlockError::IndexOutOfBounds(block));
        }

        let start = crate::block::address::Address { block, offset: 0 }.to_offset()?;
        let live = self
            .inner
            .len()
            .saturating_sub(start)
            .min(crate::block::BLOCK_SIZE as u64);
        let mut tmp = [0u8; crate::block::BLOCK_SIZE];
        let live = <u64 as TryInto<usize>>::try_into(live)?;
        let n = self.inner.read_raw(&mut tmp[..live], block, 0)?;
        let count = memchr::memchr_iter(b'\n', &tmp[..n]).count();

        self.grow_counts(block + 1);
        self.lines[block] = count;

        Ok(count)
    }

    #[inline]
    pub fn inner(&self) -> &S {
        &self.inner
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.inner
    }

    fn grow_counts(&mut self, blocks: usize) {
        if self.lines.len() < blocks {
            self.lines.resize(blocks, 0);
        }
    }
}

impl<S: BlockStore> BlockStore for LineCounter<S> {
    fn address(
        &self,
        offset: u64,
    ) -> crate::errors::BlockResult<crate::block::address::Address> {
        self.inner.address(offset)
    }

    fn ensure(&mut self, min_bytes: u64) -> crate::errors::BlockResult<()> {
        self.inner.ensure(min_bytes)?;
        self.grow_counts(self.inner.block_count());

        Ok(())
    }

    #[inline]
    fn read_raw(
        &self,
        dst: &mut [u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize> {
        self.inner.read_raw(dst, block, offset)
    }

    /// Counts the newlines in `src`, writes through to the inner store, then
    /// replaces the block's count. Nothing is recorded if the block is missing.
    fn write_raw(
        &mut self,
        src: &[u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize> {
        let count = memchr::memchr_iter(b'\n', src).count();
        let n = self.inner.write_raw(src, block, offset)?;

        if n > 0 {
            self.grow_counts(block + 1);
            self.lines[block] = count;
        }

        Ok(n)
    }

    #[inline]
    fn set_len(&mut self, len: u64) {
        self.inner.set_len(len);
    }

    #[inline]
    fn len(&self) -> u64 {
        self.inner.len()
    }

    #[inline]
    fn block_count(&self) -> usize {
        self.inner.block_count()
    }

    #[inline]
    fn is_closed(&self) -> bool {
        self.inner.is_closed()
    }

    fn close(&mut self) -> crate::errors::BlockResult<()> {
        self.inner.close()?;
        self.lines = Vec::new();

        Ok(())
    }

    fn dump(&self) -> String {
        let mut s = self.inner.dump();

        s.push_str(&format!("lines: {:?}\n", self.lines));

        s
    }
}
