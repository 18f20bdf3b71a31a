/// A logical byte offset split into `(block index, intra-block offset)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Address {
    pub block: usize,
    /// Always `< BLOCK_SIZE` for addresses produced by [`Address::of`].
    pub offset: usize,
}

impl Address {
    /// Translates a logical offset. No bounds check is made against any store.
    ///
    /// # Errors
    ///
    /// Fails only if `offset` does not fit in `usize` on this target.
    #[inline]
    pub fn of(offset: u64) -> crate::errors::BlockResult<Self> {
        let offset = <u64 as TryInto<usize>>::try_into(offset)?;

        Ok(Self {
            block: offset / crate::block::BLOCK_SIZE,
            offset: offset % crate::block::BLOCK_SIZE,
        })
    }

    /// The logical offset this address points at.
    #[inline]
    pub fn to_offset(self) -> crate::errors::BlockResult<u64> {
        let abs = self
            .block
            .checked_mul(crate::block::BLOCK_SIZE)
            .and_then(|start| start.checked_add(self.offset))
            .ok_or(crate::errors::BlockError::Overflow)?;

        Ok(<usize as TryInto<u64>>::try_into(abs)?)
    }

    /// Moves `n` bytes forward inside the current block, wrapping to the
    /// start of the next block exactly when the current one is full.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.offset += n;

        debug_assert!(self.offset <= crate::block::BLOCK_SIZE);

        if self.offset == crate::block::BLOCK_SIZE {
            self.offset = 0;
            self.block += 1;
        }
    }
}
