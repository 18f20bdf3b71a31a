use crate::block::store::BlockStore;

/// In-memory block arena.
///
/// Blocks are boxed and only ever appended, so a block index handed out
/// once stays valid for the lifetime of the store.
#[derive(Debug, Default)]
pub struct FixedStore {
    blocks: Vec<Box<[u8; crate::block::BLOCK_SIZE]>>,
    len: u64,
    closed: bool,
}

impl FixedStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn check_open(&self) -> crate::errors::BlockResult<()> {
        if self.closed {
            return Err(crate::errors::BlockError::ClosedStore);
        }

        Ok(())
    }
}

impl BlockStore for FixedStore {
    fn ensure(&mut self, min_bytes: u64) -> crate::errors::BlockResult<()> {
        self.check_open()?;

        if min_bytes <= self.capacity() {
            return Ok(());
        }

        let min_bytes = <u64 as TryInto<usize>>::try_into(min_bytes)?;
        let grow_by = min_bytes
            .div_ceil(crate::block::BLOCK_SIZE)
            .checked_add(crate::block::GROWTH_DELTA)
            .ok_or(crate::errors::BlockError::Overflow)?;
        let new_count = self
            .blocks
            .len()
            .checked_add(grow_by)
            .ok_or(crate::errors::BlockError::Overflow)?;

        tracing::trace!(
            from = self.blocks.len(),
            to = new_count,
            min_bytes,
            "growing block store"
        );

        self.blocks
            .resize_with(new_count, || Box::new([0u8; crate::block::BLOCK_SIZE]));

        Ok(())
    }

    fn read_raw(
        &self,
        dst: &mut [u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize> {
        self.check_open()?;

        let Some(src) = self.blocks.get(block).and_then(|b| b.get(offset..)) else {
            return Ok(0);
        };
        let n = dst.len().min(src.len());

        dst[..n].copy_from_slice(&src[..n]);

        Ok(n)
    }

    fn write_raw(
        &mut self,
        src: &[u8],
        block: usize,
        offset: usize,
    ) -> crate::errors::BlockResult<usize> {
        self.check_open()?;

        let Some(dst) = self
            .blocks
            .get_mut(block)
            .and_then(|b| b.get_mut(offset..))
        else {
            return Ok(0);
        };
        let n = src.len().min(dst.len());

        dst[..n].copy_from_slice(&src[..n]);

        Ok(n)
    }

    #[inline]
    fn set_len(&mut self, len: u64) {
        self.len = len;
    }

    #[inline]
    fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    fn block_count(&self) -> usize {
        self.blocks.len()
    }

    #[inline]
    fn is_closed(&self) -> bool {
        self.closed
    }

    fn close(&mut self) -> crate::errors::BlockResult<()> {
        self.check_open()?;

        tracing::debug!(blocks = self.blocks.len(), len = self.len, "closing block store");

        self.blocks = Vec::new();
        self.closed = true;

        Ok(())
    }

    fn dump(&self) -> String {
        let mut s = String::new();

        for (i, block) in self.blocks.iter().enumerate() {
            s.push_str(&format!("b[{i:02}]: \"{}\"\n", block.escape_ascii()));
        }

        s.push_str(&format!("len: {}\n", self.len));
        s.push_str(&format!("alloc: {}\n", self.capacity()));

        s
    }
}
