use crate::block::store::BlockStore;
use crate::enums::ReadOutcome;
use crate::errors::{BlockError, BlockResult};

/// An editable byte buffer laid out over fixed-size blocks.
///
/// - Streaming `read`/`write` move the cursor; `read_at`/`write_at` never do.
/// - `insert`/`delete` shift the tail in block-sized chunks and leave the
///   cursor where it was.
/// - The store may be owned (`FixedStore`, `LineCounter`), borrowed
///   (`&mut S`) or boxed (`Box<dyn BlockStore>`).
#[derive(Debug)]
pub struct EditableBuffer<S = crate::block::fixed::FixedStore> {
    store: S,
    /// Current stream position. May sit past the logical length after a seek.
    cursor: u64,
    /// Always `Address::of(cursor)`.
    cursor_addr: crate::block::address::Address,
}

/*

====================================
========= CREATION METHOD ==========
====================================

*/

impl EditableBuffer {
    /// Creates an empty buffer over a fresh in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_store(crate::block::fixed::FixedStore::new())
    }
}

impl Default for EditableBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: BlockStore> EditableBuffer<S> {
    /// Wraps an existing store with the cursor at offset 0.
    pub fn with_store(store: S) -> Self {
        Self {
            store,
            cursor: 0,
            cursor_addr: crate::block::address::Address::default(),
        }
    }
}

/*

==========================
===== INLINE METHODS =====
==========================

*/

impl<S: BlockStore> EditableBuffer<S> {
    /// Logical length in bytes.
    #[inline]
    pub fn len(&self) -> u64 {
        self.store.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Current stream position.
    #[inline]
    pub fn position(&self) -> u64 {
        self.cursor
    }

    /// Block address of the current stream position.
    #[inline]
    pub fn cursor_address(&self) -> crate::block::address::Address {
        self.cursor_addr
    }

    #[inline]
    pub fn store(&self) -> &S {
        &self.store
    }

    #[inline]
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    #[inline]
    pub fn into_inner(self) -> S {
        self.store
    }

    #[inline]
    fn check_open(&self) -> BlockResult<()> {
        if self.store.is_closed() {
            return Err(BlockError::ClosedStore);
        }

        Ok(())
    }

    #[inline]
    fn check_in_range(&self, offset: u64) -> BlockResult<()> {
        let len = self.store.len();

        if offset > len {
            return Err(BlockError::OutOfRange { offset, len });
        }

        Ok(())
    }

    fn set_cursor(&mut self, cursor: u64) -> BlockResult<()> {
        self.cursor_addr = self.store.address(cursor)?;
        self.cursor = cursor;

        Ok(())
    }
}

/*

=========================================
========= STREAM & POSITIONED IO ========
=========================================

*/

impl<S: BlockStore> EditableBuffer<S> {
    /// Moves the cursor with `lseek` rules and returns the new absolute offset.
    ///
    /// Seeking past the end is allowed: reads there report end of data and
    /// writes grow the store, leaving the skipped bytes unspecified.
    ///
    /// # Errors
    ///
    /// `InvalidOffset` if the target resolves below zero; the cursor is left as is.
    pub fn seek(&mut self, offset: i64, whence: crate::enums::Whence) -> BlockResult<u64> {
        self.check_open()?;

        let base = match whence {
            crate::enums::Whence::Start => 0,
            crate::enums::Whence::Current => <u64 as TryInto<i64>>::try_into(self.cursor)?,
            crate::enums::Whence::End => <u64 as TryInto<i64>>::try_into(self.store.len())?,
        };
        let target = base.checked_add(offset).ok_or(BlockError::Overflow)?;

        if target < 0 {
            return Err(BlockError::InvalidOffset(target));
        }

        let target = <i64 as TryInto<u64>>::try_into(target)?;

        self.set_cursor(target)?;

        Ok(target)
    }

    /// Reads from `at` without moving the cursor.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `at` is past the logical length.
    pub fn read_at(&self, dst: &mut [u8], at: u64) -> BlockResult<ReadOutcome> {
        self.check_open()?;
        self.check_in_range(at)?;

        self.read_region(dst, at)
    }

    /// Overwrites or appends at `at` without moving the cursor, growing the
    /// store as needed.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `at` is past the logical length; writes cannot open a gap.
    pub fn write_at(&mut self, src: &[u8], at: u64) -> BlockResult<usize> {
        self.check_open()?;
        self.check_in_range(at)?;

        self.write_region(src, at)
    }

    /// Reads at the cursor and advances it by the number of bytes copied.
    pub fn read(&mut self, dst: &mut [u8]) -> BlockResult<ReadOutcome> {
        self.check_open()?;

        let outcome = self.read_region(dst, self.cursor)?;
        let n = <usize as TryInto<u64>>::try_into(outcome.len())?;

        self.set_cursor(self.cursor + n)?;

        Ok(outcome)
    }

    /// Writes at the cursor and advances it by the number of bytes written.
    pub fn write(&mut self, src: &[u8]) -> BlockResult<usize> {
        self.check_open()?;

        let n = self.write_region(src, self.cursor)?;

        self.set_cursor(self.cursor + <usize as TryInto<u64>>::try_into(n)?)?;

        Ok(n)
    }

    fn read_region(&self, dst: &mut [u8], mut at: u64) -> BlockResult<ReadOutcome> {
        let len = self.store.len();
        let mut addr = self.store.address(at)?;
        let mut n = 0;

        loop {
            if at >= len {
                return Ok(ReadOutcome::EndOfData(n));
            }

            let remaining = <u64 as TryInto<usize>>::try_into(len - at).unwrap_or(usize::MAX);
            let want = (dst.len() - n).min(remaining);

            if want == 0 {
                return Ok(ReadOutcome::Filled(n));
            }

            let m = self
                .store
                .read_raw(&mut dst[n..n + want], addr.block, addr.offset)?;

            if m == 0 {
                return Err(BlockError::IndexOutOfBounds(addr.block));
            }

            n += m;
            at += <usize as TryInto<u64>>::try_into(m)?;
            addr.advance(m);
        }
    }

    fn write_region(&mut self, src: &[u8], at: u64) -> BlockResult<usize> {
        if src.is_empty() {
            return Ok(0);
        }

        let end = at
            .checked_add(<usize as TryInto<u64>>::try_into(src.len())?)
            .ok_or(BlockError::Overflow)?;

        self.store.ensure(end)?;

        let mut addr = self.store.address(at)?;
        let mut n = 0;

        while n < src.len() {
            let m = self.store.write_raw(&src[n..], addr.block, addr.offset)?;

            if m == 0 {
                return Err(BlockError::IndexOutOfBounds(addr.block));
            }

            n += m;
            addr.advance(m);
        }

        if end > self.store.len() {
            self.store.set_len(end);
        }

        Ok(n)
    }
}

/*

========================================
========= INSERTION & DELETION =========
========================================

*/

impl<S: BlockStore> EditableBuffer<S> {
    /// Inserts `data` at `at`, shifting `[at, len)` right by `data.len()`.
    ///
    /// The store grows by exactly `data.len()` bytes. Inserting at `len` appends.
    ///
    /// # Errors
    ///
    /// `OutOfRange` if `at` is past the logical length.
    pub fn insert(&mut self, data: &[u8], at: u64) -> BlockResult<usize> {
        self.check_open()?;
        self.check_in_range(at)?;

        if data.is_empty() {
            return Ok(0);
        }

        let len = self.store.len();
        let growth = <usize as TryInto<u64>>::try_into(data.len())?;
        let new_len = len.checked_add(growth).ok_or(BlockError::Overflow)?;

        self.store.ensure(new_len)?;

        // Walk the tail from the highest offset down so no source byte is
        // overwritten before it has been copied.
        let mut tmp = vec![0u8; crate::block::BLOCK_SIZE];
        let mut end = len;

        while end > at {
            let start = end
                .saturating_sub(crate::block::BLOCK_SIZE as u64)
                .max(at);
            let chunk = &mut tmp[..<u64 as TryInto<usize>>::try_into(end - start)?];
            let got = self.read_region(chunk, start)?.len();

            debug_assert_eq!(got, chunk.len());

            self.write_region(&chunk[..got], start + growth)?;
            end = start;
        }

        let n = self.write_region(data, at)?;

        self.store.set_len(new_len);

        Ok(n)
    }

    /// Removes `[q0, q1)`, shifting `[q1, len)` left to start at `q0`.
    /// Returns the number of bytes removed; `delete(q, q)` is a no-op.
    ///
    /// Capacity is never reclaimed.
    ///
    /// # Errors
    ///
    /// `OutOfRange` unless `q0 <= q1 <= len`.
    pub fn delete(&mut self, q0: u64, q1: u64) -> BlockResult<u64> {
        self.check_open()?;
        self.check_in_range(q1)?;

        if q0 > q1 {
            return Err(BlockError::OutOfRange {
                offset: q0,
                len: self.store.len(),
            });
        }

        if q0 == q1 {
            return Ok(0);
        }

        let len = self.store.len();
        let removed = q1 - q0;
        let mut tmp = vec![0u8; crate::block::BLOCK_SIZE];
        let mut src = q1;

        while src < len {
            let chunk_len = <u64 as TryInto<usize>>::try_into(
                (len - src).min(crate::block::BLOCK_SIZE as u64),
            )?;
            let got = self.read_region(&mut tmp[..chunk_len], src)?.len();

            self.write_region(&tmp[..got], src - removed)?;
            src += <usize as TryInto<u64>>::try_into(got)?;
        }

        self.store.set_len(len - removed);

        Ok(removed)
    }
}

/*

===============================
========= MISCELLANEOUS =======
===============================

*/

impl<S: BlockStore> EditableBuffer<S> {
    /// Copies the whole logical content out. The cursor does not move.
    pub fn to_bytes(&self) -> BlockResult<Vec<u8>> {
        self.check_open()?;

        let mut out = vec![0u8; <u64 as TryInto<usize>>::try_into(self.store.len())?];
        let n = self.read_region(&mut out, 0)?.len();

        out.truncate(n);

        Ok(out)
    }

    /// Releases the underlying store. Every later operation fails with `ClosedStore`.
    pub fn close(&mut self) -> BlockResult<()> {
        self.store.close()
    }

    /// Diagnostic listing of the store followed by the cursor state.
    pub fn dump(&self) -> String {
        let mut s = self.store.dump();

        s.push_str(&format!("p: {}\n", self.cursor));
        s.push_str(&format!("bp: {}\n", self.cursor_addr.offset));
        s.push_str(&format!("bn: {}\n", self.cursor_addr.block));

        s
    }
}

impl<S: BlockStore> std::fmt::Display for EditableBuffer<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = match self.to_bytes() {
            Ok(bytes) => bytes,
            Err(BlockError::ClosedStore) => return Ok(()),
            Err(_) => return Err(std::fmt::Error),
        };

        write!(f, "{}", String::from_utf8_lossy(&bytes))
    }
}


#[cfg(test)]
mod editable_buffer_editing_tests {
    use super::*;
    use crate::block::BLOCK_SIZE;

    fn check_data<S: BlockStore>(buffer: &EditableBuffer<S>, want: &str) {
        assert_eq!(buffer.len(), want.len() as u64, "{}", buffer.dump());
        assert_eq!(buffer.to_string(), want, "{}", buffer.dump());
    }

    #[test]
    fn test_insert_sequence() {
        let mut buffer = EditableBuffer::new();

        buffer.insert(b"the", 0).unwrap();
        assert_eq!(buffer.len(), 3);
        buffer.insert(b" quick", 3).unwrap();
        assert_eq!(buffer.len(), 9);
        buffer.insert(b" brown", 9).unwrap();
        buffer.insert(b" fox", 15).unwrap();
        check_data(&buffer, "the quick brown fox");

        buffer.insert(b"the", 0).unwrap();
        buffer.insert(b" quick", 3).unwrap();
        buffer.insert(b" brown", 9).unwrap();
        buffer.insert(b" fox", 15).unwrap();
        check_data(&buffer, "the quick brown foxthe quick brown fox");

        buffer.insert(b" fox", 0).unwrap();
        check_data(&buffer, " foxthe quick brown foxthe quick brown fox");
    }

    #[test]
    fn test_insert_then_delete_scenario() {
        let mut buffer = EditableBuffer::new();

        buffer.insert(b"the", 0).unwrap();
        buffer.insert(b" quick", 3).unwrap();
        check_data(&buffer, "the quick");

        assert_eq!(buffer.delete(3, 9).unwrap(), 6);
        check_data(&buffer, "the");
    }

    #[test]
    fn test_write_insert_delete_scenario() {
        let mut buffer = EditableBuffer::new();

        buffer.write_at(b"g", 0).unwrap();
        buffer.write_at(b"o", 1).unwrap();
        check_data(&buffer, "go");

        assert_eq!(buffer.insert(b"@", 0).unwrap(), 1);
        check_data(&buffer, "@go");

        assert_eq!(buffer.delete(0, 1).unwrap(), 1);
        check_data(&buffer, "go");
    }

    #[test]
    fn test_delete_sequence() {
        let mut buffer = EditableBuffer::new();
        buffer
            .insert(b"the quick brown fox jumps over the lazy dog", 0)
            .unwrap();

        buffer.delete(1, 2).unwrap();
        check_data(&buffer, "te quick brown fox jumps over the lazy dog");
        assert_eq!(buffer.delete(0, 0).unwrap(), 0);
        check_data(&buffer, "te quick brown fox jumps over the lazy dog");
        buffer.delete(0, 1).unwrap();
        check_data(&buffer, "e quick brown fox jumps over the lazy dog");
        buffer.delete(0, 17).unwrap();
        check_data(&buffer, " jumps over the lazy dog");
        buffer.delete(0, 17).unwrap();
        check_data(&buffer, "azy dog");
    }

    #[test]
    fn test_delete_tail() {
        let mut buffer = EditableBuffer::new();
        buffer.write(b"hello world").unwrap();

        assert_eq!(buffer.delete(5, 11).unwrap(), 6);
        check_data(&buffer, "hello");
    }

    #[test]
    fn test_delete_keeps_capacity() {
        let mut buffer = EditableBuffer::new();
        buffer.write(&vec![b'a'; 3 * BLOCK_SIZE]).unwrap();
        let capacity = buffer.store().capacity();

        buffer.delete(0, buffer.len()).unwrap();

        assert!(buffer.is_empty());
        assert_eq!(buffer.store().capacity(), capacity);
    }

    #[test]
    fn test_insert_and_delete_across_blocks() {
        let head: Vec<u8> = (0..BLOCK_SIZE + 100).map(|i| b'a' + (i % 26) as u8).collect();
        let tail: Vec<u8> = (0..2 * BLOCK_SIZE + 7).map(|i| b'0' + (i % 10) as u8).collect();
        let middle = vec![b'#'; BLOCK_SIZE + 3];

        let mut buffer = EditableBuffer::new();
        buffer.write(&head).unwrap();
        buffer.write(&tail).unwrap();

        let at = head.len() as u64;
        assert_eq!(buffer.insert(&middle, at).unwrap(), middle.len());

        let mut want = head.clone();
        want.extend_from_slice(&middle);
        want.extend_from_slice(&tail);
        assert_eq!(buffer.to_bytes().unwrap(), want);

        let removed = buffer.delete(at, at + middle.len() as u64).unwrap();
        assert_eq!(removed, middle.len() as u64);

        let mut want = head;
        want.extend_from_slice(&tail);
        assert_eq!(buffer.to_bytes().unwrap(), want);
    }

    #[test]
    fn test_insert_leaves_cursor() {
        let mut buffer = EditableBuffer::new();
        buffer.write(b"abc").unwrap();

        buffer.insert(b"xyz", 0).unwrap();

        assert_eq!(buffer.position(), 3);
        check_data(&buffer, "xyzabc");
    }

    #[test]
    fn test_edits_outside_length_fail() {
        let mut buffer = EditableBuffer::new();
        buffer.write(b"abc").unwrap();

        assert!(matches!(
            buffer.insert(b"x", 4),
            Err(BlockError::OutOfRange { offset: 4, len: 3 })
        ));
        assert!(matches!(
            buffer.delete(1, 4),
            Err(BlockError::OutOfRange { offset: 4, len: 3 })
        ));
        assert!(matches!(
            buffer.delete(2, 1),
            Err(BlockError::OutOfRange { offset: 2, len: 3 })
        ));
        check_data(&buffer, "abc");
    }

    #[test]
    fn test_boxed_line_counter_store() {
        let store: Box<dyn BlockStore> = Box::new(crate::line::counter::LineCounter::new());
        let mut buffer = EditableBuffer::with_store(store);

        buffer.insert(b"the", 0).unwrap();
        buffer.insert(b" quick", 3).unwrap();
        buffer.delete(3, 9).unwrap();

        check_data(&buffer, "the");
    }
}

#[cfg(test)]
mod editable_buffer_model_tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    /// Applies random inserts and deletes to `buffer` and to a plain `Vec<u8>`,
    /// checking after each step that both agree.
    fn run_against_model<S: BlockStore>(mut buffer: EditableBuffer<S>, seed: u64) {
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut model: Vec<u8> = Vec::new();

        for _ in 0..300 {
            let len = model.len();

            if len == 0 || rng.gen_bool(0.6) {
                let at = rng.gen_range(0..=len);
                let size = rng.gen_range(0..=3 * crate::block::BLOCK_SIZE / 2);
                let data: Vec<u8> = (0..size)
                    .map(|_| {
                        if rng.gen_ratio(1, 16) {
                            b'\n'
                        } else {
                            rng.gen_range(b'a'..=b'z')
                        }
                    })
                    .collect();

                let n = buffer.insert(&data, at as u64).unwrap();
                assert_eq!(n, data.len());
                model.splice(at..at, data);
            } else {
                let q0 = rng.gen_range(0..=len);
                let q1 = rng.gen_range(q0..=len);

                let removed = buffer.delete(q0 as u64, q1 as u64).unwrap();
                assert_eq!(removed, (q1 - q0) as u64);
                model.drain(q0..q1);
            }

            assert_eq!(buffer.len(), model.len() as u64);
        }

        assert_eq!(buffer.to_bytes().unwrap(), model);
    }

    #[test]
    fn test_fixed_store_matches_model() {
        run_against_model(EditableBuffer::new(), 0x5eed);
    }

    #[test]
    fn test_line_counter_matches_model() {
        run_against_model(
            EditableBuffer::with_store(crate::line::counter::LineCounter::new()),
            0xb10c,
        );
    }
}
