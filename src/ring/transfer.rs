use super::RingError;
use crate::ring::RingBuffer;

impl RingBuffer {
    /// Appends all of `data`, or nothing.
    ///
    /// Fails with [`RingError::Overflow`] when `data` does not fit in the free
    /// space; the buffer is left untouched in that case.
    #[inline]
    pub fn write(&mut self, data: &[u8]) -> Result<(), RingError> {
        let len = data.len();
        let available = self.available();

        if len > available {
            return Err(RingError::Overflow {
                required: len,
                available,
            });
        }
        if len == 0 {
            return Ok(());
        }

        let start = self.tail;
        let contiguous = self.capacity - start;

        if len <= contiguous {
            self.buf[start..start + len].copy_from_slice(data);
        } else {
            let (first_chunk, second_chunk) = data.split_at(contiguous);
            self.buf[start..].copy_from_slice(first_chunk);
            self.buf[..second_chunk.len()].copy_from_slice(second_chunk);
        }

        self.tail = self.advance(start, len);
        self.count += len;
        Ok(())
    }

    #[inline]
    pub fn write_byte(&mut self, byte: u8) -> Result<(), RingError> {
        if self.is_full() {
            return Err(RingError::Overflow {
                required: 1,
                available: 0,
            });
        }

        self.buf[self.tail] = byte;
        self.tail = self.advance(self.tail, 1);
        self.count += 1;
        Ok(())
    }

    #[inline]
    pub fn peek(&self, len: usize) -> Option<Vec<u8>> {
        self.peek_at(len, 0)
    }

    /// Copies `len` bytes starting `offset` bytes after the head, without
    /// consuming them. Returns `None` when `offset + len` exceeds the
    /// buffered bytes.
    pub fn peek_at(&self, len: usize, offset: usize) -> Option<Vec<u8>> {
        let end = offset.checked_add(len)?;
        if end > self.count {
            return None;
        }

        let mut out = vec![0u8; len];
        self.copy_out(offset, &mut out);
        Some(out)
    }

    /// Fails with [`RingError::NotEnoughData`] when fewer than `len` bytes are
    /// buffered; nothing is consumed in that case.
    #[inline]
    pub fn seek(&mut self, len: usize) -> Result<(), RingError> {
        if len > self.count {
            return Err(RingError::NotEnoughData {
                requested: len,
                available: self.count,
            });
        }

        self.consume(len);
        Ok(())
    }

    /// Requests larger than the buffered amount are clamped, not rejected.
    #[inline]
    pub fn read(&mut self, len: usize) -> Vec<u8> {
        let to_read = len.min(self.count);
        let mut out = vec![0u8; to_read];

        if to_read > 0 {
            self.copy_out(0, &mut out);
            self.consume(to_read);
        }

        out
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let (first, second) = self.segments();
        let mut out = Vec::with_capacity(self.count);
        out.extend_from_slice(first);
        out.extend_from_slice(second);
        out
    }

    #[inline(always)]
    fn consume(&mut self, len: usize) {
        self.head = self.advance(self.head, len);
        self.count -= len;
    }

    /// Fills `dst` from logical `offset`. The caller guarantees
    /// `offset + dst.len() <= count`.
    #[inline]
    fn copy_out(&self, offset: usize, dst: &mut [u8]) {
        let len = dst.len();
        if len == 0 {
            return;
        }

        let start = self.advance(self.head, offset);
        let contiguous = self.capacity - start;

        if len <= contiguous {
            dst.copy_from_slice(&self.buf[start..start + len]);
        } else {
            let (first_chunk, second_chunk) = dst.split_at_mut(contiguous);
            first_chunk.copy_from_slice(&self.buf[start..]);
            let rest = second_chunk.len();
            second_chunk.copy_from_slice(&self.buf[..rest]);
        }
    }
}
