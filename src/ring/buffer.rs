use super::RingError;

/// Fixed-capacity circular byte buffer.
///
/// Valid data occupies `[head, head + count)` modulo the capacity. `count` is
/// authoritative; `head` and `tail` are kept consistent with it by every
/// mutating call, so `tail == (head + count) % capacity` always holds.
///
/// There is no internal synchronization. Callers sharing a buffer across
/// threads must hold a lock across compound sequences such as
/// [`peek`](RingBuffer::peek) followed by [`seek`](RingBuffer::seek).
#[derive(Debug, Clone)]
pub struct RingBuffer {
    pub(super) buf: Vec<u8>,
    pub(super) capacity: usize,
    pub(super) head: usize,
    pub(super) tail: usize,
    pub(super) count: usize,
}

impl Default for RingBuffer {
    fn default() -> Self {
        Self {
            buf: vec![0; Self::DEFAULT_CAPACITY],
            capacity: Self::DEFAULT_CAPACITY,
            head: 0,
            tail: 0,
            count: 0,
        }
    }
}

impl RingBuffer {
    pub const DEFAULT_CAPACITY: usize = 4096;

    pub fn new(capacity: usize) -> Result<Self, RingError> {
        if capacity == 0 {
            return Err(RingError::InvalidCapacity {
                capacity,
                reason: "must be greater than zero",
            });
        }

        Ok(Self {
            buf: vec![0; capacity],
            capacity,
            head: 0,
            tail: 0,
            count: 0,
        })
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline(always)]
    pub fn available(&self) -> usize {
        self.capacity - self.count
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    #[inline(always)]
    pub fn is_full(&self) -> bool {
        self.count == self.capacity
    }

    pub fn clear(&mut self) {
        self.buf.fill(0);
        self.head = 0;
        self.tail = 0;
        self.count = 0;
    }

    #[inline]
    pub fn at(&self, index: usize) -> Result<u8, RingError> {
        if index >= self.count {
            return Err(RingError::OutOfRange {
                index,
                count: self.count,
            });
        }

        Ok(self.buf[self.advance(self.head, index)])
    }

    /// Logical index of the first `byte` at or after logical index `from`.
    pub fn position(&self, byte: u8, from: usize) -> Option<usize> {
        if from >= self.count {
            return None;
        }

        let (first, second) = self.segments();
        if from < first.len() {
            first[from..]
                .iter()
                .position(|&b| b == byte)
                .map(|i| from + i)
                .or_else(|| {
                    second
                        .iter()
                        .position(|&b| b == byte)
                        .map(|i| first.len() + i)
                })
        } else {
            second[from - first.len()..]
                .iter()
                .position(|&b| b == byte)
                .map(|i| from + i)
        }
    }

    // `by` must not exceed the capacity.
    #[inline(always)]
    pub(super) fn advance(&self, pos: usize, by: usize) -> usize {
        let contiguous = self.capacity - pos;
        if by < contiguous {
            pos + by
        } else {
            by - contiguous
        }
    }

    /// Buffered bytes as two physical runs: head up to the end of storage,
    /// then the wrapped remainder (possibly empty).
    #[inline]
    pub(super) fn segments(&self) -> (&[u8], &[u8]) {
        let contiguous = self.capacity - self.head;
        if self.count <= contiguous {
            (&self.buf[self.head..self.head + self.count], &[])
        } else {
            (&self.buf[self.head..], &self.buf[..self.count - contiguous])
        }
    }
}
