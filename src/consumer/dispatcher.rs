use super::FrameConsumer;
use crate::ring::RingBuffer;
use log::{debug, warn};

/// Splits delimiter-terminated frames out of a [`RingBuffer`] and fans them
/// out to every registered consumer.
///
/// Frames are located with a non-destructive scan, copied with `peek` and
/// only then committed with `seek`, so a partial frame stays buffered until
/// its delimiter arrives. The dispatcher remembers how far it has scanned; a
/// ring that shrank below that point restarts the scan from the head.
pub struct FrameDispatcher {
    consumers: Vec<Box<dyn FrameConsumer>>,
    delimiter: u8,
    scanned: usize,
}

impl Default for FrameDispatcher {
    fn default() -> Self {
        Self::new(b'\n')
    }
}

impl FrameDispatcher {
    pub fn new(delimiter: u8) -> Self {
        Self {
            consumers: Vec::new(),
            delimiter,
            scanned: 0,
        }
    }

    pub fn add_consumer<C: FrameConsumer + 'static>(&mut self, consumer: C) {
        self.consumers.push(Box::new(consumer));
    }

    #[inline]
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    #[inline]
    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    /// Forgets the scan position. Needed when the ring was consumed and then
    /// refilled past the old scan point behind the dispatcher's back.
    pub fn reset(&mut self) {
        self.scanned = 0;
    }

    #[inline]
    pub fn drain(&mut self, ring: &mut RingBuffer) -> DrainStats {
        let mut stats = DrainStats::default();
        while let Some(frame) = self.next_frame(ring, &mut stats) {
            self.deliver(&frame, &mut stats);
        }
        for consumer in &mut self.consumers {
            consumer.flush();
        }
        if stats.frames_read > 0 {
            debug!(
                "drained {} frames ({} delivered, {} failed), {} bytes left",
                stats.frames_read,
                stats.frames_delivered,
                stats.frames_failed,
                ring.len()
            );
        }
        stats
    }

    #[inline]
    pub fn drain_batch(&mut self, ring: &mut RingBuffer, limit: usize) -> DrainStats {
        let mut stats = DrainStats::default();
        for _ in 0..limit {
            let Some(frame) = self.next_frame(ring, &mut stats) else {
                break;
            };
            self.deliver(&frame, &mut stats);
        }
        stats
    }

    fn next_frame(&mut self, ring: &mut RingBuffer, stats: &mut DrainStats) -> Option<Vec<u8>> {
        if ring.len() < self.scanned {
            // Someone else consumed from this ring; the old scan point is stale.
            self.scanned = 0;
        }
        match ring.position(self.delimiter, self.scanned) {
            Some(end) => {
                let frame = ring.peek(end)?;
                ring.seek(end + 1).ok()?;
                self.scanned = 0;
                stats.frames_read += 1;
                Some(frame)
            }
            None if ring.is_full() => {
                // No delimiter fits anymore; the frame can never complete.
                let dropped = ring.len();
                warn!(
                    "ring full ({} bytes) without delimiter 0x{:02x}, discarding",
                    dropped, self.delimiter
                );
                ring.seek(dropped).ok()?;
                self.scanned = 0;
                stats.bytes_dropped += dropped as u64;
                None
            }
            None => {
                self.scanned = ring.len();
                None
            }
        }
    }

    fn deliver(&mut self, frame: &[u8], stats: &mut DrainStats) {
        for consumer in &mut self.consumers {
            if consumer.consume(frame) {
                stats.frames_delivered += 1;
            } else {
                let name = consumer.name();
                debug!("consumer {} rejected a {} byte frame", name, frame.len());
                stats.frames_failed += 1;
            }
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DrainStats {
    pub frames_read: u64,
    pub frames_delivered: u64,
    pub frames_failed: u64,
    pub bytes_dropped: u64,
}

impl DrainStats {
    #[inline]
    pub fn success_rate(&self) -> f64 {
        let total = self.frames_delivered + self.frames_failed;
        if total == 0 {
            1.0
        } else {
            self.frames_delivered as f64 / total as f64
        }
    }

    pub fn merge(&mut self, other: DrainStats) {
        self.frames_read += other.frames_read;
        self.frames_delivered += other.frames_delivered;
        self.frames_failed += other.frames_failed;
        self.bytes_dropped += other.bytes_dropped;
    }
}
