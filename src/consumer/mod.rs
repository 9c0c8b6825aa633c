pub mod dispatcher;

pub use dispatcher::{DrainStats, FrameDispatcher};

/// Receives complete frames extracted from a ring buffer. The delimiter is
/// not part of `frame`.
pub trait FrameConsumer: Send {
    fn consume(&mut self, frame: &[u8]) -> bool;

    fn flush(&mut self) {}

    fn name(&self) -> &str;
}
