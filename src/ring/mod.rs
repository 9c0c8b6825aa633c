pub mod buffer;
pub mod ring_error;
pub mod transfer;

pub use buffer::RingBuffer;
pub use ring_error::*;
