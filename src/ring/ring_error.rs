use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingError {
    /// Indexed access past the buffered bytes.
    OutOfRange {
        index: usize,
        count: usize,
    },
    /// Write larger than the free space. Nothing was written.
    Overflow {
        required: usize,
        available: usize,
    },
    /// Seek past the buffered bytes. Nothing was consumed.
    NotEnoughData {
        requested: usize,
        available: usize,
    },
    InvalidCapacity {
        capacity: usize,
        reason: &'static str,
    },
}

impl fmt::Display for RingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { index, count } => {
                write!(
                    f,
                    "Index {} out of range: ring buffer holds {} bytes",
                    index, count
                )
            }
            Self::Overflow {
                required,
                available,
            } => {
                write!(
                    f,
                    "Ring buffer overflow: required {} bytes, available {} bytes",
                    required, available
                )
            }
            Self::NotEnoughData {
                requested,
                available,
            } => {
                write!(
                    f,
                    "Not enough data in ring buffer: requested {} bytes, buffered {} bytes",
                    requested, available
                )
            }
            Self::InvalidCapacity { capacity, reason } => {
                write!(f, "Invalid capacity {}: {}", capacity, reason)
            }
        }
    }
}

impl std::error::Error for RingError {}
