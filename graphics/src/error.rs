//! Graphics error types.

use std::fmt;

/// Errors that can occur in the graphics system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsError {
    /// Out of GPU memory.
    OutOfMemory,
    /// The GPU device was lost.
    DeviceLost,
    /// An invalid parameter was provided.
    InvalidParameter(String),
    /// A buffer handle does not refer to a live buffer.
    InvalidHandle(u64),
    /// The device cannot be reset while device objects are still alive.
    ResourcesOutstanding(usize),
}

impl fmt::Display for GraphicsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory => write!(f, "out of GPU memory"),
            Self::DeviceLost => write!(f, "GPU device lost"),
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            Self::InvalidHandle(id) => write!(f, "invalid buffer handle: {id}"),
            Self::ResourcesOutstanding(count) => {
                write!(f, "device reset with {count} device objects still alive")
            }
        }
    }
}

impl std::error::Error for GraphicsError {}
