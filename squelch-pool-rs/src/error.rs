//! Error types for the memory pools.

use core::fmt;

/// Errors returned by [`Pool`](crate::Pool) and [`BlockPool`](crate::BlockPool).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PoolError {
    /// No free block fits and the bump region cannot hold the request.
    OutOfMemory {
        /// Payload size the caller asked for, in bytes.
        requested: usize,
        /// Bytes left in the bump region at the time of the request.
        available: usize,
    },
    /// Request exceeds the fixed block size of a [`BlockPool`](crate::BlockPool).
    BlockTooLarge {
        /// Payload size the caller asked for, in bytes.
        requested: usize,
        /// Size of every block in the pool, in bytes.
        block_size: usize,
    },
}

impl fmt::Display for PoolError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PoolError::OutOfMemory {
                requested,
                available,
            } => write!(
                f,
                "Out of pool memory ({} bytes requested, {} available)",
                requested, available
            ),
            PoolError::BlockTooLarge {
                requested,
                block_size,
            } => write!(
                f,
                "Request of {} bytes exceeds block size {}",
                requested, block_size
            ),
        }
    }
}
