use core::marker::PhantomData;
use core::ptr::NonNull;

use heapless::Vec;

use crate::error::PoolError;
use crate::pool::ALIGN;

/// Fixed-block allocator: the region is divided into `N` equal blocks.
///
/// Allocation pops a block index off a free stack and release pushes it
/// back, so both are O(1) and the pool never fragments. Any request larger
/// than [`block_size()`](Self::block_size) fails with
/// [`PoolError::BlockTooLarge`].
///
/// Use this variant when every setup-time buffer is known to be the same
/// size or smaller, e.g. the two transform buffers of a filter stage.
///
/// # Example
///
/// ```
/// use squelch_pool::{BlockPool, PoolError};
///
/// let mut memory = [0u8; 1024];
/// let mut pool: BlockPool<'_, 4> = BlockPool::new(&mut memory);
/// let size = pool.block_size();
///
/// let a = pool.allocate(size).unwrap();
/// assert_eq!(pool.available(), 3);
/// assert!(matches!(pool.allocate(size + 1), Err(PoolError::BlockTooLarge { .. })));
///
/// pool.free(a);
/// assert_eq!(pool.available(), 4);
/// ```
pub struct BlockPool<'a, const N: usize> {
    base: NonNull<u8>,
    block_size: usize,
    free: Vec<usize, N>,
    in_use: [bool; N],
    _memory: PhantomData<&'a mut [u8]>,
}

impl<'a, const N: usize> BlockPool<'a, N> {
    /// Split `memory` into `N` blocks of equal, [`ALIGN`]-rounded size.
    pub fn new(memory: &'a mut [u8]) -> Self {
        let len = memory.len();
        let offset = memory.as_ptr().align_offset(ALIGN).min(len);
        let aligned = &mut memory[offset..];
        let block_size = if N == 0 {
            0
        } else {
            (aligned.len() / N) & !(ALIGN - 1)
        };

        let mut pool = Self {
            base: NonNull::from(aligned).cast::<u8>(),
            block_size,
            free: Vec::new(),
            in_use: [false; N],
            _memory: PhantomData,
        };
        pool.reset();

        #[cfg(feature = "defmt")]
        defmt::info!("BlockPool registered: {} blocks of {} bytes", N, block_size);

        pool
    }

    /// Mark every block free again. Outstanding pointers become invalid.
    pub fn reset(&mut self) {
        self.free.clear();
        self.in_use = [false; N];
        // A region too small for one aligned block has nothing to hand out.
        if self.block_size == 0 {
            return;
        }
        // Lowest index is popped first.
        for index in (0..N).rev() {
            // Capacity is exactly N, so this cannot fail.
            let _ = self.free.push(index);
        }
    }

    /// Take one block for a request of `size` bytes.
    ///
    /// # Errors
    ///
    /// * [`PoolError::BlockTooLarge`] if `size` exceeds the block size.
    /// * [`PoolError::OutOfMemory`] if every block is in use (or the region
    ///   was too small to hold a single aligned block).
    pub fn allocate(&mut self, size: usize) -> Result<NonNull<u8>, PoolError> {
        if size > self.block_size {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "BlockPool: {} bytes requested, block size is {}",
                size,
                self.block_size
            );
            return Err(PoolError::BlockTooLarge {
                requested: size,
                block_size: self.block_size,
            });
        }

        let Some(index) = self.free.pop() else {
            #[cfg(feature = "defmt")]
            defmt::error!("BlockPool exhausted");
            return Err(PoolError::OutOfMemory {
                requested: size,
                available: 0,
            });
        };
        self.in_use[index] = true;

        // SAFETY: index < N and N * block_size fits inside the region.
        Ok(unsafe { NonNull::new_unchecked(self.base.as_ptr().add(index * self.block_size)) })
    }

    /// Return a block. Foreign, misaligned or already-free pointers are ignored.
    pub fn free(&mut self, ptr: NonNull<u8>) {
        let Some(index) = self.block_index(ptr) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("BlockPool::free: pointer does not belong to the pool");
            return;
        };
        if !self.in_use[index] {
            #[cfg(feature = "defmt")]
            defmt::warn!("BlockPool::free: block {} is already free", index);
            return;
        }
        self.in_use[index] = false;
        let _ = self.free.push(index);
    }

    /// Size of every block in bytes.
    pub fn block_size(&self) -> usize {
        self.block_size
    }

    /// Number of blocks not currently handed out.
    pub fn available(&self) -> usize {
        self.free.len()
    }

    fn block_index(&self, ptr: NonNull<u8>) -> Option<usize> {
        if self.block_size == 0 {
            return None;
        }
        let offset = (ptr.as_ptr() as usize).checked_sub(self.base.as_ptr() as usize)?;
        if offset % self.block_size != 0 {
            return None;
        }
        let index = offset / self.block_size;
        (index < N).then_some(index)
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
