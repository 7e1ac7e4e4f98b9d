use core::marker::PhantomData;
use core::mem::{align_of, size_of};
use core::ptr::NonNull;

use crate::error::PoolError;

/// Alignment of every block (and therefore every payload) in bytes.
pub const ALIGN: usize = 8;

/// Smallest block the pool hands out, header included.
pub const MIN_BLOCK: usize = 32;

/// Bytes reserved in front of every payload for the block header.
pub const HEADER_SIZE: usize = size_of::<BlockHeader>();

/// Free-list terminator.
const NIL: usize = usize::MAX;

const _: () = assert!(HEADER_SIZE % ALIGN == 0);
const _: () = assert!(align_of::<BlockHeader>() <= ALIGN);

/// Header stored in front of every block. `next` is the pool offset of the
/// next free block and is only meaningful while the block is on the free list.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
struct BlockHeader {
    size: usize,
    next: usize,
}

/// Round `n` up to a multiple of [`ALIGN`], or `None` on overflow.
const fn align_up(n: usize) -> Option<usize> {
    match n.checked_add(ALIGN - 1) {
        Some(padded) => Some(padded & !(ALIGN - 1)),
        None => None,
    }
}

/// Variable-size allocator over a pre-registered memory region.
///
/// Blocks are bump-allocated from the start of the region. A freed block is
/// pushed onto the head of a free list (LIFO) and handed out again to the
/// first later request it can hold (first-fit, not best-fit). Blocks are
/// never split or coalesced, so the pool suits a few same-sized
/// setup-time allocations rather than steady churn.
///
/// # Example
///
/// ```
/// use squelch_pool::Pool;
///
/// let mut memory = [0u8; 1024];
/// let mut pool = Pool::new(&mut memory);
///
/// let table = pool.allocate(256).unwrap();
/// assert!(pool.contains(table));
///
/// pool.free(table);
/// assert_eq!(pool.free_block_count(), 1);
///
/// // The recycled block is reused before the bump cursor moves.
/// let used = pool.used();
/// let again = pool.allocate(200).unwrap();
/// assert_eq!(again, table);
/// assert_eq!(pool.used(), used);
/// ```
pub struct Pool<'a> {
    /// First aligned byte of the registered region.
    base: NonNull<u8>,
    /// Usable bytes from `base`, rounded down to [`ALIGN`].
    capacity: usize,
    /// Bump cursor: bytes handed out from the start of the region.
    used: usize,
    /// Offset of the first free block, or [`NIL`].
    free_head: usize,
    _memory: PhantomData<&'a mut [u8]>,
}

impl<'a> Pool<'a> {
    /// Register `memory` as the pool region and reset the allocator.
    ///
    /// The start of the region is rounded up to [`ALIGN`]; any leading or
    /// trailing bytes that do not fit a whole alignment unit are unused.
    pub fn new(memory: &'a mut [u8]) -> Self {
        let len = memory.len();
        let offset = memory.as_ptr().align_offset(ALIGN).min(len);
        let aligned = &mut memory[offset..];
        let capacity = aligned.len() & !(ALIGN - 1);

        #[cfg(feature = "defmt")]
        defmt::info!("Pool registered: {} bytes usable", capacity);

        Self {
            base: NonNull::from(aligned).cast::<u8>(),
            capacity,
            used: 0,
            free_head: NIL,
            _memory: PhantomData,
        }
    }

    /// Forget every allocation: rewind the bump cursor and empty the free list.
    ///
    /// Pointers handed out before the reset must no longer be used.
    pub fn reset(&mut self) {
        self.used = 0;
        self.free_head = NIL;
    }

    // ── Allocation ───────────────────────────────────────────────────

    /// Reserve at least `size` bytes, aligned to [`ALIGN`].
    ///
    /// The request is grown by the header and rounded up to [`ALIGN`] and
    /// [`MIN_BLOCK`]. The free list is searched first; the bump region is
    /// used only when no recycled block is large enough.
    ///
    /// # Errors
    ///
    /// [`PoolError::OutOfMemory`] if neither a free block nor the bump
    /// region can hold the request. The failure is deterministic: the same
    /// request against the same pool state fails the same way every time.
    pub fn allocate(&mut self, size: usize) -> Result<NonNull<u8>, PoolError> {
        let available = self.remaining();
        let block_size = match size.checked_add(HEADER_SIZE).and_then(align_up) {
            Some(block) => block.max(MIN_BLOCK),
            None => {
                return Err(PoolError::OutOfMemory {
                    requested: size,
                    available,
                })
            }
        };

        if let Some(offset) = self.take_first_fit(block_size) {
            return Ok(self.payload(offset));
        }

        if block_size > available {
            #[cfg(feature = "defmt")]
            defmt::error!(
                "Pool exhausted: {} bytes requested, {} available",
                size,
                available
            );
            return Err(PoolError::OutOfMemory {
                requested: size,
                available,
            });
        }

        let offset = self.used;
        self.write_header(
            offset,
            BlockHeader {
                size: block_size,
                next: NIL,
            },
        );
        self.used += block_size;
        Ok(self.payload(offset))
    }

    /// Return a block to the free list.
    ///
    /// Pointers that were not handed out by this pool, or blocks that are
    /// already free, are ignored.
    pub fn free(&mut self, ptr: NonNull<u8>) {
        let Some(offset) = self.block_offset(ptr) else {
            #[cfg(feature = "defmt")]
            defmt::warn!("free: pointer does not belong to the pool");
            return;
        };

        if self.is_on_free_list(offset) {
            #[cfg(feature = "defmt")]
            defmt::warn!("free: block at offset {} is already free", offset);
            return;
        }

        let mut header = self.header(offset);
        header.next = self.free_head;
        self.write_header(offset, header);
        self.free_head = offset;
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// Returns `true` if `ptr` points into the allocated part of the region.
    pub fn contains(&self, ptr: NonNull<u8>) -> bool {
        let base = self.base.as_ptr() as usize;
        let addr = ptr.as_ptr() as usize;
        addr >= base && addr < base + self.used
    }

    /// Usable size of the region in bytes.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes consumed by the bump cursor, headers included.
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bytes still available to the bump cursor.
    pub fn remaining(&self) -> usize {
        self.capacity - self.used
    }

    /// Number of blocks waiting on the free list.
    pub fn free_block_count(&self) -> usize {
        let mut count = 0;
        let mut current = self.free_head;
        while current != NIL {
            count += 1;
            current = self.header(current).next;
        }
        count
    }

    // ── Private helpers ──────────────────────────────────────────────

    /// Unlink and return the first free block holding `block_size` bytes.
    fn take_first_fit(&mut self, block_size: usize) -> Option<usize> {
        let mut previous = NIL;
        let mut current = self.free_head;

        while current != NIL {
            let header = self.header(current);
            if header.size >= block_size {
                if previous == NIL {
                    self.free_head = header.next;
                } else {
                    let mut prev_header = self.header(previous);
                    prev_header.next = header.next;
                    self.write_header(previous, prev_header);
                }
                self.write_header(
                    current,
                    BlockHeader {
                        size: header.size,
                        next: NIL,
                    },
                );
                return Some(current);
            }
            previous = current;
            current = header.next;
        }

        None
    }

    /// Map a payload pointer back to its block offset, if it is the start of
    /// a block this pool handed out.
    fn block_offset(&self, ptr: NonNull<u8>) -> Option<usize> {
        if !self.contains(ptr) {
            return None;
        }
        let payload = ptr.as_ptr() as usize - self.base.as_ptr() as usize;
        let target = payload.checked_sub(HEADER_SIZE)?;

        // Blocks tile the bump region back to back.
        let mut offset = 0;
        while offset < self.used {
            if offset == target {
                return Some(offset);
            }
            let size = self.header(offset).size;
            if size == 0 {
                break;
            }
            offset += size;
        }
        None
    }

    fn is_on_free_list(&self, offset: usize) -> bool {
        let mut current = self.free_head;
        while current != NIL {
            if current == offset {
                return true;
            }
            current = self.header(current).next;
        }
        false
    }

    fn header(&self, offset: usize) -> BlockHeader {
        debug_assert!(offset + HEADER_SIZE <= self.used);
        // SAFETY: `offset` is the start of a block inside the bump region,
        // which lies within the registered slice. Block offsets are multiples
        // of ALIGN from an ALIGN-aligned base, satisfying BlockHeader's
        // alignment.
        unsafe { self.base.as_ptr().add(offset).cast::<BlockHeader>().read() }
    }

    fn write_header(&mut self, offset: usize, header: BlockHeader) {
        debug_assert!(offset + HEADER_SIZE <= self.capacity);
        // SAFETY: see `header`; the pool holds the region's unique borrow.
        unsafe {
            self.base
                .as_ptr()
                .add(offset)
                .cast::<BlockHeader>()
                .write(header)
        }
    }

    fn payload(&self, offset: usize) -> NonNull<u8> {
        // SAFETY: every block is at least MIN_BLOCK > HEADER_SIZE bytes and
        // lies inside the region, so the payload address is in bounds and
        // derived from a non-null base.
        unsafe { NonNull::new_unchecked(self.base.as_ptr().add(offset + HEADER_SIZE)) }
    }
}

impl core::fmt::Debug for Pool<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Pool")
            .field("capacity", &self.capacity)
            .field("used", &self.used)
            .field("free_blocks", &self.free_block_count())
            .finish()
    }
}

// ── Unit Tests ───────────────────────────────────────────────────────
