//! Chunked bump allocator for transient byte buffers.
//!
//! # Responsibility
//! - Hand out fixed-size byte regions carved from equally sized chunks.
//! - Recycle every chunk in bulk on `reset` without freeing memory.
//!
//! # Invariants
//! - `used <= capacity` holds for every chunk at all times.
//! - A region never spans two chunks.
//! - Regions from before a `reset` are rejected as stale.
//! - Regions are only honored by the arena that issued them.

use log::trace;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ARENA_ID: AtomicU64 = AtomicU64::new(1);

/// Chunk capacity used when no configuration overrides it.
pub const DEFAULT_CHUNK_CAPACITY: usize = 1024;

pub type ArenaResult<T> = Result<T, ArenaError>;

/// Scratch arena errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArenaError {
    ZeroChunkCapacity,
    AllocationTooLarge { requested: usize, capacity: usize },
    StaleRegion,
    ForeignRegion,
}

impl Display for ArenaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroChunkCapacity => write!(f, "arena chunk capacity must be positive"),
            Self::AllocationTooLarge {
                requested,
                capacity,
            } => write!(
                f,
                "allocation of {requested} bytes exceeds chunk capacity {capacity}"
            ),
            Self::StaleRegion => write!(f, "region was invalidated by an arena reset"),
            Self::ForeignRegion => write!(f, "region was issued by a different arena"),
        }
    }
}

impl Error for ArenaError {}

/// Handle to bytes carved from an arena chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScratchRegion {
    arena: u64,
    chunk: usize,
    offset: usize,
    len: usize,
    generation: u64,
}

impl ScratchRegion {
    /// Index of the chunk the region lives in.
    pub fn chunk(&self) -> usize {
        self.chunk
    }

    /// Byte offset of the region inside its chunk.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

struct Chunk {
    data: Box<[u8]>,
    used: usize,
}

impl Chunk {
    fn new(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            used: 0,
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.used
    }
}

/// Bump allocator over a growable list of fixed-capacity chunks.
///
/// Not shareable across threads without external locking; confine one arena
/// per thread or wrap it in an `AtomMutex`.
pub struct ScratchArena {
    id: u64,
    chunk_capacity: usize,
    chunks: Vec<Chunk>,
    current: usize,
    generation: u64,
}

impl ScratchArena {
    /// Creates an arena with one empty chunk of `chunk_capacity` bytes.
    ///
    /// # Errors
    /// - `ZeroChunkCapacity` when `chunk_capacity == 0`.
    pub fn new(chunk_capacity: usize) -> ArenaResult<Self> {
        if chunk_capacity == 0 {
            return Err(ArenaError::ZeroChunkCapacity);
        }
        Ok(Self::with_capacity(chunk_capacity))
    }

    fn with_capacity(chunk_capacity: usize) -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            chunk_capacity,
            chunks: vec![Chunk::new(chunk_capacity)],
            current: 0,
            generation: 0,
        }
    }

    /// Reserves `size` bytes and returns a writable view into them.
    ///
    /// The view borrows the arena, so it cannot outlive the next `reset`.
    pub fn allocate(&mut self, size: usize) -> ArenaResult<&mut [u8]> {
        let region = self.reserve(size)?;
        self.bytes_mut(region)
    }

    /// Reserves `size` bytes and returns a handle usable until the next `reset`.
    ///
    /// # Errors
    /// - `AllocationTooLarge` when `size` exceeds the chunk capacity.
    pub fn reserve(&mut self, size: usize) -> ArenaResult<ScratchRegion> {
        if size > self.chunk_capacity {
            return Err(ArenaError::AllocationTooLarge {
                requested: size,
                capacity: self.chunk_capacity,
            });
        }

        if self.chunks[self.current].remaining() < size {
            self.advance_chunk();
        }

        let chunk = &mut self.chunks[self.current];
        let offset = chunk.used;
        chunk.used += size;
        Ok(ScratchRegion {
            arena: self.id,
            chunk: self.current,
            offset,
            len: size,
            generation: self.generation,
        })
    }

    /// Returns the bytes behind `region`.
    ///
    /// # Errors
    /// - `StaleRegion` when the arena was reset after `region` was issued.
    /// - `ForeignRegion` when `region` came from another arena.
    pub fn bytes(&self, region: ScratchRegion) -> ArenaResult<&[u8]> {
        self.check_region(region)?;
        Ok(&self.chunks[region.chunk].data[region.offset..region.offset + region.len])
    }

    /// Returns the bytes behind `region` for writing.
    pub fn bytes_mut(&mut self, region: ScratchRegion) -> ArenaResult<&mut [u8]> {
        self.check_region(region)?;
        Ok(&mut self.chunks[region.chunk].data[region.offset..region.offset + region.len])
    }

    /// Marks every chunk empty and rewinds to the first chunk.
    ///
    /// Chunks are kept for reuse; outstanding regions become stale.
    pub fn reset(&mut self) {
        for chunk in &mut self.chunks {
            chunk.used = 0;
        }
        self.current = 0;
        self.generation += 1;
        trace!(
            "event=arena_reset module=scratch status=ok chunks={} generation={}",
            self.chunks.len(),
            self.generation
        );
    }

    pub fn chunk_capacity(&self) -> usize {
        self.chunk_capacity
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Index of the chunk the next allocation is carved from.
    pub fn current_chunk(&self) -> usize {
        self.current
    }

    /// Free bytes left in the current chunk.
    pub fn remaining(&self) -> usize {
        self.chunks[self.current].remaining()
    }

    /// Bytes used in chunk `index`, or `None` when the chunk does not exist.
    pub fn used_in(&self, index: usize) -> Option<usize> {
        self.chunks.get(index).map(|chunk| chunk.used)
    }

    fn advance_chunk(&mut self) {
        self.current += 1;
        if self.current == self.chunks.len() {
            self.chunks.push(Chunk::new(self.chunk_capacity));
            trace!(
                "event=arena_grow module=scratch status=ok chunks={} chunk_capacity={}",
                self.chunks.len(),
                self.chunk_capacity
            );
        }
    }

    fn check_region(&self, region: ScratchRegion) -> ArenaResult<()> {
        if region.arena != self.id {
            return Err(ArenaError::ForeignRegion);
        }
        if region.generation != self.generation {
            return Err(ArenaError::StaleRegion);
        }
        let in_bounds = self
            .chunks
            .get(region.chunk)
            .is_some_and(|chunk| region.offset + region.len <= chunk.used);
        if !in_bounds {
            return Err(ArenaError::ForeignRegion);
        }
        Ok(())
    }
}

impl Default for ScratchArena {
    /// Arena with `DEFAULT_CHUNK_CAPACITY` chunks.
    fn default() -> Self {
        Self::with_capacity(DEFAULT_CHUNK_CAPACITY)
    }
}

impl std::fmt::Debug for ScratchArena {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScratchArena")
            .field("id", &self.id)
            .field("chunk_capacity", &self.chunk_capacity)
            .field("chunks", &self.chunks.len())
            .field("current", &self.current)
            .field("generation", &self.generation)
            .finish()
    }
}
