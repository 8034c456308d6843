//! `Zone` — the bump allocator that owns one decoded value tree.
//!
//! Every `Arr`/`Map`/`Str`/`Bin` node produced by a decode pass borrows
//! from the zone handed to that pass, so the whole tree is freed in one
//! step when the zone drops. Lifetimes make it impossible to keep a
//! decoded [`crate::Value`] alive past its zone.

use std::alloc::Layout;
use std::cell::{Cell, RefCell};

const FIRST_CHUNK_SIZE: usize = 4 * 1024;
const MAX_CHUNK_SIZE: usize = 1024 * 1024;

/// One leaked chunk; reconstituted and freed when the zone drops.
struct Chunk {
    ptr: *mut u8,
    len: usize,
}

/// A grow-only chunked bump allocator.
///
/// Chunks are never reallocated or individually freed once anything
/// points into them; allocation is a pointer bump plus an occasional new
/// chunk. There is no per-object free and no compaction.
///
/// A zone is not `Sync`: one traversal allocates from it at a time.
pub struct Zone {
    /// Next free byte in the current chunk.
    head: Cell<*mut u8>,
    /// One past the end of the current chunk.
    end: Cell<*mut u8>,
    /// All chunks allocated so far; kept alive until the zone drops.
    chunks: RefCell<Vec<Chunk>>,
    /// Size of the next chunk to allocate; doubles up to a cap.
    next_chunk_size: Cell<usize>,
}

impl Drop for Zone {
    fn drop(&mut self) {
        for chunk in self.chunks.get_mut().drain(..) {
            // SAFETY: every pointer came from `Box::into_raw` in `grow`
            // and is freed exactly once, here.
            unsafe {
                drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(
                    chunk.ptr, chunk.len,
                )));
            }
        }
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::new()
    }
}

impl Zone {
    /// Creates an empty zone. No memory is reserved until the first
    /// allocation.
    pub fn new() -> Self {
        Self {
            head: Cell::new(std::ptr::null_mut()),
            end: Cell::new(std::ptr::null_mut()),
            chunks: RefCell::new(Vec::new()),
            next_chunk_size: Cell::new(FIRST_CHUNK_SIZE),
        }
    }

    /// Total bytes reserved across all chunks.
    pub fn reserved_bytes(&self) -> usize {
        self.chunks.borrow().iter().map(|c| c.len).sum()
    }

    /// Copies a byte slice into the zone.
    pub fn alloc_copy<'z>(&'z self, bytes: &[u8]) -> &'z [u8] {
        if bytes.is_empty() {
            return &[];
        }
        let ptr = self.alloc_raw(Layout::for_value(bytes));
        // SAFETY: `ptr` addresses `bytes.len()` fresh bytes inside a chunk
        // that lives as long as the zone; nothing else aliases them.
        unsafe {
            std::ptr::copy_nonoverlapping(bytes.as_ptr(), ptr, bytes.len());
            std::slice::from_raw_parts(ptr, bytes.len())
        }
    }

    /// Copies a string into the zone.
    pub fn alloc_str<'z>(&'z self, s: &str) -> &'z str {
        let bytes = self.alloc_copy(s.as_bytes());
        // SAFETY: an exact copy of valid UTF-8.
        unsafe { std::str::from_utf8_unchecked(bytes) }
    }

    /// Allocates a slice of `len` elements and fills it in order from
    /// `fill`. If any element fails, the partially written block is simply
    /// abandoned inside the zone.
    ///
    /// `T: Copy` keeps abandoned elements free of drop obligations.
    pub fn alloc_slice_try<'z, T, E, F>(&'z self, len: usize, mut fill: F) -> Result<&'z [T], E>
    where
        T: Copy,
        F: FnMut(usize) -> Result<T, E>,
    {
        if len == 0 {
            return Ok(&[]);
        }
        let layout = match Layout::array::<T>(len) {
            Ok(layout) => layout,
            // Callers bound `len` by the remaining input, so this is
            // unreachable short of address-space exhaustion.
            Err(_) => panic!("zone allocation overflows the address space"),
        };
        let ptr = self.alloc_raw(layout) as *mut T;
        for i in 0..len {
            let item = fill(i)?;
            // SAFETY: `ptr` addresses `len` properly aligned `T` slots
            // owned exclusively by this call.
            unsafe { ptr.add(i).write(item) };
        }
        // SAFETY: all `len` slots were initialized above.
        Ok(unsafe { std::slice::from_raw_parts(ptr, len) })
    }

    /// Infallible variant of [`Zone::alloc_slice_try`].
    pub fn alloc_slice_fill<'z, T, F>(&'z self, len: usize, mut fill: F) -> &'z [T]
    where
        T: Copy,
        F: FnMut(usize) -> T,
    {
        let filled: Result<&'z [T], std::convert::Infallible> =
            self.alloc_slice_try(len, |i| Ok(fill(i)));
        match filled {
            Ok(slice) => slice,
            Err(never) => match never {},
        }
    }

    /// Bumps the cursor, starting a new chunk when the current one cannot
    /// hold `layout`. Never fails; memory exhaustion aborts via the global
    /// allocator.
    fn alloc_raw(&self, layout: Layout) -> *mut u8 {
        debug_assert!(layout.size() > 0);
        let head = self.head.get();
        let aligned = (head as usize).wrapping_add(layout.align() - 1) & !(layout.align() - 1);
        let next = aligned.wrapping_add(layout.size());
        if !head.is_null() && next <= self.end.get() as usize {
            self.head.set(next as *mut u8);
            return aligned as *mut u8;
        }
        self.grow(layout)
    }

    #[cold]
    fn grow(&self, layout: Layout) -> *mut u8 {
        let wanted = layout.size() + layout.align();
        let chunk_size = self.next_chunk_size.get().max(wanted);
        self.next_chunk_size
            .set(chunk_size.saturating_mul(2).min(MAX_CHUNK_SIZE));
        // Leaked into a raw pointer so later bookkeeping never retags the
        // chunk while decoded values point into it; Drop frees it.
        let ptr = Box::into_raw(vec![0u8; chunk_size].into_boxed_slice()) as *mut u8;
        self.chunks.borrow_mut().push(Chunk {
            ptr,
            len: chunk_size,
        });
        let aligned = (ptr as usize).wrapping_add(layout.align() - 1) & !(layout.align() - 1);
        self.head.set((aligned + layout.size()) as *mut u8);
        self.end.set((ptr as usize + chunk_size) as *mut u8);
        aligned as *mut u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copies_survive_chunk_growth() {
        let zone = Zone::new();
        let mut slices = Vec::new();
        for i in 0..1000 {
            let payload = vec![(i % 251) as u8; 64];
            slices.push((zone.alloc_copy(&payload), payload));
        }
        assert!(zone.reserved_bytes() >= 64 * 1000);
        for (slice, payload) in slices {
            assert_eq!(slice, &payload[..]);
        }
    }

    #[test]
    fn empty_allocations_reserve_nothing() {
        let zone = Zone::new();
        assert_eq!(zone.alloc_copy(&[]), &[] as &[u8]);
        assert_eq!(zone.alloc_str(""), "");
        let slice: Result<&[u64], ()> = zone.alloc_slice_try(0, |_| unreachable!());
        assert_eq!(slice.unwrap().len(), 0);
        assert_eq!(zone.reserved_bytes(), 0);
    }

    #[test]
    fn alloc_str_round_trips() {
        let zone = Zone::new();
        let s = zone.alloc_str("hello, zone");
        assert_eq!(s, "hello, zone");
    }

    #[test]
    fn slice_fill_preserves_order() {
        let zone = Zone::new();
        let slice: Result<&[u32], ()> = zone.alloc_slice_try(16, |i| Ok(i as u32 * 3));
        let slice = slice.unwrap();
        assert_eq!(slice.len(), 16);
        assert_eq!(slice[0], 0);
        assert_eq!(slice[15], 45);
    }

    #[test]
    fn failed_fill_is_abandoned() {
        let zone = Zone::new();
        let result: Result<&[u8], &str> =
            zone.alloc_slice_try(8, |i| if i < 4 { Ok(i as u8) } else { Err("stop") });
        assert_eq!(result.unwrap_err(), "stop");
        // The zone stays usable after an abandoned allocation.
        assert_eq!(zone.alloc_str("still fine"), "still fine");
    }

    #[test]
    fn aligned_slices_interleave_with_bytes() {
        let zone = Zone::new();
        zone.alloc_copy(b"x");
        let slice: Result<&[u64], ()> = zone.alloc_slice_try(4, |i| Ok(i as u64));
        let slice = slice.unwrap();
        assert_eq!(slice.as_ptr() as usize % std::mem::align_of::<u64>(), 0);
        assert_eq!(slice, &[0, 1, 2, 3]);
    }
}
