/*!
Zero-terminated string layout.

A zero-terminated string is a pointer to a sequence of bytes ending in a single `0x00`, which is not part of the content.  Nothing records the length; it is found by looking for the terminator.  Every search here is bounded, so an unterminated buffer is reported instead of read past.
*/
use std::slice;
use memchr::memchr;

use crate::alloc::{Allocator, AllocError};

/**
The terminator was not found within the permitted number of bytes.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Unterminated {
    pub limit: usize,
}

/**
Strings represented by a pointer to the first byte, terminated by a zero byte.
*/
pub enum ZeroTerm {}

impl ZeroTerm {
    /**
    Finds the content length of the zero-terminated string at the start of `buf`.

    At most `limit` bytes of `buf` are searched; the terminator itself must lie within them.
    */
    pub fn content_len(buf: &[u8], limit: usize) -> Result<usize, Unterminated> {
        let window = &buf[..buf.len().min(limit)];
        memchr(0, window).ok_or(Unterminated { limit: window.len() })
    }

    /**
    Borrows the content of the zero-terminated string at the start of `buf`.
    */
    pub fn slice_units(buf: &[u8], limit: usize) -> Result<&[u8], Unterminated> {
        Self::content_len(buf, limit).map(|len| &buf[..len])
    }

    /**
    Finds the content length of the zero-terminated string at `ptr`, reading one byte at a time and giving up after `limit` bytes.

    # Safety

    Every byte from `ptr` up to and including the terminator, or up to `limit` bytes if there is no terminator before that, must be readable.
    */
    pub unsafe fn content_len_raw(ptr: *const u8, limit: usize) -> Result<usize, Unterminated> {
        for len in 0..limit {
            if unsafe { ptr.add(len).read() } == 0 {
                return Ok(len);
            }
        }
        Err(Unterminated { limit: limit })
    }

    /**
    Borrows the content of the zero-terminated string at `ptr`.

    # Safety

    As for `content_len_raw`.  In addition, the memory must not be mutated or freed for `'a`.
    */
    pub unsafe fn slice_units_raw<'a>(ptr: *const u8, limit: usize) -> Result<&'a [u8], Unterminated> {
        let len = unsafe { Self::content_len_raw(ptr, limit)? };
        Ok(unsafe { slice::from_raw_parts(ptr, len) })
    }

    /**
    Allocates a zero-terminated copy of `units` with `A`, returning the owned pointer.

    The buffer is `units.len() + 1` bytes long.  Interior zeroes are copied verbatim; readers will see the string end at the first one.
    */
    pub fn alloc_owned<A>(units: &[u8]) -> Result<*mut u8, AllocError> where A: Allocator {
        // +1 for the terminator.
        let total = units.len().checked_add(1).ok_or(AllocError::SizeOverflow)?;

        let ptr = A::alloc_bytes(total, 1)?;
        unsafe {
            let s = slice::from_raw_parts_mut(ptr, total);
            s[..units.len()].copy_from_slice(units);
            s[total - 1] = 0;
        }

        Ok(ptr)
    }

    /**
    Frees a buffer produced by `alloc_owned::<A>`.

    # Safety

    `ptr` must be null or have come from `alloc_owned::<A>`, and must not be used afterwards.
    */
    pub unsafe fn free_owned<A>(ptr: *mut u8) where A: Allocator {
        unsafe { A::free(ptr, 1) };
    }
}
