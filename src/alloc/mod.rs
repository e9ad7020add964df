/*!
Allocation types and traits.

Buffers produced by the encode path are handed across the native boundary, so the allocator that created them has to be the one that eventually frees them.  The allocator is therefore part of the owned buffer's type.
*/
use std::mem;
pub use self::rust::Rust;

use libc::{self, c_void};
use thiserror::Error;

/**
Abstracts over different memory allocators.

In practice, this will be implemented by a marker type (which is not intended to actually be instantiated anywhere).  Implementations must be callable from any thread, and must free memory allocated on another thread.
*/
pub trait Allocator {
    /**
    Allocate the specified number of bytes, with the specified alignment.  The returned memory is zeroed.
    */
    fn alloc_bytes(bytes: usize, align: usize) -> Result<*mut u8, AllocError>;

    /**
    Free an allocation.

    Although this method specifies the alignment the pointer was allocated with, it does *not* specify the length.  Native code that hands a buffer back to us generally does not know its original length either, so allocators that need it must hide it inside the allocation.

    # Safety

    `ptr` must be null, or have been returned by `alloc_bytes` of this same allocator with the same `align`, and must not have been freed already.
    */
    unsafe fn free(ptr: *mut u8, align: usize);

    /**
    Returns a short string identifying this allocator in debug output.
    */
    fn debug_prefix() -> &'static str;
}

/**
A general allocation error.
*/
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq, Hash)]
pub enum AllocError {
    #[error("failed to allocate memory")]
    Failed,
    #[error("cannot satisfy requested alignment")]
    CannotAlign,
    #[error("overflow while computing size")]
    SizeOverflow,
}

/**
Represents the C runtime heap allocator.

This is what native runtimes expect to `free`, and is the default for encoded buffers.
*/
pub enum Malloc {}

impl Allocator for Malloc {
    fn alloc_bytes(bytes: usize, align: usize) -> Result<*mut u8, AllocError> {
        // A conservative guess.
        if align > mem::align_of::<usize>() {
            return Err(AllocError::CannotAlign);
        }

        // `calloc(0, 1)` may legitimately return null.
        let ptr = unsafe { libc::calloc(bytes.max(1), 1) };
        if ptr.is_null() {
            Err(AllocError::Failed)
        } else {
            Ok(ptr as *mut u8)
        }
    }

    unsafe fn free(ptr: *mut u8, _align: usize) {
        if !ptr.is_null() {
            unsafe { libc::free(ptr as *mut c_void) };
        }
    }

    fn debug_prefix() -> &'static str { "C" }
}

mod rust {
    use std::alloc::{self, Layout};
    use std::mem;
    use super::{Allocator, AllocError};

    const HEADER: usize = mem::size_of::<usize>();

    /**
    Represents the Rust runtime heap allocator.

    The total size of each allocation is stored in the word immediately before the returned pointer, since `free` is not told the length.
    */
    pub enum Rust {}

    fn layout_for(total: usize) -> Result<Layout, AllocError> {
        Layout::from_size_align(total, mem::align_of::<usize>())
            .map_err(|_| AllocError::SizeOverflow)
    }

    impl Allocator for Rust {
        fn alloc_bytes(bytes: usize, align: usize) -> Result<*mut u8, AllocError> {
            if align > mem::align_of::<usize>() {
                return Err(AllocError::CannotAlign);
            }

            let total = bytes.checked_add(HEADER).ok_or(AllocError::SizeOverflow)?;
            let layout = layout_for(total)?;

            unsafe {
                let ptr = alloc::alloc_zeroed(layout);
                if ptr.is_null() {
                    return Err(AllocError::Failed);
                }

                // Save the length for later.
                (ptr as *mut usize).write(total);
                Ok(ptr.add(HEADER))
            }
        }

        unsafe fn free(ptr: *mut u8, _align: usize) {
            if ptr.is_null() {
                return;
            }

            unsafe {
                let base = ptr.sub(HEADER);
                let total = (base as *const usize).read();
                let layout = Layout::from_size_align_unchecked(total, mem::align_of::<usize>());
                alloc::dealloc(base, layout);
            }
        }

        fn debug_prefix() -> &'static str { "R" }
    }
}
