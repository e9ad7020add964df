/*!
Handles to strings living in foreign memory.
*/
use std::fmt;
use std::ptr;
use libc::c_void;

/**
Identifies a foreign string: a base address plus the offset from it at which the zero-terminated bytes begin.

Foreign runtimes typically hand out a pointer to an object header, with the character data following the header.  The offset is that header's size.  A handle never owns anything.
*/
#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct NativeHandle {
    base: *const c_void,
    offset: usize,
}

impl NativeHandle {
    pub fn new(base: *const c_void, offset: usize) -> Self {
        NativeHandle {
            base: base,
            offset: offset,
        }
    }

    /**
    A handle to character data starting right at `ptr`.
    */
    pub fn from_ptr<T>(ptr: *const T) -> Self {
        NativeHandle::new(ptr as *const c_void, 0)
    }

    pub fn null() -> Self {
        NativeHandle::new(ptr::null(), 0)
    }

    pub fn is_null(&self) -> bool {
        self.base.is_null()
    }

    pub fn base(&self) -> *const c_void {
        self.base
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /**
    Address of the first content byte.  Computing it reads nothing.
    */
    pub fn data_ptr(&self) -> *const u8 {
        (self.base as *const u8).wrapping_add(self.offset)
    }
}

impl fmt::Debug for NativeHandle {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "NativeHandle({:p}+{})", self.base, self.offset)
    }
}

/**
Decides whether a handle is the foreign runtime's "missing value" marker.

This is checked before any memory behind the handle is touched.
*/
pub trait Sentinel {
    fn is_sentinel(&self, handle: NativeHandle) -> bool;
}

/**
A sentinel handle matches any handle with the same base address; the offset is irrelevant, since the marker is a distinguished object, not distinguished content.
*/
impl Sentinel for NativeHandle {
    fn is_sentinel(&self, handle: NativeHandle) -> bool {
        self.base == handle.base
    }
}

impl<F> Sentinel for F where F: Fn(NativeHandle) -> bool {
    fn is_sentinel(&self, handle: NativeHandle) -> bool {
        self(handle)
    }
}

/**
For runtimes with no missing-value marker.
*/
#[derive(Copy, Clone, Debug, Default)]
pub struct NoSentinel;

impl Sentinel for NoSentinel {
    fn is_sentinel(&self, _handle: NativeHandle) -> bool {
        false
    }
}
