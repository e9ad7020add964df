/*!
Marshaling between foreign zero-terminated strings and Rust strings.
*/
use std::fmt::{self, Debug};
use std::marker::PhantomData;
use std::ops::Deref;
use std::slice;
use tracing::{debug, instrument, trace};

use crate::alloc::{Allocator, AllocError, Malloc};
use crate::config::CodecConfig;
use crate::encoding::conv::to_canonical;
use crate::encoding::sniff::utf8_confidence;
use crate::encoding::detect;
use crate::error::DecodeError;
use crate::handle::{NativeHandle, Sentinel};
use crate::structure::{Unterminated, ZeroTerm};

/**
What `decode_display` shows for the missing-value sentinel.
*/
pub const NA_DISPLAY: &str = "NA";

/**
Converts foreign zero-terminated strings to and from Rust strings.

Decoding guesses the encoding of the foreign bytes (see `encoding::detect`).  Encoding always produces UTF-8.

A `Codec` holds only its configuration; it can be shared freely between threads.
*/
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    pub fn new(config: CodecConfig) -> Self {
        Codec { config: config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /**
    Reads the foreign string identified by `handle`.

    Returns `Ok(None)` if `na` says `handle` is the missing-value sentinel, without reading anything.

    # Failure

    Fails if `handle` is null, if no terminator is found within the configured scan limit, or if the bytes are malformed for the detected encoding and the codec rejects malformed input.

    # Safety

    Unless `handle` is the sentinel or null, the bytes starting at `handle.data_ptr()` must be readable up to and including the terminator, or for the full scan limit if there is none, and must not change during the call.
    */
    #[instrument(name = "codec::decode", level = "trace", skip(self, na))]
    pub unsafe fn decode<S>(&self, handle: NativeHandle, na: &S) -> Result<Option<String>, DecodeError>
    where
        S: Sentinel + ?Sized,
    {
        if na.is_sentinel(handle) {
            trace!("sentinel");
            return Ok(None);
        }
        unsafe { self.read(handle) }.map(Some)
    }

    /**
    Reads the foreign string identified by `handle`, with no sentinel check.

    # Safety

    As for `decode`, for every non-null `handle`.
    */
    pub unsafe fn read(&self, handle: NativeHandle) -> Result<String, DecodeError> {
        if handle.is_null() {
            debug!("null handle");
            return Err(DecodeError::NullHandle);
        }

        let units = unsafe { ZeroTerm::slice_units_raw(handle.data_ptr(), self.config.scan_limit()) }
            .map_err(unterminated)?;
        self.convert(units.to_vec())
    }

    /**
    Like `decode`, but shows the sentinel as `"NA"` rather than `None`.

    # Safety

    As for `decode`.
    */
    pub unsafe fn decode_display<S>(&self, handle: NativeHandle, na: &S) -> Result<String, DecodeError>
    where
        S: Sentinel + ?Sized,
    {
        let s = unsafe { self.decode(handle, na)? };
        Ok(s.unwrap_or_else(|| NA_DISPLAY.to_owned()))
    }

    /**
    Reads the zero-terminated string at the start of `buf`.

    The terminator must lie within `buf` and within the configured scan limit; anything after it is ignored.
    */
    #[instrument(name = "codec::decode_bytes", level = "trace", skip_all, fields(len = buf.len()))]
    pub fn decode_bytes(&self, buf: &[u8]) -> Result<String, DecodeError> {
        let units = ZeroTerm::slice_units(buf, self.config.scan_limit()).map_err(unterminated)?;
        self.convert(units.to_vec())
    }

    fn convert(&self, units: Vec<u8>) -> Result<String, DecodeError> {
        let encoding = detect(&units);
        trace!(
            %encoding,
            len = units.len(),
            confidence = utf8_confidence(&units),
            "detected encoding"
        );
        to_canonical(units, encoding, &self.config)
    }

    /**
    Allocates a zero-terminated UTF-8 copy of `text` with the C heap.

    # Failure

    Fails only if allocation fails.
    */
    pub fn encode(&self, text: &str) -> Result<NativeBuf<Malloc>, AllocError> {
        self.encode_by::<Malloc>(text)
    }

    /**
    Allocates a zero-terminated UTF-8 copy of `text` with `A`.

    The buffer holds `text.len() + 1` bytes.  An interior U+0000 is copied as-is, and foreign readers will see the string end there.
    */
    #[instrument(name = "codec::encode", level = "trace", skip_all, fields(len = text.len(), alloc = A::debug_prefix()))]
    pub fn encode_by<A>(&self, text: &str) -> Result<NativeBuf<A>, AllocError> where A: Allocator {
        let ptr = ZeroTerm::alloc_owned::<A>(text.as_bytes()).map_err(|err| {
            debug!(%err, "allocation failed");
            err
        })?;
        Ok(NativeBuf {
            ptr: ptr,
            len: text.len(),
            _marker: PhantomData,
        })
    }
}

fn unterminated(err: Unterminated) -> DecodeError {
    debug!(limit = err.limit, "no terminator");
    DecodeError::Unterminated { limit: err.limit }
}

/**
An owned, zero-terminated UTF-8 buffer allocated by `A`, ready to hand to foreign code.

The buffer is freed on drop.  Use `into_raw` to give ownership away; whoever receives the pointer must free it with `A`'s deallocator, or give it back via `from_raw`.
*/
pub struct NativeBuf<A = Malloc> where A: Allocator {
    ptr: *mut u8,
    len: usize,
    _marker: PhantomData<A>,
}

impl<A> NativeBuf<A> where A: Allocator {
    /**
    Takes ownership of a zero-terminated buffer allocated by `A`.

    Returns `None` if `ptr` is null.  The length is found by scanning for the terminator, bounded by `limit`.

    # Safety

    `ptr` must have been allocated by `A` with an alignment of 1, must be zero-terminated within `limit` bytes, and must not be owned by anything else.
    */
    pub unsafe fn from_raw(ptr: *mut u8, limit: usize) -> Option<Self> {
        if ptr.is_null() {
            return None;
        }
        let len = unsafe { ZeroTerm::content_len_raw(ptr, limit) }.ok()?;
        Some(NativeBuf {
            ptr: ptr,
            len: len,
            _marker: PhantomData,
        })
    }

    /**
    Relinquishes ownership and returns the buffer's address.
    */
    pub fn into_raw(self) -> *mut u8 {
        let ptr = self.ptr;
        std::mem::forget(self);
        ptr
    }

    pub fn as_ptr(&self) -> *const u8 {
        self.ptr
    }

    /**
    A handle to this buffer, suitable for `Codec::decode`.  Valid for as long as the buffer lives.
    */
    pub fn handle(&self) -> NativeHandle {
        NativeHandle::from_ptr(self.ptr)
    }

    /// Content length in bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The content, *excluding* the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr, self.len) }
    }

    /// The content, *including* the terminator.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        unsafe { slice::from_raw_parts(self.ptr, self.len + 1) }
    }
}

// The buffer is uniquely owned, and `Allocator`s must work from any thread.
unsafe impl<A> Send for NativeBuf<A> where A: Allocator {}
unsafe impl<A> Sync for NativeBuf<A> where A: Allocator {}

impl<A> Deref for NativeBuf<A> where A: Allocator {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.as_bytes()
    }
}

impl<A> Debug for NativeBuf<A> where A: Allocator {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}{:?}", A::debug_prefix(), String::from_utf8_lossy(self.as_bytes()))
    }
}

impl<A> Drop for NativeBuf<A> where A: Allocator {
    fn drop(&mut self) {
        unsafe { ZeroTerm::free_owned::<A>(self.ptr) };
    }
}

/**
Reads a foreign string with the default codec and no sentinel check.

# Safety

As for `Codec::decode`.
*/
pub unsafe fn decode_utf8_native(handle: NativeHandle) -> Result<String, DecodeError> {
    unsafe { Codec::default().read(handle) }
}

/**
Allocates a zero-terminated UTF-8 copy of `text` on the C heap, with the default codec.
*/
pub fn encode_utf8_native(text: &str) -> Result<NativeBuf<Malloc>, AllocError> {
    Codec::default().encode(text)
}
