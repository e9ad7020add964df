/*!
This crate moves strings across a native boundary where nobody tells you what encoding they are in.

Strings coming *in* are zero-terminated byte buffers owned by a foreign runtime.  They may be UTF-8, UTF-16 with a byte-order mark, or whatever legacy encoding the platform happens to be configured for.  `Codec::decode` sniffs the encoding and hands back a `String`.

Strings going *out* are always UTF-8.  `Codec::encode` produces a zero-terminated `NativeBuf`, allocated with an allocator the foreign side can free.

For more details, see the [additional documentation](doc/index.html).

# Quick Reference

| Foreign value | Rust side | Operation |
| ---: | --- | --- |
| Pointer to a zero-terminated string | `NativeHandle::from_ptr` | `Codec::decode` → `Option<String>` |
| Object pointer, characters after a header | `NativeHandle::new(base, header_len)` | `Codec::decode` |
| Missing-value marker | any `Sentinel` | `Codec::decode` → `None` |
| Byte slice containing a terminator | `&[u8]` | `Codec::decode_bytes` |
| Owned string for foreign code, `malloc`/`free` | `NativeBuf<Malloc>` | `Codec::encode`, then `into_raw` |
| Owned string, Rust heap | `NativeBuf<Rust>` | `Codec::encode_by::<Rust>` |
| Bytes of unknown encoding | `DetectedEncoding` | `encoding::detect` |
*/

pub mod alloc;
#[doc(hidden)] pub mod doc;
pub mod encoding;
pub mod structure;

mod codec;
mod config;
mod error;
mod handle;
mod util;

pub use self::alloc::{Allocator, AllocError, Malloc, Rust};
pub use codec::{decode_utf8_native, encode_utf8_native, Codec, NativeBuf, NA_DISPLAY};
pub use config::{CodecConfig, ConfigError, MalformedPolicy, DEFAULT_SCAN_LIMIT};
pub use encoding::{detect, DetectedEncoding};
pub use error::{DecodeError, Error};
pub use handle::{NativeHandle, NoSentinel, Sentinel};
