extern crate nativestr;

macro_rules! here { () => { &format!(concat!(file!(), ":{:?}"), line!()) } }

use quickcheck_macros::quickcheck;
use nativestr::{Codec, DecodeError, DetectedEncoding, NativeHandle, NoSentinel, Rust};

fn round_trip(codec: &Codec, s: &str) -> Result<Option<String>, DecodeError> {
    let buf = codec.encode(s).expect(here!());
    unsafe { codec.decode(buf.handle(), &NoSentinel) }
}

#[test]
fn test_fixed_strings() {
    let codec = Codec::default();
    for s in &["", "hello", "gªrçon", "中言语", "красавица Наталья", "Un apôtre", "😀 ok", "\u{FFFD}"] {
        assert_eq!(round_trip(&codec, s), Ok(Some(s.to_string())), "{:?}", s);
    }
}

#[test]
fn test_rust_heap() {
    let codec = Codec::default();
    let buf = codec.encode_by::<Rust>("中言语").expect(here!());
    let s = unsafe { codec.decode(buf.handle(), &NoSentinel) }.expect(here!());
    assert_eq!(s.as_deref(), Some("中言语"));
}

#[test]
fn test_interior_nul_truncates() {
    let codec = Codec::default();
    let buf = codec.encode("ab\0cd").expect(here!());
    assert_eq!(buf.as_bytes_with_nul(), b"ab\0cd\0");
    assert_eq!(round_trip(&codec, "ab\0cd"), Ok(Some("ab".to_string())));
}

#[test]
fn test_leading_bom_is_consumed() {
    let codec = Codec::default();
    assert_eq!(round_trip(&codec, "\u{FEFF}x"), Ok(Some("x".to_string())));
}

#[test]
fn test_bom_precedence() {
    let codec = Codec::default();
    let buf = b"\xef\xbb\xbf\0";
    assert_eq!(nativestr::detect(&buf[..3]), DetectedEncoding::Utf8);
    let s = unsafe { codec.decode(NativeHandle::from_ptr(buf.as_ptr()), &NoSentinel) };
    assert_eq!(s, Ok(Some(String::new())));
}

#[test]
fn test_unterminated_fails() {
    let codec = Codec::new(nativestr::CodecConfig::default().with_scan_limit(32).expect(here!()));
    let buf = [b'a'; 32];
    let s = unsafe { codec.decode(NativeHandle::from_ptr(buf.as_ptr()), &NoSentinel) };
    assert_eq!(s, Err(DecodeError::Unterminated { limit: 32 }));
}

#[quickcheck]
fn prop_round_trip(s: String) -> bool {
    if s.contains('\0') || s.starts_with('\u{FEFF}') {
        return true;
    }
    round_trip(&Codec::default(), &s) == Ok(Some(s))
}

#[quickcheck]
fn prop_sentinel_is_never_read(offset: usize) -> bool {
    // Nothing valid lives at this address; the sentinel check must come first.
    let na = NativeHandle::new(0x10 as *const libc::c_void, 0);
    let handle = NativeHandle::new(0x10 as *const libc::c_void, offset);
    unsafe { Codec::default().decode(handle, &na) == Ok(None) }
}
