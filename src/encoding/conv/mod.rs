/*!
Conversion of sniffed byte buffers into canonical text.
*/
use std::borrow::Cow;
use encoding_rs::Encoding;
use thiserror::Error;
use tracing::debug;

use crate::config::{CodecConfig, MalformedPolicy};
use crate::error::DecodeError;
use crate::util::TrapErrExt;
use super::{DetectedEncoding, UTF8_BOM};

pub mod utf16;

use self::utf16::{Endian, Units, Utf16ToUniIter};

/**
Errors found while decoding UTF-16.  Offsets are in code units, not bytes.
*/
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
pub enum Utf16Error {
    #[error("unpaired surrogate at unit {0}")]
    InvalidAt(usize),
    #[error("incomplete surrogate pair at unit {0}")]
    Incomplete(usize),
}

impl Utf16Error {
    pub fn unit_offset(&self) -> usize {
        match *self {
            Utf16Error::InvalidAt(at) | Utf16Error::Incomplete(at) => at,
        }
    }
}

/**
Converts `bytes`, believed to be in `encoding`, into a `String`.

A leading byte-order mark for `encoding` is dropped.  Malformed input is handled according to `config`'s malformed policy.
*/
pub fn to_canonical(
    bytes: Vec<u8>,
    encoding: DetectedEncoding,
    config: &CodecConfig,
) -> Result<String, DecodeError> {
    let policy = config.malformed_policy();
    match encoding {
        DetectedEncoding::Utf8 => from_utf8(bytes, policy),
        DetectedEncoding::Utf16Le => from_utf16(&bytes, Endian::Little, policy),
        DetectedEncoding::Utf16Be => from_utf16(&bytes, Endian::Big, policy),
        DetectedEncoding::SystemDefault => from_legacy(&bytes, config.system_encoding(), policy),
    }
}

fn malformed(encoding: DetectedEncoding, valid_up_to: Option<usize>) -> DecodeError {
    debug!(%encoding, ?valid_up_to, "rejecting malformed input");
    DecodeError::Malformed {
        encoding: encoding,
        valid_up_to: valid_up_to,
    }
}

fn from_utf8(mut bytes: Vec<u8>, policy: MalformedPolicy) -> Result<String, DecodeError> {
    let bom = if bytes.starts_with(&UTF8_BOM) { UTF8_BOM.len() } else { 0 };
    bytes.drain(..bom);

    match policy {
        MalformedPolicy::Reject => String::from_utf8(bytes)
            .map_err(|e| malformed(DetectedEncoding::Utf8, Some(bom + e.utf8_error().valid_up_to()))),
        MalformedPolicy::Replace => Ok(match String::from_utf8(bytes) {
            Ok(s) => s,
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        }),
    }
}

fn from_utf16(bytes: &[u8], endian: Endian, policy: MalformedPolicy) -> Result<String, DecodeError> {
    let encoding = match endian {
        Endian::Little => DetectedEncoding::Utf16Le,
        Endian::Big => DetectedEncoding::Utf16Be,
    };
    let bom = match (endian, bytes) {
        (Endian::Little, [0xFF, 0xFE, ..]) | (Endian::Big, [0xFE, 0xFF, ..]) => 2,
        _ => 0,
    };

    let chars = Utf16ToUniIter::new(Units::new(&bytes[bom..], endian));
    match policy {
        MalformedPolicy::Reject => {
            let mut err = Ok(());
            let s: String = chars.trap_err(&mut err).collect();
            err.map_err(|e| malformed(encoding, Some(bom + 2 * e.unit_offset())))?;
            Ok(s)
        },
        MalformedPolicy::Replace => Ok(chars
            .map(|r| r.unwrap_or(char::REPLACEMENT_CHARACTER))
            .collect()),
    }
}

fn from_legacy(
    bytes: &[u8],
    encoding: &'static Encoding,
    policy: MalformedPolicy,
) -> Result<String, DecodeError> {
    match policy {
        MalformedPolicy::Reject => encoding
            .decode_without_bom_handling_and_without_replacement(bytes)
            .map(Cow::into_owned)
            .ok_or_else(|| malformed(DetectedEncoding::SystemDefault, None)),
        MalformedPolicy::Replace => {
            let (s, _had_errors) = encoding.decode_without_bom_handling(bytes);
            Ok(s.into_owned())
        },
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;
    use super::*;

    fn strict() -> CodecConfig {
        CodecConfig::default()
    }

    fn lossy() -> CodecConfig {
        CodecConfig::default().with_malformed_policy(MalformedPolicy::Replace)
    }

    #[rstest]
    #[case::utf8(b"caf\xc3\xa9".to_vec(), DetectedEncoding::Utf8, "café")]
    #[case::utf8_bom(b"\xef\xbb\xbfhi".to_vec(), DetectedEncoding::Utf8, "hi")]
    #[case::utf8_bom_only(b"\xef\xbb\xbf".to_vec(), DetectedEncoding::Utf8, "")]
    #[case::utf16_le(vec![0xFF, 0xFE, 0x41, 0x00, 0x42], DetectedEncoding::Utf16Le, "AB")]
    #[case::utf16_be(vec![0xFE, 0xFF, 0x00, 0x41], DetectedEncoding::Utf16Be, "A")]
    #[case::cp1252(b"g\xaar\xe7on".to_vec(), DetectedEncoding::SystemDefault, "gªrçon")]
    #[case::cp1252_euro(vec![0x80], DetectedEncoding::SystemDefault, "€")]
    fn converts(#[case] bytes: Vec<u8>, #[case] encoding: DetectedEncoding, #[case] expected: &str) {
        assert_eq!(to_canonical(bytes, encoding, &strict()).as_deref(), Ok(expected));
    }

    #[test]
    fn strict_utf8_reports_offset_including_bom() {
        let err = to_canonical(b"\xef\xbb\xbfab\xff".to_vec(), DetectedEncoding::Utf8, &strict());
        assert_eq!(err, Err(DecodeError::Malformed {
            encoding: DetectedEncoding::Utf8,
            valid_up_to: Some(5),
        }));
    }

    #[test]
    fn lossy_utf8_substitutes() {
        let s = to_canonical(b"ab\xffc".to_vec(), DetectedEncoding::Utf8, &lossy());
        assert_eq!(s.as_deref(), Ok("ab\u{FFFD}c"));
    }

    #[test]
    fn strict_utf16_reports_byte_offset() {
        let bytes = vec![0xFF, 0xFE, 0x41, 0x00, 0x00, 0xDC];
        let err = to_canonical(bytes, DetectedEncoding::Utf16Le, &strict());
        assert_eq!(err, Err(DecodeError::Malformed {
            encoding: DetectedEncoding::Utf16Le,
            valid_up_to: Some(4),
        }));
    }

    #[test]
    fn lossy_utf16_substitutes() {
        let bytes = vec![0xFF, 0xFE, 0x00, 0xDC, 0x41, 0x00];
        let s = to_canonical(bytes, DetectedEncoding::Utf16Le, &lossy());
        assert_eq!(s.as_deref(), Ok("\u{FFFD}A"));
    }

    #[test]
    fn strict_legacy_rejects_unmapped_bytes() {
        let config = strict().with_system_encoding(encoding_rs::SHIFT_JIS).expect("ascii compatible");
        let err = to_canonical(vec![0x81], DetectedEncoding::SystemDefault, &config);
        assert_eq!(err, Err(DecodeError::Malformed {
            encoding: DetectedEncoding::SystemDefault,
            valid_up_to: None,
        }));

        let config = config.with_malformed_policy(MalformedPolicy::Replace);
        let s = to_canonical(vec![0x41, 0x81], DetectedEncoding::SystemDefault, &config);
        assert_eq!(s.as_deref(), Ok("A\u{FFFD}"));
    }
}
