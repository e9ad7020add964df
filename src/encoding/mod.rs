/*!
Encoding detection and conversion.

Foreign strings arrive without a declared charset.  `sniff` guesses one from the bytes themselves; `conv` turns the bytes into canonical text given that guess.
*/
use std::fmt;

pub mod conv;
pub mod sniff;

pub use self::sniff::detect;

/**
The encoding a byte buffer is believed to be in.

Exactly one of these is produced per call to `detect`.  There is no "unknown": anything the sniffer is not confident about is `SystemDefault`.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DetectedEncoding {
    Utf8,
    Utf16Le,
    Utf16Be,
    /**
    The platform's configured legacy encoding.  Which encoding that is belongs to the codec's configuration, not to the sniffer.
    */
    SystemDefault,
}

impl fmt::Display for DetectedEncoding {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let name = match *self {
            DetectedEncoding::Utf8 => "UTF-8",
            DetectedEncoding::Utf16Le => "UTF-16LE",
            DetectedEncoding::Utf16Be => "UTF-16BE",
            DetectedEncoding::SystemDefault => "system default",
        };
        fmt.write_str(name)
    }
}

/// `EF BB BF`
pub const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// `FE FF` followed by the high byte of an ASCII code unit.
pub const UTF16_BE_BOM: [u8; 3] = [0xFE, 0xFF, 0x00];

/// `FF FE`; the third byte must be a non-zero ASCII byte, see `sniff`.
pub const UTF16_LE_BOM: [u8; 2] = [0xFF, 0xFE];
