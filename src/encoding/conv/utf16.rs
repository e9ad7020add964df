use std::iter::Peekable;
use super::Utf16Error;

/**
Byte order of UTF-16 code units in a byte buffer.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Endian {
    Little,
    Big,
}

/**
Iterates the code units of a UTF-16 byte buffer.

An odd trailing byte becomes the low-address half of a final unit whose other half is zero.  Buffers read up to a zero terminator lose exactly that byte, so this restores it.
*/
pub struct Units<'a> {
    bytes: &'a [u8],
    endian: Endian,
}

impl<'a> Units<'a> {
    pub fn new(bytes: &'a [u8], endian: Endian) -> Self {
        Units {
            bytes: bytes,
            endian: endian,
        }
    }
}

impl<'a> Iterator for Units<'a> {
    type Item = u16;

    fn next(&mut self) -> Option<u16> {
        let (pair, rest) = match self.bytes {
            [] => return None,
            [a] => ([*a, 0], &[][..]),
            [a, b, rest @ ..] => ([*a, *b], rest),
        };
        self.bytes = rest;
        Some(match self.endian {
            Endian::Little => u16::from_le_bytes(pair),
            Endian::Big => u16::from_be_bytes(pair),
        })
    }
}

/**
Decodes UTF-16 code units into scalar values.

Unlike the standard library's decoder, errors carry the *unit* offset at which decoding went wrong.  Iteration continues after an error; callers that want to stop early should do so themselves.
*/
pub struct Utf16ToUniIter<It> where It: Iterator<Item=u16> {
    at: usize,
    iter: Peekable<It>,
}

impl<It> Utf16ToUniIter<It> where It: Iterator<Item=u16> {
    pub fn new(iter: It) -> Self {
        Utf16ToUniIter {
            at: 0,
            iter: iter.peekable(),
        }
    }
}

impl<It> Iterator for Utf16ToUniIter<It> where It: Iterator<Item=u16> {
    type Item = Result<char, Utf16Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let cu0 = self.iter.next()?;
        let at = self.at;
        self.at += 1;

        let r = match cu0 {
            0x0000..=0xd7ff | 0xe000..=0xffff => {
                // Never a surrogate, so always a scalar value.
                Ok(char::from_u32(cu0 as u32).unwrap_or(char::REPLACEMENT_CHARACTER))
            },
            0xdc00..=0xdfff => Err(Utf16Error::InvalidAt(at)),
            /* 0xd800..=0xdbff */ _ => {
                match self.iter.peek().copied() {
                    Some(cu1 @ 0xdc00..=0xdfff) => {
                        self.iter.next();
                        self.at += 1;

                        let hi = (cu0 & 0x3ff) as u32;
                        let lo = (cu1 & 0x3ff) as u32;
                        let cp = 0x10000 + ((hi << 10) | lo);
                        Ok(char::from_u32(cp).unwrap_or(char::REPLACEMENT_CHARACTER))
                    },
                    Some(_) => Err(Utf16Error::InvalidAt(at)),
                    None => Err(Utf16Error::Incomplete(at)),
                }
            },
        };

        Some(r)
    }
}
